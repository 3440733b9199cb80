#[tokio::main]
async fn main() -> anyhow::Result<()> {
    vocab_review::run().await
}
