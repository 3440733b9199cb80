//! Card management commands.

use crate::state::AppState;
use anyhow::{Context, Result};
use std::io::Write;
use vocab_core::scheduler::due_date_string;
use vocab_core::{new_card, status_change, Card, CardStore, DeckStats, ReviewStatus};

/// Create a card at `status` and store it.
pub async fn add<W: Write>(
    state: &AppState,
    word: &str,
    meaning: &str,
    status: ReviewStatus,
    out: &mut W,
) -> Result<Card> {
    let card = new_card(word, meaning, status, &state.config.intervals, state.clock.now())?;
    let card = state.store.insert(card).await?;
    tracing::info!(card_id = %card.id, status = status.value(), "card added");

    writeln!(out, "added {} ({})", card.word, card.id)?;
    Ok(card)
}

/// Print every card, or only those due today.
pub async fn list<W: Write>(state: &AppState, due_only: bool, out: &mut W) -> Result<()> {
    let cards = if due_only {
        state.store.get_due_cards(state.clock.today())?
    } else {
        state.store.list().await?
    };

    if cards.is_empty() {
        writeln!(out, "no cards")?;
        return Ok(());
    }

    for card in &cards {
        let due = due_date_string(card.due_date);
        writeln!(
            out,
            "{}  {:<7} {:<10} {} = {}",
            card.id,
            card.review_status.label(),
            if due.is_empty() { "-" } else { due.as_str() },
            card.word,
            card.meaning
        )?;
    }
    Ok(())
}

/// Move a card to another status and reschedule it.
pub async fn set_status<W: Write>(
    state: &AppState,
    id: &str,
    status: ReviewStatus,
    out: &mut W,
) -> Result<Card> {
    let card = state
        .store
        .find_by_id(id)
        .await?
        .with_context(|| format!("no card with id {id}"))?;

    let patch = status_change(&card, status, &state.config.intervals, state.clock.now())?;
    let updated = state.store.update(id, patch).await?;

    writeln!(
        out,
        "{} is now {} (due {})",
        updated.word,
        updated.review_status.label(),
        updated
            .due_date
            .map(|d| d.to_string())
            .unwrap_or_else(|| "never".to_string())
    )?;
    Ok(updated)
}

pub async fn remove<W: Write>(state: &AppState, id: &str, out: &mut W) -> Result<()> {
    state.store.remove(id).await?;
    tracing::info!(card_id = %id, "card removed");
    writeln!(out, "removed {id}")?;
    Ok(())
}

pub async fn stats<W: Write>(state: &AppState, out: &mut W) -> Result<DeckStats> {
    let cards = state.store.list().await?;
    let stats = DeckStats::from_cards(&cards, state.clock.today());

    writeln!(out, "cards: {}", stats.total)?;
    for status in ReviewStatus::ALL {
        writeln!(out, "  {:<7} {}", status.label(), stats.count(status))?;
    }
    writeln!(out, "due today: {}", stats.due_today)?;
    Ok(stats)
}
