//! SQLite-backed card store.

use crate::db::error::DbError;
use crate::db::schema::{SCHEMA, SCHEMA_VERSION};
use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Connection, ErrorCode, OptionalExtension};
use std::path::Path;
use std::sync::Mutex;
use vocab_core::{Card, CardPatch, CardStore, ReviewRecord, ReviewStatus, StoreResult};

type Result<T> = std::result::Result<T, DbError>;

const CARD_COLUMNS: &str = "id, word, meaning, created_at, updated_at, last_reviewed_at, due_date, review_status, review_history";

/// Card rows as stored, before validation.
struct CardRow {
    id: String,
    word: String,
    meaning: String,
    created_at: String,
    updated_at: String,
    last_reviewed_at: Option<String>,
    due_date: Option<String>,
    review_status: i64,
    review_history: String,
}

impl CardRow {
    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            word: row.get(1)?,
            meaning: row.get(2)?,
            created_at: row.get(3)?,
            updated_at: row.get(4)?,
            last_reviewed_at: row.get(5)?,
            due_date: row.get(6)?,
            review_status: row.get(7)?,
            review_history: row.get(8)?,
        })
    }

    fn into_card(self) -> Result<Card> {
        let review_status = ReviewStatus::try_from(self.review_status)
            .map_err(|e| DbError::InvalidData(format!("card {}: {e}", self.id)))?;
        let review_history: Vec<ReviewRecord> = serde_json::from_str(&self.review_history)?;

        Ok(Card {
            created_at: parse_timestamp(&self.created_at)?,
            updated_at: parse_timestamp(&self.updated_at)?,
            last_reviewed_at: self.last_reviewed_at.as_deref().map(parse_date).transpose()?,
            due_date: self.due_date.as_deref().map(parse_date).transpose()?,
            id: self.id,
            word: self.word,
            meaning: self.meaning,
            review_status,
            review_history,
        })
    }
}

fn parse_timestamp(s: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| DbError::InvalidData(format!("bad timestamp: {s}")))
}

fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| DbError::InvalidData(format!("bad date: {s}")))
}

fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// SQLite implementation of [`CardStore`].
pub struct SqliteCardStore {
    conn: Mutex<Connection>,
}

impl SqliteCardStore {
    /// Open database at path, creating if necessary.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        Self::initialize(conn)
    }

    /// Open in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::initialize(conn)
    }

    fn initialize(conn: Connection) -> Result<Self> {
        conn.execute_batch(SCHEMA)?;
        conn.execute(
            "INSERT OR IGNORE INTO schema_version (version) VALUES (?1)",
            params![SCHEMA_VERSION],
        )?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn get_card(&self, id: &str) -> Result<Option<Card>> {
        let conn = self.conn.lock().expect("repository lock");
        Self::query_card(&conn, id)
    }

    /// All cards, oldest first.
    pub fn list_cards(&self) -> Result<Vec<Card>> {
        let conn = self.conn.lock().expect("repository lock");
        let mut stmt = conn.prepare(&format!(
            "SELECT {CARD_COLUMNS} FROM cards ORDER BY created_at, id"
        ))?;
        let rows = stmt
            .query_map([], CardRow::from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        rows.into_iter().map(CardRow::into_card).collect()
    }

    /// Cards due on or before `today`, oldest due date first.
    pub fn get_due_cards(&self, today: NaiveDate) -> Result<Vec<Card>> {
        let conn = self.conn.lock().expect("repository lock");
        let mut stmt = conn.prepare(&format!(
            "SELECT {CARD_COLUMNS} FROM cards
             WHERE due_date IS NOT NULL AND due_date <= ?1
             ORDER BY due_date, word"
        ))?;
        let rows = stmt
            .query_map(params![format_date(today)], CardRow::from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        rows.into_iter().map(CardRow::into_card).collect()
    }

    pub fn insert_card(&self, card: &Card) -> Result<()> {
        let conn = self.conn.lock().expect("repository lock");
        let history = serde_json::to_string(&card.review_history)?;
        conn.execute(
            &format!("INSERT INTO cards ({CARD_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)"),
            params![
                card.id,
                card.word,
                card.meaning,
                card.created_at.to_rfc3339(),
                card.updated_at.to_rfc3339(),
                card.last_reviewed_at.map(format_date),
                card.due_date.map(format_date),
                card.review_status.value(),
                history,
            ],
        )
        .map_err(|e| match e {
            rusqlite::Error::SqliteFailure(ref failure, _)
                if failure.code == ErrorCode::ConstraintViolation =>
            {
                DbError::DuplicateCard(card.id.clone())
            }
            other => other.into(),
        })?;
        Ok(())
    }

    /// Merge `patch` into the stored card and return the result.
    pub fn update_card(&self, id: &str, patch: &CardPatch) -> Result<Card> {
        let mut conn = self.conn.lock().expect("repository lock");
        let tx = conn.transaction()?;

        let mut card = Self::query_card(&tx, id)?.ok_or_else(|| DbError::CardNotFound(id.to_string()))?;
        patch.apply(&mut card);

        let history = serde_json::to_string(&card.review_history)?;
        tx.execute(
            "UPDATE cards SET word = ?2, meaning = ?3, updated_at = ?4, last_reviewed_at = ?5,
                due_date = ?6, review_status = ?7, review_history = ?8
             WHERE id = ?1",
            params![
                card.id,
                card.word,
                card.meaning,
                card.updated_at.to_rfc3339(),
                card.last_reviewed_at.map(format_date),
                card.due_date.map(format_date),
                card.review_status.value(),
                history,
            ],
        )?;
        tx.commit()?;
        Ok(card)
    }

    pub fn delete_card(&self, id: &str) -> Result<()> {
        let conn = self.conn.lock().expect("repository lock");
        let count = conn.execute("DELETE FROM cards WHERE id = ?1", params![id])?;
        if count == 0 {
            return Err(DbError::CardNotFound(id.to_string()));
        }
        Ok(())
    }

    fn query_card(conn: &Connection, id: &str) -> Result<Option<Card>> {
        conn.query_row(
            &format!("SELECT {CARD_COLUMNS} FROM cards WHERE id = ?1"),
            params![id],
            CardRow::from_row,
        )
        .optional()?
        .map(CardRow::into_card)
        .transpose()
    }
}

impl CardStore for SqliteCardStore {
    async fn find_by_id(&self, id: &str) -> StoreResult<Option<Card>> {
        self.get_card(id).map_err(Into::into)
    }

    async fn update(&self, id: &str, patch: CardPatch) -> StoreResult<Card> {
        self.update_card(id, &patch).map_err(Into::into)
    }

    async fn insert(&self, card: Card) -> StoreResult<Card> {
        self.insert_card(&card)?;
        Ok(card)
    }

    async fn remove(&self, id: &str) -> StoreResult<()> {
        self.delete_card(id).map_err(Into::into)
    }

    async fn list(&self) -> StoreResult<Vec<Card>> {
        self.list_cards().map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use vocab_core::{due_cards, new_card, ReviewIntervals, ReviewOutcome, StoreError};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 10, 12, 0, 0).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample(word: &str, status: ReviewStatus) -> Card {
        new_card(word, "meaning", status, &ReviewIntervals::default(), now()).unwrap()
    }

    #[test]
    fn insert_and_read_back() {
        let repo = SqliteCardStore::open_in_memory().unwrap();
        let card = sample("hola", ReviewStatus::SevenDay);
        repo.insert_card(&card).unwrap();

        assert_eq!(repo.get_card(&card.id).unwrap(), Some(card));
        assert_eq!(repo.get_card("missing").unwrap(), None);
    }

    #[test]
    fn duplicate_insert_is_reported() {
        let repo = SqliteCardStore::open_in_memory().unwrap();
        let card = sample("hola", ReviewStatus::New);
        repo.insert_card(&card).unwrap();

        let err = repo.insert_card(&card).unwrap_err();
        assert!(matches!(err, DbError::DuplicateCard(ref id) if *id == card.id));
    }

    #[test]
    fn update_merges_patch_and_history() {
        let repo = SqliteCardStore::open_in_memory().unwrap();
        let card = sample("hola", ReviewStatus::New);
        repo.insert_card(&card).unwrap();

        let patch = CardPatch {
            review_status: Some(ReviewStatus::ThreeDay),
            due_date: Some(Some(date(2024, 1, 13))),
            last_reviewed_at: Some(Some(date(2024, 1, 10))),
            review_history: Some(vec![ReviewRecord {
                reviewed_on: date(2024, 1, 10),
                outcome: ReviewOutcome::Remembered,
                status_before: ReviewStatus::New,
                status_after: ReviewStatus::ThreeDay,
            }]),
            ..Default::default()
        };
        let updated = repo.update_card(&card.id, &patch).unwrap();

        assert_eq!(updated.word, "hola");
        assert_eq!(updated.review_status, ReviewStatus::ThreeDay);
        assert_eq!(repo.get_card(&card.id).unwrap(), Some(updated));
    }

    #[test]
    fn known_card_round_trips_without_due_date() {
        let repo = SqliteCardStore::open_in_memory().unwrap();
        let card = sample("adios", ReviewStatus::FifteenDay);
        repo.insert_card(&card).unwrap();

        let patch = CardPatch {
            review_status: Some(ReviewStatus::Known),
            due_date: Some(None),
            ..Default::default()
        };
        let updated = repo.update_card(&card.id, &patch).unwrap();
        assert_eq!(updated.due_date, None);
        assert_eq!(repo.get_card(&card.id).unwrap().unwrap().due_date, None);
    }

    #[test]
    fn due_cards_filters_and_orders() {
        let repo = SqliteCardStore::open_in_memory().unwrap();
        let today = sample("b-today", ReviewStatus::New);
        let later = sample("later", ReviewStatus::FifteenDay);
        let known = sample("known", ReviewStatus::Known);
        let mut overdue = sample("z-overdue", ReviewStatus::ThreeDay);
        overdue.due_date = Some(date(2024, 1, 2));
        for card in [&today, &later, &known, &overdue] {
            repo.insert_card(card).unwrap();
        }

        let due = repo.get_due_cards(date(2024, 1, 10)).unwrap();
        let words: Vec<&str> = due.iter().map(|c| c.word.as_str()).collect();
        assert_eq!(words, vec!["z-overdue", "b-today"]);
    }

    #[test]
    fn sql_due_selection_matches_core_filter() {
        let repo = SqliteCardStore::open_in_memory().unwrap();
        let mut cards = vec![
            sample("pera", ReviewStatus::New),
            sample("manzana", ReviewStatus::New),
            sample("uva", ReviewStatus::SevenDay),
            sample("kiwi", ReviewStatus::Known),
        ];
        cards[2].due_date = Some(date(2024, 1, 3));
        cards.push({
            let mut card = sample("Zanahoria", ReviewStatus::ThreeDay);
            card.due_date = Some(date(2024, 1, 3));
            card
        });
        for card in &cards {
            repo.insert_card(card).unwrap();
        }

        for today in [date(2024, 1, 2), date(2024, 1, 10), date(2024, 3, 1)] {
            let from_sql = repo.get_due_cards(today).unwrap();
            let from_core = due_cards(repo.list_cards().unwrap(), today);
            assert_eq!(from_sql, from_core);
        }
    }

    #[test]
    fn corrupt_status_is_invalid_data() {
        let repo = SqliteCardStore::open_in_memory().unwrap();
        let card = sample("hola", ReviewStatus::New);
        repo.insert_card(&card).unwrap();
        {
            let conn = repo.conn.lock().unwrap();
            conn.execute_batch("PRAGMA ignore_check_constraints = ON").unwrap();
            conn.execute("UPDATE cards SET review_status = 9", []).unwrap();
        }

        assert!(matches!(repo.get_card(&card.id), Err(DbError::InvalidData(_))));
    }

    #[tokio::test]
    async fn store_trait_maps_errors() {
        let repo = SqliteCardStore::open_in_memory().unwrap();
        let err = repo.update("nope", CardPatch::default()).await.unwrap_err();
        assert_eq!(err, StoreError::NotFound("nope".to_string()));

        let err = repo.remove("nope").await.unwrap_err();
        assert_eq!(err, StoreError::NotFound("nope".to_string()));

        let card = repo.insert(sample("hola", ReviewStatus::New)).await.unwrap();
        assert_eq!(repo.list().await.unwrap(), vec![card]);
    }
}
