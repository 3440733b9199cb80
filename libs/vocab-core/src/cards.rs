//! Card creation, status edits and due-card selection.
//!
//! Every due date written here comes from [`crate::scheduler`].

use crate::error::CardError;
use crate::scheduler::{initial_due_date, next_due_date, start_of_day};
use crate::types::{Card, CardPatch, ReviewIntervals, ReviewStatus};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Build a new card at `status`, scheduled with the creation rules.
pub fn new_card(
    word: &str,
    meaning: &str,
    status: ReviewStatus,
    intervals: &ReviewIntervals,
    now: DateTime<Utc>,
) -> Result<Card, CardError> {
    let word = word.trim();
    if word.is_empty() {
        return Err(CardError::EmptyWord);
    }

    Ok(Card {
        id: Uuid::new_v4().to_string(),
        word: word.to_string(),
        meaning: meaning.trim().to_string(),
        created_at: now,
        updated_at: now,
        last_reviewed_at: None,
        due_date: initial_due_date(status, intervals, now),
        review_status: status,
        review_history: Vec::new(),
    })
}

/// Anchor for rescheduling: the last review, or the creation time if the
/// card was never reviewed.
pub fn reference_date(card: &Card) -> DateTime<Utc> {
    card.last_reviewed_at
        .map(start_of_day)
        .unwrap_or(card.created_at)
}

/// Patch for a manual status change from the card editor.
pub fn status_change(
    card: &Card,
    status: ReviewStatus,
    intervals: &ReviewIntervals,
    now: DateTime<Utc>,
) -> Result<CardPatch, CardError> {
    if card.review_status.is_known() && !status.is_known() {
        return Err(CardError::KnownIsTerminal);
    }

    Ok(CardPatch {
        review_status: Some(status),
        due_date: Some(next_due_date(status, reference_date(card), intervals)),
        updated_at: Some(now),
        ..Default::default()
    })
}

/// A card is due once its due date is today or earlier. Known cards never are.
pub fn is_due(card: &Card, today: NaiveDate) -> bool {
    card.due_date.is_some_and(|due| due <= today)
}

/// Due cards, oldest due date first.
pub fn due_cards(cards: impl IntoIterator<Item = Card>, today: NaiveDate) -> Vec<Card> {
    let mut due: Vec<Card> = cards.into_iter().filter(|c| is_due(c, today)).collect();
    due.sort_by(|a, b| a.due_date.cmp(&b.due_date).then_with(|| a.word.cmp(&b.word)));
    due
}

/// Cards still on the ladder, used for practice sessions.
pub fn practice_cards(cards: impl IntoIterator<Item = Card>) -> Vec<Card> {
    cards
        .into_iter()
        .filter(|c| !c.review_status.is_known())
        .collect()
}

/// Card counts for a deck.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeckStats {
    pub total: usize,
    /// Counts indexed by `status - 1`.
    pub by_status: [usize; 5],
    pub due_today: usize,
}

impl DeckStats {
    pub fn from_cards<'a>(cards: impl IntoIterator<Item = &'a Card>, today: NaiveDate) -> Self {
        let mut stats = Self::default();
        for card in cards {
            stats.total += 1;
            stats.by_status[usize::from(card.review_status.value()) - 1] += 1;
            if is_due(card, today) {
                stats.due_today += 1;
            }
        }
        stats
    }

    pub fn count(&self, status: ReviewStatus) -> usize {
        self.by_status[usize::from(status.value()) - 1]
    }
}
