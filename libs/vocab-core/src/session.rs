//! Review session state machine.
//!
//! A session walks a shuffled set of cards once. `remember` and `forget`
//! write the rescheduled card to the store before the cursor moves; if the
//! write fails the session is left exactly as it was so the command can be
//! retried. Commands take `&mut self`, so a session never has more than one
//! write in flight.

use crate::clock::Clock;
use crate::error::SessionError;
use crate::keys::Command;
use crate::scheduler::{next_due_date, start_of_day};
use crate::store::CardStore;
use crate::types::{
    Card, CardPatch, ReviewIntervals, ReviewMode, ReviewOutcome, ReviewRecord, ReviewStatus,
};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

/// Result type alias for session commands.
pub type Result<T> = std::result::Result<T, SessionError>;

/// Coarse session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SessionState {
    InProgress { cursor: usize },
    Completed,
}

/// Counter snapshot reported back to the UI after every command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Progress {
    pub cursor: usize,
    pub total: usize,
    pub revealed: bool,
    pub skipped: usize,
    pub remembered: usize,
    pub forgotten: usize,
    pub completed: bool,
}

impl Progress {
    pub fn answered(&self) -> usize {
        self.skipped + self.remembered + self.forgotten
    }
}

/// One pass through a set of cards.
#[derive(Debug)]
pub struct ReviewSession<S, C, R> {
    cards: Vec<Card>,
    order: Vec<usize>,
    cursor: usize,
    revealed: bool,
    skipped: usize,
    remembered: usize,
    forgotten: usize,
    mode: ReviewMode,
    intervals: ReviewIntervals,
    store: S,
    clock: C,
    rng: R,
}

impl<S, C, R> ReviewSession<S, C, R>
where
    S: CardStore,
    C: Clock,
    R: Rng + Send,
{
    /// Start a session over `cards` in a freshly shuffled order.
    ///
    /// With no cards the session starts out completed.
    pub fn start(
        cards: Vec<Card>,
        mode: ReviewMode,
        intervals: ReviewIntervals,
        store: S,
        clock: C,
        mut rng: R,
    ) -> Self {
        let mut order: Vec<usize> = (0..cards.len()).collect();
        order.shuffle(&mut rng);

        tracing::info!(cards = cards.len(), mode = mode.as_str(), "review session started");

        Self {
            cards,
            order,
            cursor: 0,
            revealed: false,
            skipped: 0,
            remembered: 0,
            forgotten: 0,
            mode,
            intervals,
            store,
            clock,
            rng,
        }
    }

    pub fn total(&self) -> usize {
        self.order.len()
    }

    pub fn mode(&self) -> ReviewMode {
        self.mode
    }

    pub fn is_completed(&self) -> bool {
        self.cursor >= self.order.len()
    }

    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    pub fn state(&self) -> SessionState {
        if self.is_completed() {
            SessionState::Completed
        } else {
            SessionState::InProgress {
                cursor: self.cursor,
            }
        }
    }

    /// Presentation order as indexes into [`Self::cards`].
    pub fn order(&self) -> &[usize] {
        &self.order
    }

    /// Cards in input order, reflecting every persisted answer.
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn current_card(&self) -> Option<&Card> {
        self.order.get(self.cursor).map(|&idx| &self.cards[idx])
    }

    pub fn progress(&self) -> Progress {
        Progress {
            cursor: self.cursor,
            total: self.order.len(),
            revealed: self.revealed,
            skipped: self.skipped,
            remembered: self.remembered,
            forgotten: self.forgotten,
            completed: self.is_completed(),
        }
    }

    /// Show the answer side of the current card.
    pub fn flip(&mut self) -> Progress {
        if !self.is_completed() && !self.revealed {
            self.revealed = true;
            tracing::debug!(cursor = self.cursor, "card revealed");
        }
        self.progress()
    }

    /// Move past the current card without answering.
    pub fn skip(&mut self) -> Progress {
        if !self.is_completed() {
            self.skipped += 1;
            self.advance();
        }
        self.progress()
    }

    /// Send the current card to the back of the queue. The cursor stays put.
    pub fn repeat_later(&mut self) -> Progress {
        if !self.is_completed() {
            let idx = self.order.remove(self.cursor);
            self.order.push(idx);
            self.revealed = false;
            tracing::debug!(cursor = self.cursor, card_index = idx, "card moved to back");
        }
        self.progress()
    }

    /// Record a successful recall of the revealed card.
    pub async fn remember(&mut self) -> Result<Progress> {
        if self.is_completed() || !self.revealed {
            return Ok(self.progress());
        }

        let idx = self.order[self.cursor];
        let patch = self.answer_patch(&self.cards[idx], ReviewOutcome::Remembered);
        self.persist(idx, patch).await?;

        self.remembered += 1;
        self.advance();
        Ok(self.progress())
    }

    /// Record a failed recall. The card keeps its status and is rescheduled
    /// from today. Ignored outside SRS mode.
    pub async fn forget(&mut self) -> Result<Progress> {
        if self.is_completed() || !self.revealed || self.mode != ReviewMode::Srs {
            return Ok(self.progress());
        }

        let idx = self.order[self.cursor];
        let patch = self.answer_patch(&self.cards[idx], ReviewOutcome::Forgotten);
        self.persist(idx, patch).await?;

        self.forgotten += 1;
        self.advance();
        Ok(self.progress())
    }

    /// Start over with the same cards in a new order.
    pub fn restart(&mut self) -> Progress {
        self.order = (0..self.cards.len()).collect();
        self.order.shuffle(&mut self.rng);
        self.cursor = 0;
        self.revealed = false;
        self.skipped = 0;
        self.remembered = 0;
        self.forgotten = 0;
        tracing::info!(cards = self.cards.len(), "review session restarted");
        self.progress()
    }

    /// Dispatch a UI command.
    pub async fn apply(&mut self, command: Command) -> Result<Progress> {
        match command {
            Command::Flip => Ok(self.flip()),
            Command::Skip => Ok(self.skip()),
            Command::RepeatLater => Ok(self.repeat_later()),
            Command::Remember => self.remember().await,
            Command::Forget => self.forget().await,
            Command::Restart => Ok(self.restart()),
        }
    }

    fn answer_patch(&self, card: &Card, outcome: ReviewOutcome) -> CardPatch {
        let today = self.clock.today();

        if self.mode == ReviewMode::Practice {
            return CardPatch {
                last_reviewed_at: Some(Some(today)),
                ..Default::default()
            };
        }

        let before = card.review_status;
        let after = status_after(before, outcome);

        let mut history = card.review_history.clone();
        history.push(ReviewRecord {
            reviewed_on: today,
            outcome,
            status_before: before,
            status_after: after,
        });

        CardPatch {
            review_status: Some(after),
            due_date: Some(next_due_date(after, start_of_day(today), &self.intervals)),
            last_reviewed_at: Some(Some(today)),
            review_history: Some(history),
            ..Default::default()
        }
    }

    async fn persist(&mut self, idx: usize, patch: CardPatch) -> Result<()> {
        let id = self.cards[idx].id.clone();
        match self.store.update(&id, patch).await {
            Ok(updated) => {
                tracing::debug!(
                    card_id = %id,
                    status = updated.review_status.value(),
                    due = ?updated.due_date,
                    "card saved"
                );
                self.cards[idx] = updated;
                Ok(())
            }
            Err(e) => {
                tracing::warn!(card_id = %id, error = %e, "failed to save card");
                Err(e.into())
            }
        }
    }

    fn advance(&mut self) {
        self.cursor += 1;
        self.revealed = false;
        if self.is_completed() {
            tracing::info!(
                skipped = self.skipped,
                remembered = self.remembered,
                forgotten = self.forgotten,
                "review session completed"
            );
        }
    }
}

/// Status a card lands on after `outcome` in SRS mode.
pub fn status_after(status: ReviewStatus, outcome: ReviewOutcome) -> ReviewStatus {
    match outcome {
        ReviewOutcome::Remembered => status.advance(),
        ReviewOutcome::Forgotten | ReviewOutcome::Answered => status,
    }
}
