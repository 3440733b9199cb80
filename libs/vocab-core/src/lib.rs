//! Spaced-repetition core for the vocabulary review app.
//!
//! Provides:
//! - Due date calculation on a fixed interval ladder (New, 3-day, 7-day, 15-day, Known)
//! - The review session state machine (flip, skip, repeat later, remember, forget)
//! - Card creation and status edits routed through the same scheduler
//! - Storage, clock and key binding seams for the surrounding app

pub mod cards;
pub mod clock;
pub mod error;
pub mod keys;
pub mod scheduler;
pub mod session;
pub mod store;
pub mod types;

pub use cards::{due_cards, is_due, new_card, practice_cards, reference_date, status_change, DeckStats};
pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{CardError, Result, ScheduleError, SessionError, StoreError};
pub use keys::{command_for, Command, Key};
pub use scheduler::{initial_due_date, next_due_date, next_due_date_from_str};
pub use session::{Progress, ReviewSession, SessionState};
pub use store::{CardStore, MemoryCardStore, StoreResult};
pub use types::{
    Card, CardPatch, ReviewIntervals, ReviewMode, ReviewOutcome, ReviewRecord, ReviewStatus,
    MAX_INTERVAL_DAYS,
};
