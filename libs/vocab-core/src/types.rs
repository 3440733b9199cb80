//! Core types for the vocabulary review engine.

use crate::error::ScheduleError;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Position of a card on the fixed interval ladder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum ReviewStatus {
    New = 1,
    ThreeDay = 2,
    SevenDay = 3,
    FifteenDay = 4,
    Known = 5,
}

impl Default for ReviewStatus {
    fn default() -> Self {
        Self::New
    }
}

impl ReviewStatus {
    /// All statuses in ladder order.
    pub const ALL: [ReviewStatus; 5] = [
        Self::New,
        Self::ThreeDay,
        Self::SevenDay,
        Self::FifteenDay,
        Self::Known,
    ];

    /// Ordinal value (1-5).
    pub fn value(self) -> u8 {
        self as u8
    }

    /// Next level up the ladder. Known stays Known.
    pub fn advance(self) -> Self {
        match self {
            Self::New => Self::ThreeDay,
            Self::ThreeDay => Self::SevenDay,
            Self::SevenDay => Self::FifteenDay,
            Self::FifteenDay | Self::Known => Self::Known,
        }
    }

    /// Whether the card has left the ladder.
    pub fn is_known(self) -> bool {
        matches!(self, Self::Known)
    }

    /// Display label for menus and listings.
    pub fn label(self) -> &'static str {
        match self {
            Self::New => "New",
            Self::ThreeDay => "3-day",
            Self::SevenDay => "7-day",
            Self::FifteenDay => "15-day",
            Self::Known => "Known",
        }
    }
}

impl TryFrom<i64> for ReviewStatus {
    type Error = ScheduleError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::New),
            2 => Ok(Self::ThreeDay),
            3 => Ok(Self::SevenDay),
            4 => Ok(Self::FifteenDay),
            5 => Ok(Self::Known),
            other => Err(ScheduleError::InvalidStatus(other)),
        }
    }
}

impl TryFrom<u8> for ReviewStatus {
    type Error = ScheduleError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::try_from(i64::from(value))
    }
}

impl From<ReviewStatus> for u8 {
    fn from(status: ReviewStatus) -> Self {
        status.value()
    }
}

impl fmt::Display for ReviewStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Longest interval accepted for any ladder step.
pub const MAX_INTERVAL_DAYS: u32 = 36_500;

/// Days until the next review when a card moves into statuses 1-4.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "[u32; 4]", into = "[u32; 4]")]
pub struct ReviewIntervals([u32; 4]);

impl Default for ReviewIntervals {
    fn default() -> Self {
        Self([1, 3, 7, 15])
    }
}

impl ReviewIntervals {
    /// Build an interval ladder. Every entry must be between one day and
    /// [`MAX_INTERVAL_DAYS`].
    pub fn new(days: [u32; 4]) -> Result<Self, ScheduleError> {
        if let Some(pos) = days.iter().position(|&d| d == 0) {
            return Err(ScheduleError::InvalidIntervals(format!(
                "interval {} must be positive",
                pos + 1
            )));
        }
        if let Some(pos) = days.iter().position(|&d| d > MAX_INTERVAL_DAYS) {
            return Err(ScheduleError::InvalidIntervals(format!(
                "interval {} exceeds {MAX_INTERVAL_DAYS} days",
                pos + 1
            )));
        }
        Ok(Self(days))
    }

    /// Interval for a status, `None` for Known.
    pub fn days_for(&self, status: ReviewStatus) -> Option<u32> {
        match status {
            ReviewStatus::Known => None,
            other => Some(self.0[usize::from(other.value()) - 1]),
        }
    }

    pub fn as_array(&self) -> [u32; 4] {
        self.0
    }
}

impl TryFrom<[u32; 4]> for ReviewIntervals {
    type Error = ScheduleError;

    fn try_from(days: [u32; 4]) -> Result<Self, Self::Error> {
        Self::new(days)
    }
}

impl From<ReviewIntervals> for [u32; 4] {
    fn from(intervals: ReviewIntervals) -> Self {
        intervals.0
    }
}

impl FromStr for ReviewIntervals {
    type Err = ScheduleError;

    /// Parse a comma-separated list such as `1,3,7,15`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parsed = s
            .split(',')
            .map(|part| {
                part.trim()
                    .parse::<u32>()
                    .map_err(|_| ScheduleError::InvalidIntervals(format!("not a number: {part:?}")))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let days: [u32; 4] = parsed.try_into().map_err(|v: Vec<u32>| {
            ScheduleError::InvalidIntervals(format!("expected 4 intervals, got {}", v.len()))
        })?;
        Self::new(days)
    }
}

impl fmt::Display for ReviewIntervals {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d] = self.0;
        write!(f, "{a},{b},{c},{d}")
    }
}

/// Result of one attempt at a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewOutcome {
    Remembered,
    Forgotten,
    /// Practice mode answer; does not move the card on the ladder.
    Answered,
}

/// Whether a session schedules cards or only records practice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewMode {
    Srs,
    Practice,
}

impl Default for ReviewMode {
    fn default() -> Self {
        Self::Srs
    }
}

impl ReviewMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Srs => "srs",
            Self::Practice => "practice",
        }
    }
}

impl FromStr for ReviewMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "srs" => Ok(Self::Srs),
            "practice" => Ok(Self::Practice),
            other => Err(format!("unknown review mode: {other}")),
        }
    }
}

/// One entry in a card's review history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewRecord {
    pub reviewed_on: NaiveDate,
    pub outcome: ReviewOutcome,
    pub status_before: ReviewStatus,
    pub status_after: ReviewStatus,
}

/// A vocabulary flashcard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub id: String,
    pub word: String,
    pub meaning: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_reviewed_at: Option<NaiveDate>,
    /// Always derived by the scheduler; `None` exactly when the card is Known.
    pub due_date: Option<NaiveDate>,
    pub review_status: ReviewStatus,
    #[serde(default)]
    pub review_history: Vec<ReviewRecord>,
}

/// Partial card update. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CardPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub word: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meaning: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review_status: Option<ReviewStatus>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "double_option"
    )]
    pub due_date: Option<Option<NaiveDate>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "double_option"
    )]
    pub last_reviewed_at: Option<Option<NaiveDate>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review_history: Option<Vec<ReviewRecord>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl CardPatch {
    /// Merge the present fields into `card`.
    pub fn apply(&self, card: &mut Card) {
        if let Some(word) = &self.word {
            card.word = word.clone();
        }
        if let Some(meaning) = &self.meaning {
            card.meaning = meaning.clone();
        }
        if let Some(status) = self.review_status {
            card.review_status = status;
        }
        if let Some(due) = self.due_date {
            card.due_date = due;
        }
        if let Some(last) = self.last_reviewed_at {
            card.last_reviewed_at = last;
        }
        if let Some(history) = &self.review_history {
            card.review_history = history.clone();
        }
        if let Some(updated_at) = self.updated_at {
            card.updated_at = updated_at;
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

// `"due_date": null` must clear the field, not be read as "absent".
fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
