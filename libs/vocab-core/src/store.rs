//! Card storage contract and an in-memory implementation.

use crate::error::StoreError;
use crate::types::{Card, CardPatch};
use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// Result type alias for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Document-style card storage.
///
/// `update` merges the present fields of the patch and returns the stored card.
pub trait CardStore: Send + Sync {
    fn find_by_id(&self, id: &str) -> impl Future<Output = StoreResult<Option<Card>>> + Send;

    fn update(&self, id: &str, patch: CardPatch) -> impl Future<Output = StoreResult<Card>> + Send;

    fn insert(&self, card: Card) -> impl Future<Output = StoreResult<Card>> + Send;

    fn remove(&self, id: &str) -> impl Future<Output = StoreResult<()>> + Send;

    fn list(&self) -> impl Future<Output = StoreResult<Vec<Card>>> + Send;
}

impl<S: CardStore> CardStore for Arc<S> {
    fn find_by_id(&self, id: &str) -> impl Future<Output = StoreResult<Option<Card>>> + Send {
        (**self).find_by_id(id)
    }

    fn update(&self, id: &str, patch: CardPatch) -> impl Future<Output = StoreResult<Card>> + Send {
        (**self).update(id, patch)
    }

    fn insert(&self, card: Card) -> impl Future<Output = StoreResult<Card>> + Send {
        (**self).insert(card)
    }

    fn remove(&self, id: &str) -> impl Future<Output = StoreResult<()>> + Send {
        (**self).remove(id)
    }

    fn list(&self) -> impl Future<Output = StoreResult<Vec<Card>>> + Send {
        (**self).list()
    }
}

/// HashMap-backed store.
///
/// Writes can be switched off with [`MemoryCardStore::set_unavailable`] to
/// exercise failure handling.
#[derive(Debug, Default)]
pub struct MemoryCardStore {
    cards: Mutex<HashMap<String, Card>>,
    unavailable: AtomicBool,
}

impl MemoryCardStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with `cards`.
    pub fn with_cards(cards: impl IntoIterator<Item = Card>) -> Self {
        let store = Self::new();
        {
            let mut map = store.cards.lock().expect("store lock");
            for card in cards {
                map.insert(card.id.clone(), card);
            }
        }
        store
    }

    /// Make every subsequent write fail with a backend error.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Synchronous lookup, mainly for assertions.
    pub fn get(&self, id: &str) -> Option<Card> {
        self.cards.lock().expect("store lock").get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.cards.lock().expect("store lock").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn check_available(&self) -> StoreResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            Err(StoreError::Backend("store unavailable".to_string()))
        } else {
            Ok(())
        }
    }
}

impl CardStore for MemoryCardStore {
    async fn find_by_id(&self, id: &str) -> StoreResult<Option<Card>> {
        Ok(self.get(id))
    }

    async fn update(&self, id: &str, patch: CardPatch) -> StoreResult<Card> {
        self.check_available()?;
        let mut cards = self.cards.lock().expect("store lock");
        let card = cards
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        patch.apply(card);
        Ok(card.clone())
    }

    async fn insert(&self, card: Card) -> StoreResult<Card> {
        self.check_available()?;
        let mut cards = self.cards.lock().expect("store lock");
        if cards.contains_key(&card.id) {
            return Err(StoreError::Duplicate(card.id));
        }
        cards.insert(card.id.clone(), card.clone());
        Ok(card)
    }

    async fn remove(&self, id: &str) -> StoreResult<()> {
        self.check_available()?;
        self.cards
            .lock()
            .expect("store lock")
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    async fn list(&self) -> StoreResult<Vec<Card>> {
        let mut cards: Vec<Card> = self.cards.lock().expect("store lock").values().cloned().collect();
        cards.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(cards)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ReviewStatus;
    use chrono::{TimeZone, Utc};

    fn card(id: &str) -> Card {
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        Card {
            id: id.to_string(),
            word: "hund".to_string(),
            meaning: "dog".to_string(),
            created_at: at,
            updated_at: at,
            last_reviewed_at: None,
            due_date: Some(at.date_naive()),
            review_status: ReviewStatus::New,
            review_history: Vec::new(),
        }
    }

    #[tokio::test]
    async fn update_merges_only_present_fields() {
        let store = MemoryCardStore::with_cards([card("a")]);
        let patch = CardPatch {
            review_status: Some(ReviewStatus::Known),
            due_date: Some(None),
            ..Default::default()
        };

        let updated = store.update("a", patch).await.unwrap();
        assert_eq!(updated.review_status, ReviewStatus::Known);
        assert_eq!(updated.due_date, None);
        assert_eq!(updated.word, "hund");
        assert_eq!(store.get("a"), Some(updated));
    }

    #[tokio::test]
    async fn update_missing_card_is_not_found() {
        let store = MemoryCardStore::new();
        let err = store.update("nope", CardPatch::default()).await.unwrap_err();
        assert_eq!(err, StoreError::NotFound("nope".to_string()));
    }

    #[tokio::test]
    async fn insert_rejects_duplicates() {
        let store = MemoryCardStore::new();
        store.insert(card("a")).await.unwrap();
        let err = store.insert(card("a")).await.unwrap_err();
        assert_eq!(err, StoreError::Duplicate("a".to_string()));
    }

    #[tokio::test]
    async fn unavailable_store_fails_writes_but_not_reads() {
        let store = MemoryCardStore::with_cards([card("a")]);
        store.set_unavailable(true);

        assert!(matches!(
            store.update("a", CardPatch::default()).await,
            Err(StoreError::Backend(_))
        ));
        assert!(matches!(store.remove("a").await, Err(StoreError::Backend(_))));
        assert!(store.find_by_id("a").await.unwrap().is_some());

        store.set_unavailable(false);
        store.remove("a").await.unwrap();
        assert!(store.is_empty());
    }
}
