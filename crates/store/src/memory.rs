use async_trait::async_trait;
use tokio::sync::RwLock;

use pinboard_core::Card;

use crate::error::StoreError;
use crate::store::CardStore;

/// In-memory [`CardStore`] for tests and ephemeral deployments.
#[derive(Default)]
pub struct MemoryCardStore {
    cards: RwLock<Vec<Card>>,
}

impl MemoryCardStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CardStore for MemoryCardStore {
    async fn append(&self, card: &Card) -> Result<(), StoreError> {
        self.cards.write().await.push(card.clone());
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<Card>, StoreError> {
        Ok(self.cards.read().await.clone())
    }
}
