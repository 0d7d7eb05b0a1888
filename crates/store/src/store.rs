use async_trait::async_trait;

use pinboard_core::Card;

use crate::error::StoreError;

/// Trait for the durable, append-only record of all cards.
///
/// Implementations must be `Send + Sync` to be shared across request
/// handlers. There is deliberately no update or delete: a card transitions
/// once from "does not exist" to "exists" and stays there.
#[async_trait]
pub trait CardStore: Send + Sync {
    /// Persist one card. The card becomes visible to subsequent
    /// [`list_all`](Self::list_all) calls.
    async fn append(&self, card: &Card) -> Result<(), StoreError>;

    /// Return every stored card in insertion order.
    ///
    /// Records that fail to parse are skipped with a logged warning rather
    /// than failing the whole listing.
    async fn list_all(&self) -> Result<Vec<Card>, StoreError>;
}
