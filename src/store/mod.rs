use async_trait::async_trait;

use crate::domain::order::{CreateOrder, KitchenDecision, ListPage, PersistedOrder};

mod memory;
mod postgres;

pub use memory::InMemoryOrderStore;
pub use postgres::PgOrderStore;

// ============================================================================
// Order Store - transactional persistence of orders and their lines
// ============================================================================
//
// Contract shared by every implementation:
// 1. An order and all of its lines are written as one unit, or not at all.
// 2. total = sum(quantidade * preco) over the submitted lines.
// 3. Stored status comes from the kitchen decision (processando if none).
// 4. A second order with the same `pedido_id` fails with DuplicateOrder and
//    leaves the first untouched.
// 5. Listing returns most recently created first.
//
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Order already exists: {0}")]
    DuplicateOrder(String),

    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),
}

#[async_trait]
pub trait OrderStore: Send + Sync {
    async fn create_order(
        &self,
        order: &CreateOrder,
        decision: &KitchenDecision,
    ) -> Result<PersistedOrder, StoreError>;

    async fn list_orders(&self, page: ListPage) -> Result<Vec<PersistedOrder>, StoreError>;

    /// Connectivity probe backing `/health`.
    async fn ping(&self) -> Result<(), StoreError>;
}
