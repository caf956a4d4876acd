use std::sync::Arc;
use std::time::Instant;

use tracing::Instrument;
use uuid::Uuid;

use super::commands::CreateOrder;
use super::errors::OrderWorkflowError;
use super::events::OrderNotification;
use super::aggregate::PersistedOrder;
use super::value_objects::{KitchenDecision, KitchenStatus};
use crate::messaging::{KitchenClient, KitchenError, Notifier};
use crate::metrics::Metrics;
use crate::store::{OrderStore, StoreError};

// ============================================================================
// Order Command Handler - the create-order workflow
// ============================================================================
//
// Validate -> notify created -> kitchen -> persist -> notify outcome
//
// - Validation failure: nothing else happens.
// - Kitchen failure: the "created" notification already went out; nothing
//   is persisted and no outcome notification is sent.
// - Store failure: the store rolled back; no outcome notification.
// - Notifications never fail the workflow.
//
// ============================================================================

/// Result of a successful workflow run.
#[derive(Debug, Clone)]
pub struct OrderReceipt {
    pub order: PersistedOrder,
    pub decision: KitchenDecision,
}

pub struct OrderCommandHandler {
    kitchen: Arc<dyn KitchenClient>,
    store: Arc<dyn OrderStore>,
    notifier: Arc<dyn Notifier>,
    metrics: Arc<Metrics>,
}

impl OrderCommandHandler {
    pub fn new(
        kitchen: Arc<dyn KitchenClient>,
        store: Arc<dyn OrderStore>,
        notifier: Arc<dyn Notifier>,
        metrics: Arc<Metrics>,
    ) -> Self {
        Self {
            kitchen,
            store,
            notifier,
            metrics,
        }
    }

    pub fn store(&self) -> &Arc<dyn OrderStore> {
        &self.store
    }

    /// Run the whole workflow for one raw request body.
    pub async fn create_order(&self, body: &[u8]) -> Result<OrderReceipt, OrderWorkflowError> {
        self.metrics.record_order_received();

        let order = match CreateOrder::from_json(body) {
            Ok(order) => order,
            Err(e) => {
                tracing::info!(errors = ?e.errors, "Rejected invalid order payload");
                self.metrics.record_invalid_order();
                return Err(e.into());
            }
        };

        let span = tracing::info_span!(
            "create_order",
            correlation_id = %Uuid::new_v4(),
            pedido_id = %order.pedido_id
        );

        self.handle(order).instrument(span).await
    }

    /// Run the workflow for an already validated order.
    pub async fn handle(&self, order: CreateOrder) -> Result<OrderReceipt, OrderWorkflowError> {
        self.notifier.notify(OrderNotification::created(&order));

        let decision = self.dispatch(&order).await?;

        let persisted = match self.store.create_order(&order, &decision).await {
            Ok(persisted) => persisted,
            Err(e) => {
                let reason = match &e {
                    StoreError::DuplicateOrder(_) => "duplicate",
                    StoreError::StorageUnavailable(_) => "unavailable",
                };
                self.metrics.record_store_failure(reason);
                tracing::error!(error = %e, "Order not persisted");
                return Err(e.into());
            }
        };
        self.metrics.record_order_persisted(persisted.status.as_str());

        match decision.status {
            Some(KitchenStatus::Preparing) => {
                self.notifier.notify(OrderNotification::accepted(&order, &decision))
            }
            Some(KitchenStatus::Refused) => {
                self.notifier.notify(OrderNotification::rejected(&order, &decision))
            }
            Some(KitchenStatus::Other(_)) | None => {
                tracing::debug!(status = ?decision.status, "No outcome notification for kitchen status")
            }
        }

        tracing::info!(
            id = persisted.id,
            status = %persisted.status,
            total = persisted.total,
            "✅ Order processed"
        );

        Ok(OrderReceipt {
            order: persisted,
            decision,
        })
    }

    async fn dispatch(&self, order: &CreateOrder) -> Result<KitchenDecision, KitchenError> {
        let started = Instant::now();
        let result = self.kitchen.dispatch(order).await;

        let outcome = match &result {
            Ok(d) => match d.status {
                Some(KitchenStatus::Preparing) => "accepted",
                Some(KitchenStatus::Refused) => "rejected",
                _ => "other",
            },
            Err(KitchenError::Unreachable(_)) => "unreachable",
            Err(KitchenError::Refused { .. }) => "refused",
            Err(KitchenError::InvalidResponse(_)) => "invalid",
        };
        self.metrics
            .record_kitchen_dispatch(outcome, started.elapsed().as_secs_f64());

        result
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
