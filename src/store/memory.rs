use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::{OrderStore, StoreError};
use crate::domain::order::{CreateOrder, KitchenDecision, ListPage, PersistedOrder};

// ============================================================================
// In-Memory Order Store
// ============================================================================
//
// Same contract as the Postgres store. The write lock covers the duplicate
// check and the insert, which is this store's transaction boundary.
//
// ============================================================================

#[derive(Default)]
pub struct InMemoryOrderStore {
    orders: RwLock<Vec<PersistedOrder>>,
}

impl InMemoryOrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.orders.read().await.len()
    }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn create_order(
        &self,
        order: &CreateOrder,
        decision: &KitchenDecision,
    ) -> Result<PersistedOrder, StoreError> {
        let mut orders = self.orders.write().await;

        if orders.iter().any(|o| o.pedido_id == order.pedido_id) {
            return Err(StoreError::DuplicateOrder(order.pedido_id.clone()));
        }

        let now = Utc::now();
        let persisted = PersistedOrder {
            id: orders.len() as i64 + 1,
            pedido_id: order.pedido_id.clone(),
            cliente_id: order.cliente_id.clone(),
            mesa: order.mesa,
            status: decision.order_status(),
            total: order.total(),
            resposta_cozinha: Some(decision.raw.to_string()),
            itens: order.itens.clone(),
            created_at: now,
            updated_at: Some(now),
        };

        orders.push(persisted.clone());

        tracing::debug!(
            pedido_id = %persisted.pedido_id,
            id = persisted.id,
            "Stored order in memory"
        );

        Ok(persisted)
    }

    async fn list_orders(&self, page: ListPage) -> Result<Vec<PersistedOrder>, StoreError> {
        let orders = self.orders.read().await;

        // Insertion order is creation order; ids break timestamp ties.
        let newest_first = orders.iter().rev().skip(page.offset() as usize);
        let listed = match page.limit() {
            Some(limit) => newest_first.take(limit as usize).cloned().collect(),
            None => newest_first.cloned().collect(),
        };

        Ok(listed)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::order::{OrderLine, OrderStatus};
    use serde_json::json;

    fn order(pedido_id: &str, itens: Vec<(&str, i32, f64)>) -> CreateOrder {
        CreateOrder {
            pedido_id: pedido_id.to_string(),
            itens: itens
                .into_iter()
                .map(|(nome, quantidade, preco)| OrderLine {
                    nome: nome.to_string(),
                    quantidade,
                    preco,
                })
                .collect(),
            cliente_id: None,
            mesa: Some(5),
            prioridade: None,
        }
    }

    fn decision(value: serde_json::Value) -> KitchenDecision {
        KitchenDecision::from_value(value).unwrap()
    }

    #[tokio::test]
    async fn test_create_computes_total_and_status() {
        let store = InMemoryOrderStore::new();
        let persisted = store
            .create_order(
                &order("P1", vec![("Pizza", 2, 30.0), ("Suco", 1, 8.0)]),
                &decision(json!({"status": "em_preparo", "tempo_estimado_min": 20})),
            )
            .await
            .unwrap();

        assert_eq!(persisted.total, 68.0);
        assert_eq!(persisted.status, OrderStatus::Accepted);
        assert_eq!(persisted.itens.len(), 2);
        assert!(persisted.resposta_cozinha.unwrap().contains("em_preparo"));
    }

    #[tokio::test]
    async fn test_missing_decision_status_defaults_to_processing() {
        let store = InMemoryOrderStore::new();
        let persisted = store
            .create_order(&order("P1", vec![("Pizza", 1, 30.0)]), &decision(json!({})))
            .await
            .unwrap();

        assert_eq!(persisted.status, OrderStatus::Processing);
    }

    #[tokio::test]
    async fn test_duplicate_order_is_rejected_and_first_kept() {
        let store = InMemoryOrderStore::new();
        let first = store
            .create_order(
                &order("P1", vec![("Pizza", 1, 30.0)]),
                &decision(json!({"status": "em_preparo"})),
            )
            .await
            .unwrap();

        let err = store
            .create_order(
                &order("P1", vec![("Lasanha", 3, 40.0)]),
                &decision(json!({"status": "recusado"})),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, StoreError::DuplicateOrder(ref id) if id == "P1"));
        let listed = store.list_orders(ListPage::default()).await.unwrap();
        assert_eq!(listed, vec![first]);
    }

    #[tokio::test]
    async fn test_list_is_newest_first_and_paginates() {
        let store = InMemoryOrderStore::new();
        for id in ["P1", "P2", "P3"] {
            store
                .create_order(&order(id, vec![("Pizza", 1, 1.0)]), &decision(json!({})))
                .await
                .unwrap();
        }

        let all = store.list_orders(ListPage::default()).await.unwrap();
        let ids: Vec<_> = all.iter().map(|o| o.pedido_id.as_str()).collect();
        assert_eq!(ids, vec!["P3", "P2", "P1"]);

        let page = store
            .list_orders(ListPage {
                limit: Some(1),
                offset: Some(1),
            })
            .await
            .unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].pedido_id, "P2");
    }
}
