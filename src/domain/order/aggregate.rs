use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::value_objects::{OrderLine, OrderStatus};

// ============================================================================
// Persisted Order - what the store hands back
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedOrder {
    // Identity
    pub id: i64,
    pub pedido_id: String,

    // State
    pub cliente_id: Option<String>,
    pub mesa: Option<i32>,
    pub status: OrderStatus,
    pub total: f64,
    /// Kitchen response kept verbatim as JSON text.
    pub resposta_cozinha: Option<String>,
    pub itens: Vec<OrderLine>,

    // Audit Trail
    #[serde(rename = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "atualizado_em")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Pagination window for listing orders. `None` limit means "everything".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct ListPage {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl ListPage {
    pub fn offset(&self) -> i64 {
        self.offset.unwrap_or(0).max(0)
    }

    pub fn limit(&self) -> Option<i64> {
        self.limit.map(|l| l.max(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_persisted_order_wire_shape() {
        let order = PersistedOrder {
            id: 7,
            pedido_id: "P1".to_string(),
            cliente_id: None,
            mesa: Some(5),
            status: OrderStatus::Accepted,
            total: 60.0,
            resposta_cozinha: Some("{\"status\":\"em_preparo\"}".to_string()),
            itens: vec![OrderLine {
                nome: "Pizza".to_string(),
                quantidade: 2,
                preco: 30.0,
            }],
            created_at: Utc::now(),
            updated_at: None,
        };

        let json = serde_json::to_value(&order).unwrap();
        assert_eq!(json["status"], "em_preparo");
        assert_eq!(json["itens"][0]["quantidade"], 2);
        assert!(json.get("timestamp").is_some());
        assert!(json.get("created_at").is_none());
    }

    #[test]
    fn test_list_page_clamps_negative_values() {
        let page = ListPage {
            limit: Some(-3),
            offset: Some(-1),
        };
        assert_eq!(page.limit(), Some(0));
        assert_eq!(page.offset(), 0);
        assert_eq!(ListPage::default().limit(), None);
    }
}
