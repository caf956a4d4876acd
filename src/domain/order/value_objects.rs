use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

// ============================================================================
// Order Value Objects
// ============================================================================

/// One product/quantity/price tuple belonging to exactly one order.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct OrderLine {
    pub nome: String,
    pub quantidade: i32,
    pub preco: f64,
}

impl OrderLine {
    pub fn subtotal(&self) -> f64 {
        f64::from(self.quantidade) * self.preco
    }
}

/// Sum of quantity x price over the given lines.
pub fn order_total(lines: &[OrderLine]) -> f64 {
    lines.iter().map(OrderLine::subtotal).sum()
}

/// Stored order status.
///
/// `Processing` is the initial state; the kitchen decision is the only thing
/// that moves an order to `Accepted` or `Rejected`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderStatus {
    #[serde(rename = "processando")]
    Processing,
    #[serde(rename = "em_preparo")]
    Accepted,
    #[serde(rename = "recusado")]
    Rejected,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Processing => "processando",
            OrderStatus::Accepted => "em_preparo",
            OrderStatus::Rejected => "recusado",
        }
    }

    /// Parse a stored status column. Unknown values fall back to `Processing`.
    pub fn parse(s: &str) -> Self {
        match s {
            "em_preparo" => OrderStatus::Accepted,
            "recusado" => OrderStatus::Rejected,
            _ => OrderStatus::Processing,
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Kitchen Decision
// ============================================================================

/// Status field of the kitchen's reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KitchenStatus {
    /// `em_preparo`: accepted and being prepared.
    Preparing,
    /// `recusado`: declined.
    Refused,
    Other(String),
}

impl From<String> for KitchenStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "em_preparo" => KitchenStatus::Preparing,
            "recusado" => KitchenStatus::Refused,
            _ => KitchenStatus::Other(s),
        }
    }
}

/// Known fields of the kitchen's reply. Each one is read leniently: a value
/// of an unexpected type becomes `None` instead of failing the decision.
#[derive(Debug, Deserialize)]
struct KitchenReply {
    #[serde(default, deserialize_with = "lenient_text")]
    status: Option<String>,
    #[serde(default, deserialize_with = "lenient_minutes")]
    tempo_estimado_min: Option<u32>,
    #[serde(default, deserialize_with = "lenient_text")]
    motivo: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    cozinheiro_responsavel: Option<String>,
}

fn lenient_text<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

/// Whole minutes from a number or a numeric string; fractions are rounded,
/// negatives and garbage are dropped.
fn lenient_minutes<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u32>, D::Error> {
    let minutes = match Value::deserialize(d)? {
        Value::Number(n) => n.as_u64().or_else(|| n.as_f64().and_then(round_minutes)),
        Value::String(s) => s.trim().parse::<f64>().ok().and_then(round_minutes),
        _ => None,
    };
    Ok(minutes.and_then(|m| u32::try_from(m).ok()))
}

fn round_minutes(f: f64) -> Option<u64> {
    (f.is_finite() && f >= 0.0).then(|| f.round() as u64)
}

/// The kitchen's structured answer to a dispatch.
#[derive(Debug, Clone, PartialEq)]
pub struct KitchenDecision {
    pub status: Option<KitchenStatus>,
    pub tempo_estimado_min: Option<u32>,
    pub motivo: Option<String>,
    pub cozinheiro_responsavel: Option<String>,
    /// Reply exactly as received, for audit and storage.
    pub raw: serde_json::Value,
}

impl KitchenDecision {
    /// Fails only when the reply is not a JSON object.
    pub fn from_value(raw: serde_json::Value) -> Result<Self, serde_json::Error> {
        if !raw.is_object() {
            return Err(serde::de::Error::custom("kitchen reply is not a JSON object"));
        }
        let reply = KitchenReply::deserialize(&raw)?;
        Ok(Self {
            status: reply.status.map(KitchenStatus::from),
            tempo_estimado_min: reply.tempo_estimado_min,
            motivo: reply.motivo,
            cozinheiro_responsavel: reply.cozinheiro_responsavel,
            raw,
        })
    }

    /// Status to store for an order that received this decision.
    pub fn order_status(&self) -> OrderStatus {
        match self.status {
            Some(KitchenStatus::Preparing) => OrderStatus::Accepted,
            Some(KitchenStatus::Refused) => OrderStatus::Rejected,
            Some(KitchenStatus::Other(_)) | None => OrderStatus::Processing,
        }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn line(nome: &str, quantidade: i32, preco: f64) -> OrderLine {
        OrderLine {
            nome: nome.to_string(),
            quantidade,
            preco,
        }
    }

    #[test]
    fn test_order_total_sums_quantity_times_price() {
        let lines = vec![line("Pizza", 2, 30.0), line("Refrigerante", 3, 5.5)];
        assert_eq!(order_total(&lines), 76.5);
    }

    #[test]
    fn test_order_total_of_free_items_is_zero() {
        let lines = vec![line("Agua", 4, 0.0)];
        assert_eq!(order_total(&lines), 0.0);
    }

    #[test]
    fn test_order_status_wire_names() {
        assert_eq!(
            serde_json::to_string(&OrderStatus::Accepted).unwrap(),
            "\"em_preparo\""
        );
        assert_eq!(
            serde_json::to_string(&OrderStatus::Processing).unwrap(),
            "\"processando\""
        );
    }

    #[test]
    fn test_order_status_parse_matches_as_str() {
        for status in [
            OrderStatus::Processing,
            OrderStatus::Accepted,
            OrderStatus::Rejected,
        ] {
            assert_eq!(OrderStatus::parse(status.as_str()), status);
        }
        assert_eq!(OrderStatus::parse("enviado_para_cozinha"), OrderStatus::Processing);
    }

    #[test]
    fn test_kitchen_decision_accepted() {
        let decision = KitchenDecision::from_value(serde_json::json!({
            "status": "em_preparo",
            "tempo_estimado_min": 20,
            "cozinheiro_responsavel": "Ana"
        }))
        .unwrap();

        assert_eq!(decision.status, Some(KitchenStatus::Preparing));
        assert_eq!(decision.tempo_estimado_min, Some(20));
        assert_eq!(decision.cozinheiro_responsavel.as_deref(), Some("Ana"));
        assert_eq!(decision.order_status(), OrderStatus::Accepted);
    }

    #[test]
    fn test_kitchen_decision_keeps_raw_payload() {
        let raw = serde_json::json!({
            "status": "recusado",
            "motivo": "Recusado por falta de estoque",
            "extra": [1, 2, 3]
        });
        let decision = KitchenDecision::from_value(raw.clone()).unwrap();

        assert_eq!(decision.order_status(), OrderStatus::Rejected);
        assert_eq!(decision.raw, raw);
    }

    #[test]
    fn test_kitchen_decision_without_known_status_stays_processing() {
        let missing = KitchenDecision::from_value(serde_json::json!({})).unwrap();
        assert_eq!(missing.status, None);
        assert_eq!(missing.order_status(), OrderStatus::Processing);

        let other = KitchenDecision::from_value(serde_json::json!({"status": "na_fila"})).unwrap();
        assert_eq!(other.status, Some(KitchenStatus::Other("na_fila".to_string())));
        assert_eq!(other.order_status(), OrderStatus::Processing);
    }

    #[test]
    fn test_kitchen_decision_rejects_non_object() {
        assert!(KitchenDecision::from_value(serde_json::json!("ok")).is_err());
        assert!(KitchenDecision::from_value(serde_json::json!([])).is_err());
    }

    #[test]
    fn test_kitchen_decision_tolerates_odd_estimates() {
        let cases = [
            (serde_json::json!(12.5), Some(13)),
            (serde_json::json!("20"), Some(20)),
            (serde_json::json!(-1), None),
            (serde_json::json!("logo"), None),
            (serde_json::json!(null), None),
        ];

        for (estimate, expected) in cases {
            let raw = serde_json::json!({"status": "em_preparo", "tempo_estimado_min": estimate});
            let decision = KitchenDecision::from_value(raw.clone()).unwrap();

            assert_eq!(decision.order_status(), OrderStatus::Accepted, "{raw}");
            assert_eq!(decision.tempo_estimado_min, expected, "{raw}");
            assert_eq!(decision.raw, raw);
        }
    }

    #[test]
    fn test_kitchen_decision_ignores_mistyped_text_fields() {
        let decision = KitchenDecision::from_value(serde_json::json!({
            "status": "recusado",
            "motivo": 42,
            "cozinheiro_responsavel": {"nome": "Ana"}
        }))
        .unwrap();

        assert_eq!(decision.order_status(), OrderStatus::Rejected);
        assert_eq!(decision.motivo, None);
        assert_eq!(decision.cozinheiro_responsavel, None);
    }
}
