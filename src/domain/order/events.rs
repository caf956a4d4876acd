use serde::{Deserialize, Serialize};
use serde_json::json;

use super::commands::CreateOrder;
use super::value_objects::KitchenDecision;

// ============================================================================
// Order Notification Events
// ============================================================================
//
// Write-once events handed to the external notification service. This
// service only produces them; it never reads them back.
//
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotificationKind {
    #[serde(rename = "pedido_criado")]
    OrderCreated,
    #[serde(rename = "pedido_aceito")]
    OrderAccepted,
    #[serde(rename = "pedido_recusado")]
    OrderRejected,
    #[serde(rename = "pedido_concluido")]
    OrderCompleted,
    #[serde(rename = "sistema")]
    System,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::OrderCreated => "pedido_criado",
            NotificationKind::OrderAccepted => "pedido_aceito",
            NotificationKind::OrderRejected => "pedido_recusado",
            NotificationKind::OrderCompleted => "pedido_concluido",
            NotificationKind::System => "sistema",
        }
    }
}

/// Body of `POST /notificar`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderNotification {
    pub pedido_id: String,
    pub tipo: NotificationKind,
    pub mensagem: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detalhes: Option<serde_json::Value>,
}

impl OrderNotification {
    pub fn new(pedido_id: impl Into<String>, tipo: NotificationKind, mensagem: impl Into<String>) -> Self {
        Self {
            pedido_id: pedido_id.into(),
            tipo,
            mensagem: mensagem.into(),
            detalhes: None,
        }
    }

    pub fn with_details(mut self, detalhes: serde_json::Value) -> Self {
        self.detalhes = Some(detalhes);
        self
    }

    /// Emitted once the request passed validation.
    pub fn created(order: &CreateOrder) -> Self {
        let mesa = order
            .mesa
            .map(|m| m.to_string())
            .unwrap_or_else(|| "-".to_string());
        let itens: Vec<_> = order
            .itens
            .iter()
            .map(|item| json!({"nome": item.nome, "quantidade": item.quantidade}))
            .collect();

        Self::new(
            &order.pedido_id,
            NotificationKind::OrderCreated,
            format!("Novo pedido criado para mesa {mesa}"),
        )
        .with_details(json!({
            "mesa": order.mesa,
            "cliente_id": order.cliente_id,
            "total_itens": order.itens.len(),
            "itens": itens,
        }))
    }

    /// Emitted after the kitchen accepted the order.
    pub fn accepted(order: &CreateOrder, decision: &KitchenDecision) -> Self {
        let tempo = decision
            .tempo_estimado_min
            .map(|t| t.to_string())
            .unwrap_or_else(|| "N/A".to_string());

        Self::new(
            &order.pedido_id,
            NotificationKind::OrderAccepted,
            format!("Pedido aceito e em preparação (Tempo estimado: {tempo} min)"),
        )
        .with_details(json!({
            "tempo_estimado": decision.tempo_estimado_min,
            "cozinheiro": decision.cozinheiro_responsavel,
            "mesa": order.mesa,
        }))
    }

    /// Emitted after the kitchen declined the order.
    pub fn rejected(order: &CreateOrder, decision: &KitchenDecision) -> Self {
        let motivo = decision
            .motivo
            .as_deref()
            .unwrap_or("Motivo não especificado");

        Self::new(
            &order.pedido_id,
            NotificationKind::OrderRejected,
            format!("Pedido recusado: {motivo}"),
        )
        .with_details(json!({
            "motivo": decision.motivo,
            "mesa": order.mesa,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::order::OrderLine;

    fn order() -> CreateOrder {
        CreateOrder {
            pedido_id: "P1".to_string(),
            itens: vec![OrderLine {
                nome: "Pizza".to_string(),
                quantidade: 2,
                preco: 30.0,
            }],
            cliente_id: Some("C7".to_string()),
            mesa: Some(5),
            prioridade: None,
        }
    }

    #[test]
    fn test_created_notification_lists_items_without_prices() {
        let n = OrderNotification::created(&order());
        assert_eq!(n.tipo, NotificationKind::OrderCreated);
        assert_eq!(n.mensagem, "Novo pedido criado para mesa 5");

        let detalhes = n.detalhes.unwrap();
        assert_eq!(detalhes["total_itens"], 1);
        assert_eq!(detalhes["cliente_id"], "C7");
        assert_eq!(detalhes["itens"][0], json!({"nome": "Pizza", "quantidade": 2}));
    }

    #[test]
    fn test_accepted_notification_carries_estimate() {
        let decision = KitchenDecision::from_value(json!({
            "status": "em_preparo",
            "tempo_estimado_min": 20,
            "cozinheiro_responsavel": "Ana"
        }))
        .unwrap();

        let n = OrderNotification::accepted(&order(), &decision);
        assert!(n.mensagem.contains("20"));
        let detalhes = n.detalhes.unwrap();
        assert_eq!(detalhes["tempo_estimado"], 20);
        assert_eq!(detalhes["cozinheiro"], "Ana");
    }

    #[test]
    fn test_rejected_notification_defaults_reason() {
        let decision = KitchenDecision::from_value(json!({"status": "recusado"})).unwrap();
        let n = OrderNotification::rejected(&order(), &decision);
        assert_eq!(n.mensagem, "Pedido recusado: Motivo não especificado");
    }

    #[test]
    fn test_wire_shape_uses_portuguese_kind() {
        let n = OrderNotification::new("P2", NotificationKind::System, "ok");
        let json = serde_json::to_value(&n).unwrap();
        assert_eq!(json, json!({"pedido_id": "P2", "tipo": "sistema", "mensagem": "ok"}));
    }
}
