use actix_web::{web, HttpResponse};
use serde_json::json;

use crate::domain::order::{ListPage, OrderCommandHandler, OrderWorkflowError};
use crate::health::{check_database, HealthStatus};

// ============================================================================
// Request Handlers
// ============================================================================

/// `POST /novo-pedido`
///
/// The raw body goes to the workflow untouched so that schema errors come
/// back as field-level `detalhes` instead of a generic JSON extractor error.
pub async fn create_order(
    handler: web::Data<OrderCommandHandler>,
    body: web::Bytes,
) -> Result<HttpResponse, OrderWorkflowError> {
    let receipt = handler.create_order(&body).await?;
    let order = &receipt.order;

    Ok(HttpResponse::Ok().json(json!({
        "status": "enviado_para_cozinha",
        "resposta_cozinha": receipt.decision.raw,
        "id": order.id,
        "pedido_id": order.pedido_id,
        "status_pedido": order.status,
        "total": order.total,
        "criado_em": order.created_at,
    })))
}

/// `GET /listar?limit=&offset=`
pub async fn list_orders(
    handler: web::Data<OrderCommandHandler>,
    page: web::Query<ListPage>,
) -> Result<HttpResponse, OrderWorkflowError> {
    let orders = handler.store().list_orders(page.into_inner()).await?;

    tracing::info!(count = orders.len(), "📋 Listing orders");

    Ok(HttpResponse::Ok().json(orders))
}

/// `GET /health`
pub async fn health(handler: web::Data<OrderCommandHandler>) -> HttpResponse {
    let database = check_database(handler.store().as_ref()).await;
    tracing::debug!(
        component = %database.name,
        healthy = database.status.is_healthy(),
        checked_at = %database.last_check,
        "Health probe finished"
    );

    match database.status {
        HealthStatus::Healthy => HttpResponse::Ok().json(json!({
            "status": "ok",
            "message": "Pedidos service is running",
            "database": "connected",
        })),
        HealthStatus::Unhealthy(reason) => HttpResponse::ServiceUnavailable().json(json!({
            "status": "degraded",
            "message": format!("Database unreachable: {reason}"),
            "database": "disconnected",
        })),
    }
}
