use actix_web::web;

use crate::metrics::metrics_handler;

mod errors;
mod handlers;

// ============================================================================
// HTTP API
// ============================================================================
//
// POST /novo-pedido   create an order (validate, kitchen, persist, notify)
// GET  /listar        persisted orders, most recent first
// GET  /health        liveness plus database probe
// GET  /metrics       Prometheus text format
//
// App data expected: web::Data<OrderCommandHandler> and web::Data<Arc<Metrics>>.
//
// ============================================================================

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/novo-pedido", web::post().to(handlers::create_order))
        .route("/listar", web::get().to(handlers::list_orders))
        .route("/health", web::get().to(handlers::health))
        .route("/metrics", web::get().to(metrics_handler));
}
