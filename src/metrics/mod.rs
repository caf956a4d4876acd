use actix_web::{web, HttpResponse, Responder};
use prometheus::{
    Encoder, Histogram, HistogramOpts, IntCounter, IntCounterVec, Opts, Registry, TextEncoder,
};
use std::sync::Arc;

// ============================================================================
// Metrics Module - Prometheus metrics for the order workflow
// ============================================================================
//
// Covers:
// - Inbound orders (received, rejected by validation)
// - Kitchen dispatch outcomes and latency
// - Persistence outcomes
// - Notification delivery outcomes
//
// Scraped from GET /metrics on the main HTTP server.
// ============================================================================

pub struct Metrics {
    registry: Registry,

    // Inbound
    pub orders_received: IntCounter,
    pub orders_invalid: IntCounter,

    // Kitchen
    pub kitchen_dispatch: IntCounterVec,
    pub kitchen_dispatch_duration: Histogram,

    // Store
    pub orders_persisted: IntCounterVec,
    pub store_failures: IntCounterVec,

    // Notifications
    pub notifications_sent: IntCounterVec,
}

impl Metrics {
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let orders_received = IntCounter::new(
            "pedidos_received_total",
            "Total create-order requests received",
        )?;
        registry.register(Box::new(orders_received.clone()))?;

        let orders_invalid = IntCounter::new(
            "pedidos_rejected_invalid_total",
            "Create-order requests rejected by validation",
        )?;
        registry.register(Box::new(orders_invalid.clone()))?;

        let kitchen_dispatch = IntCounterVec::new(
            Opts::new("kitchen_dispatch_total", "Kitchen dispatches by outcome"),
            &["outcome"],
        )?;
        registry.register(Box::new(kitchen_dispatch.clone()))?;

        let kitchen_dispatch_duration = Histogram::with_opts(
            HistogramOpts::new("kitchen_dispatch_duration_seconds", "Kitchen round-trip duration")
                .buckets(vec![0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0]),
        )?;
        registry.register(Box::new(kitchen_dispatch_duration.clone()))?;

        let orders_persisted = IntCounterVec::new(
            Opts::new("pedidos_persisted_total", "Orders persisted by stored status"),
            &["status"],
        )?;
        registry.register(Box::new(orders_persisted.clone()))?;

        let store_failures = IntCounterVec::new(
            Opts::new("pedidos_store_failures_total", "Order persistence failures"),
            &["reason"],
        )?;
        registry.register(Box::new(store_failures.clone()))?;

        let notifications_sent = IntCounterVec::new(
            Opts::new("notifications_sent_total", "Notification deliveries by kind and outcome"),
            &["tipo", "outcome"],
        )?;
        registry.register(Box::new(notifications_sent.clone()))?;

        Ok(Self {
            registry,
            orders_received,
            orders_invalid,
            kitchen_dispatch,
            kitchen_dispatch_duration,
            orders_persisted,
            store_failures,
            notifications_sent,
        })
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn record_order_received(&self) {
        self.orders_received.inc();
    }

    pub fn record_invalid_order(&self) {
        self.orders_invalid.inc();
    }

    /// Outcome is one of `accepted`, `rejected`, `other`, `unreachable`, `refused`, `invalid`.
    pub fn record_kitchen_dispatch(&self, outcome: &str, duration_secs: f64) {
        self.kitchen_dispatch.with_label_values(&[outcome]).inc();
        self.kitchen_dispatch_duration.observe(duration_secs);
    }

    pub fn record_order_persisted(&self, status: &str) {
        self.orders_persisted.with_label_values(&[status]).inc();
    }

    pub fn record_store_failure(&self, reason: &str) {
        self.store_failures.with_label_values(&[reason]).inc();
    }

    pub fn record_notification(&self, tipo: &str, success: bool) {
        let outcome = if success { "sent" } else { "failed" };
        self.notifications_sent.with_label_values(&[tipo, outcome]).inc();
    }
}

/// `GET /metrics` in the Prometheus text format.
pub async fn metrics_handler(metrics: web::Data<Arc<Metrics>>) -> impl Responder {
    let encoder = TextEncoder::new();
    let metric_families = metrics.registry().gather();

    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!(error = %e, "Failed to encode metrics");
        return HttpResponse::InternalServerError().finish();
    }

    HttpResponse::Ok()
        .content_type("text/plain; version=0.0.4")
        .body(buffer)
}
