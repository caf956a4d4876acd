use std::sync::Arc;

use actix_web::{middleware, web, App, HttpServer};
use anyhow::Context;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod api;
mod config;
mod domain;
mod health;
mod messaging;
mod metrics;
mod store;

use config::{Settings, StoreBackend};
use domain::order::OrderCommandHandler;
use messaging::{HttpKitchenClient, HttpNotifier};
use store::{InMemoryOrderStore, OrderStore, PgOrderStore};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // .env is optional; real environment variables take precedence
    let _ = dotenvy::dotenv();

    // Default to INFO level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_thread_ids(true))
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,pedidos_service=debug")),
        )
        .init();

    tracing::info!("🚀 Starting orders service");

    // === 1. Settings ===
    let settings = Settings::load().context("failed to load settings")?;
    tracing::info!(
        kitchen_host = %settings.kitchen.host,
        kitchen_port = settings.kitchen.port,
        notification_url = %settings.notification_url,
        bind = %settings.bind_addr,
        "Settings loaded"
    );

    // === 2. Order store ===
    let store: Arc<dyn OrderStore> = match settings.store_backend {
        StoreBackend::Postgres => {
            tracing::info!("Connecting to PostgreSQL...");
            let store =
                PgOrderStore::connect(&settings.database_url, settings.db_max_connections).await?;
            store.ensure_schema().await?;
            tracing::info!("✅ Database schema ready");
            Arc::new(store)
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory order store; orders are lost on restart");
            Arc::new(InMemoryOrderStore::new())
        }
    };

    // === 3. Prometheus metrics ===
    let metrics = Arc::new(metrics::Metrics::new()?);
    tracing::info!(
        "📊 Metrics registry created with {} metrics",
        metrics.registry().gather().len()
    );

    // === 4. Outbound adapters ===
    let kitchen = HttpKitchenClient::new(settings.kitchen_url.clone(), settings.outbound_timeout)
        .context("failed to build kitchen HTTP client")?;
    tracing::info!(url = %kitchen.url(), "🍳 Kitchen client ready");
    let notifier = HttpNotifier::new(
        settings.notification_url.clone(),
        settings.outbound_timeout,
        metrics.clone(),
    )
    .context("failed to build notification HTTP client")?;

    // === 5. Workflow ===
    let handler = web::Data::new(OrderCommandHandler::new(
        Arc::new(kitchen),
        store,
        Arc::new(notifier),
        metrics.clone(),
    ));
    let metrics = web::Data::new(metrics);

    // === 6. HTTP server ===
    tracing::info!(addr = %settings.bind_addr, "🌐 Listening");
    HttpServer::new(move || {
        App::new()
            .wrap(middleware::Logger::default())
            .app_data(handler.clone())
            .app_data(metrics.clone())
            .configure(api::configure)
    })
    .bind(settings.bind_addr)
    .with_context(|| format!("failed to bind {}", settings.bind_addr))?
    .run()
    .await?;

    tracing::info!("👋 Orders service stopped");

    Ok(())
}
