use std::collections::HashMap;

use anyhow::Context;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::Row;

use super::{OrderStore, StoreError};
use crate::domain::order::{
    CreateOrder, KitchenDecision, ListPage, OrderLine, OrderStatus, PersistedOrder,
};

// ============================================================================
// PostgreSQL Order Store
// ============================================================================
//
// Tables:
// - pedidos       one row per order, unique on pedido_id
// - itens_pedido  line items, FK to pedidos(id) with cascade delete
//
// create_order runs inside a single transaction. Any early return drops the
// transaction, which rolls it back, so an order row never exists without
// its lines.
//
// ============================================================================

const CREATE_PEDIDOS: &str = r#"
    CREATE TABLE IF NOT EXISTS pedidos (
        id SERIAL PRIMARY KEY,
        pedido_id TEXT NOT NULL UNIQUE,
        cliente_id TEXT,
        mesa INTEGER,
        status TEXT NOT NULL DEFAULT 'processando',
        total DOUBLE PRECISION NOT NULL,
        resposta_cozinha TEXT,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at TIMESTAMPTZ
    )
"#;

const CREATE_ITENS_PEDIDO: &str = r#"
    CREATE TABLE IF NOT EXISTS itens_pedido (
        id SERIAL PRIMARY KEY,
        pedido_id_fk INTEGER NOT NULL REFERENCES pedidos(id) ON DELETE CASCADE,
        nome TEXT NOT NULL,
        quantidade INTEGER NOT NULL,
        preco DOUBLE PRECISION NOT NULL
    )
"#;

const CREATE_ITENS_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS itens_pedido_pedido_id_fk_idx ON itens_pedido (pedido_id_fk)";

pub struct PgOrderStore {
    pool: PgPool,
}

impl PgOrderStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(url: &str, max_connections: u32) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(url)
            .await
            .context("failed to connect to Postgres")?;

        Ok(Self::new(pool))
    }

    /// Create the order tables if they are missing. Idempotent.
    pub async fn ensure_schema(&self) -> anyhow::Result<()> {
        for statement in [CREATE_PEDIDOS, CREATE_ITENS_PEDIDO, CREATE_ITENS_INDEX] {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .context("failed to create order tables")?;
        }

        tracing::info!("✅ Order tables ready");
        Ok(())
    }

    async fn load_lines(&self, order_ids: &[i32]) -> Result<HashMap<i32, Vec<OrderLine>>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT pedido_id_fk, nome, quantidade, preco
            FROM itens_pedido
            WHERE pedido_id_fk = ANY($1)
            ORDER BY id ASC
            "#,
        )
        .bind(order_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(unavailable)?;

        let mut lines: HashMap<i32, Vec<OrderLine>> = HashMap::new();
        for row in rows {
            let fk: i32 = row.try_get("pedido_id_fk").map_err(unavailable)?;
            lines.entry(fk).or_default().push(OrderLine {
                nome: row.try_get("nome").map_err(unavailable)?,
                quantidade: row.try_get("quantidade").map_err(unavailable)?,
                preco: row.try_get("preco").map_err(unavailable)?,
            });
        }

        Ok(lines)
    }
}

#[async_trait]
impl OrderStore for PgOrderStore {
    async fn create_order(
        &self,
        order: &CreateOrder,
        decision: &KitchenDecision,
    ) -> Result<PersistedOrder, StoreError> {
        let status = decision.order_status();
        let total = order.total();
        let resposta_cozinha = decision.raw.to_string();

        let mut tx = self.pool.begin().await.map_err(unavailable)?;

        let row = sqlx::query(
            r#"
            INSERT INTO pedidos (pedido_id, cliente_id, mesa, status, total, resposta_cozinha, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, now())
            RETURNING id, created_at, updated_at
            "#,
        )
        .bind(&order.pedido_id)
        .bind(&order.cliente_id)
        .bind(order.mesa)
        .bind(status.as_str())
        .bind(total)
        .bind(&resposta_cozinha)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| classify(e, &order.pedido_id))?;

        let id: i32 = row.try_get("id").map_err(unavailable)?;
        let created_at: DateTime<Utc> = row.try_get("created_at").map_err(unavailable)?;
        let updated_at: Option<DateTime<Utc>> = row.try_get("updated_at").map_err(unavailable)?;

        for item in &order.itens {
            sqlx::query(
                "INSERT INTO itens_pedido (pedido_id_fk, nome, quantidade, preco) VALUES ($1, $2, $3, $4)",
            )
            .bind(id)
            .bind(&item.nome)
            .bind(item.quantidade)
            .bind(item.preco)
            .execute(&mut *tx)
            .await
            .map_err(unavailable)?;
        }

        tx.commit().await.map_err(unavailable)?;

        tracing::info!(
            pedido_id = %order.pedido_id,
            id = id,
            status = %status,
            total = total,
            item_count = order.itens.len(),
            "💾 Order saved to PostgreSQL"
        );

        Ok(PersistedOrder {
            id: i64::from(id),
            pedido_id: order.pedido_id.clone(),
            cliente_id: order.cliente_id.clone(),
            mesa: order.mesa,
            status,
            total,
            resposta_cozinha: Some(resposta_cozinha),
            itens: order.itens.clone(),
            created_at,
            updated_at,
        })
    }

    async fn list_orders(&self, page: ListPage) -> Result<Vec<PersistedOrder>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, pedido_id, cliente_id, mesa, status, total, resposta_cozinha, created_at, updated_at
            FROM pedidos
            ORDER BY created_at DESC, id DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(unavailable)?;

        let ids = rows
            .iter()
            .map(|row| row.try_get::<i32, _>("id"))
            .collect::<Result<Vec<_>, _>>()
            .map_err(unavailable)?;
        let mut lines = self.load_lines(&ids).await?;

        let orders = rows
            .into_iter()
            .map(|row| order_from_row(&row, &mut lines))
            .collect::<Result<Vec<_>, _>>()
            .map_err(unavailable)?;

        tracing::debug!(count = orders.len(), "📋 Listed orders from PostgreSQL");
        Ok(orders)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(unavailable)?;
        Ok(())
    }
}

fn order_from_row(
    row: &PgRow,
    lines: &mut HashMap<i32, Vec<OrderLine>>,
) -> Result<PersistedOrder, sqlx::Error> {
    let id: i32 = row.try_get("id")?;
    let status: String = row.try_get("status")?;

    Ok(PersistedOrder {
        id: i64::from(id),
        pedido_id: row.try_get("pedido_id")?,
        cliente_id: row.try_get("cliente_id")?,
        mesa: row.try_get("mesa")?,
        status: OrderStatus::parse(&status),
        total: row.try_get("total")?,
        resposta_cozinha: row.try_get("resposta_cozinha")?,
        itens: lines.remove(&id).unwrap_or_default(),
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn classify(err: sqlx::Error, pedido_id: &str) -> StoreError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            tracing::warn!(pedido_id = %pedido_id, "Duplicate order id");
            StoreError::DuplicateOrder(pedido_id.to_string())
        }
        _ => unavailable(err),
    }
}

fn unavailable(err: sqlx::Error) -> StoreError {
    tracing::error!(error = %err, "Order store failure");
    StoreError::StorageUnavailable(err.to_string())
}

// ============================================================================
// Integration Tests (need a live PostgreSQL at DATABASE_URL)
// ============================================================================
