use std::time::Duration;

use async_trait::async_trait;

use crate::domain::order::{CreateOrder, KitchenDecision};

// ============================================================================
// Kitchen Client - synchronous hand-off of an order to the kitchen
// ============================================================================
//
// Failure classification:
// - transport failure (timeout, DNS, connection refused) -> Unreachable
// - non-2xx answer                                        -> Refused { code }
// - 2xx answer that is not a kitchen decision            -> InvalidResponse
//
// No retries here. A timed-out call is final for that request.
//
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum KitchenError {
    #[error("Kitchen unreachable: {0}")]
    Unreachable(String),

    #[error("Kitchen refused the order with HTTP {code}")]
    Refused { code: u16 },

    #[error("Kitchen returned an unreadable decision: {0}")]
    InvalidResponse(String),
}

#[async_trait]
pub trait KitchenClient: Send + Sync {
    async fn dispatch(&self, order: &CreateOrder) -> Result<KitchenDecision, KitchenError>;
}

pub struct HttpKitchenClient {
    http: reqwest::Client,
    url: String,
}

impl HttpKitchenClient {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl KitchenClient for HttpKitchenClient {
    async fn dispatch(&self, order: &CreateOrder) -> Result<KitchenDecision, KitchenError> {
        tracing::info!(
            pedido_id = %order.pedido_id,
            url = %self.url,
            "Sending order to kitchen"
        );

        let resp = self
            .http
            .post(&self.url)
            .json(order)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(pedido_id = %order.pedido_id, error = %e, "Kitchen communication error");
                KitchenError::Unreachable(e.to_string())
            })?;

        let status = resp.status();
        if !status.is_success() {
            tracing::error!(
                pedido_id = %order.pedido_id,
                code = status.as_u16(),
                "Kitchen answered with an error status"
            );
            return Err(KitchenError::Refused {
                code: status.as_u16(),
            });
        }

        // A body that times out mid-read is still a transport failure.
        let body = resp.bytes().await.map_err(|e| {
            if e.is_timeout() {
                KitchenError::Unreachable(e.to_string())
            } else {
                KitchenError::InvalidResponse(e.to_string())
            }
        })?;

        let raw: serde_json::Value = serde_json::from_slice(&body)
            .map_err(|e| KitchenError::InvalidResponse(e.to_string()))?;
        let decision = KitchenDecision::from_value(raw)
            .map_err(|e| KitchenError::InvalidResponse(e.to_string()))?;

        tracing::info!(
            pedido_id = %order.pedido_id,
            status = ?decision.status,
            tempo_estimado_min = ?decision.tempo_estimado_min,
            "✅ Kitchen decision received"
        );

        Ok(decision)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
