use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::sync::Semaphore;
use tokio::task::JoinHandle;

use crate::domain::order::OrderNotification;
use crate::metrics::Metrics;

// ============================================================================
// Notification Dispatcher - best-effort, fire-and-forget
// ============================================================================
//
// `notify` never blocks and never fails from the caller's point of view.
// Every notification is delivered by its own task, so a slow sink only
// delays the order it belongs to. Sends for the same order are chained:
// each one waits for the previous send of that order before going out.
// At most MAX_PENDING deliveries are held at once; beyond that new
// notifications are dropped with a warning. Delivery failures are logged
// and counted, nothing else.
//
// ============================================================================

pub const MAX_PENDING: usize = 1024;

#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    #[error("Notification transport failure: {0}")]
    Transport(String),

    #[error("Notification service answered HTTP {code}")]
    Rejected { code: u16 },
}

pub trait Notifier: Send + Sync {
    fn notify(&self, notification: OrderNotification);
}

/// Last in-flight send of one order, tagged so its task can tell whether
/// a newer send replaced it.
struct Tail {
    seq: u64,
    handle: JoinHandle<()>,
}

#[derive(Default)]
struct Tails {
    next_seq: u64,
    by_order: HashMap<String, Tail>,
}

pub struct HttpNotifier {
    http: reqwest::Client,
    url: Arc<str>,
    metrics: Arc<Metrics>,
    pending: Arc<Semaphore>,
    tails: Arc<Mutex<Tails>>,
}

impl HttpNotifier {
    pub fn new(
        url: impl Into<String>,
        timeout: Duration,
        metrics: Arc<Metrics>,
    ) -> Result<Self, reqwest::Error> {
        Self::with_capacity(url, timeout, metrics, MAX_PENDING)
    }

    pub fn with_capacity(
        url: impl Into<String>,
        timeout: Duration,
        metrics: Arc<Metrics>,
        max_pending: usize,
    ) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        let url: String = url.into();
        tracing::info!(url = %url, max_pending, "Notification dispatcher ready");

        Ok(Self {
            http,
            url: url.into(),
            metrics,
            pending: Arc::new(Semaphore::new(max_pending)),
            tails: Arc::new(Mutex::new(Tails::default())),
        })
    }
}

impl Notifier for HttpNotifier {
    fn notify(&self, notification: OrderNotification) {
        let permit = match self.pending.clone().try_acquire_owned() {
            Ok(permit) => permit,
            Err(_) => {
                tracing::warn!(
                    pedido_id = %notification.pedido_id,
                    tipo = notification.tipo.as_str(),
                    "Notification dropped: too many deliveries pending"
                );
                self.metrics
                    .record_notification(notification.tipo.as_str(), false);
                return;
            }
        };

        // The lock is held across spawn + insert, so the task's own cleanup
        // always runs after its entry exists.
        let mut tails = self.tails.lock().unwrap_or_else(PoisonError::into_inner);
        let seq = tails.next_seq;
        tails.next_seq += 1;

        let pedido_id = notification.pedido_id.clone();
        let previous = tails.by_order.remove(&pedido_id).map(|t| t.handle);

        let http = self.http.clone();
        let url = self.url.clone();
        let metrics = self.metrics.clone();
        let registry = self.tails.clone();
        let handle = tokio::spawn(async move {
            if let Some(previous) = previous {
                let _ = previous.await;
            }

            let outcome = deliver(&http, &url, &notification).await;
            metrics.record_notification(notification.tipo.as_str(), outcome.is_ok());
            drop(permit);

            let mut tails = registry.lock().unwrap_or_else(PoisonError::into_inner);
            if tails
                .by_order
                .get(&notification.pedido_id)
                .is_some_and(|t| t.seq == seq)
            {
                tails.by_order.remove(&notification.pedido_id);
            }
        });

        tails.by_order.insert(pedido_id, Tail { seq, handle });
    }
}

/// POST one notification. Errors are logged here and returned for accounting.
pub async fn deliver(
    http: &reqwest::Client,
    url: &str,
    notification: &OrderNotification,
) -> Result<(), NotificationError> {
    let result = match http.post(url).json(notification).send().await {
        Ok(resp) if resp.status().is_success() => Ok(()),
        Ok(resp) => Err(NotificationError::Rejected {
            code: resp.status().as_u16(),
        }),
        Err(e) => Err(NotificationError::Transport(e.to_string())),
    };

    match &result {
        Ok(()) => tracing::info!(
            pedido_id = %notification.pedido_id,
            tipo = notification.tipo.as_str(),
            "📲 Notification sent"
        ),
        Err(e) => tracing::warn!(
            pedido_id = %notification.pedido_id,
            tipo = notification.tipo.as_str(),
            error = %e,
            "⚠️ Failed to send notification"
        ),
    }

    result
}
