use chrono::{DateTime, Utc};

use crate::store::OrderStore;

// ============================================================================
// Health Check
// ============================================================================
//
// The service is alive whenever it can answer; it is only healthy when the
// order store also answers a trivial query.
//
// ============================================================================

/// Health status of a component
#[derive(Debug, Clone, PartialEq)]
pub enum HealthStatus {
    Healthy,
    Unhealthy(String),
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        matches!(self, HealthStatus::Healthy)
    }
}

/// Health information for a component
#[derive(Debug, Clone)]
pub struct ComponentHealth {
    pub name: String,
    pub status: HealthStatus,
    pub last_check: DateTime<Utc>,
}

impl ComponentHealth {
    pub fn new(name: impl Into<String>, status: HealthStatus) -> Self {
        Self {
            name: name.into(),
            status,
            last_check: Utc::now(),
        }
    }
}

/// Probe the order store with a connectivity query.
pub async fn check_database(store: &dyn OrderStore) -> ComponentHealth {
    let status = match store.ping().await {
        Ok(()) => HealthStatus::Healthy,
        Err(e) => {
            tracing::warn!(error = %e, "Database health probe failed");
            HealthStatus::Unhealthy(e.to_string())
        }
    };

    ComponentHealth::new("database", status)
}
