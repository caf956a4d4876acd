use serde::Serialize;

use crate::messaging::KitchenError;
use crate::store::StoreError;

// ============================================================================
// Order Errors
// ============================================================================

/// One field-level validation failure, reported back to the client.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    pub campo: String,
    pub mensagem: String,
}

impl FieldError {
    pub fn new(campo: impl Into<String>, mensagem: impl Into<String>) -> Self {
        Self {
            campo: campo.into(),
            mensagem: mensagem.into(),
        }
    }
}

/// The inbound payload did not match the order schema. Raised before any
/// side effect.
#[derive(Debug, thiserror::Error)]
#[error("Invalid order payload ({} field error(s))", .errors.len())]
pub struct ValidationError {
    pub errors: Vec<FieldError>,
}

impl ValidationError {
    pub fn single(campo: impl Into<String>, mensagem: impl Into<String>) -> Self {
        Self {
            errors: vec![FieldError::new(campo, mensagem)],
        }
    }
}

/// Terminal failure of one create-order workflow run.
#[derive(Debug, thiserror::Error)]
pub enum OrderWorkflowError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Kitchen(#[from] KitchenError),

    #[error(transparent)]
    Store(#[from] StoreError),
}
