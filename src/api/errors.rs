use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde_json::json;

use crate::domain::order::OrderWorkflowError;
use crate::messaging::KitchenError;
use crate::store::StoreError;

// ============================================================================
// HTTP Error Mapping
// ============================================================================
//
// Validation       -> 400 {erro, detalhes}
// Kitchen down     -> 503 {erro}
// Kitchen refused  -> 502 {erro, codigo_cozinha}
// Kitchen garbage  -> 502 {erro}
// Duplicate order  -> 500 {erro}
// Store down       -> 503 {erro}
//
// ============================================================================

impl ResponseError for OrderWorkflowError {
    fn status_code(&self) -> StatusCode {
        match self {
            OrderWorkflowError::Validation(_) => StatusCode::BAD_REQUEST,
            OrderWorkflowError::Kitchen(KitchenError::Unreachable(_)) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            OrderWorkflowError::Kitchen(_) => StatusCode::BAD_GATEWAY,
            OrderWorkflowError::Store(StoreError::DuplicateOrder(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            OrderWorkflowError::Store(StoreError::StorageUnavailable(_)) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            OrderWorkflowError::Validation(e) => json!({
                "erro": "Dados inválidos",
                "detalhes": e.errors,
            }),
            OrderWorkflowError::Kitchen(KitchenError::Unreachable(_)) => json!({
                "erro": "Não foi possível contatar a cozinha",
            }),
            OrderWorkflowError::Kitchen(KitchenError::Refused { code }) => json!({
                "erro": "Cozinha retornou erro",
                "codigo_cozinha": code,
            }),
            OrderWorkflowError::Kitchen(KitchenError::InvalidResponse(_)) => json!({
                "erro": "Cozinha retornou uma resposta inválida",
            }),
            OrderWorkflowError::Store(StoreError::DuplicateOrder(id)) => json!({
                "erro": format!("Pedido {id} já foi registrado"),
            }),
            OrderWorkflowError::Store(StoreError::StorageUnavailable(_)) => json!({
                "erro": "Banco de dados indisponível",
            }),
        };

        HttpResponse::build(self.status_code()).json(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::order::ValidationError;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (
                OrderWorkflowError::from(ValidationError::single("itens", "obrigatório")),
                400,
            ),
            (
                KitchenError::Unreachable("timed out".to_string()).into(),
                503,
            ),
            (KitchenError::Refused { code: 500 }.into(), 502),
            (KitchenError::InvalidResponse("eof".to_string()).into(), 502),
            (StoreError::DuplicateOrder("P1".to_string()).into(), 500),
            (StoreError::StorageUnavailable("down".to_string()).into(), 503),
        ];

        for (err, expected) in cases {
            assert_eq!(err.status_code().as_u16(), expected, "{err}");
        }
    }
}
