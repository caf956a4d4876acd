use serde::{Deserialize, Serialize};

use super::errors::{FieldError, ValidationError};
use super::value_objects::{order_total, OrderLine};

// ============================================================================
// Create Order Command - validated shape of `POST /novo-pedido`
// ============================================================================
//
// The wire payload is first decoded into a permissive mirror where every
// field is optional, so missing fields can be reported one by one instead of
// failing on the first. Unknown fields are rejected outright: the legacy
// `produto/quantidade` line shape is not accepted.
//
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawOrder {
    pedido_id: Option<String>,
    itens: Option<Vec<RawOrderLine>>,
    cliente_id: Option<String>,
    mesa: Option<i64>,
    prioridade: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawOrderLine {
    nome: Option<String>,
    quantidade: Option<i64>,
    preco: Option<f64>,
}

/// A structurally valid order. Also the body sent to the kitchen.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateOrder {
    pub pedido_id: String,
    pub itens: Vec<OrderLine>,
    pub cliente_id: Option<String>,
    pub mesa: Option<i32>,
    pub prioridade: Option<String>,
}

impl CreateOrder {
    /// Decode and validate a raw request body.
    pub fn from_json(body: &[u8]) -> Result<Self, ValidationError> {
        let raw: RawOrder = serde_json::from_slice(body)
            .map_err(|e| ValidationError::single("corpo", e.to_string()))?;
        Self::validate(raw)
    }

    fn validate(raw: RawOrder) -> Result<Self, ValidationError> {
        let mut errors = Vec::new();

        // The identifier is the client's key; it is checked, never rewritten.
        let pedido_id = match raw.pedido_id {
            Some(id) if id.trim().is_empty() => {
                errors.push(FieldError::new("pedido_id", "não pode ser vazio"));
                String::new()
            }
            Some(id) if id.trim() != id => {
                errors.push(FieldError::new(
                    "pedido_id",
                    "não pode começar nem terminar com espaços",
                ));
                String::new()
            }
            Some(id) => id,
            None => {
                errors.push(FieldError::new("pedido_id", "campo obrigatório"));
                String::new()
            }
        };

        let mut itens = Vec::new();
        match raw.itens {
            None => errors.push(FieldError::new("itens", "campo obrigatório")),
            Some(lines) if lines.is_empty() => {
                errors.push(FieldError::new("itens", "o pedido precisa de ao menos um item"))
            }
            Some(lines) => {
                for (idx, line) in lines.into_iter().enumerate() {
                    if let Some(line) = validate_line(idx, line, &mut errors) {
                        itens.push(line);
                    }
                }
            }
        }

        let mesa = match raw.mesa {
            None => None,
            Some(m) => match i32::try_from(m) {
                Ok(m) => Some(m),
                Err(_) => {
                    errors.push(FieldError::new("mesa", "fora do intervalo permitido"));
                    None
                }
            },
        };

        if !errors.is_empty() {
            return Err(ValidationError { errors });
        }

        Ok(Self {
            pedido_id,
            itens,
            cliente_id: raw.cliente_id,
            mesa,
            prioridade: raw.prioridade,
        })
    }

    pub fn total(&self) -> f64 {
        order_total(&self.itens)
    }
}

fn validate_line(idx: usize, raw: RawOrderLine, errors: &mut Vec<FieldError>) -> Option<OrderLine> {
    let before = errors.len();
    let field = |name: &str| format!("itens[{idx}].{name}");

    let nome = match raw.nome.map(|n| n.trim().to_string()) {
        Some(n) if !n.is_empty() => n,
        Some(_) => {
            errors.push(FieldError::new(field("nome"), "não pode ser vazio"));
            String::new()
        }
        None => {
            errors.push(FieldError::new(field("nome"), "campo obrigatório"));
            String::new()
        }
    };

    let quantidade = match raw.quantidade {
        Some(q) if q > 0 && q <= i64::from(i32::MAX) => q as i32,
        Some(_) => {
            errors.push(FieldError::new(field("quantidade"), "deve ser um inteiro positivo"));
            0
        }
        None => {
            errors.push(FieldError::new(field("quantidade"), "campo obrigatório"));
            0
        }
    };

    let preco = match raw.preco {
        Some(p) if p.is_finite() && p >= 0.0 => p,
        Some(_) => {
            errors.push(FieldError::new(field("preco"), "deve ser um número não negativo"));
            0.0
        }
        None => {
            errors.push(FieldError::new(field("preco"), "campo obrigatório"));
            0.0
        }
    };

    (errors.len() == before).then_some(OrderLine {
        nome,
        quantidade,
        preco,
    })
}

// ============================================================================
// Unit Tests
// ============================================================================
