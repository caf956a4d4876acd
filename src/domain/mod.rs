// ============================================================================
// Domain Layer - Business Logic
// ============================================================================
//
// Only the order aggregate lives here. Stock, staff and notification
// delivery are separate services reached over HTTP (see `messaging`).
//
// ============================================================================

pub mod order;
