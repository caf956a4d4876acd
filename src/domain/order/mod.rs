// ============================================================================
// Order Domain - restaurant orders and their creation workflow
// ============================================================================
//
// - Value objects (OrderLine, OrderStatus, KitchenDecision)
// - Commands (CreateOrder, the validated inbound request)
// - Events (OrderNotification produced for the notification service)
// - Errors (ValidationError, OrderWorkflowError)
// - Aggregate (PersistedOrder as returned by the store)
// - Command Handler (OrderCommandHandler, the create-order workflow)
//
// ============================================================================

pub mod value_objects;
pub mod events;
pub mod commands;
pub mod errors;
pub mod aggregate;
pub mod command_handler;

pub use value_objects::*;
pub use events::*;
pub use commands::*;
pub use errors::*;
pub use aggregate::*;
pub use command_handler::*;
