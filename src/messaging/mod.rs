// Outbound HTTP adapters: the kitchen (request/response) and the
// notification service (fire-and-forget).

mod kitchen;
mod notifier;

pub use kitchen::{HttpKitchenClient, KitchenClient, KitchenError};
pub use notifier::{deliver, HttpNotifier, NotificationError, Notifier};
