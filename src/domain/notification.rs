use crate::domain::model::ProductId;
use crate::domain::ports::Notifier;
use crate::utils::error::CartFailure;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    OutOfStock,
    ProductNotInCart,
    GatewayFailure,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
    pub product_id: ProductId,
    pub at: DateTime<Utc>,
}

impl From<&CartFailure> for Notification {
    fn from(failure: &CartFailure) -> Self {
        let kind = match failure {
            CartFailure::OutOfStock { .. } => NotificationKind::OutOfStock,
            CartFailure::ProductNotInCart { .. } => NotificationKind::ProductNotInCart,
            CartFailure::GatewayFailure { .. } => NotificationKind::GatewayFailure,
        };
        Self {
            kind,
            message: failure.notification_message().to_string(),
            product_id: failure.product_id(),
            at: Utc::now(),
        }
    }
}

/// Prints notifications to stderr, the way the CLI surfaces them.
#[derive(Debug, Clone, Default)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notification: Notification) {
        tracing::debug!(
            "Notification {:?} for product {}",
            notification.kind,
            notification.product_id
        );
        eprintln!("❌ {}", notification.message);
    }
}

/// Keeps every notification in memory. Clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct MemoryNotifier {
    received: Arc<Mutex<Vec<Notification>>>,
}

impl MemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.received
            .lock()
            .map(|received| received.clone())
            .unwrap_or_default()
    }

    pub fn messages(&self) -> Vec<String> {
        self.notifications()
            .into_iter()
            .map(|n| n.message)
            .collect()
    }

    /// Removes and returns everything received so far.
    pub fn drain(&self) -> Vec<Notification> {
        self.received
            .lock()
            .map(|mut received| std::mem::take(&mut *received))
            .unwrap_or_default()
    }
}

impl Notifier for MemoryNotifier {
    fn notify(&self, notification: Notification) {
        if let Ok(mut received) = self.received.lock() {
            received.push(notification);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notification_from_failure() {
        let failure = CartFailure::ProductNotInCart { product_id: 4 };
        let notification = Notification::from(&failure);

        assert_eq!(notification.kind, NotificationKind::ProductNotInCart);
        assert_eq!(notification.message, "could not remove product");
        assert_eq!(notification.product_id, 4);
    }

    #[test]
    fn test_memory_notifier_shares_buffer_between_clones() {
        let notifier = MemoryNotifier::new();
        let handle = notifier.clone();

        notifier.notify(Notification::from(&CartFailure::OutOfStock {
            product_id: 1,
            requested: 2,
            available: 1,
        }));

        assert_eq!(handle.messages(), vec!["requested quantity exceeds stock"]);
        assert_eq!(handle.drain().len(), 1);
        assert!(notifier.notifications().is_empty());
    }
}
