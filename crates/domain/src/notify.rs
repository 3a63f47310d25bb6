//! User-facing notifications for failed cart operations.

use std::sync::{Arc, Mutex, PoisonError};

use crate::cart::{CartError, CartErrorKind, CartOperation};

/// A human-readable report of a failed cart operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub operation: CartOperation,
    pub kind: CartErrorKind,
    pub message: String,
}

impl Notification {
    /// Builds the notification shown when `operation` fails with `error`.
    ///
    /// Quantity and stock failures share one message; every other failure
    /// is described by the operation that failed. An add that turns into an
    /// amount update keeps the add message, even when the stock lookup fails.
    pub fn for_error(operation: CartOperation, error: &CartError) -> Self {
        let kind = error.kind();
        let message = match kind {
            CartErrorKind::InvalidQuantity | CartErrorKind::InsufficientStock => {
                "Requested quantity out of stock"
            }
            _ => match operation {
                CartOperation::AddProduct => "Failed to add product",
                CartOperation::RemoveProduct => "Failed to remove product",
                CartOperation::UpdateProductAmount => "Failed to update product quantity",
            },
        };

        Self {
            operation,
            kind,
            message: message.to_string(),
        }
    }
}

/// Sink for user-facing notifications.
pub trait Notifier: Send + Sync {
    /// Displays or records a notification.
    fn notify(&self, notification: &Notification);
}

impl<T: Notifier + ?Sized> Notifier for Arc<T> {
    fn notify(&self, notification: &Notification) {
        (**self).notify(notification);
    }
}

/// Notifier that emits each notification as a tracing event.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: &Notification) {
        tracing::warn!(
            operation = %notification.operation,
            kind = %notification.kind,
            "{}",
            notification.message
        );
    }
}

/// Notifier that discards every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNotifier;

impl Notifier for NoopNotifier {
    fn notify(&self, _notification: &Notification) {}
}

/// Notifier that keeps every notification it receives.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    notifications: Arc<Mutex<Vec<Notification>>>,
}

impl RecordingNotifier {
    /// Creates a new empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all notifications received so far.
    pub fn notifications(&self) -> Vec<Notification> {
        self.notifications
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns the most recent notification.
    pub fn last(&self) -> Option<Notification> {
        self.notifications
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
    }

    /// Returns the number of notifications received.
    pub fn count(&self) -> usize {
        self.notifications
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: &Notification) {
        self.notifications
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notification.clone());
    }
}
