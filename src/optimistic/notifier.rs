// src/optimistic/notifier.rs
use std::sync::Mutex;

use super::MutationKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Failure,
}

/// Transient user-facing message emitted when a mutation settles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub kind: MutationKind,
    pub entity_id: i64,
    pub message: String,
}

impl Notification {
    pub fn success(kind: MutationKind, entity_id: i64) -> Self {
        Self {
            level: NotificationLevel::Success,
            kind,
            entity_id,
            message: kind.success_message().to_string(),
        }
    }

    pub fn failure(kind: MutationKind, entity_id: i64) -> Self {
        Self {
            level: NotificationLevel::Failure,
            kind,
            entity_id,
            message: kind.failure_message().to_string(),
        }
    }
}

pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Prints to the terminal and mirrors into the log.
#[derive(Debug, Default)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notification: Notification) {
        match notification.level {
            NotificationLevel::Success => {
                app_log!(info, "#{} {}: {}", notification.entity_id, notification.kind, notification.message);
                println!("✅ {}", notification.message);
            }
            NotificationLevel::Failure => {
                app_log!(warn, "#{} {}: {}", notification.entity_id, notification.kind, notification.message);
                eprintln!("❌ {}", notification.message);
            }
        }
    }
}

/// Keeps every notification in memory.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    received: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn take(&self) -> Vec<Notification> {
        let mut received = self
            .received
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        std::mem::take(&mut *received)
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.received
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(notification);
    }
}
