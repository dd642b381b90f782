//! Notification kind enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The kind of a notification.
///
/// The kind, together with the linked health event, is the dedup key: one
/// `(event, kind)` pair may only be notified once per cooldown window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "notification_kind", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// A Pending event sat unassigned too long; sent to managers.
    EventEscalation,
    /// An InProgress event has run too long; sent to the assigned nurse.
    EventReminder,
    /// Anything else (manual messages, announcements).
    General,
}

impl NotificationKind {
    /// Return the kind as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EventEscalation => "event_escalation",
            Self::EventReminder => "event_reminder",
            Self::General => "general",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
