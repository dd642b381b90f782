//! Notification entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::kind::NotificationKind;

/// A directed message to one staff member, optionally tied to a health
/// event.
///
/// Rows created here are rendered and delivered by downstream components;
/// this subsystem's obligation ends at durable, de-duplicated row creation.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Notification {
    /// Unique notification identifier.
    pub id: Uuid,
    /// The recipient staff member.
    pub recipient_id: Uuid,
    /// The health event this notification is about, if any.
    pub health_event_id: Option<Uuid>,
    /// Notification kind; part of the dedup key.
    pub kind: NotificationKind,
    /// Notification title.
    pub title: String,
    /// Notification body text.
    pub content: String,
    /// Whether the recipient must confirm receipt.
    pub requires_confirmation: bool,
    /// Whether the recipient has read this notification.
    pub is_read: bool,
    /// When the notification was read.
    pub read_at: Option<DateTime<Utc>>,
    /// Display expiry; the notification is hidden after this instant.
    pub end_date: Option<DateTime<Utc>>,
    /// Who last touched the row (`"SYSTEM"` for sweep updates).
    pub updated_by: Option<String>,
    /// Soft-delete flag.
    pub is_deleted: bool,
    /// When the row was soft-deleted.
    pub deleted_at: Option<DateTime<Utc>>,
    /// When the row was created.
    pub created_at: DateTime<Utc>,
    /// When the row was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Notification {
    /// Check if the notification's display window has passed.
    pub fn is_display_expired(&self, now: DateTime<Utc>) -> bool {
        self.end_date.map(|end| end <= now).unwrap_or(false)
    }
}
