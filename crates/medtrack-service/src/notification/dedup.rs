//! Cooldown-based notification dedup guard.

use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use uuid::Uuid;

use medtrack_core::result::AppResult;
use medtrack_entity::notification::kind::NotificationKind;

use crate::stores::NotificationStore;

/// Answers "has this `(event, kind)` pair been notified within the last
/// cooldown window?".
///
/// Keyed on the linked event and the structured kind column, never on
/// title text, so retitling a notification cannot defeat the guard.
#[derive(Clone)]
pub struct DedupGuard {
    notifications: Arc<dyn NotificationStore>,
}

impl DedupGuard {
    /// Create a new dedup guard over a notification store.
    pub fn new(notifications: Arc<dyn NotificationStore>) -> Self {
        Self { notifications }
    }

    /// Check for a non-deleted `(event, kind)` notification created within
    /// the last `cooldown_minutes`.
    pub async fn has_recent(
        &self,
        event_id: Uuid,
        kind: NotificationKind,
        now: DateTime<Utc>,
        cooldown_minutes: i64,
    ) -> AppResult<bool> {
        let since = now - TimeDelta::minutes(cooldown_minutes);
        self.notifications
            .has_recent_for_event(event_id, kind, since)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stores::NotificationStore as _;
    use crate::testing::FakeNotificationStore;
    use medtrack_entity::notification::model::Notification;

    fn escalation_notification(event_id: Uuid, created_at: DateTime<Utc>) -> Notification {
        Notification {
            id: Uuid::new_v4(),
            recipient_id: Uuid::new_v4(),
            health_event_id: Some(event_id),
            kind: NotificationKind::EventEscalation,
            title: "Unassigned health event".to_string(),
            content: "test".to_string(),
            requires_confirmation: false,
            is_read: false,
            read_at: None,
            end_date: None,
            updated_by: None,
            is_deleted: false,
            deleted_at: None,
            created_at,
            updated_at: created_at,
        }
    }

    #[tokio::test]
    async fn test_within_cooldown_suppresses_outside_allows() {
        let now = Utc::now();
        let event_id = Uuid::new_v4();
        let store = Arc::new(FakeNotificationStore::new());
        let guard = DedupGuard::new(Arc::clone(&store) as Arc<dyn NotificationStore>);

        // Escalated 10 minutes ago: still inside the 15 minute window.
        store.insert(escalation_notification(
            event_id,
            now - TimeDelta::minutes(10),
        ));
        assert!(guard
            .has_recent(event_id, NotificationKind::EventEscalation, now, 15)
            .await
            .unwrap());

        // 16 minutes later the same notification no longer suppresses.
        let later = now + TimeDelta::minutes(6);
        assert!(!guard
            .has_recent(event_id, NotificationKind::EventEscalation, later, 15)
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_kind_is_part_of_the_key() {
        let now = Utc::now();
        let event_id = Uuid::new_v4();
        let store = Arc::new(FakeNotificationStore::new());
        let guard = DedupGuard::new(Arc::clone(&store) as Arc<dyn NotificationStore>);

        store.insert(escalation_notification(event_id, now));
        // A recent escalation never suppresses a reminder.
        assert!(!guard
            .has_recent(event_id, NotificationKind::EventReminder, now, 30)
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_soft_deleted_rows_do_not_suppress() {
        let now = Utc::now();
        let event_id = Uuid::new_v4();
        let store = Arc::new(FakeNotificationStore::new());
        let guard = DedupGuard::new(Arc::clone(&store) as Arc<dyn NotificationStore>);

        let notification = escalation_notification(event_id, now);
        let id = notification.id;
        store.insert(notification);
        store.soft_delete_batch(&[id], now).await.unwrap();

        assert!(!guard
            .has_recent(event_id, NotificationKind::EventEscalation, now, 15)
            .await
            .unwrap());
    }
}
