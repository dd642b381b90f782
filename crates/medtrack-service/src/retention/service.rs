//! Retention sweeps: soft-delete terminal records past their window.
//!
//! All deletions are soft: rows get `is_deleted` and a `deleted_at`
//! timestamp so audit history survives. Nothing is ever purged while it
//! still has open work attached; a terminal medication with a Pending
//! schedule stays until that schedule resolves.

use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use tracing::info;

use medtrack_core::config::retention::RetentionConfig;
use medtrack_core::result::AppResult;

use crate::outcome::SweepOutcome;
use crate::stores::{AdministrationStore, MedicationStore, NotificationStore};

/// Nightly age-out of terminal medications, stale notifications, and old
/// administration records.
#[derive(Clone)]
pub struct RetentionService {
    medications: Arc<dyn MedicationStore>,
    notifications: Arc<dyn NotificationStore>,
    administrations: Arc<dyn AdministrationStore>,
    config: RetentionConfig,
}

impl RetentionService {
    /// Create a new retention service.
    pub fn new(
        medications: Arc<dyn MedicationStore>,
        notifications: Arc<dyn NotificationStore>,
        administrations: Arc<dyn AdministrationStore>,
        config: RetentionConfig,
    ) -> Self {
        Self {
            medications,
            notifications,
            administrations,
            config,
        }
    }

    /// Soft-delete terminal medications whose end date passed more than the
    /// retention window ago and that have no Pending schedules left.
    pub async fn purge_expired_medications(&self, now: DateTime<Utc>) -> AppResult<SweepOutcome> {
        let cutoff =
            (now - TimeDelta::days(self.config.medication_retention_days)).date_naive();
        let candidates = self
            .medications
            .find_expired_terminal(cutoff, self.config.medication_batch_size)
            .await?;

        let mut outcome = SweepOutcome {
            examined: candidates.len(),
            ..SweepOutcome::default()
        };
        if candidates.is_empty() {
            return Ok(outcome);
        }

        let ids: Vec<_> = candidates.iter().map(|m| m.id).collect();
        outcome.affected = self.medications.soft_delete_batch(&ids, now).await?;
        info!(purged = outcome.affected, "Expired medications purged");
        Ok(outcome)
    }

    /// Soft-delete read, display-expired notifications past the retention
    /// window.
    pub async fn purge_stale_notifications(&self, now: DateTime<Utc>) -> AppResult<SweepOutcome> {
        let cutoff = now - TimeDelta::days(self.config.notification_retention_days);
        let ids = self
            .notifications
            .find_stale(cutoff, now, self.config.notification_batch_size)
            .await?;

        let mut outcome = SweepOutcome {
            examined: ids.len(),
            ..SweepOutcome::default()
        };
        if ids.is_empty() {
            return Ok(outcome);
        }

        outcome.affected = self.notifications.soft_delete_batch(&ids, now).await?;
        info!(purged = outcome.affected, "Stale notifications purged");
        Ok(outcome)
    }

    /// Soft-delete administration records older than the retention window.
    pub async fn purge_stale_administrations(&self, now: DateTime<Utc>) -> AppResult<SweepOutcome> {
        let cutoff = now - TimeDelta::days(self.config.administration_retention_days);
        let ids = self
            .administrations
            .find_stale(cutoff, self.config.administration_batch_size)
            .await?;

        let mut outcome = SweepOutcome {
            examined: ids.len(),
            ..SweepOutcome::default()
        };
        if ids.is_empty() {
            return Ok(outcome);
        }

        outcome.affected = self.administrations.soft_delete_batch(&ids, now).await?;
        info!(purged = outcome.affected, "Old administration records purged");
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{
        active_medication, FakeAdministrationStore, FakeMedicationStore, FakeNotificationStore,
    };
    use chrono::NaiveDate;
    use medtrack_entity::medication::status::MedicationStatus;
    use medtrack_entity::notification::kind::NotificationKind;
    use medtrack_entity::notification::model::Notification;
    use uuid::Uuid;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn service(
        meds: Arc<FakeMedicationStore>,
        notifications: Arc<FakeNotificationStore>,
        administrations: Arc<FakeAdministrationStore>,
    ) -> RetentionService {
        RetentionService::new(meds, notifications, administrations, RetentionConfig::default())
    }

    #[tokio::test]
    async fn test_terminal_medication_past_window_is_purged() {
        let now = Utc::now();
        let long_ago = (now - TimeDelta::days(60)).date_naive();
        let mut med = active_medication(long_ago - TimeDelta::days(10), long_ago);
        med.status = MedicationStatus::Completed;
        let meds = Arc::new(FakeMedicationStore::new(vec![med.clone()]));
        let service = service(
            Arc::clone(&meds),
            Arc::new(FakeNotificationStore::new()),
            Arc::new(FakeAdministrationStore::new()),
        );

        let outcome = service.purge_expired_medications(now).await.unwrap();
        assert_eq!(outcome.affected, 1);
        assert!(meds.is_deleted(med.id));
    }

    #[tokio::test]
    async fn test_medication_with_pending_schedule_survives_until_resolved() {
        let now = Utc::now();
        let long_ago = (now - TimeDelta::days(60)).date_naive();
        let mut med = active_medication(long_ago - TimeDelta::days(10), long_ago);
        med.status = MedicationStatus::Completed;
        let meds = Arc::new(FakeMedicationStore::new(vec![med.clone()]));
        meds.set_pending_schedules(med.id, 1);
        let service = service(
            Arc::clone(&meds),
            Arc::new(FakeNotificationStore::new()),
            Arc::new(FakeAdministrationStore::new()),
        );

        let outcome = service.purge_expired_medications(now).await.unwrap();
        assert_eq!(outcome.affected, 0);
        assert!(!meds.is_deleted(med.id));

        // Once the last schedule resolves, the next run purges it.
        meds.set_pending_schedules(med.id, 0);
        let outcome = service.purge_expired_medications(now).await.unwrap();
        assert_eq!(outcome.affected, 1);
        assert!(meds.is_deleted(med.id));
    }

    #[tokio::test]
    async fn test_recent_terminal_medication_not_purged() {
        let now = Utc::now();
        let recently = (now - TimeDelta::days(5)).date_naive();
        let mut med = active_medication(recently - TimeDelta::days(10), recently);
        med.status = MedicationStatus::Discontinued;
        let meds = Arc::new(FakeMedicationStore::new(vec![med.clone()]));
        let service = service(
            Arc::clone(&meds),
            Arc::new(FakeNotificationStore::new()),
            Arc::new(FakeAdministrationStore::new()),
        );

        let outcome = service.purge_expired_medications(now).await.unwrap();
        assert_eq!(outcome.affected, 0);
        assert!(!meds.is_deleted(med.id));
    }

    #[tokio::test]
    async fn test_only_read_and_expired_notifications_purged() {
        let now = Utc::now();
        let old = now - TimeDelta::days(45);
        let notifications = Arc::new(FakeNotificationStore::new());

        let base = Notification {
            id: Uuid::new_v4(),
            recipient_id: Uuid::new_v4(),
            health_event_id: None,
            kind: NotificationKind::General,
            title: "t".to_string(),
            content: "c".to_string(),
            requires_confirmation: false,
            is_read: true,
            read_at: Some(old),
            end_date: Some(old + TimeDelta::hours(2)),
            updated_by: None,
            is_deleted: false,
            deleted_at: None,
            created_at: old,
            updated_at: old,
        };
        notifications.insert(base.clone());

        // Unread sibling of the same age is kept.
        let mut unread = base.clone();
        unread.id = Uuid::new_v4();
        unread.is_read = false;
        unread.read_at = None;
        notifications.insert(unread);

        let service = service(
            Arc::new(FakeMedicationStore::new(vec![])),
            Arc::clone(&notifications),
            Arc::new(FakeAdministrationStore::new()),
        );

        let outcome = service.purge_stale_notifications(now).await.unwrap();
        assert_eq!(outcome.affected, 1);
        assert_eq!(notifications.live_count(), 1);
    }

    #[tokio::test]
    async fn test_old_administrations_purged_recent_kept() {
        let now = Utc::now();
        let administrations = Arc::new(FakeAdministrationStore::new());
        administrations.insert(now - TimeDelta::days(45));
        administrations.insert(now - TimeDelta::days(5));

        let service = service(
            Arc::new(FakeMedicationStore::new(vec![])),
            Arc::new(FakeNotificationStore::new()),
            Arc::clone(&administrations),
        );

        let outcome = service.purge_stale_administrations(now).await.unwrap();
        assert_eq!(outcome.affected, 1);
        assert_eq!(administrations.live_count(), 1);
    }
}
