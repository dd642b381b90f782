//! Health-event escalation and reminder sweeps.
//!
//! Escalation broadcasts to every active manager when a Pending event sits
//! unassigned past the threshold; reminders nudge the assigned nurse when an
//! InProgress event runs long. Both are pure producers of notification rows:
//! they never change event status, and the dedup guard keeps repeated sweep
//! invocations from re-notifying inside the cooldown window.

use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use tracing::{debug, info, warn};
use uuid::Uuid;

use medtrack_core::config::escalation::EscalationConfig;
use medtrack_core::result::AppResult;
use medtrack_entity::health_event::model::HealthEvent;
use medtrack_entity::notification::kind::NotificationKind;
use medtrack_entity::notification::model::Notification;
use medtrack_entity::staff::role::StaffRole;

use crate::notification::DedupGuard;
use crate::outcome::SweepOutcome;
use crate::stores::{ConnectivityProbe, HealthEventStore, NotificationStore, StaffStore};

/// Recurring escalation, reminder, and cleanup evaluators for health
/// events.
#[derive(Clone)]
pub struct HealthEventEscalationService {
    events: Arc<dyn HealthEventStore>,
    notifications: Arc<dyn NotificationStore>,
    staff: Arc<dyn StaffStore>,
    probe: Arc<dyn ConnectivityProbe>,
    dedup: DedupGuard,
    config: EscalationConfig,
}

impl HealthEventEscalationService {
    /// Create a new escalation service.
    pub fn new(
        events: Arc<dyn HealthEventStore>,
        notifications: Arc<dyn NotificationStore>,
        staff: Arc<dyn StaffStore>,
        probe: Arc<dyn ConnectivityProbe>,
        config: EscalationConfig,
    ) -> Self {
        let dedup = DedupGuard::new(Arc::clone(&notifications));
        Self {
            events,
            notifications,
            staff,
            probe,
            dedup,
            config,
        }
    }

    /// One aggregate pass: escalations, reminders, then cleanup.
    ///
    /// Guarded by a reachability probe so a flapping database shows up as a
    /// quiet skipped tick instead of a burst of job failures. Each phase's
    /// failure is contained; the others still run.
    pub async fn run_sweep(&self, now: DateTime<Utc>) -> AppResult<SweepOutcome> {
        if let Err(e) = self.probe.ping().await {
            debug!("Health event sweep skipped, store unreachable: {e}");
            return Ok(SweepOutcome::default());
        }

        let mut outcome = SweepOutcome::default();
        for (phase, result) in [
            ("escalation", self.escalate_unassigned(now).await),
            ("reminder", self.remind_stale_in_progress(now).await),
            (
                "cleanup",
                self.cleanup_completed_event_notifications(now).await,
            ),
        ] {
            match result {
                Ok(part) => outcome.absorb(part),
                Err(e) => {
                    warn!("Health event {phase} phase failed: {e}");
                    outcome.failed += 1;
                }
            }
        }
        Ok(outcome)
    }

    /// Notify every active manager about Pending events that have sat
    /// unassigned past the threshold.
    pub async fn escalate_unassigned(&self, now: DateTime<Utc>) -> AppResult<SweepOutcome> {
        let cutoff = now - TimeDelta::minutes(self.config.pending_threshold_minutes);
        let events = self
            .events
            .find_unassigned_pending(cutoff, self.config.event_batch_size)
            .await?;

        let mut outcome = SweepOutcome {
            examined: events.len(),
            ..SweepOutcome::default()
        };
        if events.is_empty() {
            return Ok(outcome);
        }

        let managers = self.staff.find_active_by_role(StaffRole::Manager).await?;
        if managers.is_empty() {
            warn!(
                events = events.len(),
                "No active managers to escalate to, events stay pending"
            );
            outcome.skipped += events.len();
            return Ok(outcome);
        }

        for event in &events {
            if self
                .dedup
                .has_recent(
                    event.id,
                    NotificationKind::EventEscalation,
                    now,
                    self.config.escalation_cooldown_minutes,
                )
                .await?
            {
                outcome.skipped += 1;
                continue;
            }

            let batch: Vec<Notification> = managers
                .iter()
                .map(|manager| {
                    self.escalation_notification(event, manager.id, now)
                })
                .collect();
            match self.notifications.create_many(&batch).await {
                Ok(created) => {
                    outcome.affected += created;
                    info!(
                        event_id = %event.id,
                        recipients = managers.len(),
                        waiting_minutes = event.waiting_minutes(now),
                        "Escalated unassigned health event"
                    );
                }
                Err(e) => {
                    warn!(event_id = %event.id, "Escalation write failed: {e}");
                    outcome.failed += 1;
                }
            }
        }
        Ok(outcome)
    }

    /// Remind the assigned nurse about InProgress events running past the
    /// threshold.
    pub async fn remind_stale_in_progress(&self, now: DateTime<Utc>) -> AppResult<SweepOutcome> {
        let cutoff = now - TimeDelta::minutes(self.config.reminder_threshold_minutes);
        let events = self
            .events
            .find_stale_in_progress(cutoff, self.config.event_batch_size)
            .await?;

        let mut outcome = SweepOutcome {
            examined: events.len(),
            ..SweepOutcome::default()
        };

        for event in &events {
            // An InProgress event without a handler is a data defect; skip
            // rather than notify nobody.
            let Some(handler) = event.handled_by else {
                warn!(event_id = %event.id, "InProgress event has no handler");
                outcome.skipped += 1;
                continue;
            };

            if self
                .dedup
                .has_recent(
                    event.id,
                    NotificationKind::EventReminder,
                    now,
                    self.config.reminder_cooldown_minutes,
                )
                .await?
            {
                outcome.skipped += 1;
                continue;
            }

            let reminder = self.reminder_notification(event, handler, now);
            match self.notifications.create_many(&[reminder]).await {
                Ok(created) => outcome.affected += created,
                Err(e) => {
                    warn!(event_id = %event.id, "Reminder write failed: {e}");
                    outcome.failed += 1;
                }
            }
        }
        Ok(outcome)
    }

    /// Soft-delete notifications whose linked event completed more than the
    /// cleanup window ago.
    pub async fn cleanup_completed_event_notifications(
        &self,
        now: DateTime<Utc>,
    ) -> AppResult<SweepOutcome> {
        let cutoff = now - TimeDelta::minutes(self.config.completed_cleanup_after_minutes);
        let ids = self
            .notifications
            .find_for_completed_events(cutoff, self.config.cleanup_batch_size)
            .await?;

        let mut outcome = SweepOutcome {
            examined: ids.len(),
            ..SweepOutcome::default()
        };
        if ids.is_empty() {
            return Ok(outcome);
        }

        outcome.affected = self.notifications.soft_delete_batch(&ids, now).await?;
        info!(
            deleted = outcome.affected,
            "Cleaned up notifications for completed events"
        );
        Ok(outcome)
    }

    fn escalation_notification(
        &self,
        event: &HealthEvent,
        recipient_id: Uuid,
        now: DateTime<Utc>,
    ) -> Notification {
        Notification {
            id: Uuid::new_v4(),
            recipient_id,
            health_event_id: Some(event.id),
            kind: NotificationKind::EventEscalation,
            title: escalation_title(event),
            content: escalation_content(event, now),
            requires_confirmation: event.is_emergency,
            is_read: false,
            read_at: None,
            end_date: Some(now + TimeDelta::hours(self.config.display_expiry_hours)),
            updated_by: Some("SYSTEM".to_string()),
            is_deleted: false,
            deleted_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn reminder_notification(
        &self,
        event: &HealthEvent,
        recipient_id: Uuid,
        now: DateTime<Utc>,
    ) -> Notification {
        Notification {
            id: Uuid::new_v4(),
            recipient_id,
            health_event_id: Some(event.id),
            kind: NotificationKind::EventReminder,
            title: format!("Reminder: {} event still in progress", event.event_type),
            content: reminder_content(event, now),
            requires_confirmation: false,
            is_read: false,
            read_at: None,
            end_date: Some(now + TimeDelta::hours(self.config.display_expiry_hours)),
            updated_by: Some("SYSTEM".to_string()),
            is_deleted: false,
            deleted_at: None,
            created_at: now,
            updated_at: now,
        }
    }
}

fn escalation_title(event: &HealthEvent) -> String {
    if event.is_emergency {
        format!("EMERGENCY: unassigned {} event", event.event_type)
    } else {
        format!("Unassigned {} event needs attention", event.event_type)
    }
}

fn escalation_content(event: &HealthEvent, now: DateTime<Utc>) -> String {
    let location = event.location.as_deref().unwrap_or("unknown location");
    format!(
        "A {} event at {} has been waiting {} minutes without an assigned nurse.",
        event.event_type,
        location,
        event.waiting_minutes(now)
    )
}

fn reminder_content(event: &HealthEvent, now: DateTime<Utc>) -> String {
    let minutes = event.processing_minutes(now).unwrap_or(0);
    format!(
        "The {} event you are handling has been in progress for {} minutes.",
        event.event_type, minutes
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{
        pending_event, staff_member, FakeHealthEventStore, FakeNotificationStore, FakeProbe,
        FakeStaffStore,
    };
    use medtrack_entity::health_event::status::HealthEventStatus;

    struct Fixture {
        notifications: Arc<FakeNotificationStore>,
        probe: Arc<FakeProbe>,
        service: HealthEventEscalationService,
    }

    fn fixture(events: Vec<HealthEvent>, staff: Vec<medtrack_entity::staff::model::StaffMember>) -> Fixture {
        let notifications = Arc::new(FakeNotificationStore::new());
        let probe = Arc::new(FakeProbe::new());
        let service = HealthEventEscalationService::new(
            Arc::new(FakeHealthEventStore::new(events)),
            Arc::clone(&notifications) as Arc<dyn NotificationStore>,
            Arc::new(FakeStaffStore::new(staff)),
            Arc::clone(&probe) as Arc<dyn ConnectivityProbe>,
            EscalationConfig::default(),
        );
        Fixture {
            notifications,
            probe,
            service,
        }
    }

    #[tokio::test]
    async fn test_escalation_notifies_every_active_manager() {
        let now = Utc::now();
        let event = {
            let mut e = pending_event(7, now);
            e.is_emergency = true;
            e
        };
        let managers = vec![
            staff_member(StaffRole::Manager),
            staff_member(StaffRole::Manager),
            staff_member(StaffRole::Nurse),
        ];
        let fx = fixture(vec![event.clone()], managers);

        let outcome = fx.service.escalate_unassigned(now).await.unwrap();
        assert_eq!(outcome.affected, 2);

        let created = fx.notifications.created();
        assert_eq!(created.len(), 2);
        for n in &created {
            assert_eq!(n.kind, NotificationKind::EventEscalation);
            assert_eq!(n.health_event_id, Some(event.id));
            assert!(n.requires_confirmation, "emergency requires confirmation");
            assert_eq!(n.end_date, Some(now + TimeDelta::hours(2)));
            assert!(n.content.contains("7 minutes"));
        }
    }

    #[tokio::test]
    async fn test_fresh_event_not_escalated() {
        let now = Utc::now();
        // Reported 3 minutes ago, threshold is 5.
        let fx = fixture(vec![pending_event(3, now)], vec![staff_member(StaffRole::Manager)]);

        let outcome = fx.service.escalate_unassigned(now).await.unwrap();
        assert_eq!(outcome.examined, 0);
        assert_eq!(fx.notifications.created().len(), 0);
    }

    #[tokio::test]
    async fn test_second_sweep_within_cooldown_creates_nothing() {
        let now = Utc::now();
        let fx = fixture(vec![pending_event(10, now)], vec![staff_member(StaffRole::Manager)]);

        let first = fx.service.escalate_unassigned(now).await.unwrap();
        assert_eq!(first.affected, 1);

        let second = fx.service.escalate_unassigned(now).await.unwrap();
        assert_eq!(second.affected, 0);
        assert_eq!(second.skipped, 1);
        assert_eq!(fx.notifications.created().len(), 1);
    }

    #[tokio::test]
    async fn test_zero_managers_is_a_quiet_skip() {
        let now = Utc::now();
        let fx = fixture(vec![pending_event(10, now)], vec![staff_member(StaffRole::Nurse)]);

        let outcome = fx.service.escalate_unassigned(now).await.unwrap();
        assert_eq!(outcome.affected, 0);
        assert_eq!(outcome.skipped, 1);
        assert_eq!(outcome.failed, 0);
    }

    #[tokio::test]
    async fn test_reminder_goes_to_assigned_nurse() {
        let now = Utc::now();
        let nurse_id = Uuid::new_v4();
        let mut event = pending_event(40, now);
        event.status = HealthEventStatus::InProgress;
        event.handled_by = Some(nurse_id);
        event.assigned_at = Some(now - TimeDelta::minutes(25));
        let fx = fixture(vec![event], vec![]);

        let outcome = fx.service.remind_stale_in_progress(now).await.unwrap();
        assert_eq!(outcome.affected, 1);

        let created = fx.notifications.created();
        assert_eq!(created[0].recipient_id, nurse_id);
        assert_eq!(created[0].kind, NotificationKind::EventReminder);
        assert!(created[0].content.contains("25 minutes"));
    }

    #[tokio::test]
    async fn test_cleanup_removes_notifications_of_completed_events() {
        let now = Utc::now();
        let event_id = Uuid::new_v4();
        let fx = fixture(vec![], vec![]);

        let mut stale = Notification {
            id: Uuid::new_v4(),
            recipient_id: Uuid::new_v4(),
            health_event_id: Some(event_id),
            kind: NotificationKind::EventEscalation,
            title: "old".to_string(),
            content: "old".to_string(),
            requires_confirmation: false,
            is_read: false,
            read_at: None,
            end_date: None,
            updated_by: None,
            is_deleted: false,
            deleted_at: None,
            created_at: now - TimeDelta::hours(3),
            updated_at: now - TimeDelta::hours(3),
        };
        fx.notifications.insert(stale.clone());
        // Event completed 90 minutes ago; cleanup window is 60.
        fx.notifications
            .set_event_completed(event_id, now - TimeDelta::minutes(90));

        let outcome = fx
            .service
            .cleanup_completed_event_notifications(now)
            .await
            .unwrap();
        assert_eq!(outcome.affected, 1);
        assert_eq!(fx.notifications.live_count(), 0);

        // A recently completed event's notifications survive.
        stale.id = Uuid::new_v4();
        let fresh_event = Uuid::new_v4();
        stale.health_event_id = Some(fresh_event);
        stale.is_deleted = false;
        fx.notifications.insert(stale);
        fx.notifications
            .set_event_completed(fresh_event, now - TimeDelta::minutes(10));
        let outcome = fx
            .service
            .cleanup_completed_event_notifications(now)
            .await
            .unwrap();
        assert_eq!(outcome.affected, 0);
    }

    #[tokio::test]
    async fn test_sweep_skips_quietly_when_store_unreachable() {
        let now = Utc::now();
        let fx = fixture(vec![pending_event(10, now)], vec![staff_member(StaffRole::Manager)]);
        fx.probe.set_reachable(false);

        let outcome = fx.service.run_sweep(now).await.unwrap();
        assert_eq!(outcome, SweepOutcome::default());
        assert_eq!(fx.notifications.created().len(), 0);
    }

    #[tokio::test]
    async fn test_sweep_contains_phase_failure() {
        let now = Utc::now();
        let fx = fixture(vec![pending_event(10, now)], vec![staff_member(StaffRole::Manager)]);
        fx.notifications.fail_writes();

        let outcome = fx.service.run_sweep(now).await.unwrap();
        assert_eq!(outcome.affected, 0);
        assert!(outcome.failed >= 1);
    }
}
