//! Store traits: the persistence seam the sweeps depend on.
//!
//! Each trait is the narrow query surface one evaluator family needs,
//! implemented here for the concrete repositories and by in-memory fakes in
//! tests. Handlers never touch a pool or repository type directly.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use uuid::Uuid;

use medtrack_core::result::AppResult;
use medtrack_database::repositories::{
    AdministrationRepository, HealthEventRepository, MedicationRepository,
    NotificationRepository, ScheduleRepository, StaffRepository,
};
use medtrack_database::DatabasePool;
use medtrack_entity::health_event::model::HealthEvent;
use medtrack_entity::medication::model::StudentMedication;
use medtrack_entity::medication::schedule::MedicationSchedule;
use medtrack_entity::notification::kind::NotificationKind;
use medtrack_entity::notification::model::Notification;
use medtrack_entity::staff::model::StaffMember;
use medtrack_entity::staff::role::StaffRole;

/// Medication course queries and batch status updates.
#[async_trait]
pub trait MedicationStore: Send + Sync {
    /// Find a medication by ID.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<StudentMedication>>;

    /// Active, auto-generating medications covering `date` with no schedule
    /// for that date yet.
    async fn find_due_for_generation(
        &self,
        date: NaiveDate,
        limit: i64,
    ) -> AppResult<Vec<StudentMedication>>;

    /// Active, auto-generating medications approved since `since`.
    async fn find_recently_approved(
        &self,
        since: DateTime<Utc>,
        limit: i64,
    ) -> AppResult<Vec<StudentMedication>>;

    /// Approved medications whose dosing window contains `date`.
    async fn find_approved_ready(
        &self,
        date: NaiveDate,
        limit: i64,
    ) -> AppResult<Vec<StudentMedication>>;

    /// Flip a batch of Approved medications to Active.
    async fn activate_batch(&self, ids: &[Uuid], now: DateTime<Utc>) -> AppResult<u64>;

    /// Terminal medications past the retention cutoff with no Pending
    /// schedules left.
    async fn find_expired_terminal(
        &self,
        cutoff: NaiveDate,
        limit: i64,
    ) -> AppResult<Vec<StudentMedication>>;

    /// Soft-delete a batch of medications.
    async fn soft_delete_batch(&self, ids: &[Uuid], now: DateTime<Utc>) -> AppResult<u64>;
}

/// Planned dose schedule queries and writes.
#[async_trait]
pub trait ScheduleStore: Send + Sync {
    /// Whether a non-deleted schedule exists for `(medication, date)`.
    async fn exists_for_date(&self, medication_id: Uuid, date: NaiveDate) -> AppResult<bool>;

    /// Insert one schedule row.
    async fn create(&self, schedule: &MedicationSchedule) -> AppResult<()>;

    /// Pending schedules whose slot is before `cutoff` (local wall clock).
    async fn find_overdue(
        &self,
        cutoff: NaiveDateTime,
        limit: i64,
    ) -> AppResult<Vec<MedicationSchedule>>;

    /// Mark a batch of Pending schedules Missed.
    async fn mark_missed_batch(
        &self,
        ids: &[Uuid],
        reason: &str,
        now: DateTime<Utc>,
    ) -> AppResult<u64>;
}

/// Health event queries. Read-only from this subsystem.
#[async_trait]
pub trait HealthEventStore: Send + Sync {
    /// Pending, unassigned events reported before `cutoff`.
    async fn find_unassigned_pending(
        &self,
        cutoff: DateTime<Utc>,
        limit: i64,
    ) -> AppResult<Vec<HealthEvent>>;

    /// InProgress events assigned before `cutoff`.
    async fn find_stale_in_progress(
        &self,
        cutoff: DateTime<Utc>,
        limit: i64,
    ) -> AppResult<Vec<HealthEvent>>;
}

/// Notification creation, dedup lookup, and soft deletion.
#[async_trait]
pub trait NotificationStore: Send + Sync {
    /// Insert a batch of notifications as one unit.
    async fn create_many(&self, notifications: &[Notification]) -> AppResult<u64>;

    /// Whether a non-deleted `(event, kind)` notification exists created on
    /// or after `since`.
    async fn has_recent_for_event(
        &self,
        event_id: Uuid,
        kind: NotificationKind,
        since: DateTime<Utc>,
    ) -> AppResult<bool>;

    /// Notifications linked to events completed before `cutoff`.
    async fn find_for_completed_events(
        &self,
        cutoff: DateTime<Utc>,
        limit: i64,
    ) -> AppResult<Vec<Uuid>>;

    /// Read, display-expired notifications created before `cutoff`.
    async fn find_stale(
        &self,
        cutoff: DateTime<Utc>,
        now: DateTime<Utc>,
        limit: i64,
    ) -> AppResult<Vec<Uuid>>;

    /// Soft-delete a batch of notifications.
    async fn soft_delete_batch(&self, ids: &[Uuid], now: DateTime<Utc>) -> AppResult<u64>;
}

/// Administration record queries for retention.
#[async_trait]
pub trait AdministrationStore: Send + Sync {
    /// Records given before `cutoff`.
    async fn find_stale(&self, cutoff: DateTime<Utc>, limit: i64) -> AppResult<Vec<Uuid>>;

    /// Soft-delete a batch of records.
    async fn soft_delete_batch(&self, ids: &[Uuid], now: DateTime<Utc>) -> AppResult<u64>;
}

/// Staff recipient lookup.
#[async_trait]
pub trait StaffStore: Send + Sync {
    /// Active staff members with the given role.
    async fn find_active_by_role(&self, role: StaffRole) -> AppResult<Vec<StaffMember>>;
}

/// Cheap database reachability probe guarding the aggregate sweep.
#[async_trait]
pub trait ConnectivityProbe: Send + Sync {
    /// Succeeds when the store is reachable.
    async fn ping(&self) -> AppResult<()>;
}

#[async_trait]
impl MedicationStore for MedicationRepository {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<StudentMedication>> {
        MedicationRepository::find_by_id(self, id).await
    }

    async fn find_due_for_generation(
        &self,
        date: NaiveDate,
        limit: i64,
    ) -> AppResult<Vec<StudentMedication>> {
        MedicationRepository::find_due_for_generation(self, date, limit).await
    }

    async fn find_recently_approved(
        &self,
        since: DateTime<Utc>,
        limit: i64,
    ) -> AppResult<Vec<StudentMedication>> {
        MedicationRepository::find_recently_approved(self, since, limit).await
    }

    async fn find_approved_ready(
        &self,
        date: NaiveDate,
        limit: i64,
    ) -> AppResult<Vec<StudentMedication>> {
        MedicationRepository::find_approved_ready(self, date, limit).await
    }

    async fn activate_batch(&self, ids: &[Uuid], now: DateTime<Utc>) -> AppResult<u64> {
        MedicationRepository::activate_batch(self, ids, now).await
    }

    async fn find_expired_terminal(
        &self,
        cutoff: NaiveDate,
        limit: i64,
    ) -> AppResult<Vec<StudentMedication>> {
        MedicationRepository::find_expired_terminal(self, cutoff, limit).await
    }

    async fn soft_delete_batch(&self, ids: &[Uuid], now: DateTime<Utc>) -> AppResult<u64> {
        MedicationRepository::soft_delete_batch(self, ids, now).await
    }
}

#[async_trait]
impl ScheduleStore for ScheduleRepository {
    async fn exists_for_date(&self, medication_id: Uuid, date: NaiveDate) -> AppResult<bool> {
        ScheduleRepository::exists_for_date(self, medication_id, date).await
    }

    async fn create(&self, schedule: &MedicationSchedule) -> AppResult<()> {
        ScheduleRepository::create(self, schedule).await
    }

    async fn find_overdue(
        &self,
        cutoff: NaiveDateTime,
        limit: i64,
    ) -> AppResult<Vec<MedicationSchedule>> {
        ScheduleRepository::find_overdue(self, cutoff, limit).await
    }

    async fn mark_missed_batch(
        &self,
        ids: &[Uuid],
        reason: &str,
        now: DateTime<Utc>,
    ) -> AppResult<u64> {
        ScheduleRepository::mark_missed_batch(self, ids, reason, now).await
    }
}

#[async_trait]
impl HealthEventStore for HealthEventRepository {
    async fn find_unassigned_pending(
        &self,
        cutoff: DateTime<Utc>,
        limit: i64,
    ) -> AppResult<Vec<HealthEvent>> {
        HealthEventRepository::find_unassigned_pending(self, cutoff, limit).await
    }

    async fn find_stale_in_progress(
        &self,
        cutoff: DateTime<Utc>,
        limit: i64,
    ) -> AppResult<Vec<HealthEvent>> {
        HealthEventRepository::find_stale_in_progress(self, cutoff, limit).await
    }
}

#[async_trait]
impl NotificationStore for NotificationRepository {
    async fn create_many(&self, notifications: &[Notification]) -> AppResult<u64> {
        NotificationRepository::create_many(self, notifications).await
    }

    async fn has_recent_for_event(
        &self,
        event_id: Uuid,
        kind: NotificationKind,
        since: DateTime<Utc>,
    ) -> AppResult<bool> {
        NotificationRepository::has_recent_for_event(self, event_id, kind, since).await
    }

    async fn find_for_completed_events(
        &self,
        cutoff: DateTime<Utc>,
        limit: i64,
    ) -> AppResult<Vec<Uuid>> {
        NotificationRepository::find_for_completed_events(self, cutoff, limit).await
    }

    async fn find_stale(
        &self,
        cutoff: DateTime<Utc>,
        now: DateTime<Utc>,
        limit: i64,
    ) -> AppResult<Vec<Uuid>> {
        NotificationRepository::find_stale(self, cutoff, now, limit).await
    }

    async fn soft_delete_batch(&self, ids: &[Uuid], now: DateTime<Utc>) -> AppResult<u64> {
        NotificationRepository::soft_delete_batch(self, ids, now).await
    }
}

#[async_trait]
impl AdministrationStore for AdministrationRepository {
    async fn find_stale(&self, cutoff: DateTime<Utc>, limit: i64) -> AppResult<Vec<Uuid>> {
        AdministrationRepository::find_stale(self, cutoff, limit).await
    }

    async fn soft_delete_batch(&self, ids: &[Uuid], now: DateTime<Utc>) -> AppResult<u64> {
        AdministrationRepository::soft_delete_batch(self, ids, now).await
    }
}

#[async_trait]
impl StaffStore for StaffRepository {
    async fn find_active_by_role(&self, role: StaffRole) -> AppResult<Vec<StaffMember>> {
        StaffRepository::find_active_by_role(self, role).await
    }
}

#[async_trait]
impl ConnectivityProbe for DatabasePool {
    async fn ping(&self) -> AppResult<()> {
        DatabasePool::ping(self).await
    }
}
