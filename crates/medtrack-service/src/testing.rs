//! In-memory store fakes and entity builders shared by service tests.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use uuid::Uuid;

use medtrack_core::error::AppError;
use medtrack_core::result::AppResult;
use medtrack_entity::health_event::model::HealthEvent;
use medtrack_entity::health_event::status::HealthEventStatus;
use medtrack_entity::medication::model::StudentMedication;
use medtrack_entity::medication::schedule::MedicationSchedule;
use medtrack_entity::medication::status::{MedicationStatus, ScheduleStatus};
use medtrack_entity::notification::kind::NotificationKind;
use medtrack_entity::notification::model::Notification;
use medtrack_entity::staff::model::StaffMember;
use medtrack_entity::staff::role::StaffRole;

use crate::stores::{
    AdministrationStore, ConnectivityProbe, HealthEventStore, MedicationStore, NotificationStore,
    ScheduleStore, StaffStore,
};

pub fn active_medication(start: NaiveDate, end: NaiveDate) -> StudentMedication {
    let now = Utc::now();
    StudentMedication {
        id: Uuid::new_v4(),
        student_id: Uuid::new_v4(),
        medication_name: "Amoxicillin".to_string(),
        dosage: "5ml".to_string(),
        instructions: None,
        start_date: start,
        end_date: end,
        expiry_date: None,
        status: MedicationStatus::Active,
        auto_generate_schedule: true,
        skip_weekends: false,
        skip_dates: None,
        dose_times: None,
        approved_at: Some(now),
        approved_by: Some(Uuid::new_v4()),
        last_updated_by: None,
        is_deleted: false,
        deleted_at: None,
        created_at: now,
        updated_at: now,
    }
}

pub fn approved_medication(start: NaiveDate, end: NaiveDate) -> StudentMedication {
    let mut med = active_medication(start, end);
    med.status = MedicationStatus::Approved;
    med
}

pub fn pending_event(created_minutes_ago: i64, now: DateTime<Utc>) -> HealthEvent {
    HealthEvent {
        id: Uuid::new_v4(),
        student_id: Uuid::new_v4(),
        event_type: "injury".to_string(),
        description: "Fell in the playground".to_string(),
        location: Some("Playground".to_string()),
        is_emergency: false,
        status: HealthEventStatus::Pending,
        handled_by: None,
        created_at: now - chrono::TimeDelta::minutes(created_minutes_ago),
        assigned_at: None,
        completed_at: None,
        updated_at: now,
    }
}

pub fn staff_member(role: StaffRole) -> StaffMember {
    let now = Utc::now();
    StaffMember {
        id: Uuid::new_v4(),
        full_name: "Alex Morgan".to_string(),
        email: "alex.morgan@example.edu".to_string(),
        role,
        is_active: true,
        created_at: now,
        updated_at: now,
    }
}

/// Medication store backed by a mutex-guarded vector.
pub struct FakeMedicationStore {
    rows: Mutex<Vec<StudentMedication>>,
    pending_schedule_counts: Mutex<HashMap<Uuid, usize>>,
}

impl FakeMedicationStore {
    pub fn new(rows: Vec<StudentMedication>) -> Self {
        Self {
            rows: Mutex::new(rows),
            pending_schedule_counts: Mutex::new(HashMap::new()),
        }
    }

    /// Record that a medication still has open Pending schedules, which
    /// blocks it from retention.
    pub fn set_pending_schedules(&self, id: Uuid, count: usize) {
        self.pending_schedule_counts.lock().unwrap().insert(id, count);
    }

    pub fn status_of(&self, id: Uuid) -> MedicationStatus {
        self.rows
            .lock()
            .unwrap()
            .iter()
            .find(|m| m.id == id)
            .map(|m| m.status)
            .unwrap()
    }

    pub fn is_deleted(&self, id: Uuid) -> bool {
        self.rows
            .lock()
            .unwrap()
            .iter()
            .find(|m| m.id == id)
            .map(|m| m.is_deleted)
            .unwrap()
    }
}

#[async_trait]
impl MedicationStore for FakeMedicationStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<StudentMedication>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|m| m.id == id && !m.is_deleted)
            .cloned())
    }

    async fn find_due_for_generation(
        &self,
        date: NaiveDate,
        limit: i64,
    ) -> AppResult<Vec<StudentMedication>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|m| {
                !m.is_deleted
                    && m.status == MedicationStatus::Active
                    && m.auto_generate_schedule
                    && m.covers_date(date)
            })
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn find_recently_approved(
        &self,
        since: DateTime<Utc>,
        limit: i64,
    ) -> AppResult<Vec<StudentMedication>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|m| {
                !m.is_deleted
                    && m.status == MedicationStatus::Active
                    && m.auto_generate_schedule
                    && m.approved_at.map(|at| at >= since).unwrap_or(false)
            })
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn find_approved_ready(
        &self,
        _date: NaiveDate,
        limit: i64,
    ) -> AppResult<Vec<StudentMedication>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|m| !m.is_deleted && m.status == MedicationStatus::Approved)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn activate_batch(&self, ids: &[Uuid], now: DateTime<Utc>) -> AppResult<u64> {
        let mut rows = self.rows.lock().unwrap();
        let mut flipped = 0;
        for row in rows.iter_mut() {
            if ids.contains(&row.id) && row.status == MedicationStatus::Approved {
                row.status = MedicationStatus::Active;
                row.last_updated_by = Some("SYSTEM".to_string());
                row.updated_at = now;
                flipped += 1;
            }
        }
        Ok(flipped)
    }

    async fn find_expired_terminal(
        &self,
        cutoff: NaiveDate,
        limit: i64,
    ) -> AppResult<Vec<StudentMedication>> {
        let counts = self.pending_schedule_counts.lock().unwrap();
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|m| {
                !m.is_deleted
                    && m.status.is_terminal()
                    && m.end_date < cutoff
                    && counts.get(&m.id).copied().unwrap_or(0) == 0
            })
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn soft_delete_batch(&self, ids: &[Uuid], now: DateTime<Utc>) -> AppResult<u64> {
        let mut rows = self.rows.lock().unwrap();
        let mut deleted = 0;
        for row in rows.iter_mut() {
            if ids.contains(&row.id) && !row.is_deleted {
                row.is_deleted = true;
                row.deleted_at = Some(now);
                row.updated_at = now;
                deleted += 1;
            }
        }
        Ok(deleted)
    }
}

/// Schedule store with injectable per-date and per-medication failures.
pub struct FakeScheduleStore {
    rows: Mutex<Vec<MedicationSchedule>>,
    failing_dates: Mutex<HashSet<NaiveDate>>,
    failing_medications: Mutex<HashSet<Uuid>>,
}

impl FakeScheduleStore {
    pub fn new() -> Self {
        Self {
            rows: Mutex::new(Vec::new()),
            failing_dates: Mutex::new(HashSet::new()),
            failing_medications: Mutex::new(HashSet::new()),
        }
    }

    pub fn insert(&self, schedule: MedicationSchedule) {
        self.rows.lock().unwrap().push(schedule);
    }

    pub fn fail_on_date(&self, date: NaiveDate) {
        self.failing_dates.lock().unwrap().insert(date);
    }

    pub fn fail_on_medication(&self, medication_id: Uuid) {
        self.failing_medications.lock().unwrap().insert(medication_id);
    }

    pub fn count(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    pub fn all(&self) -> Vec<MedicationSchedule> {
        self.rows.lock().unwrap().clone()
    }
}

#[async_trait]
impl ScheduleStore for FakeScheduleStore {
    async fn exists_for_date(&self, medication_id: Uuid, date: NaiveDate) -> AppResult<bool> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .any(|s| s.medication_id == medication_id && s.scheduled_date == date && !s.is_deleted))
    }

    async fn create(&self, schedule: &MedicationSchedule) -> AppResult<()> {
        if self.failing_dates.lock().unwrap().contains(&schedule.scheduled_date)
            || self
                .failing_medications
                .lock()
                .unwrap()
                .contains(&schedule.medication_id)
        {
            return Err(AppError::database("injected insert failure"));
        }
        self.rows.lock().unwrap().push(schedule.clone());
        Ok(())
    }

    async fn find_overdue(
        &self,
        cutoff: NaiveDateTime,
        limit: i64,
    ) -> AppResult<Vec<MedicationSchedule>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|s| {
                s.status == ScheduleStatus::Pending && !s.is_deleted && s.scheduled_at() < cutoff
            })
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn mark_missed_batch(
        &self,
        ids: &[Uuid],
        reason: &str,
        now: DateTime<Utc>,
    ) -> AppResult<u64> {
        let mut rows = self.rows.lock().unwrap();
        let mut marked = 0;
        for row in rows.iter_mut() {
            if ids.contains(&row.id) && row.status == ScheduleStatus::Pending {
                row.status = ScheduleStatus::Missed;
                row.missed_at = Some(now);
                row.missed_reason = Some(reason.to_string());
                row.updated_by = Some("SYSTEM".to_string());
                row.updated_at = now;
                marked += 1;
            }
        }
        Ok(marked)
    }
}

/// Read-only health event store over a fixed set of events.
pub struct FakeHealthEventStore {
    rows: Vec<HealthEvent>,
}

impl FakeHealthEventStore {
    pub fn new(rows: Vec<HealthEvent>) -> Self {
        Self { rows }
    }
}

#[async_trait]
impl HealthEventStore for FakeHealthEventStore {
    async fn find_unassigned_pending(
        &self,
        cutoff: DateTime<Utc>,
        limit: i64,
    ) -> AppResult<Vec<HealthEvent>> {
        Ok(self
            .rows
            .iter()
            .filter(|e| {
                e.status == HealthEventStatus::Pending
                    && e.handled_by.is_none()
                    && e.created_at <= cutoff
            })
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn find_stale_in_progress(
        &self,
        cutoff: DateTime<Utc>,
        limit: i64,
    ) -> AppResult<Vec<HealthEvent>> {
        Ok(self
            .rows
            .iter()
            .filter(|e| {
                e.status == HealthEventStatus::InProgress
                    && e.assigned_at.map(|at| at <= cutoff).unwrap_or(false)
            })
            .take(limit as usize)
            .cloned()
            .collect())
    }
}

/// Notification store capturing everything created.
pub struct FakeNotificationStore {
    rows: Mutex<Vec<Notification>>,
    event_completions: Mutex<HashMap<Uuid, DateTime<Utc>>>,
    fail_writes: AtomicBool,
}

impl FakeNotificationStore {
    pub fn new() -> Self {
        Self {
            rows: Mutex::new(Vec::new()),
            event_completions: Mutex::new(HashMap::new()),
            fail_writes: AtomicBool::new(false),
        }
    }

    pub fn insert(&self, notification: Notification) {
        self.rows.lock().unwrap().push(notification);
    }

    /// Mark a health event as completed at `at` for cleanup queries.
    pub fn set_event_completed(&self, event_id: Uuid, at: DateTime<Utc>) {
        self.event_completions.lock().unwrap().insert(event_id, at);
    }

    pub fn fail_writes(&self) {
        self.fail_writes.store(true, Ordering::SeqCst);
    }

    pub fn created(&self) -> Vec<Notification> {
        self.rows.lock().unwrap().clone()
    }

    pub fn live_count(&self) -> usize {
        self.rows.lock().unwrap().iter().filter(|n| !n.is_deleted).count()
    }
}

#[async_trait]
impl NotificationStore for FakeNotificationStore {
    async fn create_many(&self, notifications: &[Notification]) -> AppResult<u64> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(AppError::database("injected write failure"));
        }
        let mut rows = self.rows.lock().unwrap();
        rows.extend_from_slice(notifications);
        Ok(notifications.len() as u64)
    }

    async fn has_recent_for_event(
        &self,
        event_id: Uuid,
        kind: NotificationKind,
        since: DateTime<Utc>,
    ) -> AppResult<bool> {
        Ok(self.rows.lock().unwrap().iter().any(|n| {
            n.health_event_id == Some(event_id)
                && n.kind == kind
                && !n.is_deleted
                && n.created_at >= since
        }))
    }

    async fn find_for_completed_events(
        &self,
        cutoff: DateTime<Utc>,
        limit: i64,
    ) -> AppResult<Vec<Uuid>> {
        let completions = self.event_completions.lock().unwrap();
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|n| {
                !n.is_deleted
                    && n.health_event_id
                        .and_then(|id| completions.get(&id))
                        .map(|at| *at <= cutoff)
                        .unwrap_or(false)
            })
            .map(|n| n.id)
            .take(limit as usize)
            .collect())
    }

    async fn find_stale(
        &self,
        cutoff: DateTime<Utc>,
        now: DateTime<Utc>,
        limit: i64,
    ) -> AppResult<Vec<Uuid>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|n| {
                !n.is_deleted && n.is_read && n.is_display_expired(now) && n.created_at < cutoff
            })
            .map(|n| n.id)
            .take(limit as usize)
            .collect())
    }

    async fn soft_delete_batch(&self, ids: &[Uuid], now: DateTime<Utc>) -> AppResult<u64> {
        let mut rows = self.rows.lock().unwrap();
        let mut deleted = 0;
        for row in rows.iter_mut() {
            if ids.contains(&row.id) && !row.is_deleted {
                row.is_deleted = true;
                row.deleted_at = Some(now);
                row.updated_at = now;
                deleted += 1;
            }
        }
        Ok(deleted)
    }
}

/// Administration store holding bare (id, administered_at) pairs.
pub struct FakeAdministrationStore {
    rows: Mutex<Vec<(Uuid, DateTime<Utc>, bool)>>,
}

impl FakeAdministrationStore {
    pub fn new() -> Self {
        Self {
            rows: Mutex::new(Vec::new()),
        }
    }

    pub fn insert(&self, administered_at: DateTime<Utc>) -> Uuid {
        let id = Uuid::new_v4();
        self.rows.lock().unwrap().push((id, administered_at, false));
        id
    }

    pub fn live_count(&self) -> usize {
        self.rows.lock().unwrap().iter().filter(|(_, _, deleted)| !deleted).count()
    }
}

#[async_trait]
impl AdministrationStore for FakeAdministrationStore {
    async fn find_stale(&self, cutoff: DateTime<Utc>, limit: i64) -> AppResult<Vec<Uuid>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, at, deleted)| !deleted && *at < cutoff)
            .map(|(id, _, _)| *id)
            .take(limit as usize)
            .collect())
    }

    async fn soft_delete_batch(&self, ids: &[Uuid], _now: DateTime<Utc>) -> AppResult<u64> {
        let mut rows = self.rows.lock().unwrap();
        let mut deleted = 0;
        for (id, _, flag) in rows.iter_mut() {
            if ids.contains(id) && !*flag {
                *flag = true;
                deleted += 1;
            }
        }
        Ok(deleted)
    }
}

/// Staff store over a fixed roster.
pub struct FakeStaffStore {
    rows: Vec<StaffMember>,
}

impl FakeStaffStore {
    pub fn new(rows: Vec<StaffMember>) -> Self {
        Self { rows }
    }
}

#[async_trait]
impl StaffStore for FakeStaffStore {
    async fn find_active_by_role(&self, role: StaffRole) -> AppResult<Vec<StaffMember>> {
        Ok(self
            .rows
            .iter()
            .filter(|s| s.role == role && s.is_active)
            .cloned()
            .collect())
    }
}

/// Probe whose reachability can be toggled mid-test.
pub struct FakeProbe {
    reachable: AtomicBool,
}

impl FakeProbe {
    pub fn new() -> Self {
        Self {
            reachable: AtomicBool::new(true),
        }
    }

    pub fn set_reachable(&self, reachable: bool) {
        self.reachable.store(reachable, Ordering::SeqCst);
    }
}

#[async_trait]
impl ConnectivityProbe for FakeProbe {
    async fn ping(&self) -> AppResult<()> {
        if self.reachable.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(AppError::service_unavailable("database unreachable"))
        }
    }
}
