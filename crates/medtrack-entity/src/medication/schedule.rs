//! Medication schedule entity model.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::status::ScheduleStatus;

/// One planned dose instance of a medication on a specific date and time.
///
/// Created by the schedule generator; resolved by administration actions or
/// the overdue sweep. Never physically deleted, only soft-marked.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MedicationSchedule {
    /// Unique schedule identifier.
    pub id: Uuid,
    /// The parent medication course.
    pub medication_id: Uuid,
    /// The student receiving the dose.
    pub student_id: Uuid,
    /// Calendar day of the dose.
    pub scheduled_date: NaiveDate,
    /// Time-of-day of the dose.
    pub scheduled_time: NaiveTime,
    /// Dose amount for this instance.
    pub scheduled_dosage: String,
    /// Current status.
    pub status: ScheduleStatus,
    /// Display priority (`"low"`, `"normal"`, `"high"`).
    pub priority: Option<String>,
    /// The administration record, once the dose is given.
    pub administration_id: Option<Uuid>,
    /// When the dose was marked missed.
    pub missed_at: Option<DateTime<Utc>>,
    /// Why the dose was marked missed.
    pub missed_reason: Option<String>,
    /// How many reminders have been sent for this dose.
    pub reminder_count: i32,
    /// Whether a nurse confirmed the schedule.
    pub nurse_confirmed: bool,
    /// Who last touched the row.
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

impl MedicationSchedule {
    /// Build a fresh Pending schedule for one dose slot.
    pub fn pending(
        medication_id: Uuid,
        student_id: Uuid,
        date: NaiveDate,
        time: NaiveTime,
        dosage: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            medication_id,
            student_id,
            scheduled_date: date,
            scheduled_time: time,
            scheduled_dosage: dosage.into(),
            status: ScheduleStatus::Pending,
            priority: None,
            administration_id: None,
            missed_at: None,
            missed_reason: None,
            reminder_count: 0,
            nurse_confirmed: false,
            updated_by: None,
            is_deleted: false,
            deleted_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// The dose slot as a naive local timestamp.
    pub fn scheduled_at(&self) -> NaiveDateTime {
        self.scheduled_date.and_time(self.scheduled_time)
    }

    /// Check whether a Pending dose is past its slot by more than the grace
    /// period, measured in local wall-clock time.
    pub fn is_overdue(&self, now_local: NaiveDateTime, grace_minutes: i64) -> bool {
        self.status == ScheduleStatus::Pending
            && !self.is_deleted
            && self.scheduled_at() + TimeDelta::minutes(grace_minutes) < now_local
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schedule_at(hour: u32) -> MedicationSchedule {
        MedicationSchedule::pending(
            Uuid::new_v4(),
            Uuid::new_v4(),
            NaiveDate::from_ymd_opt(2024, 1, 8).unwrap(),
            NaiveTime::from_hms_opt(hour, 0, 0).unwrap(),
            "5ml",
            Utc::now(),
        )
    }

    #[test]
    fn test_overdue_respects_grace_period() {
        let schedule = schedule_at(8);
        let base = NaiveDate::from_ymd_opt(2024, 1, 8).unwrap();

        // 20 minutes late, 30 minute grace: not yet overdue.
        let now = base.and_time(NaiveTime::from_hms_opt(8, 20, 0).unwrap());
        assert!(!schedule.is_overdue(now, 30));

        // 31 minutes late: overdue.
        let now = base.and_time(NaiveTime::from_hms_opt(8, 31, 0).unwrap());
        assert!(schedule.is_overdue(now, 30));
    }

    #[test]
    fn test_resolved_schedule_never_overdue() {
        let mut schedule = schedule_at(8);
        schedule.status = ScheduleStatus::Completed;
        let now = NaiveDate::from_ymd_opt(2024, 1, 9).unwrap().and_hms_opt(12, 0, 0).unwrap();
        assert!(!schedule.is_overdue(now, 0));
    }
}
