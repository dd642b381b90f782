//! Medication schedule repository implementation.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use medtrack_core::error::{AppError, ErrorKind};
use medtrack_core::result::AppResult;
use medtrack_entity::medication::schedule::MedicationSchedule;

/// Repository for planned dose schedules.
#[derive(Debug, Clone)]
pub struct ScheduleRepository {
    pool: PgPool,
}

impl ScheduleRepository {
    /// Create a new schedule repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Check whether a non-deleted schedule already exists for the given
    /// medication and date. This existence check is what makes repeated
    /// generator invocation safe.
    pub async fn exists_for_date(&self, medication_id: Uuid, date: NaiveDate) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS (\
                SELECT 1 FROM medication_schedules \
                WHERE medication_id = $1 AND scheduled_date = $2 AND NOT is_deleted\
             )",
        )
        .bind(medication_id)
        .bind(date)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to check schedule existence", e)
        })?;
        Ok(exists)
    }

    /// Insert one schedule row.
    pub async fn create(&self, schedule: &MedicationSchedule) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO medication_schedules \
             (id, medication_id, student_id, scheduled_date, scheduled_time, scheduled_dosage, \
              status, priority, administration_id, missed_at, missed_reason, reminder_count, \
              nurse_confirmed, updated_by, is_deleted, deleted_at, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18)",
        )
        .bind(schedule.id)
        .bind(schedule.medication_id)
        .bind(schedule.student_id)
        .bind(schedule.scheduled_date)
        .bind(schedule.scheduled_time)
        .bind(&schedule.scheduled_dosage)
        .bind(schedule.status)
        .bind(&schedule.priority)
        .bind(schedule.administration_id)
        .bind(schedule.missed_at)
        .bind(&schedule.missed_reason)
        .bind(schedule.reminder_count)
        .bind(schedule.nurse_confirmed)
        .bind(&schedule.updated_by)
        .bind(schedule.is_deleted)
        .bind(schedule.deleted_at)
        .bind(schedule.created_at)
        .bind(schedule.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create schedule", e))?;
        Ok(())
    }

    /// Pending schedules whose slot (date + time, local wall clock) is
    /// before `cutoff`.
    pub async fn find_overdue(
        &self,
        cutoff: NaiveDateTime,
        limit: i64,
    ) -> AppResult<Vec<MedicationSchedule>> {
        sqlx::query_as::<_, MedicationSchedule>(
            "SELECT * FROM medication_schedules \
             WHERE status = 'pending' AND NOT is_deleted \
               AND scheduled_date + scheduled_time < $1 \
             ORDER BY scheduled_date, scheduled_time LIMIT $2",
        )
        .bind(cutoff)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to find overdue schedules", e)
        })
    }

    /// Mark a batch of schedules Missed in one statement.
    ///
    /// The status filter makes a repeated pass over the same ids a no-op.
    pub async fn mark_missed_batch(
        &self,
        ids: &[Uuid],
        reason: &str,
        now: DateTime<Utc>,
    ) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE medication_schedules \
             SET status = 'missed', missed_at = $2, missed_reason = $3, \
                 updated_by = 'SYSTEM', updated_at = $2 \
             WHERE id = ANY($1) AND status = 'pending'",
        )
        .bind(ids)
        .bind(now)
        .bind(reason)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to mark schedules missed", e)
        })?;
        Ok(result.rows_affected())
    }
}
