//! Student medication repository implementation.

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use medtrack_core::error::{AppError, ErrorKind};
use medtrack_core::result::AppResult;
use medtrack_entity::medication::model::StudentMedication;

/// Repository for medication course queries and batch status updates.
///
/// The selection queries implement the sweep guards in SQL: per-date
/// schedule existence via `NOT EXISTS`, bounded `LIMIT` batches, and
/// soft-delete filtering everywhere.
#[derive(Debug, Clone)]
pub struct MedicationRepository {
    pool: PgPool,
}

impl MedicationRepository {
    /// Create a new medication repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a medication by ID.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<StudentMedication>> {
        sqlx::query_as::<_, StudentMedication>(
            "SELECT * FROM student_medications WHERE id = $1 AND NOT is_deleted",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find medication", e))
    }

    /// Active, auto-generating medications covering `date` that have no
    /// non-deleted schedule for that date yet.
    pub async fn find_due_for_generation(
        &self,
        date: NaiveDate,
        limit: i64,
    ) -> AppResult<Vec<StudentMedication>> {
        sqlx::query_as::<_, StudentMedication>(
            "SELECT m.* FROM student_medications m \
             WHERE m.status = 'active' AND m.auto_generate_schedule AND NOT m.is_deleted \
               AND m.start_date <= $1 AND m.end_date >= $1 \
               AND NOT EXISTS (\
                   SELECT 1 FROM medication_schedules s \
                   WHERE s.medication_id = m.id AND s.scheduled_date = $1 AND NOT s.is_deleted\
               ) \
             ORDER BY m.created_at LIMIT $2",
        )
        .bind(date)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to find medications due for generation", e)
        })
    }

    /// Active, auto-generating medications approved since `since`.
    pub async fn find_recently_approved(
        &self,
        since: DateTime<Utc>,
        limit: i64,
    ) -> AppResult<Vec<StudentMedication>> {
        sqlx::query_as::<_, StudentMedication>(
            "SELECT * FROM student_medications \
             WHERE status = 'active' AND auto_generate_schedule AND NOT is_deleted \
               AND approved_at IS NOT NULL AND approved_at >= $1 \
             ORDER BY approved_at LIMIT $2",
        )
        .bind(since)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to find recently approved medications", e)
        })
    }

    /// Approved medications whose dosing window contains `date`.
    pub async fn find_approved_ready(
        &self,
        date: NaiveDate,
        limit: i64,
    ) -> AppResult<Vec<StudentMedication>> {
        sqlx::query_as::<_, StudentMedication>(
            "SELECT * FROM student_medications \
             WHERE status = 'approved' AND NOT is_deleted \
               AND start_date <= $1 AND end_date >= $1 \
             ORDER BY start_date LIMIT $2",
        )
        .bind(date)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to find approved medications", e)
        })
    }

    /// Flip a batch of Approved medications to Active in one statement.
    ///
    /// Idempotent: the status filter makes a second flip of the same ids a
    /// no-op.
    pub async fn activate_batch(&self, ids: &[Uuid], now: DateTime<Utc>) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE student_medications \
             SET status = 'active', last_updated_by = 'SYSTEM', updated_at = $2 \
             WHERE id = ANY($1) AND status = 'approved'",
        )
        .bind(ids)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to activate medications", e)
        })?;
        Ok(result.rows_affected())
    }

    /// Terminal medications past the retention cutoff with no Pending
    /// schedules left.
    pub async fn find_expired_terminal(
        &self,
        cutoff: NaiveDate,
        limit: i64,
    ) -> AppResult<Vec<StudentMedication>> {
        sqlx::query_as::<_, StudentMedication>(
            "SELECT m.* FROM student_medications m \
             WHERE m.status IN ('completed', 'discontinued') AND NOT m.is_deleted \
               AND m.end_date < $1 \
               AND NOT EXISTS (\
                   SELECT 1 FROM medication_schedules s \
                   WHERE s.medication_id = m.id AND s.status = 'pending' AND NOT s.is_deleted\
               ) \
             ORDER BY m.end_date LIMIT $2",
        )
        .bind(cutoff)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to find expired medications", e)
        })
    }

    /// Soft-delete a batch of medications.
    pub async fn soft_delete_batch(&self, ids: &[Uuid], now: DateTime<Utc>) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE student_medications \
             SET is_deleted = TRUE, deleted_at = $2, last_updated_by = 'SYSTEM', updated_at = $2 \
             WHERE id = ANY($1) AND NOT is_deleted",
        )
        .bind(ids)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to soft-delete medications", e)
        })?;
        Ok(result.rows_affected())
    }
}
