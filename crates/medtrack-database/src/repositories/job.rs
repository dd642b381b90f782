//! Job repository implementation.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use medtrack_core::error::{AppError, ErrorKind};
use medtrack_core::result::AppResult;
use medtrack_entity::job::model::Job;

/// Repository for background job persistence and queue claims.
#[derive(Debug, Clone)]
pub struct JobRepository {
    pool: PgPool,
}

impl JobRepository {
    /// Create a new job repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new job row.
    pub async fn create(&self, job: &Job) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO jobs \
             (id, job_type, queue, priority, payload, result, error_message, status, attempts, \
              max_attempts, scheduled_at, started_at, completed_at, worker_id, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)",
        )
        .bind(job.id)
        .bind(&job.job_type)
        .bind(&job.queue)
        .bind(job.priority)
        .bind(&job.payload)
        .bind(&job.result)
        .bind(&job.error_message)
        .bind(job.status)
        .bind(job.attempts)
        .bind(job.max_attempts)
        .bind(job.scheduled_at)
        .bind(job.started_at)
        .bind(job.completed_at)
        .bind(&job.worker_id)
        .bind(job.created_at)
        .bind(job.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create job", e))?;
        Ok(())
    }

    /// Claim the next runnable job on a queue.
    ///
    /// `FOR UPDATE SKIP LOCKED` lets multiple workers poll the same queue
    /// without serializing on each other or double-claiming a row.
    pub async fn claim_next(&self, queue: &str, worker_id: &str) -> AppResult<Option<Job>> {
        sqlx::query_as::<_, Job>(
            "UPDATE jobs SET status = 'running', started_at = NOW(), updated_at = NOW(), \
                 attempts = attempts + 1, worker_id = $2 \
             WHERE id = (\
                 SELECT id FROM jobs \
                 WHERE queue = $1 AND status = 'pending' \
                   AND (scheduled_at IS NULL OR scheduled_at <= NOW()) \
                 ORDER BY priority DESC, created_at \
                 FOR UPDATE SKIP LOCKED LIMIT 1\
             ) \
             RETURNING *",
        )
        .bind(queue)
        .bind(worker_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to claim job", e))
    }

    /// Mark a job as completed.
    pub async fn complete(&self, job_id: Uuid, result: Option<&serde_json::Value>) -> AppResult<()> {
        sqlx::query(
            "UPDATE jobs SET status = 'completed', result = $2, completed_at = NOW(), updated_at = NOW() \
             WHERE id = $1",
        )
        .bind(job_id)
        .bind(result)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to complete job", e))?;
        Ok(())
    }

    /// Mark a job as failed.
    pub async fn fail(&self, job_id: Uuid, error_message: &str) -> AppResult<()> {
        sqlx::query(
            "UPDATE jobs SET status = 'failed', error_message = $2, completed_at = NOW(), updated_at = NOW() \
             WHERE id = $1",
        )
        .bind(job_id)
        .bind(error_message)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to mark job as failed", e))?;
        Ok(())
    }

    /// Reset a job to pending for a delayed retry.
    pub async fn retry_after(&self, job_id: Uuid, delay_seconds: i64) -> AppResult<()> {
        sqlx::query(
            "UPDATE jobs SET status = 'pending', error_message = NULL, started_at = NULL, \
                 worker_id = NULL, scheduled_at = NOW() + ($2 || ' seconds')::interval, \
                 updated_at = NOW() \
             WHERE id = $1",
        )
        .bind(job_id)
        .bind(delay_seconds.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to retry job", e))?;
        Ok(())
    }

    /// Delete terminal job rows older than `before`. Job rows are runner
    /// bookkeeping, not domain data, so these are physically removed.
    pub async fn cleanup_terminal(&self, before: DateTime<Utc>) -> AppResult<u64> {
        let result = sqlx::query(
            "DELETE FROM jobs \
             WHERE status IN ('completed', 'failed', 'cancelled') AND updated_at < $1",
        )
        .bind(before)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to clean up jobs", e))?;
        Ok(result.rows_affected())
    }
}
