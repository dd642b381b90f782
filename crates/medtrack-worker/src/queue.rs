//! Job queue abstraction for enqueuing and dequeuing background jobs.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing;
use uuid::Uuid;

use medtrack_core::error::AppError;
use medtrack_database::repositories::JobRepository;
use medtrack_entity::job::model::Job;
use medtrack_entity::job::status::{JobPriority, JobStatus};

/// Parameters for creating a new job
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobCreateParams {
    /// Type of job (e.g., "medication_sweep", "health_event_sweep")
    pub job_type: String,
    /// Queue lane name (e.g., "critical", "default", "low")
    pub queue: String,
    /// Priority level
    pub priority: JobPriority,
    /// Job payload as JSON
    pub payload: serde_json::Value,
    /// Maximum retry attempts
    pub max_attempts: i32,
    /// Optional scheduled time (run after this time)
    pub scheduled_at: Option<DateTime<Utc>>,
}

/// Job queue for enqueuing and dequeuing work
#[derive(Debug, Clone)]
pub struct JobQueue {
    /// Job repository for database persistence
    repo: Arc<JobRepository>,
    /// Worker identifier for claiming jobs
    worker_id: String,
    /// Base delay in seconds for the first retry; doubles per attempt
    retry_base_delay_seconds: u64,
}

impl JobQueue {
    /// Create a new job queue
    pub fn new(repo: Arc<JobRepository>, worker_id: String, retry_base_delay_seconds: u64) -> Self {
        Self {
            repo,
            worker_id,
            retry_base_delay_seconds,
        }
    }

    /// Enqueue a new job
    pub async fn enqueue(&self, params: JobCreateParams) -> Result<Job, AppError> {
        let now = Utc::now();
        let job = Job {
            id: Uuid::new_v4(),
            job_type: params.job_type.clone(),
            queue: params.queue.clone(),
            priority: params.priority,
            payload: params.payload.clone(),
            result: None,
            error_message: None,
            status: JobStatus::Pending,
            attempts: 0,
            max_attempts: params.max_attempts,
            scheduled_at: params.scheduled_at,
            started_at: None,
            completed_at: None,
            worker_id: None,
            created_at: now,
            updated_at: now,
        };

        self.repo.create(&job).await?;

        tracing::debug!(
            "Enqueued job: id={}, type='{}', queue='{}', priority={}",
            job.id,
            job.job_type,
            job.queue,
            job.priority
        );

        Ok(job)
    }

    /// Dequeue the next available job from the specified queues
    pub async fn dequeue(&self, queues: &[&str]) -> Result<Option<Job>, AppError> {
        for queue in queues {
            let job = self.repo.claim_next(queue, &self.worker_id).await?;

            if let Some(job) = job {
                tracing::debug!(
                    "Dequeued job: id={}, type='{}', queue='{}'",
                    job.id,
                    job.job_type,
                    job.queue
                );
                return Ok(Some(job));
            }
        }

        Ok(None)
    }

    /// Mark a job as completed successfully
    pub async fn complete(
        &self,
        job_id: Uuid,
        result: Option<serde_json::Value>,
    ) -> Result<(), AppError> {
        self.repo.complete(job_id, result.as_ref()).await?;
        tracing::debug!("Job completed: id={}", job_id);
        Ok(())
    }

    /// Mark a job as failed
    pub async fn fail(&self, job_id: Uuid, error: &str) -> Result<(), AppError> {
        self.repo.fail(job_id, error).await?;
        tracing::debug!("Job failed: id={}, error='{}'", job_id, error);
        Ok(())
    }

    /// Reschedule a transiently-failed job with exponential backoff
    pub async fn retry(&self, job: &Job) -> Result<(), AppError> {
        let delay = retry_delay_seconds(self.retry_base_delay_seconds, job.attempts);
        self.repo.retry_after(job.id, delay).await?;
        tracing::debug!("Job retried: id={}, delay={}s", job.id, delay);
        Ok(())
    }

    /// Physically delete terminal job rows older than `before`
    pub async fn cleanup_terminal(&self, before: DateTime<Utc>) -> Result<u64, AppError> {
        self.repo.cleanup_terminal(before).await
    }
}

/// Backoff for attempt N (1-based): base, 2x base, 4x base, ...
fn retry_delay_seconds(base: u64, attempts: i32) -> i64 {
    let exponent = attempts.saturating_sub(1).max(0) as u32;
    (base as i64).saturating_mul(1_i64 << exponent.min(10))
}
