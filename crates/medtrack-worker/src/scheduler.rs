//! Cron scheduler that enqueues the recurring sweep jobs.
//!
//! The scheduler only enqueues; the worker runner picks the jobs up and
//! dispatches them. Sweep cadence lives here, sweep policy (thresholds,
//! cooldowns, batch sizes) lives in configuration read by the services.

use std::sync::Arc;

use tokio_cron_scheduler::{Job as CronJob, JobScheduler};
use tracing;

use medtrack_core::error::AppError;
use medtrack_entity::job::status::JobPriority;

use crate::queue::{JobCreateParams, JobQueue};

/// Cron-based scheduler for the periodic sweeps
pub struct CronScheduler {
    /// The underlying job scheduler
    scheduler: JobScheduler,
    /// Job queue for enqueuing scheduled work
    queue: Arc<JobQueue>,
}

impl std::fmt::Debug for CronScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CronScheduler").finish()
    }
}

impl CronScheduler {
    /// Create a new cron scheduler
    pub async fn new(queue: Arc<JobQueue>) -> Result<Self, AppError> {
        let scheduler = JobScheduler::new()
            .await
            .map_err(|e| AppError::internal(format!("Failed to create scheduler: {}", e)))?;

        Ok(Self { scheduler, queue })
    }

    /// Register all recurring sweep tasks
    pub async fn register_default_tasks(&self) -> Result<(), AppError> {
        // Medication sweeps. Today generation, the activation flip, and the
        // catch-up for fresh approvals run every minute so a newly approved
        // course gets its schedules within a minute of approval.
        self.register_task(
            "0 * * * * *",
            medication_task("today_generation", 1),
        )
        .await?;
        self.register_task("0 * * * * *", medication_task("activation", 1))
            .await?;
        self.register_task(
            "0 * * * * *",
            medication_task("recent_approval_generation", 1),
        )
        .await?;
        // Tomorrow generation is gated on the evening hour inside the
        // service, so a 10 minute cadence is plenty.
        self.register_task(
            "0 */10 * * * *",
            medication_task("tomorrow_generation", 1),
        )
        .await?;
        self.register_task("0 */5 * * * *", medication_task("overdue_check", 1))
            .await?;

        // Health event escalation is the time-critical path.
        self.register_task(
            "0 * * * * *",
            JobCreateParams {
                job_type: "health_event_sweep".to_string(),
                queue: "critical".to_string(),
                priority: JobPriority::Critical,
                payload: serde_json::json!({"task": "sweep"}),
                max_attempts: 3,
                scheduled_at: None,
            },
        )
        .await?;

        // Nightly retention, staggered on the low lane.
        self.register_task("0 0 1 * * *", retention_task("medication_retention"))
            .await?;
        self.register_task("0 0 2 * * *", retention_task("notification_retention"))
            .await?;
        self.register_task("0 30 2 * * *", retention_task("administration_retention"))
            .await?;

        // Terminal job rows are runner bookkeeping; purge them nightly.
        self.register_task(
            "0 0 3 * * *",
            JobCreateParams {
                job_type: "job_cleanup".to_string(),
                queue: "low".to_string(),
                priority: JobPriority::Low,
                payload: serde_json::json!({"task": "job_cleanup"}),
                max_attempts: 1,
                scheduled_at: None,
            },
        )
        .await?;

        tracing::info!("All scheduled tasks registered");
        Ok(())
    }

    /// Start the scheduler
    pub async fn start(&self) -> Result<(), AppError> {
        self.scheduler
            .start()
            .await
            .map_err(|e| AppError::internal(format!("Failed to start scheduler: {}", e)))?;

        tracing::info!("Cron scheduler started");
        Ok(())
    }

    /// Shutdown the scheduler
    pub async fn shutdown(&mut self) -> Result<(), AppError> {
        self.scheduler
            .shutdown()
            .await
            .map_err(|e| AppError::internal(format!("Failed to shutdown scheduler: {}", e)))?;

        tracing::info!("Cron scheduler shut down");
        Ok(())
    }

    /// Register one cron entry that enqueues `params` on every fire
    async fn register_task(
        &self,
        schedule: &str,
        params: JobCreateParams,
    ) -> Result<(), AppError> {
        let queue = Arc::clone(&self.queue);
        let label = format!(
            "{}/{}",
            params.job_type,
            params
                .payload
                .get("task")
                .and_then(|v| v.as_str())
                .unwrap_or("-")
        );
        let log_label = label.clone();

        let job = CronJob::new_async(schedule, move |_uuid, _lock| {
            let queue = Arc::clone(&queue);
            let params = params.clone();
            let label = label.clone();
            Box::pin(async move {
                tracing::debug!("Scheduling {} job", label);
                if let Err(e) = queue.enqueue(params).await {
                    tracing::error!("Failed to enqueue {}: {}", label, e);
                }
            })
        })
        .map_err(|e| AppError::internal(format!("Failed to create {log_label} schedule: {e}")))?;

        self.scheduler
            .add(job)
            .await
            .map_err(|e| AppError::internal(format!("Failed to add {log_label} schedule: {e}")))?;

        tracing::info!("Registered: {} ({})", log_label, schedule);
        Ok(())
    }
}

fn medication_task(task: &str, max_attempts: i32) -> JobCreateParams {
    JobCreateParams {
        job_type: "medication_sweep".to_string(),
        queue: "default".to_string(),
        priority: JobPriority::Normal,
        payload: serde_json::json!({"task": task}),
        max_attempts,
        scheduled_at: None,
    }
}

fn retention_task(task: &str) -> JobCreateParams {
    JobCreateParams {
        job_type: "retention_sweep".to_string(),
        queue: "low".to_string(),
        priority: JobPriority::Low,
        payload: serde_json::json!({"task": task}),
        max_attempts: 1,
        scheduled_at: None,
    }
}
