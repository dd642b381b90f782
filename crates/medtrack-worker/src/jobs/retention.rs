//! Retention sweep job handler.

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use tracing;

use medtrack_entity::job::model::Job;
use medtrack_service::{RetentionService, SweepOutcome};

use crate::executor::{JobExecutionError, JobHandler};

/// Dispatches `retention_sweep` jobs to the nightly purges.
pub struct RetentionJobHandler {
    retention: RetentionService,
}

impl RetentionJobHandler {
    /// Create a new retention job handler
    pub fn new(retention: RetentionService) -> Self {
        Self { retention }
    }

    async fn run_task(&self, task: &str) -> Result<SweepOutcome, JobExecutionError> {
        let now = Utc::now();
        let outcome = match task {
            "medication_retention" => self.retention.purge_expired_medications(now).await,
            "notification_retention" => self.retention.purge_stale_notifications(now).await,
            "administration_retention" => self.retention.purge_stale_administrations(now).await,
            _ => {
                return Err(JobExecutionError::Permanent(format!(
                    "Unknown retention task: '{}'",
                    task
                )));
            }
        };

        outcome.map_err(JobExecutionError::from_app_error)
    }
}

#[async_trait]
impl JobHandler for RetentionJobHandler {
    fn job_type(&self) -> &str {
        "retention_sweep"
    }

    async fn execute(&self, job: &Job) -> Result<Option<Value>, JobExecutionError> {
        let task = job
            .payload
            .get("task")
            .and_then(|v| v.as_str())
            .unwrap_or("");

        let outcome = self.run_task(task).await?;
        tracing::info!(
            task,
            purged = outcome.affected,
            "Retention task finished"
        );

        Ok(Some(serde_json::json!({
            "task": task,
            "outcome": outcome,
        })))
    }
}
