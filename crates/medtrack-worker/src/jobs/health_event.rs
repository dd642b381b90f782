//! Health-event sweep job handler.

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use tracing;

use medtrack_entity::job::model::Job;
use medtrack_service::{HealthEventEscalationService, SweepOutcome};

use crate::executor::{JobExecutionError, JobHandler};

/// Runs the aggregate escalation/reminder/cleanup pass every minute.
///
/// The scheduler enqueues the aggregate `sweep` task; the individual
/// phases remain addressable for ad-hoc runs.
pub struct HealthEventJobHandler {
    escalation: HealthEventEscalationService,
}

impl HealthEventJobHandler {
    /// Create a new health event job handler
    pub fn new(escalation: HealthEventEscalationService) -> Self {
        Self { escalation }
    }

    async fn run_task(&self, task: &str) -> Result<SweepOutcome, JobExecutionError> {
        let now = Utc::now();
        let outcome = match task {
            "" | "sweep" => self.escalation.run_sweep(now).await,
            "escalation" => self.escalation.escalate_unassigned(now).await,
            "reminder" => self.escalation.remind_stale_in_progress(now).await,
            "cleanup" => {
                self.escalation
                    .cleanup_completed_event_notifications(now)
                    .await
            }
            _ => {
                return Err(JobExecutionError::Permanent(format!(
                    "Unknown health event task: '{}'",
                    task
                )));
            }
        };

        outcome.map_err(JobExecutionError::from_app_error)
    }
}

#[async_trait]
impl JobHandler for HealthEventJobHandler {
    fn job_type(&self) -> &str {
        "health_event_sweep"
    }

    async fn execute(&self, job: &Job) -> Result<Option<Value>, JobExecutionError> {
        let task = job
            .payload
            .get("task")
            .and_then(|v| v.as_str())
            .unwrap_or("sweep");

        let outcome = self.run_task(task).await?;
        tracing::debug!(
            task,
            examined = outcome.examined,
            affected = outcome.affected,
            skipped = outcome.skipped,
            "Health event sweep finished"
        );

        Ok(Some(serde_json::json!({
            "task": task,
            "outcome": outcome,
        })))
    }
}
