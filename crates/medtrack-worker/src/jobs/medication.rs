//! Medication sweep job handler.

use async_trait::async_trait;
use chrono::{Local, Utc};
use serde_json::Value;
use tracing;

use medtrack_entity::job::model::Job;
use medtrack_service::{MedicationLifecycleService, SweepOutcome};

use crate::executor::{JobExecutionError, JobHandler};

/// Dispatches `medication_sweep` jobs to the lifecycle evaluators.
///
/// Schedule dates and the tomorrow-generation gate are local wall-clock
/// concepts; instants (approvals, audit timestamps) stay in UTC.
pub struct MedicationJobHandler {
    lifecycle: MedicationLifecycleService,
}

impl MedicationJobHandler {
    /// Create a new medication job handler
    pub fn new(lifecycle: MedicationLifecycleService) -> Self {
        Self { lifecycle }
    }

    async fn run_task(&self, task: &str) -> Result<SweepOutcome, JobExecutionError> {
        let now = Utc::now();
        let now_local = Local::now().naive_local();
        let today = now_local.date();

        let outcome = match task {
            "today_generation" => self.lifecycle.generate_today(today).await,
            "tomorrow_generation" => self.lifecycle.generate_tomorrow(now_local).await,
            "recent_approval_generation" => {
                self.lifecycle.generate_for_recent_approvals(now, today).await
            }
            "activation" => self.lifecycle.activate_due_medications(today, now).await,
            "overdue_check" => self.lifecycle.mark_overdue_schedules(now_local, now).await,
            _ => {
                return Err(JobExecutionError::Permanent(format!(
                    "Unknown medication task: '{}'",
                    task
                )));
            }
        };

        outcome.map_err(JobExecutionError::from_app_error)
    }
}

#[async_trait]
impl JobHandler for MedicationJobHandler {
    fn job_type(&self) -> &str {
        "medication_sweep"
    }

    async fn execute(&self, job: &Job) -> Result<Option<Value>, JobExecutionError> {
        let task = job
            .payload
            .get("task")
            .and_then(|v| v.as_str())
            .unwrap_or("");

        let outcome = self.run_task(task).await?;
        tracing::debug!(
            task,
            examined = outcome.examined,
            affected = outcome.affected,
            "Medication sweep task finished"
        );

        Ok(Some(serde_json::json!({
            "task": task,
            "outcome": outcome,
        })))
    }
}
