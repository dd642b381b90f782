//! Job table housekeeping handler.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{TimeDelta, Utc};
use serde_json::Value;
use tracing;

use medtrack_entity::job::model::Job;

use crate::executor::{JobExecutionError, JobHandler};
use crate::queue::JobQueue;

/// Days a terminal job row is kept before physical deletion.
const JOB_RETENTION_DAYS: i64 = 7;

/// Purges terminal job rows so the jobs table does not grow unbounded.
pub struct HousekeepingJobHandler {
    queue: Arc<JobQueue>,
}

impl HousekeepingJobHandler {
    /// Create a new housekeeping job handler
    pub fn new(queue: Arc<JobQueue>) -> Self {
        Self { queue }
    }
}

#[async_trait]
impl JobHandler for HousekeepingJobHandler {
    fn job_type(&self) -> &str {
        "job_cleanup"
    }

    async fn execute(&self, _job: &Job) -> Result<Option<Value>, JobExecutionError> {
        let before = Utc::now() - TimeDelta::days(JOB_RETENTION_DAYS);
        let removed = self
            .queue
            .cleanup_terminal(before)
            .await
            .map_err(JobExecutionError::from_app_error)?;

        tracing::info!(removed, "Terminal job rows cleaned up");

        Ok(Some(serde_json::json!({
            "task": "job_cleanup",
            "jobs_removed": removed,
        })))
    }
}
