//! Polling loop that claims jobs off the queue lanes and runs them.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{watch, OwnedSemaphorePermit, Semaphore};
use tokio::time;
use tracing::{debug, error, info, trace, warn};

use medtrack_core::config::worker::WorkerConfig;
use medtrack_entity::job::model::Job;

use crate::executor::{JobExecutionError, JobExecutor};
use crate::queue::JobQueue;

/// Claims jobs from the configured lanes in order and hands them to the
/// executor, at most `concurrency` in flight.
///
/// Shutdown is cooperative: the watch channel stops the claim loop, then
/// the runner drains in-flight jobs for up to [`DRAIN_TIMEOUT`] before
/// returning. A job still running past the drain window keeps its row in
/// Running state and is left for operator attention.
pub struct WorkerRunner {
    queue: Arc<JobQueue>,
    executor: Arc<JobExecutor>,
    config: WorkerConfig,
    worker_id: String,
}

/// How long `run` waits for in-flight jobs after the stop signal.
const DRAIN_TIMEOUT: Duration = Duration::from_secs(30);

impl WorkerRunner {
    /// Create a new worker runner
    pub fn new(
        queue: Arc<JobQueue>,
        executor: Arc<JobExecutor>,
        config: WorkerConfig,
        worker_id: String,
    ) -> Self {
        Self {
            queue,
            executor,
            config,
            worker_id,
        }
    }

    /// Run until the stop channel flips to `true`, then drain.
    pub async fn run(&self, mut stop: watch::Receiver<bool>) {
        info!(
            worker = %self.worker_id,
            concurrency = self.config.concurrency,
            poll_interval_s = self.config.poll_interval_seconds,
            lanes = ?self.config.queues,
            "Worker runner started"
        );

        let slots = Arc::new(Semaphore::new(self.config.concurrency));
        let poll_interval = Duration::from_secs(self.config.poll_interval_seconds);

        loop {
            tokio::select! {
                _ = stop.changed() => {
                    if *stop.borrow() {
                        info!(worker = %self.worker_id, "Stop requested, leaving claim loop");
                        break;
                    }
                }
                _ = self.claim_one(&slots) => {
                    tokio::select! {
                        _ = stop.changed() => {
                            if *stop.borrow() {
                                info!(worker = %self.worker_id, "Stop requested, leaving claim loop");
                                break;
                            }
                        }
                        _ = time::sleep(poll_interval) => {}
                    }
                }
            }
        }

        debug!(worker = %self.worker_id, "Draining in-flight jobs");
        let all = self.config.concurrency as u32;
        if time::timeout(DRAIN_TIMEOUT, slots.acquire_many(all))
            .await
            .is_err()
        {
            warn!(worker = %self.worker_id, "Drain window elapsed with jobs still running");
        }
        info!(worker = %self.worker_id, "Worker runner stopped");
    }

    /// Claim at most one job and spawn its execution.
    async fn claim_one(&self, slots: &Arc<Semaphore>) {
        let permit = match Arc::clone(slots).try_acquire_owned() {
            Ok(permit) => permit,
            Err(_) => {
                trace!(worker = %self.worker_id, "All execution slots busy");
                return;
            }
        };

        let lanes: Vec<&str> = self.config.queues.iter().map(String::as_str).collect();
        match self.queue.dequeue(&lanes).await {
            Ok(Some(job)) => self.spawn_execution(job, permit),
            Ok(None) => trace!(worker = %self.worker_id, "No runnable jobs"),
            Err(e) => error!(worker = %self.worker_id, "Job claim failed: {e}"),
        }
    }

    fn spawn_execution(&self, job: Job, permit: OwnedSemaphorePermit) {
        let queue = Arc::clone(&self.queue);
        let executor = Arc::clone(&self.executor);

        tokio::spawn(async move {
            let _permit = permit;
            let outcome = executor.execute(&job).await;
            settle(&queue, &job, outcome).await;
        });
    }
}

/// Record the outcome of one execution on the job row: completion,
/// delayed retry for transient failures with attempts left, terminal
/// failure otherwise.
async fn settle(
    queue: &JobQueue,
    job: &Job,
    outcome: Result<Option<serde_json::Value>, JobExecutionError>,
) {
    let finalize = match outcome {
        Ok(result) => {
            info!(job_id = %job.id, job_type = %job.job_type, "Job completed");
            queue.complete(job.id, result).await
        }
        Err(JobExecutionError::Transient(msg)) if job.can_retry() => {
            warn!(
                job_id = %job.id,
                job_type = %job.job_type,
                attempt = job.attempts,
                "Transient job failure, will retry: {msg}"
            );
            queue.retry(job).await
        }
        Err(err) => {
            let msg = err.to_string();
            error!(job_id = %job.id, job_type = %job.job_type, "Job failed: {msg}");
            queue.fail(job.id, &msg).await
        }
    };

    if let Err(e) = finalize {
        error!(job_id = %job.id, "Failed to record job outcome: {e}");
    }
}
