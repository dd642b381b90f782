//! Background job processing and scheduled sweeps for MedTrack.
//!
//! This crate provides:
//! - A worker runner that polls for and executes queued jobs
//! - A cron scheduler that enqueues the recurring sweep jobs
//! - A job executor that dispatches jobs to the correct handler
//! - Handlers for the medication, health-event, retention, and
//!   housekeeping sweeps

pub mod executor;
pub mod jobs;
pub mod queue;
pub mod runner;
pub mod scheduler;

pub use executor::{JobExecutionError, JobExecutor, JobHandler};
pub use queue::{JobCreateParams, JobQueue};
pub use runner::WorkerRunner;
pub use scheduler::CronScheduler;
