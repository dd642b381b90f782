//! Background job entities for the recurring-job runner.

pub mod model;
pub mod status;

pub use model::Job;
pub use status::{JobPriority, JobStatus};
