//! Job handler implementations for the recurring sweeps.

pub mod health_event;
pub mod housekeeping;
pub mod medication;
pub mod retention;

pub use health_event::HealthEventJobHandler;
pub use housekeeping::HousekeepingJobHandler;
pub use medication::MedicationJobHandler;
pub use retention::RetentionJobHandler;
