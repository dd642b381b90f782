//! # medtrack-service
//!
//! The medication-administration scheduling and health-event escalation
//! engine. Every service here is a recurring evaluator: it opens no state
//! across invocations, re-reads current rows through the store traits in
//! [`stores`], computes its deltas, and persists them in bounded batches.
//! Correctness under at-least-once invocation rests on idempotent existence
//! checks, the notification dedup guard, and naturally convergent status
//! flips rather than on any cross-handler locking.

pub mod health_event;
pub mod medication;
pub mod notification;
pub mod outcome;
pub mod retention;
pub mod scheduling;
pub mod stores;

#[cfg(test)]
pub(crate) mod testing;

pub use health_event::escalation::HealthEventEscalationService;
pub use medication::lifecycle::MedicationLifecycleService;
pub use notification::dedup::DedupGuard;
pub use outcome::SweepOutcome;
pub use retention::service::RetentionService;
pub use scheduling::generator::ScheduleGenerator;
