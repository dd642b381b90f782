//! Health-event escalation, reminder, and notification cleanup sweeps.

pub mod escalation;

pub use escalation::HealthEventEscalationService;
