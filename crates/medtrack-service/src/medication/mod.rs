//! Medication lifecycle evaluators.

pub mod lifecycle;

pub use lifecycle::MedicationLifecycleService;
