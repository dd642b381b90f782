//! Schedule generation: day-eligibility rules and the generator itself.

pub mod generator;
pub mod rules;

pub use generator::{GenerationReport, ScheduleGenerator};
