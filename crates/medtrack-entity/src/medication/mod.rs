//! Medication entities: parent-submitted courses, planned dose schedules,
//! and administration records.

pub mod administration;
pub mod model;
pub mod schedule;
pub mod status;

pub use administration::MedicationAdministration;
pub use model::StudentMedication;
pub use schedule::MedicationSchedule;
pub use status::{MedicationStatus, ScheduleStatus};
