//! Staff entities. Only the minimal surface the sweeps need: escalation
//! fans out to active managers and reminders go to the assigned nurse.

pub mod model;
pub mod role;

pub use model::StaffMember;
pub use role::StaffRole;
