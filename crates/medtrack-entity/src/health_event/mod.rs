//! Health event entities: reported incidents and their lifecycle status.

pub mod model;
pub mod status;

pub use model::HealthEvent;
pub use status::HealthEventStatus;
