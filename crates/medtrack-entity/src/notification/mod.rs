//! Notification entities. Notifications double as the dedup ledger for the
//! escalation and reminder sweeps.

pub mod kind;
pub mod model;

pub use kind::NotificationKind;
pub use model::Notification;
