//! Notification de-duplication.

pub mod dedup;

pub use dedup::DedupGuard;
