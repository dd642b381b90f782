//! Age-based retention sweeps.

pub mod service;

pub use service::RetentionService;
