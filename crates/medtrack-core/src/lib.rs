//! # medtrack-core
//!
//! Shared foundation for the MedTrack scheduling and escalation engine:
//! the unified [`error::AppError`] type, the [`result::AppResult`] alias,
//! and the configuration schemas deserialized from TOML.

pub mod config;
pub mod error;
pub mod result;

pub use error::{AppError, ErrorKind};
pub use result::AppResult;
