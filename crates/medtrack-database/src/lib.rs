//! # medtrack-database
//!
//! PostgreSQL access for MedTrack: connection pool management, embedded
//! migrations, and one repository struct per entity. All queries go through
//! `sqlx` with bind parameters; errors are mapped into
//! [`medtrack_core::AppError`].

pub mod connection;
pub mod migration;
pub mod repositories;

pub use connection::DatabasePool;
