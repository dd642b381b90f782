//! # medtrack-entity
//!
//! Domain entity models for MedTrack. Every struct in this crate represents
//! a database table row or a domain value object. All entities derive
//! `Debug`, `Clone`, `Serialize`, `Deserialize`, and database entities
//! additionally derive `sqlx::FromRow`.

pub mod health_event;
pub mod job;
pub mod medication;
pub mod notification;
pub mod staff;
