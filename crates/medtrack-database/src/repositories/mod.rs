//! Repository-per-entity database access.

pub mod administration;
pub mod health_event;
pub mod job;
pub mod medication;
pub mod notification;
pub mod schedule;
pub mod staff;

pub use administration::AdministrationRepository;
pub use health_event::HealthEventRepository;
pub use job::JobRepository;
pub use medication::MedicationRepository;
pub use notification::NotificationRepository;
pub use schedule::ScheduleRepository;
pub use staff::StaffRepository;
