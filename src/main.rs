//! MedTrack server.
//!
//! Main entry point that wires the crates together and runs the scheduling
//! and escalation engine: configuration, database, repositories, services,
//! job handlers, cron scheduler, and the worker runner.

use std::sync::Arc;

use tokio::sync::watch;
use tracing;
use tracing_subscriber::{fmt, EnvFilter};

use medtrack_core::config::AppConfig;
use medtrack_core::error::AppError;
use medtrack_database::repositories::{
    AdministrationRepository, HealthEventRepository, JobRepository, MedicationRepository,
    NotificationRepository, ScheduleRepository, StaffRepository,
};
use medtrack_database::DatabasePool;
use medtrack_service::stores::{
    AdministrationStore, ConnectivityProbe, HealthEventStore, MedicationStore, NotificationStore,
    ScheduleStore, StaffStore,
};
use medtrack_service::{
    HealthEventEscalationService, MedicationLifecycleService, RetentionService, ScheduleGenerator,
};
use medtrack_worker::jobs::{
    HealthEventJobHandler, HousekeepingJobHandler, MedicationJobHandler, RetentionJobHandler,
};
use medtrack_worker::{CronScheduler, JobExecutor, JobQueue, WorkerRunner};

#[tokio::main]
async fn main() {
    let env = std::env::var("MEDTRACK_ENV").unwrap_or_else(|_| "development".to_string());
    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt().pretty().with_env_filter(filter).with_target(true).init();
        }
    }
}

/// Main run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting MedTrack v{}", env!("CARGO_PKG_VERSION"));

    // Database connection and migrations
    let db = DatabasePool::connect(&config.database).await?;
    medtrack_database::migration::run_migrations(db.pool()).await?;

    // Repositories
    let medication_repo = Arc::new(MedicationRepository::new(db.pool().clone()));
    let schedule_repo = Arc::new(ScheduleRepository::new(db.pool().clone()));
    let health_event_repo = Arc::new(HealthEventRepository::new(db.pool().clone()));
    let notification_repo = Arc::new(NotificationRepository::new(db.pool().clone()));
    let administration_repo = Arc::new(AdministrationRepository::new(db.pool().clone()));
    let staff_repo = Arc::new(StaffRepository::new(db.pool().clone()));
    let job_repo = Arc::new(JobRepository::new(db.pool().clone()));

    // Store views over the repositories
    let medications: Arc<dyn MedicationStore> = medication_repo;
    let schedules: Arc<dyn ScheduleStore> = schedule_repo;
    let events: Arc<dyn HealthEventStore> = health_event_repo;
    let notifications: Arc<dyn NotificationStore> = notification_repo;
    let administrations: Arc<dyn AdministrationStore> = administration_repo;
    let staff: Arc<dyn StaffStore> = staff_repo;
    let probe: Arc<dyn ConnectivityProbe> = Arc::new(db.clone());

    // Services
    let generator = ScheduleGenerator::new(
        Arc::clone(&medications),
        Arc::clone(&schedules),
        config.scheduling.clone(),
    );
    let lifecycle = MedicationLifecycleService::new(
        Arc::clone(&medications),
        Arc::clone(&schedules),
        generator,
        config.scheduling.clone(),
    );
    let escalation = HealthEventEscalationService::new(
        events,
        Arc::clone(&notifications),
        staff,
        probe,
        config.escalation.clone(),
    );
    let retention = RetentionService::new(
        medications,
        notifications,
        administrations,
        config.retention.clone(),
    );

    // Worker: queue, handlers, executor
    let worker_id = format!("medtrack-{}", uuid_suffix());
    let queue = Arc::new(JobQueue::new(
        job_repo,
        worker_id.clone(),
        config.worker.retry_base_delay_seconds,
    ));

    let mut executor = JobExecutor::new();
    executor.register(Arc::new(MedicationJobHandler::new(lifecycle)));
    executor.register(Arc::new(HealthEventJobHandler::new(escalation)));
    executor.register(Arc::new(RetentionJobHandler::new(retention)));
    executor.register(Arc::new(HousekeepingJobHandler::new(Arc::clone(&queue))));
    let executor = Arc::new(executor);

    // Cron scheduler
    let mut scheduler = CronScheduler::new(Arc::clone(&queue)).await?;
    scheduler.register_default_tasks().await?;
    scheduler.start().await?;

    // Worker runner with shutdown signal
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let runner_handle = if config.worker.enabled {
        let runner = WorkerRunner::new(queue, executor, config.worker.clone(), worker_id);
        Some(tokio::spawn(async move {
            runner.run(shutdown_rx).await;
        }))
    } else {
        tracing::warn!("Worker disabled by configuration, jobs will queue but not run");
        None
    };

    tracing::info!("MedTrack engine running, press Ctrl+C to stop");
    tokio::signal::ctrl_c()
        .await
        .map_err(|e| AppError::internal(format!("Failed to listen for shutdown signal: {e}")))?;

    tracing::info!("Shutdown signal received");
    scheduler.shutdown().await?;
    let _ = shutdown_tx.send(true);
    if let Some(handle) = runner_handle {
        let _ = handle.await;
    }
    db.close().await;

    tracing::info!("MedTrack stopped");
    Ok(())
}

/// Short unique suffix for the worker identity.
fn uuid_suffix() -> String {
    uuid::Uuid::new_v4().to_string()[..8].to_string()
}
