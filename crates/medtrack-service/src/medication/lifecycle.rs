//! Medication lifecycle evaluators.
//!
//! Five independently-scheduled sweeps: today/tomorrow/newly-approved
//! schedule generation, the Approved -> Active flip, and overdue dose
//! marking. Each opens its own scope per tick, tolerates zero matching
//! rows, and contains per-medication failures so one bad record cannot
//! starve a batch.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeDelta, Timelike, Utc};
use tracing::{debug, info, warn};

use medtrack_core::config::scheduling::SchedulingConfig;
use medtrack_core::result::AppResult;
use medtrack_entity::medication::model::StudentMedication;

use crate::outcome::SweepOutcome;
use crate::scheduling::generator::ScheduleGenerator;
use crate::stores::{MedicationStore, ScheduleStore};

/// Reason recorded on schedules the overdue sweep marks Missed.
const MISSED_REASON_OVERDUE: &str = "Not administered within the allowed window";

/// Recurring evaluators for the medication side of the engine.
#[derive(Clone)]
pub struct MedicationLifecycleService {
    medications: Arc<dyn MedicationStore>,
    schedules: Arc<dyn ScheduleStore>,
    generator: ScheduleGenerator,
    config: SchedulingConfig,
}

impl MedicationLifecycleService {
    /// Create a new lifecycle service.
    pub fn new(
        medications: Arc<dyn MedicationStore>,
        schedules: Arc<dyn ScheduleStore>,
        generator: ScheduleGenerator,
        config: SchedulingConfig,
    ) -> Self {
        Self {
            medications,
            schedules,
            generator,
            config,
        }
    }

    /// Generate today's schedules for Active medications that have none
    /// yet.
    pub async fn generate_today(&self, today: NaiveDate) -> AppResult<SweepOutcome> {
        let due = self
            .medications
            .find_due_for_generation(today, self.config.generation_batch_size)
            .await?;
        self.generate_batch(&due, today, today).await
    }

    /// Generate tomorrow's schedules, but only after the configured local
    /// hour. Next-day generation too early risks racing a same-day
    /// approval change.
    pub async fn generate_tomorrow(&self, now_local: NaiveDateTime) -> AppResult<SweepOutcome> {
        if now_local.hour() < self.config.tomorrow_generation_after_hour {
            debug!(
                hour = now_local.hour(),
                gate = self.config.tomorrow_generation_after_hour,
                "Tomorrow generation gated until later in the day"
            );
            return Ok(SweepOutcome::default());
        }

        let tomorrow = now_local.date() + TimeDelta::days(1);
        let due = self
            .medications
            .find_due_for_generation(tomorrow, self.config.generation_batch_size)
            .await?;
        self.generate_batch(&due, tomorrow, tomorrow).await
    }

    /// Catch up medications approved within the recent window: they missed
    /// the daily sweep, so they get their entire remaining range at once.
    pub async fn generate_for_recent_approvals(
        &self,
        now: DateTime<Utc>,
        today: NaiveDate,
    ) -> AppResult<SweepOutcome> {
        let since = now - TimeDelta::minutes(self.config.recent_approval_window_minutes);
        let recent = self
            .medications
            .find_recently_approved(since, self.config.generation_batch_size)
            .await?;

        let mut outcome = SweepOutcome::default();
        for medication in &recent {
            outcome.examined += 1;
            let from = today.max(medication.start_date);
            if from > medication.end_date {
                outcome.skipped += 1;
                continue;
            }
            match self
                .generator
                .generate_for_medication(medication, from, medication.end_date)
                .await
            {
                Ok(report) => {
                    outcome.affected += report.created as u64;
                    outcome.failed += report.failed;
                }
                Err(e) => {
                    warn!(
                        medication_id = %medication.id,
                        "Catch-up generation failed for one medication: {e}"
                    );
                    outcome.failed += 1;
                }
            }
        }

        if outcome.affected > 0 {
            info!(
                medications = recent.len(),
                created = outcome.affected,
                "Catch-up schedule generation finished"
            );
        }
        Ok(outcome)
    }

    /// Flip Approved medications whose dosing window has arrived to
    /// Active. A pure status flip: no schedules, no notifications. Running
    /// it twice over the same rows is a no-op.
    pub async fn activate_due_medications(
        &self,
        today: NaiveDate,
        now: DateTime<Utc>,
    ) -> AppResult<SweepOutcome> {
        let ready = self
            .medications
            .find_approved_ready(today, self.config.activation_batch_size)
            .await?;

        let ids: Vec<_> = ready
            .iter()
            .filter(|m| is_ready_for_activation(m, today))
            .map(|m| m.id)
            .collect();

        let mut outcome = SweepOutcome {
            examined: ready.len(),
            skipped: ready.len() - ids.len(),
            ..SweepOutcome::default()
        };
        if ids.is_empty() {
            return Ok(outcome);
        }

        outcome.affected = self.medications.activate_batch(&ids, now).await?;
        info!(activated = outcome.affected, "Medications transitioned to Active");
        Ok(outcome)
    }

    /// Mark Pending schedules whose slot passed more than the grace period
    /// ago as Missed.
    pub async fn mark_overdue_schedules(
        &self,
        now_local: NaiveDateTime,
        now: DateTime<Utc>,
    ) -> AppResult<SweepOutcome> {
        let cutoff = now_local - TimeDelta::minutes(self.config.overdue_grace_minutes);
        let overdue = self
            .schedules
            .find_overdue(cutoff, self.config.overdue_batch_size)
            .await?;

        let mut outcome = SweepOutcome {
            examined: overdue.len(),
            ..SweepOutcome::default()
        };
        if overdue.is_empty() {
            return Ok(outcome);
        }

        let ids: Vec<_> = overdue.iter().map(|s| s.id).collect();
        outcome.affected = self
            .schedules
            .mark_missed_batch(&ids, MISSED_REASON_OVERDUE, now)
            .await?;
        info!(missed = outcome.affected, "Overdue schedules marked Missed");
        Ok(outcome)
    }

    /// Run the generator over a batch of medications, containing per-item
    /// failures.
    async fn generate_batch(
        &self,
        medications: &[StudentMedication],
        from: NaiveDate,
        to: NaiveDate,
    ) -> AppResult<SweepOutcome> {
        let mut outcome = SweepOutcome::default();
        for medication in medications {
            outcome.examined += 1;
            match self.generator.generate_for_medication(medication, from, to).await {
                Ok(report) => {
                    outcome.affected += report.created as u64;
                    outcome.skipped += report.skipped;
                    outcome.failed += report.failed;
                }
                Err(e) => {
                    warn!(
                        medication_id = %medication.id,
                        "Schedule generation failed for one medication: {e}"
                    );
                    outcome.failed += 1;
                }
            }
        }

        if outcome.affected > 0 {
            info!(
                medications = medications.len(),
                created = outcome.affected,
                from = %from,
                to = %to,
                "Schedule generation sweep finished"
            );
        }
        Ok(outcome)
    }
}

/// An Approved medication activates once its window contains today.
fn is_ready_for_activation(medication: &StudentMedication, today: NaiveDate) -> bool {
    medication.status == medtrack_entity::medication::status::MedicationStatus::Approved
        && medication.covers_date(today)
}
