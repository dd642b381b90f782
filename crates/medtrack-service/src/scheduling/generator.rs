//! Medication schedule generator.

use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime, Utc};
use tracing::{debug, warn};
use uuid::Uuid;

use medtrack_core::config::scheduling::SchedulingConfig;
use medtrack_core::error::AppError;
use medtrack_core::result::AppResult;
use medtrack_entity::medication::model::StudentMedication;
use medtrack_entity::medication::schedule::MedicationSchedule;

use crate::scheduling::rules;
use crate::stores::{MedicationStore, ScheduleStore};

/// Per-invocation result of schedule generation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenerationReport {
    /// Schedule rows created.
    pub created: usize,
    /// Dates skipped by policy or because a schedule already existed.
    pub skipped: usize,
    /// Dates whose insert failed; the failure was logged and contained.
    pub failed: usize,
}

/// Derives the set of schedule rows a medication should have for a date
/// range.
///
/// Repeated invocation over the same range is safe: each date is guarded by
/// a per-(medication, date) existence check, so a second pass creates
/// nothing. A failure on one date does not abort the remaining dates.
#[derive(Clone)]
pub struct ScheduleGenerator {
    medications: Arc<dyn MedicationStore>,
    schedules: Arc<dyn ScheduleStore>,
    config: SchedulingConfig,
}

impl ScheduleGenerator {
    /// Create a new schedule generator.
    pub fn new(
        medications: Arc<dyn MedicationStore>,
        schedules: Arc<dyn ScheduleStore>,
        config: SchedulingConfig,
    ) -> Self {
        Self {
            medications,
            schedules,
            config,
        }
    }

    /// Generate schedules for one medication over `from..=to`.
    ///
    /// The medication must be Active; dates outside its dosing window are
    /// skipped, not errors.
    pub async fn generate_for_range(
        &self,
        medication_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> AppResult<GenerationReport> {
        let medication = self
            .medications
            .find_by_id(medication_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Medication {medication_id} not found")))?;

        self.generate_for_medication(&medication, from, to).await
    }

    /// Generate schedules for an already-loaded medication.
    pub async fn generate_for_medication(
        &self,
        medication: &StudentMedication,
        from: NaiveDate,
        to: NaiveDate,
    ) -> AppResult<GenerationReport> {
        if !medication.status.is_schedulable() {
            return Err(AppError::validation(format!(
                "Medication {} is {}, only active medications get schedules",
                medication.id, medication.status
            )));
        }

        let skip_dates = medication.parsed_skip_dates();
        let dose_times = medication.parsed_dose_times(self.default_dose_time());
        let mut report = GenerationReport::default();

        let span = if from <= to {
            (to - from).num_days() as usize + 1
        } else {
            0
        };
        let eligible = rules::eligible_dates(from, to, medication.skip_weekends, &skip_dates);
        report.skipped = span - eligible.len();

        for current in eligible {
            if !medication.covers_date(current) {
                report.skipped += 1;
                continue;
            }

            match self.generate_for_date(medication, current, &dose_times).await {
                Ok(created) => {
                    if created == 0 {
                        report.skipped += 1;
                    } else {
                        report.created += created;
                    }
                }
                Err(e) => {
                    warn!(
                        medication_id = %medication.id,
                        date = %current,
                        "Schedule generation failed for one date: {e}"
                    );
                    report.failed += 1;
                }
            }
        }

        debug!(
            medication_id = %medication.id,
            from = %from,
            to = %to,
            created = report.created,
            skipped = report.skipped,
            failed = report.failed,
            "Schedule generation pass finished"
        );
        Ok(report)
    }

    /// Create the dose rows for one eligible date, unless any schedule for
    /// that date already exists.
    async fn generate_for_date(
        &self,
        medication: &StudentMedication,
        date: NaiveDate,
        dose_times: &[NaiveTime],
    ) -> AppResult<usize> {
        if self.schedules.exists_for_date(medication.id, date).await? {
            return Ok(0);
        }

        let now = Utc::now();
        let mut created = 0;
        for &time in dose_times {
            let schedule = MedicationSchedule::pending(
                medication.id,
                medication.student_id,
                date,
                time,
                medication.dosage.clone(),
                now,
            );
            self.schedules.create(&schedule).await?;
            created += 1;
        }
        Ok(created)
    }

    fn default_dose_time(&self) -> NaiveTime {
        NaiveTime::parse_from_str(&self.config.default_dose_time, "%H:%M")
            .unwrap_or_else(|_| NaiveTime::from_hms_opt(8, 0, 0).unwrap())
    }
}
