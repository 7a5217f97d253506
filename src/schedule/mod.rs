//! Recurring schedule model and idempotent upsert

use crate::store::{RecordStore, StoreError, UpsertOutcome};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Collection holding schedule records in the external store
pub const SCHEDULE_COLLECTION: &str = "pipeline_schedules";

/// Errors from schedule computation or persistence
#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("weekday {0} out of range (0-6)")]
    WeekdayOutOfRange(u8),

    #[error("month day {0} out of range (1-31)")]
    DayOutOfRange(u8),

    #[error("interval '{0}' requires a day")]
    MissingDay(&'static str),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Recurrence descriptor for automatic re-execution of a pipeline.
///
/// Weekdays are 0-based (0 = Sunday) on both sides of the wire; month
/// days are 1-based here and 0-based on the wire; see
/// [`ScheduleMode::to_wire`] for the boundary conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum ScheduleMode {
    Daily,
    Weekly { day: u8 },
    Monthly { day: u8 },
}

/// Raw schedule form input as collected by the UI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleForm {
    pub interval: ScheduleInterval,
    /// Anchor weekday for weekly schedules, 0-based
    pub weekday: Option<u8>,
    /// Anchor day-of-month for monthly schedules, 1-based
    pub month_day: Option<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleInterval {
    Daily,
    Weekly,
    Monthly,
}

/// Map form input to a schedule mode; pure, with range checks
pub fn compute_schedule_mode(form: &ScheduleForm) -> Result<ScheduleMode, ScheduleError> {
    match form.interval {
        ScheduleInterval::Daily => Ok(ScheduleMode::Daily),
        ScheduleInterval::Weekly => {
            let day = form.weekday.ok_or(ScheduleError::MissingDay("weekly"))?;
            if day > 6 {
                return Err(ScheduleError::WeekdayOutOfRange(day));
            }
            Ok(ScheduleMode::Weekly { day })
        }
        ScheduleInterval::Monthly => {
            let day = form.month_day.ok_or(ScheduleError::MissingDay("monthly"))?;
            if !(1..=31).contains(&day) {
                return Err(ScheduleError::DayOutOfRange(day));
            }
            Ok(ScheduleMode::Monthly { day })
        }
    }
}

impl ScheduleMode {
    /// The wire form sent to the job runner.
    ///
    /// The runner counts month days from 0, so the 1-based UI value is
    /// shifted down here, after an explicit range check, so a bad day
    /// can never silently become `day - 1`.
    pub fn to_wire(&self) -> Result<serde_json::Value, ScheduleError> {
        match self {
            ScheduleMode::Daily => Ok(json!({ "mode": "daily" })),
            ScheduleMode::Weekly { day } => {
                if *day > 6 {
                    return Err(ScheduleError::WeekdayOutOfRange(*day));
                }
                Ok(json!({ "mode": "weekly", "day": day }))
            }
            ScheduleMode::Monthly { day } => {
                if !(1..=31).contains(day) {
                    return Err(ScheduleError::DayOutOfRange(*day));
                }
                Ok(json!({ "mode": "monthly", "day": day - 1 }))
            }
        }
    }
}

/// Normalize a display name into a URL-safe slug
pub fn slugify(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '-' })
        .collect::<String>()
        .split('-')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

/// Stable uniqueness key for a schedule record
pub fn canonical_schedule_id(pipeline: &str, owner: &str) -> String {
    format!("{}--{}", slugify(pipeline), slugify(owner))
}

/// Creates and updates schedule records through the external store.
///
/// Identity comes from the canonical `(pipeline, owner)` key and the
/// store's uniqueness constraint on it: re-submitting the same schedule
/// updates the record instead of duplicating it, with no client-side
/// idempotency bookkeeping.
pub struct ScheduleManager {
    store: Arc<dyn RecordStore>,
}

impl ScheduleManager {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// Create or update the schedule for a pipeline
    pub async fn upsert_schedule(
        &self,
        pipeline: &str,
        owner: &str,
        mode: ScheduleMode,
    ) -> Result<UpsertOutcome, ScheduleError> {
        let key = canonical_schedule_id(pipeline, owner);
        let record = json!({
            "pipeline": pipeline,
            "owner": owner,
            "schedule": mode.to_wire()?,
        });

        let outcome = self
            .store
            .upsert(SCHEDULE_COLLECTION, &key, record)
            .await?;
        info!(%key, ?outcome, "schedule upserted");
        Ok(outcome)
    }
}
