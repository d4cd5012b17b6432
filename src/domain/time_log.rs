use crate::error::{DashboardError, Result};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

/// A recorded work session on a ticket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeLog {
    pub date: NaiveDate,
    /// Hours
    pub duration: f64,
    #[serde(default)]
    pub description: String,
}

impl TimeLog {
    pub fn new(date: NaiveDate, duration: f64, description: String) -> Self {
        Self {
            date,
            duration,
            description,
        }
    }
}

/// Single-entry form used to stage a time log
#[derive(Debug, Clone, PartialEq)]
pub struct TimeLogForm {
    pub date: Option<NaiveDate>,
    pub duration: Option<f64>,
    pub description: String,
}

impl TimeLogForm {
    /// Empty form dated today
    pub fn new() -> Self {
        Self {
            date: Some(Local::now().date_naive()),
            duration: None,
            description: String::new(),
        }
    }

    /// Clears the form for the next entry
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Builds a log from the form. Date and duration are required and the
    /// duration must be positive and at least `min_duration` hours.
    pub fn validate(&self, min_duration: f64) -> Result<TimeLog> {
        let date = self
            .date
            .ok_or_else(|| DashboardError::InvalidTimeLog("date is required".to_string()))?;
        let duration = self
            .duration
            .ok_or_else(|| DashboardError::InvalidTimeLog("duration is required".to_string()))?;

        if !duration.is_finite() || duration <= 0.0 || duration < min_duration {
            return Err(DashboardError::InvalidTimeLog(format!(
                "duration must be at least {min_duration}h, got {duration}h"
            )));
        }

        Ok(TimeLog::new(
            date,
            duration,
            self.description.trim().to_string(),
        ))
    }
}

impl Default for TimeLogForm {
    fn default() -> Self {
        Self::new()
    }
}

/// Totals shown in the time-log dialog
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TimeSummary {
    /// Authoritative worked time from the store
    pub total_logged: f64,
    pub estimated: f64,
    /// `estimated - total_logged`, negative once the estimate is exceeded
    pub remaining: f64,
    pub is_exceeded: bool,
    /// Hours staged locally and not yet saved
    pub pending: f64,
}

impl TimeSummary {
    pub fn compute(estimated: f64, worked: f64, pending: &[TimeLog]) -> Self {
        let remaining = estimated - worked;
        Self {
            total_logged: worked,
            estimated,
            remaining,
            is_exceeded: remaining < 0.0,
            pending: pending.iter().map(|log| log.duration).sum(),
        }
    }

    /// Total once the staged sessions are saved
    pub fn projected_total(&self) -> f64 {
        self.total_logged + self.pending
    }

    /// Hours over the estimate counting staged sessions, if any
    pub fn projected_overrun(&self) -> Option<f64> {
        let over = self.projected_total() - self.estimated;
        (over > 0.0).then_some(over)
    }
}
