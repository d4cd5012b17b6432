use crate::{
    domain::BoardConfig,
    error::{DashboardError, Result},
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::fs;
use tracing::debug;

/// Role of the user driving the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Admin,
    Employee,
}

impl Role {
    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub role: Role,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeLogConfig {
    /// Smallest duration accepted by the entry form, in hours
    pub min_duration_hours: f64,
    /// Estimate assumed when a ticket has none
    pub default_estimate_hours: f64,
}

impl Default for TimeLogConfig {
    fn default() -> Self {
        Self {
            min_duration_hours: 0.1,
            default_estimate_hours: 8.0,
        }
    }
}

/// Dashboard settings. Every field falls back to its default when absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub board: BoardConfig,
    pub session: SessionConfig,
    pub time_log: TimeLogConfig,
}

impl DashboardConfig {
    /// Reads a JSON config file. A missing file yields the defaults.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            debug!(path = %path.display(), "config file not found, using defaults");
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path).await?;
        let config: Self = serde_json::from_str(&contents)
            .map_err(|e| DashboardError::ConfigError(format!("{}: {e}", path.display())))?;
        config.validate()?;
        Ok(config)
    }

    pub async fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).await?;
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.board.columns.is_empty() {
            return Err(DashboardError::ConfigError(
                "board must have at least one column".to_string(),
            ));
        }
        if self.time_log.min_duration_hours < 0.0 {
            return Err(DashboardError::ConfigError(
                "min_duration_hours cannot be negative".to_string(),
            ));
        }
        Ok(())
    }
}
