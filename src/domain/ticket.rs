use crate::error::DashboardError;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Identifier of a ticket, assigned by the remote store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TicketId(u64);

impl TicketId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl FromStr for TicketId {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u64>()
            .map(Self)
            .map_err(|_| DashboardError::InvalidTicketId(s.to_string()))
    }
}

impl fmt::Display for TicketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Status of a ticket on the board.
///
/// The serde tag is the wire value exchanged with the remote store, so the
/// same enum maps in both directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TicketStatus {
    Todo,
    InProgress,
    InReview,
    Done,
    Validated,
}

impl TicketStatus {
    /// Board order, left to right
    pub const ALL: [TicketStatus; 5] = [
        Self::Todo,
        Self::InProgress,
        Self::InReview,
        Self::Done,
        Self::Validated,
    ];

    /// Wire tag used by the remote store
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Todo => "TODO",
            Self::InProgress => "IN_PROGRESS",
            Self::InReview => "IN_REVIEW",
            Self::Done => "DONE",
            Self::Validated => "VALIDATED",
        }
    }

    /// Column heading shown on the board
    pub fn label(&self) -> &'static str {
        match self {
            Self::Todo => "TO DO",
            Self::InProgress => "IN PROGRESS",
            Self::InReview => "IN REVIEW",
            Self::Done => "DONE",
            Self::Validated => "VALIDATED",
        }
    }

    /// Moving into this status goes through the dedicated validate endpoint
    /// and needs an elevated role.
    pub fn requires_privilege(&self) -> bool {
        matches!(self, Self::Validated)
    }
}

impl FromStr for TicketStatus {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| DashboardError::UnknownStatus(s.to_string()))
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Estimated effort in hours. The store sends either a number or a numeric
/// string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Estimate {
    Hours(f64),
    Text(String),
}

impl Estimate {
    /// Hours as a number; text that does not parse counts as zero
    pub fn hours(&self) -> f64 {
        match self {
            Self::Hours(h) => *h,
            Self::Text(s) => s.trim().parse::<f64>().unwrap_or(0.0),
        }
    }
}

/// A ticket as the board holds it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    pub id: TicketId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: TicketStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_time: Option<Estimate>,
    /// Sum of persisted time logs, maintained by the store
    #[serde(default)]
    pub worked_time_hours: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_employee_username: Option<String>,
}

impl Ticket {
    /// Creates a TODO ticket with no estimate and no logged time
    pub fn new(id: TicketId, title: String) -> Self {
        Self {
            id,
            title,
            description: None,
            status: TicketStatus::Todo,
            estimated_time: None,
            worked_time_hours: 0.0,
            assignee: None,
            assigned_employee_username: None,
        }
    }

    pub fn with_status(mut self, status: TicketStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_estimate(mut self, hours: f64) -> Self {
        self.estimated_time = Some(Estimate::Hours(hours));
        self
    }

    pub fn estimated_hours(&self) -> f64 {
        self.estimated_time
            .as_ref()
            .map(Estimate::hours)
            .unwrap_or(0.0)
    }

    /// Name shown for the person working on the ticket
    pub fn assignee_name(&self) -> &str {
        self.assigned_employee_username
            .as_deref()
            .or(self.assignee.as_deref())
            .unwrap_or("Unassigned")
    }
}

/// A ticket as it arrives from the store, status not yet checked
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketRecord {
    pub id: TicketId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub status: String,
    #[serde(default)]
    pub estimated_time: Option<Estimate>,
    #[serde(default)]
    pub worked_time_hours: f64,
    #[serde(default)]
    pub assignee: Option<String>,
    #[serde(default)]
    pub assigned_employee_username: Option<String>,
}

impl TryFrom<TicketRecord> for Ticket {
    type Error = DashboardError;

    fn try_from(record: TicketRecord) -> Result<Self, Self::Error> {
        let status = record.status.parse::<TicketStatus>()?;
        Ok(Self {
            id: record.id,
            title: record.title,
            description: record.description,
            status,
            estimated_time: record.estimated_time,
            worked_time_hours: record.worked_time_hours,
            assignee: record.assignee,
            assigned_employee_username: record.assigned_employee_username,
        })
    }
}

impl From<Ticket> for TicketRecord {
    fn from(ticket: Ticket) -> Self {
        Self {
            id: ticket.id,
            title: ticket.title,
            description: ticket.description,
            status: ticket.status.as_str().to_string(),
            estimated_time: ticket.estimated_time,
            worked_time_hours: ticket.worked_time_hours,
            assignee: ticket.assignee,
            assigned_employee_username: ticket.assigned_employee_username,
        }
    }
}
