use thiserror::Error;

pub type Result<T> = std::result::Result<T, DashboardError>;

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("Project not found: {0}")]
    ProjectNotFound(u64),

    #[error("Ticket not found: {0}")]
    TicketNotFound(String),

    #[error("Invalid ticket ID format: {0}")]
    InvalidTicketId(String),

    #[error("Unrecognized ticket status: {0}")]
    UnknownStatus(String),

    #[error("Only an administrator can move a ticket to {0}")]
    PrivilegeRequired(String),

    #[error("Invalid drop: {0}")]
    InvalidDrop(String),

    #[error("Comment content is empty")]
    EmptyComment,

    #[error("Invalid time log: {0}")]
    InvalidTimeLog(String),

    #[error("No time log sessions to save")]
    NoPendingTimeLogs,

    #[error("Remote error: {0}")]
    Remote(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}
