use crate::{
    domain::{Comment, Project, ProjectDetails, Ticket, TicketId, TicketStatus, TimeLog},
    error::Result,
};
use async_trait::async_trait;
use chrono::NaiveDate;

pub mod file_store;
mod notifier;

#[cfg(test)]
pub(crate) mod testing;

pub use file_store::FileStore;
pub use notifier::{LogNotifier, Notice, NoticeLevel, Notifier};

/// Remote source of truth for projects, tickets and comments
#[async_trait]
pub trait ProjectStore: Send + Sync {
    /// Lists the projects visible to the user
    async fn list_projects(&self) -> Result<Vec<Project>>;

    /// Fetches a project with its tickets
    async fn get_project(&self, id: u64) -> Result<ProjectDetails>;

    /// Fetches one ticket
    async fn get_ticket(&self, id: TicketId) -> Result<Ticket>;

    /// Moves a ticket to a non-terminal status
    async fn update_ticket_status(&self, id: TicketId, status: TicketStatus) -> Result<()>;

    /// Moves a ticket to VALIDATED
    async fn validate_ticket(&self, id: TicketId) -> Result<()>;

    async fn list_comments(&self, ticket_id: TicketId) -> Result<Vec<Comment>>;

    async fn add_comment(&self, ticket_id: TicketId, content: &str) -> Result<Comment>;
}

/// Remote store of time-log entries
#[async_trait]
pub trait TimeLogStore: Send + Sync {
    /// Appends an entry; the store adds it to the ticket's worked time
    async fn log_time(&self, ticket_id: TicketId, date: NaiveDate, duration: f64) -> Result<TimeLog>;

    async fn list_time_logs(&self, ticket_id: TicketId) -> Result<Vec<TimeLog>>;
}
