//! # Dashboard Core
//!
//! State management for a kanban ticket dashboard.
//!
//! This crate keeps the status board, comment popups and time-logging dialog
//! of a project-management client in sync with a remote ticket store. The
//! store is reached through the traits in [`remote`]; nothing here renders
//! UI or speaks HTTP.

pub mod config;
pub mod dashboard;
pub mod domain;
pub mod error;
pub mod remote;

// Re-export commonly used types
pub use config::{DashboardConfig, Role};
pub use dashboard::{BoardController, DropOutcome, LogTimeResult, TimeLogReconciler};
pub use domain::{
    board::{Board, BoardConfig, DropEvent, StatusColumn},
    ticket::{Ticket, TicketId, TicketStatus},
};
pub use error::{DashboardError, Result};
pub use remote::{FileStore, Notifier, ProjectStore, TimeLogStore};
