//! In-memory store and notifier for controller tests.

use crate::{
    domain::{Comment, Project, ProjectDetails, Ticket, TicketId, TicketRecord, TicketStatus, TimeLog},
    error::{DashboardError, Result},
    remote::{Notice, NoticeLevel, Notifier, ProjectStore, TimeLogStore},
};
use async_trait::async_trait;
use chrono::NaiveDate;
use std::{collections::HashMap, sync::Mutex};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    ListProjects,
    GetProject(u64),
    GetTicket(TicketId),
    UpdateStatus(TicketId, TicketStatus),
    Validate(TicketId),
    ListComments(TicketId),
    AddComment(TicketId, String),
    LogTime(TicketId, f64),
    ListTimeLogs(TicketId),
}

#[derive(Default)]
struct State {
    projects: Vec<ProjectDetails>,
    comments: HashMap<TicketId, Vec<Comment>>,
    time_logs: HashMap<TicketId, Vec<TimeLog>>,
    calls: Vec<Call>,
    fail_projects: bool,
    fail_update: bool,
    fail_validate: bool,
    fail_add_comment: bool,
    /// Fail `log_time` once this many entries have been accepted
    fail_log_after: Option<usize>,
}

#[derive(Default)]
pub struct ScriptedStore {
    state: Mutex<State>,
}

impl ScriptedStore {
    pub fn with_project(id: u64, tickets: Vec<TicketRecord>) -> Self {
        let store = Self::default();
        store.state.lock().unwrap().projects.push(ProjectDetails {
            project: Project::new(id, format!("Project {id}")),
            tickets,
        });
        store
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls().iter().filter(|&c| pred(c)).count()
    }

    pub fn clear_calls(&self) {
        self.state.lock().unwrap().calls.clear();
    }

    pub fn fail_projects(&self) {
        self.state.lock().unwrap().fail_projects = true;
    }

    pub fn fail_update(&self) {
        self.state.lock().unwrap().fail_update = true;
    }

    pub fn fail_validate(&self) {
        self.state.lock().unwrap().fail_validate = true;
    }

    pub fn fail_add_comment(&self) {
        self.state.lock().unwrap().fail_add_comment = true;
    }

    pub fn fail_log_after(&self, accepted: usize) {
        self.state.lock().unwrap().fail_log_after = Some(accepted);
    }

    pub fn remote_status(&self, id: TicketId) -> Option<String> {
        let state = self.state.lock().unwrap();
        state
            .projects
            .iter()
            .flat_map(|p| p.tickets.iter())
            .find(|r| r.id == id)
            .map(|r| r.status.clone())
    }

    fn record(&self, call: Call) {
        self.state.lock().unwrap().calls.push(call);
    }

    fn with_record<T>(&self, id: TicketId, f: impl FnOnce(&mut TicketRecord) -> T) -> Result<T> {
        let mut state = self.state.lock().unwrap();
        state
            .projects
            .iter_mut()
            .flat_map(|p| p.tickets.iter_mut())
            .find(|r| r.id == id)
            .map(f)
            .ok_or_else(|| DashboardError::TicketNotFound(id.to_string()))
    }
}

pub fn record(id: u64, status: TicketStatus) -> TicketRecord {
    Ticket::new(TicketId::new(id), format!("Ticket {id}"))
        .with_status(status)
        .into()
}

#[async_trait]
impl ProjectStore for ScriptedStore {
    async fn list_projects(&self) -> Result<Vec<Project>> {
        self.record(Call::ListProjects);
        let state = self.state.lock().unwrap();
        if state.fail_projects {
            return Err(DashboardError::Remote("projects unavailable".to_string()));
        }
        Ok(state.projects.iter().map(|p| p.project.clone()).collect())
    }

    async fn get_project(&self, id: u64) -> Result<ProjectDetails> {
        self.record(Call::GetProject(id));
        let state = self.state.lock().unwrap();
        if state.fail_projects {
            return Err(DashboardError::Remote("projects unavailable".to_string()));
        }
        state
            .projects
            .iter()
            .find(|p| p.project.id == id)
            .cloned()
            .ok_or(DashboardError::ProjectNotFound(id))
    }

    async fn get_ticket(&self, id: TicketId) -> Result<Ticket> {
        self.record(Call::GetTicket(id));
        let record = self.with_record(id, |r| r.clone())?;
        Ticket::try_from(record)
    }

    async fn update_ticket_status(&self, id: TicketId, status: TicketStatus) -> Result<()> {
        self.record(Call::UpdateStatus(id, status));
        if self.state.lock().unwrap().fail_update {
            return Err(DashboardError::Remote("status update rejected".to_string()));
        }
        self.with_record(id, |r| r.status = status.as_str().to_string())
    }

    async fn validate_ticket(&self, id: TicketId) -> Result<()> {
        self.record(Call::Validate(id));
        if self.state.lock().unwrap().fail_validate {
            return Err(DashboardError::Remote("validation rejected".to_string()));
        }
        self.with_record(id, |r| r.status = "VALIDATED".to_string())
    }

    async fn list_comments(&self, ticket_id: TicketId) -> Result<Vec<Comment>> {
        self.record(Call::ListComments(ticket_id));
        let state = self.state.lock().unwrap();
        Ok(state.comments.get(&ticket_id).cloned().unwrap_or_default())
    }

    async fn add_comment(&self, ticket_id: TicketId, content: &str) -> Result<Comment> {
        self.record(Call::AddComment(ticket_id, content.to_string()));
        let mut state = self.state.lock().unwrap();
        if state.fail_add_comment {
            return Err(DashboardError::Remote("comment rejected".to_string()));
        }
        let comment = Comment::new(ticket_id, content.to_string());
        state
            .comments
            .entry(ticket_id)
            .or_default()
            .push(comment.clone());
        Ok(comment)
    }
}

#[async_trait]
impl TimeLogStore for ScriptedStore {
    async fn log_time(&self, ticket_id: TicketId, date: NaiveDate, duration: f64) -> Result<TimeLog> {
        self.record(Call::LogTime(ticket_id, duration));
        {
            let mut state = self.state.lock().unwrap();
            if let Some(remaining) = state.fail_log_after {
                if remaining == 0 {
                    return Err(DashboardError::Remote("time log rejected".to_string()));
                }
                state.fail_log_after = Some(remaining - 1);
            }
        }

        self.with_record(ticket_id, |r| r.worked_time_hours += duration)?;
        let log = TimeLog::new(date, duration, String::new());
        self.state
            .lock()
            .unwrap()
            .time_logs
            .entry(ticket_id)
            .or_default()
            .push(log.clone());
        Ok(log)
    }

    async fn list_time_logs(&self, ticket_id: TicketId) -> Result<Vec<TimeLog>> {
        self.record(Call::ListTimeLogs(ticket_id));
        let state = self.state.lock().unwrap();
        Ok(state.time_logs.get(&ticket_id).cloned().unwrap_or_default())
    }
}

/// Keeps every notice for inspection
#[derive(Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().unwrap().clone()
    }

    pub fn count(&self, level: NoticeLevel) -> usize {
        self.notices().iter().filter(|n| n.level == level).count()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: Notice) {
        self.notices.lock().unwrap().push(notice);
    }
}
