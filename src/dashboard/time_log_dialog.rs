use crate::{
    config::TimeLogConfig,
    domain::{Ticket, TimeLog, TimeLogForm, TimeSummary},
    error::{DashboardError, Result},
    remote::{Notice, Notifier, ProjectStore, TimeLogStore},
};
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

/// Returned when the dialog closes after a successful save
#[derive(Debug, Clone, PartialEq)]
pub struct LogTimeResult {
    /// Entries as listed by the store after the save
    pub time_logs: Vec<TimeLog>,
    pub total_time: f64,
    pub new_sessions_time: f64,
    pub is_time_exceeded: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DialogState {
    Open,
    Closed(Option<LogTimeResult>),
}

/// Time-log dialog for one ticket.
///
/// Entries are staged locally and only count toward the logged total once
/// the store has accepted them and the ticket has been reloaded.
pub struct TimeLogReconciler<S, N> {
    store: Arc<S>,
    notifier: Arc<N>,
    config: TimeLogConfig,
    ticket: Ticket,
    pub form: TimeLogForm,
    pending: Vec<TimeLog>,
    saved: Vec<TimeLog>,
    summary: TimeSummary,
    state: DialogState,
}

impl<S, N> TimeLogReconciler<S, N>
where
    S: ProjectStore + TimeLogStore + 'static,
    N: Notifier,
{
    pub fn new(store: Arc<S>, notifier: Arc<N>, ticket: Ticket, config: TimeLogConfig) -> Self {
        let mut dialog = Self {
            store,
            notifier,
            config,
            ticket,
            form: TimeLogForm::new(),
            pending: Vec::new(),
            saved: Vec::new(),
            summary: TimeSummary::default(),
            state: DialogState::Open,
        };
        dialog.recompute();
        dialog
    }

    pub fn ticket(&self) -> &Ticket {
        &self.ticket
    }

    pub fn pending(&self) -> &[TimeLog] {
        &self.pending
    }

    pub fn saved_logs(&self) -> &[TimeLog] {
        &self.saved
    }

    pub fn summary(&self) -> TimeSummary {
        self.summary
    }

    pub fn total_logged_time(&self) -> f64 {
        self.summary.total_logged
    }

    pub fn remaining_time(&self) -> f64 {
        self.summary.remaining
    }

    pub fn is_time_exceeded(&self) -> bool {
        self.summary.is_exceeded
    }

    /// Hours staged in this dialog and not yet saved
    pub fn new_sessions_time(&self) -> f64 {
        self.summary.pending
    }

    pub fn assignee_name(&self) -> &str {
        self.ticket.assignee_name()
    }

    pub fn state(&self) -> &DialogState {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        self.state == DialogState::Open
    }

    fn estimated_hours(&self) -> f64 {
        match self.ticket.estimated_time {
            Some(_) => self.ticket.estimated_hours(),
            None => self.config.default_estimate_hours,
        }
    }

    fn recompute(&mut self) {
        self.summary = TimeSummary::compute(
            self.estimated_hours(),
            self.ticket.worked_time_hours,
            &self.pending,
        );
    }

    /// Pulls the ticket's current worked time and saved entries, then warns
    /// if the estimate is already exceeded.
    pub async fn open(&mut self) -> TimeSummary {
        self.state = DialogState::Open;
        if let Err(e) = self.load_saved_time_logs().await {
            warn!(ticket = %self.ticket.id, error = %e, "showing cached ticket data");
            self.recompute();
        }

        debug!(
            ticket = %self.ticket.id,
            worked = self.summary.total_logged,
            estimated = self.summary.estimated,
            remaining = self.summary.remaining,
            "time-log dialog opened"
        );

        if self.summary.is_exceeded {
            self.notifier
                .notify(Notice::warning("You have exceeded the estimated time."));
        }
        self.summary
    }

    /// Replaces the saved entries and the ticket's worked time with the
    /// store's copy.
    pub async fn load_saved_time_logs(&mut self) -> Result<()> {
        let id = self.ticket.id;
        let logs = self.store.list_time_logs(id).await.map_err(|e| {
            error!(ticket = %id, error = %e, "failed to load time logs");
            e
        })?;
        let ticket = self.store.get_ticket(id).await.map_err(|e| {
            error!(ticket = %id, error = %e, "failed to refresh ticket");
            e
        })?;

        self.saved = logs;
        self.ticket = ticket;
        self.recompute();
        Ok(())
    }

    /// Stages the form's entry and resets the form. Nothing is sent yet.
    pub fn add_time_log(&mut self) -> Result<()> {
        let log = self.form.validate(self.config.min_duration_hours)?;
        debug!(ticket = %self.ticket.id, duration = log.duration, date = %log.date, "time log staged");

        self.pending.push(log);
        self.recompute();
        self.form.reset();

        if let Some(over) = self.summary.projected_overrun() {
            self.notifier.notify(Notice::warning(format!(
                "You have exceeded the estimated time of {}h by {over:.1}h.",
                self.summary.estimated
            )));
        }
        Ok(())
    }

    /// Drops a staged entry
    pub fn remove_time_log(&mut self, index: usize) -> Option<TimeLog> {
        if index >= self.pending.len() {
            return None;
        }
        let removed = self.pending.remove(index);
        self.recompute();
        Some(removed)
    }

    /// Sends every staged entry, then reloads from the store and closes.
    ///
    /// The first failure aborts the batch. Entries the store already
    /// accepted stay accepted.
    pub async fn save_all_time_logs(&mut self) -> Result<LogTimeResult> {
        if self.pending.is_empty() {
            self.notifier
                .notify(Notice::warning("Add at least one work session."));
            return Err(DashboardError::NoPendingTimeLogs);
        }

        let ticket_id = self.ticket.id;
        let new_sessions_time = self.summary.pending;
        let mut tasks = JoinSet::new();
        for log in self.pending.iter().cloned() {
            let store = Arc::clone(&self.store);
            tasks.spawn(async move { store.log_time(ticket_id, log.date, log.duration).await });
        }

        while let Some(joined) = tasks.join_next().await {
            let outcome = joined
                .map_err(|e| DashboardError::Other(format!("time log task failed: {e}")))
                .and_then(|saved| saved);
            if let Err(e) = outcome {
                error!(ticket = %ticket_id, error = %e, "failed to save time logs");
                self.notifier
                    .notify(Notice::error("An error occurred while saving the time logs."));
                return Err(e);
            }
        }

        info!(ticket = %ticket_id, sessions = self.pending.len(), "time logs saved");
        self.pending.clear();
        if let Err(e) = self.load_saved_time_logs().await {
            warn!(ticket = %ticket_id, error = %e, "saved but could not reload time logs");
            self.recompute();
        }

        let result = LogTimeResult {
            time_logs: self.saved.clone(),
            total_time: self.summary.total_logged,
            new_sessions_time,
            is_time_exceeded: self.summary.is_exceeded,
        };
        self.state = DialogState::Closed(Some(result.clone()));
        Ok(result)
    }

    /// Closes without saving; staged entries are lost
    pub fn cancel(&mut self) {
        self.pending.clear();
        self.state = DialogState::Closed(None);
    }
}
