use crate::{
    config::{DashboardConfig, Role, TimeLogConfig},
    dashboard::time_log_dialog::{LogTimeResult, TimeLogReconciler},
    domain::{
        comment::is_blank, Board, Comment, CommentCache, DropEvent, PopupState, Project,
        Ticket, TicketId, TicketStatus,
    },
    error::{DashboardError, Result},
    remote::{Notice, Notifier, ProjectStore, TimeLogStore},
};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// What `on_drop` did with a dragged ticket
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropOutcome {
    /// Moved inside its column; local only
    Reordered,
    /// Moved across columns and accepted by the store
    Moved,
    /// Validated by the store and reloaded
    Validated,
    /// Refused for lack of privilege or a locked column; board reloaded
    Denied,
    /// Store refused the change; status restored and board reloaded
    RolledBack,
}

/// A status change waiting for the store's answer
#[derive(Debug, Clone, Copy)]
struct PendingMove {
    ticket_id: TicketId,
    previous_status: TicketStatus,
    /// Outcome to report when the store accepts
    on_success: DropOutcome,
    refresh_on_success: bool,
}

/// Board state for the selected project plus comment and popup handling.
///
/// The store is the source of truth: every failed remote call is resolved by
/// reloading the board from it.
pub struct BoardController<S, N> {
    store: Arc<S>,
    notifier: Arc<N>,
    role: Role,
    time_log_config: TimeLogConfig,
    board: Board,
    projects: Vec<Project>,
    selected_project: Option<Project>,
    comments: CommentCache,
    comment_thread: Option<TicketId>,
    /// Compose field of the comment popup
    pub new_comment_text: String,
    popup: PopupState,
    is_loading: bool,
    last_error: Option<String>,
}

impl<S, N> BoardController<S, N>
where
    S: ProjectStore,
    N: Notifier,
{
    pub fn new(store: Arc<S>, notifier: Arc<N>, config: &DashboardConfig) -> Self {
        let role = config.session.role;
        Self {
            store,
            notifier,
            role,
            time_log_config: config.time_log.clone(),
            board: Board::new(&config.board, role.is_admin()),
            projects: Vec::new(),
            selected_project: None,
            comments: CommentCache::new(),
            comment_thread: None,
            new_comment_text: String::new(),
            popup: PopupState::Closed,
            is_loading: false,
            last_error: None,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn selected_project(&self) -> Option<&Project> {
        self.selected_project.as_ref()
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn popup(&self) -> &PopupState {
        &self.popup
    }

    pub fn comments(&self, ticket_id: TicketId) -> Option<&[Comment]> {
        self.comments.get(ticket_id)
    }

    pub fn has_comments(&self, ticket_id: TicketId) -> bool {
        self.comments.has_comments(ticket_id)
    }

    /// Ticket whose comments were fetched last
    pub fn comment_thread(&self) -> Option<TicketId> {
        self.comment_thread
    }

    /// Fetches projects, selects the first one and loads its tickets
    pub async fn load_projects(&mut self) -> Result<()> {
        let projects = match self.store.list_projects().await {
            Ok(projects) => projects,
            Err(e) => {
                error!(error = %e, "failed to load projects");
                self.last_error = Some(e.to_string());
                return Err(e);
            }
        };

        debug!(count = projects.len(), "projects loaded");
        self.selected_project = projects.first().cloned();
        self.projects = projects;

        if self.selected_project.is_some() {
            self.load_tickets().await?;
        }
        Ok(())
    }

    /// Switches to another loaded project and reloads the board
    pub async fn select_project(&mut self, project_id: u64) -> Result<()> {
        let project = self
            .projects
            .iter()
            .find(|p| p.id == project_id)
            .cloned()
            .ok_or(DashboardError::ProjectNotFound(project_id))?;

        self.selected_project = Some(project);
        self.load_tickets().await
    }

    /// Rebuilds every column from the selected project's tickets. Does
    /// nothing when no project is selected.
    pub async fn load_tickets(&mut self) -> Result<()> {
        let Some(project_id) = self.selected_project.as_ref().map(|p| p.id) else {
            return Ok(());
        };

        self.is_loading = true;
        let fetched = self.store.get_project(project_id).await;
        self.is_loading = false;

        match fetched {
            Ok(details) => {
                let total = details.tickets.len();
                let placed = self.board.distribute(details.tickets);
                self.last_error = None;
                debug!(project = project_id, total, placed, "tickets distributed");
                Ok(())
            }
            Err(e) => {
                error!(project = project_id, error = %e, "failed to load tickets");
                self.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Reload after a rejected or privileged change. Failures are logged
    /// by `load_tickets`.
    async fn reload(&mut self) {
        let _ = self.load_tickets().await;
    }

    /// Applies a drag-and-drop of the ticket at `event` onto the
    /// `target` column.
    pub async fn on_drop(&mut self, event: DropEvent, target: TicketStatus) -> Result<DropOutcome> {
        let ticket = self
            .board
            .ticket_at(event.from, event.from_index)
            .ok_or_else(|| {
                DashboardError::InvalidDrop(format!(
                    "no ticket at {} in {}",
                    event.from_index, event.from
                ))
            })?;
        let ticket_id = ticket.id;
        let previous_status = ticket.status;

        if self.board.is_disabled(event.from) || self.board.is_disabled(target) {
            warn!(ticket = %ticket_id, from = %event.from, to = %target, "drop refused: column is locked for this role");
            self.notifier.notify(Notice::warning(
                DashboardError::PrivilegeRequired(target.to_string()).to_string(),
            ));
            self.reload().await;
            return Ok(DropOutcome::Denied);
        }

        if target.requires_privilege() {
            if !self.role.is_admin() {
                warn!(ticket = %ticket_id, "validation refused: user is not an administrator");
                self.notifier.notify(Notice::warning(
                    DashboardError::PrivilegeRequired(target.to_string()).to_string(),
                ));
                self.reload().await;
                return Ok(DropOutcome::Denied);
            }

            let outcome = self.store.validate_ticket(ticket_id).await;
            let pending = PendingMove {
                ticket_id,
                previous_status,
                on_success: DropOutcome::Validated,
                refresh_on_success: true,
            };
            return Ok(self.reconcile(pending, outcome).await);
        }

        if event.from == target {
            // Column order is not stored remotely; the next reload resets it.
            self.board
                .reorder(event.from, event.from_index, event.to_index)?;
            return Ok(DropOutcome::Reordered);
        }

        self.board.transfer(&event, target)?;
        let outcome = self.store.update_ticket_status(ticket_id, target).await;
        let pending = PendingMove {
            ticket_id,
            previous_status,
            on_success: DropOutcome::Moved,
            refresh_on_success: false,
        };
        Ok(self.reconcile(pending, outcome).await)
    }

    /// Settles a status change once the store has answered. Safe to run
    /// more than once for the same move.
    async fn reconcile(&mut self, pending: PendingMove, outcome: Result<()>) -> DropOutcome {
        match outcome {
            Ok(()) => {
                info!(ticket = %pending.ticket_id, outcome = ?pending.on_success, "ticket status updated");
                if pending.refresh_on_success {
                    self.reload().await;
                }
                pending.on_success
            }
            Err(e) => {
                error!(ticket = %pending.ticket_id, error = %e, "status change rejected, rolling back");
                self.board
                    .set_status(pending.ticket_id, pending.previous_status);
                self.reload().await;
                DropOutcome::RolledBack
            }
        }
    }

    /// Fetches a ticket's comments and replaces its cache entry
    pub async fn get_comments(&mut self, ticket_id: TicketId) -> Result<()> {
        self.comment_thread = Some(ticket_id);
        match self.store.list_comments(ticket_id).await {
            Ok(comments) => {
                debug!(ticket = %ticket_id, count = comments.len(), "comments loaded");
                self.comments.replace(ticket_id, comments);
                Ok(())
            }
            Err(e) => {
                error!(ticket = %ticket_id, error = %e, "failed to load comments");
                Err(e)
            }
        }
    }

    /// Posts a comment. Blank content is refused without calling the store.
    pub async fn add_comment(&mut self, ticket_id: TicketId, content: &str) -> Result<()> {
        if is_blank(content) {
            debug!(ticket = %ticket_id, "ignoring empty comment");
            return Err(DashboardError::EmptyComment);
        }

        if let Err(e) = self.store.add_comment(ticket_id, content).await {
            error!(ticket = %ticket_id, error = %e, "failed to add comment");
            return Err(e);
        }

        self.new_comment_text.clear();
        self.get_comments(ticket_id).await
    }

    /// Posts the compose field on the ticket of the open popup
    pub async fn submit_comment(&mut self) -> Result<()> {
        let ticket_id = self
            .popup
            .selected_id()
            .ok_or_else(|| DashboardError::Other("no ticket selected".to_string()))?;
        let content = self.new_comment_text.clone();
        self.add_comment(ticket_id, &content).await
    }

    async fn ensure_comments(&mut self, ticket_id: TicketId) {
        if !self.comments.is_loaded(ticket_id) {
            let _ = self.get_comments(ticket_id).await;
        }
    }

    /// Fetches the latest copy of a ticket and shows its details
    pub async fn open_ticket_details(&mut self, ticket_id: TicketId) -> Result<()> {
        let ticket = self.store.get_ticket(ticket_id).await?;
        self.open_ticket_popup(ticket).await;
        Ok(())
    }

    pub async fn open_ticket_popup(&mut self, ticket: Ticket) {
        let id = ticket.id;
        self.popup.open_details(ticket);
        self.ensure_comments(id).await;
    }

    pub async fn open_comment_popup(&mut self, ticket: Ticket) {
        let id = ticket.id;
        self.popup.open_comments(ticket);
        self.ensure_comments(id).await;
    }

    pub async fn open_comment_popup_from_details(&mut self) {
        if let Some(id) = self.popup.details_to_comments() {
            self.ensure_comments(id).await;
        }
    }

    pub fn close_ticket_popup(&mut self) {
        self.popup.close_details();
    }

    pub fn close_comment_popup(&mut self) {
        self.popup.close_comments();
        self.new_comment_text.clear();
    }

    pub fn close_all_popups(&mut self) {
        self.popup.close_all();
        self.new_comment_text.clear();
    }

    pub fn back_to_ticket_details(&mut self) {
        if self.popup.comments_to_details() {
            self.new_comment_text.clear();
        }
    }
}

impl<S, N> BoardController<S, N>
where
    S: ProjectStore + TimeLogStore + 'static,
    N: Notifier + 'static,
{
    /// Opens the time-log dialog for a ticket on the board
    pub async fn open_log_time_dialog(
        &self,
        ticket_id: TicketId,
    ) -> Result<TimeLogReconciler<S, N>> {
        let ticket = self
            .board
            .find_ticket(ticket_id)
            .cloned()
            .ok_or_else(|| DashboardError::TicketNotFound(ticket_id.to_string()))?;

        let mut dialog = TimeLogReconciler::new(
            Arc::clone(&self.store),
            Arc::clone(&self.notifier),
            ticket,
            self.time_log_config.clone(),
        );
        dialog.open().await;
        Ok(dialog)
    }

    /// Handles the dialog's close result; a saved session refreshes the board
    pub async fn finish_log_time(&mut self, result: Option<LogTimeResult>) {
        if let Some(result) = result {
            info!(
                total = result.total_time,
                sessions = result.new_sessions_time,
                "time logged"
            );
            self.notifier.notify(Notice::info("Time saved."));
            self.reload().await;
        }
    }
}
