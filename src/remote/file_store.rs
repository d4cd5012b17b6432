use crate::{
    domain::{Comment, Project, ProjectDetails, Ticket, TicketId, TicketRecord, TicketStatus, TimeLog},
    error::{DashboardError, Result},
    remote::{ProjectStore, TimeLogStore},
};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{de::DeserializeOwned, Serialize};
use std::path::{Path, PathBuf};
use tokio::{fs, sync::Mutex};
use tracing::debug;

/// JSON file backed store, for offline use and tests.
///
/// Layout under the project root:
/// `.dashboard/projects/<id>.json`, `.dashboard/comments/<ticket>.json`,
/// `.dashboard/time_logs/<ticket>.json`.
pub struct FileStore {
    root_path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStore {
    const DASHBOARD_DIR: &'static str = ".dashboard";
    const PROJECTS_DIR: &'static str = "projects";
    const COMMENTS_DIR: &'static str = "comments";
    const TIME_LOGS_DIR: &'static str = "time_logs";

    /// Creates a new FileStore instance for the given root
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root_path: root.as_ref().join(Self::DASHBOARD_DIR),
            write_lock: Mutex::new(()),
        }
    }

    fn projects_dir(&self) -> PathBuf {
        self.root_path.join(Self::PROJECTS_DIR)
    }

    fn project_file(&self, id: u64) -> PathBuf {
        self.projects_dir().join(format!("{id}.json"))
    }

    fn comments_file(&self, ticket_id: TicketId) -> PathBuf {
        self.root_path
            .join(Self::COMMENTS_DIR)
            .join(format!("{ticket_id}.json"))
    }

    fn time_logs_file(&self, ticket_id: TicketId) -> PathBuf {
        self.root_path
            .join(Self::TIME_LOGS_DIR)
            .join(format!("{ticket_id}.json"))
    }

    async fn ensure_directory_exists(&self, path: &Path) -> Result<()> {
        if !path.exists() {
            fs::create_dir_all(path).await?;
        }
        Ok(())
    }

    /// Creates the directory layout
    pub async fn initialize(&self) -> Result<()> {
        self.ensure_directory_exists(&self.projects_dir()).await?;
        self.ensure_directory_exists(&self.root_path.join(Self::COMMENTS_DIR))
            .await?;
        self.ensure_directory_exists(&self.root_path.join(Self::TIME_LOGS_DIR))
            .await?;
        Ok(())
    }

    pub async fn is_initialized(&self) -> bool {
        self.projects_dir().exists()
    }

    /// Writes a project and its tickets, replacing any previous file
    pub async fn save_project(&self, details: &ProjectDetails) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        self.write_json(&self.project_file(details.project.id), details)
            .await
    }

    async fn read_json<T: DeserializeOwned>(&self, path: &Path) -> Result<Option<T>> {
        if !path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(path).await?;
        Ok(Some(serde_json::from_str(&contents)?))
    }

    async fn write_json<T: Serialize + ?Sized>(&self, path: &Path, value: &T) -> Result<()> {
        if let Some(parent) = path.parent() {
            self.ensure_directory_exists(parent).await?;
        }
        let json = serde_json::to_string_pretty(value)?;
        fs::write(path, json).await?;
        Ok(())
    }

    async fn load_all_projects(&self) -> Result<Vec<ProjectDetails>> {
        let dir = self.projects_dir();
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut entries = fs::read_dir(&dir).await?;
        let mut projects = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|s| s.to_str()) == Some("json") {
                if let Some(details) = self.read_json::<ProjectDetails>(&path).await? {
                    projects.push(details);
                }
            }
        }

        projects.sort_by_key(|details| details.project.id);
        Ok(projects)
    }

    async fn find_record(&self, id: TicketId) -> Result<TicketRecord> {
        self.load_all_projects()
            .await?
            .into_iter()
            .flat_map(|details| details.tickets)
            .find(|record| record.id == id)
            .ok_or_else(|| DashboardError::TicketNotFound(id.to_string()))
    }

    /// Applies `change` to the ticket and writes its project back.
    /// Callers hold `write_lock`.
    async fn modify_ticket<F>(&self, id: TicketId, change: F) -> Result<()>
    where
        F: FnOnce(&mut TicketRecord) + Send,
    {
        for mut details in self.load_all_projects().await? {
            if let Some(record) = details.tickets.iter_mut().find(|r| r.id == id) {
                change(record);
                return self
                    .write_json(&self.project_file(details.project.id), &details)
                    .await;
            }
        }
        Err(DashboardError::TicketNotFound(id.to_string()))
    }
}

#[async_trait]
impl ProjectStore for FileStore {
    async fn list_projects(&self) -> Result<Vec<Project>> {
        Ok(self
            .load_all_projects()
            .await?
            .into_iter()
            .map(|details| details.project)
            .collect())
    }

    async fn get_project(&self, id: u64) -> Result<ProjectDetails> {
        self.read_json(&self.project_file(id))
            .await?
            .ok_or(DashboardError::ProjectNotFound(id))
    }

    async fn get_ticket(&self, id: TicketId) -> Result<Ticket> {
        Ticket::try_from(self.find_record(id).await?)
    }

    async fn update_ticket_status(&self, id: TicketId, status: TicketStatus) -> Result<()> {
        if status.requires_privilege() {
            return Err(DashboardError::PrivilegeRequired(status.to_string()));
        }
        let _guard = self.write_lock.lock().await;
        self.modify_ticket(id, |record| record.status = status.as_str().to_string())
            .await?;
        debug!(ticket = %id, %status, "ticket status updated");
        Ok(())
    }

    async fn validate_ticket(&self, id: TicketId) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        self.modify_ticket(id, |record| {
            record.status = TicketStatus::Validated.as_str().to_string()
        })
        .await?;
        debug!(ticket = %id, "ticket validated");
        Ok(())
    }

    async fn list_comments(&self, ticket_id: TicketId) -> Result<Vec<Comment>> {
        Ok(self
            .read_json(&self.comments_file(ticket_id))
            .await?
            .unwrap_or_default())
    }

    async fn add_comment(&self, ticket_id: TicketId, content: &str) -> Result<Comment> {
        let _guard = self.write_lock.lock().await;
        self.find_record(ticket_id).await?;

        let path = self.comments_file(ticket_id);
        let mut comments: Vec<Comment> = self.read_json(&path).await?.unwrap_or_default();
        let comment = Comment::new(ticket_id, content.to_string());
        comments.push(comment.clone());
        self.write_json(&path, &comments).await?;
        Ok(comment)
    }
}

#[async_trait]
impl TimeLogStore for FileStore {
    async fn log_time(&self, ticket_id: TicketId, date: NaiveDate, duration: f64) -> Result<TimeLog> {
        let _guard = self.write_lock.lock().await;
        self.find_record(ticket_id).await?;

        // Entry first: worked time must never exceed what the entries account for.
        let path = self.time_logs_file(ticket_id);
        let mut logs: Vec<TimeLog> = self.read_json(&path).await?.unwrap_or_default();
        let log = TimeLog::new(date, duration, String::new());
        logs.push(log.clone());
        self.write_json(&path, &logs).await?;

        self.modify_ticket(ticket_id, |record| record.worked_time_hours += duration)
            .await?;
        Ok(log)
    }

    async fn list_time_logs(&self, ticket_id: TicketId) -> Result<Vec<TimeLog>> {
        Ok(self
            .read_json(&self.time_logs_file(ticket_id))
            .await?
            .unwrap_or_default())
    }
}
