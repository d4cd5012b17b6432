use crate::domain::ticket::TicketRecord;
use serde::{Deserialize, Serialize};

/// A project listed by the store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: u64,
    pub name: String,
}

impl Project {
    pub fn new(id: u64, name: String) -> Self {
        Self { id, name }
    }
}

/// A project fetched with its tickets
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectDetails {
    #[serde(flatten)]
    pub project: Project,
    #[serde(default)]
    pub tickets: Vec<TicketRecord>,
}
