use crate::domain::ticket::TicketId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A comment on a ticket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub ticket_id: TicketId,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Comment {
    pub fn new(ticket_id: TicketId, content: String) -> Self {
        Self {
            ticket_id,
            content,
            author: None,
            created_at: Utc::now(),
        }
    }
}

/// Comments fetched per ticket. Entries are replaced whole on every fetch.
#[derive(Debug, Default)]
pub struct CommentCache {
    by_ticket: HashMap<TicketId, Vec<Comment>>,
}

impl CommentCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores the fetched list, overwriting any previous entry
    pub fn replace(&mut self, ticket_id: TicketId, comments: Vec<Comment>) {
        self.by_ticket.insert(ticket_id, comments);
    }

    pub fn get(&self, ticket_id: TicketId) -> Option<&[Comment]> {
        self.by_ticket.get(&ticket_id).map(Vec::as_slice)
    }

    pub fn is_loaded(&self, ticket_id: TicketId) -> bool {
        self.by_ticket.contains_key(&ticket_id)
    }

    pub fn has_comments(&self, ticket_id: TicketId) -> bool {
        self.get(ticket_id).is_some_and(|comments| !comments.is_empty())
    }
}

/// True for empty or whitespace-only compose-field input
pub fn is_blank(content: &str) -> bool {
    content.trim().is_empty()
}
