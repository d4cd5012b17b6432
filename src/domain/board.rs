use crate::{
    domain::ticket::{Ticket, TicketId, TicketRecord, TicketStatus},
    error::{DashboardError, Result},
};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Configuration for a board column
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnConfig {
    pub status: TicketStatus,
    pub label: String,
    pub color: String,
    /// Non-admin users can neither drag tickets into nor out of a restricted column
    #[serde(default)]
    pub restricted: bool,
}

impl ColumnConfig {
    pub fn new(status: TicketStatus, color: &str) -> Self {
        Self {
            status,
            label: status.label().to_string(),
            color: color.to_string(),
            restricted: false,
        }
    }

    pub fn restricted(mut self) -> Self {
        self.restricted = true;
        self
    }
}

/// Board configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardConfig {
    pub name: String,
    pub columns: Vec<ColumnConfig>,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            name: "Dashboard".to_string(),
            columns: vec![
                ColumnConfig::new(TicketStatus::Todo, "#f8f9fa").restricted(),
                ColumnConfig::new(TicketStatus::InProgress, "#fff3cd").restricted(),
                ColumnConfig::new(TicketStatus::InReview, "#e2e3ff").restricted(),
                ColumnConfig::new(TicketStatus::Done, "#d4edda"),
                ColumnConfig::new(TicketStatus::Validated, "#d1ecf1"),
            ],
        }
    }
}

/// A board column and the tickets currently in it
#[derive(Debug, Clone)]
pub struct StatusColumn {
    pub key: TicketStatus,
    pub label: String,
    pub color: String,
    pub tickets: Vec<Ticket>,
    pub disabled: bool,
}

impl StatusColumn {
    fn from_config(config: &ColumnConfig, is_admin: bool) -> Self {
        Self {
            key: config.status,
            label: config.label.clone(),
            color: config.color.clone(),
            tickets: Vec::new(),
            disabled: !is_admin && config.restricted,
        }
    }
}

/// Where a dragged ticket was picked up and released. The column it was
/// released over is passed alongside as the target status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DropEvent {
    pub from: TicketStatus,
    pub from_index: usize,
    pub to_index: usize,
}

impl DropEvent {
    pub fn new(from: TicketStatus, from_index: usize, to_index: usize) -> Self {
        Self {
            from,
            from_index,
            to_index,
        }
    }
}

/// Kanban board state: one column per configured status
#[derive(Debug, Clone)]
pub struct Board {
    pub name: String,
    pub columns: Vec<StatusColumn>,
}

impl Board {
    pub fn new(config: &BoardConfig, is_admin: bool) -> Self {
        Self {
            name: config.name.clone(),
            columns: config
                .columns
                .iter()
                .map(|col| StatusColumn::from_config(col, is_admin))
                .collect(),
        }
    }

    pub fn column(&self, status: TicketStatus) -> Option<&StatusColumn> {
        self.columns.iter().find(|col| col.key == status)
    }

    /// Whether the column for `status` is locked for the current role.
    /// A status without a column is not locked.
    pub fn is_disabled(&self, status: TicketStatus) -> bool {
        self.column(status).is_some_and(|col| col.disabled)
    }

    fn column_index(&self, status: TicketStatus) -> Result<usize> {
        self.columns
            .iter()
            .position(|col| col.key == status)
            .ok_or_else(|| DashboardError::InvalidDrop(format!("no column for {status}")))
    }

    /// Replaces all column contents with `records`. Records whose status has
    /// no column are skipped with a warning. Returns how many were placed.
    pub fn distribute(&mut self, records: Vec<TicketRecord>) -> usize {
        for col in &mut self.columns {
            col.tickets.clear();
        }

        let mut placed = 0;
        for record in records {
            let id = record.id;
            let raw_status = record.status.clone();
            let ticket = match Ticket::try_from(record) {
                Ok(ticket) => ticket,
                Err(_) => {
                    warn!(ticket = %id, status = %raw_status, "unrecognized ticket status");
                    continue;
                }
            };

            match self.columns.iter_mut().find(|col| col.key == ticket.status) {
                Some(col) => {
                    col.tickets.push(ticket);
                    placed += 1;
                }
                None => {
                    warn!(ticket = %id, status = %raw_status, "no column for ticket status");
                }
            }
        }
        placed
    }

    /// Ticket under the drag source position
    pub fn ticket_at(&self, status: TicketStatus, index: usize) -> Option<&Ticket> {
        self.column(status).and_then(|col| col.tickets.get(index))
    }

    pub fn find_ticket(&self, id: TicketId) -> Option<&Ticket> {
        self.columns
            .iter()
            .flat_map(|col| col.tickets.iter())
            .find(|ticket| ticket.id == id)
    }

    /// Overwrites the status field of a ticket wherever it currently sits.
    /// Column membership is left alone; a reload puts it back in place.
    pub fn set_status(&mut self, id: TicketId, status: TicketStatus) -> bool {
        for col in &mut self.columns {
            if let Some(ticket) = col.tickets.iter_mut().find(|t| t.id == id) {
                ticket.status = status;
                return true;
            }
        }
        false
    }

    /// Moves an item inside one column. The target index is clamped.
    pub fn reorder(&mut self, status: TicketStatus, from: usize, to: usize) -> Result<()> {
        let idx = self.column_index(status)?;
        let tickets = &mut self.columns[idx].tickets;
        if from >= tickets.len() {
            return Err(DashboardError::InvalidDrop(format!(
                "index {from} out of range in {status}"
            )));
        }

        let to = to.min(tickets.len() - 1);
        let ticket = tickets.remove(from);
        tickets.insert(to, ticket);
        Ok(())
    }

    /// Moves a ticket to the `to` column and sets its status to match. The
    /// target index is clamped.
    pub fn transfer(&mut self, event: &DropEvent, to: TicketStatus) -> Result<TicketId> {
        let from_idx = self.column_index(event.from)?;
        let to_idx = self.column_index(to)?;

        if event.from_index >= self.columns[from_idx].tickets.len() {
            return Err(DashboardError::InvalidDrop(format!(
                "index {} out of range in {}",
                event.from_index, event.from
            )));
        }

        let mut ticket = self.columns[from_idx].tickets.remove(event.from_index);
        ticket.status = to;
        let id = ticket.id;

        let target = &mut self.columns[to_idx].tickets;
        let at = event.to_index.min(target.len());
        target.insert(at, ticket);
        Ok(id)
    }

    pub fn ticket_count(&self) -> usize {
        self.columns.iter().map(|col| col.tickets.len()).sum()
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new(&BoardConfig::default(), true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: u64, status: &str) -> TicketRecord {
        let mut record = TicketRecord::from(Ticket::new(TicketId::new(id), format!("T{id}")));
        record.status = status.to_string();
        record
    }

    fn ids(board: &Board, status: TicketStatus) -> Vec<u64> {
        board
            .column(status)
            .unwrap()
            .tickets
            .iter()
            .map(|t| t.id.value())
            .collect()
    }

    #[test]
    fn test_default_columns() {
        let board = Board::default();
        let keys: Vec<_> = board.columns.iter().map(|c| c.key).collect();
        assert_eq!(keys, TicketStatus::ALL.to_vec());
        assert_eq!(board.column(TicketStatus::Done).unwrap().color, "#d4edda");
    }

    #[test]
    fn test_role_gating() {
        let board = Board::new(&BoardConfig::default(), false);
        assert!(board.column(TicketStatus::Todo).unwrap().disabled);
        assert!(board.column(TicketStatus::InReview).unwrap().disabled);
        assert!(!board.column(TicketStatus::Done).unwrap().disabled);
        assert!(!board.column(TicketStatus::Validated).unwrap().disabled);

        assert!(board.is_disabled(TicketStatus::InProgress));
        assert!(!board.is_disabled(TicketStatus::Validated));

        let board = Board::new(&BoardConfig::default(), true);
        assert!(board.columns.iter().all(|c| !c.disabled));
        assert!(!board.is_disabled(TicketStatus::Todo));
    }

    #[test]
    fn test_distribute_places_each_ticket_in_its_column() {
        let mut board = Board::default();
        let placed = board.distribute(vec![
            record(1, "TODO"),
            record(2, "DONE"),
            record(3, "TODO"),
            record(4, "VALIDATED"),
        ]);

        assert_eq!(placed, 4);
        assert_eq!(ids(&board, TicketStatus::Todo), vec![1, 3]);
        assert_eq!(ids(&board, TicketStatus::Done), vec![2]);
        assert_eq!(ids(&board, TicketStatus::Validated), vec![4]);
        for col in &board.columns {
            assert!(col.tickets.iter().all(|t| t.status == col.key));
        }
    }

    #[test]
    fn test_distribute_drops_unknown_status() {
        let mut board = Board::default();
        let placed = board.distribute(vec![record(1, "TODO"), record(2, "ARCHIVED")]);

        assert_eq!(placed, 1);
        assert_eq!(board.ticket_count(), 1);
        assert!(board.find_ticket(TicketId::new(2)).is_none());
    }

    #[test]
    fn test_distribute_rebuilds_from_scratch() {
        let mut board = Board::default();
        board.distribute(vec![record(1, "TODO"), record(2, "TODO")]);
        board.distribute(vec![record(2, "DONE")]);

        assert!(ids(&board, TicketStatus::Todo).is_empty());
        assert_eq!(ids(&board, TicketStatus::Done), vec![2]);
    }

    #[test]
    fn test_distribute_skips_statuses_without_column() {
        let config = BoardConfig {
            name: "Small".to_string(),
            columns: vec![ColumnConfig::new(TicketStatus::Todo, "#fff")],
        };
        let mut board = Board::new(&config, true);
        let placed = board.distribute(vec![record(1, "TODO"), record(2, "DONE")]);
        assert_eq!(placed, 1);
    }

    #[test]
    fn test_reorder_within_column() {
        let mut board = Board::default();
        board.distribute(vec![record(1, "TODO"), record(2, "TODO"), record(3, "TODO")]);

        board.reorder(TicketStatus::Todo, 0, 2).unwrap();
        assert_eq!(ids(&board, TicketStatus::Todo), vec![2, 3, 1]);

        board.reorder(TicketStatus::Todo, 2, 99).unwrap();
        assert_eq!(ids(&board, TicketStatus::Todo), vec![2, 3, 1]);

        assert!(board.reorder(TicketStatus::Todo, 5, 0).is_err());
    }

    #[test]
    fn test_transfer_between_columns() {
        let mut board = Board::default();
        board.distribute(vec![record(5, "TODO"), record(6, "IN_PROGRESS")]);

        let event = DropEvent::new(TicketStatus::Todo, 0, 0);
        let id = board.transfer(&event, TicketStatus::InProgress).unwrap();

        assert_eq!(id, TicketId::new(5));
        assert_eq!(ids(&board, TicketStatus::InProgress), vec![5, 6]);
        assert!(ids(&board, TicketStatus::Todo).is_empty());
        assert_eq!(
            board.find_ticket(id).unwrap().status,
            TicketStatus::InProgress
        );
    }

    #[test]
    fn test_transfer_out_of_range() {
        let mut board = Board::default();
        let event = DropEvent::new(TicketStatus::Todo, 0, 0);
        assert!(matches!(
            board.transfer(&event, TicketStatus::Done),
            Err(DashboardError::InvalidDrop(_))
        ));
    }

    #[test]
    fn test_set_status_in_place() {
        let mut board = Board::default();
        board.distribute(vec![record(1, "TODO")]);

        assert!(board.set_status(TicketId::new(1), TicketStatus::Done));
        assert_eq!(ids(&board, TicketStatus::Todo), vec![1]);
        assert!(!board.set_status(TicketId::new(99), TicketStatus::Done));
    }
}
