use crate::domain::ticket::{Ticket, TicketId};

/// Which ticket popup is visible. Details and comments never show together.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum PopupState {
    #[default]
    Closed,
    ShowingDetails(Ticket),
    ShowingComments(Ticket),
}

impl PopupState {
    /// Ticket the open popup is about
    pub fn selected(&self) -> Option<&Ticket> {
        match self {
            Self::Closed => None,
            Self::ShowingDetails(ticket) | Self::ShowingComments(ticket) => Some(ticket),
        }
    }

    pub fn selected_id(&self) -> Option<TicketId> {
        self.selected().map(|ticket| ticket.id)
    }

    pub fn is_showing_details(&self) -> bool {
        matches!(self, Self::ShowingDetails(_))
    }

    pub fn is_showing_comments(&self) -> bool {
        matches!(self, Self::ShowingComments(_))
    }

    pub fn open_details(&mut self, ticket: Ticket) {
        *self = Self::ShowingDetails(ticket);
    }

    pub fn open_comments(&mut self, ticket: Ticket) {
        *self = Self::ShowingComments(ticket);
    }

    /// Details to comments for the same ticket. Returns the ticket id when
    /// the switch happened.
    pub fn details_to_comments(&mut self) -> Option<TicketId> {
        match std::mem::take(self) {
            Self::ShowingDetails(ticket) => {
                let id = ticket.id;
                *self = Self::ShowingComments(ticket);
                Some(id)
            }
            other => {
                *self = other;
                None
            }
        }
    }

    /// Comments back to details for the same ticket
    pub fn comments_to_details(&mut self) -> bool {
        match std::mem::take(self) {
            Self::ShowingComments(ticket) => {
                *self = Self::ShowingDetails(ticket);
                true
            }
            other => {
                *self = other;
                false
            }
        }
    }

    /// Closing details drops the selected ticket as well.
    pub fn close_details(&mut self) {
        if self.is_showing_details() {
            *self = Self::Closed;
        }
    }

    /// Closing comments drops the selection unless details are showing.
    pub fn close_comments(&mut self) {
        if self.is_showing_comments() {
            *self = Self::Closed;
        }
    }

    pub fn close_all(&mut self) {
        *self = Self::Closed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ticket(id: u64) -> Ticket {
        Ticket::new(TicketId::new(id), format!("Ticket {id}"))
    }

    #[test]
    fn test_details_comments_round_trip() {
        let mut popup = PopupState::default();
        popup.open_details(ticket(1));
        assert!(popup.is_showing_details());

        assert_eq!(popup.details_to_comments(), Some(TicketId::new(1)));
        assert!(popup.is_showing_comments());

        assert!(popup.comments_to_details());
        assert_eq!(popup.selected_id(), Some(TicketId::new(1)));
        assert!(popup.is_showing_details());
    }

    #[test]
    fn test_transitions_from_closed_are_noops() {
        let mut popup = PopupState::Closed;
        assert_eq!(popup.details_to_comments(), None);
        assert!(!popup.comments_to_details());
        assert_eq!(popup, PopupState::Closed);
    }

    #[test]
    fn test_close_comments_keeps_details() {
        let mut popup = PopupState::ShowingDetails(ticket(2));
        popup.close_comments();
        assert!(popup.is_showing_details());

        let mut popup = PopupState::ShowingComments(ticket(2));
        popup.close_comments();
        assert_eq!(popup.selected(), None);
    }

    #[test]
    fn test_close_details_drops_selection() {
        let mut popup = PopupState::ShowingDetails(ticket(4));
        popup.close_details();

        assert_eq!(popup.selected(), None);
        assert_eq!(popup.details_to_comments(), None);
        assert_eq!(popup, PopupState::Closed);
    }

    #[test]
    fn test_close_details_leaves_comments_alone() {
        let mut popup = PopupState::ShowingComments(ticket(3));
        popup.close_details();
        assert!(popup.is_showing_comments());
    }
}
