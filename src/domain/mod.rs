pub mod board;
pub mod comment;
pub mod popup;
pub mod project;
pub mod ticket;
pub mod time_log;

pub use board::{Board, BoardConfig, ColumnConfig, DropEvent, StatusColumn};
pub use comment::{Comment, CommentCache};
pub use popup::PopupState;
pub use project::{Project, ProjectDetails};
pub use ticket::{Estimate, Ticket, TicketId, TicketRecord, TicketStatus};
pub use time_log::{TimeLog, TimeLogForm, TimeSummary};
