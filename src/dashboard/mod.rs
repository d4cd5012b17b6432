pub mod board_controller;
pub mod time_log_dialog;

pub use board_controller::{BoardController, DropOutcome};
pub use time_log_dialog::{DialogState, LogTimeResult, TimeLogReconciler};
