//! Core logic for the personal task board.
//! This crate owns the board invariants and the deadline reminder rules.

pub mod board;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod notify;
pub mod repo;
pub mod service;

pub use board::{BoardError, BoardResult, BoardSnapshot, BoardStore, BoardSummary};
pub use config::CoreConfig;
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::column::{Column, ColumnId};
pub use model::notification::{NotificationId, NotificationKind, TaskNotification};
pub use model::task::{
    parse_deadline, InvalidDate, Priority, Task, TaskDraft, TaskId, TaskPatch,
    TaskValidationError,
};
pub use notify::{generate_notifications, notification_kind_for, GenerationReport};
pub use repo::board_repo::{BoardRepository, RepoError, RepoResult, SqliteBoardRepository};
pub use repo::notification_repo::{
    InMemoryNotificationStore, NotificationRepository, SqliteNotificationRepository,
};
pub use service::board_service::BoardService;
pub use service::notification_service::NotificationService;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
