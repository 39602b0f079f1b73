//! Deadline notification model.
//!
//! # Invariants
//! - At most one notification exists per `(task_id, kind)` pair.
//! - `deadline` is copied from the task when the notification is created and
//!   is not updated afterwards.

use crate::model::task::TaskId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier of one notification.
pub type NotificationId = Uuid;

/// Deadline proximity category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Today,
    Tomorrow,
    /// Two days or one week ahead. Both share this kind.
    Upcoming,
    Overdue,
}

/// Reminder derived from one task's deadline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskNotification {
    pub id: NotificationId,
    pub task_id: TaskId,
    /// Short heading, e.g. `Task Due Today`.
    pub title: String,
    /// Full sentence naming the task.
    pub message: String,
    /// Serialized as `type` to match the notification feed schema.
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub deadline: String,
    pub read: bool,
    /// Unix epoch milliseconds.
    pub created_at: i64,
}

impl TaskNotification {
    /// Returns whether this notification covers the same task and kind.
    pub fn matches(&self, task_id: TaskId, kind: NotificationKind) -> bool {
        self.task_id == task_id && self.kind == kind
    }
}
