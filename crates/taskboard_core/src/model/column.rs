//! Board column model.
//!
//! # Responsibility
//! - Name the well-known board columns and hold each column's task order.
//!
//! # Invariants
//! - `task_ids` is the on-screen order of the column, top to bottom.
//! - A task id appears in at most one column of a board.

use crate::model::task::TaskId;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Identifier of one board column.
///
/// Kept as a string newtype so stored boards can carry ids that this build
/// does not know about; the board store rejects references to columns it
/// does not hold.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnId(String);

impl ColumnId {
    /// Backlog column.
    pub const PENDING: &'static str = "pending";
    /// In-progress column.
    pub const PROCESSING: &'static str = "processing";
    /// Completion column. Tasks here never produce deadline notifications.
    pub const DONE: &'static str = "done";

    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn pending() -> Self {
        Self::new(Self::PENDING)
    }

    pub fn processing() -> Self {
        Self::new(Self::PROCESSING)
    }

    pub fn done() -> Self {
        Self::new(Self::DONE)
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Returns whether this id denotes the completion column.
    pub fn is_done(&self) -> bool {
        self.0 == Self::DONE
    }
}

impl Display for ColumnId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ColumnId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// One board column with its ordered task membership.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub id: ColumnId,
    /// User-facing heading.
    pub title: String,
    /// Task ids in display order.
    pub task_ids: Vec<TaskId>,
}

impl Column {
    /// Creates an empty column.
    pub fn new(id: ColumnId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            task_ids: Vec::new(),
        }
    }

    /// Position of `task_id` in this column, if present.
    pub fn position_of(&self, task_id: TaskId) -> Option<usize> {
        self.task_ids.iter().position(|id| *id == task_id)
    }

    pub(crate) fn remove_task(&mut self, task_id: TaskId) -> Option<usize> {
        let index = self.position_of(task_id)?;
        self.task_ids.remove(index);
        Some(index)
    }

    /// Inserts at `index` clamped to `[0, len]` and returns the used index.
    pub(crate) fn insert_task(&mut self, task_id: TaskId, index: usize) -> usize {
        let index = index.min(self.task_ids.len());
        self.task_ids.insert(index, task_id);
        index
    }

    pub(crate) fn push_task(&mut self, task_id: TaskId) {
        self.task_ids.push(task_id);
    }
}

/// Default column layout: backlog, in progress, complete.
pub fn default_columns() -> Vec<Column> {
    vec![
        Column::new(ColumnId::pending(), "Pending"),
        Column::new(ColumnId::processing(), "Processing"),
        Column::new(ColumnId::done(), "Done"),
    ]
}
