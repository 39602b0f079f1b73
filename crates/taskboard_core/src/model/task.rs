//! Task domain model.
//!
//! # Responsibility
//! - Define the canonical task record shown on the board.
//! - Provide draft/patch shapes for create and partial update.
//! - Parse the stored deadline string into a calendar date.
//!
//! # Invariants
//! - `id` is stable and never reused for another task.
//! - `title` is non-blank after trimming.
//! - `deadline` is kept as the caller supplied it; parsing happens on read so
//!   a malformed value only affects the task that carries it.

use crate::model::column::ColumnId;
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier of one task.
pub type TaskId = Uuid;

static DEADLINE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{4}-\d{2}-\d{2})(?:[T ][0-9:.+\-Z]*)?$").expect("valid deadline regex")
});

/// Task priority shown on the board card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    #[default]
    Low,
    Medium,
    High,
}

/// Canonical task record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub description: String,
    pub priority: Priority,
    /// ISO 8601 date (`YYYY-MM-DD`), optionally followed by a time part.
    pub deadline: String,
    pub completed: bool,
    /// Owning column. Must match the column whose list holds `id`.
    pub column_id: ColumnId,
}

/// Everything a caller supplies to create a task; the id is generated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub deadline: String,
    pub completed: bool,
    pub column_id: ColumnId,
}

impl TaskDraft {
    /// Creates a draft with empty description, low priority, not completed.
    pub fn new(
        title: impl Into<String>,
        deadline: impl Into<String>,
        column_id: ColumnId,
    ) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            priority: Priority::Low,
            deadline: deadline.into(),
            completed: false,
            column_id,
        }
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Validates field-level invariants.
    ///
    /// # Errors
    /// - `BlankTitle` when the title is empty after trimming.
    pub fn validate(&self) -> Result<(), TaskValidationError> {
        validate_title(&self.title)
    }
}

/// Partial field update. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<Priority>,
    pub deadline: Option<String>,
    pub completed: Option<bool>,
    pub column_id: Option<ColumnId>,
}

impl TaskPatch {
    /// Validates the fields the patch sets.
    pub fn validate(&self) -> Result<(), TaskValidationError> {
        match &self.title {
            Some(title) => validate_title(title),
            None => Ok(()),
        }
    }

    /// Returns whether this patch touches no field.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl Task {
    /// Builds a task from a draft with a caller-provided id.
    pub fn from_draft(id: TaskId, draft: TaskDraft) -> Self {
        Self {
            id,
            title: draft.title,
            description: draft.description,
            priority: draft.priority,
            deadline: draft.deadline,
            completed: draft.completed,
            column_id: draft.column_id,
        }
    }

    /// Merges every field set in `patch`, including `column_id`.
    ///
    /// Column membership lists are owned by the board store; callers that
    /// change `column_id` must move the id between columns themselves.
    pub(crate) fn apply_patch(&mut self, patch: TaskPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(priority) = patch.priority {
            self.priority = priority;
        }
        if let Some(deadline) = patch.deadline {
            self.deadline = deadline;
        }
        if let Some(completed) = patch.completed {
            self.completed = completed;
        }
        if let Some(column_id) = patch.column_id {
            self.column_id = column_id;
        }
    }

    /// Parses `deadline` into a calendar date, ignoring any time part.
    pub fn deadline_date(&self) -> Result<NaiveDate, InvalidDate> {
        parse_deadline(&self.deadline).ok_or_else(|| InvalidDate {
            task_id: self.id,
            value: self.deadline.clone(),
        })
    }
}

/// Parses `YYYY-MM-DD` or an ISO 8601 date-time and keeps only the date.
pub fn parse_deadline(value: &str) -> Option<NaiveDate> {
    let captures = DEADLINE_RE.captures(value.trim())?;
    let date = captures.get(1)?.as_str();
    NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()
}

fn validate_title(title: &str) -> Result<(), TaskValidationError> {
    if title.trim().is_empty() {
        return Err(TaskValidationError::BlankTitle);
    }
    Ok(())
}

/// Field-level task validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskValidationError {
    BlankTitle,
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankTitle => write!(f, "task title must not be blank"),
        }
    }
}

impl Error for TaskValidationError {}

/// A task deadline that cannot be read as a calendar date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidDate {
    pub task_id: TaskId,
    /// The raw stored value.
    pub value: String,
}

impl Display for InvalidDate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "task {} has an unreadable deadline `{}`",
            self.task_id, self.value
        )
    }
}

impl Error for InvalidDate {}

#[cfg(test)]
mod tests {
    use super::{parse_deadline, Priority, TaskDraft, TaskPatch, TaskValidationError};
    use crate::model::column::ColumnId;
    use chrono::NaiveDate;

    #[test]
    fn parse_deadline_accepts_plain_dates_and_datetimes() {
        let expected = NaiveDate::from_ymd_opt(2025, 1, 10).unwrap();
        assert_eq!(parse_deadline("2025-01-10"), Some(expected));
        assert_eq!(parse_deadline("2025-01-10T23:59:00Z"), Some(expected));
        assert_eq!(parse_deadline("2025-01-10T08:00:00.000+02:00"), Some(expected));
        assert_eq!(parse_deadline(" 2025-01-10 "), Some(expected));
    }

    #[test]
    fn parse_deadline_rejects_garbage_and_impossible_dates() {
        assert_eq!(parse_deadline(""), None);
        assert_eq!(parse_deadline("tomorrow"), None);
        assert_eq!(parse_deadline("2025-1-10"), None);
        assert_eq!(parse_deadline("2025-02-30"), None);
        assert_eq!(parse_deadline("10/01/2025"), None);
    }

    #[test]
    fn draft_rejects_blank_title() {
        let draft = TaskDraft::new("   ", "2025-01-10", ColumnId::pending());
        assert_eq!(draft.validate(), Err(TaskValidationError::BlankTitle));
    }

    #[test]
    fn draft_defaults_match_new_task_form() {
        let draft = TaskDraft::new("Write report", "2025-01-10", ColumnId::pending());
        assert_eq!(draft.priority, Priority::Low);
        assert!(draft.description.is_empty());
        assert!(!draft.completed);
    }

    #[test]
    fn patch_validation_only_checks_present_fields() {
        assert!(TaskPatch::default().validate().is_ok());
        assert!(TaskPatch::default().is_empty());

        let blank = TaskPatch {
            title: Some(String::new()),
            ..TaskPatch::default()
        };
        assert_eq!(blank.validate(), Err(TaskValidationError::BlankTitle));
    }

    #[test]
    fn priority_serializes_as_snake_case() {
        let json = serde_json::to_string(&Priority::High).unwrap();
        assert_eq!(json, "\"high\"");
    }
}
