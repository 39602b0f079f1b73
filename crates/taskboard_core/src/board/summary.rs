use crate::model::column::ColumnId;
use crate::model::task::{Priority, Task};
use chrono::NaiveDate;

/// Board-level counters for the task board header and sidebar badge.
#[derive(Debug, Clone, PartialEq)]
pub struct BoardSummary {
    pub total: usize,
    /// Tasks in the `done` column.
    pub completed: usize,
    /// `completed / total * 100`, or `0.0` for an empty board.
    pub completion_rate: f64,
    /// High priority tasks outside `done`.
    pub urgent: usize,
    /// Tasks in the `processing` column.
    pub in_progress: usize,
    /// Any high priority `pending` task whose deadline is `today`.
    pub has_important_due_today: bool,
}

impl BoardSummary {
    pub(crate) fn from_tasks<'a>(tasks: impl Iterator<Item = &'a Task>, today: NaiveDate) -> Self {
        let mut summary = Self {
            total: 0,
            completed: 0,
            completion_rate: 0.0,
            urgent: 0,
            in_progress: 0,
            has_important_due_today: false,
        };

        for task in tasks {
            summary.total += 1;
            let done = task.column_id.is_done();
            if done {
                summary.completed += 1;
            }
            if task.priority == Priority::High && !done {
                summary.urgent += 1;
            }
            if task.column_id.as_str() == ColumnId::PROCESSING {
                summary.in_progress += 1;
            }
            if task.column_id.as_str() == ColumnId::PENDING
                && task.priority == Priority::High
                && task.deadline_date().ok() == Some(today)
            {
                summary.has_important_due_today = true;
            }
        }

        if summary.total > 0 {
            summary.completion_rate = summary.completed as f64 / summary.total as f64 * 100.0;
        }
        summary
    }
}
