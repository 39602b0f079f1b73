use crate::model::column::ColumnId;
use crate::model::task::{TaskId, TaskValidationError};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type BoardResult<T> = Result<T, BoardError>;

/// Board store operation failure. State is unchanged whenever one is returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardError {
    /// Referenced task does not exist.
    NotFound(TaskId),
    /// Referenced column does not exist on this board.
    InvalidReference(ColumnId),
    /// A move named a source column that does not hold the task.
    SourceMismatch {
        task_id: TaskId,
        claimed: ColumnId,
        actual: ColumnId,
    },
    /// Task fields failed validation.
    Validation(TaskValidationError),
    /// A snapshot breaks the membership invariants.
    Inconsistent(String),
}

impl Display for BoardError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(id) => write!(f, "task not found: {id}"),
            Self::InvalidReference(column) => write!(f, "column not found: {column}"),
            Self::SourceMismatch {
                task_id,
                claimed,
                actual,
            } => write!(
                f,
                "task {task_id} is in column `{actual}`, not `{claimed}`"
            ),
            Self::Validation(err) => write!(f, "{err}"),
            Self::Inconsistent(details) => write!(f, "inconsistent board state: {details}"),
        }
    }
}

impl Error for BoardError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            _ => None,
        }
    }
}

impl From<TaskValidationError> for BoardError {
    fn from(value: TaskValidationError) -> Self {
        Self::Validation(value)
    }
}
