//! Kanban board state.
//!
//! # Responsibility
//! - Own the task collection, the column collection and the column order.
//! - Keep column membership and `Task::column_id` in agreement across every
//!   mutation.
//!
//! # Invariants
//! - Every task id appears in exactly one column list, and that column's id
//!   equals the task's `column_id`.
//! - Any task may move to any column; there are no transition guards.

mod error;
mod store;
mod summary;

pub use error::{BoardError, BoardResult};
pub use store::{BoardSnapshot, BoardStore};
pub use summary::BoardSummary;
