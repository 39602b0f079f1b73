//! Board domain model.
//!
//! # Responsibility
//! - Define the task, column and notification records shared by the board
//!   store, the notification generator and persistence.
//!
//! # Invariants
//! - Every task and notification is identified by a stable UUID.
//! - Column ids come from a small fixed set; see `column::ColumnId`.

pub mod column;
pub mod notification;
pub mod task;
