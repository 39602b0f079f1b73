//! Deadline reminder generation.
//!
//! # Responsibility
//! - Derive reminders from task deadlines on a fixed day-offset schedule.
//!
//! # See also
//! - `repo::notification_repo` for where generated reminders are stored.

pub mod generator;

pub use generator::{
    generate_notifications, notification_kind_for, now_epoch_ms, today_local, GenerationReport,
};
