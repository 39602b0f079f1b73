//! Notification generator.
//!
//! # Invariants
//! - Tasks in the `done` column never produce notifications.
//! - Only the offsets `< 0`, `0`, `1`, `2` and `7` days produce a
//!   notification. Offsets `3..=6` and `> 7` produce nothing, and a threshold
//!   not evaluated on the day it is crossed is not caught up later.
//! - No notification is produced for a `(task_id, kind)` pair that already
//!   exists, including one produced earlier in the same pass. The two- and
//!   seven-day reminders share the `upcoming` kind.
//! - One unreadable deadline never stops the rest of the pass.

use crate::model::notification::{NotificationKind, TaskNotification};
use crate::model::task::{InvalidDate, Task, TaskId};
use chrono::{Local, NaiveDate, Utc};
use log::{debug, warn};
use std::collections::HashSet;
use uuid::Uuid;

struct Threshold {
    kind: NotificationKind,
    title: &'static str,
    phrase: &'static str,
}

/// Output of one generator pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationReport {
    /// New notifications, in input task order.
    pub notifications: Vec<TaskNotification>,
    /// Tasks skipped because their deadline could not be parsed.
    pub invalid_dates: Vec<InvalidDate>,
}

impl GenerationReport {
    pub fn is_empty(&self) -> bool {
        self.notifications.is_empty() && self.invalid_dates.is_empty()
    }
}

/// Maps whole days until the deadline to a notification kind.
///
/// Returns `None` for offsets outside the schedule.
pub fn notification_kind_for(days_until_deadline: i64) -> Option<NotificationKind> {
    threshold_for(days_until_deadline).map(|threshold| threshold.kind)
}

fn threshold_for(days_until_deadline: i64) -> Option<Threshold> {
    let threshold = match days_until_deadline {
        days if days < 0 => Threshold {
            kind: NotificationKind::Overdue,
            title: "Overdue Task",
            phrase: "is overdue!",
        },
        0 => Threshold {
            kind: NotificationKind::Today,
            title: "Task Due Today",
            phrase: "is due today!",
        },
        1 => Threshold {
            kind: NotificationKind::Tomorrow,
            title: "Task Due Tomorrow",
            phrase: "is due tomorrow!",
        },
        2 => Threshold {
            kind: NotificationKind::Upcoming,
            title: "Upcoming Task",
            phrase: "is due in 2 days!",
        },
        7 => Threshold {
            kind: NotificationKind::Upcoming,
            title: "Upcoming Task",
            phrase: "is due in a week!",
        },
        _ => return None,
    };
    Some(threshold)
}

/// Derives the notifications warranted by `tasks` as of `today`.
///
/// `existing` is the current notification feed, used only for dedupe.
/// `now_ms` becomes `created_at` of every emitted notification.
pub fn generate_notifications<'a>(
    tasks: impl IntoIterator<Item = &'a Task>,
    existing: &[TaskNotification],
    today: NaiveDate,
    now_ms: i64,
) -> GenerationReport {
    let mut issued: HashSet<(TaskId, NotificationKind)> = existing
        .iter()
        .map(|notification| (notification.task_id, notification.kind))
        .collect();
    let mut report = GenerationReport::default();

    for task in tasks {
        if task.column_id.is_done() {
            continue;
        }

        let deadline = match task.deadline_date() {
            Ok(date) => date,
            Err(err) => {
                warn!(
                    "event=notification_generate module=notify status=skipped task_id={} error_code=invalid_date",
                    task.id
                );
                report.invalid_dates.push(err);
                continue;
            }
        };

        let days_until_deadline = (deadline - today).num_days();
        let Some(threshold) = threshold_for(days_until_deadline) else {
            continue;
        };
        if !issued.insert((task.id, threshold.kind)) {
            continue;
        }

        report.notifications.push(TaskNotification {
            id: Uuid::new_v4(),
            task_id: task.id,
            title: threshold.title.to_string(),
            message: format!("\"{}\" {}", task.title, threshold.phrase),
            kind: threshold.kind,
            deadline: task.deadline.clone(),
            read: false,
            created_at: now_ms,
        });
    }

    debug!(
        "event=notification_generate module=notify status=ok today={} emitted={} invalid_dates={}",
        today,
        report.notifications.len(),
        report.invalid_dates.len()
    );
    report
}

/// Current local calendar date.
pub fn today_local() -> NaiveDate {
    Local::now().date_naive()
}

/// Current time in Unix epoch milliseconds.
pub fn now_epoch_ms() -> i64 {
    Utc::now().timestamp_millis()
}

#[cfg(test)]
mod tests {
    use super::notification_kind_for;
    use crate::model::notification::NotificationKind;

    #[test]
    fn schedule_covers_exactly_the_tracked_offsets() {
        assert_eq!(notification_kind_for(-30), Some(NotificationKind::Overdue));
        assert_eq!(notification_kind_for(-1), Some(NotificationKind::Overdue));
        assert_eq!(notification_kind_for(0), Some(NotificationKind::Today));
        assert_eq!(notification_kind_for(1), Some(NotificationKind::Tomorrow));
        assert_eq!(notification_kind_for(2), Some(NotificationKind::Upcoming));
        assert_eq!(notification_kind_for(7), Some(NotificationKind::Upcoming));
        for gap in [3, 4, 5, 6, 8, 14, 365] {
            assert_eq!(notification_kind_for(gap), None, "offset {gap}");
        }
    }
}
