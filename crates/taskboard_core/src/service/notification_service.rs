//! Notification use-case service.
//!
//! # Responsibility
//! - Run the generator against the stored feed and append what it emits.
//! - Expose read/acknowledge operations for the notification bell.
//!
//! # Invariants
//! - `refresh` reads the feed before generating, so stored `(task, kind)`
//!   pairs are never emitted twice.
//! - Within one refresh the feed keeps input task order.
//! - The service never schedules itself; hosts call `refresh` after loading
//!   the board and after each board mutation.

use crate::model::notification::{NotificationId, TaskNotification};
use crate::model::task::Task;
use crate::notify::{generate_notifications, now_epoch_ms, today_local, GenerationReport};
use crate::repo::board_repo::RepoResult;
use crate::repo::notification_repo::NotificationRepository;
use chrono::NaiveDate;
use log::info;

/// Notification facade bound to one notification store.
pub struct NotificationService<N: NotificationRepository> {
    repo: N,
}

impl<N: NotificationRepository> NotificationService<N> {
    pub fn new(repo: N) -> Self {
        Self { repo }
    }

    /// Generates and stores notifications for `tasks` as of `today`.
    ///
    /// Unreadable deadlines are reported in the returned report, not as an
    /// error. Storage failures abort the refresh; notifications appended
    /// before the failure stay stored.
    pub fn refresh<'a>(
        &self,
        tasks: impl IntoIterator<Item = &'a Task>,
        today: NaiveDate,
        now_ms: i64,
    ) -> RepoResult<GenerationReport> {
        let existing = self.repo.list()?;
        let report = generate_notifications(tasks, &existing, today, now_ms);
        // The feed lists newest first; reversed appends keep one batch in
        // task order.
        for notification in report.notifications.iter().rev() {
            self.repo.append(notification)?;
        }
        if !report.is_empty() {
            info!(
                "event=notification_refresh module=service status=ok appended={} invalid_dates={}",
                report.notifications.len(),
                report.invalid_dates.len()
            );
        }
        Ok(report)
    }

    /// `refresh` against the local calendar date and wall clock.
    pub fn refresh_now<'a>(
        &self,
        tasks: impl IntoIterator<Item = &'a Task>,
    ) -> RepoResult<GenerationReport> {
        self.refresh(tasks, today_local(), now_epoch_ms())
    }

    pub fn list(&self) -> RepoResult<Vec<TaskNotification>> {
        self.repo.list()
    }

    pub fn unread_count(&self) -> RepoResult<usize> {
        self.repo.unread_count()
    }

    pub fn mark_read(&self, id: NotificationId) -> RepoResult<()> {
        self.repo.mark_read(id)
    }

    pub fn mark_all_read(&self) -> RepoResult<usize> {
        self.repo.mark_all_read()
    }

    pub fn remove(&self, id: NotificationId) -> RepoResult<()> {
        self.repo.remove(id)
    }
}
