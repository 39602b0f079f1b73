//! Notification store contract with SQLite and in-memory implementations.
//!
//! # Responsibility
//! - Append generated notifications and serve the feed newest first.
//! - Track the read flag and explicit dismissal.
//!
//! # Invariants
//! - `list` returns the most recently appended notification first.
//! - Stores never drop notifications on their own; only `remove` does.

use crate::model::notification::{NotificationId, NotificationKind, TaskNotification};
use crate::repo::board_repo::{bool_to_int, ensure_connection_ready, RepoError, RepoResult};
use rusqlite::{params, Connection, Row};
use std::cell::RefCell;
use uuid::Uuid;

/// Storage contract for the notification feed.
pub trait NotificationRepository {
    fn append(&self, notification: &TaskNotification) -> RepoResult<()>;
    /// Whole feed, newest first.
    fn list(&self) -> RepoResult<Vec<TaskNotification>>;
    /// # Errors
    /// - `NotFound` for an unknown id.
    fn mark_read(&self, id: NotificationId) -> RepoResult<()>;
    /// Returns how many notifications changed from unread to read.
    fn mark_all_read(&self) -> RepoResult<usize>;
    /// # Errors
    /// - `NotFound` for an unknown id.
    fn remove(&self, id: NotificationId) -> RepoResult<()>;

    fn unread_count(&self) -> RepoResult<usize> {
        Ok(self.list()?.iter().filter(|item| !item.read).count())
    }
}

/// SQLite-backed notification store.
pub struct SqliteNotificationRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteNotificationRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl NotificationRepository for SqliteNotificationRepository<'_> {
    fn append(&self, notification: &TaskNotification) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO task_notifications (
                uuid,
                task_uuid,
                title,
                message,
                type,
                deadline,
                is_read,
                created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8);",
            params![
                notification.id.to_string(),
                notification.task_id.to_string(),
                notification.title.as_str(),
                notification.message.as_str(),
                kind_to_db(notification.kind),
                notification.deadline.as_str(),
                bool_to_int(notification.read),
                notification.created_at,
            ],
        )?;
        Ok(())
    }

    fn list(&self) -> RepoResult<Vec<TaskNotification>> {
        let mut stmt = self.conn.prepare(
            "SELECT uuid, task_uuid, title, message, type, deadline, is_read, created_at
             FROM task_notifications
             ORDER BY seq DESC;",
        )?;
        let mut rows = stmt.query([])?;
        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            items.push(parse_notification_row(row)?);
        }
        Ok(items)
    }

    fn mark_read(&self, id: NotificationId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE task_notifications SET is_read = 1 WHERE uuid = ?1;",
            [id.to_string()],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }
        Ok(())
    }

    fn mark_all_read(&self) -> RepoResult<usize> {
        Ok(self.conn.execute(
            "UPDATE task_notifications SET is_read = 1 WHERE is_read = 0;",
            [],
        )?)
    }

    fn remove(&self, id: NotificationId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "DELETE FROM task_notifications WHERE uuid = ?1;",
            [id.to_string()],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }
        Ok(())
    }

    fn unread_count(&self) -> RepoResult<usize> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM task_notifications WHERE is_read = 0;",
            [],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }
}

/// Session-local notification store with no durable backing.
#[derive(Debug, Default)]
pub struct InMemoryNotificationStore {
    // Oldest first; `list` reverses.
    items: RefCell<Vec<TaskNotification>>,
}

impl InMemoryNotificationStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl NotificationRepository for InMemoryNotificationStore {
    fn append(&self, notification: &TaskNotification) -> RepoResult<()> {
        self.items.borrow_mut().push(notification.clone());
        Ok(())
    }

    fn list(&self) -> RepoResult<Vec<TaskNotification>> {
        Ok(self.items.borrow().iter().rev().cloned().collect())
    }

    fn mark_read(&self, id: NotificationId) -> RepoResult<()> {
        let mut items = self.items.borrow_mut();
        let item = items
            .iter_mut()
            .find(|item| item.id == id)
            .ok_or(RepoError::NotFound(id))?;
        item.read = true;
        Ok(())
    }

    fn mark_all_read(&self) -> RepoResult<usize> {
        let mut changed = 0;
        for item in self.items.borrow_mut().iter_mut().filter(|item| !item.read) {
            item.read = true;
            changed += 1;
        }
        Ok(changed)
    }

    fn remove(&self, id: NotificationId) -> RepoResult<()> {
        let mut items = self.items.borrow_mut();
        let before = items.len();
        items.retain(|item| item.id != id);
        if items.len() == before {
            return Err(RepoError::NotFound(id));
        }
        Ok(())
    }
}

fn parse_notification_row(row: &Row<'_>) -> RepoResult<TaskNotification> {
    let id = parse_uuid(row.get("uuid")?, "task_notifications.uuid")?;
    let task_id = parse_uuid(row.get("task_uuid")?, "task_notifications.task_uuid")?;

    let kind_text: String = row.get("type")?;
    let kind = parse_kind(&kind_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid notification type `{kind_text}` in task_notifications.type"
        ))
    })?;

    let read = match row.get::<_, i64>("is_read")? {
        0 => false,
        1 => true,
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid is_read value `{other}` in task_notifications.is_read"
            )));
        }
    };

    Ok(TaskNotification {
        id,
        task_id,
        title: row.get("title")?,
        message: row.get("message")?,
        kind,
        deadline: row.get("deadline")?,
        read,
        created_at: row.get("created_at")?,
    })
}

fn parse_uuid(value: String, column: &'static str) -> RepoResult<Uuid> {
    Uuid::parse_str(&value)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid `{value}` in {column}")))
}

fn kind_to_db(kind: NotificationKind) -> &'static str {
    match kind {
        NotificationKind::Today => "today",
        NotificationKind::Tomorrow => "tomorrow",
        NotificationKind::Upcoming => "upcoming",
        NotificationKind::Overdue => "overdue",
    }
}

fn parse_kind(value: &str) -> Option<NotificationKind> {
    match value {
        "today" => Some(NotificationKind::Today),
        "tomorrow" => Some(NotificationKind::Tomorrow),
        "upcoming" => Some(NotificationKind::Upcoming),
        "overdue" => Some(NotificationKind::Overdue),
        _ => None,
    }
}
