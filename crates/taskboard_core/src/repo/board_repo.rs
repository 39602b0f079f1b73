//! Board repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Load and save whole-board snapshots (columns, column order, tasks).
//!
//! # Invariants
//! - Column order is persisted as `board_columns.position`.
//! - Task order within a column is persisted as `board_tasks.sort_order`.
//! - `save_board` is atomic: a failed save leaves the previous board intact.
//! - Loaded snapshots are rebuilt in `position` / `sort_order` order, so the
//!   same snapshot saved twice loads identically.

use crate::board::BoardSnapshot;
use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::column::{Column, ColumnId};
use crate::model::task::{Priority, Task, TaskId};
use rusqlite::{params, Connection, Row, Transaction, TransactionBehavior};
use std::collections::{HashMap, HashSet};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for board and notification persistence.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    /// Target row does not exist.
    NotFound(Uuid),
    /// Connection schema is not at the version this build expects.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// Persisted (or about-to-be persisted) data is not a valid board.
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "record not found: {id}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::InvalidData(message) => write!(f, "invalid board data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Durable storage for the board.
pub trait BoardRepository {
    /// Loads the stored board. A fresh database yields the default layout.
    fn load_board(&self) -> RepoResult<BoardSnapshot>;
    /// Replaces the stored board with `snapshot`.
    fn save_board(&self, snapshot: &BoardSnapshot) -> RepoResult<()>;
}

/// SQLite-backed board repository.
pub struct SqliteBoardRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteBoardRepository<'conn> {
    /// Creates a repository over a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl BoardRepository for SqliteBoardRepository<'_> {
    fn load_board(&self) -> RepoResult<BoardSnapshot> {
        let mut columns = Vec::new();
        let mut stmt = self.conn.prepare(
            "SELECT column_id, title
             FROM board_columns
             ORDER BY position ASC, column_id ASC;",
        )?;
        let mut rows = stmt.query([])?;
        while let Some(row) = rows.next()? {
            let id: String = row.get("column_id")?;
            columns.push(Column::new(ColumnId::new(id), row.get::<_, String>("title")?));
        }
        let column_order: Vec<ColumnId> = columns.iter().map(|column| column.id.clone()).collect();
        let positions: HashMap<ColumnId, usize> = column_order
            .iter()
            .cloned()
            .enumerate()
            .map(|(index, id)| (id, index))
            .collect();

        let mut tasks = Vec::new();
        let mut stmt = self.conn.prepare(
            "SELECT uuid, title, description, priority, deadline, completed, column_id
             FROM board_tasks
             ORDER BY column_id ASC, sort_order ASC, uuid ASC;",
        )?;
        let mut rows = stmt.query([])?;
        while let Some(row) = rows.next()? {
            let task = parse_task_row(row)?;
            let index = positions.get(&task.column_id).copied().ok_or_else(|| {
                RepoError::InvalidData(format!(
                    "task {} references unknown column `{}`",
                    task.id, task.column_id
                ))
            })?;
            columns[index].task_ids.push(task.id);
            tasks.push(task);
        }

        Ok(BoardSnapshot {
            tasks,
            columns,
            column_order,
        })
    }

    fn save_board(&self, snapshot: &BoardSnapshot) -> RepoResult<()> {
        let sort_orders = task_sort_orders(snapshot)?;

        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;

        let keep_tasks: HashSet<String> =
            snapshot.tasks.iter().map(|task| task.id.to_string()).collect();
        for stale in list_text_column(&tx, "SELECT uuid FROM board_tasks;")? {
            if !keep_tasks.contains(&stale) {
                tx.execute("DELETE FROM board_tasks WHERE uuid = ?1;", [stale])?;
            }
        }

        for (position, column) in ordered_columns(snapshot).into_iter().enumerate() {
            tx.execute(
                "INSERT INTO board_columns (column_id, title, position)
                 VALUES (?1, ?2, ?3)
                 ON CONFLICT (column_id) DO UPDATE SET
                    title = excluded.title,
                    position = excluded.position;",
                params![column.id.as_str(), column.title.as_str(), position as i64],
            )?;
        }

        for task in &snapshot.tasks {
            tx.execute(
                "INSERT INTO board_tasks (
                    uuid,
                    title,
                    description,
                    priority,
                    deadline,
                    completed,
                    column_id,
                    sort_order
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                ON CONFLICT (uuid) DO UPDATE SET
                    title = excluded.title,
                    description = excluded.description,
                    priority = excluded.priority,
                    deadline = excluded.deadline,
                    completed = excluded.completed,
                    column_id = excluded.column_id,
                    sort_order = excluded.sort_order,
                    updated_at = (strftime('%s', 'now') * 1000);",
                params![
                    task.id.to_string(),
                    task.title.as_str(),
                    task.description.as_str(),
                    priority_to_db(task.priority),
                    task.deadline.as_str(),
                    bool_to_int(task.completed),
                    task.column_id.as_str(),
                    sort_orders.get(&task.id).copied().unwrap_or_default(),
                ],
            )?;
        }

        let keep_columns: HashSet<&str> =
            snapshot.columns.iter().map(|column| column.id.as_str()).collect();
        for stale in list_text_column(&tx, "SELECT column_id FROM board_columns;")? {
            if !keep_columns.contains(stale.as_str()) {
                tx.execute("DELETE FROM board_columns WHERE column_id = ?1;", [stale])?;
            }
        }

        tx.commit()?;
        Ok(())
    }
}

/// Columns in `column_order`, then any column the order does not mention.
fn ordered_columns(snapshot: &BoardSnapshot) -> Vec<&Column> {
    let mut ordered: Vec<&Column> = snapshot
        .column_order
        .iter()
        .filter_map(|id| snapshot.columns.iter().find(|column| column.id == *id))
        .collect();
    for column in &snapshot.columns {
        if !snapshot.column_order.contains(&column.id) {
            ordered.push(column);
        }
    }
    ordered
}

/// Resolves each task's index in its column, rejecting unlisted tasks.
fn task_sort_orders(snapshot: &BoardSnapshot) -> RepoResult<HashMap<TaskId, i64>> {
    let mut orders = HashMap::with_capacity(snapshot.tasks.len());
    for task in &snapshot.tasks {
        let index = snapshot
            .columns
            .iter()
            .find(|column| column.id == task.column_id)
            .and_then(|column| column.position_of(task.id))
            .ok_or_else(|| {
                RepoError::InvalidData(format!(
                    "task {} is not listed in column `{}`",
                    task.id, task.column_id
                ))
            })?;
        orders.insert(task.id, index as i64);
    }
    Ok(orders)
}

fn list_text_column(conn: &Connection, sql: &str) -> RepoResult<Vec<String>> {
    let mut stmt = conn.prepare(sql)?;
    let mut rows = stmt.query([])?;
    let mut values = Vec::new();
    while let Some(row) = rows.next()? {
        values.push(row.get(0)?);
    }
    Ok(values)
}

fn parse_task_row(row: &Row<'_>) -> RepoResult<Task> {
    let uuid_text: String = row.get("uuid")?;
    let id = Uuid::parse_str(&uuid_text).map_err(|_| {
        RepoError::InvalidData(format!("invalid uuid `{uuid_text}` in board_tasks.uuid"))
    })?;

    let priority_text: String = row.get("priority")?;
    let priority = parse_priority(&priority_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid priority `{priority_text}` in board_tasks.priority"
        ))
    })?;

    let completed = match row.get::<_, i64>("completed")? {
        0 => false,
        1 => true,
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid completed value `{other}` in board_tasks.completed"
            )));
        }
    };

    Ok(Task {
        id,
        title: row.get("title")?,
        description: row.get("description")?,
        priority,
        deadline: row.get("deadline")?,
        completed,
        column_id: ColumnId::new(row.get::<_, String>("column_id")?),
    })
}

fn priority_to_db(priority: Priority) -> &'static str {
    match priority {
        Priority::Low => "low",
        Priority::Medium => "medium",
        Priority::High => "high",
    }
}

fn parse_priority(value: &str) -> Option<Priority> {
    match value {
        "low" => Some(Priority::Low),
        "medium" => Some(Priority::Medium),
        "high" => Some(Priority::High),
        _ => None,
    }
}

pub(crate) fn bool_to_int(value: bool) -> i64 {
    i64::from(value)
}

pub(crate) fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }
    Ok(())
}
