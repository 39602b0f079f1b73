//! In-memory board store.
//!
//! # Responsibility
//! - Apply add/update/delete/move to tasks and column lists together.
//! - Convert to and from `BoardSnapshot` for persistence.
//!
//! # Invariants
//! - Every public mutation either fully applies or returns an error with the
//!   board untouched.
//! - `add_task` and a column change through `update_task` append at the end
//!   of the target column; only `move_task` places mid-list.

use super::error::{BoardError, BoardResult};
use super::summary::BoardSummary;
use crate::model::column::{default_columns, Column, ColumnId};
use crate::model::task::{Task, TaskDraft, TaskId, TaskPatch};
use chrono::NaiveDate;
use log::debug;
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

/// Plain board shape exchanged with storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardSnapshot {
    pub tasks: Vec<Task>,
    /// Columns with their ordered task ids.
    pub columns: Vec<Column>,
    pub column_order: Vec<ColumnId>,
}

impl Default for BoardSnapshot {
    /// Empty board with the `pending/processing/done` layout.
    fn default() -> Self {
        let columns = default_columns();
        let column_order = columns.iter().map(|column| column.id.clone()).collect();
        Self {
            tasks: Vec::new(),
            columns,
            column_order,
        }
    }
}

/// Owned board state.
#[derive(Debug, Clone)]
pub struct BoardStore {
    tasks: HashMap<TaskId, Task>,
    columns: HashMap<ColumnId, Column>,
    column_order: Vec<ColumnId>,
}

impl Default for BoardStore {
    fn default() -> Self {
        Self::new()
    }
}

impl BoardStore {
    /// Creates an empty board with the default column layout.
    pub fn new() -> Self {
        let snapshot = BoardSnapshot::default();
        Self {
            tasks: HashMap::new(),
            columns: snapshot
                .columns
                .into_iter()
                .map(|column| (column.id.clone(), column))
                .collect(),
            column_order: snapshot.column_order,
        }
    }

    /// Rebuilds a board from storage.
    ///
    /// # Errors
    /// - `Inconsistent` when the snapshot breaks membership invariants.
    pub fn from_snapshot(snapshot: BoardSnapshot) -> BoardResult<Self> {
        let mut columns = HashMap::with_capacity(snapshot.columns.len());
        for column in snapshot.columns {
            let id = column.id.clone();
            if columns.insert(id.clone(), column).is_some() {
                return Err(BoardError::Inconsistent(format!("duplicate column `{id}`")));
            }
        }

        let mut tasks = HashMap::with_capacity(snapshot.tasks.len());
        for task in snapshot.tasks {
            let id = task.id;
            if tasks.insert(id, task).is_some() {
                return Err(BoardError::Inconsistent(format!("duplicate task {id}")));
            }
        }

        let store = Self {
            tasks,
            columns,
            column_order: snapshot.column_order,
        };
        store.verify_invariants()?;
        Ok(store)
    }

    /// Exports the board in column order, each column's tasks in list order.
    pub fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot {
            tasks: self.tasks_ordered().into_iter().cloned().collect(),
            columns: self.columns().into_iter().cloned().collect(),
            column_order: self.column_order.clone(),
        }
    }

    /// Checks that column lists and task `column_id`s agree.
    pub fn verify_invariants(&self) -> BoardResult<()> {
        if self.column_order.len() != self.columns.len() {
            return Err(BoardError::Inconsistent(format!(
                "column order lists {} columns but board holds {}",
                self.column_order.len(),
                self.columns.len()
            )));
        }
        let mut ordered = HashSet::new();
        for id in &self.column_order {
            if !self.columns.contains_key(id) || !ordered.insert(id) {
                return Err(BoardError::Inconsistent(format!(
                    "column order entry `{id}` is unknown or repeated"
                )));
            }
        }

        let mut seen = HashSet::with_capacity(self.tasks.len());
        for column in self.columns.values() {
            for task_id in &column.task_ids {
                let task = self.tasks.get(task_id).ok_or_else(|| {
                    BoardError::Inconsistent(format!(
                        "column `{}` lists missing task {task_id}",
                        column.id
                    ))
                })?;
                if task.column_id != column.id {
                    return Err(BoardError::Inconsistent(format!(
                        "task {task_id} is listed in `{}` but belongs to `{}`",
                        column.id, task.column_id
                    )));
                }
                if !seen.insert(*task_id) {
                    return Err(BoardError::Inconsistent(format!(
                        "task {task_id} is listed more than once"
                    )));
                }
            }
        }

        if seen.len() != self.tasks.len() {
            let orphan = self
                .tasks
                .keys()
                .find(|id| !seen.contains(*id))
                .map(|id| id.to_string())
                .unwrap_or_default();
            return Err(BoardError::Inconsistent(format!(
                "task {orphan} is not listed in any column"
            )));
        }

        Ok(())
    }

    /// Creates a task and appends it to the end of its column.
    ///
    /// # Errors
    /// - `Validation` for a blank title.
    /// - `InvalidReference` when `draft.column_id` is not a board column.
    pub fn add_task(&mut self, draft: TaskDraft) -> BoardResult<TaskId> {
        draft.validate()?;
        let column = self
            .columns
            .get_mut(&draft.column_id)
            .ok_or_else(|| BoardError::InvalidReference(draft.column_id.clone()))?;

        let id = Uuid::new_v4();
        column.push_task(id);
        let task = Task::from_draft(id, draft);
        debug!(
            "event=task_add module=board status=ok task_id={} column={}",
            id, task.column_id
        );
        self.tasks.insert(id, task);
        Ok(id)
    }

    /// Merges `patch` into one task.
    ///
    /// A changed `column_id` removes the task from its old column and appends
    /// it to the end of the new one.
    ///
    /// # Errors
    /// - `NotFound` for an unknown task id.
    /// - `InvalidReference` when the patch names an unknown column.
    /// - `Validation` when the patch sets a blank title.
    pub fn update_task(&mut self, id: TaskId, patch: TaskPatch) -> BoardResult<()> {
        patch.validate()?;
        let previous_column = self
            .tasks
            .get(&id)
            .map(|task| task.column_id.clone())
            .ok_or(BoardError::NotFound(id))?;
        if let Some(target) = &patch.column_id {
            if !self.columns.contains_key(target) {
                return Err(BoardError::InvalidReference(target.clone()));
            }
        }

        let next_column = match self.tasks.get_mut(&id) {
            Some(task) => {
                task.apply_patch(patch);
                task.column_id.clone()
            }
            None => return Err(BoardError::NotFound(id)),
        };

        if next_column != previous_column {
            if let Some(column) = self.columns.get_mut(&previous_column) {
                column.remove_task(id);
            }
            if let Some(column) = self.columns.get_mut(&next_column) {
                column.push_task(id);
            }
        }

        debug!(
            "event=task_update module=board status=ok task_id={} column={}",
            id, next_column
        );
        Ok(())
    }

    /// Removes a task and its column list entry, returning the removed task.
    ///
    /// # Errors
    /// - `NotFound` for an unknown task id.
    pub fn delete_task(&mut self, id: TaskId) -> BoardResult<Task> {
        let task = self.tasks.remove(&id).ok_or(BoardError::NotFound(id))?;
        if let Some(column) = self.columns.get_mut(&task.column_id) {
            column.remove_task(id);
        }
        debug!(
            "event=task_delete module=board status=ok task_id={} column={}",
            id, task.column_id
        );
        Ok(task)
    }

    /// Drag-and-drop primitive: moves a task to `dest_index` of `dest`.
    ///
    /// `dest_index` is clamped to the destination list length (after the task
    /// has been taken out of its source). Dropping a task back on its own
    /// position leaves the board unchanged.
    ///
    /// # Errors
    /// - `NotFound` for an unknown task id.
    /// - `InvalidReference` when either column is unknown.
    /// - `SourceMismatch` when `source` does not currently hold the task.
    pub fn move_task(
        &mut self,
        task_id: TaskId,
        source: &ColumnId,
        dest: &ColumnId,
        dest_index: usize,
    ) -> BoardResult<()> {
        let actual = self
            .tasks
            .get(&task_id)
            .map(|task| task.column_id.clone())
            .ok_or(BoardError::NotFound(task_id))?;
        for column in [source, dest] {
            if !self.columns.contains_key(column) {
                return Err(BoardError::InvalidReference(column.clone()));
            }
        }
        if actual != *source {
            return Err(BoardError::SourceMismatch {
                task_id,
                claimed: source.clone(),
                actual,
            });
        }

        let source_column = self
            .columns
            .get_mut(source)
            .ok_or_else(|| BoardError::InvalidReference(source.clone()))?;
        let current_index = source_column.position_of(task_id).ok_or_else(|| {
            BoardError::Inconsistent(format!(
                "task {task_id} belongs to `{source}` but is not listed there"
            ))
        })?;

        if source == dest {
            let last_index = source_column.task_ids.len() - 1;
            if dest_index.min(last_index) == current_index {
                debug!(
                    "event=task_move module=board status=noop task_id={} column={} index={}",
                    task_id, source, current_index
                );
                return Ok(());
            }
        }

        source_column.remove_task(task_id);
        let placed_at = self
            .columns
            .get_mut(dest)
            .ok_or_else(|| BoardError::InvalidReference(dest.clone()))?
            .insert_task(task_id, dest_index);
        if let Some(task) = self.tasks.get_mut(&task_id) {
            task.column_id = dest.clone();
        }

        debug!(
            "event=task_move module=board status=ok task_id={} from={} to={} index={}",
            task_id, source, dest, placed_at
        );
        Ok(())
    }

    /// Flips `completed` and files the task accordingly.
    ///
    /// A task becoming complete goes to the end of `done`; a task becoming
    /// incomplete goes to the end of `pending`. Returns the new flag.
    pub fn toggle_completion(&mut self, id: TaskId) -> BoardResult<bool> {
        let completed = !self.task(id).ok_or(BoardError::NotFound(id))?.completed;
        let column_id = if completed {
            ColumnId::done()
        } else {
            ColumnId::pending()
        };
        self.update_task(
            id,
            TaskPatch {
                completed: Some(completed),
                column_id: Some(column_id),
                ..TaskPatch::default()
            },
        )?;
        Ok(completed)
    }

    pub fn task(&self, id: TaskId) -> Option<&Task> {
        self.tasks.get(&id)
    }

    pub fn column(&self, id: &ColumnId) -> Option<&Column> {
        self.columns.get(id)
    }

    /// Columns in display order.
    pub fn columns(&self) -> Vec<&Column> {
        self.column_order
            .iter()
            .filter_map(|id| self.columns.get(id))
            .collect()
    }

    pub fn column_order(&self) -> &[ColumnId] {
        &self.column_order
    }

    /// Tasks of one column in display order.
    pub fn tasks_in_column(&self, id: &ColumnId) -> BoardResult<Vec<&Task>> {
        let column = self
            .columns
            .get(id)
            .ok_or_else(|| BoardError::InvalidReference(id.clone()))?;
        Ok(column
            .task_ids
            .iter()
            .filter_map(|task_id| self.tasks.get(task_id))
            .collect())
    }

    /// All tasks, column by column in display order.
    pub fn tasks_ordered(&self) -> Vec<&Task> {
        self.columns()
            .into_iter()
            .flat_map(|column| column.task_ids.iter())
            .filter_map(|task_id| self.tasks.get(task_id))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Dashboard counters relative to `today`.
    pub fn summary(&self, today: NaiveDate) -> BoardSummary {
        BoardSummary::from_tasks(self.tasks.values(), today)
    }
}

#[cfg(test)]
mod tests {
    use super::{BoardSnapshot, BoardStore};
    use crate::board::BoardError;
    use crate::model::column::ColumnId;
    use crate::model::task::TaskDraft;

    fn draft(title: &str) -> TaskDraft {
        TaskDraft::new(title, "2025-01-10", ColumnId::pending())
    }

    #[test]
    fn same_column_reorder_uses_post_removal_index() {
        let mut board = BoardStore::new();
        let a = board.add_task(draft("a")).unwrap();
        let b = board.add_task(draft("b")).unwrap();
        let c = board.add_task(draft("c")).unwrap();

        board
            .move_task(a, &ColumnId::pending(), &ColumnId::pending(), 2)
            .unwrap();

        let order = &board.column(&ColumnId::pending()).unwrap().task_ids;
        assert_eq!(order, &vec![b, c, a]);
    }

    #[test]
    fn from_snapshot_rejects_orphan_tasks() {
        let mut board = BoardStore::new();
        let id = board.add_task(draft("a")).unwrap();
        let mut snapshot = board.snapshot();
        snapshot.columns[0].task_ids.clear();

        let err = BoardStore::from_snapshot(snapshot).unwrap_err();
        assert!(matches!(err, BoardError::Inconsistent(message) if message.contains(&id.to_string())));
    }

    #[test]
    fn from_snapshot_rejects_unknown_column_order_entry() {
        let mut snapshot = BoardSnapshot::default();
        snapshot.column_order[1] = ColumnId::new("review");

        let err = BoardStore::from_snapshot(snapshot).unwrap_err();
        assert!(matches!(err, BoardError::Inconsistent(_)));
    }
}
