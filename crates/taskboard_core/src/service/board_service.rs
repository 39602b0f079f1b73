//! Board use-case service.
//!
//! # Responsibility
//! - Load the board once per session and fall back to an empty default
//!   board when storage is unavailable or holds an inconsistent board.
//! - Apply mutations to the in-memory board, then persist best-effort.
//!
//! # Invariants
//! - The in-memory board is the source of truth for the session; a failed
//!   save never rolls back or fails the mutation that preceded it.
//! - A failed save marks the service dirty until a later save succeeds.
//! - After a load failure the service never saves on its own; stored data
//!   is only replaced through an explicit `flush`.

use crate::board::{BoardResult, BoardStore, BoardSummary};
use crate::model::column::ColumnId;
use crate::model::task::{Task, TaskDraft, TaskId, TaskPatch};
use crate::repo::board_repo::{BoardRepository, RepoResult};
use chrono::NaiveDate;
use log::{error, info, warn};
use std::time::Instant;

/// Board facade bound to one storage collaborator.
pub struct BoardService<R: BoardRepository> {
    repo: R,
    board: BoardStore,
    restored: bool,
    autosave: bool,
    dirty: bool,
}

impl<R: BoardRepository> BoardService<R> {
    /// Loads the stored board, or starts from the default board on failure.
    ///
    /// A fallback board is kept in memory only until `flush` succeeds, so an
    /// unreadable board is never overwritten by mutations alone.
    pub fn open(repo: R) -> Self {
        let started_at = Instant::now();
        let loaded = repo
            .load_board()
            .map_err(|err| err.to_string())
            .and_then(|snapshot| BoardStore::from_snapshot(snapshot).map_err(|err| err.to_string()));

        let (board, restored) = match loaded {
            Ok(board) => {
                info!(
                    "event=board_load module=service status=ok tasks={} duration_ms={}",
                    board.len(),
                    started_at.elapsed().as_millis()
                );
                (board, true)
            }
            Err(err) => {
                warn!(
                    "event=board_load module=service status=fallback duration_ms={} error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                (BoardStore::new(), false)
            }
        };

        Self {
            repo,
            board,
            restored,
            autosave: restored,
            dirty: false,
        }
    }

    /// Read access to the current board.
    pub fn board(&self) -> &BoardStore {
        &self.board
    }

    /// Whether the session started from stored data rather than the default.
    pub fn restored(&self) -> bool {
        self.restored
    }

    /// Whether the latest save attempt failed.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn add_task(&mut self, draft: TaskDraft) -> BoardResult<TaskId> {
        let id = self.board.add_task(draft)?;
        self.persist("task_add");
        Ok(id)
    }

    /// An empty patch is checked for the task's existence but not saved.
    pub fn update_task(&mut self, id: TaskId, patch: TaskPatch) -> BoardResult<()> {
        let changes = !patch.is_empty();
        self.board.update_task(id, patch)?;
        if changes {
            self.persist("task_update");
        }
        Ok(())
    }

    pub fn delete_task(&mut self, id: TaskId) -> BoardResult<Task> {
        let task = self.board.delete_task(id)?;
        self.persist("task_delete");
        Ok(task)
    }

    pub fn move_task(
        &mut self,
        task_id: TaskId,
        source: &ColumnId,
        dest: &ColumnId,
        dest_index: usize,
    ) -> BoardResult<()> {
        self.board.move_task(task_id, source, dest, dest_index)?;
        self.persist("task_move");
        Ok(())
    }

    pub fn toggle_completion(&mut self, id: TaskId) -> BoardResult<bool> {
        let completed = self.board.toggle_completion(id)?;
        self.persist("task_toggle");
        Ok(completed)
    }

    pub fn summary(&self, today: NaiveDate) -> BoardSummary {
        self.board.summary(today)
    }

    /// Saves the current board and reports the storage result to the caller.
    ///
    /// On a fallback board this replaces whatever storage holds; later
    /// mutations save automatically again.
    pub fn flush(&mut self) -> RepoResult<()> {
        let result = self.repo.save_board(&self.board.snapshot());
        self.dirty = result.is_err();
        if result.is_ok() {
            self.autosave = true;
        }
        result
    }

    fn persist(&mut self, operation: &'static str) {
        if !self.autosave {
            self.dirty = true;
            warn!(
                "event=board_save module=service status=skipped operation={} reason=fallback_board",
                operation
            );
            return;
        }
        if let Err(err) = self.flush() {
            error!(
                "event=board_save module=service status=error operation={} error={}",
                operation, err
            );
        }
    }
}
