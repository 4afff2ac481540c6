//! Per-buffer editing surface.
//!
//! [`Buffer`] couples one [`TextStore`] with its own [`History`] instance:
//! `insert`/`remove` record an invertible entry before mutating, and
//! `undo`/`redo` replay inverse edits without generating new entries.
//! Session-level code uses the untracked mutation path instead, recording
//! into the shared cross-document log.

use crate::document::DocumentId;
use crate::error::Result;
use crate::history::{ActionKind, History};
use crate::store::TextStore;

/// One document's content plus its local edit history.
#[derive(Debug)]
pub struct Buffer {
    store: TextStore,
    history: History,
}

impl Buffer {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self::from_text("")
    }

    /// Create a buffer holding `text`.
    pub fn from_text(text: &str) -> Self {
        Self {
            store: TextStore::from_text(text),
            history: History::new(),
        }
    }

    /// Cap the local history at `limit` entries per stack.
    pub fn set_history_limit(&mut self, limit: usize) {
        self.history = History::with_limit(limit);
    }

    /// Read access to the underlying store.
    pub const fn store(&self) -> &TextStore {
        &self.store
    }

    // --- Recorded mutation ---

    /// Insert `text` at `pos`, recording the edit.
    ///
    /// `cursor_before` is the caller's cursor at the time of the edit and is
    /// what [`Buffer::undo`] hands back. No-op past the end of the content.
    pub fn insert(&mut self, pos: usize, text: &str, cursor_before: usize) -> bool {
        if pos > self.store.len() || text.is_empty() {
            return false;
        }
        let pos = self.store.floor_char_boundary(pos);
        self.history.record_text_insert(
            DocumentId::UNSET,
            None,
            pos,
            text,
            cursor_before,
            pos + text.len(),
        );
        self.store.insert(pos, text)
    }

    /// Remove `len` bytes at `pos`, recording the exact removed content.
    ///
    /// `len` is clamped to the remaining content; no-op at or past the end.
    pub fn remove(&mut self, pos: usize, len: usize, cursor_before: usize) -> bool {
        if pos >= self.store.len() || len == 0 {
            return false;
        }
        let start = self.store.floor_char_boundary(pos);
        let end = self
            .store
            .floor_char_boundary(pos.saturating_add(len).min(self.store.len()));
        if start >= end {
            return false;
        }
        let removed = self.store.slice(start, end);
        self.history
            .record_text_delete(DocumentId::UNSET, None, start, &removed, cursor_before, start);
        self.store.remove(start, removed.len())
    }

    // --- Undo/redo ---

    /// Undo the most recent edit, returning the cursor position from before
    /// it. `None` when there is nothing to undo.
    pub fn undo(&mut self) -> Option<usize> {
        let action = self.history.undo()?;
        match action.kind {
            ActionKind::TextInsert => {
                self.store.remove(action.pos, action.text.len());
            }
            ActionKind::TextDelete => {
                self.store.insert(action.pos, &action.text);
            }
            // Buffer-local history only ever holds text entries.
            _ => {}
        }
        Some(action.cursor_before)
    }

    /// Re-apply the most recently undone edit, returning the cursor position
    /// from after it. `None` when there is nothing to redo.
    pub fn redo(&mut self) -> Option<usize> {
        let action = self.history.redo()?;
        match action.kind {
            ActionKind::TextInsert => {
                self.store.insert(action.pos, &action.text);
            }
            ActionKind::TextDelete => {
                self.store.remove(action.pos, action.text.len());
            }
            _ => {}
        }
        Some(action.cursor_after)
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Drop all local history.
    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    // --- Untracked mutation ---

    /// Insert without recording. Used by session-level replay, which keeps
    /// its own log.
    pub fn insert_untracked(&mut self, pos: usize, text: &str) -> bool {
        self.store.insert(pos, text)
    }

    /// Remove without recording.
    pub fn remove_untracked(&mut self, pos: usize, len: usize) -> bool {
        self.store.remove(pos, len)
    }

    // --- Whole-content operations ---

    /// Replace the whole content and drop the local history (recorded
    /// positions would dangle into unrelated content).
    pub fn load(&mut self, text: &str) {
        self.store.load(text);
        self.history.clear();
    }

    /// Replace the whole content from raw bytes.
    ///
    /// # Errors
    /// Invalid UTF-8 leaves both content and history unchanged.
    pub fn load_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.store.load_bytes(bytes)?;
        self.history.clear();
        Ok(())
    }

    /// Export the whole content.
    pub fn text(&self) -> String {
        self.store.text()
    }

    // --- Passthrough accessors ---

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn line_count(&self) -> usize {
        self.store.line_count()
    }

    pub const fn version(&self) -> u64 {
        self.store.version()
    }

    pub const fn is_modified(&self) -> bool {
        self.store.is_modified()
    }

    /// Clear the modified flag after a successful save.
    pub const fn mark_clean(&mut self) {
        self.store.mark_clean();
    }
}

impl Default for Buffer {
    fn default() -> Self {
        Self::new()
    }
}
