//! Session-scoped editing surface.
//!
//! [`Session`] ties a [`Workspace`] to one shared [`History`], the
//! cross-document edit log, and drives both sides of it: edits and file
//! actions record here as they happen, and undo/redo dispatches each popped
//! entry back to its target. Text entries re-target their document by id,
//! re-opening it by path when it has been closed; file entries replay
//! through the state-guarded arms in [`crate::fsops`]. An entry whose
//! target cannot be reached is skipped and processing advances to the next
//! one; undo never fails the session.

use std::path::{Path, PathBuf};

use tracing::warn;

use crate::config::EditorConfig;
use crate::document::{Document, DocumentId};
use crate::error::Result;
use crate::fsops;
use crate::history::{Action, ActionKind, History};
use crate::nav::Caret;
use crate::workspace::Workspace;

/// A whole editing session: open documents plus the shared undo history.
#[derive(Debug, Default)]
pub struct Session {
    workspace: Workspace,
    history: History,
}

impl Session {
    pub fn new() -> Self {
        Self {
            workspace: Workspace::new(),
            history: History::new(),
        }
    }

    /// Create a session honoring the configured history depth.
    pub fn with_config(config: &EditorConfig) -> Self {
        Self {
            workspace: Workspace::new(),
            history: History::with_limit(config.history_limit),
        }
    }

    pub const fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub const fn workspace_mut(&mut self) -> &mut Workspace {
        &mut self.workspace
    }

    /// Read access to the shared history. Mutation goes through the session
    /// so that recording and side effects stay paired.
    pub const fn history(&self) -> &History {
        &self.history
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Drop the whole session history.
    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// Drop text entries for one document (used when abandoning a document
    /// that has no path to re-open it by).
    pub fn clear_for_document(&mut self, id: DocumentId) {
        self.history.clear_for_document(id);
    }

    // --- Session-level text edits ---

    /// Insert `text` into document `id`, recording into the session log.
    ///
    /// The document's own local log is bypassed; the session history is the
    /// authority for edits made through it. Returns `false` (recording
    /// nothing) for unknown documents and out-of-range positions.
    pub fn insert(&mut self, id: DocumentId, pos: usize, text: &str) -> bool {
        let Some(doc) = self.workspace.get_mut(id) else {
            return false;
        };
        let store = doc.buffer().store();
        if pos > store.len() || text.is_empty() {
            return false;
        }
        let pos = store.floor_char_boundary(pos);
        let cursor_before = doc.caret().cursor;
        let path = doc.path().map(Path::to_path_buf);
        self.history.record_text_insert(
            id,
            path.as_deref(),
            pos,
            text,
            cursor_before,
            pos + text.len(),
        );
        doc.buffer_mut().insert_untracked(pos, text);
        doc.set_caret(Caret::at(pos + text.len()));
        true
    }

    /// Remove `len` bytes from document `id`, recording the exact removed
    /// content into the session log.
    pub fn remove(&mut self, id: DocumentId, pos: usize, len: usize) -> bool {
        let Some(doc) = self.workspace.get_mut(id) else {
            return false;
        };
        let store = doc.buffer().store();
        if pos >= store.len() || len == 0 {
            return false;
        }
        let start = store.floor_char_boundary(pos);
        let end = store.floor_char_boundary(pos.saturating_add(len).min(store.len()));
        if start >= end {
            return false;
        }
        let removed = store.slice(start, end);
        let cursor_before = doc.caret().cursor;
        let path = doc.path().map(Path::to_path_buf);
        self.history
            .record_text_delete(id, path.as_deref(), start, &removed, cursor_before, start);
        doc.buffer_mut().remove_untracked(start, removed.len());
        doc.set_caret(Caret::at(start));
        true
    }

    // --- File and folder actions ---

    /// Create an empty file and record it.
    ///
    /// # Errors
    /// Propagates [`crate::fsops::create_file`] failures; nothing is
    /// recorded on failure.
    pub fn create_file(&mut self, path: &Path) -> Result<()> {
        fsops::create_file(path)?;
        self.history.record_file_create(path);
        Ok(())
    }

    /// Delete a file, closing any document that has it open and keeping a
    /// content snapshot in the history for undo.
    ///
    /// # Errors
    /// Propagates the deletion failure; nothing is recorded on failure.
    pub fn delete_file(&mut self, path: &Path) -> Result<()> {
        if let Some(id) = self.workspace.find_by_path(path).map(Document::id) {
            self.workspace.close(id);
        }
        let snapshot = fsops::delete_file(path)?;
        self.history
            .record_file_delete(path, (!snapshot.is_empty()).then_some(snapshot));
        Ok(())
    }

    /// Rename a file and record it.
    ///
    /// # Errors
    /// Propagates the rename failure; nothing is recorded on failure.
    pub fn rename_file(&mut self, old_path: &Path, new_path: &Path) -> Result<()> {
        fsops::rename_file(old_path, new_path)?;
        self.history.record_file_rename(old_path, new_path);
        Ok(())
    }

    /// Duplicate a file under a derived `_copyN` name, recording the copy
    /// as a file creation. Returns the new path.
    ///
    /// # Errors
    /// Propagates read/write failures; nothing is recorded on failure.
    pub fn duplicate_file(&mut self, path: &Path) -> Result<PathBuf> {
        let copy = fsops::duplicate_file(path)?;
        self.history.record_file_create(&copy);
        Ok(copy)
    }

    /// Create a folder and record it.
    ///
    /// # Errors
    /// Propagates the creation failure; nothing is recorded on failure.
    pub fn create_folder(&mut self, path: &Path) -> Result<()> {
        fsops::create_folder(path)?;
        self.history.record_folder_create(path);
        Ok(())
    }

    /// Delete an empty folder and record it.
    ///
    /// # Errors
    /// Propagates the deletion failure; nothing is recorded on failure.
    pub fn delete_folder(&mut self, path: &Path) -> Result<()> {
        fsops::delete_folder(path)?;
        self.history.record_folder_delete(path);
        Ok(())
    }

    /// Rename a folder and record it.
    ///
    /// # Errors
    /// Propagates the rename failure; nothing is recorded on failure.
    pub fn rename_folder(&mut self, old_path: &Path, new_path: &Path) -> Result<()> {
        fsops::rename_folder(old_path, new_path)?;
        self.history.record_folder_rename(old_path, new_path);
        Ok(())
    }

    // --- Undo/redo dispatch ---

    /// Undo the most recent reachable action, returning the entry that was
    /// applied.
    ///
    /// Unreachable entries (document closed and its file gone, or on-disk
    /// state no longer matching a file entry) are skipped, and processing
    /// advances to the next entry. `None` once the history is exhausted.
    pub fn undo(&mut self) -> Option<Action> {
        while let Some(action) = self.history.undo() {
            if self.dispatch(&action, Replay::Undo) {
                return Some(action);
            }
            warn!(kind = ?action.kind, "skipped unreachable undo entry");
        }
        None
    }

    /// Redo the most recently undone reachable action, with the same skip
    /// semantics as [`Session::undo`].
    pub fn redo(&mut self) -> Option<Action> {
        while let Some(action) = self.history.redo() {
            if self.dispatch(&action, Replay::Redo) {
                return Some(action);
            }
            warn!(kind = ?action.kind, "skipped unreachable redo entry");
        }
        None
    }

    fn dispatch(&mut self, action: &Action, replay: Replay) -> bool {
        if action.kind.is_text() {
            return self.replay_text(action, replay);
        }
        // Redoing a file deletion removes the file again; close its
        // document first, as the live delete path does.
        if action.kind == ActionKind::FileDelete && replay == Replay::Redo {
            if let Some(id) = action
                .path
                .as_deref()
                .and_then(|p| self.workspace.find_by_path(p))
                .map(Document::id)
            {
                self.workspace.close(id);
            }
        }
        match replay {
            Replay::Undo => fsops::apply_undo(action),
            Replay::Redo => fsops::apply_redo(action),
        }
    }

    fn replay_text(&mut self, action: &Action, replay: Replay) -> bool {
        let Some(id) = self.resolve_target(action) else {
            return false;
        };
        let Some(doc) = self.workspace.get_mut(id) else {
            return false;
        };

        // Inverse on undo, original effect on redo.
        let insert = match replay {
            Replay::Undo => action.kind == ActionKind::TextDelete,
            Replay::Redo => action.kind == ActionKind::TextInsert,
        };
        if insert {
            doc.buffer_mut().insert_untracked(action.pos, &action.text);
        } else {
            doc.buffer_mut().remove_untracked(action.pos, action.text.len());
        }

        let cursor = match replay {
            Replay::Undo => action.cursor_before,
            Replay::Redo => action.cursor_after,
        };
        doc.set_caret(Caret::at(cursor));
        self.workspace.set_active(id);
        true
    }

    /// The live document for a text entry: the recorded id if still open,
    /// otherwise whatever re-opening the recorded path yields.
    fn resolve_target(&mut self, action: &Action) -> Option<DocumentId> {
        if self.workspace.get(action.doc).is_some() {
            return Some(action.doc);
        }
        let path = action.path.as_deref()?;
        match self.workspace.open(path) {
            Ok(id) => Some(id),
            Err(err) => {
                warn!(path = %path.display(), %err, "could not re-open undo target");
                None
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Replay {
    Undo,
    Redo,
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn session_with_doc(text: &str) -> (Session, DocumentId) {
        let mut session = Session::new();
        let id = session.workspace_mut().new_document();
        session.insert(id, 0, text);
        session.clear_history();
        (session, id)
    }

    // --- Session-level edits ---

    #[test]
    fn test_insert_records_and_moves_caret() {
        let (mut session, id) = session_with_doc("hello");
        assert!(session.insert(id, 5, " world"));
        let doc = session.workspace().get(id).unwrap();
        assert_eq!(doc.buffer().text(), "hello world");
        assert_eq!(doc.caret().cursor, 11);
        assert!(session.can_undo());
        // The edit went to the session log, not the buffer-local one.
        assert!(!doc.buffer().can_undo());
    }

    #[test]
    fn test_edit_unknown_document_records_nothing() {
        let mut session = Session::new();
        assert!(!session.insert(DocumentId::from_raw(9), 0, "x"));
        assert!(!session.remove(DocumentId::from_raw(9), 0, 1));
        assert!(!session.can_undo());
    }

    #[test]
    fn test_undo_redo_single_document() {
        let (mut session, id) = session_with_doc("hello");
        session.insert(id, 5, " world");

        let undone = session.undo().expect("undo");
        assert_eq!(undone.kind, ActionKind::TextInsert);
        assert_eq!(session.workspace().get(id).unwrap().buffer().text(), "hello");
        assert_eq!(session.workspace().get(id).unwrap().caret().cursor, 5);

        let redone = session.redo().expect("redo");
        assert_eq!(redone.cursor_after, 11);
        assert_eq!(
            session.workspace().get(id).unwrap().buffer().text(),
            "hello world"
        );
    }

    #[test]
    fn test_remove_undo_restores_exact_content() {
        let (mut session, id) = session_with_doc("hello world");
        session.remove(id, 5, 6);
        assert_eq!(session.workspace().get(id).unwrap().buffer().text(), "hello");
        session.undo();
        assert_eq!(
            session.workspace().get(id).unwrap().buffer().text(),
            "hello world"
        );
    }

    // --- Cross-document behavior ---

    #[test]
    fn test_undo_retargets_other_document() {
        let mut session = Session::new();
        let a = session.workspace_mut().new_document();
        let b = session.workspace_mut().new_document();
        session.insert(a, 0, "first");
        session.insert(b, 0, "second");
        session.workspace_mut().set_active(a);

        let undone = session.undo().expect("undo");
        assert_eq!(undone.doc, b);
        assert_eq!(session.workspace().get(b).unwrap().buffer().text(), "");
        // Undo focused the document it applied to.
        assert_eq!(session.workspace().active_id(), Some(b));
        assert_eq!(session.workspace().get(a).unwrap().buffer().text(), "first");
    }

    #[test]
    fn test_undo_reopens_closed_document_by_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a.txt");
        std::fs::write(&path, "abc").unwrap();

        let mut session = Session::new();
        let id = session.workspace_mut().open(&path).unwrap();
        session.insert(id, 3, "def");
        // Persist the edit so the re-opened document contains it.
        session.workspace_mut().get_mut(id).unwrap().save().unwrap();
        session.workspace_mut().close(id);
        assert!(session.workspace().is_empty());

        let undone = session.undo().expect("undo");
        assert_eq!(undone.kind, ActionKind::TextInsert);
        let reopened = session.workspace().active().expect("reopened");
        assert_ne!(reopened.id(), id);
        assert_eq!(reopened.buffer().text(), "abc");
    }

    #[test]
    fn test_undo_skips_unreachable_entry_and_continues() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("gone.txt");
        std::fs::write(&path, "abc").unwrap();

        let mut session = Session::new();
        let keep = session.workspace_mut().new_document();
        session.insert(keep, 0, "kept");

        let doomed = session.workspace_mut().open(&path).unwrap();
        session.insert(doomed, 3, "!");
        session.workspace_mut().close(doomed);
        std::fs::remove_file(&path).unwrap();

        // The newest entry targets a document that no longer exists and a
        // path that cannot be re-opened; undo skips it and lands on the
        // older edit instead of failing.
        let undone = session.undo().expect("undo");
        assert_eq!(undone.doc, keep);
        assert_eq!(session.workspace().get(keep).unwrap().buffer().text(), "");
    }

    #[test]
    fn test_undo_exhausted_returns_none() {
        let (mut session, _id) = session_with_doc("x");
        assert!(session.undo().is_none());
    }

    // --- File actions ---

    #[test]
    fn test_create_file_undo_redo() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("new.txt");
        let mut session = Session::new();
        session.create_file(&path).unwrap();
        assert!(path.exists());

        session.undo().expect("undo");
        assert!(!path.exists());
        session.redo().expect("redo");
        assert!(path.exists());
    }

    #[test]
    fn test_delete_file_closes_document_and_undo_resurrects() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("doomed.txt");
        std::fs::write(&path, "body").unwrap();

        let mut session = Session::new();
        session.workspace_mut().open(&path).unwrap();
        session.delete_file(&path).unwrap();
        assert!(session.workspace().is_empty());
        assert!(!path.exists());

        let undone = session.undo().expect("undo");
        assert_eq!(undone.kind, ActionKind::FileDelete);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "body");
    }

    #[test]
    fn test_rename_file_undo_restores_name() {
        let dir = tempdir().unwrap();
        let old = dir.path().join("old.txt");
        let new = dir.path().join("new.txt");
        std::fs::write(&old, "x").unwrap();

        let mut session = Session::new();
        session.rename_file(&old, &new).unwrap();
        assert!(new.exists());

        session.undo().expect("undo");
        assert!(old.exists());
        assert!(!new.exists());
    }

    #[test]
    fn test_duplicate_file_records_copy_creation() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a.txt");
        std::fs::write(&path, "x").unwrap();

        let mut session = Session::new();
        let copy = session.duplicate_file(&path).unwrap();
        assert!(copy.exists());

        session.undo().expect("undo");
        assert!(!copy.exists());
        assert!(path.exists());
    }

    #[test]
    fn test_folder_actions_round_trip() {
        let dir = tempdir().unwrap();
        let sub = dir.path().join("sub");
        let renamed = dir.path().join("renamed");

        let mut session = Session::new();
        session.create_folder(&sub).unwrap();
        session.rename_folder(&sub, &renamed).unwrap();
        assert!(renamed.is_dir());

        session.undo().expect("undo rename");
        assert!(sub.is_dir());
        session.undo().expect("undo create");
        assert!(!sub.exists());
        session.redo().expect("redo create");
        assert!(sub.is_dir());
    }

    // --- Interleaved text and file actions ---

    #[test]
    fn test_interleaved_history_unwinds_in_order() {
        let dir = tempdir().unwrap();
        let created = dir.path().join("made.txt");

        let mut session = Session::new();
        let id = session.workspace_mut().new_document();
        session.insert(id, 0, "text");
        session.create_file(&created).unwrap();

        // Newest first: the file creation, then the edit.
        assert_eq!(session.undo().map(|a| a.kind), Some(ActionKind::FileCreate));
        assert!(!created.exists());
        assert_eq!(session.undo().map(|a| a.kind), Some(ActionKind::TextInsert));
        assert_eq!(session.workspace().get(id).unwrap().buffer().text(), "");
    }

    #[test]
    fn test_new_action_after_undo_clears_redo() {
        let (mut session, id) = session_with_doc("");
        session.insert(id, 0, "a");
        session.undo();
        assert!(session.can_redo());
        session.insert(id, 0, "b");
        assert!(!session.can_redo());
    }

    #[test]
    fn test_clear_for_document_drops_only_that_documents_entries() {
        let mut session = Session::new();
        let a = session.workspace_mut().new_document();
        let b = session.workspace_mut().new_document();
        session.insert(a, 0, "a");
        session.insert(b, 0, "b");
        session.clear_for_document(a);
        assert_eq!(session.history().undo_depth(), 1);
        assert_eq!(session.undo().map(|act| act.doc), Some(b));
    }
}
