//! File and folder actions.
//!
//! The side-effect executors behind the session's file operations and the
//! replay arms for undoing/redoing them. Replay is state-guarded: each arm
//! verifies the file system still looks the way the history entry expects
//! before acting, and reports whether it acted, so stale entries are skipped
//! instead of clobbering newer state.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::error::{Error, Result};
use crate::history::{Action, ActionKind};

/// Whether `path` exists and is a regular file.
pub fn file_exists(path: &Path) -> bool {
    path.is_file()
}

/// Whether `path` exists and is a directory.
pub fn folder_exists(path: &Path) -> bool {
    path.is_dir()
}

/// Read a whole file.
///
/// # Errors
/// [`Error::Read`] with the failing path.
pub fn read_file(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|source| Error::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Write a whole file, creating or truncating it.
///
/// # Errors
/// [`Error::Write`] with the failing path.
pub fn write_file(path: &Path, bytes: &[u8]) -> Result<()> {
    fs::write(path, bytes).map_err(|source| Error::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Create an empty file.
///
/// # Errors
/// [`Error::PathExists`] when something is already at `path`.
pub fn create_file(path: &Path) -> Result<()> {
    if path.exists() {
        return Err(Error::PathExists(path.to_path_buf()));
    }
    write_file(path, &[])
}

/// Delete a file, returning its content so the deletion can be undone.
///
/// # Errors
/// [`Error::PathMissing`] when `path` is not a regular file.
pub fn delete_file(path: &Path) -> Result<Vec<u8>> {
    if !file_exists(path) {
        return Err(Error::PathMissing(path.to_path_buf()));
    }
    let snapshot = read_file(path).unwrap_or_default();
    fs::remove_file(path).map_err(|source| Error::FileAction {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(snapshot)
}

/// Rename a file.
///
/// # Errors
/// The source must be an existing file and the target must be free.
pub fn rename_file(old_path: &Path, new_path: &Path) -> Result<()> {
    if !file_exists(old_path) {
        return Err(Error::PathMissing(old_path.to_path_buf()));
    }
    if new_path.exists() {
        return Err(Error::PathExists(new_path.to_path_buf()));
    }
    rename_path(old_path, new_path)
}

/// Copy a file next to itself under a derived `_copyN` name, returning the
/// new path.
///
/// # Errors
/// The source must be an existing, readable file.
pub fn duplicate_file(path: &Path) -> Result<PathBuf> {
    if !file_exists(path) {
        return Err(Error::PathMissing(path.to_path_buf()));
    }
    let copy = duplicate_path(path);
    let content = read_file(path)?;
    write_file(&copy, &content)?;
    Ok(copy)
}

/// Create an empty folder.
///
/// # Errors
/// [`Error::PathExists`] when something is already at `path`.
pub fn create_folder(path: &Path) -> Result<()> {
    if path.exists() {
        return Err(Error::PathExists(path.to_path_buf()));
    }
    fs::create_dir(path).map_err(|source| Error::FileAction {
        path: path.to_path_buf(),
        source,
    })
}

/// Delete an empty folder.
///
/// # Errors
/// [`Error::PathMissing`] when `path` is not a directory; non-empty folders
/// fail with the underlying I/O error.
pub fn delete_folder(path: &Path) -> Result<()> {
    if !folder_exists(path) {
        return Err(Error::PathMissing(path.to_path_buf()));
    }
    fs::remove_dir(path).map_err(|source| Error::FileAction {
        path: path.to_path_buf(),
        source,
    })
}

/// Rename a folder.
///
/// # Errors
/// The source must be an existing folder and the target must be free.
pub fn rename_folder(old_path: &Path, new_path: &Path) -> Result<()> {
    if !folder_exists(old_path) {
        return Err(Error::PathMissing(old_path.to_path_buf()));
    }
    if new_path.exists() {
        return Err(Error::PathExists(new_path.to_path_buf()));
    }
    rename_path(old_path, new_path)
}

/// Derive a free `name_copyN` path next to `path`, keeping the extension.
pub fn duplicate_path(path: &Path) -> PathBuf {
    let stem = path.file_stem().map_or_else(String::new, |s| s.to_string_lossy().into_owned());
    let ext = path.extension().map(|e| e.to_string_lossy().into_owned());
    let parent = path.parent().unwrap_or_else(|| Path::new(""));

    for n in 1u32.. {
        let name = match &ext {
            Some(ext) => format!("{stem}_copy{n}.{ext}"),
            None => format!("{stem}_copy{n}"),
        };
        let candidate = parent.join(name);
        if !candidate.exists() {
            return candidate;
        }
    }
    unreachable!("copy counter exhausted")
}

// --- History replay ---

/// Undo a file action, verifying the expected on-disk state first.
///
/// Returns `true` when the action was applicable and the effect ran; `false`
/// means the entry was stale (or not a file action) and should be skipped.
pub fn apply_undo(action: &Action) -> bool {
    let Some(path) = action.path.as_deref() else {
        return false;
    };
    match action.kind {
        ActionKind::FileCreate => file_exists(path) && remove_quiet(path),
        ActionKind::FileDelete => {
            !path.exists()
                && write_file(path, action.snapshot.as_deref().unwrap_or_default()).is_ok()
        }
        ActionKind::FileRename => {
            let Some(new_path) = action.path_alt.as_deref() else {
                return false;
            };
            file_exists(new_path) && rename_path(new_path, path).is_ok()
        }
        ActionKind::FolderCreate => folder_exists(path) && fs::remove_dir(path).is_ok(),
        ActionKind::FolderDelete => !path.exists() && fs::create_dir(path).is_ok(),
        ActionKind::FolderRename => {
            let Some(new_path) = action.path_alt.as_deref() else {
                return false;
            };
            folder_exists(new_path) && rename_path(new_path, path).is_ok()
        }
        ActionKind::TextInsert | ActionKind::TextDelete => false,
    }
}

/// Redo a file action, verifying the expected on-disk state first.
///
/// Returns `true` when the action was applicable and the effect ran.
pub fn apply_redo(action: &Action) -> bool {
    let Some(path) = action.path.as_deref() else {
        return false;
    };
    match action.kind {
        ActionKind::FileCreate => !path.exists() && write_file(path, &[]).is_ok(),
        ActionKind::FileDelete => file_exists(path) && remove_quiet(path),
        ActionKind::FileRename => {
            let Some(new_path) = action.path_alt.as_deref() else {
                return false;
            };
            file_exists(path) && rename_path(path, new_path).is_ok()
        }
        ActionKind::FolderCreate => !path.exists() && fs::create_dir(path).is_ok(),
        ActionKind::FolderDelete => folder_exists(path) && fs::remove_dir(path).is_ok(),
        ActionKind::FolderRename => {
            let Some(new_path) = action.path_alt.as_deref() else {
                return false;
            };
            folder_exists(path) && rename_path(path, new_path).is_ok()
        }
        ActionKind::TextInsert | ActionKind::TextDelete => false,
    }
}

fn rename_path(old_path: &Path, new_path: &Path) -> Result<()> {
    fs::rename(old_path, new_path).map_err(|source| Error::FileAction {
        path: old_path.to_path_buf(),
        source,
    })
}

fn remove_quiet(path: &Path) -> bool {
    match fs::remove_file(path) {
        Ok(()) => true,
        Err(err) => {
            warn!(path = %path.display(), %err, "failed to remove file");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::History;
    use tempfile::tempdir;

    // --- Basic actions ---

    #[test]
    fn test_create_file_refuses_existing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a.txt");
        create_file(&path).unwrap();
        assert!(file_exists(&path));
        assert!(matches!(create_file(&path), Err(Error::PathExists(_))));
    }

    #[test]
    fn test_delete_file_returns_snapshot() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a.txt");
        fs::write(&path, "body").unwrap();
        let snapshot = delete_file(&path).unwrap();
        assert_eq!(snapshot, b"body");
        assert!(!path.exists());
    }

    #[test]
    fn test_delete_missing_file_fails() {
        let dir = tempdir().unwrap();
        assert!(matches!(
            delete_file(&dir.path().join("ghost")),
            Err(Error::PathMissing(_))
        ));
    }

    #[test]
    fn test_rename_file_refuses_clobber() {
        let dir = tempdir().unwrap();
        let a = dir.path().join("a.txt");
        let b = dir.path().join("b.txt");
        fs::write(&a, "1").unwrap();
        fs::write(&b, "2").unwrap();
        assert!(matches!(rename_file(&a, &b), Err(Error::PathExists(_))));
    }

    #[test]
    fn test_rename_file_moves_content() {
        let dir = tempdir().unwrap();
        let a = dir.path().join("a.txt");
        let b = dir.path().join("b.txt");
        fs::write(&a, "1").unwrap();
        rename_file(&a, &b).unwrap();
        assert!(!a.exists());
        assert_eq!(fs::read_to_string(&b).unwrap(), "1");
    }

    #[test]
    fn test_folder_lifecycle() {
        let dir = tempdir().unwrap();
        let a = dir.path().join("sub");
        let b = dir.path().join("renamed");
        create_folder(&a).unwrap();
        assert!(folder_exists(&a));
        rename_folder(&a, &b).unwrap();
        assert!(folder_exists(&b));
        delete_folder(&b).unwrap();
        assert!(!b.exists());
    }

    // --- Duplicate naming ---

    #[test]
    fn test_duplicate_path_keeps_extension() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("report.txt");
        fs::write(&path, "x").unwrap();
        assert_eq!(duplicate_path(&path), dir.path().join("report_copy1.txt"));
    }

    #[test]
    fn test_duplicate_path_skips_taken_names() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("report.txt");
        fs::write(&path, "x").unwrap();
        fs::write(dir.path().join("report_copy1.txt"), "x").unwrap();
        assert_eq!(duplicate_path(&path), dir.path().join("report_copy2.txt"));
    }

    #[test]
    fn test_duplicate_file_copies_content() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a.txt");
        fs::write(&path, "payload").unwrap();
        let copy = duplicate_file(&path).unwrap();
        assert_eq!(fs::read_to_string(copy).unwrap(), "payload");
    }

    // --- Replay ---

    fn pop(history: &mut History) -> Action {
        history.undo().expect("recorded entry")
    }

    #[test]
    fn test_undo_file_create_removes_it() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a.txt");
        create_file(&path).unwrap();
        let mut history = History::new();
        history.record_file_create(&path);

        assert!(apply_undo(&pop(&mut history)));
        assert!(!path.exists());
    }

    #[test]
    fn test_undo_file_delete_restores_content() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a.txt");
        fs::write(&path, "body").unwrap();
        let snapshot = delete_file(&path).unwrap();
        let mut history = History::new();
        history.record_file_delete(&path, Some(snapshot));

        assert!(apply_undo(&pop(&mut history)));
        assert_eq!(fs::read_to_string(&path).unwrap(), "body");
    }

    #[test]
    fn test_undo_rename_restores_old_name() {
        let dir = tempdir().unwrap();
        let a = dir.path().join("a.txt");
        let b = dir.path().join("b.txt");
        fs::write(&a, "1").unwrap();
        rename_file(&a, &b).unwrap();
        let mut history = History::new();
        history.record_file_rename(&a, &b);

        assert!(apply_undo(&pop(&mut history)));
        assert!(a.exists());
        assert!(!b.exists());
    }

    #[test]
    fn test_stale_entry_is_not_applied() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a.txt");
        let mut history = History::new();
        history.record_file_create(&path);
        // The file was already removed by other means; the guarded arm
        // declines rather than acting on missing state.
        assert!(!apply_undo(&pop(&mut history)));
    }

    #[test]
    fn test_redo_reapplies_create_and_delete() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a.txt");
        create_file(&path).unwrap();
        let mut history = History::new();
        history.record_file_create(&path);

        let action = pop(&mut history);
        assert!(apply_undo(&action));
        assert!(apply_redo(&action));
        assert!(file_exists(&path));
    }

    #[test]
    fn test_folder_replay_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sub");
        create_folder(&path).unwrap();
        let mut history = History::new();
        history.record_folder_create(&path);

        let action = pop(&mut history);
        assert!(apply_undo(&action));
        assert!(!path.exists());
        assert!(apply_redo(&action));
        assert!(folder_exists(&path));
    }

    #[test]
    fn test_text_actions_are_not_file_replayable() {
        let mut history = History::new();
        history.record_text_insert(
            crate::document::DocumentId::from_raw(1),
            Some(Path::new("x")),
            0,
            "hi",
            0,
            2,
        );
        assert!(!apply_undo(&pop(&mut history)));
    }
}
