//! Crate error type.
//!
//! Out-of-range addressing is never an error anywhere in this crate; it is
//! clamped or ignored at the call site. Errors are reserved for I/O, content
//! encoding, and file-action preconditions.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures reported by document persistence and file-system actions.
#[derive(Debug, Error)]
pub enum Error {
    /// Reading a file from disk failed.
    #[error("failed to read {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Writing a file to disk failed.
    #[error("failed to write {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A file-system action (rename, mkdir, rmdir, unlink) failed.
    #[error("file action on {path} failed")]
    FileAction {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Loaded bytes were not valid UTF-8; the store is left unchanged.
    #[error("content is not valid UTF-8")]
    InvalidUtf8(#[from] std::str::Utf8Error),

    /// The target path already exists (create/rename refuse to clobber).
    #[error("path already exists: {0}")]
    PathExists(PathBuf),

    /// The source path does not exist or is not the expected kind.
    #[error("no such path: {0}")]
    PathMissing(PathBuf),

    /// A save was requested on a document that has never been given a path.
    #[error("document has no file path")]
    NoFilePath,
}

pub type Result<T> = std::result::Result<T, Error>;
