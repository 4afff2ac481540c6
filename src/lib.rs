// Only allow lints that are either transitive-dependency noise or
// genuinely opinionated style choices that don't indicate real issues.
#![allow(
    // Transitive dependency version mismatches we can't control
    clippy::multiple_crate_versions,
    // module_name_repetitions is pure style preference (e.g. store::TextStore)
    clippy::module_name_repetitions
)]

//! # Quill Core
//!
//! The editing substrate for the Quill document editor.
//!
//! Quill Core holds document content in memory and maps byte offsets to
//! (line, column) coordinates. On top of that it layers insert/delete
//! mutation with undo/redo history, both per buffer and across a whole
//! editing session spanning multiple documents and file-system actions.
//! Rendering, input translation, and everything else presentational lives
//! in the application layers above this crate.
//!
//! ## Architecture
//!
//! One history mechanism serves every level: a bounded two-stack log of
//! invertible actions. Each [`buffer::Buffer`] owns a local instance; the
//! [`session::Session`] owns the shared cross-document instance and
//! dispatches its entries back to documents and the file system on
//! undo/redo. Cursor movement is stateless: pure transforms over a store
//! and a caret.
//!
//! ## Modules
//!
//! - [`store`]: rope-backed text content and offset↔line↔column mapping
//! - [`buffer`]: per-buffer editing surface with local history
//! - [`history`]: the bounded undo/redo log and its action records
//! - [`nav`]: cursor and selection movement
//! - [`document`]: one open document (content, caret, file binding)
//! - [`workspace`]: the open-document registry
//! - [`session`]: session-wide editing and cross-document undo
//! - [`fsops`]: file/folder actions and their guarded replay
//! - [`config`]: rc-file behavior configuration

pub mod buffer;
pub mod config;
pub mod document;
pub mod error;
pub mod fsops;
pub mod history;
pub mod nav;
pub mod session;
pub mod store;
pub mod workspace;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::buffer::Buffer;
    pub use crate::config::EditorConfig;
    pub use crate::document::{Document, DocumentId};
    pub use crate::error::{Error, Result};
    pub use crate::history::{Action, ActionKind, History, MAX_HISTORY};
    pub use crate::nav::{Caret, Direction, LineEdge};
    pub use crate::session::Session;
    pub use crate::store::TextStore;
    pub use crate::workspace::Workspace;
}
