//! One open document: identity, file binding, content, caret.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::buffer::Buffer;
use crate::error::{Error, Result};
use crate::fsops;
use crate::nav::Caret;

/// Opaque identity of an open document.
///
/// Ids are allocated by the workspace, increase monotonically, and are never
/// reused, so an id held by a history entry goes stale (rather than aliasing
/// another document) when its document is closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentId(u32);

impl DocumentId {
    /// Identity carried by entries that do not belong to a live document
    /// (buffer-local logs, file actions).
    pub const UNSET: Self = Self(0);

    /// Wrap a raw id value.
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// The raw id value.
    pub const fn raw(self) -> u32 {
        self.0
    }
}

/// A document under edit: content buffer, caret, and optional file binding.
#[derive(Debug)]
pub struct Document {
    id: DocumentId,
    path: Option<PathBuf>,
    title: String,
    buffer: Buffer,
    caret: Caret,
}

impl Document {
    /// Open a document from a file on disk.
    ///
    /// # Errors
    /// Fails on unreadable files and on content that is not valid UTF-8;
    /// nothing is left half-open.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = fsops::read_file(path)?;
        let mut buffer = Buffer::new();
        buffer.load_bytes(&bytes)?;
        debug!(path = %path.display(), bytes = bytes.len(), "opened document");
        Ok(Self {
            id: DocumentId::UNSET,
            title: title_from_path(path),
            path: Some(path.to_path_buf()),
            buffer,
            caret: Caret::new(),
        })
    }

    /// Create a document with no file binding.
    pub fn untitled(title: String) -> Self {
        Self {
            id: DocumentId::UNSET,
            path: None,
            title,
            buffer: Buffer::new(),
            caret: Caret::new(),
        }
    }

    /// Write the content back to the bound file, clearing the modified flag
    /// only on success.
    ///
    /// # Errors
    /// [`Error::NoFilePath`] when the document was never saved anywhere;
    /// write failures leave the modified flag set.
    pub fn save(&mut self) -> Result<()> {
        let Some(path) = self.path.clone() else {
            return Err(Error::NoFilePath);
        };
        fsops::write_file(&path, self.buffer.text().as_bytes())?;
        self.buffer.mark_clean();
        debug!(path = %path.display(), "saved document");
        Ok(())
    }

    /// Write the content to `path` and bind the document to it.
    ///
    /// # Errors
    /// Write failures leave the binding and modified flag unchanged.
    pub fn save_as(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        fsops::write_file(path, self.buffer.text().as_bytes())?;
        self.title = title_from_path(path);
        self.path = Some(path.to_path_buf());
        self.buffer.mark_clean();
        Ok(())
    }

    // --- Accessors ---

    pub const fn id(&self) -> DocumentId {
        self.id
    }

    pub(crate) const fn set_id(&mut self, id: DocumentId) {
        self.id = id;
    }

    /// The bound file path, if the document has ever been saved or opened.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn has_path(&self) -> bool {
        self.path.is_some()
    }

    /// Display title: the file name, or the assigned untitled name.
    pub fn title(&self) -> &str {
        &self.title
    }

    pub const fn buffer(&self) -> &Buffer {
        &self.buffer
    }

    pub const fn buffer_mut(&mut self) -> &mut Buffer {
        &mut self.buffer
    }

    pub const fn caret(&self) -> Caret {
        self.caret
    }

    /// Replace the caret, clamped to the current content.
    pub fn set_caret(&mut self, caret: Caret) {
        self.caret = caret.clamped(self.buffer.store());
    }

    pub const fn is_modified(&self) -> bool {
        self.buffer.is_modified()
    }

    /// A document that has no file and was never edited.
    pub const fn is_fresh(&self) -> bool {
        self.path.is_none() && !self.is_modified()
    }
}

fn title_from_path(path: &Path) -> String {
    path.file_name()
        .map_or_else(|| path.display().to_string(), |name| name.to_string_lossy().into_owned())
}
