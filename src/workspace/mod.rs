//! Open-document registry.
//!
//! [`Workspace`] owns every open [`Document`], hands out their identities,
//! and tracks which one is active. It is the collaborator session undo uses
//! to locate a document by id and to re-open a closed one by path.

use std::path::Path;

use tracing::debug;

use crate::document::{Document, DocumentId};
use crate::error::Result;

/// The set of open documents.
#[derive(Debug)]
pub struct Workspace {
    documents: Vec<Document>,
    active: Option<DocumentId>,
    next_id: u32,
    untitled_counter: u32,
}

impl Workspace {
    pub fn new() -> Self {
        Self {
            documents: Vec::new(),
            active: None,
            next_id: 1,
            untitled_counter: 0,
        }
    }

    /// Create a new unsaved document and make it active.
    pub fn new_document(&mut self) -> DocumentId {
        self.untitled_counter += 1;
        let doc = Document::untitled(format!("Untitled-{}", self.untitled_counter));
        self.adopt(doc)
    }

    /// Open the file at `path`, or activate the document that already has it
    /// open.
    ///
    /// # Errors
    /// Read and encoding failures from [`Document::open`]; the workspace is
    /// unchanged on failure.
    pub fn open(&mut self, path: impl AsRef<Path>) -> Result<DocumentId> {
        let path = path.as_ref();
        if let Some(existing) = self.find_by_path(path).map(Document::id) {
            self.active = Some(existing);
            return Ok(existing);
        }
        let doc = Document::open(path)?;
        Ok(self.adopt(doc))
    }

    /// Close a document. When it was active, a neighboring document becomes
    /// active instead.
    pub fn close(&mut self, id: DocumentId) {
        let Some(index) = self.documents.iter().position(|d| d.id() == id) else {
            return;
        };
        let doc = self.documents.remove(index);
        debug!(id = doc.id().raw(), title = doc.title(), "closed document");

        if self.active == Some(id) {
            self.active = if self.documents.is_empty() {
                None
            } else {
                Some(self.documents[index.saturating_sub(1)].id())
            };
        }
    }

    // --- Lookup ---

    pub fn get(&self, id: DocumentId) -> Option<&Document> {
        self.documents.iter().find(|d| d.id() == id)
    }

    pub fn get_mut(&mut self, id: DocumentId) -> Option<&mut Document> {
        self.documents.iter_mut().find(|d| d.id() == id)
    }

    /// The document bound to `path`, if open.
    pub fn find_by_path(&self, path: &Path) -> Option<&Document> {
        self.documents.iter().find(|d| d.path() == Some(path))
    }

    pub fn active_id(&self) -> Option<DocumentId> {
        self.active
    }

    pub fn active(&self) -> Option<&Document> {
        self.active.and_then(|id| self.get(id))
    }

    pub fn active_mut(&mut self) -> Option<&mut Document> {
        let id = self.active?;
        self.get_mut(id)
    }

    /// Make `id` active if it is open.
    pub fn set_active(&mut self, id: DocumentId) {
        if self.get(id).is_some() {
            self.active = Some(id);
        }
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Document> {
        self.documents.iter()
    }

    /// Whether any open document has unsaved changes.
    pub fn has_unsaved_changes(&self) -> bool {
        self.documents.iter().any(Document::is_modified)
    }

    /// Save the document with `id`.
    ///
    /// # Errors
    /// Write failures, or [`crate::error::Error::NoFilePath`] for documents
    /// never saved anywhere. Unknown ids are a quiet no-op.
    pub fn save(&mut self, id: DocumentId) -> Result<()> {
        match self.get_mut(id) {
            Some(doc) => doc.save(),
            None => Ok(()),
        }
    }

    fn adopt(&mut self, mut doc: Document) -> DocumentId {
        let id = DocumentId::from_raw(self.next_id);
        self.next_id += 1;
        doc.set_id(id);
        debug!(id = id.raw(), title = doc.title(), "adopted document");
        self.documents.push(doc);
        self.active = Some(id);
        id
    }
}

impl Default for Workspace {
    fn default() -> Self {
        Self::new()
    }
}
