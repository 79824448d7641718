//! Note repository contracts and JSON-file implementation.
//!
//! # Responsibility
//! - Provide append/list APIs for the notes collection.
//!
//! # Invariants
//! - Notes are listed in insertion order.
//! - Stored notes are never modified or removed.

use crate::config::StoreConfig;
use crate::model::note::Note;
use crate::repo::collection::JsonCollection;
use crate::repo::StoreResult;
use std::path::Path;

/// Repository interface for notes.
pub trait NoteRepository {
    /// Appends one note to the end of the collection.
    fn append_note(&self, note: &Note) -> StoreResult<()>;
    /// Lists every note in insertion order.
    fn list_notes(&self) -> StoreResult<Vec<Note>>;
}

/// Notes stored as one JSON array file.
pub struct JsonNoteRepository {
    collection: JsonCollection<Note>,
}

impl JsonNoteRepository {
    /// Opens the notes collection under the configured data directory.
    pub fn new(config: &StoreConfig) -> Self {
        Self::at_path(config.notes_path())
    }

    /// Opens a notes collection at an explicit file path.
    pub fn at_path(path: impl AsRef<Path>) -> Self {
        Self {
            collection: JsonCollection::new("notes", path.as_ref()),
        }
    }

    /// Backing file path.
    pub fn path(&self) -> &Path {
        self.collection.path()
    }
}

impl NoteRepository for JsonNoteRepository {
    fn append_note(&self, note: &Note) -> StoreResult<()> {
        self.collection.append(note.clone()).map(|_| ())
    }

    fn list_notes(&self) -> StoreResult<Vec<Note>> {
        self.collection.load()
    }
}
