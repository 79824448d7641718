//! Note use-case service.

use crate::model::note::Note;
use crate::repo::note_repo::NoteRepository;
use crate::repo::StoreResult;
use crate::search::substring::{search_notes, SearchQuery};
use log::info;

/// Note service facade over a repository implementation.
pub struct NoteService<R: NoteRepository> {
    repo: R,
}

impl<R: NoteRepository> NoteService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Stores a new note and returns it.
    pub fn save_note(
        &self,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> StoreResult<Note> {
        let note = Note::new(title, content);
        self.repo.append_note(&note)?;
        info!(
            "event=note_save module=service status=ok title_len={} content_len={}",
            note.title.len(),
            note.content.len()
        );
        Ok(note)
    }

    /// Finds notes containing `query`, default limit applied.
    pub fn search(&self, query: &str) -> StoreResult<Vec<Note>> {
        let hits = search_notes(&self.repo, &SearchQuery::new(query))?;
        info!(
            "event=note_search module=service status=ok query_len={} hits={}",
            query.len(),
            hits.len()
        );
        Ok(hits)
    }

    /// Lists every note in insertion order.
    pub fn list(&self) -> StoreResult<Vec<Note>> {
        self.repo.list_notes()
    }
}
