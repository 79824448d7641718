//! Case-insensitive substring search over notes.
//!
//! # Invariants
//! - Matches are tested against `title + " " + content`.
//! - Results keep insertion order and are truncated to `limit`.

use crate::model::note::Note;
use crate::repo::note_repo::NoteRepository;
use crate::repo::StoreResult;

/// Maximum hits returned when the caller does not choose a limit.
pub const DEFAULT_SEARCH_LIMIT: usize = 3;

/// Search options for note lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    /// Raw query text; matched as one substring, not split into terms.
    pub text: String,
    pub limit: usize,
}

impl SearchQuery {
    /// Creates a query with the default limit.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            limit: DEFAULT_SEARCH_LIMIT,
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }
}

/// Returns up to `query.limit` notes containing the query text.
///
/// An empty query matches every note.
pub fn search_notes<R>(repo: &R, query: &SearchQuery) -> StoreResult<Vec<Note>>
where
    R: NoteRepository + ?Sized,
{
    let needle = query.text.to_lowercase();
    Ok(repo
        .list_notes()?
        .into_iter()
        .filter(|note| note.matches_lowercase(&needle))
        .take(query.limit)
        .collect())
}
