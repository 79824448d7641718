//! Note record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Title used when the caller does not provide one.
pub const UNTITLED_NOTE_TITLE: &str = "Untitled Note";

/// One stored study note.
///
/// Notes have no identity beyond their position in the collection; titles are
/// not unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub title: String,
    pub content: String,
    /// Creation time, serialized as RFC 3339.
    #[serde(deserialize_with = "super::timestamp::deserialize")]
    pub created_at: DateTime<Utc>,
}

impl Note {
    /// Creates a note stamped with the current time.
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            created_at: Utc::now(),
        }
    }

    /// Returns whether `title + " " + content` contains `needle_lower`.
    ///
    /// `needle_lower` must already be lowercased.
    pub fn matches_lowercase(&self, needle_lower: &str) -> bool {
        format!("{} {}", self.title, self.content)
            .to_lowercase()
            .contains(needle_lower)
    }
}

#[cfg(test)]
mod tests {
    use super::Note;

    #[test]
    fn match_spans_title_and_content_case_insensitively() {
        let note = Note::new("Recursion", "Base case + recursive case");
        assert!(note.matches_lowercase("recursion"));
        assert!(note.matches_lowercase("base case"));
        assert!(note.matches_lowercase("recursion base"));
        assert!(!note.matches_lowercase("iteration"));
    }
}
