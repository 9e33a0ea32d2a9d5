use std::fmt::Display;

use store::Note;

/// What the note detail page shows once loading finished.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteView {
    Found(Note),
    NotFound,
}

impl NoteView {
    /// A failed lookup is logged and shown as not found.
    pub fn from_result<E: Display>(result: Result<Option<Note>, E>) -> Self {
        match result {
            Ok(Some(note)) => Self::Found(note),
            Ok(None) => Self::NotFound,
            Err(err) => {
                tracing::error!(error = %err, "Error fetching note");
                Self::NotFound
            }
        }
    }
}
