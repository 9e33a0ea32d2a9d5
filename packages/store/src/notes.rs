//! Note operations with the local checks that run before the backend is called.

use crate::backend::Backend;
use crate::error::{AppError, ValidationError};
use crate::models::{NewNote, Note};

impl NewNote {
    /// Build an insert payload for `user_id`.
    ///
    /// Requires a resolved user and a title and content that are not blank. The text
    /// is kept as typed; trimming only decides emptiness.
    pub fn new(user_id: Option<&str>, title: &str, content: &str) -> Result<Self, AppError> {
        let Some(user_id) = user_id.filter(|id| !id.is_empty()) else {
            return Err(AppError::Unauthenticated);
        };
        if title.trim().is_empty() || content.trim().is_empty() {
            return Err(ValidationError::EmptyNote.into());
        }
        Ok(Self {
            title: title.to_string(),
            content: content.to_string(),
            user_id: user_id.to_string(),
        })
    }
}

/// Insert a validated note.
pub async fn create_note<B: Backend + ?Sized>(
    backend: &B,
    access_token: &str,
    note: &NewNote,
) -> Result<Note, AppError> {
    Ok(backend.insert_note(access_token, note).await?)
}

/// Notes of `owner`, newest first.
pub async fn list_notes<B: Backend + ?Sized>(
    backend: &B,
    access_token: &str,
    owner: &str,
) -> Result<Vec<Note>, AppError> {
    Ok(backend.list_notes(access_token, owner).await?)
}

pub async fn delete_note<B: Backend + ?Sized>(
    backend: &B,
    access_token: &str,
    id: &str,
) -> Result<(), AppError> {
    Ok(backend.delete_note(access_token, id).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryBackend;

    #[test]
    fn new_note_requires_user() {
        assert_eq!(
            NewNote::new(None, "Groceries", "Milk"),
            Err(AppError::Unauthenticated)
        );
        assert_eq!(
            NewNote::new(Some(""), "Groceries", "Milk"),
            Err(AppError::Unauthenticated)
        );
    }

    #[test]
    fn new_note_rejects_whitespace_fields() {
        assert_eq!(
            NewNote::new(Some("u1"), "   ", "Milk"),
            Err(AppError::Validation(ValidationError::EmptyNote))
        );
        assert_eq!(
            NewNote::new(Some("u1"), "Groceries", "\n\t"),
            Err(AppError::Validation(ValidationError::EmptyNote))
        );
    }

    #[test]
    fn new_note_keeps_text_as_typed() {
        let note = NewNote::new(Some("u1"), " Groceries ", "Milk, eggs").unwrap();
        assert_eq!(note.title, " Groceries ");
        assert_eq!(note.user_id, "u1");
    }

    #[tokio::test]
    async fn create_then_list_is_newest_first() {
        let backend = MemoryBackend::new();
        let session = backend.register_and_sign_in("a@b.com", "secret1").await;
        let owner = session.user.id.clone();
        let token = session.access_token.clone();

        for title in ["first", "second", "third"] {
            let note = NewNote::new(Some(&owner), title, "body").unwrap();
            create_note(&backend, &token, &note).await.unwrap();
        }

        let titles: Vec<String> = list_notes(&backend, &token, &owner)
            .await
            .unwrap()
            .into_iter()
            .map(|n| n.title)
            .collect();
        assert_eq!(titles, ["third", "second", "first"]);
    }

    #[tokio::test]
    async fn notes_are_visible_only_to_their_owner() {
        let backend = MemoryBackend::new();
        let alice = backend.register_and_sign_in("alice@b.com", "secret1").await;
        let bob = backend.register_and_sign_in("bob@b.com", "secret2").await;

        let note = NewNote::new(Some(&alice.user.id), "mine", "private").unwrap();
        let stored = create_note(&backend, &alice.access_token, &note).await.unwrap();

        // Bob asking for Alice's rows gets nothing, and cannot delete them.
        let seen = list_notes(&backend, &bob.access_token, &alice.user.id)
            .await
            .unwrap();
        assert!(seen.is_empty());
        delete_note(&backend, &bob.access_token, &stored.id).await.unwrap();
        let still_there = list_notes(&backend, &alice.access_token, &alice.user.id)
            .await
            .unwrap();
        assert_eq!(still_there.len(), 1);

        // Inserting on Alice's behalf is refused.
        let forged = NewNote::new(Some(&alice.user.id), "forged", "x").unwrap();
        assert!(create_note(&backend, &bob.access_token, &forged).await.is_err());
    }

    #[tokio::test]
    async fn data_calls_need_a_session() {
        let backend = MemoryBackend::new();
        let note = NewNote::new(Some("u1"), "t", "c").unwrap();
        let err = create_note(&backend, "bogus-token", &note).await.unwrap_err();
        assert_eq!(
            err,
            AppError::Backend(crate::error::BackendError::Unauthenticated)
        );
    }
}
