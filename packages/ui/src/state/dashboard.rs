//! # Notes dashboard
//!
//! The displayed list is a projection of the backend rows, newest first. It is only
//! changed by confirmed results: a created note is prepended, a deleted id is filtered
//! out, and nothing is re-fetched after either.
//!
//! `loading` gates every mutating button. The full-page skeleton shows only while
//! loading with no notes yet, so later mutations disable buttons in place.

use std::fmt::Display;

use store::{NewNote, Note, UserInfo};

use super::Destination;

pub const ADD_NOTE_ERROR: &str = "Error adding note";
pub const DELETE_NOTE_ERROR: &str = "Error deleting note";
pub const LOGOUT_ERROR: &str = "Error logging out";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dashboard {
    pub user: Option<UserInfo>,
    pub notes: Vec<Note>,
    pub loading: bool,
    pub title: String,
    pub content: String,
    pub dialog_open: bool,
    /// Message for the blocking alert, if one is up.
    pub alert: Option<String>,
}

impl Default for Dashboard {
    fn default() -> Self {
        Self {
            user: None,
            notes: Vec::new(),
            loading: true,
            title: String::new(),
            content: String::new(),
            dialog_open: false,
            alert: None,
        }
    }
}

impl Dashboard {
    /// Initial fetch finished. A failed note fetch is logged and leaves the list empty.
    pub fn loaded<E: Display>(self, user: Option<UserInfo>, notes: Result<Vec<Note>, E>) -> Self {
        let notes = notes.unwrap_or_else(|err| {
            tracing::error!(error = %err, "Error fetching data");
            Vec::new()
        });
        Self {
            user,
            notes,
            loading: false,
            ..self
        }
    }

    pub fn show_skeleton(&self) -> bool {
        self.loading && self.notes.is_empty()
    }

    pub fn busy(self) -> Self {
        Self {
            loading: true,
            ..self
        }
    }

    pub fn open_dialog(self) -> Self {
        Self {
            dialog_open: true,
            ..self
        }
    }

    pub fn close_dialog(self) -> Self {
        Self {
            dialog_open: false,
            ..self
        }
    }

    pub fn dismiss_alert(self) -> Self {
        Self {
            alert: None,
            ..self
        }
    }

    /// Check the form and start saving it.
    ///
    /// A missing user or blank field raises an alert and sends nothing.
    pub fn begin_create(self) -> (Self, Option<NewNote>) {
        let user_id = self.user.as_ref().map(|user| user.id.as_str());
        match NewNote::new(user_id, &self.title, &self.content) {
            Ok(note) => (self.busy(), Some(note)),
            Err(err) => {
                let next = Self {
                    alert: Some(err.to_string()),
                    ..self
                };
                (next, None)
            }
        }
    }

    /// Saving finished. On failure the form keeps its text.
    pub fn created<E: Display>(self, result: Result<Note, E>) -> Self {
        match result {
            Ok(note) => {
                let mut notes = Vec::with_capacity(self.notes.len() + 1);
                notes.push(note);
                notes.extend(self.notes);
                Self {
                    notes,
                    loading: false,
                    title: String::new(),
                    content: String::new(),
                    dialog_open: false,
                    ..self
                }
            }
            Err(err) => {
                tracing::error!(error = %err, "Error adding note");
                Self {
                    loading: false,
                    alert: Some(ADD_NOTE_ERROR.to_string()),
                    ..self
                }
            }
        }
    }

    pub fn deleted<E: Display>(self, id: &str, result: Result<(), E>) -> Self {
        match result {
            Ok(()) => Self {
                notes: self.notes.into_iter().filter(|note| note.id != id).collect(),
                loading: false,
                ..self
            },
            Err(err) => {
                tracing::error!(error = %err, note = id, "Error deleting note");
                Self {
                    loading: false,
                    alert: Some(DELETE_NOTE_ERROR.to_string()),
                    ..self
                }
            }
        }
    }

    /// Sign-out finished; on success leave for the landing page.
    pub fn logged_out<E: Display>(self, result: Result<(), E>) -> (Self, Option<Destination>) {
        match result {
            Ok(()) => {
                let next = Self {
                    user: None,
                    notes: Vec::new(),
                    loading: false,
                    ..self
                };
                (next, Some(Destination::Entry))
            }
            Err(err) => {
                tracing::error!(error = %err, "Error logging out");
                let next = Self {
                    loading: false,
                    alert: Some(LOGOUT_ERROR.to_string()),
                    ..self
                };
                (next, None)
            }
        }
    }

    pub fn view_note(&self, id: &str) -> Destination {
        Destination::Note(id.to_string())
    }
}

#[cfg(test)]
mod tests {
    use store::auth::sign_in;
    use store::notes::{create_note, list_notes};
    use store::MemoryBackend;

    use super::*;

    fn user() -> UserInfo {
        UserInfo {
            id: "user-1".to_string(),
            email: Some("a@b.com".to_string()),
        }
    }

    fn note(id: &str, title: &str) -> Note {
        Note {
            id: id.to_string(),
            title: title.to_string(),
            content: format!("{title} body"),
            created_at: Default::default(),
            user_id: "user-1".to_string(),
        }
    }

    fn with_notes(ids: &[&str]) -> Dashboard {
        let notes = ids.iter().map(|id| note(id, id)).collect();
        Dashboard::default().loaded::<String>(Some(user()), Ok(notes))
    }

    #[test]
    fn skeleton_only_before_first_notes() {
        let dashboard = Dashboard::default();
        assert!(dashboard.show_skeleton());

        let dashboard = with_notes(&["n1"]).busy();
        assert!(dashboard.loading);
        assert!(!dashboard.show_skeleton());
    }

    #[test]
    fn failed_fetch_degrades_to_empty_list() {
        let dashboard = Dashboard::default().loaded(Some(user()), Err("JWT expired"));
        assert!(dashboard.notes.is_empty());
        assert!(!dashboard.loading);
        assert_eq!(dashboard.alert, None);
    }

    #[test]
    fn create_requires_user() {
        let mut dashboard = Dashboard::default().loaded::<String>(None, Ok(Vec::new()));
        dashboard.title = "Groceries".to_string();
        dashboard.content = "Milk, eggs".to_string();

        let (dashboard, note) = dashboard.begin_create();
        assert_eq!(note, None);
        assert_eq!(
            dashboard.alert.as_deref(),
            Some("You must be logged in to add a note")
        );
        assert!(!dashboard.loading);
    }

    #[test]
    fn create_requires_both_fields() {
        let mut dashboard = with_notes(&[]);
        dashboard.title = "Groceries".to_string();
        dashboard.content = "   ".to_string();

        let (dashboard, note) = dashboard.begin_create();
        assert_eq!(note, None);
        assert_eq!(dashboard.alert.as_deref(), Some("Please fill in all fields"));
        assert_eq!(dashboard.title, "Groceries");
    }

    #[test]
    fn created_note_goes_first_and_form_clears() {
        let mut dashboard = with_notes(&["n2", "n1"]).open_dialog();
        dashboard.title = "Groceries".to_string();
        dashboard.content = "Milk, eggs".to_string();

        let (dashboard, new_note) = dashboard.begin_create();
        let new_note = new_note.unwrap();
        assert_eq!(new_note.user_id, "user-1");
        assert!(dashboard.loading);

        let dashboard = dashboard.created::<String>(Ok(note("n3", "Groceries")));
        let ids: Vec<&str> = dashboard.notes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, ["n3", "n2", "n1"]);
        assert!(dashboard.title.is_empty());
        assert!(dashboard.content.is_empty());
        assert!(!dashboard.dialog_open);
        assert!(!dashboard.loading);
    }

    #[test]
    fn failed_create_keeps_form() {
        let mut dashboard = with_notes(&["n1"]).open_dialog();
        dashboard.title = "Groceries".to_string();
        dashboard.content = "Milk, eggs".to_string();

        let (dashboard, _) = dashboard.begin_create();
        let dashboard = dashboard.created(Err("insert failed"));
        assert_eq!(dashboard.alert.as_deref(), Some(ADD_NOTE_ERROR));
        assert_eq!(dashboard.title, "Groceries");
        assert!(dashboard.dialog_open);
        assert_eq!(dashboard.notes.len(), 1);
        assert!(!dashboard.loading);
    }

    #[test]
    fn delete_removes_only_that_id() {
        let dashboard = with_notes(&["n3", "n2", "n1"]).busy();
        let dashboard = dashboard.deleted::<String>("n1", Ok(()));
        let ids: Vec<&str> = dashboard.notes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, ["n3", "n2"]);

        let dashboard = with_notes(&["n3", "n1", "n2"]).deleted::<String>("n1", Ok(()));
        let ids: Vec<&str> = dashboard.notes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, ["n3", "n2"]);
    }

    #[test]
    fn failed_delete_keeps_list() {
        let dashboard = with_notes(&["n2", "n1"]).busy().deleted("n1", Err("denied"));
        assert_eq!(dashboard.notes.len(), 2);
        assert_eq!(dashboard.alert.as_deref(), Some(DELETE_NOTE_ERROR));
        assert_eq!(dashboard.dismiss_alert().alert, None);
    }

    #[test]
    fn logout_goes_to_entry_even_without_notes() {
        let (dashboard, destination) = with_notes(&[]).busy().logged_out::<String>(Ok(()));
        assert_eq!(destination, Some(Destination::Entry));
        assert_eq!(dashboard.user, None);

        let (dashboard, destination) = with_notes(&["n1"]).busy().logged_out(Err("offline"));
        assert_eq!(destination, None);
        assert_eq!(dashboard.alert.as_deref(), Some(LOGOUT_ERROR));
        assert_eq!(dashboard.notes.len(), 1);
    }

    #[test]
    fn view_note_routes_to_detail() {
        assert_eq!(with_notes(&["n1"]).view_note("n1").path(), "/notes/n1");
    }

    #[tokio::test]
    async fn sign_in_then_dashboard_lists_newest_first() {
        let backend = MemoryBackend::new();
        let session = backend.register_and_sign_in("a@b.com", "secret1").await;
        for title in ["older", "newer"] {
            let note = NewNote::new(Some(&session.user.id), title, "body").unwrap();
            create_note(&backend, &session.access_token, &note).await.unwrap();
        }

        let auth = sign_in(&backend, "a@b.com", "secret1").await.unwrap();
        let user = auth.user.to_info();
        let notes = list_notes(&backend, &auth.access_token, &user.id).await;
        let dashboard = Dashboard::default().loaded(Some(user), notes);

        let titles: Vec<&str> = dashboard.notes.iter().map(|n| n.title.as_str()).collect();
        assert_eq!(titles, ["newer", "older"]);
    }

    #[tokio::test]
    async fn create_against_backend_prepends_confirmed_row() {
        let backend = MemoryBackend::new();
        let session = backend.register_and_sign_in("a@b.com", "secret1").await;
        let user = session.user.to_info();
        let token = session.access_token.clone();
        for title in ["first", "second"] {
            let note = NewNote::new(Some(&user.id), title, "body").unwrap();
            create_note(&backend, &token, &note).await.unwrap();
        }
        let notes = list_notes(&backend, &token, &user.id).await;
        let mut dashboard = Dashboard::default().loaded(Some(user.clone()), notes);
        assert_eq!(dashboard.notes.len(), 2);

        dashboard.title = "Groceries".to_string();
        dashboard.content = "Milk, eggs".to_string();
        let (dashboard, new_note) = dashboard.begin_create();
        let result = create_note(&backend, &token, &new_note.unwrap()).await;
        let dashboard = dashboard.created(result);

        assert_eq!(dashboard.notes.len(), 3);
        assert_eq!(dashboard.notes[0].title, "Groceries");
        assert_eq!(dashboard.notes, list_notes(&backend, &token, &user.id).await.unwrap());
    }
}
