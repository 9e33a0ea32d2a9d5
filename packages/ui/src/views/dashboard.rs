//! # Notes dashboard view
//!
//! Loads the user and their notes on mount, then drives [`Dashboard`] transitions from
//! the create dialog, the note cards and the logout button. Failed mutations raise a
//! blocking alert; the list is never re-fetched after create or delete.

use dioxus::prelude::*;

use super::{ModalOverlay, NoteCard};
use crate::state::{step, step_with, Dashboard};
use crate::Destination;

const BOOK_ICON_PATH: &str = "M12 6.253v13m0-13C10.832 5.477 9.246 5 7.5 5S4.168 5.477 3 6.253v13C4.168 18.477 5.754 18 7.5 18s3.332.477 4.5 1.253m0-13C13.168 5.477 14.754 5 16.5 5c1.747 0 3.332.477 4.5 1.253v13C19.832 18.477 18.247 18 16.5 18c-1.746 0-3.332.477-4.5 1.253";

#[component]
pub fn DashboardView(on_navigate: EventHandler<Destination>) -> Element {
    let mut dashboard = use_signal(Dashboard::default);

    let _load = use_resource(move || async move {
        let user = match api::get_current_user().await {
            Ok(user) => user,
            Err(e) => {
                tracing::error!("Error fetching data: {e}");
                None
            }
        };
        let notes = match &user {
            Some(_) => api::list_notes().await,
            None => Ok(Vec::new()),
        };
        step(&mut dashboard, |d| d.loaded(user, notes));
    });

    let submit = move |evt: FormEvent| async move {
        evt.prevent_default();
        let Some(note) = step_with(&mut dashboard, Dashboard::begin_create) else {
            return;
        };
        let result = api::add_note(note.title, note.content).await;
        step(&mut dashboard, |d| d.created(result));
    };

    let delete = move |id: String| {
        spawn(async move {
            step(&mut dashboard, Dashboard::busy);
            let result = api::delete_note(id.clone()).await;
            step(&mut dashboard, |d| d.deleted(&id, result));
        });
    };

    let logout = move |_| async move {
        step(&mut dashboard, Dashboard::busy);
        let result = api::sign_out().await;
        if let Some(destination) = step_with(&mut dashboard, |d| d.logged_out(result)) {
            on_navigate.call(destination);
        }
    };

    let state = dashboard();

    if state.show_skeleton() {
        return rsx! {
            div {
                class: "dashboard-page",
                div {
                    class: "dashboard-inner",
                    div {
                        class: "dashboard-header",
                        div { class: "skeleton", style: "height: 2rem; width: 12rem;" }
                        div {
                            style: "display: flex; gap: 0.5rem;",
                            div { class: "skeleton", style: "height: 2.5rem; width: 6rem;" }
                            div { class: "skeleton", style: "height: 2.5rem; width: 6rem;" }
                        }
                    }
                    div {
                        class: "notes-grid",
                        for i in 0..3 {
                            div {
                                key: "{i}",
                                class: "card",
                                div { class: "skeleton", style: "height: 1.5rem; width: 75%;" }
                                div { class: "skeleton", style: "height: 1rem; width: 100%;" }
                                div { class: "skeleton", style: "height: 1rem; width: 83%;" }
                                div { class: "skeleton", style: "height: 2rem; width: 5rem;" }
                            }
                        }
                    }
                }
            }
        };
    }

    let email = state
        .user
        .as_ref()
        .and_then(|user| user.email.clone())
        .unwrap_or_default();
    let initial = state
        .user
        .as_ref()
        .and_then(|user| user.initial())
        .unwrap_or_default();
    let busy = state.loading;

    rsx! {
        div {
            class: "dashboard-page",
            div {
                class: "dashboard-inner",
                header {
                    class: "dashboard-header",
                    div {
                        style: "display: flex; align-items: center; gap: 1rem;",
                        button {
                            class: "btn btn-outline",
                            onclick: move |_| on_navigate.call(Destination::Entry),
                            "Home"
                        }
                        h1 { class: "dashboard-title", "My Notes" }
                    }
                    div {
                        style: "display: flex; align-items: center; gap: 1rem;",
                        div {
                            style: "display: flex; align-items: center; gap: 0.5rem;",
                            span { class: "avatar", "{initial}" }
                            span { class: "muted", "{email}" }
                        }
                        button {
                            class: "btn btn-primary",
                            onclick: move |_| step(&mut dashboard, Dashboard::open_dialog),
                            "+ Add Note"
                        }
                        button {
                            class: "btn btn-outline",
                            disabled: busy,
                            onclick: logout,
                            "Logout"
                        }
                    }
                }

                if state.notes.is_empty() {
                    div {
                        class: "empty-state",
                        div {
                            class: "empty-icon",
                            svg {
                                width: "24",
                                height: "24",
                                fill: "none",
                                view_box: "0 0 24 24",
                                stroke: "currentColor",
                                path {
                                    stroke_linecap: "round",
                                    stroke_linejoin: "round",
                                    stroke_width: "2",
                                    d: BOOK_ICON_PATH,
                                }
                            }
                        }
                        h3 { "No notes yet" }
                        p { class: "muted", "Get started by creating your first note." }
                        button {
                            class: "btn btn-primary",
                            onclick: move |_| step(&mut dashboard, Dashboard::open_dialog),
                            "+ New Note"
                        }
                    }
                } else {
                    div {
                        class: "notes-grid",
                        for note in state.notes.iter() {
                            NoteCard {
                                key: "{note.id}",
                                note: note.clone(),
                                busy: busy,
                                on_view: move |id: String| on_navigate.call(Destination::Note(id)),
                                on_delete: move |id: String| delete(id),
                            }
                        }
                    }
                }
            }
        }

        if state.dialog_open {
            ModalOverlay {
                label: "Create New Note",
                on_close: move |_| step(&mut dashboard, Dashboard::close_dialog),
                div {
                    class: "dialog-body",
                    h2 { class: "dialog-title", "Create New Note" }
                    form {
                        class: "note-form",
                        onsubmit: submit,
                        div {
                            label { r#for: "title", "Title" }
                            input {
                                id: "title",
                                placeholder: "Enter note title",
                                value: "{state.title}",
                                oninput: move |evt: FormEvent| dashboard.write().title = evt.value(),
                            }
                        }
                        div {
                            label { r#for: "content", "Content" }
                            input {
                                id: "content",
                                placeholder: "Enter your note content",
                                value: "{state.content}",
                                oninput: move |evt: FormEvent| dashboard.write().content = evt.value(),
                            }
                        }
                        button {
                            r#type: "submit",
                            class: "btn btn-primary btn-block",
                            disabled: busy,
                            if busy { "Saving..." } else { "Save Note" }
                        }
                    }
                }
            }
        }

        {state.alert.clone().map(|message| rsx! {
            ModalOverlay {
                label: "Alert",
                on_close: move |_| step(&mut dashboard, Dashboard::dismiss_alert),
                div {
                    class: "dialog-body",
                    p { "{message}" }
                    button {
                        class: "btn btn-primary",
                        onclick: move |_| step(&mut dashboard, Dashboard::dismiss_alert),
                        "OK"
                    }
                }
            }
        })}
    }
}
