use dioxus::prelude::*;

use crate::state::NoteView;
use crate::Destination;

/// Read-only view of one note.
#[component]
pub fn NoteDetailView(id: String, on_navigate: EventHandler<Destination>) -> Element {
    // Track the id in a signal so the resource re-runs on route param change
    let mut id_signal = use_signal(|| id.clone());
    if *id_signal.peek() != id {
        id_signal.set(id.clone());
    }

    let note = use_resource(move || {
        let id = id_signal();
        async move { NoteView::from_result(api::get_note(id).await) }
    });

    let body = match &*note.read() {
        None => rsx! {
            div { class: "spinner spinner-dark", aria_label: "Loading" }
        },
        Some(NoteView::NotFound) => rsx! {
            p { class: "muted", "Note not found" }
        },
        Some(NoteView::Found(found)) => {
            let date = found.display_date();
            rsx! {
                article {
                    class: "card note-detail",
                    h1 { class: "dashboard-title", "{found.title}" }
                    p { class: "card-date", "{date}" }
                    p { class: "note-content", "{found.content}" }
                }
            }
        }
    };

    rsx! {
        div {
            class: "dashboard-page",
            div {
                class: "dashboard-inner",
                button {
                    class: "btn btn-outline",
                    style: "margin-bottom: 1rem;",
                    onclick: move |_| on_navigate.call(Destination::Dashboard),
                    "Back to notes"
                }
                {body}
            }
        }
    }
}
