use dioxus::prelude::*;
use store::Note;

/// One note in the dashboard grid.
#[component]
pub fn NoteCard(
    note: Note,
    /// Disables the delete button while another call is pending.
    busy: bool,
    on_view: EventHandler<String>,
    on_delete: EventHandler<String>,
) -> Element {
    let view_id = note.id.clone();
    let delete_id = note.id.clone();
    let date = note.display_date();

    rsx! {
        div {
            class: "card",
            div {
                class: "card-header",
                h3 { class: "card-title clamp-1", "{note.title}" }
                p { class: "card-date", "{date}" }
            }
            p { class: "card-body clamp-3", "{note.content}" }
            div {
                class: "card-footer",
                button {
                    class: "btn btn-ghost btn-sm",
                    onclick: move |_| on_view.call(view_id.clone()),
                    "View"
                }
                button {
                    class: "btn btn-danger btn-sm",
                    disabled: busy,
                    onclick: move |_| on_delete.call(delete_id.clone()),
                    "Delete"
                }
            }
        }
    }
}
