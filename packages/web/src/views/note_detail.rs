use dioxus::prelude::*;
use ui::views::NoteDetailView;

use super::use_route_navigation;

#[component]
pub fn NoteDetail(id: String) -> Element {
    let on_navigate = use_route_navigation();
    rsx! {
        NoteDetailView { id: id, on_navigate: on_navigate }
    }
}
