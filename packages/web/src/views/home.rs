use dioxus::prelude::*;
use ui::views::EntryView;

use super::use_route_navigation;

#[component]
pub fn Home() -> Element {
    let on_navigate = use_route_navigation();
    rsx! {
        EntryView { on_navigate: on_navigate }
    }
}
