use dioxus::prelude::*;
use ui::views::DashboardView;

use super::use_route_navigation;

#[component]
pub fn Dashboard() -> Element {
    let on_navigate = use_route_navigation();
    rsx! {
        DashboardView { on_navigate: on_navigate }
    }
}
