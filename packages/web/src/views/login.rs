//! Login page: sign-in and sign-up share one form.

use dioxus::prelude::*;
use ui::views::LoginView;

use super::use_route_navigation;

#[component]
pub fn Login() -> Element {
    let on_navigate = use_route_navigation();
    rsx! {
        LoginView { on_navigate: on_navigate }
    }
}
