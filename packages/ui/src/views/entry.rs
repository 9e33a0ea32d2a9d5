use dioxus::prelude::*;

use crate::state::{step, step_with, EntryFlow};
use crate::Destination;

/// Landing page with a single "Start taking notes" button.
#[component]
pub fn EntryView(on_navigate: EventHandler<Destination>) -> Element {
    let mut flow = use_signal(EntryFlow::default);

    let _identity = use_resource(move || async move {
        if let Err(e) = api::get_current_user().await {
            tracing::warn!("identity check failed: {e}");
        }
        step(&mut flow, EntryFlow::identity_checked);
    });

    let start = move |_| async move {
        step(&mut flow, EntryFlow::start);
        let signed_in = match api::get_current_user().await {
            Ok(user) => user.is_some(),
            Err(e) => {
                tracing::warn!("identity check failed: {e}");
                false
            }
        };
        let destination = step_with(&mut flow, |f| f.started(signed_in));
        on_navigate.call(destination);
    };

    rsx! {
        div {
            class: "entry-page",
            if flow().loading {
                div { class: "spinner", aria_label: "Loading" }
            } else {
                div {
                    style: "display: flex; flex-direction: column; align-items: center; gap: 1.25rem;",
                    h1 { class: "entry-title", "Note Taker" }
                    button {
                        class: "btn btn-light",
                        disabled: flow().loading,
                        onclick: start,
                        "Start taking notes"
                    }
                }
            }
        }
    }
}
