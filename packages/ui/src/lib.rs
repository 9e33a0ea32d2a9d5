//! This crate contains all shared UI for the workspace.
//!
//! Views never own routing: each takes an `on_navigate` handler and reports a
//! [`Destination`], which the platform crate maps to its `Route`.

use dioxus::prelude::*;

pub mod state;
pub use state::Destination;

pub mod views;

/// Reload the whole app at `destination`, so every cached read is fetched again.
///
/// Outside the browser this falls back to client-side navigation.
pub fn reload_at(destination: Destination, on_navigate: EventHandler<Destination>) {
    #[cfg(target_arch = "wasm32")]
    {
        if let Some(window) = web_sys::window() {
            match window.location().set_href(&destination.path()) {
                Ok(()) => return,
                Err(e) => web_sys::console::warn_1(&e),
            }
        }
    }
    on_navigate.call(destination);
}
