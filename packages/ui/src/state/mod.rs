//! # Flow state machines
//!
//! Each page owns one plain state value and moves it forward with by-value transitions
//! (`fn(self, ..) -> Self`). Components hold the value in a [`Signal`] and apply
//! transitions with [`step`] / [`step_with`]; all rules live here, so they are tested
//! without a renderer.

use dioxus::prelude::*;
use serde::{Deserialize, Serialize};
use store::auth::DASHBOARD_PATH;

pub mod auth;
pub mod dashboard;
pub mod entry;
pub mod note;

pub use auth::{AuthForm, AuthMode, AuthStatus, Submission};
pub use dashboard::Dashboard;
pub use entry::EntryFlow;
pub use note::NoteView;

/// Page a flow asks the platform to show next.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Destination {
    Entry,
    Login,
    Dashboard,
    Note(String),
}

impl Destination {
    pub fn path(&self) -> String {
        match self {
            Self::Entry => "/".to_string(),
            Self::Login => "/login".to_string(),
            Self::Dashboard => DASHBOARD_PATH.to_string(),
            Self::Note(id) => format!("/notes/{id}"),
        }
    }

    pub fn from_path(path: &str) -> Option<Self> {
        match path {
            "/" => Some(Self::Entry),
            "/login" => Some(Self::Login),
            DASHBOARD_PATH => Some(Self::Dashboard),
            _ => path
                .strip_prefix("/notes/")
                .filter(|id| !id.is_empty() && !id.contains('/'))
                .map(|id| Self::Note(id.to_string())),
        }
    }
}

/// Replace the value in `signal` with `f(value)`.
///
/// Reads with `peek`, so calling this inside a resource does not subscribe to the
/// state it writes.
pub fn step<T: Clone + 'static>(signal: &mut Signal<T>, f: impl FnOnce(T) -> T) {
    let current = (*signal.peek()).clone();
    signal.set(f(current));
}

/// Like [`step`] for transitions that also produce an output.
pub fn step_with<T: Clone + 'static, R>(
    signal: &mut Signal<T>,
    f: impl FnOnce(T) -> (T, R),
) -> R {
    let current = (*signal.peek()).clone();
    let (next, output) = f(current);
    signal.set(next);
    output
}
