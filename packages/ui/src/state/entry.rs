//! Landing page: check for a session, then route on "Start".

use super::Destination;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryFlow {
    pub loading: bool,
}

impl Default for EntryFlow {
    fn default() -> Self {
        Self { loading: true }
    }
}

impl EntryFlow {
    /// The first identity check finished. Its answer is not kept; "Start" asks again.
    pub fn identity_checked(self) -> Self {
        Self { loading: false }
    }

    pub fn start(self) -> Self {
        Self { loading: true }
    }

    /// Route after the second identity check.
    pub fn started(self, signed_in: bool) -> (Self, Destination) {
        let destination = if signed_in {
            Destination::Dashboard
        } else {
            Destination::Login
        };
        (self, destination)
    }
}
