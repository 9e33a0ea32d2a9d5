//! # Backend: the hosted auth + data service as an injected capability
//!
//! Every flow talks to the outside world through [`Backend`]. The hosted service owns
//! identity, password checks, session issuance and the `notes` table; this crate only
//! forwards calls and interprets results. Two implementations live in sibling modules:
//! [`crate::MemoryBackend`] (tests and local runs) and `SupabaseBackend` (HTTP, native
//! targets only).
//!
//! Data operations take the caller's access token. Ownership is enforced by the
//! service's row-level policy, never by the caller: a token only ever sees its own rows.

use std::sync::Arc;

use async_trait::async_trait;

use crate::auth::Credentials;
use crate::error::BackendError;
use crate::models::{AuthSession, NewNote, Note, SignUpResponse, UserInfo};

/// Name of the table holding notes.
pub const NOTES_TABLE: &str = "notes";

/// Operations consumed from the hosted service.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Resolve the user behind `access_token`. `Ok(None)` means "no valid session".
    async fn get_user(&self, access_token: &str) -> Result<Option<UserInfo>, BackendError>;

    async fn sign_in_with_password(
        &self,
        credentials: &Credentials,
    ) -> Result<AuthSession, BackendError>;

    /// Register an account; `email_redirect_to` is the confirmation link target.
    async fn sign_up(
        &self,
        credentials: &Credentials,
        email_redirect_to: &str,
    ) -> Result<SignUpResponse, BackendError>;

    /// Trade a refresh token for a new session. Refresh tokens are single use.
    async fn refresh_session(&self, refresh_token: &str) -> Result<AuthSession, BackendError>;

    async fn sign_out(&self, access_token: &str) -> Result<(), BackendError>;

    /// Insert a note and return the stored row with its id and timestamp.
    async fn insert_note(&self, access_token: &str, note: &NewNote)
        -> Result<Note, BackendError>;

    /// Notes of `owner`, newest first.
    async fn list_notes(&self, access_token: &str, owner: &str)
        -> Result<Vec<Note>, BackendError>;

    async fn get_note(&self, access_token: &str, id: &str) -> Result<Option<Note>, BackendError>;

    async fn delete_note(&self, access_token: &str, id: &str) -> Result<(), BackendError>;
}

/// Backend handle shared across requests.
pub type SharedBackend = Arc<dyn Backend>;
