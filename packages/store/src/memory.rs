use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tokio::sync::Mutex;

use crate::auth::Credentials;
use crate::backend::{Backend, NOTES_TABLE};
use crate::error::BackendError;
use crate::models::{AuthSession, AuthUser, Identity, NewNote, Note, SignUpResponse, UserInfo};

/// Lifetime reported for issued access tokens, in seconds.
const TOKEN_LIFETIME_SECS: i64 = 3600;

/// In-memory Backend for testing and local runs.
///
/// Behaves like the hosted service where the application can observe it: rows are
/// only visible to the token's owner, an already-registered email signs up to a user
/// with no identities, and unconfirmed accounts cannot sign in unless auto-confirm
/// is on. Access tokens stop working at their `expires_at` and each one comes with a
/// single-use refresh token; signing out revokes both.
#[derive(Clone, Debug, Default)]
pub struct MemoryBackend {
    state: Arc<Mutex<MemoryState>>,
    calls: Arc<AtomicUsize>,
    auto_confirm: bool,
}

#[derive(Debug, Default)]
struct MemoryState {
    users: Vec<MemoryUser>,
    /// access token -> issued token
    sessions: HashMap<String, IssuedToken>,
    /// refresh token -> user id
    refresh_tokens: HashMap<String, String>,
    /// Insertion order.
    notes: Vec<Note>,
    user_seq: u64,
    note_seq: u64,
    token_seq: u64,
    last_created_at: Option<DateTime<Utc>>,
    last_email_redirect: Option<String>,
}

#[derive(Debug, Clone)]
struct IssuedToken {
    user_id: String,
    expires_at: DateTime<Utc>,
    refresh_token: String,
}

#[derive(Debug, Clone)]
struct MemoryUser {
    id: String,
    email: String,
    password: String,
    confirmed_at: Option<DateTime<Utc>>,
}

impl MemoryUser {
    fn to_auth_user(&self) -> AuthUser {
        AuthUser {
            id: self.id.clone(),
            email: Some(self.email.clone()),
            confirmed_at: self.confirmed_at,
            identities: Some(vec![Identity {
                provider: "email".to_string(),
            }]),
        }
    }
}

impl MemoryState {
    fn user_by_email(&self, email: &str) -> Option<&MemoryUser> {
        self.users
            .iter()
            .find(|u| u.email.eq_ignore_ascii_case(email.trim()))
    }

    fn user_for_token(&self, access_token: &str) -> Result<&MemoryUser, BackendError> {
        let token = self
            .sessions
            .get(access_token)
            .filter(|token| token.expires_at > Utc::now())
            .ok_or(BackendError::Unauthenticated)?;
        self.users
            .iter()
            .find(|u| u.id == token.user_id)
            .ok_or(BackendError::Unauthenticated)
    }

    fn add_user(&mut self, email: &str, password: &str, confirmed: bool) -> MemoryUser {
        self.user_seq += 1;
        let user = MemoryUser {
            id: format!("user-{}", self.user_seq),
            email: email.trim().to_lowercase(),
            password: password.to_string(),
            confirmed_at: confirmed.then(Utc::now),
        };
        self.users.push(user.clone());
        user
    }

    fn issue_session(&mut self, user: &MemoryUser) -> AuthSession {
        self.token_seq += 1;
        let access_token = format!("memory-access-{}", self.token_seq);
        let refresh_token = format!("memory-refresh-{}", self.token_seq);
        let expires_at = Utc::now() + Duration::seconds(TOKEN_LIFETIME_SECS);
        self.sessions.insert(
            access_token.clone(),
            IssuedToken {
                user_id: user.id.clone(),
                expires_at,
                refresh_token: refresh_token.clone(),
            },
        );
        self.refresh_tokens
            .insert(refresh_token.clone(), user.id.clone());
        AuthSession {
            access_token,
            token_type: "bearer".to_string(),
            expires_in: TOKEN_LIFETIME_SECS,
            expires_at: Some(expires_at.timestamp()),
            refresh_token,
            user: user.to_auth_user(),
        }
    }

    /// Strictly increasing timestamps keep "newest first" well defined.
    fn next_created_at(&mut self) -> DateTime<Utc> {
        let now = Utc::now();
        let created_at = match self.last_created_at {
            Some(last) if now <= last => last + Duration::microseconds(1),
            _ => now,
        };
        self.last_created_at = Some(created_at);
        created_at
    }

    fn push_note(&mut self, note: &NewNote, created_at: DateTime<Utc>) -> Note {
        self.note_seq += 1;
        let stored = Note {
            id: format!("n{}", self.note_seq),
            title: note.title.clone(),
            content: note.content.clone(),
            created_at,
            user_id: note.user_id.clone(),
        };
        self.notes.push(stored.clone());
        stored
    }
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// A backend whose sign-ups are confirmed immediately.
    pub fn with_auto_confirm() -> Self {
        Self {
            auto_confirm: true,
            ..Self::default()
        }
    }

    /// Number of [`Backend`] calls made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Confirmation link passed to the most recent sign-up.
    pub async fn last_email_redirect(&self) -> Option<String> {
        self.state.lock().await.last_email_redirect.clone()
    }

    /// Create a confirmed account without going through sign-up.
    pub async fn register_confirmed(&self, email: &str, password: &str) -> UserInfo {
        let mut state = self.state.lock().await;
        state.add_user(email, password, true).to_auth_user().to_info()
    }

    /// Create a confirmed account and return a live session for it.
    pub async fn register_and_sign_in(&self, email: &str, password: &str) -> AuthSession {
        let mut state = self.state.lock().await;
        let user = state.add_user(email, password, true);
        state.issue_session(&user)
    }

    /// Mark a pending account as confirmed, as following the email link would.
    pub async fn confirm_email(&self, email: &str) -> bool {
        let mut state = self.state.lock().await;
        let Some(user) = state
            .users
            .iter_mut()
            .find(|u| u.email.eq_ignore_ascii_case(email.trim()))
        else {
            return false;
        };
        user.confirmed_at.get_or_insert_with(Utc::now);
        true
    }

    /// Make an access token expire now, as the clock running out would.
    pub async fn expire_access_token(&self, access_token: &str) -> bool {
        let mut state = self.state.lock().await;
        let Some(token) = state.sessions.get_mut(access_token) else {
            return false;
        };
        token.expires_at = Utc::now() - Duration::seconds(1);
        true
    }

    /// Store a note with a fixed timestamp, bypassing ownership checks.
    pub async fn seed_note(
        &self,
        owner: &str,
        title: &str,
        content: &str,
        created_at: DateTime<Utc>,
    ) -> Note {
        let mut state = self.state.lock().await;
        let note = NewNote {
            title: title.to_string(),
            content: content.to_string(),
            user_id: owner.to_string(),
        };
        state.push_note(&note, created_at)
    }

    fn record_call(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl Backend for MemoryBackend {
    async fn get_user(&self, access_token: &str) -> Result<Option<UserInfo>, BackendError> {
        self.record_call();
        let state = self.state.lock().await;
        Ok(state
            .user_for_token(access_token)
            .ok()
            .map(|u| u.to_auth_user().to_info()))
    }

    async fn sign_in_with_password(
        &self,
        credentials: &Credentials,
    ) -> Result<AuthSession, BackendError> {
        self.record_call();
        let mut state = self.state.lock().await;
        let user = match state.user_by_email(&credentials.email) {
            Some(user) if user.password == credentials.password => user.clone(),
            _ => {
                return Err(BackendError::Api {
                    status: 400,
                    message: "Invalid login credentials".to_string(),
                })
            }
        };
        if user.confirmed_at.is_none() && !self.auto_confirm {
            return Err(BackendError::Api {
                status: 400,
                message: "Email not confirmed".to_string(),
            });
        }
        Ok(state.issue_session(&user))
    }

    async fn sign_up(
        &self,
        credentials: &Credentials,
        email_redirect_to: &str,
    ) -> Result<SignUpResponse, BackendError> {
        self.record_call();
        let mut state = self.state.lock().await;
        state.last_email_redirect = Some(email_redirect_to.to_string());

        if let Some(existing) = state.user_by_email(&credentials.email) {
            // The real service answers with an obfuscated user rather than an error.
            return Ok(SignUpResponse {
                user: Some(AuthUser {
                    id: existing.id.clone(),
                    email: Some(existing.email.clone()),
                    confirmed_at: None,
                    identities: Some(Vec::new()),
                }),
                session: None,
            });
        }

        let user = state.add_user(&credentials.email, &credentials.password, self.auto_confirm);
        let session = self.auto_confirm.then(|| state.issue_session(&user));
        Ok(SignUpResponse {
            user: Some(user.to_auth_user()),
            session,
        })
    }

    async fn refresh_session(&self, refresh_token: &str) -> Result<AuthSession, BackendError> {
        self.record_call();
        let mut state = self.state.lock().await;
        let user_id = state.refresh_tokens.remove(refresh_token);
        let user = user_id
            .and_then(|id| state.users.iter().find(|u| u.id == id).cloned())
            .ok_or_else(|| BackendError::Api {
                status: 400,
                message: "Invalid Refresh Token: Refresh Token Not Found".to_string(),
            })?;
        // The access token issued alongside the spent refresh token is retired too.
        state
            .sessions
            .retain(|_, token| token.refresh_token != refresh_token);
        Ok(state.issue_session(&user))
    }

    async fn sign_out(&self, access_token: &str) -> Result<(), BackendError> {
        self.record_call();
        let mut state = self.state.lock().await;
        let token = state
            .sessions
            .remove(access_token)
            .ok_or(BackendError::Unauthenticated)?;
        state.refresh_tokens.remove(&token.refresh_token);
        Ok(())
    }

    async fn insert_note(&self, access_token: &str, note: &NewNote) -> Result<Note, BackendError> {
        self.record_call();
        let mut state = self.state.lock().await;
        let caller = state.user_for_token(access_token)?.id.clone();
        if note.user_id != caller {
            return Err(BackendError::Api {
                status: 403,
                message: format!(
                    "new row violates row-level security policy for table \"{NOTES_TABLE}\""
                ),
            });
        }
        let created_at = state.next_created_at();
        Ok(state.push_note(note, created_at))
    }

    async fn list_notes(&self, access_token: &str, owner: &str) -> Result<Vec<Note>, BackendError> {
        self.record_call();
        let state = self.state.lock().await;
        let caller = &state.user_for_token(access_token)?.id;
        // Walk newest-inserted first so equal timestamps stay newest first after the stable sort.
        let mut notes: Vec<Note> = state
            .notes
            .iter()
            .rev()
            .filter(|n| &n.user_id == caller && n.user_id == owner)
            .cloned()
            .collect();
        notes.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(notes)
    }

    async fn get_note(&self, access_token: &str, id: &str) -> Result<Option<Note>, BackendError> {
        self.record_call();
        let state = self.state.lock().await;
        let caller = &state.user_for_token(access_token)?.id;
        Ok(state
            .notes
            .iter()
            .find(|n| n.id == id && &n.user_id == caller)
            .cloned())
    }

    async fn delete_note(&self, access_token: &str, id: &str) -> Result<(), BackendError> {
        self.record_call();
        let mut state = self.state.lock().await;
        let caller = state.user_for_token(access_token)?.id.clone();
        state.notes.retain(|n| !(n.id == id && n.user_id == caller));
        Ok(())
    }
}
