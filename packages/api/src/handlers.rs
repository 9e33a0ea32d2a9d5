//! # Server-side bodies of the server functions
//!
//! Each handler takes the injected [`AppContext`] and the visitor's [`Session`]
//! explicitly, so the whole request path runs in tests against
//! [`store::MemoryBackend`] without an HTTP server.
//!
//! Backend failures are logged here, then handed to the caller: auth handlers fold
//! them into an [`AuthReply`] carrying the backend's message, data handlers return
//! them as errors.
//!
//! A stored access token past its `expires_at` is traded for a new one with the
//! stored refresh token before use. When the backend refuses the refresh, the stored
//! session is dropped and the visitor counts as signed out.

use store::auth::{self, SIGN_IN_FALLBACK, SIGN_UP_FALLBACK};
use store::{notes, AppError, AuthReply, AuthSession, BackendError, NewNote, Note, SignUpOutcome, UserInfo};
use thiserror::Error;
use tower_sessions::cookie::Cookie;
use tower_sessions::Session;

use crate::auth::{
    cleared_remember_cookie, forget_auth, load_auth, remember_cookie, renew_auth, store_auth,
};
use crate::context::AppContext;

/// Failure of a server function on the server side.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    App(#[from] AppError),
    #[error("session store error: {0}")]
    Session(#[from] tower_sessions::session::Error),
    #[error("could not encode session cookie: {0}")]
    Cookie(#[from] serde_json::Error),
}

impl From<BackendError> for ApiError {
    fn from(err: BackendError) -> Self {
        Self::App(err.into())
    }
}

/// Reply to a password sign-in, plus the cookie to set when "remember me" was checked.
#[derive(Debug)]
pub struct LoginResult {
    pub reply: AuthReply,
    pub remember_cookie: Option<Cookie<'static>>,
}

/// The signed-in user, as confirmed by the backend.
///
/// A token the backend rejects gets one refresh; a stored session that still does not
/// resolve to a user is dropped.
pub async fn current_user(ctx: &AppContext, session: &Session) -> Result<Option<UserInfo>, ApiError> {
    let Some(auth) = fresh_auth(ctx, session).await? else {
        return Ok(None);
    };
    if let Some(user) = ctx.backend.get_user(&auth.access_token).await? {
        return Ok(Some(user));
    }

    // Revoked, or expired ahead of `expires_at`.
    let Some(auth) = refresh_auth(ctx, session, &auth).await? else {
        return Ok(None);
    };
    let user = ctx.backend.get_user(&auth.access_token).await?;
    if user.is_none() {
        tracing::info!(user = %auth.user.id, "stored session rejected by backend");
        forget_auth(session).await?;
    }
    Ok(user)
}

pub async fn login(
    ctx: &AppContext,
    session: &Session,
    email: &str,
    password: &str,
    remember: bool,
) -> Result<LoginResult, ApiError> {
    let auth = match auth::sign_in(ctx.backend.as_ref(), email, password).await {
        Ok(auth) => auth,
        Err(err) => {
            log_rejection("sign-in", &err);
            return Ok(LoginResult {
                reply: AuthReply::failed(err.user_message(SIGN_IN_FALLBACK)),
                remember_cookie: None,
            });
        }
    };

    store_auth(session, &auth, remember).await?;
    let remember_cookie = if remember {
        Some(remember_cookie(&auth)?)
    } else {
        None
    };
    tracing::info!(user = %auth.user.id, remember, "signed in");
    Ok(LoginResult {
        reply: AuthReply::authenticated(),
        remember_cookie,
    })
}

pub async fn signup(
    ctx: &AppContext,
    session: &Session,
    email: &str,
    password: &str,
) -> Result<AuthReply, ApiError> {
    let outcome = match auth::sign_up(
        ctx.backend.as_ref(),
        email,
        password,
        &ctx.email_redirect_to,
    )
    .await
    {
        Ok(outcome) => outcome,
        Err(err) => {
            log_rejection("sign-up", &err);
            return Ok(AuthReply::failed(err.user_message(SIGN_UP_FALLBACK)));
        }
    };

    if let SignUpOutcome::Confirmed(Some(auth)) = &outcome {
        store_auth(session, auth, false).await?;
        tracing::info!(user = %auth.user.id, "signed up and signed in");
    }
    Ok(outcome.reply())
}

/// Sign out at the backend, then clear the session.
///
/// A token the backend already considers dead still counts as signed out. Returns the
/// cookie that overwrites a remembered sign-in in the browser.
pub async fn sign_out(ctx: &AppContext, session: &Session) -> Result<Cookie<'static>, ApiError> {
    if let Some(auth) = load_auth(session).await? {
        match ctx.backend.sign_out(&auth.access_token).await {
            Ok(()) => {}
            Err(err) if matches!(err.status(), Some(401 | 403 | 404)) => {
                tracing::debug!(error = %err, "backend session already gone");
            }
            Err(err) => {
                tracing::error!(error = %err, "Error logging out");
                return Err(err.into());
            }
        }
    }
    forget_auth(session).await?;
    Ok(cleared_remember_cookie())
}

pub async fn list_notes(ctx: &AppContext, session: &Session) -> Result<Vec<Note>, ApiError> {
    let auth = require_auth(ctx, session).await?;
    notes::list_notes(ctx.backend.as_ref(), &auth.access_token, &auth.user.id)
        .await
        .map_err(|err| {
            tracing::error!(error = %err, "Error fetching data");
            err.into()
        })
}

pub async fn add_note(
    ctx: &AppContext,
    session: &Session,
    title: &str,
    content: &str,
) -> Result<Note, ApiError> {
    let auth = require_auth(ctx, session).await?;
    let note = NewNote::new(Some(&auth.user.id), title, content)?;
    notes::create_note(ctx.backend.as_ref(), &auth.access_token, &note)
        .await
        .map_err(|err| {
            tracing::error!(error = %err, "Error adding note");
            err.into()
        })
}

pub async fn get_note(
    ctx: &AppContext,
    session: &Session,
    id: &str,
) -> Result<Option<Note>, ApiError> {
    let auth = require_auth(ctx, session).await?;
    Ok(ctx.backend.get_note(&auth.access_token, id).await?)
}

pub async fn delete_note(ctx: &AppContext, session: &Session, id: &str) -> Result<(), ApiError> {
    let auth = require_auth(ctx, session).await?;
    notes::delete_note(ctx.backend.as_ref(), &auth.access_token, id)
        .await
        .map_err(|err| {
            tracing::error!(error = %err, note = id, "Error deleting note");
            err.into()
        })
}

async fn require_auth(ctx: &AppContext, session: &Session) -> Result<AuthSession, ApiError> {
    fresh_auth(ctx, session)
        .await?
        .ok_or(ApiError::App(AppError::Unauthenticated))
}

/// The stored backend session, refreshed first when its access token has expired.
async fn fresh_auth(ctx: &AppContext, session: &Session) -> Result<Option<AuthSession>, ApiError> {
    match load_auth(session).await? {
        Some(auth) if auth.is_expired() => refresh_auth(ctx, session, &auth).await,
        stored => Ok(stored),
    }
}

/// Trade the stored refresh token for a new backend session and keep it.
///
/// `Ok(None)` when the backend refuses; the stored session is dropped in that case.
/// Transport and server failures are returned without touching the session.
async fn refresh_auth(
    ctx: &AppContext,
    session: &Session,
    stale: &AuthSession,
) -> Result<Option<AuthSession>, ApiError> {
    if stale.refresh_token.is_empty() {
        forget_auth(session).await?;
        return Ok(None);
    }
    match ctx.backend.refresh_session(&stale.refresh_token).await {
        Ok(fresh) => {
            renew_auth(session, &fresh).await?;
            tracing::debug!(user = %fresh.user.id, "backend session refreshed");
            Ok(Some(fresh))
        }
        Err(err) if matches!(err.status(), Some(400..=499)) => {
            tracing::info!(user = %stale.user.id, error = %err, "refresh rejected by backend");
            forget_auth(session).await?;
            Ok(None)
        }
        Err(err) => {
            tracing::error!(error = %err, "Error refreshing session");
            Err(err.into())
        }
    }
}

fn log_rejection(operation: &str, err: &AppError) {
    match err {
        AppError::Backend(err) => tracing::warn!(error = %err, "{operation} rejected by backend"),
        AppError::Validation(_) | AppError::Unauthenticated => {}
    }
}
