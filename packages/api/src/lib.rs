//! # API crate: server functions for the notes app
//!
//! Every public `async fn` in this file is a Dioxus server function. With the `server`
//! feature its body runs on the server against the [`AppContext`] installed at launch
//! and the visitor's tower-sessions [`Session`](tower_sessions::Session); without it
//! the macro leaves a client stub that forwards the call over HTTP.
//!
//! | Module | Feature gate | Purpose |
//! |--------|-------------|---------|
//! | [`auth`] | `server` | Backend session storage and the remember-me cookie |
//! | [`context`] | `server` | [`AppContext`] and per-request extraction |
//! | [`handlers`] | `server` | Testable bodies of the server functions |
//! | [`settings`] | `server` | Layered configuration and backend selection |
//!
//! Auth calls never fail for a rejected sign-in: the outcome, including the backend's
//! message, comes back as an [`AuthReply`]. Note calls fail with the error message.

use dioxus::prelude::*;

pub mod auth;
#[cfg(feature = "server")]
pub mod context;
#[cfg(feature = "server")]
pub mod handlers;
#[cfg(feature = "server")]
pub mod settings;

#[cfg(feature = "server")]
pub use context::AppContext;
#[cfg(feature = "server")]
pub use settings::Settings;

pub use store::{AuthReply, Note, NoticeAction, UserInfo};

#[cfg(feature = "server")]
fn server_error(err: handlers::ApiError) -> ServerFnError {
    ServerFnError::new(err.to_string())
}

/// Add a `Set-Cookie` header to the server function's response.
#[cfg(feature = "server")]
fn append_cookie(cookie: &tower_sessions::cookie::Cookie<'_>) -> Result<(), ServerFnError> {
    let value = http::HeaderValue::from_str(&cookie.to_string())
        .map_err(|e| ServerFnError::new(e.to_string()))?;
    server_context()
        .response_parts_mut()
        .headers
        .append(http::header::SET_COOKIE, value);
    Ok(())
}

/// The signed-in user, or `None` when there is no valid session.
#[server]
pub async fn get_current_user() -> Result<Option<UserInfo>, ServerFnError> {
    let (ctx, session) = context::request_scope().await?;
    handlers::current_user(&ctx, &session)
        .await
        .map_err(server_error)
}

/// Sign in with email and password.
///
/// With `remember` the session lasts 30 days and a `session` cookie is set.
#[server]
pub async fn login(
    email: String,
    password: String,
    remember: bool,
) -> Result<AuthReply, ServerFnError> {
    let (ctx, session) = context::request_scope().await?;
    let result = handlers::login(&ctx, &session, &email, &password, remember)
        .await
        .map_err(server_error)?;

    if let Some(cookie) = &result.remember_cookie {
        append_cookie(cookie)?;
    }
    Ok(result.reply)
}

/// Create an account; the confirmation link points at `/auth/callback`.
#[server]
pub async fn signup(email: String, password: String) -> Result<AuthReply, ServerFnError> {
    let (ctx, session) = context::request_scope().await?;
    handlers::signup(&ctx, &session, &email, &password)
        .await
        .map_err(server_error)
}

/// Sign out and expire the remember-me cookie.
#[server]
pub async fn sign_out() -> Result<(), ServerFnError> {
    let (ctx, session) = context::request_scope().await?;
    let cookie = handlers::sign_out(&ctx, &session)
        .await
        .map_err(server_error)?;
    append_cookie(&cookie)
}

/// Notes of the signed-in user, newest first.
#[server]
pub async fn list_notes() -> Result<Vec<Note>, ServerFnError> {
    let (ctx, session) = context::request_scope().await?;
    handlers::list_notes(&ctx, &session)
        .await
        .map_err(server_error)
}

/// Create a note owned by the signed-in user.
#[server]
pub async fn add_note(title: String, content: String) -> Result<Note, ServerFnError> {
    let (ctx, session) = context::request_scope().await?;
    handlers::add_note(&ctx, &session, &title, &content)
        .await
        .map_err(server_error)
}

#[server]
pub async fn get_note(id: String) -> Result<Option<Note>, ServerFnError> {
    let (ctx, session) = context::request_scope().await?;
    handlers::get_note(&ctx, &session, &id)
        .await
        .map_err(server_error)
}

#[server]
pub async fn delete_note(id: String) -> Result<(), ServerFnError> {
    let (ctx, session) = context::request_scope().await?;
    handlers::delete_note(&ctx, &session, &id)
        .await
        .map_err(server_error)
}
