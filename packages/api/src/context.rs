//! Per-request access to the injected backend and the visitor's session.

use axum::Extension;
use dioxus::prelude::*;
use store::SharedBackend;
use tower_sessions::Session;

/// Everything server functions need besides the session, installed as an axum
/// [`Extension`] at launch.
#[derive(Clone)]
pub struct AppContext {
    pub backend: SharedBackend,
    /// Target of the email-confirmation link sent on sign-up.
    pub email_redirect_to: String,
}

impl AppContext {
    pub fn new(backend: SharedBackend, email_redirect_to: impl Into<String>) -> Self {
        Self {
            backend,
            email_redirect_to: email_redirect_to.into(),
        }
    }
}

/// Pull the app context and session out of the current request.
pub(crate) async fn request_scope() -> Result<(AppContext, Session), ServerFnError> {
    let Extension(ctx) = extract::<Extension<AppContext>, _>()
        .await
        .map_err(|e| ServerFnError::new(format!("app context missing: {e:?}")))?;
    let session = extract::<Session, _>()
        .await
        .map_err(|e| ServerFnError::new(format!("session unavailable: {e:?}")))?;
    Ok((ctx, session))
}
