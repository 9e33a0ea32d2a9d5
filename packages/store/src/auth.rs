//! # Password authentication flow
//!
//! A thin adapter over the backend's password sign-in and sign-up. The backend owns
//! every security decision; this module validates input locally, makes exactly one
//! backend call per submit, and turns the result into an [`AuthReply`] the login page
//! can render.
//!
//! Sign-up results are read like this:
//!
//! 1. the returned user has zero identities → the email is already registered;
//! 2. the returned user is confirmed → signed in, go to the dashboard;
//! 3. otherwise → a confirmation email was sent.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::backend::Backend;
use crate::error::{AppError, ValidationError, MIN_PASSWORD_LEN};
use crate::models::{AuthSession, SignUpResponse};

/// Where a successful sign-in lands.
pub const DASHBOARD_PATH: &str = "/dashboard";
/// Path appended to the deployment URL for the email-confirmation link.
pub const EMAIL_CALLBACK_PATH: &str = "/auth/callback";

pub const ALREADY_REGISTERED_MESSAGE: &str = "Account already exists. Please sign in instead.";
pub const CONFIRM_EMAIL_MESSAGE: &str = "Please check your email to confirm your account.";
pub const SIGN_IN_FALLBACK: &str = "Failed to sign in";
pub const SIGN_UP_FALLBACK: &str = "Failed to create account";

/// Email and password that passed local validation.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    /// Validate raw form input. No network call is made on failure.
    pub fn parse(email: &str, password: &str) -> Result<Self, ValidationError> {
        if email.is_empty() {
            return Err(ValidationError::MissingEmail);
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ValidationError::ShortPassword);
        }
        Ok(Self {
            email: email.to_string(),
            password: password.to_string(),
        })
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Follow-up suggested by a non-error notice.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoticeAction {
    /// Switch the form to sign-in mode.
    SignIn,
    /// Wait for the confirmation email.
    Confirm,
}

/// What the login page should do after a submit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuthReply {
    /// Show the message as an error.
    Failed { message: String },
    /// Show the message as a success notice.
    Notice { message: String, action: NoticeAction },
    /// Reload the app and go to `redirect_to`.
    Authenticated { redirect_to: String },
}

impl AuthReply {
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed {
            message: message.into(),
        }
    }

    pub fn authenticated() -> Self {
        Self::Authenticated {
            redirect_to: DASHBOARD_PATH.to_string(),
        }
    }
}

/// Interpretation of a sign-up response.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SignUpOutcome {
    AlreadyRegistered,
    /// The account is usable now; the session is present when the backend issued one.
    Confirmed(Option<AuthSession>),
    ConfirmationRequired,
}

impl SignUpOutcome {
    pub fn from_response(response: SignUpResponse) -> Self {
        let Some(user) = response.user else {
            return Self::ConfirmationRequired;
        };
        if matches!(&user.identities, Some(identities) if identities.is_empty()) {
            return Self::AlreadyRegistered;
        }
        if user.confirmed_at.is_some() {
            return Self::Confirmed(response.session);
        }
        Self::ConfirmationRequired
    }

    pub fn reply(&self) -> AuthReply {
        match self {
            Self::AlreadyRegistered => AuthReply::Notice {
                message: ALREADY_REGISTERED_MESSAGE.to_string(),
                action: NoticeAction::SignIn,
            },
            Self::Confirmed(_) => AuthReply::authenticated(),
            Self::ConfirmationRequired => AuthReply::Notice {
                message: CONFIRM_EMAIL_MESSAGE.to_string(),
                action: NoticeAction::Confirm,
            },
        }
    }
}

/// Build the confirmation link from the deployment base URL.
pub fn email_redirect_url(app_url: &str) -> String {
    format!("{}{EMAIL_CALLBACK_PATH}", app_url.trim_end_matches('/'))
}

/// Validate and sign in with a password.
pub async fn sign_in<B: Backend + ?Sized>(
    backend: &B,
    email: &str,
    password: &str,
) -> Result<AuthSession, AppError> {
    let credentials = Credentials::parse(email, password)?;
    let session = backend.sign_in_with_password(&credentials).await?;
    tracing::debug!(user = %session.user.id, "password sign-in succeeded");
    Ok(session)
}

/// Validate and register a new account.
pub async fn sign_up<B: Backend + ?Sized>(
    backend: &B,
    email: &str,
    password: &str,
    email_redirect_to: &str,
) -> Result<SignUpOutcome, AppError> {
    let credentials = Credentials::parse(email, password)?;
    let response = backend.sign_up(&credentials, email_redirect_to).await?;
    Ok(SignUpOutcome::from_response(response))
}
