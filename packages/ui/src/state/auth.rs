//! Sign-in / sign-up form.
//!
//! `mode` picks the backend call, `status` is what the page shows under the heading.
//! Toggling the mode always clears the status.

use store::{AuthReply, Credentials, NoticeAction};

use super::Destination;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AuthMode {
    #[default]
    SignIn,
    SignUp,
}

impl AuthMode {
    pub fn toggled(self) -> Self {
        match self {
            Self::SignIn => Self::SignUp,
            Self::SignUp => Self::SignIn,
        }
    }

    pub fn heading(self) -> &'static str {
        match self {
            Self::SignIn => "Sign in to your account",
            Self::SignUp => "Create a new account",
        }
    }

    pub fn submit_label(self) -> &'static str {
        match self {
            Self::SignIn => "Sign in",
            Self::SignUp => "Sign up",
        }
    }

    /// Prompt and link text for switching to the other mode.
    pub fn switch_prompt(self) -> (&'static str, &'static str) {
        match self {
            Self::SignIn => ("Don't have an account? ", "Sign up"),
            Self::SignUp => ("Already have an account? ", "Sign in"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AuthStatus {
    #[default]
    Idle,
    Submitting,
    Error(String),
    Success {
        message: String,
        action: NoticeAction,
    },
}

/// A validated submit, ready for the matching server call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    SignIn {
        credentials: Credentials,
        remember: bool,
    },
    SignUp {
        credentials: Credentials,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthForm {
    pub mode: AuthMode,
    pub status: AuthStatus,
    pub email: String,
    pub password: String,
    /// Only sent in sign-in mode.
    pub remember: bool,
}

impl AuthForm {
    pub fn toggle_mode(self) -> Self {
        Self {
            mode: self.mode.toggled(),
            status: AuthStatus::Idle,
            ..self
        }
    }

    pub fn is_submitting(&self) -> bool {
        self.status == AuthStatus::Submitting
    }

    /// Validate locally. On failure the error is shown and nothing is sent.
    pub fn submit(self) -> (Self, Option<Submission>) {
        if self.is_submitting() {
            return (self, None);
        }
        let credentials = match Credentials::parse(&self.email, &self.password) {
            Ok(credentials) => credentials,
            Err(err) => {
                let status = AuthStatus::Error(err.to_string());
                return (Self { status, ..self }, None);
            }
        };
        let submission = match self.mode {
            AuthMode::SignIn => Submission::SignIn {
                credentials,
                remember: self.remember,
            },
            AuthMode::SignUp => Submission::SignUp { credentials },
        };
        let next = Self {
            status: AuthStatus::Submitting,
            ..self
        };
        (next, Some(submission))
    }

    /// Apply the server's answer; returns where to go on success.
    pub fn resolved(self, reply: AuthReply) -> (Self, Option<Destination>) {
        match reply {
            AuthReply::Failed { message } => {
                let next = Self {
                    status: AuthStatus::Error(message),
                    ..self
                };
                (next, None)
            }
            AuthReply::Notice { message, action } => {
                let mode = match action {
                    NoticeAction::SignIn => AuthMode::SignIn,
                    NoticeAction::Confirm => self.mode,
                };
                let next = Self {
                    mode,
                    status: AuthStatus::Success { message, action },
                    ..self
                };
                (next, None)
            }
            AuthReply::Authenticated { redirect_to } => {
                let destination =
                    Destination::from_path(&redirect_to).unwrap_or(Destination::Dashboard);
                (self, Some(destination))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use store::auth::{ALREADY_REGISTERED_MESSAGE, CONFIRM_EMAIL_MESSAGE};
    use store::MemoryBackend;

    use super::*;

    fn filled(mode: AuthMode, email: &str, password: &str) -> AuthForm {
        AuthForm {
            mode,
            email: email.to_string(),
            password: password.to_string(),
            ..AuthForm::default()
        }
    }

    #[test]
    fn toggling_mode_resets_status() {
        let form = AuthForm {
            status: AuthStatus::Error("Invalid login credentials".to_string()),
            ..AuthForm::default()
        };
        let form = form.toggle_mode();
        assert_eq!(form.mode, AuthMode::SignUp);
        assert_eq!(form.status, AuthStatus::Idle);
        assert_eq!(form.toggle_mode().mode, AuthMode::SignIn);
    }

    #[test]
    fn short_password_is_rejected_locally() {
        let (form, submission) = filled(AuthMode::SignIn, "a@b.com", "12345").submit();
        assert_eq!(submission, None);
        assert_eq!(
            form.status,
            AuthStatus::Error("Password must be at least 6 characters".to_string())
        );
    }

    #[test]
    fn missing_email_is_rejected_locally() {
        let (form, submission) = filled(AuthMode::SignUp, "", "secret1").submit();
        assert_eq!(submission, None);
        assert_eq!(
            form.status,
            AuthStatus::Error("Valid email is required".to_string())
        );
    }

    #[test]
    fn remember_is_sent_only_when_signing_in() {
        let mut form = filled(AuthMode::SignIn, "a@b.com", "secret1");
        form.remember = true;
        let (form, submission) = form.submit();
        assert!(form.is_submitting());
        assert!(matches!(
            submission,
            Some(Submission::SignIn { remember: true, .. })
        ));

        let mut form = filled(AuthMode::SignUp, "a@b.com", "secret1");
        form.remember = true;
        let (_, submission) = form.submit();
        assert!(matches!(submission, Some(Submission::SignUp { .. })));
    }

    #[test]
    fn no_second_submit_while_pending() {
        let (form, _) = filled(AuthMode::SignIn, "a@b.com", "secret1").submit();
        let (_, again) = form.submit();
        assert_eq!(again, None);
    }

    #[test]
    fn backend_error_is_shown_verbatim() {
        let (form, _) = filled(AuthMode::SignIn, "a@b.com", "secret1").submit();
        let (form, destination) = form.resolved(AuthReply::failed("Invalid login credentials"));
        assert_eq!(destination, None);
        assert_eq!(
            form.status,
            AuthStatus::Error("Invalid login credentials".to_string())
        );
        assert!(!form.is_submitting());
    }

    #[test]
    fn already_registered_switches_to_sign_in() {
        let (form, _) = filled(AuthMode::SignUp, "a@b.com", "secret1").submit();
        let reply = AuthReply::Notice {
            message: ALREADY_REGISTERED_MESSAGE.to_string(),
            action: NoticeAction::SignIn,
        };
        let (form, destination) = form.resolved(reply);
        assert_eq!(destination, None);
        assert_eq!(form.mode, AuthMode::SignIn);
        assert_eq!(
            form.status,
            AuthStatus::Success {
                message: ALREADY_REGISTERED_MESSAGE.to_string(),
                action: NoticeAction::SignIn,
            }
        );
    }

    #[test]
    fn confirmation_notice_keeps_sign_up_mode() {
        let (form, _) = filled(AuthMode::SignUp, "a@b.com", "secret1").submit();
        let reply = AuthReply::Notice {
            message: CONFIRM_EMAIL_MESSAGE.to_string(),
            action: NoticeAction::Confirm,
        };
        let (form, destination) = form.resolved(reply);
        assert_eq!(destination, None);
        assert_eq!(form.mode, AuthMode::SignUp);
    }

    #[test]
    fn success_goes_to_dashboard() {
        let (form, _) = filled(AuthMode::SignIn, "a@b.com", "secret1").submit();
        let (_, destination) = form.resolved(AuthReply::authenticated());
        assert_eq!(destination, Some(Destination::Dashboard));
    }

    #[tokio::test]
    async fn existing_account_sign_up_against_backend() {
        let backend = MemoryBackend::new();
        backend.register_confirmed("a@b.com", "secret1").await;

        let (form, submission) = filled(AuthMode::SignUp, "a@b.com", "secret1").submit();
        let Some(Submission::SignUp { credentials }) = submission else {
            panic!("expected a sign-up submission");
        };
        let outcome = store::auth::sign_up(
            &backend,
            &credentials.email,
            &credentials.password,
            "http://localhost:8080/auth/callback",
        )
        .await
        .unwrap();

        let (form, _) = form.resolved(outcome.reply());
        assert_eq!(form.mode, AuthMode::SignIn);
        assert!(matches!(form.status, AuthStatus::Success { .. }));
    }
}
