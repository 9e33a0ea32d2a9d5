//! # Domain models for notes, users and sessions
//!
//! These types are `Serialize + Deserialize` so they can cross the server/client
//! boundary via Dioxus server functions, and so they decode directly from the hosted
//! backend's JSON. Identifiers stay `String` so the same types work in WASM.
//!
//! | Struct | Represents |
//! |--------|-----------|
//! | [`Note`] | A row of the `notes` table, owned by one user. |
//! | [`NewNote`] | The insert payload; id and timestamp are assigned by the backend. |
//! | [`AuthUser`] | The user object returned by the auth API. |
//! | [`UserInfo`] | Client-safe projection of [`AuthUser`]. |
//! | [`AuthSession`] | Tokens plus user returned by a password sign-in. |
//! | [`SignUpResponse`] | Result of a sign-up: a user, and a session when no confirmation is needed. |

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::BackendError;

/// Access tokens this close to `expires_at` are treated as already expired.
pub const EXPIRY_MARGIN_SECS: i64 = 30;

/// Display format for note timestamps, e.g. "Mar 04, 2025 - 9:07 PM".
pub const NOTE_DATE_FORMAT: &str = "%b %d, %Y - %-I:%M %p";

/// A user-owned text note.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: String,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    /// Owner; set from the session at creation and never changed.
    pub user_id: String,
}

impl Note {
    /// Creation time formatted for note cards.
    pub fn display_date(&self) -> String {
        self.created_at.format(NOTE_DATE_FORMAT).to_string()
    }
}

/// Fields sent when inserting a note.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewNote {
    pub title: String,
    pub content: String,
    pub user_id: String,
}

/// One sign-in method linked to a user.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    #[serde(default)]
    pub provider: String,
}

/// User object as returned by the auth API.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub confirmed_at: Option<DateTime<Utc>>,
    /// `Some(vec![])` is how the service hides an email that is already registered.
    #[serde(default)]
    pub identities: Option<Vec<Identity>>,
}

impl AuthUser {
    /// Convert to UserInfo for client consumption.
    pub fn to_info(&self) -> UserInfo {
        UserInfo {
            id: self.id.clone(),
            email: self.email.clone(),
        }
    }
}

/// User information safe to send to the client.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    pub id: String,
    pub email: Option<String>,
}

impl UserInfo {
    /// First character of the email, upper-cased, for the avatar fallback.
    pub fn initial(&self) -> Option<String> {
        self.email
            .as_deref()
            .and_then(|email| email.chars().next())
            .map(|c| c.to_uppercase().collect())
    }
}

/// An authenticated session issued by the backend.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSession {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    #[serde(default)]
    pub expires_in: i64,
    #[serde(default)]
    pub expires_at: Option<i64>,
    #[serde(default)]
    pub refresh_token: String,
    pub user: AuthUser,
}

impl AuthSession {
    /// Whether the access token should be refreshed before use at `now`.
    ///
    /// A session without `expires_at` is left to the backend to reject.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at
            .is_some_and(|at| at - EXPIRY_MARGIN_SECS <= now.timestamp())
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }
}

fn default_token_type() -> String {
    "bearer".to_string()
}

/// What a sign-up call returned.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignUpResponse {
    pub user: Option<AuthUser>,
    pub session: Option<AuthSession>,
}

impl SignUpResponse {
    /// Decode the auth API's sign-up body.
    ///
    /// With auto-confirm the service answers with a full session; otherwise it answers
    /// with the bare user object.
    pub fn from_value(value: Value) -> Result<Self, BackendError> {
        if value.get("access_token").is_some() {
            let session: AuthSession = serde_json::from_value(value)
                .map_err(|e| BackendError::Decode(e.to_string()))?;
            return Ok(Self {
                user: Some(session.user.clone()),
                session: Some(session),
            });
        }
        if value.get("id").is_some() {
            let user: AuthUser =
                serde_json::from_value(value).map_err(|e| BackendError::Decode(e.to_string()))?;
            return Ok(Self {
                user: Some(user),
                session: None,
            });
        }
        Ok(Self::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn note_decodes_rest_row() {
        let note: Note = serde_json::from_value(json!({
            "id": "7d3c",
            "title": "Groceries",
            "content": "Milk, eggs",
            "created_at": "2025-03-04T21:07:00.123456+00:00",
            "user_id": "u1"
        }))
        .unwrap();
        assert_eq!(note.title, "Groceries");
        assert_eq!(note.display_date(), "Mar 04, 2025 - 9:07 PM");
    }

    #[test]
    fn morning_dates_use_am() {
        let note = Note {
            id: "n1".into(),
            title: "t".into(),
            content: "c".into(),
            created_at: Utc.with_ymd_and_hms(2024, 12, 1, 0, 5, 0).unwrap(),
            user_id: "u1".into(),
        };
        assert_eq!(note.display_date(), "Dec 01, 2024 - 12:05 AM");
    }

    #[test]
    fn sign_up_body_with_session() {
        let response = SignUpResponse::from_value(json!({
            "access_token": "jwt",
            "token_type": "bearer",
            "expires_in": 3600,
            "refresh_token": "r",
            "user": {
                "id": "u1",
                "email": "a@b.com",
                "confirmed_at": "2025-01-01T00:00:00Z",
                "identities": [{ "provider": "email" }]
            }
        }))
        .unwrap();
        assert!(response.session.is_some());
        assert_eq!(response.user.unwrap().identities.unwrap().len(), 1);
    }

    #[test]
    fn sign_up_body_with_bare_user() {
        let response = SignUpResponse::from_value(json!({
            "id": "u1",
            "email": "a@b.com",
            "confirmed_at": null,
            "identities": []
        }))
        .unwrap();
        assert!(response.session.is_none());
        let user = response.user.unwrap();
        assert_eq!(user.identities, Some(vec![]));
        assert!(user.confirmed_at.is_none());
    }

    #[test]
    fn session_expires_inside_margin() {
        let issued = Utc.with_ymd_and_hms(2025, 3, 4, 12, 0, 0).unwrap();
        let mut session = SignUpResponse::from_value(json!({
            "access_token": "jwt",
            "refresh_token": "r",
            "expires_at": issued.timestamp() + 3600,
            "user": { "id": "u1" }
        }))
        .unwrap()
        .session
        .unwrap();

        assert!(!session.is_expired_at(issued));
        assert!(session.is_expired_at(issued + chrono::Duration::seconds(3600 - 10)));
        assert!(session.is_expired_at(issued + chrono::Duration::hours(2)));

        session.expires_at = None;
        assert!(!session.is_expired_at(issued + chrono::Duration::days(365)));
    }

    #[test]
    fn initial_is_uppercased() {
        let user = UserInfo {
            id: "u1".into(),
            email: Some("alice@example.com".into()),
        };
        assert_eq!(user.initial().as_deref(), Some("A"));
        let anonymous = UserInfo {
            id: "u2".into(),
            email: None,
        };
        assert_eq!(anonymous.initial(), None);
    }
}
