//! Session data and the remember-me cookie.
//!
//! The backend session (tokens + user) is kept in the tower-sessions store under
//! [`SESSION_AUTH_KEY`]; the browser only holds the session id. When "remember me" is
//! checked the server session lives for [`REMEMBER_DURATION`] of inactivity and a
//! `session` cookie carrying the serialized backend session is written as well. Signing
//! out overwrites that cookie with an expired one.

use store::AuthSession;
use time::Duration;
use tower_sessions::cookie::{Cookie, SameSite};
use tower_sessions::{Expiry, Session};

/// Key for storing the backend session in the session store.
pub const SESSION_AUTH_KEY: &str = "auth";

/// Name of the remember-me cookie.
pub const REMEMBER_COOKIE_NAME: &str = "session";

/// How long a remembered sign-in lasts.
pub const REMEMBER_DURATION: Duration = Duration::days(30);

/// Backend session of the current visitor, if signed in.
pub async fn load_auth(session: &Session) -> Result<Option<AuthSession>, tower_sessions::session::Error> {
    session.get::<AuthSession>(SESSION_AUTH_KEY).await
}

/// Attach a fresh backend session to this visitor.
///
/// The session id is cycled so an id issued before sign-in is never reused after it.
pub async fn store_auth(
    session: &Session,
    auth: &AuthSession,
    remember: bool,
) -> Result<(), tower_sessions::session::Error> {
    session.cycle_id().await?;
    session.insert(SESSION_AUTH_KEY, auth).await?;
    if remember {
        session.set_expiry(Some(Expiry::OnInactivity(REMEMBER_DURATION)));
    }
    Ok(())
}

/// Swap in a refreshed backend session, keeping the session id and its expiry.
pub async fn renew_auth(session: &Session, auth: &AuthSession) -> Result<(), tower_sessions::session::Error> {
    session.insert(SESSION_AUTH_KEY, auth).await
}

/// Drop everything stored for this visitor.
pub async fn forget_auth(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session.flush().await
}

/// The remember-me cookie: URL-encoded JSON of the backend session.
pub fn remember_cookie(auth: &AuthSession) -> Result<Cookie<'static>, serde_json::Error> {
    let payload = serde_json::to_string(auth)?;
    let value: String = url::form_urlencoded::byte_serialize(payload.as_bytes()).collect();
    Ok(Cookie::build((REMEMBER_COOKIE_NAME, value))
        .path("/")
        .max_age(REMEMBER_DURATION)
        .http_only(true)
        .same_site(SameSite::Lax)
        .build())
}

/// Overwrites the remember-me cookie with an empty one that expires immediately.
pub fn cleared_remember_cookie() -> Cookie<'static> {
    Cookie::build((REMEMBER_COOKIE_NAME, ""))
        .path("/")
        .max_age(Duration::ZERO)
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use store::AuthUser;
    use tower_sessions::MemoryStore;

    use super::*;

    fn sample_session() -> AuthSession {
        AuthSession {
            access_token: "jwt; with=odd chars".to_string(),
            token_type: "bearer".to_string(),
            expires_in: 3600,
            expires_at: None,
            refresh_token: "r".to_string(),
            user: AuthUser {
                id: "u1".to_string(),
                email: Some("a@b.com".to_string()),
                confirmed_at: None,
                identities: None,
            },
        }
    }

    #[test]
    fn remember_cookie_lasts_thirty_days_on_root_path() {
        let cookie = remember_cookie(&sample_session()).unwrap();
        assert_eq!(cookie.name(), "session");
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.max_age(), Some(Duration::seconds(2_592_000)));

        let header = cookie.to_string();
        assert!(header.starts_with("session="));
        assert!(header.contains("Max-Age=2592000"));
        // The value is encoded, so the payload cannot break the attribute list.
        assert_eq!(header.matches(';').count(), 4);
    }

    #[test]
    fn remember_cookie_value_decodes_to_session() {
        let cookie = remember_cookie(&sample_session()).unwrap();
        let decoded: String = url::form_urlencoded::parse(format!("v={}", cookie.value()).as_bytes())
            .map(|(_, v)| v.into_owned())
            .next()
            .unwrap();
        let restored: AuthSession = serde_json::from_str(&decoded).unwrap();
        assert_eq!(restored, sample_session());
    }

    #[test]
    fn cleared_cookie_expires_the_remembered_one() {
        let cookie = cleared_remember_cookie();
        assert_eq!(cookie.name(), REMEMBER_COOKIE_NAME);
        assert_eq!(cookie.value(), "");
        assert_eq!(cookie.path(), Some("/"));
        assert!(cookie.to_string().contains("Max-Age=0"));
    }

    #[tokio::test]
    async fn renew_keeps_remembered_expiry() {
        let session = Session::new(None, Arc::new(MemoryStore::default()), None);
        store_auth(&session, &sample_session(), true).await.unwrap();

        let mut fresh = sample_session();
        fresh.access_token = "jwt-2".to_string();
        renew_auth(&session, &fresh).await.unwrap();

        assert_eq!(load_auth(&session).await.unwrap(), Some(fresh));
        assert_eq!(
            session.expiry(),
            Some(Expiry::OnInactivity(REMEMBER_DURATION))
        );
    }

    #[tokio::test]
    async fn store_then_forget() {
        let session = Session::new(None, Arc::new(MemoryStore::default()), None);
        assert_eq!(load_auth(&session).await.unwrap(), None);

        store_auth(&session, &sample_session(), true).await.unwrap();
        assert_eq!(load_auth(&session).await.unwrap(), Some(sample_session()));
        assert_eq!(
            session.expiry(),
            Some(Expiry::OnInactivity(REMEMBER_DURATION))
        );

        forget_auth(&session).await.unwrap();
        assert_eq!(load_auth(&session).await.unwrap(), None);
    }
}
