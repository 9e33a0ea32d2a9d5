//! Server-side session state for signed-in users.

#[cfg(feature = "server")]
mod session;

#[cfg(feature = "server")]
pub use session::{
    cleared_remember_cookie, forget_auth, load_auth, remember_cookie, renew_auth, store_auth,
    REMEMBER_COOKIE_NAME, REMEMBER_DURATION, SESSION_AUTH_KEY,
};
