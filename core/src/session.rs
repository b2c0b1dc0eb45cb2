//! Credentials and the authenticated session they produce.

use std::fmt;

use crate::error::ApiError;

/// Name of the cookie the API uses to identify a signed-in user.
pub const SESSION_COOKIE: &str = "_wbw_rails_session";

/// What the client signs in with.
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    /// Exchange an email/password pair for a session cookie at construction.
    Password { email: String, password: String },
    /// A session cookie obtained earlier, either `name=value` or a bare token.
    Cookie(String),
}

impl Credentials {
    /// Pick usable credentials out of optional inputs.
    ///
    /// A non-empty `cookie` wins; otherwise both `email` and `password` must
    /// be non-empty.
    pub fn resolve(
        email: Option<String>,
        password: Option<String>,
        cookie: Option<String>,
    ) -> Result<Self, ApiError> {
        let present = |s: &Option<String>| s.as_deref().is_some_and(|s| !s.is_empty());

        if present(&cookie) {
            return Ok(Credentials::Cookie(cookie.unwrap_or_default()));
        }
        match (email, password) {
            (Some(email), Some(password)) if !email.is_empty() && !password.is_empty() => {
                Ok(Credentials::Password { email, password })
            }
            _ => Err(ApiError::Configuration(
                "either email and password or a session cookie is required".into(),
            )),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credentials::Password { email, .. } => f
                .debug_struct("Password")
                .field("email", email)
                .field("password", &"[REDACTED]")
                .finish(),
            Credentials::Cookie(_) => f.debug_tuple("Cookie").field(&"[REDACTED]").finish(),
        }
    }
}

/// An authenticated session: the `cookie` header value sent with every call.
///
/// Built once and never mutated; request builders borrow it.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    cookie: String,
}

impl Session {
    /// Wrap a session cookie. A header that already carries a
    /// `_wbw_rails_session=` pair is used as-is; anything else is a bare
    /// token (which may itself contain `=` padding) and gets the prefix.
    pub fn from_cookie(cookie: impl Into<String>) -> Result<Self, ApiError> {
        let cookie = cookie.into();
        let cookie = cookie.trim();
        if cookie.is_empty() {
            return Err(ApiError::Configuration("session cookie is empty".into()));
        }
        if carries_session_pair(cookie) {
            Ok(Session {
                cookie: cookie.to_string(),
            })
        } else {
            Ok(Session::from_token(cookie))
        }
    }

    pub(crate) fn from_token(token: &str) -> Self {
        Session {
            cookie: format!("{SESSION_COOKIE}={token}"),
        }
    }

    pub fn cookie_header(&self) -> &str {
        &self.cookie
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("cookie", &"[REDACTED]")
            .finish()
    }
}

fn carries_session_pair(header: &str) -> bool {
    header
        .split(';')
        .filter_map(|pair| pair.split_once('='))
        .any(|(name, _)| name.trim() == SESSION_COOKIE)
}
