// Session cookie issuance and verification
// Decision: One shared opaque value for every login; no server-side session table
// Decision: Expiry is carried by the cookie's Expires attribute and enforced by the client

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use secrecy::ExposeSecret;
use std::time::Duration;
use time::OffsetDateTime;

use super::config::SessionConfig;
use super::credentials::ct_eq;

/// Why a request failed the session check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionRejection {
    /// No session cookie on the request
    Missing,
    /// Cookie present but holding the wrong value
    Mismatched,
}

impl SessionRejection {
    pub fn message(&self) -> &'static str {
        match self {
            SessionRejection::Missing => "Missing session cookie",
            SessionRejection::Mismatched => "You don't have the right cookie",
        }
    }
}

/// Cookie expiry would fall outside the representable date range
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("cookie expiry out of range")]
pub struct ExpiryOutOfRange;

/// `now + lifetime`, or an error instead of overflowing
pub fn expires_after(
    now: OffsetDateTime,
    lifetime: Duration,
) -> Result<OffsetDateTime, ExpiryOutOfRange> {
    time::Duration::try_from(lifetime)
        .ok()
        .and_then(|lifetime| now.checked_add(lifetime))
        .ok_or(ExpiryOutOfRange)
}

/// Mints and checks the session cookie
#[derive(Debug, Clone)]
pub struct SessionService {
    config: SessionConfig,
    secure: bool,
}

impl SessionService {
    pub fn new(config: SessionConfig, secure: bool) -> Self {
        Self { config, secure }
    }

    /// Build the session cookie, expiring `max_age` after `now`
    pub fn issue(&self, now: OffsetDateTime) -> Result<Cookie<'static>, ExpiryOutOfRange> {
        let expires = expires_after(now, self.config.max_age)?;

        Ok(Cookie::build((
            self.config.cookie_name.clone(),
            self.config.value.expose_secret().to_string(),
        ))
        .path("/")
        .http_only(true)
        .secure(self.secure)
        .same_site(SameSite::Lax)
        .expires(expires)
        .build())
    }

    /// Look up the session cookie in the jar and compare its value
    pub fn verify(&self, jar: &CookieJar) -> Result<(), SessionRejection> {
        let cookie = jar
            .get(&self.config.cookie_name)
            .ok_or(SessionRejection::Missing)?;

        if ct_eq(
            cookie.value().as_bytes(),
            self.config.value.expose_secret().as_bytes(),
        ) {
            Ok(())
        } else {
            Err(SessionRejection::Mismatched)
        }
    }

    pub fn cookie_name(&self) -> &str {
        &self.config.cookie_name
    }
}
