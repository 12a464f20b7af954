// HTTP Basic authentication
// Decision: Every malformed header is a plain rejection, indistinguishable from bad credentials

use axum::http::{header, HeaderMap, HeaderValue};
use base64::{engine::general_purpose::STANDARD, Engine as _};

use super::credentials::CredentialStore;

/// Challenge sent with every Basic rejection
pub const BASIC_CHALLENGE: &str = "Basic realm=\"Restricted\"";

/// Outcome of checking a request's Basic credentials
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BasicAuthOutcome {
    Authenticated,
    Rejected,
}

/// Check the `Authorization: Basic` header against the credential store
pub fn validate_basic(headers: &HeaderMap, store: &CredentialStore) -> BasicAuthOutcome {
    let Some((username, password)) = headers
        .get(header::AUTHORIZATION)
        .and_then(parse_basic_header)
    else {
        return BasicAuthOutcome::Rejected;
    };

    if store.validate(&username, &password) {
        BasicAuthOutcome::Authenticated
    } else {
        tracing::debug!("Basic credentials rejected");
        BasicAuthOutcome::Rejected
    }
}

/// Decode `Basic base64(user:pass)` into its two parts
pub fn parse_basic_header(value: &HeaderValue) -> Option<(String, String)> {
    let value = value.to_str().ok()?;
    let (scheme, encoded) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return None;
    }

    let decoded = STANDARD.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (username, password) = decoded.split_once(':')?;

    Some((username.to_string(), password.to_string()))
}
