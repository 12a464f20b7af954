// Credential store for the single configured account
// Decision: Compare both fields in constant time and never short-circuit on the username

use secrecy::ExposeSecret;
use subtle::ConstantTimeEq;

use super::config::Credentials;

/// Holds the one valid username/password pair
#[derive(Debug, Clone)]
pub struct CredentialStore {
    credentials: Credentials,
}

impl CredentialStore {
    pub fn new(credentials: Credentials) -> Self {
        Self { credentials }
    }

    /// True iff both fields exactly match the configured pair
    pub fn validate(&self, username: &str, password: &str) -> bool {
        let user_ok = ct_eq(username.as_bytes(), self.credentials.username.as_bytes());
        let pass_ok = ct_eq(
            password.as_bytes(),
            self.credentials.password.expose_secret().as_bytes(),
        );
        user_ok & pass_ok
    }

    /// Username carried as the subject of issued tokens
    pub fn username(&self) -> &str {
        &self.credentials.username
    }
}

/// Constant-time comparison of two byte slices.
pub(crate) fn ct_eq(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && a.ct_eq(b).into()
}
