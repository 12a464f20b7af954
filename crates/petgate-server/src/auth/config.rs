// Authentication configuration loaded from environment variables.
// Decision: Follow the AUTH_ prefix for all auth config
// Decision: Defaults reproduce the single demo account so the service runs with no setup

use secrecy::SecretString;
use std::time::Duration;

/// Default login username
pub const DEFAULT_USERNAME: &str = "adam";
/// Default login password
pub const DEFAULT_PASSWORD: &str = "12345";
/// Default shared session cookie value
pub const DEFAULT_SESSION_VALUE: &str = "8500RfpFDt&S";
/// Name of the session cookie
pub const SESSION_COOKIE_NAME: &str = "sessionID";
/// Name of the cookie carrying the signed bearer token
pub const TOKEN_COOKIE_NAME: &str = "JWTCookie";
/// Token id stamped into every issued bearer token
pub const TOKEN_ID: &str = "main_user_id";

const EIGHT_HOURS: Duration = Duration::from_secs(8 * 60 * 60);

/// Upper bound for session and token lifetimes
pub const MAX_LIFETIME: Duration = Duration::from_secs(365 * 24 * 60 * 60);

/// Errors produced while reading configuration
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{key} must not be empty")]
    Empty { key: &'static str },

    #[error("{key} has an invalid value: {value}")]
    Invalid { key: &'static str, value: String },
}

/// The single account allowed to log in
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: SecretString,
}

/// JWT configuration
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Secret key for signing JWTs
    pub secret: SecretString,
    /// Access token lifetime
    pub access_token_lifetime: Duration,
    /// Value of the `jti` claim
    pub token_id: String,
    /// Cookie carrying the token
    pub cookie_name: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: SecretString::from(String::new()),
            access_token_lifetime: EIGHT_HOURS,
            token_id: TOKEN_ID.to_string(),
            cookie_name: TOKEN_COOKIE_NAME.to_string(),
        }
    }
}

/// Session cookie configuration
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub cookie_name: String,
    /// Shared value every logged-in client receives
    pub value: SecretString,
    pub max_age: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: SESSION_COOKIE_NAME.to_string(),
            value: SecretString::from(DEFAULT_SESSION_VALUE.to_string()),
            max_age: EIGHT_HOURS,
        }
    }
}

/// Complete authentication configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub credentials: Credentials,
    pub jwt: JwtConfig,
    pub session: SessionConfig,
    /// Whether issued cookies carry the `Secure` attribute
    pub cookie_secure: bool,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            credentials: Credentials {
                username: DEFAULT_USERNAME.to_string(),
                password: SecretString::from(DEFAULT_PASSWORD.to_string()),
            },
            jwt: JwtConfig::default(),
            session: SessionConfig::default(),
            cookie_secure: false,
        }
    }
}

impl AuthConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let username = non_empty(&lookup, "AUTH_USERNAME", DEFAULT_USERNAME)?;
        let password = non_empty(&lookup, "AUTH_PASSWORD", DEFAULT_PASSWORD)?;

        let secret = match lookup("AUTH_JWT_SECRET").filter(|s| !s.is_empty()) {
            Some(secret) => secret,
            None => {
                // Tokens signed with a generated secret do not survive a restart
                tracing::warn!("AUTH_JWT_SECRET not set, generating an ephemeral signing secret");
                use rand::Rng;
                let bytes: [u8; 32] = rand::thread_rng().gen();
                hex::encode(bytes)
            }
        };

        let access_token_lifetime = lookup("AUTH_ACCESS_TOKEN_LIFETIME")
            .map(|s| parse_lifetime("AUTH_ACCESS_TOKEN_LIFETIME", &s, 1))
            .transpose()?
            .unwrap_or(EIGHT_HOURS);

        let session_value = non_empty(&lookup, "AUTH_SESSION_VALUE", DEFAULT_SESSION_VALUE)?;

        // minutes
        let session_max_age = lookup("AUTH_SESSION_MAX_AGE")
            .map(|s| parse_lifetime("AUTH_SESSION_MAX_AGE", &s, 60))
            .transpose()?
            .unwrap_or(EIGHT_HOURS);

        let cookie_secure = lookup("AUTH_COOKIE_SECURE")
            .map(|s| s.to_lowercase() == "true" || s == "1")
            .unwrap_or(false);

        Ok(Self {
            credentials: Credentials {
                username,
                password: SecretString::from(password),
            },
            jwt: JwtConfig {
                secret: SecretString::from(secret),
                access_token_lifetime,
                ..JwtConfig::default()
            },
            session: SessionConfig {
                value: SecretString::from(session_value),
                max_age: session_max_age,
                ..SessionConfig::default()
            },
            cookie_secure,
        })
    }
}

fn non_empty<F>(lookup: &F, key: &'static str, default: &str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(value) if value.is_empty() => Err(ConfigError::Empty { key }),
        Some(value) => Ok(value),
        None => Ok(default.to_string()),
    }
}

/// Parse a positive count of `unit_secs`-second units, capped at [`MAX_LIFETIME`]
fn parse_lifetime(key: &'static str, value: &str, unit_secs: u64) -> Result<Duration, ConfigError> {
    value
        .trim()
        .parse::<u64>()
        .ok()
        .filter(|n| *n > 0)
        .and_then(|n| n.checked_mul(unit_secs))
        .map(Duration::from_secs)
        .filter(|lifetime| *lifetime <= MAX_LIFETIME)
        .ok_or_else(|| ConfigError::Invalid {
            key,
            value: value.to_string(),
        })
}
