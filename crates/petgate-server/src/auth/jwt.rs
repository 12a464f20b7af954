// JWT token service for the bearer-token cookie
// Decision: HS512 with a single symmetric secret; tokens are self-verifying, never stored
// Decision: Zero leeway on expiry so an expired token is rejected immediately

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};

use super::config::JwtConfig;

/// Claims carried by the bearer token
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct TokenClaims {
    /// Subject name
    pub name: String,
    /// Token id
    pub jti: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
}

/// Token issuance and verification failures
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("malformed token")]
    Malformed,

    #[error("token signature mismatch")]
    InvalidSignature,

    #[error("token expired")]
    Expired,

    #[error("failed to encode token: {0}")]
    Encode(#[source] jsonwebtoken::errors::Error),

    #[error("token lifetime out of range")]
    Lifetime,
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            ErrorKind::ExpiredSignature => TokenError::Expired,
            ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
                TokenError::InvalidSignature
            }
            _ => TokenError::Malformed,
        }
    }
}

/// JWT service for token generation and validation
#[derive(Clone)]
pub struct JwtService {
    config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtService {
    pub fn new(config: JwtConfig) -> Self {
        let secret = config.secret.expose_secret().as_bytes();
        let encoding_key = EncodingKey::from_secret(secret);
        let decoding_key = DecodingKey::from_secret(secret);

        let mut validation = Validation::new(Algorithm::HS512);
        validation.validate_exp = true;
        validation.leeway = 0;

        Self {
            config,
            encoding_key,
            decoding_key,
            validation,
        }
    }

    /// Issue a token for `subject`, valid for the configured lifetime from now
    pub fn issue(&self, subject: &str) -> Result<(String, TokenClaims), TokenError> {
        self.issue_at(subject, Utc::now())
    }

    /// Issue a token as if it were minted at `issued_at`
    pub fn issue_at(
        &self,
        subject: &str,
        issued_at: DateTime<Utc>,
    ) -> Result<(String, TokenClaims), TokenError> {
        let lifetime =
            Duration::from_std(self.config.access_token_lifetime).map_err(|_| TokenError::Lifetime)?;
        let exp = issued_at
            .checked_add_signed(lifetime)
            .ok_or(TokenError::Lifetime)?;

        let claims = TokenClaims {
            name: subject.to_string(),
            jti: self.config.token_id.clone(),
            exp: exp.timestamp(),
            iat: issued_at.timestamp(),
        };

        let token = encode(&Header::new(Algorithm::HS512), &claims, &self.encoding_key)
            .map_err(TokenError::Encode)?;

        Ok((token, claims))
    }

    /// Validate signature and expiry, returning the decoded claims
    pub fn verify(&self, token: &str) -> Result<TokenClaims, TokenError> {
        let token_data = decode::<TokenClaims>(token, &self.decoding_key, &self.validation)?;
        Ok(token_data.claims)
    }

    /// Cookie the token travels in
    pub fn cookie_name(&self) -> &str {
        &self.config.cookie_name
    }

    pub fn lifetime(&self) -> std::time::Duration {
        self.config.access_token_lifetime
    }
}
