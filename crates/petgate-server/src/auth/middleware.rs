// Authentication gates
// Decision: Each guard is a pure check over the request; the composer decides where it runs
// Decision: A request authenticated under one scheme is never accepted by another

use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use axum_extra::extract::CookieJar;
use serde::Serialize;
use std::sync::Arc;

use super::{
    basic::{validate_basic, BasicAuthOutcome, BASIC_CHALLENGE},
    config::AuthConfig,
    credentials::CredentialStore,
    jwt::JwtService,
    session::SessionService,
};

/// Authentication error
#[derive(Debug, Clone, Serialize)]
pub struct AuthError {
    pub error: String,
    #[serde(skip)]
    pub status: StatusCode,
    /// Value for `WWW-Authenticate`, when the scheme defines a challenge
    #[serde(skip)]
    pub challenge: Option<&'static str>,
}

impl AuthError {
    pub fn unauthorized(message: &str) -> Self {
        Self {
            error: message.to_string(),
            status: StatusCode::UNAUTHORIZED,
            challenge: None,
        }
    }

    pub fn with_challenge(mut self, challenge: &'static str) -> Self {
        self.challenge = Some(challenge);
        self
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let challenge = self.challenge;
        let mut response = (self.status, Json(self)).into_response();
        if let Some(challenge) = challenge {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static(challenge));
        }
        response
    }
}

/// Auth state shared across routes
#[derive(Clone)]
pub struct AuthState {
    pub credentials: Arc<CredentialStore>,
    pub sessions: Arc<SessionService>,
    pub jwt_service: Arc<JwtService>,
    pub cookie_secure: bool,
}

impl AuthState {
    pub fn new(config: AuthConfig) -> Self {
        let credentials = Arc::new(CredentialStore::new(config.credentials));
        let sessions = Arc::new(SessionService::new(config.session, config.cookie_secure));
        let jwt_service = Arc::new(JwtService::new(config.jwt));
        Self {
            credentials,
            sessions,
            jwt_service,
            cookie_secure: config.cookie_secure,
        }
    }
}

/// Credential scheme protecting a route group
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guard {
    /// Open group, only observed by the access log
    None,
    /// `Authorization: Basic` checked against the credential store
    BasicAuth,
    /// Shared-value session cookie
    SessionCookie,
    /// Signed bearer token carried in a cookie
    BearerToken,
}

impl Guard {
    /// Decide whether `request` may continue. On success for `BearerToken`
    /// the decoded claims are inserted into the request extensions.
    pub fn check(&self, state: &AuthState, request: &mut Request) -> Result<(), AuthError> {
        match self {
            Guard::None => Ok(()),
            Guard::BasicAuth => match validate_basic(request.headers(), &state.credentials) {
                BasicAuthOutcome::Authenticated => Ok(()),
                BasicAuthOutcome::Rejected => {
                    Err(AuthError::unauthorized("Unauthorized").with_challenge(BASIC_CHALLENGE))
                }
            },
            Guard::SessionCookie => {
                let jar = CookieJar::from_headers(request.headers());
                state.sessions.verify(&jar).map_err(|rejection| {
                    tracing::debug!(reason = ?rejection, "Session cookie rejected");
                    AuthError::unauthorized(rejection.message())
                })
            }
            Guard::BearerToken => {
                let jar = CookieJar::from_headers(request.headers());
                let token = jar
                    .get(state.jwt_service.cookie_name())
                    .ok_or_else(|| AuthError::unauthorized("Missing token cookie"))?;

                let claims = state.jwt_service.verify(token.value()).map_err(|e| {
                    tracing::debug!("JWT validation failed: {}", e);
                    AuthError::unauthorized("Invalid or expired token")
                })?;

                request.extensions_mut().insert(claims);
                Ok(())
            }
        }
    }
}

/// State handed to [`enforce`] for one route group
#[derive(Clone)]
pub struct GateState {
    pub auth: AuthState,
    pub guard: Guard,
}

/// Middleware running a group's guard before its handlers
pub async fn enforce(State(gate): State<GateState>, mut request: Request, next: Next) -> Response {
    match gate.guard.check(&gate.auth, &mut request) {
        Ok(()) => next.run(request).await,
        Err(rejection) => rejection.into_response(),
    }
}
