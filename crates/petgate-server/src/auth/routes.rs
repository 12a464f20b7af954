// Authentication HTTP routes
// Decision: Keep GET /login with query parameters for existing clients; POST /login takes a JSON body
// Decision: Session and token cookies are issued together or not at all

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    routing::get,
    Json, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use utoipa::{IntoParams, ToSchema};

use super::middleware::{AuthError, AuthState};
use super::session::expires_after;

/// Message returned for any failed login
pub const INVALID_CREDENTIALS: &str = "Your username or password is invalid!";

/// Login request
#[derive(Debug, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Login response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    pub message: String,
    /// The issued bearer token, for clients that cannot hold cookies
    pub token: String,
}

/// Create auth routes
pub fn routes(state: AuthState) -> Router {
    Router::new()
        .route("/login", get(login_with_query).post(login_with_body))
        .with_state(state)
}

/// GET /login - Login with query parameters
#[utoipa::path(
    get,
    path = "/login",
    params(LoginRequest),
    responses(
        (status = 200, description = "Logged in, session and token cookies set", body = LoginResponse),
        (status = 401, description = "Invalid credentials")
    ),
    tag = "auth"
)]
pub async fn login_with_query(
    State(state): State<AuthState>,
    jar: CookieJar,
    Query(req): Query<LoginRequest>,
) -> Result<(CookieJar, Json<LoginResponse>), AuthError> {
    login(&state, jar, req)
}

/// POST /login - Login with a JSON body
#[utoipa::path(
    post,
    path = "/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in, session and token cookies set", body = LoginResponse),
        (status = 401, description = "Invalid credentials")
    ),
    tag = "auth"
)]
pub async fn login_with_body(
    State(state): State<AuthState>,
    jar: CookieJar,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<(CookieJar, Json<LoginResponse>), AuthError> {
    // An unreadable body is just another failed login
    let Json(req) = body.map_err(|rejection| {
        tracing::debug!("Login body rejected: {}", rejection);
        AuthError::unauthorized(INVALID_CREDENTIALS)
    })?;
    login(&state, jar, req)
}

fn login(
    state: &AuthState,
    jar: CookieJar,
    req: LoginRequest,
) -> Result<(CookieJar, Json<LoginResponse>), AuthError> {
    if !state.credentials.validate(&req.username, &req.password) {
        tracing::warn!("Login rejected");
        return Err(AuthError::unauthorized(INVALID_CREDENTIALS));
    }

    let subject = state.credentials.username();
    let (token, claims) = state
        .jwt_service
        .issue(subject)
        .map_err(login_failed)?;

    let now = OffsetDateTime::now_utc();
    let session_cookie = state.sessions.issue(now).map_err(login_failed)?;
    let token_expires =
        expires_after(now, state.jwt_service.lifetime()).map_err(login_failed)?;
    let token_cookie = Cookie::build((state.jwt_service.cookie_name().to_string(), token.clone()))
        .path("/")
        .http_only(true)
        .secure(state.cookie_secure)
        .same_site(SameSite::Lax)
        .expires(token_expires)
        .build();

    tracing::info!(subject = %claims.name, token_id = %claims.jti, "Login succeeded");

    let jar = jar.add(session_cookie).add(token_cookie);

    Ok((
        jar,
        Json(LoginResponse {
            message: "You were logged in!".to_string(),
            token,
        }),
    ))
}

fn login_failed(e: impl std::fmt::Display) -> AuthError {
    tracing::error!("Credential issuance error: {}", e);
    AuthError::unauthorized("Login failed")
}
