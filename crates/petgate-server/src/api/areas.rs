// Guarded area pages
// Decision: Handlers stay credential-agnostic; the route table decides which guard fronts them

use axum::{routing::get, Extension, Router};

use crate::auth::TokenClaims;

/// Routes nested under the Basic Auth prefix
pub fn admin_routes() -> Router {
    Router::new().route("/main", get(main_admin))
}

/// Routes nested under the session cookie prefix
pub fn cookie_routes() -> Router {
    Router::new().route("/main", get(main_cookie))
}

/// Routes nested under the bearer token prefix
pub fn jwt_routes() -> Router {
    Router::new().route("/main", get(main_jwt))
}

/// GET /admin/main
#[utoipa::path(
    get,
    path = "/admin/main",
    responses(
        (status = 200, description = "Admin area", body = String),
        (status = 401, description = "Basic credentials missing or invalid"),
    ),
    security(("basic_auth" = [])),
    tag = "areas"
)]
pub async fn main_admin() -> &'static str {
    "You are in the main Admin page!"
}

/// GET /cookie/main
#[utoipa::path(
    get,
    path = "/cookie/main",
    responses(
        (status = 200, description = "Cookie area", body = String),
        (status = 401, description = "Session cookie missing or wrong"),
    ),
    security(("session_cookie" = [])),
    tag = "areas"
)]
pub async fn main_cookie() -> &'static str {
    "You are in the main Cookie page!"
}

/// GET /jwt/main
#[utoipa::path(
    get,
    path = "/jwt/main",
    responses(
        (status = 200, description = "Token area", body = String),
        (status = 401, description = "Token cookie missing, invalid or expired"),
    ),
    security(("token_cookie" = [])),
    tag = "areas"
)]
pub async fn main_jwt(Extension(claims): Extension<TokenClaims>) -> &'static str {
    tracing::info!(name = %claims.name, token_id = %claims.jti, "Token area visited");
    "You are in the main JWT page!"
}
