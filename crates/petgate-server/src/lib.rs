// Petgate gateway library
// Decision: The router is assembled here so the binary and the integration tests share it

pub mod access_log;
pub mod api;
pub mod auth;
pub mod config;
pub mod gateway;
pub mod openapi;

pub use config::GatewayConfig;
pub use gateway::{RouteGroup, RouteTable, RouteTableError};

use axum::{
    http::{header, HeaderName, HeaderValue},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tower_http::{set_header::SetResponseHeaderLayer, trace::TraceLayer};
use utoipa::OpenApi;

use auth::{AuthState, Guard};

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(openapi::ApiDoc::openapi())
}

/// Route groups and their guards
pub fn route_table(auth: AuthState) -> Result<RouteTable, RouteTableError> {
    RouteTable::new(auth)
        .group(RouteGroup::new(
            "/admin",
            Guard::BasicAuth,
            api::areas::admin_routes(),
        ))?
        .group(RouteGroup::new(
            "/cookie",
            Guard::SessionCookie,
            api::areas::cookie_routes(),
        ))?
        .group(RouteGroup::new(
            "/jwt",
            Guard::BearerToken,
            api::areas::jwt_routes(),
        ))
}

/// Build the complete application router
pub fn build_app(config: GatewayConfig) -> Result<Router, RouteTableError> {
    let auth_state = AuthState::new(config.auth);

    let table = route_table(auth_state.clone())?;
    for (prefix, guard) in table.guards() {
        tracing::info!(prefix, guard = ?guard, "Route group configured");
    }

    let app = Router::new()
        .route("/health", get(health))
        .route("/api-doc/openapi.json", get(openapi_json))
        .merge(api::pets::routes())
        .merge(auth::routes(auth_state))
        .merge(table.into_router());

    // Header layers sit outside every group so rejections carry them too
    let app = app
        .layer(SetResponseHeaderLayer::overriding(
            header::SERVER,
            config.server_header,
        ))
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("custom-header"),
            HeaderValue::from_static("No-Value"),
        ))
        .layer(TraceLayer::new_for_http());

    Ok(app)
}
