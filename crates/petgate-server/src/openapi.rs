// OpenAPI specification generation
//
// Served by the gateway at /api-doc/openapi.json and printed by the
// export-openapi binary for static documentation builds.

use crate::api;
use crate::auth;
use utoipa::openapi::security::{ApiKey, ApiKeyValue, Http, HttpAuthScheme, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// OpenAPI documentation for the petgate API
#[derive(OpenApi)]
#[openapi(
    paths(
        auth::routes::login_with_query,
        auth::routes::login_with_body,
        api::pets::hello,
        api::pets::get_cats,
        api::pets::add_cat,
        api::pets::add_dog,
        api::pets::add_hamster,
        api::areas::main_admin,
        api::areas::main_cookie,
        api::areas::main_jwt,
    ),
    components(
        schemas(
            auth::routes::LoginRequest,
            auth::routes::LoginResponse,
            api::pets::Pet,
            api::ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "auth", description = "Login and cookie issuance"),
        (name = "pets", description = "Ungated pet registration endpoints"),
        (name = "areas", description = "Pages behind Basic Auth, session cookie and bearer token guards")
    ),
    info(
        title = "Petgate API",
        version = "0.1.0",
        description = "Small HTTP service guarding route groups with Basic Auth, a session cookie and a signed bearer token",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "basic_auth",
                SecurityScheme::Http(Http::new(HttpAuthScheme::Basic)),
            );
            components.add_security_scheme(
                "session_cookie",
                SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new(
                    auth::config::SESSION_COOKIE_NAME,
                ))),
            );
            components.add_security_scheme(
                "token_cookie",
                SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new(
                    auth::config::TOKEN_COOKIE_NAME,
                ))),
            );
        }
    }
}

impl ApiDoc {
    /// Render the OpenAPI document as a pretty-printed JSON string
    pub fn to_json() -> Result<String, serde_json::Error> {
        Self::openapi().to_pretty_json()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_gateway_paths() {
        let doc = ApiDoc::openapi();
        for path in ["/login", "/cats/{format}", "/addcat", "/admin/main", "/jwt/main"] {
            assert!(doc.paths.paths.contains_key(path), "{path}");
        }
    }

    #[test]
    fn test_security_schemes_registered() {
        let json = ApiDoc::to_json().unwrap();
        assert!(json.contains("basic_auth"));
        assert!(json.contains("sessionID"));
        assert!(json.contains("JWTCookie"));
    }
}
