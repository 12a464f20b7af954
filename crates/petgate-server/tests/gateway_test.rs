// Integration tests for the petgate router
// Run with: cargo test -p petgate-server --test gateway_test

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    response::Response,
    Router,
};
use axum_extra::extract::cookie::Cookie;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::{Duration as ChronoDuration, Utc};
use http_body_util::BodyExt;
use petgate_server::auth::config::JwtConfig;
use petgate_server::auth::jwt::JwtService;
use petgate_server::{build_app, GatewayConfig};
use secrecy::SecretString;
use serde_json::{json, Value};
use time::OffsetDateTime;
use tower::ServiceExt;

const SECRET: &str = "integration-test-secret";

fn config() -> GatewayConfig {
    let mut config = GatewayConfig::default();
    config.auth.jwt.secret = SecretString::from(SECRET.to_string());
    config
}

fn app() -> Router {
    build_app(config()).unwrap()
}

fn jwt_service(secret: &str) -> JwtService {
    JwtService::new(JwtConfig {
        secret: SecretString::from(secret.to_string()),
        ..JwtConfig::default()
    })
}

async fn send(app: &Router, request: Request<Body>) -> Response {
    app.clone().oneshot(request).await.unwrap()
}

async fn get(app: &Router, uri: &str) -> Response {
    send(app, Request::builder().uri(uri).body(Body::empty()).unwrap()).await
}

async fn get_with(app: &Router, uri: &str, name: header::HeaderName, value: &str) -> Response {
    send(
        app,
        Request::builder()
            .uri(uri)
            .header(name, value)
            .body(Body::empty())
            .unwrap(),
    )
    .await
}

async fn post_json(app: &Router, uri: &str, body: String) -> Response {
    send(
        app,
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap(),
    )
    .await
}

async fn body_string(response: Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn body_json(response: Response) -> Value {
    serde_json::from_str(&body_string(response).await).unwrap()
}

fn set_cookies(response: &Response) -> Vec<Cookie<'static>> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .map(|v| Cookie::parse_encoded(v.to_str().unwrap().to_string()).unwrap())
        .collect()
}

/// Raw `name=value` pair as the browser would send it back
fn cookie_pair(response: &Response, name: &str) -> String {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .map(|v| v.to_str().unwrap())
        .find(|v| v.starts_with(&format!("{name}=")))
        .and_then(|v| v.split(';').next())
        .unwrap()
        .to_string()
}

fn basic(user: &str, pass: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{user}:{pass}")))
}

// ============================================
// Login
// ============================================

#[tokio::test]
async fn test_login_sets_two_cookies_and_returns_token() {
    let app = app();
    let before = OffsetDateTime::now_utc();
    let response = get(&app, "/login?username=adam&password=12345").await;
    let after = OffsetDateTime::now_utc();

    assert_eq!(response.status(), StatusCode::OK);

    let cookies = set_cookies(&response);
    assert_eq!(cookies.len(), 2);

    let eight_hours = time::Duration::hours(8);
    for cookie in &cookies {
        let expires = cookie.expires_datetime().unwrap();
        // Expires has second precision on the wire
        assert!(expires >= before + eight_hours - time::Duration::seconds(1));
        assert!(expires <= after + eight_hours + time::Duration::seconds(1));
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.path(), Some("/"));
    }

    let session = cookies.iter().find(|c| c.name() == "sessionID").unwrap();
    assert_eq!(session.value(), "8500RfpFDt&S");
    let token_cookie = cookies.iter().find(|c| c.name() == "JWTCookie").unwrap();
    let token_cookie_value = token_cookie.value().to_string();

    let body = body_json(response).await;
    assert_eq!(body["message"], "You were logged in!");
    assert_eq!(body["token"], token_cookie_value.as_str());

    let claims = jwt_service(SECRET)
        .verify(body["token"].as_str().unwrap())
        .unwrap();
    assert_eq!(claims.name, "adam");
    assert_eq!(claims.jti, "main_user_id");
}

#[tokio::test]
async fn test_login_with_json_body() {
    let app = app();
    let response = post_json(
        &app,
        "/login",
        json!({"username": "adam", "password": "12345"}).to_string(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(set_cookies(&response).len(), 2);
}

#[tokio::test]
async fn test_bad_login_sets_no_cookies() {
    let app = app();

    for uri in [
        "/login?username=adam&password=wrong",
        "/login?username=eve&password=12345",
        "/login?username=&password=",
        "/login",
    ] {
        let response = get(&app, uri).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{uri}");
        assert!(response.headers().get(header::SET_COOKIE).is_none(), "{uri}");

        let body = body_json(response).await;
        assert_eq!(body["error"], "Your username or password is invalid!");
    }
}

#[tokio::test]
async fn test_concurrent_logins_yield_valid_tokens() {
    let app = app();

    let responses = futures::future::join_all(
        (0..16).map(|_| get(&app, "/login?username=adam&password=12345")),
    )
    .await;

    let verifier = jwt_service(SECRET);
    for response in responses {
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        let claims = verifier.verify(body["token"].as_str().unwrap()).unwrap();
        assert_eq!(claims.name, "adam");
    }
}

#[tokio::test]
async fn test_oversized_lifetimes_never_reach_login() {
    for (key, value) in [
        ("AUTH_SESSION_MAX_AGE", "1000000000000"),
        ("AUTH_ACCESS_TOKEN_LIFETIME", "100000000000000"),
    ] {
        let err = GatewayConfig::from_lookup(|k| (k == key).then(|| value.to_string()));
        assert!(err.is_err(), "{key}={value}");
    }

    // Set directly, past the parser, a failed issuance is a plain 401
    let mut config = config();
    config.auth.session.max_age = std::time::Duration::from_secs(60_000_000_000_000);
    let app = build_app(config).unwrap();

    let response = get(&app, "/login?username=adam&password=12345").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(response.headers().get(header::SET_COOKIE).is_none());
}

#[tokio::test]
async fn test_unreadable_login_body_is_unauthorized() {
    let app = app();
    let response = post_json(&app, "/login", "{\"username\":".to_string()).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        body_json(response).await["error"],
        "Your username or password is invalid!"
    );
}

// ============================================
// Basic Auth group
// ============================================

#[tokio::test]
async fn test_admin_requires_basic_auth() {
    let app = app();

    let response = get_with(&app, "/admin/main", header::AUTHORIZATION, &basic("adam", "12345")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "You are in the main Admin page!");

    let rejected = [
        get(&app, "/admin/main").await,
        get_with(&app, "/admin/main", header::AUTHORIZATION, &basic("adam", "nope")).await,
        get_with(&app, "/admin/main", header::AUTHORIZATION, &basic("eve", "12345")).await,
        get_with(&app, "/admin/main", header::AUTHORIZATION, "Basic !!!notbase64").await,
        get_with(&app, "/admin/main", header::AUTHORIZATION, "Bearer abc").await,
    ];

    for response in rejected {
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.headers().get(header::WWW_AUTHENTICATE).unwrap(),
            "Basic realm=\"Restricted\""
        );
        assert!(response.headers().get(header::SET_COOKIE).is_none());
    }
}

#[tokio::test]
async fn test_basic_scheme_is_case_insensitive() {
    let app = app();
    let value = format!("basic {}", STANDARD.encode("adam:12345"));

    let response = get_with(&app, "/admin/main", header::AUTHORIZATION, &value).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_unknown_admin_path_is_gated() {
    let app = app();

    let response = get(&app, "/admin/secret").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response =
        get_with(&app, "/admin/secret", header::AUTHORIZATION, &basic("adam", "12345")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ============================================
// Session cookie group
// ============================================

#[tokio::test]
async fn test_cookie_route_states() {
    let app = app();

    let response = get(&app, "/cookie/main").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = get_with(&app, "/cookie/main", header::COOKIE, "sessionID=guess").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        body_json(response).await["error"],
        "You don't have the right cookie"
    );

    let login = get(&app, "/login?username=adam&password=12345").await;
    let session = cookie_pair(&login, "sessionID");

    let response = get_with(&app, "/cookie/main", header::COOKIE, &session).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "You are in the main Cookie page!");
}

// ============================================
// Bearer token group
// ============================================

#[tokio::test]
async fn test_jwt_route_accepts_login_token() {
    let app = app();
    let login = get(&app, "/login?username=adam&password=12345").await;
    let token = cookie_pair(&login, "JWTCookie");

    let response = get_with(&app, "/jwt/main", header::COOKIE, &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "You are in the main JWT page!");
}

#[tokio::test]
async fn test_jwt_route_rejections() {
    let app = app();

    let (foreign, _) = jwt_service("some-other-secret").issue("adam").unwrap();
    let (expired, _) = jwt_service(SECRET)
        .issue_at("adam", Utc::now() - ChronoDuration::hours(9))
        .unwrap();

    let cases = [
        String::new(),
        format!("JWTCookie={foreign}"),
        format!("JWTCookie={expired}"),
        "JWTCookie=not.a.token".to_string(),
        "JWTCookie=".to_string(),
    ];

    for cookie in cases {
        let response = if cookie.is_empty() {
            get(&app, "/jwt/main").await
        } else {
            get_with(&app, "/jwt/main", header::COOKIE, &cookie).await
        };
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{cookie}");
    }
}

// ============================================
// Scheme isolation
// ============================================

#[tokio::test]
async fn test_schemes_do_not_cross() {
    let app = app();
    let login = get(&app, "/login?username=adam&password=12345").await;
    let session = cookie_pair(&login, "sessionID");
    let token = cookie_pair(&login, "JWTCookie");
    let both = format!("{session}; {token}");

    let response = get_with(&app, "/jwt/main", header::COOKIE, &session).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = get_with(&app, "/cookie/main", header::COOKIE, &token).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = get_with(&app, "/admin/main", header::COOKIE, &both).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response =
        get_with(&app, "/cookie/main", header::AUTHORIZATION, &basic("adam", "12345")).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// ============================================
// Ungated handlers
// ============================================

#[tokio::test]
async fn test_greeting() {
    let app = app();
    for uri in ["/", "/hello"] {
        let response = get(&app, uri).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, "Hello from the petgate web server!");
    }
}

#[tokio::test]
async fn test_cats_formats() {
    let app = app();

    let response = get(&app, "/cats/string?name=Tom&age=3").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_string(response).await,
        "Your cat's name is Tom and cat's age is 3"
    );

    let response = get(&app, "/cats/json?name=Tom&age=3").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({"name": "Tom", "age": "3"}));

    let response = get(&app, "/cats/xml?name=Tom&age=3").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await,
        json!({"error": "Data type must be 'string' or 'json'"})
    );
}

#[tokio::test]
async fn test_add_pets() {
    let app = app();
    let pet = json!({"name": "Rex", "age": "4"}).to_string();

    for (uri, kind) in [("/addcat", "cat"), ("/adddog", "dog"), ("/addhamster", "hamster")] {
        let response = post_json(&app, uri, pet.clone()).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, format!("We got your {kind} Rex"));

        let response = post_json(&app, uri, "{broken".to_string()).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body_string(response).await.is_empty());
    }
}

// ============================================
// Ambient surface
// ============================================

#[tokio::test]
async fn test_server_headers_on_every_response() {
    let app = app();

    let responses = [
        get(&app, "/hello").await,
        get(&app, "/admin/main").await,
        get(&app, "/cookie/main").await,
        get(&app, "/nowhere").await,
        get(&app, "/cats/xml").await,
    ];

    for response in responses {
        assert_eq!(response.headers().get(header::SERVER).unwrap(), "petgate/1.0");
        assert_eq!(response.headers().get("custom-header").unwrap(), "No-Value");
    }
}

#[tokio::test]
async fn test_configured_server_header() {
    let mut config = config();
    config.server_header = header::HeaderValue::from_static("edge/2");
    let app = build_app(config).unwrap();

    let response = get(&app, "/hello").await;
    assert_eq!(response.headers().get(header::SERVER).unwrap(), "edge/2");
}

#[tokio::test]
async fn test_health_and_openapi() {
    let app = app();

    let response = get(&app, "/health").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status"], "ok");

    let response = get(&app, "/api-doc/openapi.json").await;
    assert_eq!(response.status(), StatusCode::OK);
    let doc = body_json(response).await;
    assert_eq!(doc["info"]["title"], "Petgate API");
    assert!(doc["paths"]["/login"].is_object());
}
