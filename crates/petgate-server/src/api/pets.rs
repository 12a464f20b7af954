// Pet registration and greeting routes
// Decision: Bodies are read as raw bytes and decoded by hand so decode failures stay a bare 500

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, Path, Query},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use super::common::ErrorResponse;

pub const GREETING: &str = "Hello from the petgate web server!";

/// A registered pet
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct Pet {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub age: String,
}

/// Kinds of pet the registration endpoints accept
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PetKind {
    Cat,
    Dog,
    Hamster,
}

impl PetKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PetKind::Cat => "cat",
            PetKind::Dog => "dog",
            PetKind::Hamster => "hamster",
        }
    }
}

/// Create ungated pet and greeting routes
pub fn routes() -> Router {
    Router::new()
        .route("/", get(hello))
        .route("/hello", get(hello))
        .route("/cats/:format", get(get_cats))
        .route("/addcat", post(add_cat))
        .route("/adddog", post(add_dog))
        .route("/addhamster", post(add_hamster))
}

/// GET /hello - Static greeting
#[utoipa::path(
    get,
    path = "/hello",
    responses((status = 200, description = "Greeting", body = String)),
    tag = "pets"
)]
pub async fn hello() -> &'static str {
    GREETING
}

/// GET /cats/{format} - Echo a cat described by query parameters
#[utoipa::path(
    get,
    path = "/cats/{format}",
    params(
        ("format" = String, Path, description = "Either `string` or `json`"),
        Pet
    ),
    responses(
        (status = 200, description = "Cat echoed in the requested format", body = Pet),
        (status = 400, description = "Unknown format", body = ErrorResponse),
    ),
    tag = "pets"
)]
pub async fn get_cats(Path(format): Path<String>, Query(cat): Query<Pet>) -> Response {
    match format.as_str() {
        "string" => format!(
            "Your cat's name is {} and cat's age is {}",
            cat.name, cat.age
        )
        .into_response(),
        "json" => Json(cat).into_response(),
        _ => ErrorResponse::bad_request("Data type must be 'string' or 'json'").into_response(),
    }
}

/// POST /addcat - Register a cat
#[utoipa::path(
    post,
    path = "/addcat",
    request_body = Pet,
    responses(
        (status = 200, description = "Cat registered", body = String),
        (status = 500, description = "Body could not be read or decoded"),
    ),
    tag = "pets"
)]
pub async fn add_cat(body: Result<Bytes, BytesRejection>) -> Result<String, StatusCode> {
    register(PetKind::Cat, body)
}

/// POST /adddog - Register a dog
#[utoipa::path(
    post,
    path = "/adddog",
    request_body = Pet,
    responses(
        (status = 200, description = "Dog registered", body = String),
        (status = 500, description = "Body could not be read or decoded"),
    ),
    tag = "pets"
)]
pub async fn add_dog(body: Result<Bytes, BytesRejection>) -> Result<String, StatusCode> {
    register(PetKind::Dog, body)
}

/// POST /addhamster - Register a hamster
#[utoipa::path(
    post,
    path = "/addhamster",
    request_body = Pet,
    responses(
        (status = 200, description = "Hamster registered", body = String),
        (status = 500, description = "Body could not be read or decoded"),
    ),
    tag = "pets"
)]
pub async fn add_hamster(body: Result<Bytes, BytesRejection>) -> Result<String, StatusCode> {
    register(PetKind::Hamster, body)
}

fn register(kind: PetKind, body: Result<Bytes, BytesRejection>) -> Result<String, StatusCode> {
    let body = body.map_err(|e| {
        tracing::error!(kind = kind.as_str(), "Failed to read request body: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    let pet = decode_pet(&body).map_err(|e| {
        tracing::error!(kind = kind.as_str(), "Failed to decode pet: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    tracing::info!(kind = kind.as_str(), name = %pet.name, age = %pet.age, "New pet registered");
    Ok(format!("We got your {} {}", kind.as_str(), pet.name))
}

fn decode_pet(body: &[u8]) -> Result<Pet, serde_json::Error> {
    serde_json::from_slice(body)
}
