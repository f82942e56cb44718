use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

pub const MISSING_POKEMON: &str = "Missing pokemon data or id";
pub const MISSING_POKEMON_ID: &str = "Missing pokemon id";
pub const DUPLICATE_MEMBER: &str = "Pokemon already in team";
pub const TEAM_FULL: &str = "Team cannot have more than 6 Pokémon";
pub const MISSING_FIELDS: &str = "All fields are required";
pub const INVALID_EMAIL: &str = "Please enter a valid email address";
pub const MESSAGE_NOT_FOUND: &str = "Message not found";

/// Errors rendered as `(status, {"error": message})`.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
}

pub type Result<T> = std::result::Result<T, ApiError>;

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}
