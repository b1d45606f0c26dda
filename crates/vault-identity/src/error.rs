use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

/// Failures inside a strategy. Never sent to the caller; every one of them
/// collapses into a [`Rejection`].
#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("jwt header missing kid")]
    MissingKid,
    #[error("unknown jwk key id {0}")]
    UnknownKey(String),
    #[error("unsupported jwt algorithm {0}")]
    UnsupportedAlgorithm(String),
    #[error("jwt validation failed: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
    #[error("jwks fetch failed: {0}")]
    JwksFetch(String),
    #[error("session lookup failed: {0}")]
    SessionLookup(String),
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("token has no subject")]
    MissingSubject,
}

/// The only outcomes a caller ever sees when resolution fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("Unauthorized - No valid session or token")]
    NoCredentials,
    #[error("Unauthorized - Invalid token")]
    InvalidToken,
}

impl IntoResponse for Rejection {
    fn into_response(self) -> Response {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": self.to_string() })),
        )
            .into_response()
    }
}
