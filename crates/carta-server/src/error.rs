use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use carta_core::CartaError;

/// Error HTTP del servidor, construido desde el dominio.
#[derive(Debug)]
pub struct AppError(pub CartaError);

#[derive(Serialize)]
struct ErrorResponse {
    detail: String,
}

impl From<CartaError> for AppError {
    fn from(err: CartaError) -> Self {
        Self(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            CartaError::NotFound { .. } => StatusCode::NOT_FOUND,
            CartaError::Conflict { .. } => StatusCode::CONFLICT,
            CartaError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(ErrorResponse {
            detail: self.0.to_string(),
        });

        (status, body).into_response()
    }
}
