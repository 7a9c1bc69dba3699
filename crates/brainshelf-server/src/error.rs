use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use brainshelf_core::domain::{AuthError, CatalogError};
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        ApiError::Catalog(CatalogError::Unauthorized(err))
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MalformedPayload(_) => StatusCode::BAD_REQUEST,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Catalog(err) => match err {
                CatalogError::Validation(_) => StatusCode::BAD_REQUEST,
                CatalogError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
                CatalogError::Forbidden(_) => StatusCode::FORBIDDEN,
                CatalogError::NotFound(_) => StatusCode::NOT_FOUND,
                CatalogError::Conflict(_) => StatusCode::CONFLICT,
                CatalogError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!(error = %self, "request failed");
            "An internal error occurred.".to_string()
        } else {
            if status == StatusCode::UNAUTHORIZED {
                warn!(error = %self, "rejected request");
            }
            self.to_string()
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
