use std::collections::BTreeMap;

use axum::Json;
use axum::extract::OriginalUri;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

use crate::application::use_cases::auth::login::LoginError;
use crate::application::use_cases::auth::register::RegisterError;
use crate::application::use_cases::auth::validation::ValidationErrors;

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    pub status: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<BTreeMap<String, String>>,
}

/// Rejection returned by every handler. Only carries caller-safe text; the
/// underlying cause is logged where the error is converted.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    pub details: Option<BTreeMap<String, String>>,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            details: None,
        }
    }

    pub fn validation(errors: &ValidationErrors) -> Self {
        let details = errors
            .errors()
            .iter()
            .map(|e| (e.field.to_string(), e.message.clone()))
            .collect();
        Self {
            status: StatusCode::BAD_REQUEST,
            message: "Validation failed".into(),
            details: Some(details),
        }
    }

    pub fn internal() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            status: "error",
            message: self.message,
            details: self.details,
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<RegisterError> for ApiError {
    fn from(err: RegisterError) -> Self {
        match err {
            RegisterError::Validation(errors) => ApiError::validation(&errors),
            RegisterError::Conflict => ApiError::new(StatusCode::CONFLICT, "User already exists"),
            RegisterError::Hashing(e) | RegisterError::Storage(e) => {
                tracing::error!(error = ?e, "register_internal_error");
                ApiError::internal()
            }
        }
    }
}

impl From<LoginError> for ApiError {
    fn from(err: LoginError) -> Self {
        match err {
            LoginError::Validation(errors) => ApiError::validation(&errors),
            LoginError::InvalidCredentials => {
                ApiError::new(StatusCode::UNAUTHORIZED, "Invalid credentials")
            }
            LoginError::Storage(e) => {
                tracing::error!(error = ?e, "login_internal_error");
                ApiError::internal()
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        // The body text can quote client-supplied values, credentials included.
        tracing::debug!(status = %rejection.status(), "json_body_rejected");
        ApiError::new(StatusCode::BAD_REQUEST, "Request body must be a JSON object")
    }
}

pub async fn not_found(OriginalUri(uri): OriginalUri) -> ApiError {
    tracing::debug!(%uri, "route_not_found");
    ApiError::new(StatusCode::NOT_FOUND, format!("Route {} not found", uri.path()))
}
