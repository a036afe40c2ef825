use std::fmt;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    routing::post,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::application::use_cases::auth::login::{Login as LoginUc, LoginRequest as LoginDto};
use crate::application::use_cases::auth::register::{
    Register as RegisterUc, RegisterRequest as RegisterDto,
};
use crate::bootstrap::app_context::AppContext;
use crate::domain::accounts::account::AccountView;
use crate::presentation::http::errors::ApiError;

/// Wire names from older clients (`password`, `name`) are accepted as aliases.
#[derive(Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, alias = "password")]
    pub credential: Option<String>,
    #[serde(default, alias = "name")]
    pub display_name: Option<String>,
}

impl fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("email", &self.email)
            .field("credential", &self.credential.as_ref().map(|_| "<redacted>"))
            .field("display_name", &self.display_name)
            .finish()
    }
}

#[derive(Default, Deserialize, ToSchema)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, alias = "password")]
    pub credential: Option<String>,
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("credential", &self.credential.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AccountResponse {
    pub status: &'static str,
    pub data: AccountView,
}

impl AccountResponse {
    fn success(data: AccountView) -> Self {
        Self {
            status: "success",
            data,
        }
    }
}

pub fn routes(ctx: AppContext) -> Router {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .with_state(ctx)
}

#[utoipa::path(post, path = "/api/auth/register", tag = "Auth", request_body = RegisterRequest, responses(
    (status = 201, body = AccountResponse),
    (status = 400, body = crate::presentation::http::errors::ErrorBody, description = "Missing or malformed fields"),
    (status = 409, body = crate::presentation::http::errors::ErrorBody, description = "Email already registered"),
    (status = 500, body = crate::presentation::http::errors::ErrorBody)
))]
pub async fn register(
    State(ctx): State<AppContext>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<AccountResponse>), ApiError> {
    let Json(req) = payload?;
    let repo = ctx.account_repo();
    let hasher = ctx.credential_hasher();
    let uc = RegisterUc {
        repo: repo.as_ref(),
        hasher: hasher.as_ref(),
    };
    let dto = RegisterDto {
        email: req.email,
        credential: req.credential,
        display_name: req.display_name,
    };
    let account = uc.execute(&dto).await?;
    Ok((StatusCode::CREATED, Json(AccountResponse::success(account))))
}

#[utoipa::path(post, path = "/api/auth/login", tag = "Auth", request_body = LoginRequest, responses(
    (status = 200, body = AccountResponse),
    (status = 400, body = crate::presentation::http::errors::ErrorBody),
    (status = 401, body = crate::presentation::http::errors::ErrorBody, description = "Unknown email or wrong credential")
))]
pub async fn login(
    State(ctx): State<AppContext>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<AccountResponse>, ApiError> {
    let Json(req) = payload?;
    let repo = ctx.account_repo();
    let hasher = ctx.credential_hasher();
    let uc = LoginUc {
        repo: repo.as_ref(),
        hasher: hasher.as_ref(),
    };
    let dto = LoginDto {
        email: req.email,
        credential: req.credential,
    };
    let account = uc.execute(&dto).await?;
    Ok(Json(AccountResponse::success(account)))
}
