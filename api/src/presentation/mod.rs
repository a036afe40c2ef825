use axum::Router;
use axum::extract::MatchedPath;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::bootstrap::app_context::AppContext;

pub mod http;
pub mod ws;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::presentation::http::auth::register,
        crate::presentation::http::auth::login,
        crate::presentation::http::health::health,
        crate::presentation::ws::socket::socket_entry,
    ),
    components(schemas(
        crate::presentation::http::auth::RegisterRequest,
        crate::presentation::http::auth::LoginRequest,
        crate::presentation::http::auth::AccountResponse,
        crate::presentation::http::errors::ErrorBody,
        crate::presentation::http::health::HealthResp,
        crate::domain::accounts::account::AccountView,
    )),
    tags(
        (name = "Auth", description = "Account registration and login"),
        (name = "Health", description = "Readiness checks"),
        (name = "Realtime", description = "Socket channel")
    )
)]
pub struct ApiDoc;

/// Full HTTP surface: health, auth, socket channel, docs, CORS and request
/// tracing.
pub fn app_router(ctx: AppContext) -> Router {
    let cors = http::cors::cors_layer(&ctx.cfg.allowed_origins);

    Router::new()
        .merge(http::health::routes(ctx.clone()))
        .nest("/api", http::health::routes(ctx.clone()))
        .nest("/api/auth", http::auth::routes(ctx.clone()))
        .merge(ws::routes())
        .merge(SwaggerUi::new("/api/docs").url("/api/openapi.json", ApiDoc::openapi()))
        .fallback(http::errors::not_found)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http().make_span_with(|req: &::http::Request<_>| {
                let method = req.method().clone();
                let uri = req.uri().clone();
                let matched = req
                    .extensions()
                    .get::<MatchedPath>()
                    .map(|p| p.as_str().to_string())
                    .unwrap_or_default();
                tracing::info_span!("http", %method, %uri, matched_path = %matched)
            }),
        )
}
