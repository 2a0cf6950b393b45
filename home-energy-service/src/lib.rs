pub mod config;
pub mod dtos;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod startup;

use axum::{
    http::{header::HeaderValue, Method, Request},
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use service_core::middleware::{
    security_headers::security_headers_middleware,
    tracing::{request_id_middleware, REQUEST_ID_HEADER},
};
use std::sync::Arc;
use tower_http::{
    cors::{AllowHeaders, AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::HomeEnergyConfig;
use crate::middleware::metrics_middleware;
use crate::services::{AdviceProvider, HomeStore};

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health::health_check,
        handlers::homes::create_home,
        handlers::homes::get_home,
        handlers::homes::get_advice,
    ),
    components(schemas(
        dtos::CreateHomeRequest,
        dtos::HomeResponse,
        dtos::AdviceResponse,
        models::HeatingType,
        models::InsulationLevel,
    )),
    tags(
        (name = "Homes", description = "Home energy profiles"),
        (name = "Advice", description = "Energy-saving recommendations"),
        (name = "Observability", description = "Service health and monitoring"),
    )
)]
pub struct ApiDoc;

#[derive(Clone)]
pub struct AppState {
    pub config: HomeEnergyConfig,
    pub store: Arc<dyn HomeStore>,
    pub advice: Arc<dyn AdviceProvider>,
}

pub fn build_router(state: AppState) -> Router {
    let api = Router::new()
        .route("/homes", post(handlers::create_home))
        .route("/homes/:id", get(handlers::get_home))
        .route("/homes/:id/advice", post(handlers::get_advice));

    let mut app = Router::new()
        .nest("/api", api)
        .route("/health", get(handlers::health_check))
        .route("/ready", get(handlers::readiness_check))
        .route("/metrics", get(handlers::metrics));

    // Interactive docs only in debug mode
    if state.config.debug {
        app = app.merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));
    }

    let cors = cors_layer(&state.config.cors.allowed_origins);

    app.with_state(state)
        .layer(from_fn(metrics_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<_>| {
                let request_id = request
                    .headers()
                    .get(REQUEST_ID_HEADER)
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                )
            }),
        )
        .layer(from_fn(request_id_middleware))
        .layer(from_fn(security_headers_middleware))
        .layer(cors)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    // Credentialed CORS cannot answer with a literal `*`, so a wildcard
    // echoes the caller's origin instead.
    let allow_origin = if origins.iter().any(|o| o == "*") {
        AllowOrigin::mirror_request()
    } else {
        AllowOrigin::list(origins.iter().filter_map(|o| match o.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::error!(origin = %o, error = %e, "Ignoring invalid CORS origin");
                None
            }
        }))
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::PATCH,
            Method::OPTIONS,
        ])
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}
