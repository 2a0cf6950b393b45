use axum::{extract::State, Json};
use service_core::error::AppError;
use service_core::utils::{PositiveId, ValidatedJson};

use crate::dtos::{AdviceResponse, CreateHomeRequest, HomeResponse};
use crate::models::{CreateHome, Home};
use crate::services::metrics::{ADVICE_REQUESTS_TOTAL, HOMES_CREATED};
use crate::AppState;

pub const HOME_NOT_FOUND: &str = "Home not found";
pub const ADVICE_UNAVAILABLE: &str =
    "Advice service is temporarily unavailable. Please try again later.";

/// Create a home profile
#[utoipa::path(
    post,
    path = "/api/homes",
    request_body = CreateHomeRequest,
    responses(
        (status = 200, description = "Home created", body = HomeResponse),
        (status = 422, description = "Validation error")
    ),
    tag = "Homes"
)]
pub async fn create_home(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CreateHomeRequest>,
) -> Result<Json<HomeResponse>, AppError> {
    let input = CreateHome::from(req);
    let home = state.store.create_home(&input).await?;

    HOMES_CREATED
        .with_label_values(&[home.heating_type.as_str()])
        .inc();
    tracing::info!(home_id = home.id, heating_type = %home.heating_type, "Home profile created");

    Ok(Json(home.into()))
}

/// Get a home profile by id
#[utoipa::path(
    get,
    path = "/api/homes/{id}",
    params(("id" = i64, Path, description = "Home ID (>= 1)")),
    responses(
        (status = 200, description = "Home found", body = HomeResponse),
        (status = 404, description = "Home not found"),
        (status = 422, description = "Malformed or non-positive id")
    ),
    tag = "Homes"
)]
pub async fn get_home(
    State(state): State<AppState>,
    PositiveId(id): PositiveId,
) -> Result<Json<HomeResponse>, AppError> {
    let home = find_home(&state, id).await?;
    Ok(Json(home.into()))
}

/// Generate energy-saving recommendations for a home
#[utoipa::path(
    post,
    path = "/api/homes/{id}/advice",
    params(("id" = i64, Path, description = "Home ID (>= 1)")),
    responses(
        (status = 200, description = "Recommendations generated", body = AdviceResponse),
        (status = 404, description = "Home not found"),
        (status = 422, description = "Malformed or non-positive id"),
        (status = 503, description = "Advice backend unavailable")
    ),
    tag = "Advice"
)]
pub async fn get_advice(
    State(state): State<AppState>,
    PositiveId(id): PositiveId,
) -> Result<Json<AdviceResponse>, AppError> {
    let home = find_home(&state, id).await?;
    let provider = state.advice.name();

    match state.advice.generate_advice(&home).await {
        Ok(recommendations) => {
            ADVICE_REQUESTS_TOTAL
                .with_label_values(&[provider, "ok"])
                .inc();
            tracing::info!(
                home_id = id,
                provider = provider,
                count = recommendations.len(),
                "Advice generated"
            );
            Ok(Json(AdviceResponse { recommendations }))
        }
        Err(e) => {
            ADVICE_REQUESTS_TOTAL
                .with_label_values(&[provider, "unavailable"])
                .inc();
            tracing::error!(
                home_id = id,
                provider = provider,
                error = ?e,
                "Advice generation failed"
            );
            Err(AppError::ServiceUnavailable(ADVICE_UNAVAILABLE.to_string()))
        }
    }
}

async fn find_home(state: &AppState, id: i64) -> Result<Home, AppError> {
    state
        .store
        .get_home(id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!(HOME_NOT_FOUND)))
}
