use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use tracing::instrument;

use super::{dto::Total, services};
use crate::{auth::jwt::AuthUser, dates, error::ApiResult, state::AppState};

pub fn stats_routes() -> Router<AppState> {
    Router::new()
        .route("/stats/daily/:month", get(daily))
        .route("/stats/daily_person/:month", get(daily_person))
}

#[instrument(skip(state))]
pub async fn daily(
    State(state): State<AppState>,
    AuthUser(_username): AuthUser,
    Path(month): Path<String>,
) -> ApiResult<Json<Vec<Total>>> {
    let month = dates::parse_month(&month)?;
    Ok(Json(services::daily_totals(state.store.as_ref(), month).await?))
}

#[instrument(skip(state))]
pub async fn daily_person(
    State(state): State<AppState>,
    AuthUser(_username): AuthUser,
    Path(month): Path<String>,
) -> ApiResult<Json<Vec<Total>>> {
    let month = dates::parse_month(&month)?;
    Ok(Json(services::totals_by_payer(state.store.as_ref(), month).await?))
}
