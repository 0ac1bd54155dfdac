use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use tracing::instrument;

use super::{repo_types::Activity, services};
use crate::{auth::jwt::AuthUser, dates, error::ApiResult, state::AppState};

pub fn activity_routes() -> Router<AppState> {
    Router::new().route("/activities/:month", get(list_activities))
}

#[instrument(skip(state))]
pub async fn list_activities(
    State(state): State<AppState>,
    AuthUser(username): AuthUser,
    Path(month): Path<String>,
) -> ApiResult<Json<Vec<Activity>>> {
    let month = dates::parse_month(&month)?;
    let activities = services::list_by_month(state.store.as_ref(), month, &username).await?;
    Ok(Json(activities))
}
