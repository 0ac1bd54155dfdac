use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::instrument;

use super::{
    dto::{EntryPayload, EntryResponse},
    repo_types::Entry,
    services,
};
use crate::{
    auth::{dto::MessageResponse, jwt::AuthUser},
    error::ApiResult,
    state::AppState,
};

pub fn entry_routes() -> Router<AppState> {
    Router::new()
        .route("/entries", get(list_entries).post(create_entry))
        .route(
            "/entries/:id",
            get(get_entry).put(update_entry).delete(delete_entry),
        )
}

pub fn maintenance_routes() -> Router<AppState> {
    Router::new().route("/clear/month", get(clear_entries))
}

#[instrument(skip(state))]
pub async fn list_entries(
    State(state): State<AppState>,
    AuthUser(username): AuthUser,
) -> ApiResult<Json<Vec<Entry>>> {
    Ok(Json(services::list_entries(state.store.as_ref(), &username).await?))
}

#[instrument(skip(state))]
pub async fn get_entry(
    State(state): State<AppState>,
    AuthUser(_username): AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<Entry>> {
    Ok(Json(services::get_entry(state.store.as_ref(), &id).await?))
}

#[instrument(skip(state, payload))]
pub async fn create_entry(
    State(state): State<AppState>,
    AuthUser(username): AuthUser,
    payload: Result<Json<EntryPayload>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<EntryResponse>)> {
    let Json(payload) = payload?;
    let entry = services::create_entry(state.store.as_ref(), &username, payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(EntryResponse {
            message: "Entry created successfully",
            entry,
        }),
    ))
}

#[instrument(skip(state, payload))]
pub async fn update_entry(
    State(state): State<AppState>,
    AuthUser(username): AuthUser,
    Path(id): Path<String>,
    payload: Result<Json<EntryPayload>, JsonRejection>,
) -> ApiResult<Json<EntryResponse>> {
    let Json(payload) = payload?;
    let entry = services::update_entry(state.store.as_ref(), &username, &id, payload).await?;
    Ok(Json(EntryResponse {
        message: "Entry updated successfully",
        entry,
    }))
}

#[instrument(skip(state))]
pub async fn delete_entry(
    State(state): State<AppState>,
    AuthUser(username): AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    services::delete_entry(state.store.as_ref(), &username, &id).await?;
    Ok(Json(MessageResponse {
        message: "Entry deleted successfully",
    }))
}

#[instrument(skip(state))]
pub async fn clear_entries(
    State(state): State<AppState>,
    AuthUser(username): AuthUser,
) -> ApiResult<Json<MessageResponse>> {
    services::clear_all(state.store.as_ref(), &username).await?;
    Ok(Json(MessageResponse {
        message: "Records cleared",
    }))
}
