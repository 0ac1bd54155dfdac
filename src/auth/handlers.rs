use axum::{
    extract::{rejection::JsonRejection, FromRef, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;

use crate::{
    auth::{
        dto::{CodeResponse, LoginRequest, LoginResponse, MessageResponse, RegisterRequest},
        jwt::{AuthUser, JwtKeys},
        services,
    },
    error::ApiResult,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/generate_code", post(generate_code))
        .route("/users", get(list_users))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<MessageResponse>)> {
    let Json(payload) = payload?;
    services::register(state.store.as_ref(), payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "User registered successfully",
        }),
    ))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<Json<LoginResponse>> {
    let Json(payload) = payload?;
    let keys = JwtKeys::from_ref(&state);
    let token = services::login(state.store.as_ref(), &keys, payload).await?;
    Ok(Json(LoginResponse {
        message: "Login successful",
        token,
    }))
}

#[instrument(skip(state))]
pub async fn generate_code(
    State(state): State<AppState>,
    AuthUser(username): AuthUser,
) -> ApiResult<(StatusCode, Json<CodeResponse>)> {
    let code = services::generate_code(state.store.as_ref(), &username).await?;
    Ok((
        StatusCode::CREATED,
        Json(CodeResponse {
            message: "Registration code generated",
            code,
        }),
    ))
}

#[instrument(skip(state))]
pub async fn list_users(
    State(state): State<AppState>,
    AuthUser(_username): AuthUser,
) -> ApiResult<Json<Vec<String>>> {
    Ok(Json(services::list_usernames(state.store.as_ref()).await?))
}
