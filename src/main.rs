mod activities;
mod app;
mod auth;
mod config;
mod dates;
mod entries;
mod error;
mod state;
mod stats;
mod store;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "hisaab=debug,axum=info,tower_http=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let app_state = state::AppState::init().await?;

    if let Some(code) = &app_state.config.seed_registration_code {
        auth::services::ensure_code(app_state.store.as_ref(), code).await?;
    }

    let store = app_state.store.clone();
    let result = app::serve(app::build_app(app_state)).await;

    store.close().await;
    tracing::info!("store closed");
    result
}
