use booking_backend::{app, config::AppConfig, db, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env values win over the process environment
    dotenvy::dotenv_override().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "booking_backend=debug,axum=info,tower_http=info".to_string());
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

    let config = AppConfig::from_env()?;
    let addr = config.listen_addr()?;

    let pool = db::connect(&config).await?;
    db::migrate(&pool).await;

    let state = AppState::init(&config, pool)?;
    app::serve(app::build_app(state), addr).await
}
