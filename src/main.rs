use std::{net::SocketAddr, sync::Arc};

use axum::Router;
use tower_http::trace::TraceLayer;

use evently::{
    config::AppConfig,
    db::connection,
    logging::init_tracing,
    middleware::{catch_panic_layer, json_error_middleware},
    routes::router,
    state::AppState,
};

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        tracing::error!("server failed: {err:?}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cfg = AppConfig::from_env()?;
    init_tracing(&cfg.logging.rust_log);

    let database_cfg = cfg
        .database
        .clone()
        .ok_or_else(|| anyhow::anyhow!("database config is required (APP_DATABASE__URL)"))?;
    let db = connection::connect(&database_cfg).await?;

    let state = AppState::new(cfg, db);

    if let Some(auth_cfg) = state.config.auth.clone() {
        state
            .services
            .auth
            .seed_admin(&auth_cfg)
            .await
            .map_err(|err| anyhow::anyhow!("admin seeding failed: {err}"))?;
    }

    let app = Router::new()
        .merge(router(Arc::clone(&state)))
        .layer(axum::middleware::from_fn(json_error_middleware))
        .layer(catch_panic_layer())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", state.config.general.host, state.config.general.port)
        .parse()
        .map_err(|err| anyhow::anyhow!("invalid host/port: {err}"))?;
    tracing::info!("listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
