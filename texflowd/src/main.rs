use std::sync::Arc;

use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use texflowd::api;
use texflowd::compile::CompileEngine;
use texflowd::config::Config;
use texflowd::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "texflowd=debug,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    info!(
        port = config.port,
        root = %config.workspace_root.display(),
        renderer = %config.renderer_bin,
        "texflowd starting"
    );

    // The root exists before the first request; per-request subdirectories
    // are created and removed by the engine.
    tokio::fs::create_dir_all(&config.workspace_root).await?;

    let state = AppState {
        engine: Arc::new(CompileEngine::new(&config)),
    };

    // The editor frontend is served from another origin, so CORS is open
    // for all routes.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = api::router()
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = format!("0.0.0.0:{}", config.port);
    info!("listening on {addr}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
