//! idmetrics exporter
//!
//! - Loads `idmetrics.yaml` (or `$IDMETRICS_CONFIG`)
//! - Registers the identity metric catalog; any registration error aborts
//! - Serves `/metrics`, `/metrics.json` and `/healthz`

use std::process::ExitCode;

use tracing_subscriber::{fmt, EnvFilter};

use idmetrics_exporter::{app_state::AppState, config, router};

#[tokio::main]
async fn main() -> ExitCode {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let path = std::env::var(config::CONFIG_PATH_ENV)
        .unwrap_or_else(|_| config::DEFAULT_CONFIG_PATH.to_string());

    let cfg = match config::load_from_file(&path) {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!(%path, error = %e, "config load failed");
            return ExitCode::FAILURE;
        }
    };
    let state = match AppState::new(cfg) {
        Ok(state) => state,
        Err(e) => {
            tracing::error!(code = e.code().as_str(), error = %e, "metric registration failed");
            return ExitCode::FAILURE;
        }
    };
    let listen = match state.cfg().exporter.listen_addr() {
        Ok(addr) => addr,
        Err(e) => {
            tracing::error!(error = %e, "bad listen address");
            return ExitCode::FAILURE;
        }
    };
    let app = router::build_router(state);

    tracing::info!(%listen, "idmetrics-exporter starting");
    let listener = match tokio::net::TcpListener::bind(listen).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!(%listen, error = %e, "failed to bind");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!(error = %e, "server failed");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
