// SPDX-License-Identifier: Apache-2.0
#![forbid(unsafe_code)]

use std::env;

use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use tipple_server::{build_router, AppState, ServerConfig};
use tipple_store::schema;

fn env_bool(name: &str, default: bool) -> bool {
    env::var(name)
        .ok()
        .and_then(|v| match v.as_str() {
            "1" | "true" | "TRUE" | "yes" | "YES" => Some(true),
            "0" | "false" | "FALSE" | "no" | "NO" => Some(false),
            _ => None,
        })
        .unwrap_or(default)
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("TIPPLE_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    if env_bool("TIPPLE_LOG_JSON", false) {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

async fn wait_for_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let mut sigterm = signal(SignalKind::terminate()).expect("register SIGTERM");
        let mut sigint = signal(SignalKind::interrupt()).expect("register SIGINT");
        tokio::select! {
            _ = sigterm.recv() => {}
            _ = sigint.recv() => {}
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}

#[tokio::main]
async fn main() -> Result<(), String> {
    init_tracing();

    let config = ServerConfig::from_env();
    let conn = match &config.db_path {
        Some(path) => schema::open_at(path)
            .map_err(|e| format!("open database at {}: {e}", path.display()))?,
        None => schema::open_memory().map_err(|e| format!("open in-memory database: {e}"))?,
    };
    info!(
        db = %config
            .db_path
            .as_ref()
            .map_or_else(|| ":memory:".to_string(), |p| p.display().to_string()),
        "database ready"
    );

    let bind = config.bind.clone();
    let app = build_router(AppState::new(conn, config));
    let listener = TcpListener::bind(&bind)
        .await
        .map_err(|e| format!("bind {bind}: {e}"))?;
    info!(addr = %bind, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(wait_for_shutdown_signal())
        .await
        .map_err(|e| format!("server error: {e}"))?;
    info!("shutdown complete");
    Ok(())
}
