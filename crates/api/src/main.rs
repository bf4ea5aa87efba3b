use std::sync::Arc;

use anyhow::Context;

use empdesk_api::app::{build_app, build_services};
use empdesk_api::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is normal outside local development.
    let _ = dotenvy::dotenv();

    let config = Config::from_env().context("invalid configuration")?;
    empdesk_observability::init(config.log_format);

    if config.using_dev_secret() {
        tracing::warn!("ACCESS_TOKEN_SECRET not set; using insecure dev default");
    }

    let services = Arc::new(
        build_services(&config)
            .await
            .context("failed to open document store")?,
    );
    services
        .store
        .ping()
        .await
        .context("document store did not answer ping")?;

    let app = build_app(services.clone());

    let addr = config.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    tracing::info!(addr = %listener.local_addr()?, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    services.store.close().await;
    tracing::info!("shutdown complete");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("received Ctrl+C, shutting down"),
        _ = terminate => tracing::info!("received SIGTERM, shutting down"),
    }
}
