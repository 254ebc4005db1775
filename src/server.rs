//! Process lifecycle: build dependencies, serve, shut down.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, anyhow};
use axum::Router;
use chrono::TimeDelta;
use metrics_exporter_prometheus::PrometheusHandle;
use sales_auth::{KeyStore, TokenAuthority};
use sales_config::Config;
use sales_web::ShutdownSignal;
use tokio::net::TcpListener;
use tokio::sync::{mpsc, oneshot};
use tracing::{error, info, warn};

use crate::metrics::Metrics;
use crate::modules::users::memory::InMemoryStore;
use crate::router::{init_debug_router, init_router};
use crate::state::AppState;

/// Runs the service until an OS signal or a shutdown request from a
/// handler, then drains in-flight requests for at most
/// `config.web.shutdown_timeout`.
pub async fn run(config: Config, prometheus: Option<PrometheusHandle>) -> anyhow::Result<()> {
    info!(
        api_host = %config.web.api_host,
        debug_host = %config.web.debug_host,
        keys_folder = %config.auth.keys_folder,
        active_kid = %config.auth.active_kid,
        "starting service"
    );

    let keys = Arc::new(
        KeyStore::from_dir(&config.auth.keys_folder)
            .with_context(|| format!("loading keys from {}", config.auth.keys_folder))?,
    );
    let algorithm = TokenAuthority::parse_algorithm(&config.auth.algorithm)?;
    let authority = TokenAuthority::with_algorithm(keys, config.auth.active_kid.clone(), algorithm)
        .context("constructing token authority")?;

    let token_ttl = TimeDelta::from_std(config.auth.token_ttl).context("token ttl out of range")?;
    let store = InMemoryStore::seeded(config.auth.issuer.clone(), token_ttl)?;

    let state = AppState {
        authority: Arc::new(authority),
        store: Arc::new(store),
        metrics: Arc::new(Metrics::new()),
        build: env!("CARGO_PKG_VERSION").to_string(),
        request_timeout: config.web.request_timeout,
    };

    let debug_listener = TcpListener::bind(&config.web.debug_host)
        .await
        .with_context(|| format!("binding debug listener {}", config.web.debug_host))?;
    let debug_router = init_debug_router(state.clone(), prometheus);
    tokio::spawn(async move {
        if let Err(err) = axum::serve(debug_listener, debug_router).await {
            error!(error = %err, "debug listener stopped");
        }
    });
    info!(addr = %config.web.debug_host, "debug listener started");

    let (shutdown_tx, shutdown_rx) = mpsc::channel(1);
    let api = init_router(state, shutdown_tx, &config.cors);

    let listener = TcpListener::bind(&config.web.api_host)
        .await
        .with_context(|| format!("binding api listener {}", config.web.api_host))?;
    info!(addr = %config.web.api_host, "api listener started");

    serve(listener, api, shutdown_rx, config.web.shutdown_timeout, os_signal()).await
}

/// Serves `router` on `listener` until `os_signal` resolves or a
/// [`ShutdownSignal`] arrives, then shuts down gracefully within
/// `shutdown_timeout`.
pub async fn serve(
    listener: TcpListener,
    router: Router,
    mut shutdown_rx: mpsc::Receiver<ShutdownSignal>,
    shutdown_timeout: Duration,
    os_signal: impl Future<Output = &'static str>,
) -> anyhow::Result<()> {
    let (stop_tx, stop_rx) = oneshot::channel::<()>();

    let mut server = tokio::spawn(async move {
        axum::serve(listener, router.into_make_service_with_connect_info::<SocketAddr>())
            .with_graceful_shutdown(async {
                let _ = stop_rx.await;
            })
            .await
    });

    tokio::select! {
        name = os_signal => info!(signal = name, "shutdown started"),
        Some(signal) = shutdown_rx.recv() => warn!(reason = %signal.reason, "shutdown requested by handler"),
        result = &mut server => {
            return match result {
                Ok(Ok(())) => Err(anyhow!("api server stopped unexpectedly")),
                Ok(Err(err)) => Err(err).context("serving api"),
                Err(err) => Err(err).context("api server task"),
            };
        }
    }

    let _ = stop_tx.send(());

    match tokio::time::timeout(shutdown_timeout, &mut server).await {
        Ok(Ok(Ok(()))) => {
            info!("shutdown complete");
            Ok(())
        }
        Ok(Ok(Err(err))) => Err(err).context("serving api during shutdown"),
        Ok(Err(err)) => Err(err).context("api server task"),
        Err(_) => {
            server.abort();
            Err(anyhow!(
                "could not stop server gracefully within {}s",
                shutdown_timeout.as_secs()
            ))
        }
    }
}

/// Resolves on SIGINT or SIGTERM with the signal's name.
pub async fn os_signal() -> &'static str {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!(error = %err, "listening for SIGINT");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                error!(error = %err, "listening for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => "SIGINT",
        _ = terminate => "SIGTERM",
    }
}
