// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::process::ExitCode;
use std::sync::Arc;

use sns_auth_server::{
    api::router,
    config::{AppConfig, LogFormat},
    members::{HmacCredentialVerifier, InMemoryUserStore},
    state::AppState,
    storage::{InMemoryTtlCache, RedisTtlCache, TtlCache},
    telemetry,
};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> ExitCode {
    telemetry::init(LogFormat::from_env());

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Server failed");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::from_env()?;

    let cache: Arc<dyn TtlCache> = match &config.cache_url {
        Some(url) => {
            tracing::info!("Using Redis TTL cache");
            Arc::new(RedisTtlCache::connect(url).await?)
        }
        None => {
            tracing::warn!(
                capacity = config.cache_capacity,
                "CACHE_URL not set, using in-process TTL cache (not shared between replicas)"
            );
            Arc::new(InMemoryTtlCache::new(config.cache_capacity))
        }
    };

    let users = Arc::new(InMemoryUserStore::new());
    if let Some(seed) = &config.seed_member {
        let member_id = users.register(&seed.identity, &seed.password).await?;
        tracing::info!(identity = %seed.identity, member_id, "Registered seed member");
    }

    let state = AppState::new(
        &config.auth,
        cache,
        users,
        Arc::new(HmacCredentialVerifier),
    );
    let app = router(state);

    let addr = config.bind_addr();
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "SNS auth server listening (docs at /docs)");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Gracefully shutdown");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
