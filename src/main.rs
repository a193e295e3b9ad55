// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Sumanize

use std::net::SocketAddr;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use sumanize_server::{
    api,
    auth::{MemorySessionCache, SessionCache},
    config::AppConfig,
    provider::{HttpIdentityProvider, IdentityProvider},
    state::AppState,
    store,
    summarizer::{HttpSummarizer, Summarizer},
    sync::{self, SyncSink},
};

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug"));

    if json {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("failed to listen for shutdown signal");
}

#[tokio::main]
async fn main() {
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("configuration error: {err}");
            std::process::exit(1);
        }
    };

    init_tracing(config.log_json);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .expect("failed to parse bind address");

    let sessions: Arc<dyn SessionCache> = Arc::new(MemorySessionCache::default());
    let summarizer: Arc<dyn Summarizer> =
        Arc::new(HttpSummarizer::new(config.summarizer_url.clone()));
    let provider: Arc<dyn IdentityProvider> =
        Arc::new(HttpIdentityProvider::new(config.provider_token_url.clone()));

    let store = store::shared();
    let cancel = CancellationToken::new();
    let sink: Arc<dyn SyncSink> = Arc::new(store.clone());
    let (sync_handle, sync_worker) = sync::spawn(sink, cancel.clone());

    let state = AppState::new(config, sessions, summarizer, provider, store, sync_handle);
    let app = api::router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("failed to bind listener");

    tracing::info!(%addr, "sumanize server listening (docs at /docs)");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server failed");

    // Let the sync worker drain queued jobs before the process exits.
    cancel.cancel();
    if let Err(err) = sync_worker.await {
        tracing::error!(error = %err, "sync worker did not shut down cleanly");
    }
}
