// Copyright 2025 Lablup Inc. and Jeongkyu Shin
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::sync::Arc;

use axum::{routing::get, Router};
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::trace::TraceLayer;

use crate::api::handlers::{health_handler, watcher_handler, SharedFetcher};
use crate::cli::ApiArgs;
use crate::error::Result;
use crate::network::PromClient;

/// Routes served in API mode.
///
/// `GET /watcher?window=5m` runs one fetch per request; nothing is cached.
pub fn router(fetcher: SharedFetcher) -> Router {
    Router::new()
        .route("/watcher", get(watcher_handler))
        .route("/healthz", get(health_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(fetcher)
}

/// Run the API server until Ctrl+C or SIGTERM.
pub async fn run_api_mode(args: &ApiArgs) -> Result<()> {
    let settings = args.backend.settings();
    tracing::info!("Using Prometheus backend at {}", settings.host);
    let fetcher: SharedFetcher = Arc::new(PromClient::new(settings)?);

    let listener = TcpListener::bind(("0.0.0.0", args.port)).await?;
    tracing::info!("API server listening on {}", listener.local_addr()?);

    axum::serve(listener, router(fetcher))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("API server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {e}");
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
