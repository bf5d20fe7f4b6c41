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

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;

use crate::common::config::AppConfig;
use crate::traits::FetcherClient;
use crate::watcher::{HostMetricsReport, Window};

pub type SharedFetcher = Arc<dyn FetcherClient>;

#[derive(Debug, Deserialize)]
pub struct WatcherParams {
    pub window: Option<String>,
}

/// Fetch fresh host metrics for the requested window.
pub async fn watcher_handler(
    State(fetcher): State<SharedFetcher>,
    Query(params): Query<WatcherParams>,
) -> Response {
    let window = Window::new(
        params
            .window
            .filter(|w| !w.is_empty())
            .unwrap_or_else(|| AppConfig::DEFAULT_WINDOW.to_string()),
    );

    match fetcher.fetch_all_hosts_metrics(&window).await {
        Ok(hosts) => Json(HostMetricsReport::new(window, hosts)).into_response(),
        Err(e) => {
            tracing::error!("fetch over {} failed: {e}", window.duration);
            (StatusCode::BAD_GATEWAY, e.to_string()).into_response()
        }
    }
}

pub async fn health_handler() -> &'static str {
    "ok"
}
