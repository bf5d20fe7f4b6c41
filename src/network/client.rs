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

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use tracing::{debug, info, warn};

use super::metrics_parser::normalize_response;
use super::query::{build_query_url, default_queries, QuerySpec};
use crate::common::config::{PromSettings, TransportPolicy};
use crate::error::{Error, Result};
use crate::traits::FetcherClient;
use crate::watcher::{HostMetrics, Window};

/// Prometheus-backed [`FetcherClient`].
///
/// Queries are issued one after another, in the order of the configured
/// query list, so each host's metrics come back in that order too.
pub struct PromClient {
    client: reqwest::Client,
    settings: PromSettings,
    queries: Vec<QuerySpec>,
}

impl PromClient {
    pub fn new(settings: PromSettings) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(settings.timeout)
            .danger_accept_invalid_certs(settings.accept_invalid_certs)
            .build()
            .map_err(Error::ClientBuild)?;

        Ok(Self {
            client,
            settings,
            queries: default_queries(),
        })
    }

    /// Replace the default avg/stddev × cpu/memory combinations.
    pub fn with_queries(mut self, queries: Vec<QuerySpec>) -> Self {
        self.queries = queries;
        self
    }

    pub fn settings(&self) -> &PromSettings {
        &self.settings
    }

    pub fn queries(&self) -> &[QuerySpec] {
        &self.queries
    }

    async fn run_query(
        &self,
        query: &QuerySpec,
        rollup: &str,
        host_metrics: &mut HostMetrics,
    ) -> Result<()> {
        let url = build_query_url(&self.settings.host, &query.expression(rollup));
        debug!("querying {url}");

        let mut request = self
            .client
            .get(&url)
            .header(CONTENT_TYPE, "application/json");
        if let Some(bearer) = self.settings.bearer_header() {
            request = request.header(AUTHORIZATION, bearer);
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => return self.transport_failure(url, e),
        };

        let status = response.status();
        let body = match response.text().await {
            Ok(text) => text,
            Err(e) => return self.transport_failure(url, e),
        };

        let outcome = normalize_response(status, &body, query, rollup, host_metrics);
        debug!("{url}: {outcome:?}");
        Ok(())
    }

    fn transport_failure(&self, url: String, source: reqwest::Error) -> Result<()> {
        match self.settings.transport_policy {
            TransportPolicy::Lenient => {
                warn!("request to {url} failed: {source}");
                Ok(())
            }
            TransportPolicy::Strict => Err(Error::Transport { url, source }),
        }
    }
}

#[async_trait]
impl FetcherClient for PromClient {
    async fn fetch_all_hosts_metrics(&self, window: &Window) -> Result<HostMetrics> {
        let mut host_metrics = HostMetrics::new();

        for query in &self.queries {
            self.run_query(query, &window.duration, &mut host_metrics)
                .await?;
        }

        info!(
            "collected {} metrics for {} hosts over {}",
            host_metrics.values().map(Vec::len).sum::<usize>(),
            host_metrics.len(),
            window.duration
        );
        Ok(host_metrics)
    }
}
