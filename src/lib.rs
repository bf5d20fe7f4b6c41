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

//! Fetch per-host CPU and memory utilization rollups from Prometheus.
//!
//! [`PromClient`] issues one `<method>(<metric>[<window>])` instant query per
//! configured combination and folds every response into a [`HostMetrics`]
//! mapping keyed by the `instance` label.
//!
//! ```rust,no_run
//! use promload::{FetcherClient, PromClient, PromSettings, Window};
//!
//! # async fn run() -> promload::Result<()> {
//! let client = PromClient::new(PromSettings::from_env())?;
//! let hosts = client.fetch_all_hosts_metrics(&Window::new("5m")).await?;
//! for (host, metrics) in &hosts {
//!     println!("{host}: {} metrics", metrics.len());
//! }
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod cli;
pub mod error;
pub mod network;
pub mod traits;
pub mod watcher;

pub mod common {
    pub mod config;
}

pub use common::config::{AppConfig, PromSettings, TransportPolicy};
pub use error::{Error, Result};
pub use network::{AggregationMethod, NormalizeOutcome, PromClient, QuerySpec};
pub use traits::FetcherClient;
pub use watcher::{HostMetrics, HostMetricsReport, Metric, ResourceType, Window};
