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

use std::time::Duration;

use clap::{Args, Parser, Subcommand};

use crate::common::config::{AppConfig, PromSettings, TransportPolicy};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch host metrics once and print them as JSON.
    Fetch(FetchArgs),
    /// Run an HTTP server that fetches host metrics on request.
    Api(ApiArgs),
}

/// Backend options shared by every mode. Unset values come from
/// `PROM_HOST` / `PROM_TOKEN`.
#[derive(Args, Clone, Debug)]
pub struct BackendArgs {
    /// Prometheus address as host:port or a full http(s) URL.
    #[arg(long)]
    pub host: Option<String>,
    /// Request timeout in seconds.
    #[arg(long, default_value_t = AppConfig::CONNECTION_TIMEOUT_SECS)]
    pub timeout: u64,
    /// Verify the backend's TLS certificate.
    #[arg(long)]
    pub verify_tls: bool,
    /// Fail the whole fetch when the backend cannot be reached.
    #[arg(long)]
    pub strict: bool,
}

impl BackendArgs {
    pub fn settings(&self) -> PromSettings {
        self.apply(PromSettings::from_env())
    }

    fn apply(&self, mut settings: PromSettings) -> PromSettings {
        if let Some(host) = &self.host {
            settings = settings.with_host(host.clone());
        }
        let policy = if self.strict {
            TransportPolicy::Strict
        } else {
            TransportPolicy::Lenient
        };
        settings
            .with_timeout(Duration::from_secs(self.timeout))
            .with_accept_invalid_certs(!self.verify_tls)
            .with_transport_policy(policy)
    }
}

#[derive(Parser, Clone, Debug)]
pub struct FetchArgs {
    /// Rollup window passed to the backend, e.g. 5m or 1h.
    #[arg(short, long, default_value = AppConfig::DEFAULT_WINDOW)]
    pub window: String,
    /// Pretty-print the JSON output.
    #[arg(long)]
    pub pretty: bool,
    #[command(flatten)]
    pub backend: BackendArgs,
}

#[derive(Parser, Clone, Debug)]
pub struct ApiArgs {
    /// The port to listen on for the API server.
    #[arg(short, long, default_value_t = AppConfig::DEFAULT_API_PORT)]
    pub port: u16,
    #[command(flatten)]
    pub backend: BackendArgs,
}
