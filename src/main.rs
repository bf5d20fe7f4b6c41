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

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use promload::api::run_api_mode;
use promload::cli::{Cli, Commands, FetchArgs};
use promload::{FetcherClient, HostMetricsReport, PromClient, Window};

#[tokio::main]
async fn main() -> ExitCode {
    // Logs go to stderr so `fetch` output stays pipeable.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "promload=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Fetch(args) => run_fetch_mode(&args).await,
        Commands::Api(args) => run_api_mode(&args).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run_fetch_mode(args: &FetchArgs) -> promload::Result<()> {
    let client = PromClient::new(args.backend.settings())?;
    let window = Window::new(args.window.clone());

    let hosts = client.fetch_all_hosts_metrics(&window).await?;
    let report = HostMetricsReport::new(window, hosts);

    let output = if args.pretty {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report)?
    };
    println!("{output}");
    Ok(())
}
