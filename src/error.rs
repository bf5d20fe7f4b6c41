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

//! Unified error types for the promload library.
//!
//! Most failures while fetching are deliberately absorbed into log lines:
//! a bad status code, an unparseable body or an unexpected result shape
//! only costs the affected metric. The variants below cover the cases that
//! are still reported to the caller.
//!
//! # Example
//!
//! ```rust,no_run
//! use promload::{PromClient, PromSettings, Result};
//!
//! fn build() -> Result<PromClient> {
//!     PromClient::new(PromSettings::from_env())
//! }
//! ```

use thiserror::Error;

/// The main error type for promload operations.
#[derive(Debug, Error)]
pub enum Error {
    /// The HTTP client could not be constructed.
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),

    /// A query could not reach the backend.
    ///
    /// Only returned when the fetcher runs with
    /// [`TransportPolicy::Strict`](crate::common::config::TransportPolicy::Strict).
    #[error("Request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Output could not be serialized.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// An I/O error occurred.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// A specialized Result type for promload operations.
pub type Result<T> = std::result::Result<T, Error>;
