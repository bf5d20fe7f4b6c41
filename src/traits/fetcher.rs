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

use crate::error::Result;
use crate::watcher::{HostMetrics, Window};

/// Source of per-host utilization metrics for a watcher.
///
/// Implementations are read-only: every call starts from an empty mapping
/// and keeps nothing between calls, so calling twice with the same window
/// against the same backend state yields the same result.
#[async_trait]
pub trait FetcherClient: Send + Sync {
    /// Fetch every configured metric for all hosts over `window`.
    ///
    /// Partial data is a normal outcome; callers should not assume every
    /// host has every metric.
    async fn fetch_all_hosts_metrics(&self, window: &Window) -> Result<HostMetrics>;
}
