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

//! Metric types shared with the consuming watcher.

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Rollup period the backend aggregates samples over, e.g. `"5m"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Window {
    pub duration: String,
}

impl Window {
    pub fn new(duration: impl Into<String>) -> Self {
        Self {
            duration: duration.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ResourceType {
    #[serde(rename = "CPU")]
    Cpu,
    #[serde(rename = "Memory")]
    Memory,
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceType::Cpu => write!(f, "CPU"),
            ResourceType::Memory => write!(f, "Memory"),
        }
    }
}

/// One aggregated value for one host.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metric {
    /// Aggregation method the value was computed with.
    pub name: String,
    #[serde(rename = "type")]
    pub metric_type: ResourceType,
    pub rollup: String,
    pub value: f64,
}

/// Metrics keyed by host instance. Within one host, entries follow query order.
pub type HostMetrics = HashMap<String, Vec<Metric>>;

/// Serialized result of one fetch, as printed by the CLI and served in API mode.
#[derive(Debug, Clone, Serialize)]
pub struct HostMetricsReport {
    pub window: Window,
    pub fetched_at: DateTime<Utc>,
    pub hosts: HostMetrics,
}

impl HostMetricsReport {
    pub fn new(window: Window, hosts: HostMetrics) -> Self {
        Self {
            window,
            fetched_at: Utc::now(),
            hosts,
        }
    }

    pub fn metric_count(&self) -> usize {
        self.hosts.values().map(Vec::len).sum()
    }
}
