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

use std::fmt;

use url::form_urlencoded;

use crate::common::config::AppConfig;
use crate::watcher::ResourceType;

pub const CPU_METRIC: &str = "instance:node_cpu:ratio";
pub const MEMORY_METRIC: &str = "instance:node_memory_utilisation:ratio";

/// Range-vector function applied over the rollup window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AggregationMethod {
    AvgOverTime,
    StddevOverTime,
}

impl AggregationMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            AggregationMethod::AvgOverTime => "avg_over_time",
            AggregationMethod::StddevOverTime => "stddev_over_time",
        }
    }
}

impl fmt::Display for AggregationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One (method, metric, resource type) combination to query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuerySpec {
    pub method: AggregationMethod,
    pub metric: String,
    pub resource_type: ResourceType,
}

impl QuerySpec {
    pub fn new(
        method: AggregationMethod,
        metric: impl Into<String>,
        resource_type: ResourceType,
    ) -> Self {
        Self {
            method,
            metric: metric.into(),
            resource_type,
        }
    }

    /// Build a query whose resource type is inferred from the metric name.
    pub fn for_metric(method: AggregationMethod, metric: impl Into<String>) -> Self {
        let metric = metric.into();
        let resource_type = resource_type_for_metric(&metric);
        Self::new(method, metric, resource_type)
    }

    pub fn expression(&self, rollup: &str) -> String {
        build_expression(self.method, &self.metric, rollup)
    }
}

/// CPU for the node CPU ratio, Memory for anything else.
pub fn resource_type_for_metric(metric: &str) -> ResourceType {
    if metric == CPU_METRIC {
        ResourceType::Cpu
    } else {
        ResourceType::Memory
    }
}

/// avg×cpu, avg×mem, stddev×cpu, stddev×mem.
pub fn default_queries() -> Vec<QuerySpec> {
    let mut queries = Vec::with_capacity(4);
    for method in [
        AggregationMethod::AvgOverTime,
        AggregationMethod::StddevOverTime,
    ] {
        for metric in [CPU_METRIC, MEMORY_METRIC] {
            queries.push(QuerySpec::for_metric(method, metric));
        }
    }
    queries
}

/// `<method>(<metric>[<rollup>])`. The rollup is passed through unchecked.
pub fn build_expression(method: AggregationMethod, metric: &str, rollup: &str) -> String {
    format!("{method}({metric}[{rollup}])")
}

pub fn build_query_url(host: &str, expression: &str) -> String {
    let base = if host.starts_with("http://") || host.starts_with("https://") {
        host.trim_end_matches('/').to_string()
    } else {
        format!("http://{host}")
    };
    let encoded: String = form_urlencoded::byte_serialize(expression.as_bytes()).collect();
    format!("{base}{}?query={encoded}", AppConfig::QUERY_PATH)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_expression() {
        assert_eq!(
            build_expression(AggregationMethod::AvgOverTime, CPU_METRIC, "5m"),
            "avg_over_time(instance:node_cpu:ratio[5m])"
        );
        assert_eq!(
            build_expression(AggregationMethod::StddevOverTime, MEMORY_METRIC, "1h"),
            "stddev_over_time(instance:node_memory_utilisation:ratio[1h])"
        );
    }

    #[test]
    fn test_rollup_is_not_validated() {
        assert_eq!(
            build_expression(AggregationMethod::AvgOverTime, "up", "not a duration"),
            "avg_over_time(up[not a duration])"
        );
    }

    #[test]
    fn test_build_query_url_encodes_expression() {
        let url = build_query_url(
            "prometheus-k8s:9090",
            "avg_over_time(instance:node_cpu:ratio[5m])",
        );
        assert_eq!(
            url,
            "http://prometheus-k8s:9090/api/v1/query?query=avg_over_time%28instance%3Anode_cpu%3Aratio%5B5m%5D%29"
        );
    }

    #[test]
    fn test_build_query_url_keeps_scheme() {
        let url = build_query_url("https://prom.example.com/", "up");
        assert_eq!(url, "https://prom.example.com/api/v1/query?query=up");
    }

    #[test]
    fn test_default_queries_order() {
        let queries = default_queries();
        let pairs: Vec<(&str, &str, ResourceType)> = queries
            .iter()
            .map(|q| (q.method.as_str(), q.metric.as_str(), q.resource_type))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("avg_over_time", CPU_METRIC, ResourceType::Cpu),
                ("avg_over_time", MEMORY_METRIC, ResourceType::Memory),
                ("stddev_over_time", CPU_METRIC, ResourceType::Cpu),
                ("stddev_over_time", MEMORY_METRIC, ResourceType::Memory),
            ]
        );
    }

    #[test]
    fn test_resource_type_is_binary() {
        assert_eq!(resource_type_for_metric(CPU_METRIC), ResourceType::Cpu);
        assert_eq!(resource_type_for_metric(MEMORY_METRIC), ResourceType::Memory);
        assert_eq!(
            resource_type_for_metric("node_disk_io_time_seconds_total"),
            ResourceType::Memory
        );
    }
}
