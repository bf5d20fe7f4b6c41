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

//! Turns Prometheus query responses into host-keyed [`Metric`] records.
//!
//! The query API answers with an envelope of the form
//! `{"data": {"result": ...}}` where `result` is usually an array of samples,
//! but may be a single sample object when only one series matched. Both are
//! accepted. Anything that cannot be understood is logged and skipped; no
//! error ever leaves this module.

use reqwest::StatusCode;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use super::query::QuerySpec;
use crate::watcher::{HostMetrics, Metric};

/// One entry of `data.result`: a `metric` label set plus a `[timestamp, "value"]` pair.
pub type RawSample = Map<String, Value>;

/// Shape of `data.result`.
#[derive(Debug)]
pub enum ResultPayload {
    /// A list of entries; non-object entries are skipped one by one.
    Vector(Vec<Value>),
    Single(RawSample),
    Unrecognized(Value),
}

/// What happened to one response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NormalizeOutcome {
    /// The response was understood and this many metrics were appended.
    Appended(usize),
    /// The backend answered with something other than 200 OK.
    Rejected(StatusCode),
    /// The body had no `data.result`.
    MissingResult,
    /// `data.result` was neither a sample nor a list of samples.
    UnrecognizedShape,
}

/// Fold one query response into `host_metrics`.
pub fn normalize_response(
    status: StatusCode,
    body: &str,
    query: &QuerySpec,
    rollup: &str,
    host_metrics: &mut HostMetrics,
) -> NormalizeOutcome {
    if status != StatusCode::OK {
        warn!(
            "received status code {status} for {}",
            query.expression(rollup)
        );
        return NormalizeOutcome::Rejected(status);
    }

    let mut envelope: Value = match serde_json::from_str(body) {
        Ok(value) => value,
        Err(e) => {
            warn!("error parsing the response: {e}");
            Value::Null
        }
    };

    log_backend_error(&envelope);

    let result = envelope.pointer_mut("/data/result").map(Value::take);
    let Some(result) = result else {
        warn!("not able to parse prometheus query response: {envelope}");
        return NormalizeOutcome::MissingResult;
    };

    match decode_payload(result) {
        ResultPayload::Vector(entries) => {
            debug!(
                "{} returned {} series",
                query.expression(rollup),
                entries.len()
            );
            let mut count = 0;
            for entry in &entries {
                match entry {
                    Value::Object(sample) => {
                        append_sample(host_metrics, sample, query, rollup);
                        count += 1;
                    }
                    other => debug!("skipping unrecognized result entry: {other}"),
                }
            }
            NormalizeOutcome::Appended(count)
        }
        ResultPayload::Single(sample) => {
            debug!("{} returned a single series", query.expression(rollup));
            append_sample(host_metrics, &sample, query, rollup);
            NormalizeOutcome::Appended(1)
        }
        ResultPayload::Unrecognized(other) => {
            warn!("{other} is not a recognized prometheus data format");
            NormalizeOutcome::UnrecognizedShape
        }
    }
}

/// A non-empty array without a single object (e.g. a scalar `[ts, "v"]`
/// result) is not a sample list.
pub fn decode_payload(result: Value) -> ResultPayload {
    match result {
        Value::Array(entries) if entries.is_empty() || entries.iter().any(Value::is_object) => {
            ResultPayload::Vector(entries)
        }
        Value::Object(sample) => ResultPayload::Single(sample),
        other => ResultPayload::Unrecognized(other),
    }
}

/// Convert one raw sample into a metric and the host it belongs to.
pub fn sample_to_metric(sample: &RawSample, query: &QuerySpec, rollup: &str) -> (Metric, String) {
    let host = sample
        .get("metric")
        .and_then(|labels| labels.get("instance"))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    let metric = Metric {
        name: query.method.as_str().to_string(),
        metric_type: query.resource_type,
        rollup: rollup.to_string(),
        value: sample_value(sample),
    };

    (metric, host)
}

fn append_sample(
    host_metrics: &mut HostMetrics,
    sample: &RawSample,
    query: &QuerySpec,
    rollup: &str,
) {
    let (metric, host) = sample_to_metric(sample, query, rollup);
    debug!(
        "host {host:?}: {} {} = {}",
        metric.name, metric.metric_type, metric.value
    );
    host_metrics.entry(host).or_default().push(metric);
}

/// Second element of the value pair; anything unparseable reads as zero.
fn sample_value(sample: &RawSample) -> f64 {
    let pair = sample.get("value").or_else(|| {
        sample
            .iter()
            .find(|(key, _)| key.as_str() != "metric")
            .map(|(_, value)| value)
    });

    match pair.and_then(|p| p.get(1)) {
        Some(Value::String(s)) => s.parse::<f64>().unwrap_or(0.0),
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        _ => 0.0,
    }
}

fn log_backend_error(envelope: &Value) {
    if envelope.get("status").and_then(Value::as_str) == Some("error") {
        let error_type = envelope
            .get("errorType")
            .and_then(Value::as_str)
            .unwrap_or("unknown");
        let error = envelope.get("error").and_then(Value::as_str).unwrap_or("");
        warn!("prometheus reported {error_type} error: {error}");
    }
}
