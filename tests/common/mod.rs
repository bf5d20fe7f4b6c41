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

//! In-process stand-in for the Prometheus query API.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::get;
use axum::Router;
use serde_json::{json, Value};
use tokio::net::TcpListener;

pub const AVG_CPU: &str = "avg_over_time(instance:node_cpu:ratio[5m])";
pub const AVG_MEM: &str = "avg_over_time(instance:node_memory_utilisation:ratio[5m])";
pub const STDDEV_CPU: &str = "stddev_over_time(instance:node_cpu:ratio[5m])";
pub const STDDEV_MEM: &str = "stddev_over_time(instance:node_memory_utilisation:ratio[5m])";

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub query: String,
    pub content_type: Option<String>,
    pub authorization: Option<String>,
}

#[derive(Default)]
pub struct MockBackend {
    responses: HashMap<String, (StatusCode, String)>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `expression` with a success envelope around `result`.
    pub fn with_result(self, expression: &str, result: Value) -> Self {
        self.with_response(expression, StatusCode::OK, envelope(result).to_string())
    }

    pub fn with_response(mut self, expression: &str, status: StatusCode, body: String) -> Self {
        self.responses
            .insert(expression.to_string(), (status, body));
        self
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Serve on an ephemeral local port and return `127.0.0.1:<port>`.
    pub async fn spawn(self) -> (String, Arc<MockBackend>) {
        let backend = Arc::new(self);
        let app = Router::new()
            .route("/api/v1/query", get(query_handler))
            .with_state(backend.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        (addr.to_string(), backend)
    }
}

async fn query_handler(
    State(backend): State<Arc<MockBackend>>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> (StatusCode, String) {
    let query = params.get("query").cloned().unwrap_or_default();
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };

    backend.requests.lock().unwrap().push(RecordedRequest {
        query: query.clone(),
        content_type: header("content-type"),
        authorization: header("authorization"),
    });

    backend
        .responses
        .get(&query)
        .cloned()
        .unwrap_or_else(|| (StatusCode::OK, envelope(json!([])).to_string()))
}

pub fn envelope(result: Value) -> Value {
    json!({"status": "success", "data": {"resultType": "vector", "result": result}})
}

pub fn sample(instance: &str, value: &str) -> Value {
    json!({"metric": {"__name__": "x", "instance": instance}, "value": [1_700_000_000.123, value]})
}

/// An address nothing is listening on.
pub async fn closed_address() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr.to_string()
}
