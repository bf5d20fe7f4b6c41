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

/// Application configuration constants
pub struct AppConfig;

impl AppConfig {
    // Backend
    pub const DEFAULT_PROM_HOST: &'static str = "prometheus-k8s:9090";
    pub const QUERY_PATH: &'static str = "/api/v1/query";
    pub const PROM_HOST_ENV: &'static str = "PROM_HOST";
    pub const PROM_TOKEN_ENV: &'static str = "PROM_TOKEN";

    // Network Configuration
    pub const CONNECTION_TIMEOUT_SECS: u64 = 10;

    // API mode
    pub const DEFAULT_API_PORT: u16 = 9091;
    pub const DEFAULT_WINDOW: &'static str = "15m";
}

/// What to do when a query cannot reach the backend at all.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TransportPolicy {
    /// Log the failure and keep going with the remaining queries.
    #[default]
    Lenient,
    /// Abort the fetch and report the first transport failure.
    Strict,
}

/// Immutable backend settings, resolved once at startup and handed to the
/// fetcher's constructor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromSettings {
    pub host: String,
    pub token: Option<String>,
    pub timeout: Duration,
    pub accept_invalid_certs: bool,
    pub transport_policy: TransportPolicy,
}

impl PromSettings {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            token: None,
            timeout: Duration::from_secs(AppConfig::CONNECTION_TIMEOUT_SECS),
            accept_invalid_certs: true,
            transport_policy: TransportPolicy::Lenient,
        }
    }

    /// Resolve settings from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve settings through an arbitrary variable lookup.
    ///
    /// `PROM_HOST` falls back to [`AppConfig::DEFAULT_PROM_HOST`]; an unset or
    /// empty `PROM_TOKEN` means no `Authorization` header is sent.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup(AppConfig::PROM_HOST_ENV)
            .filter(|h| !h.trim().is_empty())
            .unwrap_or_else(|| AppConfig::DEFAULT_PROM_HOST.to_string());
        let token = lookup(AppConfig::PROM_TOKEN_ENV).filter(|t| !t.is_empty());

        Self::new(host).with_token(token)
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token.filter(|t| !t.is_empty());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_accept_invalid_certs(mut self, accept: bool) -> Self {
        self.accept_invalid_certs = accept;
        self
    }

    pub fn with_transport_policy(mut self, policy: TransportPolicy) -> Self {
        self.transport_policy = policy;
        self
    }

    /// Value of the `Authorization` header, if a token is configured.
    pub fn bearer_header(&self) -> Option<String> {
        self.token.as_ref().map(|token| format!("Bearer {token}"))
    }
}

impl Default for PromSettings {
    fn default() -> Self {
        Self::new(AppConfig::DEFAULT_PROM_HOST)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_env_is_empty() {
        let settings = PromSettings::from_lookup(lookup_from(&[]));
        assert_eq!(settings.host, "prometheus-k8s:9090");
        assert_eq!(settings.token, None);
        assert!(settings.accept_invalid_certs);
        assert_eq!(settings.transport_policy, TransportPolicy::Lenient);
        assert_eq!(
            settings.timeout,
            Duration::from_secs(AppConfig::CONNECTION_TIMEOUT_SECS)
        );
    }

    #[test]
    fn test_host_and_token_from_lookup() {
        let settings = PromSettings::from_lookup(lookup_from(&[
            ("PROM_HOST", "prom.monitoring:9090"),
            ("PROM_TOKEN", "s3cret"),
        ]));
        assert_eq!(settings.host, "prom.monitoring:9090");
        assert_eq!(settings.token.as_deref(), Some("s3cret"));
        assert_eq!(settings.bearer_header().as_deref(), Some("Bearer s3cret"));
    }

    #[test]
    fn test_empty_values_fall_back() {
        let settings =
            PromSettings::from_lookup(lookup_from(&[("PROM_HOST", "  "), ("PROM_TOKEN", "")]));
        assert_eq!(settings.host, AppConfig::DEFAULT_PROM_HOST);
        assert!(settings.bearer_header().is_none());
    }

    #[test]
    fn test_builder_overrides() {
        let settings = PromSettings::default()
            .with_host("localhost:9999")
            .with_token(Some("abc".to_string()))
            .with_timeout(Duration::from_secs(1))
            .with_accept_invalid_certs(false)
            .with_transport_policy(TransportPolicy::Strict);
        assert_eq!(settings.host, "localhost:9999");
        assert_eq!(settings.token.as_deref(), Some("abc"));
        assert_eq!(settings.timeout, Duration::from_secs(1));
        assert!(!settings.accept_invalid_certs);
        assert_eq!(settings.transport_policy, TransportPolicy::Strict);
    }
}
