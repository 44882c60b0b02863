//! Application configuration, extracted once from the environment at startup
//! and injected into every component. No module-level mutable state.

use serde::Deserialize;

fn default_port() -> u16 {
    8080
}

fn default_site_id() -> String {
    "1".to_owned()
}

fn default_log_level() -> String {
    "info".to_owned()
}

fn default_shutdown_timeout() -> u64 {
    10
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Port the gateway listens on.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Base URL of the backend content API, e.g. `http://localhost:8080`.
    pub backend_base_url: String,

    /// Site identifier sent with every backend request.
    #[serde(default = "default_site_id")]
    pub site_id: String,

    /// Optional API key for the backend.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Comma-separated allowlist of trusted request hosts. Entries are exact
    /// `host[:port]` strings or `*.domain.tld` wildcard suffixes.
    pub allowed_hosts: String,

    /// Canonical origin emitted when a request host is untrusted,
    /// e.g. `https://www.example.com`.
    pub default_origin: String,

    /// Origin of the downstream SSR page renderer, e.g. `http://127.0.0.1:3000`.
    pub ssr_downstream: String,

    /// Base log level when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Seconds to wait for in-flight requests on shutdown.
    #[serde(default = "default_shutdown_timeout")]
    pub shutdown_timeout: u64,
}

impl Config {
    /// The host allowlist, split and trimmed.
    pub fn allowed_hosts(&self) -> Vec<String> {
        self.allowed_hosts
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_owned)
            .collect()
    }
}
