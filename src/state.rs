//! Application state shared across request handlers.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;

use crate::backend::BackendApi;
use crate::config::Config;
use crate::sitemap::security::HostPolicy;

#[derive(Clone)]
pub struct AppState {
    pub backend: Arc<BackendApi>,
    pub host_policy: Arc<HostPolicy>,
    /// Origin of the downstream SSR renderer page requests are proxied to.
    pub ssr_downstream: String,
    pub ssr_client: reqwest::Client,
}

impl AppState {
    pub fn from_config(config: &Config) -> Result<Self, anyhow::Error> {
        let backend = BackendApi::new(
            config.backend_base_url.clone(),
            config.site_id.clone(),
            config.api_key.clone(),
        )
        .context("Failed to create backend API client")?;

        let host_policy = HostPolicy::new(config.allowed_hosts(), config.default_origin.clone());

        // Page renders can be slow; keep this looser than the backend client.
        let ssr_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("Failed to build SSR proxy client")?;

        Ok(Self {
            backend: Arc::new(backend),
            host_policy: Arc::new(host_policy),
            ssr_downstream: config.ssr_downstream.trim_end_matches('/').to_owned(),
            ssr_client,
        })
    }
}
