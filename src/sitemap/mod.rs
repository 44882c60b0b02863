//! Sitemap generation: security policy, URL fetchers, and XML rendering.

pub mod fetchers;
pub mod generator;
pub mod security;
pub mod types;
