//! SEO edge gateway for the game box content site.
//!
//! Sits in front of the SSR page renderer and owns the search-engine
//! surfaces: locale-prefixed routing (rewrite, redirect, passthrough),
//! multi-locale sitemap generation fed by the backend content API, and
//! robots.txt.

pub mod app;
pub mod backend;
pub mod cli;
pub mod config;
pub mod locale;
pub mod logging;
pub mod routing;
pub mod sitemap;
pub mod state;
pub mod web;
