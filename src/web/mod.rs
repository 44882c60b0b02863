//! HTTP layer: router, sitemap handlers, middleware, and the SSR proxy.

pub mod middleware;
pub mod proxy;
pub mod routes;
pub mod sitemap;
pub mod status;

pub use routes::*;
