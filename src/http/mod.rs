//! HTTP client module
//!
//! Transport for the platform API: retries with backoff, a token bucket rate
//! limiter, and per-request query/header/body configuration.

mod client;
mod rate_limit;

pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder, RequestConfig};
pub use rate_limit::{RateLimiter, RateLimiterConfig};
