//! HTTP client module
//!
//! Provides the HTTP client and the page pacing policies.
//!
//! # Features
//!
//! - **Fixed Headers**: Access token, API version and `Accept: application/json`
//! - **Pacing**: Fixed delay (default), token bucket via governor, or none
//! - **No Retries**: Transport, status and decode errors surface immediately

mod client;
mod rate_limit;

pub use client::{
    HttpClient, HttpClientConfig, HttpClientConfigBuilder, ACCESS_TOKEN_HEADER,
    API_VERSION_HEADER,
};
pub use rate_limit::{
    FixedDelay, Pacer, PacingPolicy, RateLimiter, Unlimited, DEFAULT_PAGE_DELAY,
};
