//! JSON-over-HTTP transport shared by every upstream service.
//!
//! All outgoing requests go through [`HttpClient`] so tests can swap in
//! [`MockClient`] and production requests share one rate limiter.

mod client;
mod rate_limiter;

pub use client::{HttpClient, JsonClient, JsonClientBuilder, MockClient, MockResponse, RecordedRequest};
pub use rate_limiter::RateLimiter;
