//! HTTP transport with the panel's retry policy.

pub mod client;

pub use client::{is_transient, HttpClient, HttpClientBuilder, RetryState};
