//! Protocol constants
//!
//! Centralized location for the values dictated by the remote panel and the
//! fixed request policy of the SDK.

// Session cookies, in match priority order. First match wins.
pub const SESSION_COOKIE_NAMES: [&str; 2] = ["3x-ui", "session"];

// Request policy
pub const MAX_ATTEMPTS: usize = 3;
pub const BASE_BACKOFF_MS: u64 = 1_000;
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

// Endpoints
pub const LOGIN_ENDPOINT: &str = "login";
pub const INBOUNDS_PREFIX: &str = "panel/api/inbounds";
pub const SERVER_STATUS_ENDPOINT: &str = "server/status";
pub const SERVER_DB_ENDPOINT: &str = "server/getDb";

// Headers
pub const ACCEPT_JSON: &str = "application/json";
pub const ACCEPT_OCTET_STREAM: &str = "application/octet-stream";
