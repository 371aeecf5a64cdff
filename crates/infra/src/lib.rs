//! # xui Infrastructure
//!
//! Session-aware client for the 3x-ui panel HTTP API.
//!
//! This crate contains:
//! - HTTP transport with connection-level retry
//! - The session cookie store
//! - Request dispatch, envelope validation and the login handshake
//! - Typed facades for clients, inbounds, server and database endpoints
//! - Configuration loading from env and files
//!
//! ## Architecture
//! - Types and errors come from `xui-domain`
//! - Contains all "impure" code (network, filesystem, environment)
//!
//! ```no_run
//! use xui_domain::PanelConfig;
//! use xui_infra::XuiApi;
//!
//! # async fn run() -> Result<(), xui_domain::XuiError> {
//! let api = XuiApi::new(PanelConfig::new("https://panel.example.com:2053", "admin", "admin"))?;
//! api.login(None).await?;
//! let inbounds = api.inbounds().list().await?;
//! # let _ = inbounds;
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod config;
pub mod errors;
pub mod http;
pub mod observability;
pub mod session;

// Re-export commonly used items
pub use api::{
    ClientsApi, Credentials, DatabaseApi, Dispatcher, InboundsApi, PanelMethod, PanelResponse,
    RequestOptions, RequestSpec, ResponseBody, ServerApi, XuiApi, XuiApiBuilder,
};
pub use errors::InfraError;
pub use http::{HttpClient, HttpClientBuilder, RetryState};
pub use observability::{NoopLogger, PanelLogger, TracingLogger};
pub use session::{ClientSession, SessionStore};
