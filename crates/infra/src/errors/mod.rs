//! Conversions from external infrastructure errors into [`XuiError`].
//!
//! [`XuiError`]: xui_domain::XuiError

pub mod conversions;

pub use conversions::{describe_chain, InfraError};
