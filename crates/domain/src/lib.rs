//! # xui Domain
//!
//! Data types shared by the 3x-ui panel SDK.
//!
//! This crate contains:
//! - The SDK error taxonomy and Result definition
//! - Panel connection configuration
//! - The response envelope every JSON endpoint returns
//! - Entity DTOs (clients, inbounds, server status)
//! - Protocol constants
//!
//! ## Architecture
//! - No dependencies on other xui crates
//! - No I/O; everything that touches the network lives in `xui-infra`

pub mod config;
pub mod constants;
pub mod errors;
pub mod types;
pub mod utils;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
