//! Panel data types
//!
//! Wire shapes of the panel API. Field names follow the panel's camelCase
//! JSON; sub-documents the panel stores as JSON text are decoded in place.

pub mod client;
pub mod envelope;
pub mod inbound;
pub mod server;

pub use client::Client;
pub use envelope::ResponseEnvelope;
pub use inbound::{Inbound, Settings, Sniffing, StreamSettings};
pub use server::{AppStats, MemoryInfo, NetworkIo, NetworkTraffic, PublicIp, ServerStatus, XrayInfo};
