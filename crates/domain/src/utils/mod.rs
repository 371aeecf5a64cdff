//! Serde helpers for the panel's loosely typed JSON

pub mod serde_helpers;
