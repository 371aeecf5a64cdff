//! Cookie/session state shared by every facade of one panel client.

pub mod store;

pub use store::{ClientSession, SessionStore};
