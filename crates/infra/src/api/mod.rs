//! Panel API client
//!
//! Request dispatch, envelope validation, the login handshake, and typed
//! facades for the panel endpoints.
//!
//! # Architecture
//!
//! - [`Dispatcher`] is the only component that talks to [`HttpClient`](crate::http::HttpClient)
//! - Every call except login requires a stored session
//! - Facades are thin: they build a [`RequestSpec`] and decode `obj`

pub mod auth;
pub mod client;
pub mod dispatcher;
pub mod resources;
pub mod validator;

pub use auth::{extract_session_cookie, Credentials};
pub use client::{XuiApi, XuiApiBuilder};
pub use dispatcher::{
    Dispatcher, PanelMethod, PanelResponse, RequestOptions, RequestSpec, ResponseBody,
};
pub use resources::{ClientsApi, DatabaseApi, InboundsApi, ServerApi};
pub use validator::validate_envelope;
