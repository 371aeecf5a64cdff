//! Typed wrappers over panel endpoints.
//!
//! Each facade holds the dispatcher of the [`XuiApi`](super::XuiApi) that
//! created it, so all of them share one session.

pub mod clients;
pub mod database;
pub mod inbounds;
pub mod server;

pub use clients::ClientsApi;
pub use database::DatabaseApi;
pub use inbounds::InboundsApi;
pub use server::ServerApi;

use std::borrow::Cow;

use serde::Serialize;
use serde_json::Value;
use xui_domain::constants::INBOUNDS_PREFIX;
use xui_domain::XuiError;

use crate::errors::InfraError;

/// Path under the inbounds API.
pub(crate) fn inbounds_path(suffix: &str) -> String {
    format!("{INBOUNDS_PREFIX}/{suffix}")
}

/// Percent-encode one user-supplied path segment.
pub(crate) fn segment(raw: &str) -> Cow<'_, str> {
    urlencoding::encode(raw)
}

pub(crate) fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<Value, XuiError> {
    serde_json::to_value(value).map_err(|err| InfraError::from(err).into())
}

/// Array payloads as a list of strings; anything else is treated as empty.
pub(crate) fn string_list(payload: Option<&Value>) -> Vec<String> {
    let Some(Value::Array(items)) = payload else {
        return Vec::new();
    };
    items
        .iter()
        .map(|item| match item {
            Value::String(text) => text.clone(),
            other => other.to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_segment_encodes_reserved_characters() {
        assert_eq!(segment("user@example.com"), "user%40example.com");
        assert_eq!(segment("a/b c"), "a%2Fb%20c");
        assert_eq!(segment("plain"), "plain");
    }

    #[test]
    fn test_string_list_ignores_non_arrays() {
        assert!(string_list(Some(&json!("No IP Record"))).is_empty());
        assert!(string_list(None).is_empty());
        assert_eq!(
            string_list(Some(&json!(["1.2.3.4", 5]))),
            vec!["1.2.3.4".to_string(), "5".to_string()]
        );
    }
}
