//! The `{success, msg, obj}` wrapper every JSON endpoint answers with.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::errors::{Result, XuiError};

/// Decoded response body of a JSON panel endpoint.
///
/// `success` is read by truthiness, so an absent, `null`, `0` or `""` flag is a
/// failure. A `null` message reads as empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    #[serde(default, with = "crate::utils::serde_helpers::truthy")]
    pub success: bool,
    #[serde(default, with = "crate::utils::serde_helpers::lenient_string")]
    pub msg: String,
    #[serde(default)]
    pub obj: Option<serde_json::Value>,
}

impl ResponseEnvelope {
    pub fn ok(obj: impl Into<Option<serde_json::Value>>) -> Self {
        Self { success: true, msg: String::new(), obj: obj.into() }
    }

    pub fn failed(msg: impl Into<String>) -> Self {
        Self { success: false, msg: msg.into(), obj: None }
    }

    /// Payload with JSON `null` treated as absent.
    pub fn payload(&self) -> Option<&serde_json::Value> {
        self.obj.as_ref().filter(|value| !value.is_null())
    }

    /// Decode the payload into `T`, `None` when there is no payload.
    ///
    /// # Errors
    /// Returns `XuiError::InvalidResponse` when the payload does not match `T`.
    pub fn decode_obj<T: DeserializeOwned>(&self) -> Result<Option<T>> {
        self.payload()
            .map(|value| {
                serde_json::from_value(value.clone()).map_err(|e| {
                    XuiError::InvalidResponse(format!("Unexpected payload shape: {e}"))
                })
            })
            .transpose()
    }
}
