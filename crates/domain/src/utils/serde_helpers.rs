//! Field adapters for panel payloads.
//!
//! The panel embeds several sub-documents (`settings`, `sniffing`,
//! `streamSettings`) as JSON text inside the outer JSON object, and is not
//! consistent about whether identifiers are strings or numbers.

use serde::de::{DeserializeOwned, Error as DeError};
use serde::ser::Error as SerError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// `Option<T>` stored as a JSON string on the wire.
///
/// Reads a JSON string (empty means `None`), an inline object, or null.
/// Writes `Some` as compact JSON text and `None` as `""`.
pub mod json_string {
    use super::*;

    pub fn serialize<S, T>(value: &Option<T>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
        T: Serialize,
    {
        match value {
            Some(inner) => {
                let text = serde_json::to_string(inner).map_err(S::Error::custom)?;
                serializer.serialize_str(&text)
            }
            None => serializer.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        match Option::<Value>::deserialize(deserializer)? {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(text)) if text.trim().is_empty() => Ok(None),
            Some(Value::String(text)) => {
                serde_json::from_str(&text).map(Some).map_err(D::Error::custom)
            }
            Some(other) => serde_json::from_value(other).map(Some).map_err(D::Error::custom),
        }
    }
}

/// Identifier that may arrive as a string or a number; kept as a string.
pub mod string_or_number {
    use super::*;

    pub fn serialize<S>(value: &Option<String>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(text) => serializer.serialize_str(text),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<Value>::deserialize(deserializer)? {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(text)) if text.is_empty() => Ok(None),
            Some(Value::String(text)) => Ok(Some(text)),
            Some(Value::Number(number)) => Ok(Some(number.to_string())),
            Some(other) => Err(D::Error::custom(format!("expected string or number, got {other}"))),
        }
    }
}

/// Loose truthiness flag, read the way a JavaScript client would.
///
/// `null`/absent, `false`, `0` and `""` are false; any other number, string,
/// array or object is true. Written back as a plain bool.
pub mod truthy {
    use super::*;

    pub fn serialize<S>(value: &bool, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_bool(*value)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<bool, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Option::<Value>::deserialize(deserializer)? {
            None | Some(Value::Null) => false,
            Some(Value::Bool(flag)) => flag,
            Some(Value::Number(number)) => number.as_f64().is_some_and(|n| n.abs() > 0.0),
            Some(Value::String(text)) => !text.is_empty(),
            Some(Value::Array(_) | Value::Object(_)) => true,
        })
    }
}

/// Text field where `null` reads as empty and scalars read as their JSON text.
pub mod lenient_string {
    use super::*;

    pub fn serialize<S>(value: &str, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(value)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<Value>::deserialize(deserializer)? {
            None | Some(Value::Null) => Ok(String::new()),
            Some(Value::String(text)) => Ok(text),
            Some(other @ (Value::Bool(_) | Value::Number(_))) => Ok(other.to_string()),
            Some(other) => Err(D::Error::custom(format!("expected string, got {other}"))),
        }
    }
}
