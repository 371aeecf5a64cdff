//! Panel client (a user account attached to an inbound).

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::utils::serde_helpers::string_or_number;

/// A client entry as used in inbound settings and traffic reports.
///
/// The same shape is returned for `clientStats` records, where `id` is the
/// numeric traffic-record id instead of the client UUID.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub email: String,
    #[serde(default)]
    pub enable: bool,
    #[serde(default)]
    pub password: String,
    #[serde(default, with = "string_or_number")]
    pub id: Option<String>,
    #[serde(default)]
    pub inbound_id: Option<i64>,
    #[serde(default)]
    pub up: i64,
    #[serde(default)]
    pub down: i64,
    /// Unix milliseconds; 0 means no expiry, negative means "after first use"
    #[serde(default)]
    pub expiry_time: i64,
    #[serde(default)]
    pub total: i64,
    #[serde(default)]
    pub reset: Option<i64>,
    #[serde(default)]
    pub flow: String,
    #[serde(default)]
    pub method: String,
    #[serde(default)]
    pub limit_ip: i64,
    #[serde(default)]
    pub sub_id: String,
    #[serde(default, with = "string_or_number")]
    pub tg_id: Option<String>,
    #[serde(default, rename = "totalGB", alias = "totalGb")]
    pub total_gb: i64,
}

impl Client {
    /// New enabled client with a freshly generated UUID.
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            enable: true,
            id: Some(Uuid::new_v4().to_string()),
            ..Self::default()
        }
    }

    /// Traffic used so far, upload plus download.
    pub fn used_traffic(&self) -> i64 {
        self.up.saturating_add(self.down)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_client_stats_record() {
        let json = r#"{
            "id": 3, "inboundId": 1, "enable": true, "email": "alice@example.com",
            "up": 1024, "down": 2048, "expiryTime": 0, "total": 0, "reset": 0
        }"#;
        let client: Client = serde_json::from_str(json).unwrap();
        assert_eq!(client.id.as_deref(), Some("3"));
        assert_eq!(client.inbound_id, Some(1));
        assert_eq!(client.used_traffic(), 3072);
        assert_eq!(client.tg_id, None);
    }

    #[test]
    fn test_parses_settings_client() {
        let json = r#"{
            "id": "a5e7c2b0-1111-4c3e-9d3a-123456789abc", "email": "bob",
            "limitIp": 2, "totalGB": 10737418240, "expiryTime": 1700000000000,
            "enable": true, "tgId": 123456, "subId": "sub-bob", "flow": "xtls-rprx-vision"
        }"#;
        let client: Client = serde_json::from_str(json).unwrap();
        assert_eq!(client.limit_ip, 2);
        assert_eq!(client.total_gb, 10_737_418_240);
        assert_eq!(client.tg_id.as_deref(), Some("123456"));
        assert_eq!(client.sub_id, "sub-bob");
    }

    #[test]
    fn test_serializes_camel_case() {
        let client = Client::new("carol");
        let value = serde_json::to_value(&client).unwrap();
        assert_eq!(value["email"], "carol");
        assert_eq!(value["enable"], true);
        assert!(value.get("totalGB").is_some());
        assert!(value.get("limitIp").is_some());
        assert!(value["id"].as_str().is_some_and(|id| Uuid::parse_str(id).is_ok()));
    }
}
