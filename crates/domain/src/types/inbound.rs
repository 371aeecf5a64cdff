//! Inbound (listening endpoint) and its embedded sub-documents.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::types::client::Client;
use crate::utils::serde_helpers::json_string;

/// Protocol settings of an inbound, including its clients.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub clients: Vec<Client>,
    #[serde(default)]
    pub decryption: String,
    #[serde(default)]
    pub fallbacks: Vec<Value>,
}

/// Traffic sniffing options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sniffing {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default, alias = "dest_override")]
    pub dest_override: Vec<String>,
    #[serde(default, alias = "metadata_only")]
    pub metadata_only: bool,
    #[serde(default, alias = "route_only")]
    pub route_only: bool,
}

/// Transport settings. Transport-specific blocks are kept as raw JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamSettings {
    #[serde(default)]
    pub security: String,
    #[serde(default)]
    pub network: String,
    #[serde(default, alias = "tcp_settings")]
    pub tcp_settings: Map<String, Value>,
    #[serde(default, alias = "kcp_settings")]
    pub kcp_settings: Map<String, Value>,
    #[serde(default, alias = "external_proxy")]
    pub external_proxy: Vec<Value>,
    #[serde(default, alias = "reality_settings")]
    pub reality_settings: Map<String, Value>,
    #[serde(default, alias = "xtls_settings")]
    pub xtls_settings: Map<String, Value>,
    #[serde(default, alias = "tls_settings")]
    pub tls_settings: Map<String, Value>,
    /// Blocks not modelled above (ws, grpc, http upgrade, ...)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// An inbound as listed by `panel/api/inbounds/list`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Inbound {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub enable: bool,
    pub port: u16,
    pub protocol: String,
    #[serde(default)]
    pub remark: String,
    #[serde(default)]
    pub listen: String,
    #[serde(default)]
    pub up: i64,
    #[serde(default)]
    pub down: i64,
    #[serde(default)]
    pub total: i64,
    #[serde(default)]
    pub expiry_time: i64,
    #[serde(default)]
    pub tag: String,
    #[serde(default, with = "json_string")]
    pub settings: Option<Settings>,
    #[serde(default, with = "json_string")]
    pub stream_settings: Option<StreamSettings>,
    #[serde(default, with = "json_string")]
    pub sniffing: Option<Sniffing>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub client_stats: Vec<Client>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<Client>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Vec<Client>>::deserialize(deserializer)?.unwrap_or_default())
}

impl Inbound {
    pub fn new(port: u16, protocol: impl Into<String>) -> Self {
        Self { enable: true, port, protocol: protocol.into(), ..Self::default() }
    }

    /// Clients declared in the settings document.
    pub fn clients(&self) -> &[Client] {
        self.settings.as_ref().map_or(&[], |settings| settings.clients.as_slice())
    }
}
