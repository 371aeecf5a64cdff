//! Server status as reported by `server/status`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryInfo {
    #[serde(default)]
    pub current: u64,
    #[serde(default)]
    pub total: u64,
}

impl MemoryInfo {
    /// Usage in percent, 0.0 when the total is unknown.
    #[allow(clippy::cast_precision_loss)]
    pub fn usage_percent(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.current as f64 / self.total as f64 * 100.0
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct XrayInfo {
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub error_msg: String,
    #[serde(default)]
    pub version: String,
}

impl XrayInfo {
    pub fn is_running(&self) -> bool {
        self.state == "running"
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkIo {
    #[serde(default)]
    pub up: u64,
    #[serde(default)]
    pub down: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkTraffic {
    #[serde(default)]
    pub sent: u64,
    #[serde(default)]
    pub recv: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicIp {
    #[serde(default)]
    pub ipv4: String,
    #[serde(default)]
    pub ipv6: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppStats {
    #[serde(default)]
    pub threads: u64,
    #[serde(default)]
    pub mem: u64,
    #[serde(default)]
    pub uptime: u64,
}

/// Snapshot of host and xray health.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerStatus {
    #[serde(default)]
    pub cpu: f64,
    #[serde(default)]
    pub cpu_cores: u32,
    #[serde(default)]
    pub logical_pro: u32,
    #[serde(default)]
    pub cpu_speed_mhz: f64,
    #[serde(default)]
    pub mem: MemoryInfo,
    #[serde(default)]
    pub swap: MemoryInfo,
    #[serde(default)]
    pub disk: MemoryInfo,
    #[serde(default)]
    pub xray: XrayInfo,
    #[serde(default)]
    pub uptime: u64,
    #[serde(default)]
    pub loads: Vec<f64>,
    #[serde(default)]
    pub tcp_count: u64,
    #[serde(default)]
    pub udp_count: u64,
    #[serde(default, rename = "netIO")]
    pub net_io: NetworkIo,
    #[serde(default)]
    pub net_traffic: NetworkTraffic,
    #[serde(default, rename = "publicIP")]
    pub public_ip: PublicIp,
    #[serde(default)]
    pub app_stats: AppStats,
}
