//! Log in to a panel and print its status and inbounds.
//!
//! Reads the connection settings through `xui_infra::config::load()`, so either
//! set `XUI_HOST`/`XUI_USERNAME`/`XUI_PASSWORD` or place an `xui.toml` in the
//! working directory.
//!
//! Run with: `cargo run -p xui-infra --example panel_status`

use anyhow::Context;
use xui_infra::{config, XuiApi};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let config = config::load().context("loading panel configuration")?;
    let api = XuiApi::new(config).context("building panel client")?;

    let two_factor = std::env::var("XUI_2FA").ok();
    api.login(two_factor.as_deref()).await.context("logging in")?;

    if let Some(status) = api.server().status().await? {
        println!(
            "cpu {:.1}% on {} cores, memory {:.1}%, xray {} ({})",
            status.cpu,
            status.cpu_cores,
            status.mem.usage_percent(),
            status.xray.state,
            status.xray.version
        );
    }

    for inbound in api.inbounds().list().await? {
        println!(
            "#{} {}:{} [{}] {} clients, {} bytes used",
            inbound.id,
            inbound.protocol,
            inbound.port,
            inbound.remark,
            inbound.clients().len(),
            inbound.up + inbound.down
        );
    }

    api.logout();
    Ok(())
}
