//! Inbound endpoints.

use std::sync::Arc;

use serde_json::Value;
use tracing::instrument;
use xui_domain::constants::ACCEPT_JSON;
use xui_domain::{Inbound, XuiError};

use super::{inbounds_path, to_json};
use crate::api::dispatcher::{Dispatcher, RequestSpec};

/// Inbound operations.
#[derive(Debug, Clone)]
pub struct InboundsApi {
    dispatcher: Arc<Dispatcher>,
}

impl InboundsApi {
    pub fn new(dispatcher: Arc<Dispatcher>) -> Self {
        Self { dispatcher }
    }

    fn log(&self, message: &str) {
        self.dispatcher.logger().info(message);
    }

    /// Every inbound on the panel; empty when the payload is not a list.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<Inbound>, XuiError> {
        self.log("Getting inbounds...");
        let envelope = self
            .dispatcher
            .envelope(RequestSpec::get(inbounds_path("list")).accept(ACCEPT_JSON))
            .await?;

        match envelope.payload() {
            Some(Value::Array(_)) => Ok(envelope.decode_obj::<Vec<Inbound>>()?.unwrap_or_default()),
            _ => Ok(Vec::new()),
        }
    }

    #[instrument(skip(self))]
    pub async fn get_by_id(&self, inbound_id: i64) -> Result<Option<Inbound>, XuiError> {
        self.log(&format!("Getting inbound by ID: {inbound_id}"));
        let envelope = self
            .dispatcher
            .envelope(RequestSpec::get(inbounds_path(&format!("get/{inbound_id}"))).accept(ACCEPT_JSON))
            .await?;

        envelope.decode_obj::<Inbound>()
    }

    #[instrument(skip(self, inbound), fields(port = inbound.port, protocol = %inbound.protocol))]
    pub async fn add(&self, inbound: &Inbound) -> Result<(), XuiError> {
        let payload = to_json(inbound)?;

        self.log("Adding inbound...");
        self.dispatcher
            .execute(RequestSpec::post(inbounds_path("add")).accept(ACCEPT_JSON).json(payload))
            .await?;
        self.log("Inbound added successfully.");
        Ok(())
    }

    #[instrument(skip(self, inbound))]
    pub async fn update(&self, inbound_id: i64, inbound: &Inbound) -> Result<(), XuiError> {
        let payload = to_json(inbound)?;

        self.log(&format!("Updating inbound with ID: {inbound_id}"));
        self.dispatcher
            .execute(
                RequestSpec::post(inbounds_path(&format!("update/{inbound_id}")))
                    .accept(ACCEPT_JSON)
                    .json(payload),
            )
            .await?;
        self.log("Inbound updated successfully.");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, inbound_id: i64) -> Result<(), XuiError> {
        self.log(&format!("Deleting inbound with ID: {inbound_id}"));
        self.dispatcher
            .execute(
                RequestSpec::post(inbounds_path(&format!("del/{inbound_id}"))).accept(ACCEPT_JSON),
            )
            .await?;
        self.log("Inbound deleted successfully.");
        Ok(())
    }

    /// Zero the traffic counters of every inbound.
    #[instrument(skip(self))]
    pub async fn reset_stats(&self) -> Result<(), XuiError> {
        self.log("Resetting stats for all inbounds");
        self.dispatcher
            .execute(RequestSpec::post(inbounds_path("resetAllTraffics")).accept(ACCEPT_JSON))
            .await?;
        self.log("Inbound stats reset successfully.");
        Ok(())
    }

    /// Zero the traffic counters of every client in one inbound.
    #[instrument(skip(self))]
    pub async fn reset_client_stats(&self, inbound_id: i64) -> Result<(), XuiError> {
        self.log(&format!("Resetting client stats for inbound ID: {inbound_id}"));
        self.dispatcher
            .execute(
                RequestSpec::post(inbounds_path(&format!("resetAllClientTraffics/{inbound_id}")))
                    .accept(ACCEPT_JSON),
            )
            .await?;
        self.log("Inbound client stats reset successfully.");
        Ok(())
    }
}
