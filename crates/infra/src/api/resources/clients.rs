//! Client (user account) endpoints.

use std::sync::Arc;

use serde::Serialize;
use serde_json::{json, Value};
use tracing::instrument;
use xui_domain::constants::ACCEPT_JSON;
use xui_domain::{Client, XuiError};

use super::{inbounds_path, segment, string_list, to_json};
use crate::api::dispatcher::{Dispatcher, RequestSpec};
use crate::errors::InfraError;

#[derive(Serialize)]
struct ClientSettings<'a> {
    clients: &'a [Client],
}

/// `{id, settings}` body where `settings` is the client list as JSON text.
#[derive(Serialize)]
struct ClientsPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<i64>,
    settings: String,
}

impl ClientsPayload {
    fn new(inbound_id: Option<i64>, clients: &[Client]) -> Result<Self, XuiError> {
        let settings = serde_json::to_string(&ClientSettings { clients })
            .map_err(|err| XuiError::from(InfraError::from(err)))?;
        Ok(Self { id: inbound_id, settings })
    }
}

/// Client operations.
#[derive(Debug, Clone)]
pub struct ClientsApi {
    dispatcher: Arc<Dispatcher>,
}

impl ClientsApi {
    pub fn new(dispatcher: Arc<Dispatcher>) -> Self {
        Self { dispatcher }
    }

    fn log(&self, message: &str) {
        self.dispatcher.logger().info(message);
    }

    /// Traffic record of the client with `email`, `None` if the panel has none.
    #[instrument(skip(self))]
    pub async fn get_by_email(&self, email: &str) -> Result<Option<Client>, XuiError> {
        self.log(&format!("Getting client stats for email: {email}"));
        let envelope = self
            .dispatcher
            .envelope(
                RequestSpec::get(inbounds_path(&format!("getClientTraffics/{}", segment(email))))
                    .accept(ACCEPT_JSON),
            )
            .await?;

        let client = envelope.decode_obj::<Client>()?;
        if client.is_none() {
            self.log(&format!("No client found for email: {email}"));
        }
        Ok(client)
    }

    /// IPs recorded for the client. Empty when the panel reports none.
    #[instrument(skip(self))]
    pub async fn get_ips(&self, email: &str) -> Result<Vec<String>, XuiError> {
        self.log(&format!("Getting client IPs for email: {email}"));
        let envelope = self
            .dispatcher
            .envelope(
                RequestSpec::post(inbounds_path(&format!("clientIps/{}", segment(email))))
                    .accept(ACCEPT_JSON)
                    .json(json!({})),
            )
            .await?;

        Ok(string_list(envelope.payload()))
    }

    /// Add `clients` to inbound `inbound_id`.
    #[instrument(skip(self, clients), fields(count = clients.len()))]
    pub async fn add(&self, inbound_id: i64, clients: &[Client]) -> Result<(), XuiError> {
        let payload = to_json(&ClientsPayload::new(Some(inbound_id), clients)?)?;

        self.log(&format!("Adding {} clients to inbound {inbound_id}", clients.len()));
        self.dispatcher
            .execute(RequestSpec::post(inbounds_path("addClient")).accept(ACCEPT_JSON).json(payload))
            .await?;
        self.log(&format!("Clients added successfully to inbound {inbound_id}"));
        Ok(())
    }

    /// Replace client `client_id` with `client`. The target inbound is
    /// `client.inbound_id`.
    #[instrument(skip(self, client), fields(email = %client.email))]
    pub async fn update(&self, client_id: &str, client: &Client) -> Result<(), XuiError> {
        let payload =
            to_json(&ClientsPayload::new(client.inbound_id, std::slice::from_ref(client))?)?;
        let inbound = client.inbound_id.map_or_else(|| "?".to_string(), |id| id.to_string());

        self.log(&format!("Updating client {client_id} in inbound {inbound}"));
        self.dispatcher
            .execute(
                RequestSpec::post(inbounds_path(&format!("updateClient/{}", segment(client_id))))
                    .accept(ACCEPT_JSON)
                    .json(payload),
            )
            .await?;
        self.log(&format!("Client {client_id} updated successfully in inbound {inbound}"));
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn reset_ips(&self, email: &str) -> Result<(), XuiError> {
        self.log(&format!("Resetting IPs for client with email: {email}"));
        self.dispatcher
            .execute(
                RequestSpec::post(inbounds_path(&format!("clearClientIps/{}", segment(email))))
                    .accept(ACCEPT_JSON)
                    .json(json!({})),
            )
            .await?;
        self.log(&format!("IPs reset successfully for client with email: {email}"));
        Ok(())
    }

    /// Zero the traffic counters of one client.
    #[instrument(skip(self))]
    pub async fn reset_stats(&self, inbound_id: i64, email: &str) -> Result<(), XuiError> {
        self.log(&format!("Resetting stats for client with email: {email}"));
        self.dispatcher
            .execute(
                RequestSpec::post(inbounds_path(&format!(
                    "{inbound_id}/resetClientTraffic/{}",
                    segment(email)
                )))
                .accept(ACCEPT_JSON)
                .json(json!({})),
            )
            .await?;
        self.log(&format!("Stats reset successfully for client with email: {email}"));
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, inbound_id: i64, client_id: &str) -> Result<(), XuiError> {
        self.log(&format!("Deleting client {client_id} from inbound {inbound_id}"));
        self.dispatcher
            .execute(
                RequestSpec::post(inbounds_path(&format!(
                    "{inbound_id}/delClient/{}",
                    segment(client_id)
                )))
                .accept(ACCEPT_JSON)
                .json(json!({ "id": inbound_id, "clientId": client_id })),
            )
            .await?;
        self.log(&format!("Client {client_id} deleted successfully from inbound {inbound_id}"));
        Ok(())
    }

    /// Remove clients whose traffic or time allowance is used up.
    #[instrument(skip(self))]
    pub async fn delete_depleted(&self, inbound_id: i64) -> Result<(), XuiError> {
        self.log(&format!("Deleting depleted clients from inbound {inbound_id}"));
        self.dispatcher
            .execute(
                RequestSpec::post(inbounds_path(&format!("delDepletedClients/{inbound_id}")))
                    .accept(ACCEPT_JSON)
                    .json(json!({ "id": inbound_id })),
            )
            .await?;
        self.log(&format!("Depleted clients deleted successfully from inbound {inbound_id}"));
        Ok(())
    }

    /// Emails of clients currently connected.
    #[instrument(skip(self))]
    pub async fn online(&self) -> Result<Vec<String>, XuiError> {
        self.log("Getting online clients");
        let envelope = self
            .dispatcher
            .envelope(RequestSpec::post(inbounds_path("onlines")).accept(ACCEPT_JSON).json(json!({})))
            .await?;

        Ok(string_list(envelope.payload()))
    }

    /// Traffic records for client `client_id`. The panel answers with either a
    /// list or a single record.
    #[instrument(skip(self))]
    pub async fn get_traffic_by_id(&self, client_id: &str) -> Result<Vec<Client>, XuiError> {
        self.log(&format!("Getting traffic for client ID: {client_id}"));
        let envelope = self
            .dispatcher
            .envelope(
                RequestSpec::get(inbounds_path(&format!(
                    "getClientTrafficsById/{}",
                    segment(client_id)
                )))
                .accept(ACCEPT_JSON),
            )
            .await?;

        match envelope.payload() {
            None => {
                self.log(&format!("No client found for ID: {client_id}"));
                Ok(Vec::new())
            }
            Some(Value::Array(_)) => Ok(envelope.decode_obj::<Vec<Client>>()?.unwrap_or_default()),
            Some(_) => Ok(envelope.decode_obj::<Client>()?.into_iter().collect()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_embeds_settings_as_json_text() {
        let mut client = Client::new("alice@example.com");
        client.id = Some("c1".into());

        let payload = ClientsPayload::new(Some(3), std::slice::from_ref(&client)).unwrap();
        let value = to_json(&payload).unwrap();

        assert_eq!(value["id"], 3);
        let settings: Value = serde_json::from_str(value["settings"].as_str().unwrap()).unwrap();
        assert_eq!(settings["clients"][0]["email"], "alice@example.com");
        assert_eq!(settings["clients"][0]["id"], "c1");
    }

    #[test]
    fn test_payload_without_inbound_omits_id() {
        let payload = ClientsPayload::new(None, &[]).unwrap();
        let value = to_json(&payload).unwrap();
        assert!(value.get("id").is_none());
        assert_eq!(value["settings"], r#"{"clients":[]}"#);
    }
}
