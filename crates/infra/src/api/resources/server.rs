//! Server status and database download.

use std::path::Path;
use std::sync::Arc;

use tracing::{info, instrument};
use xui_domain::constants::{
    ACCEPT_JSON, ACCEPT_OCTET_STREAM, SERVER_DB_ENDPOINT, SERVER_STATUS_ENDPOINT,
};
use xui_domain::{ServerStatus, XuiError};

use crate::api::dispatcher::{Dispatcher, RequestOptions, RequestSpec};
use crate::errors::InfraError;

#[derive(Debug, Clone)]
pub struct ServerApi {
    dispatcher: Arc<Dispatcher>,
}

impl ServerApi {
    pub fn new(dispatcher: Arc<Dispatcher>) -> Self {
        Self { dispatcher }
    }

    /// Host and xray health. `None` when the panel returns no payload.
    #[instrument(skip(self))]
    pub async fn status(&self) -> Result<Option<ServerStatus>, XuiError> {
        self.dispatcher.logger().info("Getting server status...");
        let envelope = self
            .dispatcher
            .envelope(RequestSpec::post(SERVER_STATUS_ENDPOINT).accept(ACCEPT_JSON))
            .await?;

        envelope.decode_obj::<ServerStatus>()
    }

    /// Download the panel database and write it to `save_path`.
    ///
    /// Returns the number of bytes written.
    #[instrument(skip(self, save_path), fields(path = %save_path.as_ref().display()))]
    pub async fn download_db(&self, save_path: impl AsRef<Path>) -> Result<u64, XuiError> {
        let save_path = save_path.as_ref();
        self.dispatcher.logger().info("Downloading database...");

        let response = self
            .dispatcher
            .execute(
                RequestSpec::get(SERVER_DB_ENDPOINT)
                    .accept(ACCEPT_OCTET_STREAM)
                    .options(RequestOptions::raw()),
            )
            .await?;

        let bytes = response.into_bytes()?;
        tokio::fs::write(save_path, &bytes).await.map_err(|err| XuiError::from(InfraError::from(err)))?;

        self.dispatcher.logger().info(&format!("Database saved to {}", save_path.display()));
        info!(bytes = bytes.len(), "database downloaded");
        Ok(bytes.len() as u64)
    }
}
