//! Backup trigger.

use std::sync::Arc;

use tracing::instrument;
use xui_domain::constants::ACCEPT_JSON;
use xui_domain::XuiError;

use super::inbounds_path;
use crate::api::dispatcher::{Dispatcher, RequestSpec};

#[derive(Debug, Clone)]
pub struct DatabaseApi {
    dispatcher: Arc<Dispatcher>,
}

impl DatabaseApi {
    pub fn new(dispatcher: Arc<Dispatcher>) -> Self {
        Self { dispatcher }
    }

    /// Ask the panel to create a backup. Delivery (e.g. to a Telegram bot) is
    /// handled by the panel itself.
    #[instrument(skip(self))]
    pub async fn export(&self) -> Result<(), XuiError> {
        self.dispatcher.logger().info("Exporting database...");
        self.dispatcher
            .execute(RequestSpec::get(inbounds_path("createbackup")).accept(ACCEPT_JSON))
            .await?;
        self.dispatcher.logger().info("Database export initiated.");
        Ok(())
    }
}
