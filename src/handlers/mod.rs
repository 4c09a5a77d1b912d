pub mod components;
pub mod health;

use crate::config::AppConfig;
use crate::context::SalesChannelProvider;
use crate::db::DbPool;
use crate::services::{
    assets::{AssetSource, FsAssetSource},
    customers::{CustomerProvider, SeaOrmCustomerProvider},
    mollie::{MollieProfileClient, ProfileApi, ProfileApiError},
    routing::UrlGenerator,
    sales_channels::ConfigSalesChannelStore,
    settings::SettingsProvider,
};
use std::sync::Arc;
use std::time::Duration;

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;

/// Collaborators used by HTTP handlers
#[derive(Clone)]
pub struct AppServices {
    pub sales_channels: Arc<dyn SalesChannelProvider>,
    pub settings: Arc<dyn SettingsProvider>,
    pub urls: Arc<dyn UrlGenerator>,
    pub customers: Arc<dyn CustomerProvider>,
    pub profiles: Arc<dyn ProfileApi>,
    pub assets: Arc<dyn AssetSource>,
}

impl AppServices {
    /// Wire the production collaborators from configuration.
    pub fn new(config: &AppConfig, db_pool: Arc<DbPool>) -> Result<Self, ProfileApiError> {
        let channels = Arc::new(ConfigSalesChannelStore::from_config(config));
        let profiles = MollieProfileClient::new(
            config.mollie_api_url.clone(),
            Duration::from_secs(config.mollie_timeout_secs),
        )?;

        Ok(Self {
            sales_channels: channels.clone(),
            settings: channels.clone(),
            urls: channels,
            customers: Arc::new(SeaOrmCustomerProvider::new(db_pool)),
            profiles: Arc::new(profiles),
            assets: Arc::new(FsAssetSource::new(config.assets_dir.clone())),
        })
    }
}
