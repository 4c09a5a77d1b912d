use crate::errors::ServiceError;
use async_trait::async_trait;

/// Mollie plugin settings for one sales channel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MollieSettings {
    pub test_mode: bool,
    pub live_api_key: Option<String>,
    pub test_api_key: Option<String>,
}

impl MollieSettings {
    /// The API key matching the current mode; blank keys count as missing.
    pub fn active_api_key(&self) -> Option<&str> {
        let key = if self.test_mode {
            self.test_api_key.as_deref()
        } else {
            self.live_api_key.as_deref()
        };
        key.map(str::trim).filter(|key| !key.is_empty())
    }

    pub fn mode(&self) -> &'static str {
        if self.test_mode {
            "test"
        } else {
            "live"
        }
    }
}

#[async_trait]
pub trait SettingsProvider: Send + Sync {
    async fn get_settings(&self, sales_channel_id: &str) -> Result<MollieSettings, ServiceError>;
}
