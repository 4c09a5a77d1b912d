use crate::config::{AppConfig, SalesChannelConfig};
use crate::context::{SalesChannel, SalesChannelContext, SalesChannelProvider};
use crate::errors::ServiceError;
use crate::services::routing::UrlGenerator;
use crate::services::settings::{MollieSettings, SettingsProvider};
use async_trait::async_trait;
use std::collections::HashMap;

/// Sales channels, their Mollie settings and storefront URLs, read from [`AppConfig`].
#[derive(Debug, Clone)]
pub struct ConfigSalesChannelStore {
    default_id: String,
    channels: HashMap<String, SalesChannelConfig>,
}

impl ConfigSalesChannelStore {
    pub fn new(default_id: impl Into<String>, channels: HashMap<String, SalesChannelConfig>) -> Self {
        Self {
            default_id: default_id.into(),
            channels,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            config.default_sales_channel.clone(),
            config.sales_channels.clone(),
        )
    }

    fn channel(&self, id: &str) -> Result<&SalesChannelConfig, ServiceError> {
        self.channels
            .get(id)
            .ok_or_else(|| ServiceError::NotFound(format!("sales channel '{}'", id)))
    }
}

#[async_trait]
impl SalesChannelProvider for ConfigSalesChannelStore {
    async fn find(&self, id: &str) -> Result<Option<SalesChannel>, ServiceError> {
        Ok(self.channels.get(id).map(|channel| SalesChannel {
            id: id.to_string(),
            locale_code: channel.locale.clone(),
        }))
    }

    fn default_sales_channel_id(&self) -> &str {
        &self.default_id
    }
}

#[async_trait]
impl SettingsProvider for ConfigSalesChannelStore {
    async fn get_settings(&self, sales_channel_id: &str) -> Result<MollieSettings, ServiceError> {
        let channel = self.channel(sales_channel_id)?;
        Ok(MollieSettings {
            test_mode: channel.test_mode,
            live_api_key: channel.live_api_key.clone(),
            test_api_key: channel.test_api_key.clone(),
        })
    }
}

impl UrlGenerator for ConfigSalesChannelStore {
    fn home_url(&self, context: &SalesChannelContext) -> Result<String, ServiceError> {
        Ok(self.channel(&context.sales_channel_id)?.shop_url.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::SALES_CHANNEL_HEADER;
    use assert_matches::assert_matches;
    use axum::http::{HeaderMap, HeaderValue};

    fn store() -> ConfigSalesChannelStore {
        let mut channels = HashMap::new();
        channels.insert(
            "storefront".to_string(),
            SalesChannelConfig {
                locale: Some("nl_NL".to_string()),
                test_mode: true,
                test_api_key: Some("test_key".to_string()),
                ..SalesChannelConfig::new("https://shop.example.com/")
            },
        );
        channels.insert(
            "outlet".to_string(),
            SalesChannelConfig::new("https://outlet.example.com"),
        );
        ConfigSalesChannelStore::new("storefront", channels)
    }

    #[tokio::test]
    async fn context_defaults_to_configured_channel() {
        let store = store();
        let context = SalesChannelContext::from_headers(&HeaderMap::new(), &store)
            .await
            .unwrap();

        assert_eq!(context.sales_channel_id, "storefront");
        assert_eq!(context.locale_code.as_deref(), Some("nl_NL"));
    }

    #[tokio::test]
    async fn context_honours_sales_channel_header() {
        let store = store();
        let mut headers = HeaderMap::new();
        headers.insert(SALES_CHANNEL_HEADER, HeaderValue::from_static("outlet"));

        let context = SalesChannelContext::from_headers(&headers, &store)
            .await
            .unwrap();
        assert_eq!(context.sales_channel_id, "outlet");
        assert_eq!(context.locale_code, None);
    }

    #[tokio::test]
    async fn unknown_channel_is_not_found() {
        let store = store();
        let mut headers = HeaderMap::new();
        headers.insert(SALES_CHANNEL_HEADER, HeaderValue::from_static("wholesale"));

        let result = SalesChannelContext::from_headers(&headers, &store).await;
        assert_matches!(result, Err(ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn settings_and_home_url_come_from_channel() {
        let store = store();
        let settings = store.get_settings("storefront").await.unwrap();
        assert!(settings.test_mode);
        assert_eq!(settings.active_api_key(), Some("test_key"));

        let context = SalesChannelContext {
            sales_channel_id: "outlet".to_string(),
            locale_code: None,
        };
        assert_eq!(store.home_url(&context).unwrap(), "https://outlet.example.com");
    }
}
