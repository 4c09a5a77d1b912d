//! Request-scoped sales channel context.

use crate::errors::ServiceError;
use crate::AppState;
use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{request::Parts, HeaderMap},
};

/// Header naming the sales channel a storefront request belongs to
pub const SALES_CHANNEL_HEADER: &str = "sw-sales-channel-id";

/// A storefront known to the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SalesChannel {
    pub id: String,
    /// Locale code of the channel language, e.g. `nl_NL`
    pub locale_code: Option<String>,
}

/// Sales channel data resolved for the current request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SalesChannelContext {
    pub sales_channel_id: String,
    pub locale_code: Option<String>,
}

impl From<SalesChannel> for SalesChannelContext {
    fn from(channel: SalesChannel) -> Self {
        Self {
            sales_channel_id: channel.id,
            locale_code: channel.locale_code,
        }
    }
}

#[async_trait]
pub trait SalesChannelProvider: Send + Sync {
    async fn find(&self, id: &str) -> Result<Option<SalesChannel>, ServiceError>;

    /// Channel used for requests that do not send [`SALES_CHANNEL_HEADER`].
    fn default_sales_channel_id(&self) -> &str;
}

impl SalesChannelContext {
    /// Resolves the context from request headers, falling back to the default channel.
    pub async fn from_headers(
        headers: &HeaderMap,
        channels: &dyn SalesChannelProvider,
    ) -> Result<Self, ServiceError> {
        let id = headers
            .get(SALES_CHANNEL_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| channels.default_sales_channel_id());

        channels
            .find(id)
            .await?
            .map(Self::from)
            .ok_or_else(|| ServiceError::NotFound(format!("sales channel '{}'", id)))
    }
}

#[async_trait]
impl FromRequestParts<AppState> for SalesChannelContext {
    type Rejection = ServiceError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        Self::from_headers(&parts.headers, state.services.sales_channels.as_ref()).await
    }
}
