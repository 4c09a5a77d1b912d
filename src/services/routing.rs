use crate::context::SalesChannelContext;
use crate::errors::ServiceError;

/// Builds absolute storefront URLs.
pub trait UrlGenerator: Send + Sync {
    /// Absolute URL of the storefront home page for the context's sales channel.
    fn home_url(&self, context: &SalesChannelContext) -> Result<String, ServiceError>;
}

/// Removes one trailing slash, so `https://shop//` keeps the other.
pub fn strip_trailing_slash(url: &str) -> &str {
    url.strip_suffix('/').unwrap_or(url)
}
