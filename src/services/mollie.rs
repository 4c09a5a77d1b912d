//! Mollie API access for the components script.

use crate::services::settings::MollieSettings;
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tracing::instrument;

/// Merchant profile as returned by `GET /v2/profiles/me`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub mode: Option<String>,
}

#[derive(Debug, Error)]
pub enum ProfileApiError {
    #[error("no Mollie API key configured for {mode} mode")]
    MissingApiKey { mode: &'static str },
    #[error("Mollie API request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Mollie API returned {status}: {title}: {detail}")]
    Api {
        status: u16,
        title: String,
        detail: String,
    },
}

/// Error document Mollie returns alongside non-2xx responses.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ApiErrorBody {
    title: String,
    detail: String,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileApi: Send + Sync {
    /// Fetches the profile the API key belongs to.
    async fn current_profile(&self, api_key: &str) -> Result<Profile, ProfileApiError>;
}

/// Result of looking up the merchant profile; failures keep their cause for logging.
#[derive(Debug)]
pub enum ProfileLookup {
    Fetched(Profile),
    Failed(ProfileApiError),
}

impl ProfileLookup {
    /// Profile id to hand to Mollie Components, empty when unavailable.
    pub fn profile_id(&self) -> &str {
        match self {
            Self::Fetched(profile) => profile.id.as_deref().unwrap_or_default(),
            Self::Failed(_) => "",
        }
    }
}

/// Looks up the profile with the API key matching the settings' mode.
pub async fn lookup_current_profile(api: &dyn ProfileApi, settings: &MollieSettings) -> ProfileLookup {
    let Some(api_key) = settings.active_api_key() else {
        return ProfileLookup::Failed(ProfileApiError::MissingApiKey {
            mode: settings.mode(),
        });
    };

    match api.current_profile(api_key).await {
        Ok(profile) => ProfileLookup::Fetched(profile),
        Err(err) => ProfileLookup::Failed(err),
    }
}

/// `ProfileApi` backed by the Mollie REST API.
#[derive(Clone)]
pub struct MollieProfileClient {
    client: Client,
    base_url: String,
}

impl MollieProfileClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ProfileApiError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(base_url, client))
    }

    /// Build a client from an existing reqwest client (useful for testing).
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }
}

#[async_trait]
impl ProfileApi for MollieProfileClient {
    #[instrument(skip(self, api_key))]
    async fn current_profile(&self, api_key: &str) -> Result<Profile, ProfileApiError> {
        let response = self
            .client
            .get(format!("{}/v2/profiles/me", self.base_url))
            .bearer_auth(api_key)
            .header(ACCEPT, "application/hal+json")
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(response.json::<Profile>().await?);
        }

        let body = response.json::<ApiErrorBody>().await.unwrap_or_default();
        Err(ProfileApiError::Api {
            status: status.as_u16(),
            title: body.title,
            detail: body.detail,
        })
    }
}
