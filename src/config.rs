use crate::services::assets::PLACEHOLDERS;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::collections::HashMap;
use std::env;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{error, info};
use validator::{Validate, ValidationError, ValidationErrors};

/// Default values for configuration
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_ENV: &str = "development";
const DEFAULT_PORT: u16 = 8080;
const CONFIG_DIR: &str = "config";
const DEFAULT_ASSETS_DIR: &str = "assets";
const DEFAULT_MOLLIE_API_URL: &str = "https://api.mollie.com";
const DEFAULT_MOLLIE_TIMEOUT_SECS: u64 = 10;
const DEFAULT_SALES_CHANNEL: &str = "default";
const DEFAULT_SHOP_URL: &str = "http://localhost:8080/";

/// Storefront settings for one sales channel.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SalesChannelConfig {
    /// Absolute URL of the storefront home page
    pub shop_url: String,

    /// Locale code of the channel language, e.g. `de_DE`
    #[serde(default)]
    pub locale: Option<String>,

    /// Route payments through the Mollie test environment
    #[serde(default)]
    pub test_mode: bool,

    #[serde(default)]
    pub live_api_key: Option<String>,

    #[serde(default)]
    pub test_api_key: Option<String>,
}

impl SalesChannelConfig {
    pub fn new(shop_url: impl Into<String>) -> Self {
        Self {
            shop_url: shop_url.into(),
            locale: None,
            test_mode: false,
            live_api_key: None,
            test_api_key: None,
        }
    }
}

/// Application configuration
#[derive(Clone, Debug, Deserialize, Validate)]
pub struct AppConfig {
    pub host: String,

    #[validate(range(min = 1))]
    pub port: u16,

    pub environment: String,

    pub log_level: String,

    #[serde(default)]
    pub log_json: bool,

    pub database_url: String,

    /// Create the schema on startup
    #[serde(default = "default_auto_migrate")]
    pub auto_migrate: bool,

    /// Directory holding `js/` and `css/` component assets
    #[serde(default = "default_assets_dir")]
    pub assets_dir: PathBuf,

    #[validate(url)]
    pub mollie_api_url: String,

    #[validate(range(min = 1, max = 120))]
    pub mollie_timeout_secs: u64,

    /// Sales channel used when a request does not name one
    pub default_sales_channel: String,

    #[serde(default)]
    pub sales_channels: HashMap<String, SalesChannelConfig>,
}

impl Default for AppConfig {
    fn default() -> Self {
        let mut sales_channels = HashMap::new();
        sales_channels.insert(
            DEFAULT_SALES_CHANNEL.to_string(),
            SalesChannelConfig::new(DEFAULT_SHOP_URL),
        );

        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            environment: DEFAULT_ENV.to_string(),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            log_json: false,
            database_url: "sqlite::memory:".to_string(),
            auto_migrate: default_auto_migrate(),
            assets_dir: default_assets_dir(),
            mollie_api_url: DEFAULT_MOLLIE_API_URL.to_string(),
            mollie_timeout_secs: DEFAULT_MOLLIE_TIMEOUT_SECS,
            default_sales_channel: DEFAULT_SALES_CHANNEL.to_string(),
            sales_channels,
        }
    }
}

impl AppConfig {
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Checks the sales channel table, which the derive cannot reach.
    pub fn validate_sales_channels(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if !self.sales_channels.contains_key(&self.default_sales_channel) {
            let mut err = ValidationError::new("unknown_sales_channel");
            err.message = Some(
                format!(
                    "default_sales_channel '{}' is not configured under sales_channels",
                    self.default_sales_channel
                )
                .into(),
            );
            errors.add("default_sales_channel", err);
        }

        for (id, channel) in &self.sales_channels {
            if url::Url::parse(&channel.shop_url).is_err() {
                let mut err = ValidationError::new("invalid_shop_url");
                err.message = Some(format!("sales channel '{}' has an invalid shop_url", id).into());
                errors.add("sales_channels", err);
            } else if channel.shop_url.contains(&['\'', '"', '\\'][..])
                || PLACEHOLDERS.iter().any(|token| channel.shop_url.contains(token))
            {
                // The URL is written into a quoted JS string by the components script
                let mut err = ValidationError::new("unsafe_shop_url");
                err.message = Some(
                    format!(
                        "sales channel '{}' has quotes, backslashes or script placeholders in shop_url",
                        id
                    )
                    .into(),
                );
                errors.add("sales_channels", err);
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[derive(Debug, Error)]
pub enum AppConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] ConfigError),
    #[error("invalid configuration: {0}")]
    Validation(#[from] ValidationErrors),
}

fn default_auto_migrate() -> bool {
    true
}

fn default_assets_dir() -> PathBuf {
    PathBuf::from(DEFAULT_ASSETS_DIR)
}

pub fn init_tracing(level: &str, json: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default_directive = format!("mollie_components={},tower_http=debug", level);
    let filter_directive = env::var("RUST_LOG")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(default_directive);

    if json {
        let _ = fmt().with_env_filter(EnvFilter::new(filter_directive)).json().try_init();
    } else {
        let _ = fmt().with_env_filter(EnvFilter::new(filter_directive)).try_init();
    }
}

/// Loads configuration from built-in defaults, `config/default.*`,
/// `config/<RUN_ENV>.*` and `APP__*` environment variables, in that order.
pub fn load_config() -> Result<AppConfig, AppConfigError> {
    // Support both RUN_ENV and APP_ENV for selecting config profile
    let run_env = env::var("RUN_ENV")
        .or_else(|_| env::var("APP_ENV"))
        .unwrap_or_else(|_| DEFAULT_ENV.to_string());
    load_config_from(Path::new(CONFIG_DIR), &run_env)
}

/// Same as [`load_config`] with an explicit config directory and profile.
pub fn load_config_from(config_dir: &Path, run_env: &str) -> Result<AppConfig, AppConfigError> {
    info!("Loading configuration for environment: {}", run_env);

    if !config_dir.exists() {
        info!(
            "Config directory '{}' not found; relying on built-in defaults and environment variables",
            config_dir.display()
        );
    }

    let config = Config::builder()
        .set_default("host", "0.0.0.0")?
        .set_default("port", i64::from(DEFAULT_PORT))?
        .set_default("environment", run_env)?
        .set_default("log_level", DEFAULT_LOG_LEVEL)?
        .set_default("log_json", false)?
        .set_default("database_url", "sqlite://mollie_components.db?mode=rwc")?
        .set_default("auto_migrate", true)?
        .set_default("assets_dir", DEFAULT_ASSETS_DIR)?
        .set_default("mollie_api_url", DEFAULT_MOLLIE_API_URL)?
        .set_default("mollie_timeout_secs", DEFAULT_MOLLIE_TIMEOUT_SECS as i64)?
        .set_default("default_sales_channel", DEFAULT_SALES_CHANNEL)?
        .add_source(File::with_name(&config_dir.join("default").to_string_lossy()).required(false))
        .add_source(File::with_name(&config_dir.join(run_env).to_string_lossy()).required(false))
        .add_source(Environment::with_prefix("APP").separator("__"))
        .build()?;

    let mut app_config: AppConfig = config.try_deserialize()?;

    // Local runs without any channel table get a single localhost storefront
    if app_config.sales_channels.is_empty()
        && app_config.default_sales_channel == DEFAULT_SALES_CHANNEL
    {
        app_config.sales_channels.insert(
            DEFAULT_SALES_CHANNEL.to_string(),
            SalesChannelConfig::new(DEFAULT_SHOP_URL),
        );
    }

    app_config.validate().map_err(|e| {
        error!("Configuration validation failed: {:?}", e);
        AppConfigError::Validation(e)
    })?;

    app_config.validate_sales_channels().map_err(|e| {
        error!("Sales channel configuration invalid: {:?}", e);
        AppConfigError::Validation(e)
    })?;

    info!(
        sales_channels = app_config.sales_channels.len(),
        "Configuration loaded successfully"
    );
    Ok(app_config)
}
