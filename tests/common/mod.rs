#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    body::Body,
    http::{HeaderMap, Request, StatusCode},
    Router,
};
use chrono::Utc;
use mollie_components::{
    config::{AppConfig, SalesChannelConfig},
    context::SALES_CHANNEL_HEADER,
    db,
    entities::customer,
    handlers::AppServices,
    AppState,
};
use sea_orm::{ActiveModelTrait, EntityTrait, Set};
use serde_json::Value;
use tower::ServiceExt;
use wiremock::MockServer;

pub const STOREFRONT: &str = "storefront";
pub const OUTLET: &str = "outlet";
pub const STOREFRONT_TEST_KEY: &str = "test_storefront0123456789abcdefghij";
pub const OUTLET_LIVE_KEY: &str = "live_outlet0123456789abcdefghijklmn";

/// Router wired to an in-memory SQLite database and a stubbed Mollie API.
pub struct TestApp {
    router: Router,
    pub db: Arc<db::DbPool>,
    pub mollie: MockServer,
}

/// Buffered response of a single request.
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl TestResponse {
    pub fn content_type(&self) -> &str {
        self.headers
            .get(axum::http::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
    }

    pub fn json(&self) -> Value {
        serde_json::from_str(&self.body).expect("response body is not JSON")
    }
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_config(|_| {}).await
    }

    /// Builds the app after `customize` has adjusted the test configuration.
    pub async fn with_config(customize: impl FnOnce(&mut AppConfig)) -> Self {
        let mollie = MockServer::start().await;

        let mut storefront = SalesChannelConfig::new("https://shop.example.com/");
        storefront.locale = Some("de_DE".to_string());
        storefront.test_mode = true;
        storefront.test_api_key = Some(STOREFRONT_TEST_KEY.to_string());
        storefront.live_api_key = Some("live_storefront0123456789abcdefghij".to_string());

        // Live mode with a locale Mollie does not support
        let mut outlet = SalesChannelConfig::new("https://outlet.example.com");
        outlet.locale = Some("xx_XX".to_string());
        outlet.live_api_key = Some(OUTLET_LIVE_KEY.to_string());

        let mut cfg = AppConfig {
            database_url: "sqlite::memory:".to_string(),
            assets_dir: concat!(env!("CARGO_MANIFEST_DIR"), "/assets").into(),
            mollie_api_url: mollie.uri(),
            default_sales_channel: STOREFRONT.to_string(),
            sales_channels: HashMap::from([
                (STOREFRONT.to_string(), storefront),
                (OUTLET.to_string(), outlet),
            ]),
            ..AppConfig::default()
        };
        customize(&mut cfg);

        let pool = db::establish_connection(&cfg.database_url)
            .await
            .expect("failed to create test database");
        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations in tests");
        let db = Arc::new(pool);

        let services = AppServices::new(&cfg, db.clone()).expect("failed to build services");
        let router = mollie_components::app_router(AppState::new(services));

        Self { router, db, mollie }
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.request(Request::get(uri).body(Body::empty()).unwrap())
            .await
    }

    pub async fn get_for_channel(&self, uri: &str, sales_channel_id: &str) -> TestResponse {
        self.request(
            Request::get(uri)
                .header(SALES_CHANNEL_HEADER, sales_channel_id)
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }

    pub async fn request(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        TestResponse {
            status,
            headers,
            body: String::from_utf8(bytes.to_vec()).expect("response body is not UTF-8"),
        }
    }

    pub async fn seed_customer(&self, id: &str, custom_fields: Option<Value>) -> customer::Model {
        let now = Utc::now();
        customer::ActiveModel {
            id: Set(id.to_string()),
            email: Set(format!("{id}@example.com")),
            custom_fields: Set(custom_fields),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(self.db.as_ref())
        .await
        .expect("failed to seed customer")
    }

    pub async fn find_customer(&self, id: &str) -> Option<customer::Model> {
        customer::Entity::find_by_id(id.to_string())
            .one(self.db.as_ref())
            .await
            .expect("failed to load customer")
    }
}
