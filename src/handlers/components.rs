//! Storefront routes backing the Mollie Components credit card form.

use crate::context::SalesChannelContext;
use crate::errors::ServiceError;
use crate::handlers::AppState;
use crate::services::assets::{render_script, AssetKind, ScriptVariables};
use crate::services::customers::{CustomerProvider, UpdateResult};
use crate::services::locale::resolve_locale;
use crate::services::mollie::{lookup_current_profile, ProfileLookup};
use crate::services::routing::strip_trailing_slash;
use axum::{
    extract::{Path, State},
    http::header::CONTENT_TYPE,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde::Serialize;
use tracing::{info, instrument, warn};

const JAVASCRIPT: &str = "text/javascript";
const CSS: &str = "text/css";

/// Creates the router for the Mollie Components endpoints
pub fn components_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/mollie/components/store-card-token/:customer_id/:card_token",
            get(store_card_token),
        )
        .route("/mollie/components/js/:type", get(components_js))
        .route("/mollie/components/css/:type", get(components_css))
}

/// Body of the store-card-token response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoreCardTokenResponse {
    pub success: bool,
    #[serde(rename = "customerId")]
    pub customer_id: String,
    /// Errors reported by the update; `null` when no update was attempted
    pub result: Option<Vec<String>>,
}

impl StoreCardTokenResponse {
    pub fn new(customer_id: String, outcome: Option<Result<UpdateResult, ServiceError>>) -> Self {
        match outcome {
            Some(Ok(update)) => Self {
                success: true,
                customer_id,
                result: Some(update.errors),
            },
            Some(Err(err)) => Self {
                success: false,
                customer_id,
                result: Some(vec![err.response_message()]),
            },
            None => Self {
                success: false,
                customer_id,
                result: None,
            },
        }
    }
}

/// Looks up the customer and stores the token when it exists. A failed write is
/// reported in the body, not as an error.
pub async fn save_card_token(
    customers: &dyn CustomerProvider,
    customer_id: String,
    card_token: &str,
) -> Result<StoreCardTokenResponse, ServiceError> {
    let outcome = match customers.get_customer(&customer_id).await? {
        Some(customer) => {
            let result = customers.set_card_token(&customer, card_token).await;
            if let Err(err) = &result {
                warn!(customer_id = %customer_id, error = %err, "failed to store card token");
            }
            Some(result)
        }
        None => {
            info!(customer_id = %customer_id, "customer not found; card token not stored");
            None
        }
    };

    Ok(StoreCardTokenResponse::new(customer_id, outcome))
}

/// Store a tokenized card reference against a customer
#[instrument(skip(state, card_token))]
async fn store_card_token(
    State(state): State<AppState>,
    Path((customer_id, card_token)): Path<(String, String)>,
) -> Result<Response, ServiceError> {
    let payload = save_card_token(state.services.customers.as_ref(), customer_id, &card_token).await?;
    let body = serde_json::to_string(&payload)?;
    Ok(([(CONTENT_TYPE, JAVASCRIPT)], body).into_response())
}

/// Serve the components script with shop-specific values filled in
#[instrument(skip(state))]
async fn components_js(
    State(state): State<AppState>,
    Path(asset_type): Path<String>,
    context: SalesChannelContext,
) -> Result<Response, ServiceError> {
    let kind = AssetKind::from_path_segment(&asset_type)
        .ok_or_else(|| ServiceError::NotFound(format!("components script '{}'", asset_type)))?;

    let services = &state.services;
    let settings = services.settings.get_settings(&context.sales_channel_id).await?;

    let profile = lookup_current_profile(services.profiles.as_ref(), &settings).await;
    if let ProfileLookup::Failed(err) = &profile {
        warn!(
            sales_channel_id = %context.sales_channel_id,
            error = %err,
            "Mollie profile lookup failed; serving components without a profile id"
        );
    }

    let template = services.assets.read(kind.script_path()).await?;
    let home_url = services.urls.home_url(&context)?;

    let script = render_script(
        &template,
        &ScriptVariables {
            profile_id: profile.profile_id(),
            shop_url: strip_trailing_slash(&home_url),
            locale: resolve_locale(context.locale_code.as_deref()),
            test_mode: settings.test_mode,
        },
    );

    Ok(([(CONTENT_TYPE, JAVASCRIPT)], script).into_response())
}

/// Serve the components stylesheet verbatim
#[instrument(skip(state))]
async fn components_css(
    State(state): State<AppState>,
    Path(asset_type): Path<String>,
) -> Result<Response, ServiceError> {
    let kind = AssetKind::from_path_segment(&asset_type)
        .ok_or_else(|| ServiceError::NotFound(format!("components stylesheet '{}'", asset_type)))?;

    let stylesheet = state.services.assets.read(kind.stylesheet_path()).await?;
    Ok(([(CONTENT_TYPE, CSS)], stylesheet).into_response())
}
