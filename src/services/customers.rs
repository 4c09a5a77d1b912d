use crate::db::DbPool;
use crate::entities::customer::{self, CARD_TOKEN_KEY, MOLLIE_FIELDS_KEY};
use crate::errors::ServiceError;
use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, EntityTrait, Set};
use serde::Serialize;
use serde_json::{json, Map, Value};
use std::sync::Arc;
use tracing::{debug, instrument};

pub use customer::Model as Customer;

/// Outcome of a customer write.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UpdateResult {
    pub errors: Vec<String>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CustomerProvider: Send + Sync {
    async fn get_customer(&self, customer_id: &str) -> Result<Option<Customer>, ServiceError>;

    /// Stores `card_token` against `customer` for one-click card payments.
    async fn set_card_token(
        &self,
        customer: &Customer,
        card_token: &str,
    ) -> Result<UpdateResult, ServiceError>;
}

/// Returns `custom_fields` with the card token set, keeping unrelated keys.
pub fn with_card_token(custom_fields: Option<Value>, card_token: &str) -> Value {
    let mut fields = match custom_fields {
        Some(Value::Object(map)) => map,
        _ => Map::new(),
    };

    match fields.get_mut(MOLLIE_FIELDS_KEY) {
        Some(Value::Object(mollie)) => {
            mollie.insert(CARD_TOKEN_KEY.to_string(), json!(card_token));
        }
        _ => {
            let mut mollie = Map::new();
            mollie.insert(CARD_TOKEN_KEY.to_string(), json!(card_token));
            fields.insert(MOLLIE_FIELDS_KEY.to_string(), Value::Object(mollie));
        }
    }

    Value::Object(fields)
}

/// Customer storage backed by the `customers` table.
#[derive(Clone)]
pub struct SeaOrmCustomerProvider {
    db: Arc<DbPool>,
}

impl SeaOrmCustomerProvider {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CustomerProvider for SeaOrmCustomerProvider {
    #[instrument(skip(self))]
    async fn get_customer(&self, customer_id: &str) -> Result<Option<Customer>, ServiceError> {
        let customer = customer::Entity::find_by_id(customer_id.to_string())
            .one(self.db.as_ref())
            .await?;
        Ok(customer)
    }

    #[instrument(skip(self, customer, card_token), fields(customer_id = %customer.id))]
    async fn set_card_token(
        &self,
        customer: &Customer,
        card_token: &str,
    ) -> Result<UpdateResult, ServiceError> {
        let custom_fields = with_card_token(customer.custom_fields.clone(), card_token);

        let mut active: customer::ActiveModel = customer.clone().into();
        active.custom_fields = Set(Some(custom_fields));
        active.updated_at = Set(Utc::now());
        active.update(self.db.as_ref()).await?;

        debug!("card token stored");
        Ok(UpdateResult::default())
    }
}
