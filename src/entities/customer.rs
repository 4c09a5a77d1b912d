use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;

/// Key under `custom_fields` owned by the Mollie integration
pub const MOLLIE_FIELDS_KEY: &str = "mollie_payments";
/// Key of the stored card token inside the Mollie custom fields
pub const CARD_TOKEN_KEY: &str = "credit_card_token";

/// Storefront customer with its free-form custom fields
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "customers")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub email: String,
    #[sea_orm(column_type = "Json", nullable)]
    pub custom_fields: Option<Json>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Card token stored by a previous Mollie Components checkout, if any.
    pub fn card_token(&self) -> Option<&str> {
        self.custom_fields
            .as_ref()?
            .get(MOLLIE_FIELDS_KEY)?
            .get(CARD_TOKEN_KEY)?
            .as_str()
    }
}
