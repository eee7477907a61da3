//! Recipients: the counterparties money is paid to (expense side).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "recipients")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Option<String>,
    pub name: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub display_order: i32,
    /// Designated identifier used by the categorization pipeline (e.g. a UPI
    /// VPA such as `grocerymart@okaxis`).
    pub payment_identifier: Option<String>,
    pub contact: Option<String>,
    pub is_favorite: bool,
    pub default_category_id: Option<Uuid>,
    pub is_default: bool,
    pub is_global: bool,
    pub is_active: bool,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Recipient {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub display_order: i32,
    pub payment_identifier: Option<String>,
    pub contact: Option<String>,
    pub is_favorite: bool,
    pub default_category_id: Option<Uuid>,
    pub is_default: bool,
    pub is_global: bool,
    pub is_active: bool,
    pub owner: Option<String>,
}

impl From<Model> for Recipient {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            description: model.description,
            icon: model.icon,
            color: model.color,
            display_order: model.display_order,
            payment_identifier: model.payment_identifier,
            contact: model.contact,
            is_favorite: model.is_favorite,
            default_category_id: model.default_category_id,
            is_default: model.is_default,
            is_global: model.is_global,
            is_active: model.is_active,
            owner: model.user_id,
        }
    }
}
