//! Expense rows.
//!
//! `tags` is stored as a JSON array encoded in a text column; use
//! [`crate::util::decode_tags`] / [`crate::util::encode_tags`] at the model
//! boundary.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "expenses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: String,
    pub date: Date,
    pub time: Time,
    pub amount_minor: i64,
    pub currency: String,
    pub category_id: Option<Uuid>,
    pub recipient_id: Option<Uuid>,
    pub payment_method: String,
    pub transaction_reference: Option<String>,
    pub notes: Option<String>,
    pub tags: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
