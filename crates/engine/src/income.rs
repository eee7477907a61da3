//! Income rows. Structurally parallel to expenses with a source counterparty.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "income")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: String,
    pub date: Date,
    pub time: Time,
    pub amount_minor: i64,
    pub currency: String,
    pub category_id: Option<Uuid>,
    pub source_id: Option<Uuid>,
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
