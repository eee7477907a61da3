//! Seeds the default classification rows every user can see.
//!
//! Each table gets an "Other" catch-all used as the fallback bucket for
//! unmatched SMS transactions, plus a starter set of common categories.
//! Default rows carry a NULL `user_id` and `is_default = true`.

use sea_orm_migration::prelude::*;
use uuid::Uuid;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
enum IncomeCategories {
    Table,
    Id,
    UserId,
    Name,
    Icon,
    DisplayOrder,
    IsDefault,
    IsGlobal,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum ExpenseCategories {
    Table,
    Id,
    UserId,
    Name,
    Icon,
    DisplayOrder,
    IsDefault,
    IsGlobal,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Recipients {
    Table,
    Id,
    UserId,
    Name,
    DisplayOrder,
    IsFavorite,
    IsDefault,
    IsGlobal,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Sources {
    Table,
    Id,
    UserId,
    Name,
    DisplayOrder,
    IsDefault,
    IsGlobal,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

const INCOME_CATEGORIES: &[(&str, &str)] = &[
    ("Salary", "briefcase"),
    ("Business", "storefront"),
    ("Investment", "trending-up"),
    ("Gift", "gift"),
    ("Refund", "arrow-undo"),
    ("Other", "ellipsis-horizontal"),
];

const EXPENSE_CATEGORIES: &[(&str, &str)] = &[
    ("Food & Dining", "restaurant"),
    ("Groceries", "cart"),
    ("Transport", "bus"),
    ("Shopping", "bag"),
    ("Bills & Utilities", "receipt"),
    ("Entertainment", "film"),
    ("Health", "medkit"),
    ("Travel", "airplane"),
    ("Education", "school"),
    ("Rent", "home"),
    ("Other", "ellipsis-horizontal"),
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let now = chrono::Utc::now();

        for (order, (name, icon)) in INCOME_CATEGORIES.iter().enumerate() {
            let insert = Query::insert()
                .into_table(IncomeCategories::Table)
                .columns([
                    IncomeCategories::Id,
                    IncomeCategories::UserId,
                    IncomeCategories::Name,
                    IncomeCategories::Icon,
                    IncomeCategories::DisplayOrder,
                    IncomeCategories::IsDefault,
                    IncomeCategories::IsGlobal,
                    IncomeCategories::IsActive,
                    IncomeCategories::CreatedAt,
                    IncomeCategories::UpdatedAt,
                ])
                .values_panic([
                    Uuid::new_v4().into(),
                    Option::<String>::None.into(),
                    (*name).into(),
                    (*icon).into(),
                    (order as i32).into(),
                    true.into(),
                    false.into(),
                    true.into(),
                    now.into(),
                    now.into(),
                ])
                .to_owned();
            manager.exec_stmt(insert).await?;
        }

        for (order, (name, icon)) in EXPENSE_CATEGORIES.iter().enumerate() {
            let insert = Query::insert()
                .into_table(ExpenseCategories::Table)
                .columns([
                    ExpenseCategories::Id,
                    ExpenseCategories::UserId,
                    ExpenseCategories::Name,
                    ExpenseCategories::Icon,
                    ExpenseCategories::DisplayOrder,
                    ExpenseCategories::IsDefault,
                    ExpenseCategories::IsGlobal,
                    ExpenseCategories::IsActive,
                    ExpenseCategories::CreatedAt,
                    ExpenseCategories::UpdatedAt,
                ])
                .values_panic([
                    Uuid::new_v4().into(),
                    Option::<String>::None.into(),
                    (*name).into(),
                    (*icon).into(),
                    (order as i32).into(),
                    true.into(),
                    false.into(),
                    true.into(),
                    now.into(),
                    now.into(),
                ])
                .to_owned();
            manager.exec_stmt(insert).await?;
        }

        let insert = Query::insert()
            .into_table(Recipients::Table)
            .columns([
                Recipients::Id,
                Recipients::UserId,
                Recipients::Name,
                Recipients::DisplayOrder,
                Recipients::IsFavorite,
                Recipients::IsDefault,
                Recipients::IsGlobal,
                Recipients::IsActive,
                Recipients::CreatedAt,
                Recipients::UpdatedAt,
            ])
            .values_panic([
                Uuid::new_v4().into(),
                Option::<String>::None.into(),
                "Other".into(),
                0.into(),
                false.into(),
                true.into(),
                false.into(),
                true.into(),
                now.into(),
                now.into(),
            ])
            .to_owned();
        manager.exec_stmt(insert).await?;

        let insert = Query::insert()
            .into_table(Sources::Table)
            .columns([
                Sources::Id,
                Sources::UserId,
                Sources::Name,
                Sources::DisplayOrder,
                Sources::IsDefault,
                Sources::IsGlobal,
                Sources::IsActive,
                Sources::CreatedAt,
                Sources::UpdatedAt,
            ])
            .values_panic([
                Uuid::new_v4().into(),
                Option::<String>::None.into(),
                "Other".into(),
                0.into(),
                true.into(),
                false.into(),
                true.into(),
                now.into(),
                now.into(),
            ])
            .to_owned();
        manager.exec_stmt(insert).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .exec_stmt(
                Query::delete()
                    .from_table(Sources::Table)
                    .and_where(Expr::col(Sources::IsDefault).eq(true))
                    .to_owned(),
            )
            .await?;
        manager
            .exec_stmt(
                Query::delete()
                    .from_table(Recipients::Table)
                    .and_where(Expr::col(Recipients::IsDefault).eq(true))
                    .to_owned(),
            )
            .await?;
        manager
            .exec_stmt(
                Query::delete()
                    .from_table(ExpenseCategories::Table)
                    .and_where(Expr::col(ExpenseCategories::IsDefault).eq(true))
                    .to_owned(),
            )
            .await?;
        manager
            .exec_stmt(
                Query::delete()
                    .from_table(IncomeCategories::Table)
                    .and_where(Expr::col(IncomeCategories::IsDefault).eq(true))
                    .to_owned(),
            )
            .await?;
        Ok(())
    }
}
