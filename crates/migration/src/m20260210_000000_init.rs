//! Initial schema migration - creates all tables from scratch.
//!
//! It creates the complete schema for Hisab:
//!
//! - `users`: authentication
//! - `sessions`: bearer tokens for the HTTP API
//! - `income_categories` / `expense_categories`: classification buckets
//! - `recipients`: expense counterparties
//! - `sources`: income counterparties
//! - `expenses` / `income`: the two transaction tables

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// ─────────────────────────────────────────────────────────────────────────────
// Table identifiers
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Iden)]
enum Users {
    Table,
    Id,
    Username,
    Password,
    CreatedAt,
}

#[derive(Iden)]
enum Sessions {
    Table,
    Token,
    UserId,
    CreatedAt,
    ExpiresAt,
    IsActive,
}

#[derive(Iden)]
enum IncomeCategories {
    Table,
    Id,
    UserId,
    Name,
    Description,
    Icon,
    Color,
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
    Description,
    Icon,
    Color,
    DisplayOrder,
    MonthlyBudgetLimitMinor,
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
    Description,
    Icon,
    Color,
    DisplayOrder,
    PaymentIdentifier,
    Contact,
    IsFavorite,
    DefaultCategoryId,
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
    Description,
    Icon,
    Color,
    DisplayOrder,
    SourceIdentifier,
    Contact,
    SourceType,
    DefaultCategoryId,
    IsDefault,
    IsGlobal,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Expenses {
    Table,
    Id,
    UserId,
    Date,
    Time,
    AmountMinor,
    Currency,
    CategoryId,
    RecipientId,
    PaymentMethod,
    TransactionReference,
    Notes,
    Tags,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Income {
    Table,
    Id,
    UserId,
    Date,
    Time,
    AmountMinor,
    Currency,
    CategoryId,
    SourceId,
    PaymentMethod,
    TransactionReference,
    Notes,
    Tags,
    CreatedAt,
    UpdatedAt,
}

// ─────────────────────────────────────────────────────────────────────────────
// Migration implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ───────────────────────────────────────────────────────────────────
        // 1. Users
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Users::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Users::Username).string().not_null())
                    .col(ColumnDef::new(Users::Password).string().not_null())
                    .col(ColumnDef::new(Users::CreatedAt).timestamp().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-users-username-unique")
                    .table(Users::Table)
                    .col(Users::Username)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 2. Sessions
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Sessions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Sessions::Token)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Sessions::UserId).string().not_null())
                    .col(ColumnDef::new(Sessions::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(Sessions::ExpiresAt).timestamp().not_null())
                    .col(ColumnDef::new(Sessions::IsActive).boolean().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-sessions-user_id")
                            .from(Sessions::Table, Sessions::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-sessions-user_id")
                    .table(Sessions::Table)
                    .col(Sessions::UserId)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 3. Income categories
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(IncomeCategories::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(IncomeCategories::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(IncomeCategories::UserId).string())
                    .col(ColumnDef::new(IncomeCategories::Name).string().not_null())
                    .col(ColumnDef::new(IncomeCategories::Description).string())
                    .col(ColumnDef::new(IncomeCategories::Icon).string())
                    .col(ColumnDef::new(IncomeCategories::Color).string())
                    .col(
                        ColumnDef::new(IncomeCategories::DisplayOrder)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(IncomeCategories::IsDefault)
                            .boolean()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(IncomeCategories::IsGlobal)
                            .boolean()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(IncomeCategories::IsActive)
                            .boolean()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(IncomeCategories::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(IncomeCategories::UpdatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-income_categories-user_id")
                    .table(IncomeCategories::Table)
                    .col(IncomeCategories::UserId)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 4. Expense categories
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(ExpenseCategories::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ExpenseCategories::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ExpenseCategories::UserId).string())
                    .col(ColumnDef::new(ExpenseCategories::Name).string().not_null())
                    .col(ColumnDef::new(ExpenseCategories::Description).string())
                    .col(ColumnDef::new(ExpenseCategories::Icon).string())
                    .col(ColumnDef::new(ExpenseCategories::Color).string())
                    .col(
                        ColumnDef::new(ExpenseCategories::DisplayOrder)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(ExpenseCategories::MonthlyBudgetLimitMinor).big_integer(),
                    )
                    .col(
                        ColumnDef::new(ExpenseCategories::IsDefault)
                            .boolean()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ExpenseCategories::IsGlobal)
                            .boolean()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ExpenseCategories::IsActive)
                            .boolean()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ExpenseCategories::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ExpenseCategories::UpdatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-expense_categories-user_id")
                    .table(ExpenseCategories::Table)
                    .col(ExpenseCategories::UserId)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 5. Recipients
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Recipients::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Recipients::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Recipients::UserId).string())
                    .col(ColumnDef::new(Recipients::Name).string().not_null())
                    .col(ColumnDef::new(Recipients::Description).string())
                    .col(ColumnDef::new(Recipients::Icon).string())
                    .col(ColumnDef::new(Recipients::Color).string())
                    .col(
                        ColumnDef::new(Recipients::DisplayOrder)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Recipients::PaymentIdentifier).string())
                    .col(ColumnDef::new(Recipients::Contact).string())
                    .col(ColumnDef::new(Recipients::IsFavorite).boolean().not_null())
                    .col(ColumnDef::new(Recipients::DefaultCategoryId).uuid())
                    .col(ColumnDef::new(Recipients::IsDefault).boolean().not_null())
                    .col(ColumnDef::new(Recipients::IsGlobal).boolean().not_null())
                    .col(ColumnDef::new(Recipients::IsActive).boolean().not_null())
                    .col(ColumnDef::new(Recipients::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(Recipients::UpdatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-recipients-default_category_id")
                            .from(Recipients::Table, Recipients::DefaultCategoryId)
                            .to(ExpenseCategories::Table, ExpenseCategories::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-recipients-user_id")
                    .table(Recipients::Table)
                    .col(Recipients::UserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-recipients-payment_identifier")
                    .table(Recipients::Table)
                    .col(Recipients::PaymentIdentifier)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 6. Sources
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Sources::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Sources::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Sources::UserId).string())
                    .col(ColumnDef::new(Sources::Name).string().not_null())
                    .col(ColumnDef::new(Sources::Description).string())
                    .col(ColumnDef::new(Sources::Icon).string())
                    .col(ColumnDef::new(Sources::Color).string())
                    .col(
                        ColumnDef::new(Sources::DisplayOrder)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Sources::SourceIdentifier).string())
                    .col(ColumnDef::new(Sources::Contact).string())
                    .col(ColumnDef::new(Sources::SourceType).string())
                    .col(ColumnDef::new(Sources::DefaultCategoryId).uuid())
                    .col(ColumnDef::new(Sources::IsDefault).boolean().not_null())
                    .col(ColumnDef::new(Sources::IsGlobal).boolean().not_null())
                    .col(ColumnDef::new(Sources::IsActive).boolean().not_null())
                    .col(ColumnDef::new(Sources::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(Sources::UpdatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-sources-default_category_id")
                            .from(Sources::Table, Sources::DefaultCategoryId)
                            .to(IncomeCategories::Table, IncomeCategories::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-sources-user_id")
                    .table(Sources::Table)
                    .col(Sources::UserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-sources-source_identifier")
                    .table(Sources::Table)
                    .col(Sources::SourceIdentifier)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 7. Expenses
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Expenses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Expenses::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Expenses::UserId).string().not_null())
                    .col(ColumnDef::new(Expenses::Date).date().not_null())
                    .col(ColumnDef::new(Expenses::Time).time().not_null())
                    .col(ColumnDef::new(Expenses::AmountMinor).big_integer().not_null())
                    .col(ColumnDef::new(Expenses::Currency).string().not_null())
                    .col(ColumnDef::new(Expenses::CategoryId).uuid())
                    .col(ColumnDef::new(Expenses::RecipientId).uuid())
                    .col(ColumnDef::new(Expenses::PaymentMethod).string().not_null())
                    .col(ColumnDef::new(Expenses::TransactionReference).string())
                    .col(ColumnDef::new(Expenses::Notes).string())
                    .col(
                        ColumnDef::new(Expenses::Tags)
                            .string()
                            .not_null()
                            .default("[]"),
                    )
                    .col(ColumnDef::new(Expenses::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(Expenses::UpdatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-expenses-category_id")
                            .from(Expenses::Table, Expenses::CategoryId)
                            .to(ExpenseCategories::Table, ExpenseCategories::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-expenses-recipient_id")
                            .from(Expenses::Table, Expenses::RecipientId)
                            .to(Recipients::Table, Recipients::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-expenses-user_id-date")
                    .table(Expenses::Table)
                    .col(Expenses::UserId)
                    .col(Expenses::Date)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 8. Income
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Income::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Income::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Income::UserId).string().not_null())
                    .col(ColumnDef::new(Income::Date).date().not_null())
                    .col(ColumnDef::new(Income::Time).time().not_null())
                    .col(ColumnDef::new(Income::AmountMinor).big_integer().not_null())
                    .col(ColumnDef::new(Income::Currency).string().not_null())
                    .col(ColumnDef::new(Income::CategoryId).uuid())
                    .col(ColumnDef::new(Income::SourceId).uuid())
                    .col(ColumnDef::new(Income::PaymentMethod).string().not_null())
                    .col(ColumnDef::new(Income::TransactionReference).string())
                    .col(ColumnDef::new(Income::Notes).string())
                    .col(
                        ColumnDef::new(Income::Tags)
                            .string()
                            .not_null()
                            .default("[]"),
                    )
                    .col(ColumnDef::new(Income::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(Income::UpdatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-income-category_id")
                            .from(Income::Table, Income::CategoryId)
                            .to(IncomeCategories::Table, IncomeCategories::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-income-source_id")
                            .from(Income::Table, Income::SourceId)
                            .to(Sources::Table, Sources::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-income-user_id-date")
                    .table(Income::Table)
                    .col(Income::UserId)
                    .col(Income::Date)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop in reverse order of creation (respecting FK dependencies)
        manager
            .drop_table(Table::drop().table(Income::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Expenses::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Sources::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Recipients::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ExpenseCategories::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(IncomeCategories::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Sessions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}
