//! Initial schema migration.
//!
//! Creates the complete PocketPal schema:
//!
//! - `users` and `api_tokens`: identity
//! - `wallets` and `wallet_transactions`: per-user cash balance and ledger
//! - `goals` and `goal_activity`: savings goals and their audit log
//! - `splits` and `split_people`: shared bills and per-person settlement
//! - `expenses`: the expense book
//! - `payment_orders`: gateway orders awaiting or after confirmation

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// ─────────────────────────────────────────────────────────────────────────────
// Table identifiers
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Iden)]
enum Users {
    Table,
    UserId,
    CreatedAt,
}

#[derive(Iden)]
enum ApiTokens {
    Table,
    TokenHash,
    UserId,
    CreatedAt,
    RevokedAt,
}

#[derive(Iden)]
enum Wallets {
    Table,
    OwnerId,
    BalanceMinor,
    UpdatedAt,
}

#[derive(Iden)]
enum WalletTransactions {
    Table,
    Id,
    OwnerId,
    Kind,
    AmountMinor,
    Description,
    PaymentId,
    CreatedAt,
}

#[derive(Iden)]
enum Goals {
    Table,
    Id,
    OwnerId,
    Title,
    TargetMinor,
    SavedMinor,
    CreatedAt,
}

#[derive(Iden)]
enum GoalActivity {
    Table,
    Id,
    OwnerId,
    GoalId,
    GoalTitle,
    Kind,
    AmountMinor,
    PaymentId,
    OccurredAt,
}

#[derive(Iden)]
enum Splits {
    Table,
    Id,
    OwnerId,
    AmountMinor,
    NumPeople,
    Category,
    Settled,
    CreatedAt,
}

#[derive(Iden)]
enum SplitPeople {
    Table,
    SplitId,
    Position,
    Name,
    AmountMinor,
    Settled,
}

#[derive(Iden)]
enum Expenses {
    Table,
    Id,
    OwnerId,
    AmountMinor,
    Category,
    Note,
    CreatedAt,
}

#[derive(Iden)]
enum PaymentOrders {
    Table,
    OrderId,
    OwnerId,
    AmountMinor,
    Currency,
    Purpose,
    GoalId,
    State,
    PaymentId,
    CreatedAt,
    CreditedAt,
}

// ─────────────────────────────────────────────────────────────────────────────
// Migration implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ───────────────────────────────────────────────────────────────────
        // 1. Users and tokens
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::UserId)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Users::CreatedAt).timestamp().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ApiTokens::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ApiTokens::TokenHash)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ApiTokens::UserId).string().not_null())
                    .col(ColumnDef::new(ApiTokens::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(ApiTokens::RevokedAt).timestamp())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-api_tokens-user_id")
                            .from(ApiTokens::Table, ApiTokens::UserId)
                            .to(Users::Table, Users::UserId)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 2. Wallets
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Wallets::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Wallets::OwnerId)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Wallets::BalanceMinor)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Wallets::UpdatedAt).timestamp().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(WalletTransactions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(WalletTransactions::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(WalletTransactions::OwnerId)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(WalletTransactions::Kind).string().not_null())
                    .col(
                        ColumnDef::new(WalletTransactions::AmountMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(WalletTransactions::Description).string())
                    .col(ColumnDef::new(WalletTransactions::PaymentId).string())
                    .col(
                        ColumnDef::new(WalletTransactions::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-wallet_transactions-owner_id-created_at")
                    .table(WalletTransactions::Table)
                    .col(WalletTransactions::OwnerId)
                    .col(WalletTransactions::CreatedAt)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 3. Goals
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Goals::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Goals::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Goals::OwnerId).string().not_null())
                    .col(ColumnDef::new(Goals::Title).string().not_null())
                    .col(ColumnDef::new(Goals::TargetMinor).big_integer().not_null())
                    .col(
                        ColumnDef::new(Goals::SavedMinor)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Goals::CreatedAt).timestamp().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-goals-owner_id")
                    .table(Goals::Table)
                    .col(Goals::OwnerId)
                    .to_owned(),
            )
            .await?;

        // The audit log outlives the goals it mentions: no foreign key.
        manager
            .create_table(
                Table::create()
                    .table(GoalActivity::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(GoalActivity::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(GoalActivity::OwnerId).string().not_null())
                    .col(ColumnDef::new(GoalActivity::GoalId).string().not_null())
                    .col(ColumnDef::new(GoalActivity::GoalTitle).string().not_null())
                    .col(ColumnDef::new(GoalActivity::Kind).string().not_null())
                    .col(
                        ColumnDef::new(GoalActivity::AmountMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(GoalActivity::PaymentId).string())
                    .col(
                        ColumnDef::new(GoalActivity::OccurredAt)
                            .timestamp()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-goal_activity-owner_id-occurred_at")
                    .table(GoalActivity::Table)
                    .col(GoalActivity::OwnerId)
                    .col(GoalActivity::OccurredAt)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 4. Splits
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Splits::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Splits::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Splits::OwnerId).string().not_null())
                    .col(ColumnDef::new(Splits::AmountMinor).big_integer().not_null())
                    .col(ColumnDef::new(Splits::NumPeople).integer().not_null())
                    .col(ColumnDef::new(Splits::Category).string().not_null())
                    .col(
                        ColumnDef::new(Splits::Settled)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Splits::CreatedAt).timestamp().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-splits-owner_id")
                    .table(Splits::Table)
                    .col(Splits::OwnerId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(SplitPeople::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(SplitPeople::SplitId).string().not_null())
                    .col(ColumnDef::new(SplitPeople::Position).integer().not_null())
                    .col(ColumnDef::new(SplitPeople::Name).string().not_null())
                    .col(
                        ColumnDef::new(SplitPeople::AmountMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SplitPeople::Settled)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .primary_key(
                        Index::create()
                            .col(SplitPeople::SplitId)
                            .col(SplitPeople::Position),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-split_people-split_id")
                            .from(SplitPeople::Table, SplitPeople::SplitId)
                            .to(Splits::Table, Splits::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 5. Expenses
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Expenses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Expenses::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Expenses::OwnerId).string().not_null())
                    .col(
                        ColumnDef::new(Expenses::AmountMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Expenses::Category).string().not_null())
                    .col(ColumnDef::new(Expenses::Note).string())
                    .col(ColumnDef::new(Expenses::CreatedAt).timestamp().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-expenses-owner_id-created_at")
                    .table(Expenses::Table)
                    .col(Expenses::OwnerId)
                    .col(Expenses::CreatedAt)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 6. Payment orders
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(PaymentOrders::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PaymentOrders::OrderId)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PaymentOrders::OwnerId).string().not_null())
                    .col(
                        ColumnDef::new(PaymentOrders::AmountMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PaymentOrders::Currency)
                            .string()
                            .not_null()
                            .default("INR"),
                    )
                    .col(ColumnDef::new(PaymentOrders::Purpose).string().not_null())
                    .col(ColumnDef::new(PaymentOrders::GoalId).string())
                    .col(ColumnDef::new(PaymentOrders::State).string().not_null())
                    .col(ColumnDef::new(PaymentOrders::PaymentId).string())
                    .col(
                        ColumnDef::new(PaymentOrders::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .col(ColumnDef::new(PaymentOrders::CreditedAt).timestamp())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-payment_orders-owner_id")
                    .table(PaymentOrders::Table)
                    .col(PaymentOrders::OwnerId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PaymentOrders::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Expenses::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(SplitPeople::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Splits::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(GoalActivity::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Goals::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(WalletTransactions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Wallets::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ApiTokens::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}
