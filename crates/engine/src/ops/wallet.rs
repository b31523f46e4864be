use chrono::Utc;
use sea_orm::{
    DatabaseTransaction, QueryFilter, QueryOrder, TransactionTrait, prelude::*,
    sea_query::{Expr, OnConflict},
};

use crate::{
    EngineError, MoneyCents, ResultEngine, Wallet, WalletTransaction, WalletTransactionKind,
    util::ensure_positive, wallet_transactions, wallets,
};

use super::{Engine, with_tx};

impl Engine {
    /// Return the wallet of `owner_id`, creating an empty one on first access.
    pub async fn wallet(&self, owner_id: &str) -> ResultEngine<Wallet> {
        with_tx!(self, |db_tx| self.ensure_wallet(&db_tx, owner_id).await)
    }

    /// Add cash to the wallet and record a `deposit` transaction.
    pub async fn deposit(&self, owner_id: &str, amount_minor: i64) -> ResultEngine<Wallet> {
        ensure_positive(amount_minor, "deposit")?;
        with_tx!(self, |db_tx| {
            self.credit_wallet(
                &db_tx,
                owner_id,
                amount_minor,
                WalletTransactionKind::Deposit,
                None,
                None,
            )
            .await
        })
    }

    /// Take cash out of the wallet and record a `withdraw` transaction.
    ///
    /// The balance is decremented with a conditional update, so two racing
    /// withdrawals can never drive it below zero.
    pub async fn withdraw(&self, owner_id: &str, amount_minor: i64) -> ResultEngine<Wallet> {
        ensure_positive(amount_minor, "withdraw")?;
        with_tx!(self, |db_tx| {
            let updated = wallets::Entity::update_many()
                .col_expr(
                    wallets::Column::BalanceMinor,
                    Expr::col(wallets::Column::BalanceMinor).sub(amount_minor),
                )
                .col_expr(wallets::Column::UpdatedAt, Expr::value(Utc::now()))
                .filter(wallets::Column::OwnerId.eq(owner_id))
                .filter(wallets::Column::BalanceMinor.gte(amount_minor))
                .exec(&db_tx)
                .await?;

            if updated.rows_affected == 0 {
                let wallet = self.find_wallet(&db_tx, owner_id).await?.ok_or_else(|| {
                    EngineError::KeyNotFound("wallet not exists".to_string())
                })?;
                return Err(EngineError::InsufficientFunds(format!(
                    "wallet balance is {}, requested {}",
                    MoneyCents::new(wallet.balance_minor),
                    MoneyCents::new(amount_minor)
                )));
            }

            let tx = WalletTransaction::new(
                owner_id,
                WalletTransactionKind::Withdraw,
                amount_minor,
                None,
                None,
            )?;
            wallet_transactions::ActiveModel::from(&tx)
                .insert(&db_tx)
                .await?;

            self.find_wallet(&db_tx, owner_id)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("wallet not exists".to_string()))
        })
    }

    /// Wallet ledger of `owner_id`, newest first.
    pub async fn wallet_transactions(&self, owner_id: &str) -> ResultEngine<Vec<WalletTransaction>> {
        let models = wallet_transactions::Entity::find()
            .filter(wallet_transactions::Column::OwnerId.eq(owner_id))
            .order_by_desc(wallet_transactions::Column::CreatedAt)
            .order_by_desc(wallet_transactions::Column::Id)
            .all(&self.database)
            .await?;
        models.into_iter().map(WalletTransaction::try_from).collect()
    }

    pub(super) async fn find_wallet(
        &self,
        db: &DatabaseTransaction,
        owner_id: &str,
    ) -> ResultEngine<Option<Wallet>> {
        Ok(wallets::Entity::find_by_id(owner_id.to_string())
            .one(db)
            .await?
            .map(Wallet::from))
    }

    /// Insert an empty wallet unless one already exists, then return it.
    pub(super) async fn ensure_wallet(
        &self,
        db: &DatabaseTransaction,
        owner_id: &str,
    ) -> ResultEngine<Wallet> {
        let model: wallets::ActiveModel = (&Wallet::empty(owner_id)).into();
        wallets::Entity::insert(model)
            .on_conflict(
                OnConflict::column(wallets::Column::OwnerId)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(db)
            .await?;

        self.find_wallet(db, owner_id)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("wallet not exists".to_string()))
    }

    /// Atomically add `amount_minor` to the wallet and append a ledger row.
    ///
    /// A zero amount still creates the wallet but writes no ledger row. A
    /// credit that would overflow the balance is rejected with
    /// [`EngineError::InvalidAmount`].
    pub(super) async fn credit_wallet(
        &self,
        db: &DatabaseTransaction,
        owner_id: &str,
        amount_minor: i64,
        kind: WalletTransactionKind,
        description: Option<String>,
        payment_id: Option<String>,
    ) -> ResultEngine<Wallet> {
        debug_assert!(kind.is_credit());
        self.ensure_wallet(db, owner_id).await?;

        if amount_minor == 0 {
            return self
                .find_wallet(db, owner_id)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("wallet not exists".to_string()));
        }

        let updated = wallets::Entity::update_many()
            .col_expr(
                wallets::Column::BalanceMinor,
                Expr::col(wallets::Column::BalanceMinor).add(amount_minor),
            )
            .col_expr(wallets::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(wallets::Column::OwnerId.eq(owner_id))
            .filter(wallets::Column::BalanceMinor.lte(i64::MAX - amount_minor))
            .exec(db)
            .await?;
        if updated.rows_affected == 0 {
            return Err(EngineError::InvalidAmount(format!(
                "crediting {} would overflow the wallet balance",
                MoneyCents::new(amount_minor)
            )));
        }

        let tx = WalletTransaction::new(owner_id, kind, amount_minor, description, payment_id)?;
        wallet_transactions::ActiveModel::from(&tx).insert(db).await?;

        let wallet = self
            .find_wallet(db, owner_id)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("wallet not exists".to_string()))?;
        tracing::debug!(
            owner_id,
            kind = kind.as_str(),
            amount = %MoneyCents::new(amount_minor),
            balance = %MoneyCents::new(wallet.balance_minor),
            "wallet credited"
        );
        Ok(wallet)
    }
}
