//! Wallet balance mutation service.
//!
//! `execute_wallet_operation` is the only code path that mutates a
//! balance. It runs a locked read-modify-append-commit cycle: validate
//! the operation shape, lock the wallet row, compute the new balance,
//! persist it and append the ledger entry in one transaction. Operations
//! against different wallets proceed in parallel; only operations against
//! the same wallet serialize on the row lock.

use bigdecimal::BigDecimal;
use chrono::Utc;
use serde_json::Value;
use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

use crate::db::models::{Wallet, WalletOperation};
use crate::db::queries;
use crate::domain::OperationKind;
use crate::validation::{self, ValidationError, DECIMAL_PLACES};

#[derive(Error, Debug)]
pub enum WalletError {
    #[error("wallet {0} not found")]
    NotFound(Uuid),

    #[error("current balance: {current}, required: {required}")]
    InsufficientBalance {
        current: BigDecimal,
        required: BigDecimal,
    },

    #[error("invalid operation: {0}")]
    InvalidOperation(#[from] ValidationError),

    /// Lock-wait timeout, connection loss, commit failure. The whole
    /// transaction rolled back, so retrying the call is safe.
    #[error("storage error: {0}")]
    Storage(#[from] sqlx::Error),
}

/// Applies one DEPOSIT or WITHDRAW to a wallet inside a single atomic
/// transaction. Returns the updated wallet snapshot; on any error the
/// wallet and its ledger are left untouched.
pub async fn execute_wallet_operation(
    pool: &PgPool,
    wallet_id: Uuid,
    operation_type: &str,
    amount: &Value,
) -> Result<Wallet, WalletError> {
    // Reject malformed requests before any I/O.
    let (kind, amount) = validation::validate_operation(operation_type, amount)?;

    let mut tx = pool.begin().await?;

    // Blocks until any concurrent holder of this wallet's lock commits
    // or rolls back, so the read below observes the latest committed
    // balance.
    let Some(wallet) = queries::lock_wallet_for_update(&mut tx, wallet_id).await? else {
        tracing::warn!(
            wallet_uuid = %wallet_id,
            operation_type = %kind,
            amount = %amount,
            "wallet not found"
        );
        return Err(WalletError::NotFound(wallet_id));
    };

    let old_balance = wallet.balance.clone();
    let new_balance = match kind {
        OperationKind::Deposit => &old_balance + &amount,
        OperationKind::Withdraw => {
            if old_balance < amount {
                tracing::warn!(
                    wallet_uuid = %wallet_id,
                    operation_type = %kind,
                    amount = %amount,
                    current_balance = %old_balance,
                    "insufficient balance for withdrawal"
                );
                // Dropping `tx` rolls the transaction back; no ledger
                // entry is written.
                return Err(WalletError::InsufficientBalance {
                    current: old_balance,
                    required: amount,
                });
            }
            &old_balance - &amount
        }
    };
    let new_balance = new_balance.with_scale(DECIMAL_PLACES);

    let updated = Wallet {
        balance: new_balance.clone(),
        updated_at: Utc::now(),
        ..wallet
    };
    queries::save_wallet(&mut tx, &updated).await?;

    let op = WalletOperation::new(wallet_id, kind, amount.clone(), new_balance.clone());
    queries::insert_operation(&mut tx, &op).await?;

    tx.commit().await?;

    tracing::info!(
        wallet_uuid = %wallet_id,
        operation_type = %kind,
        amount = %amount,
        old_balance = %old_balance,
        new_balance = %new_balance,
        "wallet operation completed"
    );

    Ok(updated)
}

/// Read-only wallet snapshot; no lock beyond a consistent read.
pub async fn get_wallet(pool: &PgPool, wallet_id: Uuid) -> Result<Wallet, WalletError> {
    queries::get_wallet(pool, wallet_id)
        .await?
        .ok_or(WalletError::NotFound(wallet_id))
}

/// Administrative creation path. The seed balance must be non-negative
/// and at ledger precision; it defaults to zero.
pub async fn create_wallet(
    pool: &PgPool,
    seed_balance: Option<&Value>,
) -> Result<Wallet, WalletError> {
    let balance = match seed_balance {
        Some(value) => {
            let balance = validation::parse_amount(value)?;
            if balance < BigDecimal::from(0) {
                return Err(ValidationError::new("balance", "cannot be negative").into());
            }
            let (_, scale) = balance.normalized().as_bigint_and_exponent();
            if scale > DECIMAL_PLACES {
                return Err(ValidationError::new(
                    "balance",
                    format!("must have at most {} decimal places", DECIMAL_PLACES),
                )
                .into());
            }
            balance.with_scale(DECIMAL_PLACES)
        }
        None => BigDecimal::from(0).with_scale(DECIMAL_PLACES),
    };

    let wallet = queries::insert_wallet(pool, &Wallet::new(balance)).await?;
    tracing::info!(wallet_uuid = %wallet.id, balance = %wallet.balance, "wallet created");

    Ok(wallet)
}

/// Paginated operation history for an existing wallet, newest first.
pub async fn list_operations(
    pool: &PgPool,
    wallet_id: Uuid,
    limit: i64,
    offset: i64,
) -> Result<Vec<WalletOperation>, WalletError> {
    // 404 on unknown wallets instead of an empty page.
    get_wallet(pool, wallet_id).await?;

    Ok(queries::list_operations(pool, wallet_id, limit, offset).await?)
}
