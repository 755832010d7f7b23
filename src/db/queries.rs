use sqlx::{PgPool, Postgres, Result, Transaction as SqlxTransaction};
use uuid::Uuid;

use crate::db::models::{Wallet, WalletOperation};

// --- Wallet queries (the account store) ---

pub async fn insert_wallet(pool: &PgPool, wallet: &Wallet) -> Result<Wallet> {
    sqlx::query_as::<_, Wallet>(
        r#"
        INSERT INTO wallets (id, balance, created_at, updated_at)
        VALUES ($1, $2, $3, $4)
        RETURNING *
        "#,
    )
    .bind(wallet.id)
    .bind(&wallet.balance)
    .bind(wallet.created_at)
    .bind(wallet.updated_at)
    .fetch_one(pool)
    .await
}

pub async fn get_wallet(pool: &PgPool, id: Uuid) -> Result<Option<Wallet>> {
    sqlx::query_as::<_, Wallet>("SELECT * FROM wallets WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Acquires the row lock on one wallet for the rest of the enclosing
/// transaction. Blocks until a concurrent holder commits or rolls back,
/// which is the serialization point that prevents lost updates. Returns
/// `None` when the wallet does not exist.
pub async fn lock_wallet_for_update(
    executor: &mut SqlxTransaction<'_, Postgres>,
    id: Uuid,
) -> Result<Option<Wallet>> {
    sqlx::query_as::<_, Wallet>("SELECT * FROM wallets WHERE id = $1 FOR UPDATE")
        .bind(id)
        .fetch_optional(&mut **executor)
        .await
}

/// Persists a new balance. Only called while the caller holds the lock
/// from `lock_wallet_for_update` within the same transaction.
pub async fn save_wallet(
    executor: &mut SqlxTransaction<'_, Postgres>,
    wallet: &Wallet,
) -> Result<()> {
    sqlx::query("UPDATE wallets SET balance = $1, updated_at = $2 WHERE id = $3")
        .bind(&wallet.balance)
        .bind(wallet.updated_at)
        .bind(wallet.id)
        .execute(&mut **executor)
        .await?;

    Ok(())
}

// --- Operation queries (the append-only ledger) ---

/// Appends one ledger entry in the same transaction as the balance
/// update, so both commit or both roll back. `seq` comes back from the
/// database sequence.
pub async fn insert_operation(
    executor: &mut SqlxTransaction<'_, Postgres>,
    op: &WalletOperation,
) -> Result<WalletOperation> {
    sqlx::query_as::<_, WalletOperation>(
        r#"
        INSERT INTO wallet_operations (
            id, wallet_id, operation_type, amount, resulting_balance, created_at
        ) VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
        "#,
    )
    .bind(op.id)
    .bind(op.wallet_id)
    .bind(&op.operation_type)
    .bind(&op.amount)
    .bind(&op.resulting_balance)
    .bind(op.created_at)
    .fetch_one(&mut **executor)
    .await
}

/// Paginated history for audit display, newest first.
pub async fn list_operations(
    pool: &PgPool,
    wallet_id: Uuid,
    limit: i64,
    offset: i64,
) -> Result<Vec<WalletOperation>> {
    sqlx::query_as::<_, WalletOperation>(
        r#"
        SELECT * FROM wallet_operations
        WHERE wallet_id = $1
        ORDER BY created_at DESC, seq DESC
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(wallet_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await
}

/// Full history in application order. `seq` is assigned while the row
/// lock is held, so it is exactly the order in which operations were
/// applied; folding these over the wallet's seed balance reproduces
/// every `resulting_balance` and the current balance exactly.
pub async fn list_operations_for_replay(
    pool: &PgPool,
    wallet_id: Uuid,
) -> Result<Vec<WalletOperation>> {
    sqlx::query_as::<_, WalletOperation>(
        r#"
        SELECT * FROM wallet_operations
        WHERE wallet_id = $1
        ORDER BY seq ASC
        "#,
    )
    .bind(wallet_id)
    .fetch_all(pool)
    .await
}

pub async fn count_operations(pool: &PgPool, wallet_id: Uuid) -> Result<i64> {
    let (count,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM wallet_operations WHERE wallet_id = $1")
            .bind(wallet_id)
            .fetch_one(pool)
            .await?;

    Ok(count)
}
