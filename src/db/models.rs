use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::domain::OperationKind;

/// A wallet row. `balance` is exact NUMERIC(20, 2) and is only ever
/// mutated by the wallet service while the row lock is held.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Wallet {
    pub id: Uuid,
    pub balance: BigDecimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Wallet {
    pub fn new(balance: BigDecimal) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            balance,
            created_at: now,
            updated_at: now,
        }
    }
}

/// One immutable audit-trail entry. Never updated or deleted after
/// insertion, except by cascade when the owning wallet is deleted.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct WalletOperation {
    pub id: Uuid,
    pub wallet_id: Uuid,
    pub operation_type: String,
    pub amount: BigDecimal,
    /// Wallet balance immediately after this operation was applied, so
    /// audits can be reconstructed without replaying the whole history.
    pub resulting_balance: BigDecimal,
    pub seq: i64,
    pub created_at: DateTime<Utc>,
}

impl WalletOperation {
    pub fn new(
        wallet_id: Uuid,
        kind: OperationKind,
        amount: BigDecimal,
        resulting_balance: BigDecimal,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            wallet_id,
            operation_type: kind.as_str().to_string(),
            amount,
            resulting_balance,
            // Assigned by the database sequence on insert.
            seq: 0,
            created_at: Utc::now(),
        }
    }
}
