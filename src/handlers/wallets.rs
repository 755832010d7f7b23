use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

use crate::error::AppError;
use crate::services::wallet;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct OperationPayload {
    pub operation_type: String,
    /// Decimal string or JSON number; parsed exactly by the validator.
    pub amount: Value,
}

#[derive(Debug, Deserialize)]
pub struct CreateWalletPayload {
    pub balance: Option<Value>,
}

#[derive(Deserialize)]
pub struct Pagination {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// GET /api/v1/wallets/:wallet_uuid
pub async fn wallet_detail(
    State(state): State<AppState>,
    Path(wallet_uuid): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let wallet = wallet::get_wallet(&state.db, wallet_uuid).await?;

    Ok(Json(wallet))
}

/// POST /api/v1/wallets/:wallet_uuid/operation
pub async fn wallet_operation(
    State(state): State<AppState>,
    Path(wallet_uuid): Path<Uuid>,
    Json(payload): Json<OperationPayload>,
) -> Result<impl IntoResponse, AppError> {
    let wallet = wallet::execute_wallet_operation(
        &state.db,
        wallet_uuid,
        &payload.operation_type,
        &payload.amount,
    )
    .await?;

    Ok(Json(wallet))
}

/// POST /api/v1/wallets
pub async fn create_wallet(
    State(state): State<AppState>,
    Json(payload): Json<CreateWalletPayload>,
) -> Result<impl IntoResponse, AppError> {
    let wallet = wallet::create_wallet(&state.db, payload.balance.as_ref()).await?;

    Ok((StatusCode::CREATED, Json(wallet)))
}

/// GET /api/v1/wallets/:wallet_uuid/operations
pub async fn list_operations(
    State(state): State<AppState>,
    Path(wallet_uuid): Path<Uuid>,
    Query(pagination): Query<Pagination>,
) -> Result<impl IntoResponse, AppError> {
    let limit = pagination.limit.unwrap_or(20);
    let offset = pagination.offset.unwrap_or(0);

    let operations = wallet::list_operations(&state.db, wallet_uuid, limit, offset).await?;

    Ok(Json(operations))
}
