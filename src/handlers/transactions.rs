use crate::handlers::categories::{ensure_user_exists, internal_error};
use crate::schemas::{ApiResponse, AppState, ErrorResponse};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use chrono::{NaiveDate, Utc};
use model::entities::{category, source, transaction};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, warn};
use utoipa::ToSchema;

/// Request body for recording a new expense
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateTransactionRequest {
    /// Category to book the expense against
    pub category_id: i32,
    /// Optional payment source
    pub source_id: Option<i32>,
    /// Amount spent, must be strictly positive
    pub amount: Decimal,
    /// Free-text label for what the money was spent on
    pub spent_on: String,
    /// Calendar day of the expense
    pub date: NaiveDate,
}

/// Request body for updating an expense
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct UpdateTransactionRequest {
    pub category_id: Option<i32>,
    pub source_id: Option<i32>,
    pub amount: Option<Decimal>,
    pub spent_on: Option<String>,
    pub date: Option<NaiveDate>,
}

/// Transaction response model
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TransactionResponse {
    pub id: i32,
    pub user_id: i32,
    pub category_id: i32,
    pub source_id: Option<i32>,
    pub amount: Decimal,
    pub spent_on: String,
    pub date: NaiveDate,
}

impl From<transaction::Model> for TransactionResponse {
    fn from(model: transaction::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            category_id: model.category_id,
            source_id: model.source_id,
            amount: model.amount,
            spent_on: model.spent_on,
            date: model.date,
        }
    }
}

/// Record a new expense for a user
#[utoipa::path(
    post,
    path = "/api/v1/users/{user_id}/transactions",
    tag = "transactions",
    params(
        ("user_id" = i32, Path, description = "Owning user ID")
    ),
    request_body = CreateTransactionRequest,
    responses(
        (status = 201, description = "Transaction created successfully", body = ApiResponse<TransactionResponse>),
        (status = 400, description = "Invalid amount or referenced category/source", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn create_transaction(
    State(state): State<AppState>,
    Path(user_id): Path<i32>,
    Json(request): Json<CreateTransactionRequest>,
) -> Result<(StatusCode, Json<ApiResponse<TransactionResponse>>), (StatusCode, Json<ErrorResponse>)>
{
    debug!("Creating transaction for user {}", user_id);

    ensure_user_exists(&state, user_id).await?;
    validate_amount(request.amount)?;
    validate_category_ref(&state, user_id, request.category_id).await?;
    if let Some(source_id) = request.source_id {
        validate_source_ref(&state, user_id, source_id).await?;
    }

    let new_transaction = transaction::ActiveModel {
        user_id: Set(user_id),
        category_id: Set(request.category_id),
        source_id: Set(request.source_id),
        amount: Set(request.amount),
        spent_on: Set(request.spent_on),
        date: Set(request.date),
        created_at: Set(Utc::now().naive_utc()),
        deleted_at: Set(None),
        ..Default::default()
    };

    match new_transaction.insert(&state.db).await {
        Ok(transaction_model) => {
            info!(
                "Transaction created successfully with ID: {}",
                transaction_model.id
            );
            Ok((
                StatusCode::CREATED,
                Json(ApiResponse {
                    data: TransactionResponse::from(transaction_model),
                    message: "Transaction created successfully".to_string(),
                    success: true,
                }),
            ))
        }
        Err(e) => {
            error!("Failed to create transaction: {}", e);
            Err(internal_error("Failed to create transaction"))
        }
    }
}

/// Get all non-deleted transactions of a user
#[utoipa::path(
    get,
    path = "/api/v1/users/{user_id}/transactions",
    tag = "transactions",
    params(
        ("user_id" = i32, Path, description = "Owning user ID")
    ),
    responses(
        (status = 200, description = "List of the user's transactions", body = ApiResponse<Vec<TransactionResponse>>),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_transactions(
    State(state): State<AppState>,
    Path(user_id): Path<i32>,
) -> Result<Json<ApiResponse<Vec<TransactionResponse>>>, (StatusCode, Json<ErrorResponse>)> {
    debug!("Fetching transactions for user {}", user_id);

    ensure_user_exists(&state, user_id).await?;

    match transaction::Entity::find()
        .filter(transaction::Column::UserId.eq(user_id))
        .filter(transaction::Column::DeletedAt.is_null())
        .order_by_asc(transaction::Column::Id)
        .all(&state.db)
        .await
    {
        Ok(transactions) => {
            info!(
                "Retrieved {} transactions for user {}",
                transactions.len(),
                user_id
            );
            Ok(Json(ApiResponse {
                data: transactions
                    .into_iter()
                    .map(TransactionResponse::from)
                    .collect(),
                message: String::new(),
                success: true,
            }))
        }
        Err(e) => {
            error!("Failed to fetch transactions for user {}: {}", user_id, e);
            Err(internal_error("Failed to fetch transactions"))
        }
    }
}

/// Get a single transaction by ID
#[utoipa::path(
    get,
    path = "/api/v1/users/{user_id}/transactions/{transaction_id}",
    tag = "transactions",
    params(
        ("user_id" = i32, Path, description = "Owning user ID"),
        ("transaction_id" = i32, Path, description = "Transaction ID")
    ),
    responses(
        (status = 200, description = "Transaction found", body = ApiResponse<TransactionResponse>),
        (status = 404, description = "Transaction not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_transaction(
    State(state): State<AppState>,
    Path((user_id, transaction_id)): Path<(i32, i32)>,
) -> Result<Json<ApiResponse<TransactionResponse>>, (StatusCode, Json<ErrorResponse>)> {
    debug!("Fetching transaction {} for user {}", transaction_id, user_id);

    let transaction_model = find_owned_transaction(&state, user_id, transaction_id).await?;
    if transaction_model.is_deleted() {
        return Err(transaction_not_found(transaction_id, user_id));
    }

    Ok(Json(ApiResponse {
        data: TransactionResponse::from(transaction_model),
        message: String::new(),
        success: true,
    }))
}

/// Update a transaction
///
/// A soft-deleted transaction is terminal and rejects further updates with
/// 409. Ownership (`user_id`) is never changed through this endpoint.
#[utoipa::path(
    put,
    path = "/api/v1/users/{user_id}/transactions/{transaction_id}",
    tag = "transactions",
    params(
        ("user_id" = i32, Path, description = "Owning user ID"),
        ("transaction_id" = i32, Path, description = "Transaction ID")
    ),
    request_body = UpdateTransactionRequest,
    responses(
        (status = 200, description = "Transaction updated successfully", body = ApiResponse<TransactionResponse>),
        (status = 400, description = "Invalid amount or referenced category/source", body = ErrorResponse),
        (status = 404, description = "Transaction not found", body = ErrorResponse),
        (status = 409, description = "Transaction has been deleted", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn update_transaction(
    State(state): State<AppState>,
    Path((user_id, transaction_id)): Path<(i32, i32)>,
    Json(request): Json<UpdateTransactionRequest>,
) -> Result<Json<ApiResponse<TransactionResponse>>, (StatusCode, Json<ErrorResponse>)> {
    debug!("Updating transaction {} for user {}", transaction_id, user_id);

    let existing = find_owned_transaction(&state, user_id, transaction_id).await?;
    if existing.is_deleted() {
        warn!(
            "Rejecting update of deleted transaction {} for user {}",
            transaction_id, user_id
        );
        return Err((
            StatusCode::CONFLICT,
            Json(ErrorResponse {
                error: format!("Transaction with ID {} has been deleted", transaction_id),
                code: "TRANSACTION_DELETED".to_string(),
                success: false,
            }),
        ));
    }

    if let Some(amount) = request.amount {
        validate_amount(amount)?;
    }
    if let Some(category_id) = request.category_id {
        validate_category_ref(&state, user_id, category_id).await?;
    }
    if let Some(source_id) = request.source_id {
        validate_source_ref(&state, user_id, source_id).await?;
    }

    let mut active: transaction::ActiveModel = existing.into();
    if let Some(category_id) = request.category_id {
        active.category_id = Set(category_id);
    }
    if let Some(source_id) = request.source_id {
        active.source_id = Set(Some(source_id));
    }
    if let Some(amount) = request.amount {
        active.amount = Set(amount);
    }
    if let Some(spent_on) = request.spent_on {
        active.spent_on = Set(spent_on);
    }
    if let Some(date) = request.date {
        active.date = Set(date);
    }

    match active.update(&state.db).await {
        Ok(updated) => {
            info!("Transaction {} updated successfully", transaction_id);
            Ok(Json(ApiResponse {
                data: TransactionResponse::from(updated),
                message: "Transaction updated successfully".to_string(),
                success: true,
            }))
        }
        Err(e) => {
            error!("Failed to update transaction {}: {}", transaction_id, e);
            Err(internal_error("Failed to update transaction"))
        }
    }
}

/// Soft-delete a transaction
#[utoipa::path(
    delete,
    path = "/api/v1/users/{user_id}/transactions/{transaction_id}",
    tag = "transactions",
    params(
        ("user_id" = i32, Path, description = "Owning user ID"),
        ("transaction_id" = i32, Path, description = "Transaction ID")
    ),
    responses(
        (status = 204, description = "Transaction deleted successfully"),
        (status = 404, description = "Transaction not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_transaction(
    State(state): State<AppState>,
    Path((user_id, transaction_id)): Path<(i32, i32)>,
) -> Result<StatusCode, (StatusCode, Json<ErrorResponse>)> {
    debug!(
        "Soft-deleting transaction {} for user {}",
        transaction_id, user_id
    );

    let existing = find_owned_transaction(&state, user_id, transaction_id).await?;
    if existing.is_deleted() {
        // Deleting twice is a no-op.
        return Ok(StatusCode::NO_CONTENT);
    }

    let mut active: transaction::ActiveModel = existing.into();
    active.deleted_at = Set(Some(Utc::now().naive_utc()));

    match active.update(&state.db).await {
        Ok(_) => {
            info!("Transaction {} soft-deleted successfully", transaction_id);
            Ok(StatusCode::NO_CONTENT)
        }
        Err(e) => {
            error!("Failed to delete transaction {}: {}", transaction_id, e);
            Err(internal_error("Failed to delete transaction"))
        }
    }
}

/// Fetch an owned transaction regardless of its deletion state, or 404.
/// Callers decide how a deleted row maps to a status code: reads hide it,
/// updates reject it with 409.
async fn find_owned_transaction(
    state: &AppState,
    user_id: i32,
    transaction_id: i32,
) -> Result<transaction::Model, (StatusCode, Json<ErrorResponse>)> {
    match transaction::Entity::find_by_id(transaction_id)
        .filter(transaction::Column::UserId.eq(user_id))
        .one(&state.db)
        .await
    {
        Ok(Some(transaction_model)) => Ok(transaction_model),
        Ok(None) => Err(transaction_not_found(transaction_id, user_id)),
        Err(e) => {
            error!("Failed to fetch transaction {}: {}", transaction_id, e);
            Err(internal_error("Failed to fetch transaction"))
        }
    }
}

fn transaction_not_found(transaction_id: i32, user_id: i32) -> (StatusCode, Json<ErrorResponse>) {
    warn!(
        "Transaction {} not found for user {}",
        transaction_id, user_id
    );
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: format!("Transaction with ID {} not found", transaction_id),
            code: "NOT_FOUND".to_string(),
            success: false,
        }),
    )
}

fn validate_amount(amount: Decimal) -> Result<(), (StatusCode, Json<ErrorResponse>)> {
    if amount <= Decimal::ZERO {
        warn!("Rejecting non-positive amount {}", amount);
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "Transaction amount must be strictly positive".to_string(),
                code: "INVALID_AMOUNT".to_string(),
                success: false,
            }),
        ));
    }
    Ok(())
}

/// The referenced category must exist, belong to the same user, and not be
/// soft-deleted.
async fn validate_category_ref(
    state: &AppState,
    user_id: i32,
    category_id: i32,
) -> Result<(), (StatusCode, Json<ErrorResponse>)> {
    match category::Entity::find_by_id(category_id)
        .filter(category::Column::UserId.eq(user_id))
        .filter(category::Column::DeletedAt.is_null())
        .one(&state.db)
        .await
    {
        Ok(Some(_)) => Ok(()),
        Ok(None) => {
            warn!(
                "Category {} is not a valid target for user {}",
                category_id, user_id
            );
            Err((
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: format!("Category with ID {} is not available", category_id),
                    code: "INVALID_CATEGORY".to_string(),
                    success: false,
                }),
            ))
        }
        Err(e) => {
            error!("Failed to validate category {}: {}", category_id, e);
            Err(internal_error("Failed to validate category"))
        }
    }
}

async fn validate_source_ref(
    state: &AppState,
    user_id: i32,
    source_id: i32,
) -> Result<(), (StatusCode, Json<ErrorResponse>)> {
    match source::Entity::find_by_id(source_id)
        .filter(source::Column::UserId.eq(user_id))
        .filter(source::Column::DeletedAt.is_null())
        .one(&state.db)
        .await
    {
        Ok(Some(_)) => Ok(()),
        Ok(None) => {
            warn!(
                "Source {} is not a valid target for user {}",
                source_id, user_id
            );
            Err((
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: format!("Source with ID {} is not available", source_id),
                    code: "INVALID_SOURCE".to_string(),
                    success: false,
                }),
            ))
        }
        Err(e) => {
            error!("Failed to validate source {}: {}", source_id, e);
            Err(internal_error("Failed to validate source"))
        }
    }
}
