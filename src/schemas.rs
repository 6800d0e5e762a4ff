use common::{CategorySummary, MonthWindow, MonthlyReport, SortKey, TransactionSummary};
use moka::future::Cache;
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, OpenApi, ToSchema};

/// Application state shared across handlers
#[derive(Clone, Debug)]
pub struct AppState {
    /// Database connection
    pub db: DatabaseConnection,
    /// Cache for computed monthly reports
    pub cache: Cache<String, CachedData>,
}

/// Cached data types
#[derive(Clone, Debug)]
pub enum CachedData {
    Report(MonthlyReport),
}

/// Query parameters for the monthly report endpoint
#[derive(Debug, Deserialize, IntoParams)]
pub struct MonthlyReportQuery {
    /// Reference date selecting the report month (YYYY-MM-DD); defaults to
    /// today
    pub reference_date: Option<String>,
    /// Ordering of the category summaries; defaults to amount_spent
    pub sort_key: Option<SortKey>,
    /// Maximum number of top transactions to return; defaults to 5
    pub limit: Option<usize>,
}

/// API response wrapper
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    /// Response data
    pub data: T,
    /// Response message
    pub message: String,
    /// Success status
    pub success: bool,
}

/// Error response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
    /// Error code
    pub code: String,
    /// Success status (always false for errors)
    pub success: bool,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Service version
    pub version: String,
    /// Database connection status
    pub database: String,
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::health::health_check,
        crate::handlers::users::create_user,
        crate::handlers::users::get_users,
        crate::handlers::users::get_user,
        crate::handlers::users::update_user,
        crate::handlers::users::delete_user,
        crate::handlers::categories::create_category,
        crate::handlers::categories::get_categories,
        crate::handlers::categories::get_category,
        crate::handlers::categories::update_category,
        crate::handlers::categories::delete_category,
        crate::handlers::sources::create_source,
        crate::handlers::sources::get_sources,
        crate::handlers::sources::get_source,
        crate::handlers::sources::update_source,
        crate::handlers::sources::delete_source,
        crate::handlers::transactions::create_transaction,
        crate::handlers::transactions::get_transactions,
        crate::handlers::transactions::get_transaction,
        crate::handlers::transactions::update_transaction,
        crate::handlers::transactions::delete_transaction,
        crate::handlers::reports::get_monthly_report,
    ),
    components(
        schemas(
            ErrorResponse,
            HealthResponse,
            ApiResponse<MonthlyReport>,
            MonthlyReport,
            MonthWindow,
            CategorySummary,
            TransactionSummary,
            SortKey,
            crate::handlers::users::CreateUserRequest,
            crate::handlers::users::UpdateUserRequest,
            crate::handlers::users::UserResponse,
            crate::handlers::categories::CreateCategoryRequest,
            crate::handlers::categories::UpdateCategoryRequest,
            crate::handlers::categories::CategoryResponse,
            crate::handlers::sources::CreateSourceRequest,
            crate::handlers::sources::UpdateSourceRequest,
            crate::handlers::sources::SourceResponse,
            crate::handlers::transactions::CreateTransactionRequest,
            crate::handlers::transactions::UpdateTransactionRequest,
            crate::handlers::transactions::TransactionResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "users", description = "User CRUD endpoints"),
        (name = "categories", description = "Category CRUD endpoints"),
        (name = "sources", description = "Payment source CRUD endpoints"),
        (name = "transactions", description = "Transaction CRUD endpoints"),
        (name = "reports", description = "Monthly spend report endpoints"),
    ),
    info(
        title = "Spendbook API",
        description = "Personal expense tracker API - transactions, categories and monthly spend reports",
        version = "0.1.0",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    )
)]
pub struct ApiDoc;
