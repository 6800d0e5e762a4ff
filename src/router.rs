use crate::handlers::{
    categories::{
        create_category, delete_category, get_categories, get_category, update_category,
    },
    health::health_check,
    reports::get_monthly_report,
    sources::{create_source, delete_source, get_source, get_sources, update_source},
    transactions::{
        create_transaction, delete_transaction, get_transaction, get_transactions,
        update_transaction,
    },
    users::{create_user, delete_user, get_user, get_users, update_user},
};
use crate::schemas::{ApiDoc, AppState};
use axum::{
    routing::{delete, get, post, put},
    Router,
};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Create application router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health_check))
        // User CRUD routes
        .route("/api/v1/users", post(create_user))
        .route("/api/v1/users", get(get_users))
        .route("/api/v1/users/:user_id", get(get_user))
        .route("/api/v1/users/:user_id", put(update_user))
        .route("/api/v1/users/:user_id", delete(delete_user))
        // Category CRUD routes, nested under the owning user
        .route("/api/v1/users/:user_id/categories", post(create_category))
        .route("/api/v1/users/:user_id/categories", get(get_categories))
        .route(
            "/api/v1/users/:user_id/categories/:category_id",
            get(get_category),
        )
        .route(
            "/api/v1/users/:user_id/categories/:category_id",
            put(update_category),
        )
        .route(
            "/api/v1/users/:user_id/categories/:category_id",
            delete(delete_category),
        )
        // Payment source CRUD routes
        .route("/api/v1/users/:user_id/sources", post(create_source))
        .route("/api/v1/users/:user_id/sources", get(get_sources))
        .route("/api/v1/users/:user_id/sources/:source_id", get(get_source))
        .route(
            "/api/v1/users/:user_id/sources/:source_id",
            put(update_source),
        )
        .route(
            "/api/v1/users/:user_id/sources/:source_id",
            delete(delete_source),
        )
        // Transaction CRUD routes
        .route(
            "/api/v1/users/:user_id/transactions",
            post(create_transaction),
        )
        .route(
            "/api/v1/users/:user_id/transactions",
            get(get_transactions),
        )
        .route(
            "/api/v1/users/:user_id/transactions/:transaction_id",
            get(get_transaction),
        )
        .route(
            "/api/v1/users/:user_id/transactions/:transaction_id",
            put(update_transaction),
        )
        .route(
            "/api/v1/users/:user_id/transactions/:transaction_id",
            delete(delete_transaction),
        )
        // Monthly spend report
        .route(
            "/api/v1/users/:user_id/reports/monthly",
            get(get_monthly_report),
        )
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Add middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(TimeoutLayer::new(Duration::from_secs(30)))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
