use crate::handlers::users::user_not_found;
use crate::schemas::{ApiResponse, AppState, ErrorResponse};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use chrono::Utc;
use model::entities::{category, user};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, warn};
use utoipa::ToSchema;

/// Request body for creating a new category
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateCategoryRequest {
    /// Category name (unique per user among non-deleted categories)
    pub name: String,
    /// Display glyph
    pub icon: String,
    /// Monthly budget target
    pub budget: Decimal,
}

/// Request body for updating an existing category
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct UpdateCategoryRequest {
    /// Category name (unique per user among non-deleted categories)
    pub name: Option<String>,
    /// Display glyph
    pub icon: Option<String>,
    /// Monthly budget target
    pub budget: Option<Decimal>,
}

/// Category response model
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CategoryResponse {
    pub id: i32,
    pub user_id: i32,
    pub name: String,
    pub icon: String,
    pub budget: Decimal,
}

impl From<category::Model> for CategoryResponse {
    fn from(model: category::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            name: model.name,
            icon: model.icon,
            budget: model.budget,
        }
    }
}

/// Create a new category for a user
#[utoipa::path(
    post,
    path = "/api/v1/users/{user_id}/categories",
    tag = "categories",
    params(
        ("user_id" = i32, Path, description = "Owning user ID")
    ),
    request_body = CreateCategoryRequest,
    responses(
        (status = 201, description = "Category created successfully", body = ApiResponse<CategoryResponse>),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 409, description = "Category name already exists for this user", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn create_category(
    State(state): State<AppState>,
    Path(user_id): Path<i32>,
    Json(request): Json<CreateCategoryRequest>,
) -> Result<(StatusCode, Json<ApiResponse<CategoryResponse>>), (StatusCode, Json<ErrorResponse>)> {
    debug!("Creating category '{}' for user {}", request.name, user_id);

    ensure_user_exists(&state, user_id).await?;

    // Name uniqueness is scoped to the user's non-deleted categories.
    match category::Entity::find_active_by_name(&state.db, user_id, &request.name).await {
        Ok(Some(_)) => {
            warn!("Category name '{}' already exists for user {}", request.name, user_id);
            return Err(duplicate_category(&request.name));
        }
        Ok(None) => {}
        Err(e) => {
            error!("Failed to check category name: {}", e);
            return Err(internal_error("Failed to validate category name"));
        }
    }

    let new_category = category::ActiveModel {
        user_id: Set(user_id),
        name: Set(request.name.clone()),
        icon: Set(request.icon),
        budget: Set(request.budget),
        created_at: Set(Utc::now().naive_utc()),
        deleted_at: Set(None),
        ..Default::default()
    };

    match new_category.insert(&state.db).await {
        Ok(category_model) => {
            info!("Category created successfully with ID: {}", category_model.id);
            Ok((
                StatusCode::CREATED,
                Json(ApiResponse {
                    data: CategoryResponse::from(category_model),
                    message: "Category created successfully".to_string(),
                    success: true,
                }),
            ))
        }
        Err(e) => {
            error!("Failed to create category: {}", e);
            Err(internal_error("Failed to create category"))
        }
    }
}

/// Get all non-deleted categories of a user
#[utoipa::path(
    get,
    path = "/api/v1/users/{user_id}/categories",
    tag = "categories",
    params(
        ("user_id" = i32, Path, description = "Owning user ID")
    ),
    responses(
        (status = 200, description = "List of the user's categories", body = ApiResponse<Vec<CategoryResponse>>),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_categories(
    State(state): State<AppState>,
    Path(user_id): Path<i32>,
) -> Result<Json<ApiResponse<Vec<CategoryResponse>>>, (StatusCode, Json<ErrorResponse>)> {
    debug!("Fetching categories for user {}", user_id);

    ensure_user_exists(&state, user_id).await?;

    match category::Entity::find_active_for_user(&state.db, user_id).await {
        Ok(categories) => {
            info!("Retrieved {} categories for user {}", categories.len(), user_id);
            Ok(Json(ApiResponse {
                data: categories.into_iter().map(CategoryResponse::from).collect(),
                message: String::new(),
                success: true,
            }))
        }
        Err(e) => {
            error!("Failed to fetch categories for user {}: {}", user_id, e);
            Err(internal_error("Failed to fetch categories"))
        }
    }
}

/// Get a single category by ID
#[utoipa::path(
    get,
    path = "/api/v1/users/{user_id}/categories/{category_id}",
    tag = "categories",
    params(
        ("user_id" = i32, Path, description = "Owning user ID"),
        ("category_id" = i32, Path, description = "Category ID")
    ),
    responses(
        (status = 200, description = "Category found", body = ApiResponse<CategoryResponse>),
        (status = 404, description = "Category not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_category(
    State(state): State<AppState>,
    Path((user_id, category_id)): Path<(i32, i32)>,
) -> Result<Json<ApiResponse<CategoryResponse>>, (StatusCode, Json<ErrorResponse>)> {
    debug!("Fetching category {} for user {}", category_id, user_id);

    let category_model = find_active_category(&state, user_id, category_id).await?;

    Ok(Json(ApiResponse {
        data: CategoryResponse::from(category_model),
        message: String::new(),
        success: true,
    }))
}

/// Update a category
#[utoipa::path(
    put,
    path = "/api/v1/users/{user_id}/categories/{category_id}",
    tag = "categories",
    params(
        ("user_id" = i32, Path, description = "Owning user ID"),
        ("category_id" = i32, Path, description = "Category ID")
    ),
    request_body = UpdateCategoryRequest,
    responses(
        (status = 200, description = "Category updated successfully", body = ApiResponse<CategoryResponse>),
        (status = 404, description = "Category not found", body = ErrorResponse),
        (status = 409, description = "Category name already exists for this user", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn update_category(
    State(state): State<AppState>,
    Path((user_id, category_id)): Path<(i32, i32)>,
    Json(request): Json<UpdateCategoryRequest>,
) -> Result<Json<ApiResponse<CategoryResponse>>, (StatusCode, Json<ErrorResponse>)> {
    debug!("Updating category {} for user {}", category_id, user_id);

    let existing = find_active_category(&state, user_id, category_id).await?;

    if let Some(ref name) = request.name {
        if *name != existing.name {
            match category::Entity::find_active_by_name(&state.db, user_id, name).await {
                Ok(Some(_)) => {
                    warn!("Category name '{}' already exists for user {}", name, user_id);
                    return Err(duplicate_category(name));
                }
                Ok(None) => {}
                Err(e) => {
                    error!("Failed to check category name: {}", e);
                    return Err(internal_error("Failed to validate category name"));
                }
            }
        }
    }

    let mut active: category::ActiveModel = existing.into();
    if let Some(name) = request.name {
        active.name = Set(name);
    }
    if let Some(icon) = request.icon {
        active.icon = Set(icon);
    }
    if let Some(budget) = request.budget {
        active.budget = Set(budget);
    }

    match active.update(&state.db).await {
        Ok(updated) => {
            info!("Category {} updated successfully", category_id);
            Ok(Json(ApiResponse {
                data: CategoryResponse::from(updated),
                message: "Category updated successfully".to_string(),
                success: true,
            }))
        }
        Err(e) => {
            error!("Failed to update category {}: {}", category_id, e);
            Err(internal_error("Failed to update category"))
        }
    }
}

/// Soft-delete a category
#[utoipa::path(
    delete,
    path = "/api/v1/users/{user_id}/categories/{category_id}",
    tag = "categories",
    params(
        ("user_id" = i32, Path, description = "Owning user ID"),
        ("category_id" = i32, Path, description = "Category ID")
    ),
    responses(
        (status = 204, description = "Category deleted successfully"),
        (status = 404, description = "Category not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_category(
    State(state): State<AppState>,
    Path((user_id, category_id)): Path<(i32, i32)>,
) -> Result<StatusCode, (StatusCode, Json<ErrorResponse>)> {
    debug!("Soft-deleting category {} for user {}", category_id, user_id);

    let existing = find_active_category(&state, user_id, category_id).await?;

    let mut active: category::ActiveModel = existing.into();
    active.deleted_at = Set(Some(Utc::now().naive_utc()));

    match active.update(&state.db).await {
        Ok(_) => {
            info!("Category {} soft-deleted successfully", category_id);
            Ok(StatusCode::NO_CONTENT)
        }
        Err(e) => {
            error!("Failed to delete category {}: {}", category_id, e);
            Err(internal_error("Failed to delete category"))
        }
    }
}

/// Fetch an owned, non-deleted category or produce a 404.
/// Deleted categories are indistinguishable from missing ones on the read
/// path.
pub(crate) async fn find_active_category(
    state: &AppState,
    user_id: i32,
    category_id: i32,
) -> Result<category::Model, (StatusCode, Json<ErrorResponse>)> {
    match category::Entity::find_by_id(category_id)
        .filter(category::Column::UserId.eq(user_id))
        .filter(category::Column::DeletedAt.is_null())
        .one(&state.db)
        .await
    {
        Ok(Some(category_model)) => Ok(category_model),
        Ok(None) => {
            warn!("Category {} not found for user {}", category_id, user_id);
            Err((
                StatusCode::NOT_FOUND,
                Json(ErrorResponse {
                    error: format!("Category with ID {} not found", category_id),
                    code: "NOT_FOUND".to_string(),
                    success: false,
                }),
            ))
        }
        Err(e) => {
            error!("Failed to fetch category {}: {}", category_id, e);
            Err(internal_error("Failed to fetch category"))
        }
    }
}

pub(crate) async fn ensure_user_exists(
    state: &AppState,
    user_id: i32,
) -> Result<(), (StatusCode, Json<ErrorResponse>)> {
    match user::Entity::find_by_id(user_id).one(&state.db).await {
        Ok(Some(_)) => Ok(()),
        Ok(None) => Err(user_not_found(user_id)),
        Err(e) => {
            error!("Failed to fetch user {}: {}", user_id, e);
            Err(internal_error("Failed to fetch user"))
        }
    }
}

pub(crate) fn internal_error(message: &str) -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: message.to_string(),
            code: "ERROR".to_string(),
            success: false,
        }),
    )
}

fn duplicate_category(name: &str) -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::CONFLICT,
        Json(ErrorResponse {
            error: format!("Category with name '{}' already exists", name),
            code: "DUPLICATE_CATEGORY".to_string(),
            success: false,
        }),
    )
}
