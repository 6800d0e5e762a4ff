use crate::handlers::categories::{ensure_user_exists, internal_error};
use crate::schemas::{ApiResponse, AppState, ErrorResponse};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use chrono::Utc;
use model::entities::source;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, warn};
use utoipa::ToSchema;

/// Request body for creating a new money source
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateSourceRequest {
    /// Human-readable label, e.g. "Checking account"
    pub label: String,
}

/// Request body for updating a money source
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct UpdateSourceRequest {
    pub label: Option<String>,
}

/// Money source response model
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SourceResponse {
    pub id: i32,
    pub user_id: i32,
    pub label: String,
}

impl From<source::Model> for SourceResponse {
    fn from(model: source::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            label: model.label,
        }
    }
}

/// Create a new money source for a user
#[utoipa::path(
    post,
    path = "/api/v1/users/{user_id}/sources",
    tag = "sources",
    params(
        ("user_id" = i32, Path, description = "Owning user ID")
    ),
    request_body = CreateSourceRequest,
    responses(
        (status = 201, description = "Source created successfully", body = ApiResponse<SourceResponse>),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn create_source(
    State(state): State<AppState>,
    Path(user_id): Path<i32>,
    Json(request): Json<CreateSourceRequest>,
) -> Result<(StatusCode, Json<ApiResponse<SourceResponse>>), (StatusCode, Json<ErrorResponse>)> {
    debug!("Creating source '{}' for user {}", request.label, user_id);

    ensure_user_exists(&state, user_id).await?;

    let new_source = source::ActiveModel {
        user_id: Set(user_id),
        label: Set(request.label),
        created_at: Set(Utc::now().naive_utc()),
        deleted_at: Set(None),
        ..Default::default()
    };

    match new_source.insert(&state.db).await {
        Ok(source_model) => {
            info!("Source created successfully with ID: {}", source_model.id);
            Ok((
                StatusCode::CREATED,
                Json(ApiResponse {
                    data: SourceResponse::from(source_model),
                    message: "Source created successfully".to_string(),
                    success: true,
                }),
            ))
        }
        Err(e) => {
            error!("Failed to create source: {}", e);
            Err(internal_error("Failed to create source"))
        }
    }
}

/// Get all non-deleted money sources of a user
#[utoipa::path(
    get,
    path = "/api/v1/users/{user_id}/sources",
    tag = "sources",
    params(
        ("user_id" = i32, Path, description = "Owning user ID")
    ),
    responses(
        (status = 200, description = "List of the user's sources", body = ApiResponse<Vec<SourceResponse>>),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_sources(
    State(state): State<AppState>,
    Path(user_id): Path<i32>,
) -> Result<Json<ApiResponse<Vec<SourceResponse>>>, (StatusCode, Json<ErrorResponse>)> {
    debug!("Fetching sources for user {}", user_id);

    ensure_user_exists(&state, user_id).await?;

    match source::Entity::find()
        .filter(source::Column::UserId.eq(user_id))
        .filter(source::Column::DeletedAt.is_null())
        .order_by_asc(source::Column::Id)
        .all(&state.db)
        .await
    {
        Ok(sources) => {
            info!("Retrieved {} sources for user {}", sources.len(), user_id);
            Ok(Json(ApiResponse {
                data: sources.into_iter().map(SourceResponse::from).collect(),
                message: String::new(),
                success: true,
            }))
        }
        Err(e) => {
            error!("Failed to fetch sources for user {}: {}", user_id, e);
            Err(internal_error("Failed to fetch sources"))
        }
    }
}

/// Get a single money source by ID
#[utoipa::path(
    get,
    path = "/api/v1/users/{user_id}/sources/{source_id}",
    tag = "sources",
    params(
        ("user_id" = i32, Path, description = "Owning user ID"),
        ("source_id" = i32, Path, description = "Source ID")
    ),
    responses(
        (status = 200, description = "Source found", body = ApiResponse<SourceResponse>),
        (status = 404, description = "Source not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_source(
    State(state): State<AppState>,
    Path((user_id, source_id)): Path<(i32, i32)>,
) -> Result<Json<ApiResponse<SourceResponse>>, (StatusCode, Json<ErrorResponse>)> {
    debug!("Fetching source {} for user {}", source_id, user_id);

    let source_model = find_active_source(&state, user_id, source_id).await?;

    Ok(Json(ApiResponse {
        data: SourceResponse::from(source_model),
        message: String::new(),
        success: true,
    }))
}

/// Update a money source
#[utoipa::path(
    put,
    path = "/api/v1/users/{user_id}/sources/{source_id}",
    tag = "sources",
    params(
        ("user_id" = i32, Path, description = "Owning user ID"),
        ("source_id" = i32, Path, description = "Source ID")
    ),
    request_body = UpdateSourceRequest,
    responses(
        (status = 200, description = "Source updated successfully", body = ApiResponse<SourceResponse>),
        (status = 404, description = "Source not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn update_source(
    State(state): State<AppState>,
    Path((user_id, source_id)): Path<(i32, i32)>,
    Json(request): Json<UpdateSourceRequest>,
) -> Result<Json<ApiResponse<SourceResponse>>, (StatusCode, Json<ErrorResponse>)> {
    debug!("Updating source {} for user {}", source_id, user_id);

    let existing = find_active_source(&state, user_id, source_id).await?;

    let mut active: source::ActiveModel = existing.into();
    if let Some(label) = request.label {
        active.label = Set(label);
    }

    match active.update(&state.db).await {
        Ok(updated) => {
            info!("Source {} updated successfully", source_id);
            Ok(Json(ApiResponse {
                data: SourceResponse::from(updated),
                message: "Source updated successfully".to_string(),
                success: true,
            }))
        }
        Err(e) => {
            error!("Failed to update source {}: {}", source_id, e);
            Err(internal_error("Failed to update source"))
        }
    }
}

/// Soft-delete a money source
#[utoipa::path(
    delete,
    path = "/api/v1/users/{user_id}/sources/{source_id}",
    tag = "sources",
    params(
        ("user_id" = i32, Path, description = "Owning user ID"),
        ("source_id" = i32, Path, description = "Source ID")
    ),
    responses(
        (status = 204, description = "Source deleted successfully"),
        (status = 404, description = "Source not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_source(
    State(state): State<AppState>,
    Path((user_id, source_id)): Path<(i32, i32)>,
) -> Result<StatusCode, (StatusCode, Json<ErrorResponse>)> {
    debug!("Soft-deleting source {} for user {}", source_id, user_id);

    let existing = find_active_source(&state, user_id, source_id).await?;

    let mut active: source::ActiveModel = existing.into();
    active.deleted_at = Set(Some(Utc::now().naive_utc()));

    match active.update(&state.db).await {
        Ok(_) => {
            info!("Source {} soft-deleted successfully", source_id);
            Ok(StatusCode::NO_CONTENT)
        }
        Err(e) => {
            error!("Failed to delete source {}: {}", source_id, e);
            Err(internal_error("Failed to delete source"))
        }
    }
}

/// Fetch an owned, non-deleted source or produce a 404.
pub(crate) async fn find_active_source(
    state: &AppState,
    user_id: i32,
    source_id: i32,
) -> Result<source::Model, (StatusCode, Json<ErrorResponse>)> {
    match source::Entity::find_by_id(source_id)
        .filter(source::Column::UserId.eq(user_id))
        .filter(source::Column::DeletedAt.is_null())
        .one(&state.db)
        .await
    {
        Ok(Some(source_model)) => Ok(source_model),
        Ok(None) => {
            warn!("Source {} not found for user {}", source_id, user_id);
            Err((
                StatusCode::NOT_FOUND,
                Json(ErrorResponse {
                    error: format!("Source with ID {} not found", source_id),
                    code: "NOT_FOUND".to_string(),
                    success: false,
                }),
            ))
        }
        Err(e) => {
            error!("Failed to fetch source {}: {}", source_id, e);
            Err(internal_error("Failed to fetch source"))
        }
    }
}
