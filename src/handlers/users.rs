use crate::schemas::{ApiResponse, AppState, ErrorResponse};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use model::entities::user;
use sea_orm::{ActiveModelTrait, DbErr, EntityTrait, ModelTrait, Set};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, warn};
use utoipa::ToSchema;

/// Request body for creating a new user
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateUserRequest {
    /// Username (must be unique)
    pub username: String,
}

/// Request body for updating a user
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct UpdateUserRequest {
    /// Username (must be unique)
    pub username: Option<String>,
}

/// User response model
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: i32,
    pub username: String,
}

impl From<user::Model> for UserResponse {
    fn from(model: user::Model) -> Self {
        Self {
            id: model.id,
            username: model.username,
        }
    }
}

/// Create a new user
#[utoipa::path(
    post,
    path = "/api/v1/users",
    tag = "users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created successfully", body = ApiResponse<UserResponse>),
        (status = 409, description = "Username already exists", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn create_user(
    State(state): State<AppState>,
    Json(request): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<ApiResponse<UserResponse>>), (StatusCode, Json<ErrorResponse>)> {
    debug!("Creating user with username: {}", request.username);

    let new_user = user::ActiveModel {
        username: Set(request.username.clone()),
        ..Default::default()
    };

    match new_user.insert(&state.db).await {
        Ok(user_model) => {
            info!("User created successfully with ID: {}", user_model.id);
            Ok((
                StatusCode::CREATED,
                Json(ApiResponse {
                    data: UserResponse::from(user_model),
                    message: "User created successfully".to_string(),
                    success: true,
                }),
            ))
        }
        Err(DbErr::Exec(_)) => {
            warn!("Username '{}' already exists", request.username);
            Err((
                StatusCode::CONFLICT,
                Json(ErrorResponse {
                    error: format!("User with username '{}' already exists", request.username),
                    code: "DUPLICATE_USER".to_string(),
                    success: false,
                }),
            ))
        }
        Err(e) => {
            error!("Failed to create user: {}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to create user".to_string(),
                    code: "ERROR".to_string(),
                    success: false,
                }),
            ))
        }
    }
}

/// Get all users
#[utoipa::path(
    get,
    path = "/api/v1/users",
    tag = "users",
    responses(
        (status = 200, description = "List of all users", body = ApiResponse<Vec<UserResponse>>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_users(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<UserResponse>>>, (StatusCode, Json<ErrorResponse>)> {
    debug!("Fetching all users");

    match user::Entity::find().all(&state.db).await {
        Ok(users) => {
            info!("Retrieved {} users", users.len());
            Ok(Json(ApiResponse {
                data: users.into_iter().map(UserResponse::from).collect(),
                message: String::new(),
                success: true,
            }))
        }
        Err(e) => {
            error!("Failed to fetch users: {}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to fetch users".to_string(),
                    code: "ERROR".to_string(),
                    success: false,
                }),
            ))
        }
    }
}

/// Get a single user by ID
#[utoipa::path(
    get,
    path = "/api/v1/users/{user_id}",
    tag = "users",
    params(
        ("user_id" = i32, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User found", body = ApiResponse<UserResponse>),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<i32>,
) -> Result<Json<ApiResponse<UserResponse>>, (StatusCode, Json<ErrorResponse>)> {
    debug!("Fetching user with ID: {}", user_id);

    match user::Entity::find_by_id(user_id).one(&state.db).await {
        Ok(Some(user_model)) => Ok(Json(ApiResponse {
            data: UserResponse::from(user_model),
            message: String::new(),
            success: true,
        })),
        Ok(None) => {
            warn!("User {} not found", user_id);
            Err(user_not_found(user_id))
        }
        Err(e) => {
            error!("Failed to fetch user {}: {}", user_id, e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to fetch user".to_string(),
                    code: "ERROR".to_string(),
                    success: false,
                }),
            ))
        }
    }
}

/// Update a user
#[utoipa::path(
    put,
    path = "/api/v1/users/{user_id}",
    tag = "users",
    params(
        ("user_id" = i32, Path, description = "User ID")
    ),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated successfully", body = ApiResponse<UserResponse>),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 409, description = "Username already exists", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn update_user(
    State(state): State<AppState>,
    Path(user_id): Path<i32>,
    Json(request): Json<UpdateUserRequest>,
) -> Result<Json<ApiResponse<UserResponse>>, (StatusCode, Json<ErrorResponse>)> {
    debug!("Updating user with ID: {}", user_id);

    let existing = match user::Entity::find_by_id(user_id).one(&state.db).await {
        Ok(Some(user_model)) => user_model,
        Ok(None) => {
            warn!("User {} not found", user_id);
            return Err(user_not_found(user_id));
        }
        Err(e) => {
            error!("Failed to fetch user {}: {}", user_id, e);
            return Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to fetch user".to_string(),
                    code: "ERROR".to_string(),
                    success: false,
                }),
            ));
        }
    };

    let mut active: user::ActiveModel = existing.into();
    if let Some(username) = request.username {
        active.username = Set(username);
    }

    match active.update(&state.db).await {
        Ok(updated) => {
            info!("User {} updated successfully", user_id);
            Ok(Json(ApiResponse {
                data: UserResponse::from(updated),
                message: "User updated successfully".to_string(),
                success: true,
            }))
        }
        Err(DbErr::Exec(_)) => {
            warn!("Username already exists");
            Err((
                StatusCode::CONFLICT,
                Json(ErrorResponse {
                    error: "User with this username already exists".to_string(),
                    code: "DUPLICATE_USER".to_string(),
                    success: false,
                }),
            ))
        }
        Err(e) => {
            error!("Failed to update user {}: {}", user_id, e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to update user".to_string(),
                    code: "ERROR".to_string(),
                    success: false,
                }),
            ))
        }
    }
}

/// Delete a user
#[utoipa::path(
    delete,
    path = "/api/v1/users/{user_id}",
    tag = "users",
    params(
        ("user_id" = i32, Path, description = "User ID")
    ),
    responses(
        (status = 204, description = "User deleted successfully"),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(user_id): Path<i32>,
) -> Result<StatusCode, (StatusCode, Json<ErrorResponse>)> {
    debug!("Deleting user with ID: {}", user_id);

    let user_model = match user::Entity::find_by_id(user_id).one(&state.db).await {
        Ok(Some(user_model)) => user_model,
        Ok(None) => {
            warn!("User {} not found", user_id);
            return Err(user_not_found(user_id));
        }
        Err(e) => {
            error!("Failed to fetch user {}: {}", user_id, e);
            return Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to fetch user".to_string(),
                    code: "ERROR".to_string(),
                    success: false,
                }),
            ));
        }
    };

    match user_model.delete(&state.db).await {
        Ok(_) => {
            info!("User {} deleted successfully", user_id);
            Ok(StatusCode::NO_CONTENT)
        }
        Err(e) => {
            error!("Failed to delete user {}: {}", user_id, e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to delete user".to_string(),
                    code: "ERROR".to_string(),
                    success: false,
                }),
            ))
        }
    }
}

pub(crate) fn user_not_found(user_id: i32) -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: format!("User with ID {} not found", user_id),
            code: "NOT_FOUND".to_string(),
            success: false,
        }),
    )
}
