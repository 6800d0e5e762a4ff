use crate::handlers::categories::{ensure_user_exists, internal_error};
use crate::schemas::{ApiResponse, AppState, CachedData, ErrorResponse, MonthlyReportQuery};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use common::MonthlyReport;
use report::ReportError;
use tracing::{debug, error, info, instrument, warn};

/// Compute the monthly spend report for a user
///
/// Aggregates the user's non-deleted transactions over the calendar month
/// selected by `reference_date` (today when omitted): per-category totals
/// ordered by `sort_key`, the previous month's aggregate total, and the
/// `limit` largest transactions of the window.
#[utoipa::path(
    get,
    path = "/api/v1/users/{user_id}/reports/monthly",
    tag = "reports",
    params(
        ("user_id" = i32, Path, description = "Owning user ID"),
        MonthlyReportQuery
    ),
    responses(
        (status = 200, description = "Monthly report computed successfully", body = ApiResponse<MonthlyReport>),
        (status = 400, description = "Invalid reference date, sort key or limit", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_monthly_report(
    State(state): State<AppState>,
    Path(user_id): Path<i32>,
    Query(query): Query<MonthlyReportQuery>,
) -> Result<Json<ApiResponse<MonthlyReport>>, (StatusCode, Json<ErrorResponse>)> {
    debug!("Computing monthly report for user {}", user_id);

    ensure_user_exists(&state, user_id).await?;

    let cache_key = format!("report_{}_{:?}", user_id, query);
    if let Some(CachedData::Report(cached)) = state.cache.get(&cache_key).await {
        debug!("Returning cached monthly report for user {}", user_id);
        return Ok(Json(ApiResponse {
            data: cached,
            message: String::new(),
            success: true,
        }));
    }

    let result = report::monthly_report(
        &state.db,
        user_id,
        query.reference_date.as_deref(),
        query.sort_key.unwrap_or_default(),
        query.limit,
    )
    .await;

    match result {
        Ok(monthly_report) => {
            info!(
                "Monthly report for user {} covers {} categories",
                user_id,
                monthly_report.categories.len()
            );
            state
                .cache
                .insert(cache_key, CachedData::Report(monthly_report.clone()))
                .await;
            Ok(Json(ApiResponse {
                data: monthly_report,
                message: String::new(),
                success: true,
            }))
        }
        Err(ReportError::InvalidArgument(message)) => {
            warn!(
                "Rejecting monthly report request for user {}: {}",
                user_id, message
            );
            Err((
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: message,
                    code: "INVALID_ARGUMENT".to_string(),
                    success: false,
                }),
            ))
        }
        Err(e) => {
            error!("Failed to compute monthly report for user {}: {}", user_id, e);
            Err(internal_error("Failed to compute monthly report"))
        }
    }
}
