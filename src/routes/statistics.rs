//! Statistics Endpoints
//!
//! Maps `from` / `to` / `mode` query parameters to a match selection and
//! returns the aggregated statistics for one athlete.

use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::{
    error::ApiError,
    services::{StatisticsReport, TacticReport},
    types::{ApiResponse, MatchFilter},
    AppState,
};

// ============ Handlers ============

/// GET /users/:user_id/statistics
///
/// 기술별 승률, 상대별 전적, tactic 상성, 위치별 결과 전체
///
/// # Query
///
/// - `from`, `to`: `YYYY-MM-DD` (포함, 옵션)
/// - `mode`: `all` | `preliminary` | `main` (기본값: all)
#[tracing::instrument(skip(state))]
pub async fn get_statistics(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Query(filter): Query<MatchFilter>,
) -> Result<Json<ApiResponse<StatisticsReport>>, ApiError> {
    filter.validate().map_err(ApiError::ValidationError)?;

    let report = state.statistics.get_statistics(user_id, &filter).await?;
    Ok(Json(ApiResponse::success(report)))
}

/// GET /users/:user_id/statistics/tactics
///
/// tactic 상성만 (Main vs Main, 클릭 시 Sub 상세)
#[tracing::instrument(skip(state))]
pub async fn get_tactic_statistics(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Query(filter): Query<MatchFilter>,
) -> Result<Json<ApiResponse<TacticReport>>, ApiError> {
    filter.validate().map_err(ApiError::ValidationError)?;

    let report = state.statistics.get_tactic_statistics(user_id, &filter).await?;
    Ok(Json(ApiResponse::success(report)))
}
