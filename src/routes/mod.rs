//! API Routes Module
//!
//! 모든 HTTP 엔드포인트 정의
//!
//! # Routes
//! - `/health` - 헬스 체크
//! - `/users/:user_id/statistics` - 전체 통계
//! - `/users/:user_id/statistics/tactics` - tactic 상성 통계

pub mod health;
pub mod statistics;

use std::any::Any as PanicPayload;

use axum::{
    http::{HeaderValue, Uri},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::{error::ApiError, AppState};

/// 라우터 생성
///
/// # Route Structure
///
/// ```text
/// GET  /health                              - 서버 상태 확인
///
/// GET  /users/:user_id/statistics           - 전체 통계
/// GET  /users/:user_id/statistics/tactics   - tactic 상성
/// ```
pub fn create_router(state: AppState) -> Router {
    // CORS 설정
    // 프로덕션에서는 특정 도메인만 허용
    let cors = if state.config.is_production() {
        let origins: Vec<HeaderValue> = state
            .config
            .allowed_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([axum::http::Method::GET])
            .allow_headers([axum::http::header::CONTENT_TYPE])
    } else {
        // 개발: 모두 허용
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    };

    Router::new()
        // Health check
        .route("/health", get(health::health_check))

        // Statistics
        .route("/users/:user_id/statistics", get(statistics::get_statistics))
        .route(
            "/users/:user_id/statistics/tactics",
            get(statistics::get_tactic_statistics),
        )

        .fallback(not_found)

        // 미들웨어
        .layer(CatchPanicLayer::custom(internal_error))
        .layer(TraceLayer::new_for_http())
        .layer(cors)

        // 상태 주입
        .with_state(state)
}

async fn not_found(uri: Uri) -> ApiError {
    ApiError::NotFound(uri.path().to_string())
}

// 핸들러 panic → 500 JSON
fn internal_error(_: Box<dyn PanicPayload + Send + 'static>) -> Response {
    ApiError::InternalError.into_response()
}
