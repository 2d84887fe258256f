//! Fencing Statistics API Library
//!
//! # Overview
//!
//! 펜싱 경기 마킹(득점/실점/시도)으로부터 선수 통계를 계산하는 라이브러리.
//! 기술별 승률, tactic 상성 행렬, 상대별 전적, 피스트 위치별 결과를 제공합니다.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                         API                              │
//! │                                                          │
//! │  ┌─────────┐  ┌─────────┐  ┌─────────┐  ┌─────────┐    │
//! │  │ Routes  │  │Services │  │   DB    │  │  Types  │    │
//! │  └────┬────┘  └────┬────┘  └────┬────┘  └────┬────┘    │
//! │       │            │            │            │          │
//! │       └────────────┴────────────┴────────────┘          │
//! │                         │                                │
//! └─────────────────────────┼────────────────────────────────┘
//!                           │
//!                           ▼
//!                  ┌────────────────┐
//!                  │ Snapshot Store │
//!                  └────────────────┘
//! ```
//!
//! ## Modules
//!
//! - `config`: 환경 설정 관리
//! - `error`: 에러 타입 및 처리
//! - `routes`: HTTP 엔드포인트 핸들러
//! - `services`: 통계 집계 엔진
//! - `db`: 행 모델 + 저장소
//! - `types`: 공통 타입 정의
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use fencing_stats::{db::MemoryStore, services::StatisticsService, types::MatchFilter};
//!
//! let store = Arc::new(MemoryStore::from_path("snapshot.json")?);
//! let service = StatisticsService::new(store, Default::default());
//! let report = service.get_statistics(1, &MatchFilter::default()).await?;
//! ```

use std::sync::Arc;

pub mod config;
pub mod error;
pub mod routes;
pub mod services;
pub mod db;
pub mod types;

// Re-exports for convenience
pub use config::Config;
pub use error::ApiError;
pub use db::{MemoryStore, StatisticsRepository};
pub use services::StatisticsService;

/// 애플리케이션 전역 상태
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn StatisticsRepository>,
    pub statistics: Arc<StatisticsService>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(store: Arc<dyn StatisticsRepository>, config: Config) -> Self {
        let statistics = StatisticsService::new(store.clone(), config.statistics_options());
        Self {
            store,
            statistics: Arc::new(statistics),
            config: Arc::new(config),
        }
    }
}
