//! Services Module
//!
//! 비즈니스 로직을 담당하는 서비스 레이어
//!
//! # Services
//! - `StatisticsService`: 스냅샷 조회 + 통계 계산
//! - `StatisticsEngine`: 상태 없는 순수 집계 엔진

pub mod statistics;

pub use statistics::{
    StatisticsEngine, StatisticsOptions, StatisticsReport, StatisticsService, StatsSnapshot,
    TacticReport,
};
