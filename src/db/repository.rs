//! Repository Pattern Implementation
//!
//! # Interview Q&A
//!
//! Q: 통계 엔진이 저장소를 직접 조회하지 않는 이유는?
//! A: 조회와 집계를 분리
//!
//!    - 서비스가 요청 시작 시 한 번만 조회 → 불변 스냅샷 생성
//!    - 집계 컴포넌트는 스냅샷만 읽음 (서로 재조회 없음)
//!    - 테스트 시 Mock 저장소로 동일한 스냅샷 재현 가능
//!
//! Q: 삭제된 행은 누가 걸러내는가?
//! A: 경기/마킹/시도 행은 저장소가 `deleted_at IS NULL`로 필터링
//!    - 기술(technique)은 삭제된 행도 함께 반환
//!    - 삭제 여부 판단(상위 기술 삭제 포함)은 TechniqueTree가 담당

use async_trait::async_trait;
use anyhow::Result;

use super::models::{Marking, Match, Opponent, Technique, TechniqueAttempt};
use crate::types::MatchFilter;

/// 통계용 읽기 전용 저장소 인터페이스
#[async_trait]
pub trait StatisticsRepository: Send + Sync {
    /// 사용자의 (삭제되지 않은) 경기 중 조건에 맞는 것
    async fn find_matches(&self, user_id: i64, filter: &MatchFilter) -> Result<Vec<Match>>;

    async fn find_opponents(&self, opponent_ids: &[i64]) -> Result<Vec<Opponent>>;

    async fn find_markings(&self, user_id: i64, match_ids: &[i64]) -> Result<Vec<Marking>>;

    async fn find_attempts(&self, user_id: i64, match_ids: &[i64]) -> Result<Vec<TechniqueAttempt>>;

    /// 삭제된 기술도 포함해서 반환
    async fn find_techniques(&self, user_id: i64) -> Result<Vec<Technique>>;

    async fn health_check(&self) -> Result<()>;
}
