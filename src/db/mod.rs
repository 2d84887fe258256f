//! Database Module
//!
//! # Interview Q&A
//!
//! Q: 왜 실제 DB 대신 메모리 저장소인가?
//! A: 영속화는 CRUD 레이어의 책임
//!
//!    - 통계 엔진은 이미 검증된 행의 스냅샷만 필요
//!    - JSON 스냅샷 파일로 로드 → 재현 가능한 통계
//!    - 실제 DB 구현은 `StatisticsRepository`만 구현하면 교체 가능
//!
//! Q: 동시 요청은 어떻게 처리하는가?
//! A: tokio `RwLock`
//!    - 통계 요청은 모두 읽기 → 동시에 진행
//!    - 스냅샷 교체(`replace`)만 쓰기 락

mod models;
mod repository;

pub use models::*;
pub use repository::StatisticsRepository;
#[cfg(test)]
pub use repository::mock;

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::types::MatchFilter;

/// 저장소에 적재되는 전체 행 묶음 (JSON)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotFile {
    #[serde(default)]
    pub techniques: Vec<Technique>,
    #[serde(default)]
    pub opponents: Vec<Opponent>,
    #[serde(default)]
    pub matches: Vec<Match>,
    #[serde(default)]
    pub markings: Vec<Marking>,
    #[serde(default)]
    pub attempts: Vec<TechniqueAttempt>,
}

/// 메모리 기반 저장소
pub struct MemoryStore {
    rows: RwLock<SnapshotFile>,
}

impl MemoryStore {
    pub fn new(rows: SnapshotFile) -> Self {
        Self {
            rows: RwLock::new(rows),
        }
    }

    pub fn empty() -> Self {
        Self::new(SnapshotFile::default())
    }

    /// JSON 스냅샷 파일에서 로드
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read snapshot file {}", path.display()))?;
        let rows: SnapshotFile = serde_json::from_str(&raw)
            .with_context(|| format!("invalid snapshot file {}", path.display()))?;

        tracing::info!(
            techniques = rows.techniques.len(),
            matches = rows.matches.len(),
            markings = rows.markings.len(),
            "snapshot loaded"
        );
        Ok(Self::new(rows))
    }

    /// 스냅샷 교체 (CRUD 레이어 동기화용)
    pub async fn replace(&self, rows: SnapshotFile) {
        *self.rows.write().await = rows;
    }
}

#[async_trait]
impl StatisticsRepository for MemoryStore {
    /// 최신 경기 먼저 (대회 날짜 내림차순, 같은 날은 id 내림차순)
    async fn find_matches(&self, user_id: i64, filter: &MatchFilter) -> Result<Vec<Match>> {
        let rows = self.rows.read().await;
        let mut matches: Vec<Match> = rows
            .matches
            .iter()
            .filter(|m| m.user_id == user_id && m.deleted_at.is_none() && filter.matches(m))
            .cloned()
            .collect();
        matches.sort_by(|a, b| {
            b.tournament_date
                .cmp(&a.tournament_date)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(matches)
    }

    async fn find_opponents(&self, opponent_ids: &[i64]) -> Result<Vec<Opponent>> {
        let wanted: HashSet<i64> = opponent_ids.iter().copied().collect();
        let rows = self.rows.read().await;
        Ok(rows
            .opponents
            .iter()
            .filter(|o| wanted.contains(&o.id))
            .cloned()
            .collect())
    }

    async fn find_markings(&self, user_id: i64, match_ids: &[i64]) -> Result<Vec<Marking>> {
        let wanted: HashSet<i64> = match_ids.iter().copied().collect();
        let rows = self.rows.read().await;
        Ok(rows
            .markings
            .iter()
            .filter(|mk| {
                mk.user_id == user_id && mk.deleted_at.is_none() && wanted.contains(&mk.match_id)
            })
            .cloned()
            .collect())
    }

    async fn find_attempts(&self, user_id: i64, match_ids: &[i64]) -> Result<Vec<TechniqueAttempt>> {
        let wanted: HashSet<i64> = match_ids.iter().copied().collect();
        let rows = self.rows.read().await;
        Ok(rows
            .attempts
            .iter()
            .filter(|a| {
                a.user_id == user_id && a.deleted_at.is_none() && wanted.contains(&a.match_id)
            })
            .cloned()
            .collect())
    }

    async fn find_techniques(&self, user_id: i64) -> Result<Vec<Technique>> {
        let rows = self.rows.read().await;
        Ok(rows
            .techniques
            .iter()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn health_check(&self) -> Result<()> {
        let _rows = self.rows.read().await;
        Ok(())
    }
}
