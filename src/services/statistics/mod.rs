//! Statistics & Tactic Matchup Aggregation Engine
//!
//! # Interview Q&A
//!
//! Q: 통계 요청 한 번의 흐름은?
//! A: 조회 1회 → 불변 스냅샷 → 각 집계 컴포넌트
//!
//!    ```text
//!    StatisticsService::get_statistics(user, filter)
//!         │
//!         ├─ repository: matches → opponents / markings / attempts / techniques
//!         ▼
//!    StatsSnapshot (immutable)
//!         │
//!         ├─ technique_rate  (summary, winRate, lossCount)
//!         ├─ opponent        (opponentStats)
//!         ├─ matchup         (topScoring / topConceded / tacticMatchups)
//!         └─ location        (locationStats)
//!    ```
//!
//!    - 컴포넌트끼리 서로 재조회하지 않음
//!    - 같은 스냅샷 → 항상 같은 결과 (idempotent)
//!
//! Q: 에러는 언제 발생하는가?
//! A: 엔진 내부에서는 발생하지 않음
//!    - 데이터 불일치(없는 기술 id 등)는 해당 참조만 건너뜀
//!    - 저장소 조회 실패만 그대로 전파

mod location;
mod matchup;
mod notes;
mod opponent;
mod snapshot;
mod technique_rate;

pub use location::{stats_by_location, LocationStat};
pub use matchup::{
    build_matchups, tactic_matchups, top_tactics, MatchupDetail, OutcomeCounts, PairIndex,
    TacticRef, TacticReport, TacticScoreStat,
};
pub use notes::{top_notes, TopNote, DEFAULT_NOTE_LIMIT};
pub use opponent::{stage_averages, stats_by_opponent, OpponentStat, ScoreAverage, StageAverages};
pub use snapshot::{StatsSnapshot, TechniqueTree};
pub use technique_rate::{
    loss_count_by_technique, rank_techniques, summarize, win_notes_by_technique,
    win_rate_by_technique, LossCountEntry, ScoringSide, StatisticSummary, TechniqueStat,
    WinRateEntry,
};

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use anyhow::Result;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::db::{Match, MatchStage, StatisticsRepository};
use crate::types::MatchFilter;

/// 기본 Top 기술 개수 (상대별 통계)
pub const DEFAULT_TOP_TECHNIQUE_LIMIT: usize = 3;

/// 집계 옵션
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatisticsOptions {
    pub note_limit: usize,
    pub top_technique_limit: usize,
}

impl Default for StatisticsOptions {
    fn default() -> Self {
        Self {
            note_limit: DEFAULT_NOTE_LIMIT,
            top_technique_limit: DEFAULT_TOP_TECHNIQUE_LIMIT,
        }
    }
}

/// 경기 목록 항목
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchListItem {
    pub id: i64,
    pub tournament_name: String,
    pub opponent_name: String,
    pub my_score: i32,
    pub opponent_score: i32,
    pub stage: MatchStage,
    pub tournament_date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TechniquesByMatch {
    #[serde(rename = "match")]
    pub match_item: MatchListItem,
    pub summary: StatisticSummary,
}

/// 전체 통계 응답
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatisticsReport {
    pub match_count: usize,
    pub summary: StatisticSummary,
    pub techniques_by_match: Vec<TechniquesByMatch>,
    pub opponent_stats: Vec<OpponentStat>,
    pub win_rate: BTreeMap<i64, WinRateEntry>,
    pub loss_count: BTreeMap<i64, LossCountEntry>,
    pub top_scoring_tactics: Vec<TacticScoreStat>,
    pub top_conceded_tactics: Vec<TacticScoreStat>,
    pub tactic_matchups: Vec<MatchupDetail>,
    pub location_stats: Vec<LocationStat>,
}

/// 순수 집계 엔진 (상태 없음)
#[derive(Debug, Clone, Copy, Default)]
pub struct StatisticsEngine {
    options: StatisticsOptions,
}

impl StatisticsEngine {
    pub fn new(options: StatisticsOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> StatisticsOptions {
        self.options
    }

    /// 스냅샷 하나에서 전체 통계 계산
    pub fn compute(&self, snapshot: &StatsSnapshot) -> StatisticsReport {
        let tree = &snapshot.tree;
        let by_match = snapshot.markings_by_match();

        let techniques_by_match = snapshot
            .matches
            .iter()
            .map(|m| TechniquesByMatch {
                match_item: self.match_item(snapshot, m),
                summary: summarize(
                    by_match.get(&m.id).into_iter().flatten().copied(),
                    tree,
                ),
            })
            .collect();

        let tactics = self.tactic_report(snapshot);

        StatisticsReport {
            match_count: snapshot.matches.len(),
            summary: summarize(&snapshot.markings, tree),
            techniques_by_match,
            opponent_stats: stats_by_opponent(
                &snapshot.matches,
                &snapshot.opponents,
                &by_match,
                tree,
                self.options.top_technique_limit,
            ),
            win_rate: win_rate_by_technique(
                &snapshot.attempts,
                &snapshot.markings,
                tree,
                self.options.note_limit,
            ),
            loss_count: loss_count_by_technique(&snapshot.markings, tree, self.options.note_limit),
            top_scoring_tactics: tactics.top_scoring_tactics,
            top_conceded_tactics: tactics.top_conceded_tactics,
            tactic_matchups: tactics.tactic_matchups,
            location_stats: stats_by_location(&snapshot.markings),
        }
    }

    /// tactic 상성 리포트만 계산
    pub fn tactic_report(&self, snapshot: &StatsSnapshot) -> TacticReport {
        tactic_matchups(snapshot.user_id, &snapshot.markings, &snapshot.tree)
    }

    fn match_item(&self, snapshot: &StatsSnapshot, m: &Match) -> MatchListItem {
        let opponent_name = m
            .opponent_id
            .and_then(|id| snapshot.opponents.get(&id))
            .map(|o| o.name.clone())
            .unwrap_or_default();

        MatchListItem {
            id: m.id,
            tournament_name: m.tournament_name.clone(),
            opponent_name,
            my_score: m.my_score,
            opponent_score: m.opponent_score,
            stage: m.stage,
            tournament_date: m.tournament_date,
        }
    }
}

/// 통계 서비스
///
/// 저장소 조회 → 스냅샷 생성 → 엔진 실행
pub struct StatisticsService {
    repository: Arc<dyn StatisticsRepository>,
    engine: StatisticsEngine,
}

impl StatisticsService {
    pub fn new(repository: Arc<dyn StatisticsRepository>, options: StatisticsOptions) -> Self {
        Self {
            repository,
            engine: StatisticsEngine::new(options),
        }
    }

    pub fn engine(&self) -> &StatisticsEngine {
        &self.engine
    }

    /// 조건에 맞는 경기와 관련 행을 한 번에 조회
    #[tracing::instrument(skip(self), fields(matches = tracing::field::Empty))]
    pub async fn load_snapshot(&self, user_id: i64, filter: &MatchFilter) -> Result<StatsSnapshot> {
        let matches = self.repository.find_matches(user_id, filter).await?;
        tracing::Span::current().record("matches", matches.len());
        self.snapshot_for_matches(user_id, matches).await
    }

    /// 호출자가 이미 고른 경기 목록으로 스냅샷 생성
    pub async fn snapshot_for_matches(&self, user_id: i64, matches: Vec<Match>) -> Result<StatsSnapshot> {
        if matches.is_empty() {
            return Ok(StatsSnapshot::empty(user_id));
        }

        let match_ids: Vec<i64> = matches.iter().map(|m| m.id).collect();
        let opponent_ids: Vec<i64> = matches
            .iter()
            .filter_map(|m| m.opponent_id)
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();

        let (opponents, markings, attempts, techniques) = tokio::try_join!(
            self.repository.find_opponents(&opponent_ids),
            self.repository.find_markings(user_id, &match_ids),
            self.repository.find_attempts(user_id, &match_ids),
            self.repository.find_techniques(user_id),
        )?;

        tracing::debug!(
            user_id,
            matches = matches.len(),
            markings = markings.len(),
            attempts = attempts.len(),
            techniques = techniques.len(),
            "statistics snapshot fetched"
        );

        Ok(StatsSnapshot::new(
            user_id, matches, opponents, markings, attempts, techniques,
        ))
    }

    /// 전체 통계
    pub async fn get_statistics(&self, user_id: i64, filter: &MatchFilter) -> Result<StatisticsReport> {
        let snapshot = self.load_snapshot(user_id, filter).await?;
        let report = self.engine.compute(&snapshot);
        tracing::info!(
            user_id,
            match_count = report.match_count,
            matchups = report.tactic_matchups.len(),
            "statistics computed"
        );
        Ok(report)
    }

    /// tactic 상성 통계
    pub async fn get_tactic_statistics(&self, user_id: i64, filter: &MatchFilter) -> Result<TacticReport> {
        let snapshot = self.load_snapshot(user_id, filter).await?;
        Ok(self.engine.tactic_report(&snapshot))
    }
}
