//! Database Models
//!
//! Row models for techniques, matches, markings and technique attempts.
//! The CRUD layer creates and soft-deletes these rows; the statistics
//! engine only ever reads them.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// 기술 분류
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TechniqueType {
    Attack,
    Defense,
    Etc,
}

/// 기술 (tactic)
///
/// `parent_id`가 없으면 main tactic, 있으면 sub tactic
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Technique {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub technique_type: TechniqueType,
    #[serde(default)]
    pub parent_id: Option<i64>,
    #[serde(default)]
    pub deleted_at: Option<DateTime<Utc>>,
}

/// 경기 단계 (예선 / 본선)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStage {
    Preliminary,
    Main,
}

/// 상대 선수
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Opponent {
    pub id: i64,
    pub name: String,
    pub team: String,
}

/// 경기
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    pub id: i64,
    pub user_id: i64,
    #[serde(default)]
    pub opponent_id: Option<i64>,
    pub tournament_name: String,
    pub tournament_date: NaiveDate,
    pub stage: MatchStage,
    pub my_score: i32,
    pub opponent_score: i32,
    #[serde(default)]
    pub deleted_at: Option<DateTime<Utc>>,
}

/// 마킹 결과 (선수 관점)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkingResult {
    Win,
    Lose,
    Attempt,
}

/// 마킹 품질
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkingQuality {
    Good,
    #[default]
    Normal,
    Bad,
}

/// 마킹 (득점/실점/시도 이벤트)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Marking {
    pub id: i64,
    pub match_id: i64,
    pub user_id: i64,
    /// 영상 내 위치 (초)
    #[serde(default)]
    pub timestamp: i64,
    pub result: MarkingResult,
    #[serde(default)]
    pub my_technique_id: Option<i64>,
    #[serde(default)]
    pub opponent_technique_id: Option<i64>,
    #[serde(default)]
    pub quality: MarkingQuality,
    #[serde(default)]
    pub note: String,
    #[serde(default)]
    pub coach_note: String,
    /// 피스트 위치 코드
    #[serde(default)]
    pub piste_location: Option<i32>,
    #[serde(default)]
    pub deleted_at: Option<DateTime<Utc>>,
}

/// 경기별 기술 시도 카운터
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TechniqueAttempt {
    pub id: i64,
    pub user_id: i64,
    pub match_id: i64,
    pub technique_id: i64,
    pub attempt_count: i64,
    #[serde(default)]
    pub deleted_at: Option<DateTime<Utc>>,
}
