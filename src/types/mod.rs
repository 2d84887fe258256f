//! Common Types Module
//!
//! 애플리케이션 전반에서 사용되는 공통 타입 정의

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::db::{Match, MatchStage};

/// API 응답 래퍼
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
}

/// 통계 조회 모드
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatisticMode {
    #[default]
    All,
    Preliminary,
    Main,
}

impl StatisticMode {
    pub fn accepts(&self, stage: MatchStage) -> bool {
        match self {
            StatisticMode::All => true,
            StatisticMode::Preliminary => stage == MatchStage::Preliminary,
            StatisticMode::Main => stage == MatchStage::Main,
        }
    }
}

/// 경기 선택 조건
///
/// `from`/`to`는 모두 포함(inclusive), 없으면 제한 없음
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct MatchFilter {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    #[serde(default)]
    pub mode: StatisticMode,
}

impl MatchFilter {
    /// 기간이 뒤집힌 경우 에러 메시지 반환
    pub fn validate(&self) -> Result<(), String> {
        match (self.from, self.to) {
            (Some(from), Some(to)) if from > to => {
                Err(format!("`from` ({}) must not be after `to` ({})", from, to))
            }
            _ => Ok(()),
        }
    }

    /// 삭제 여부와 소유자는 검사하지 않음 (저장소 책임)
    pub fn matches(&self, m: &Match) -> bool {
        if let Some(from) = self.from {
            if m.tournament_date < from {
                return false;
            }
        }
        if let Some(to) = self.to {
            if m.tournament_date > to {
                return false;
            }
        }
        self.mode.accepts(m.stage)
    }
}
