//! Configuration Module
//!
//! # Interview Q&A
//!
//! Q: 환경변수 vs 설정 파일, 어떤 방식을 선택했고 왜인가?
//! A: 환경변수를 선택
//!    - 12-Factor App 원칙 준수
//!    - Docker/K8s 배포 시 환경별 설정 분리 용이
//!    - 스냅샷 경로, Top N 같은 값을 배포마다 바꿀 수 있음
//!
//! Q: 설정 검증은 어떻게 하는가?
//! A: from_env()에서 숫자 파싱 실패 → 즉시 실패 (fail-fast)

use std::env;
use anyhow::{Context, Result};

use crate::services::statistics::{
    StatisticsOptions, DEFAULT_NOTE_LIMIT, DEFAULT_TOP_TECHNIQUE_LIMIT,
};

/// 애플리케이션 설정
#[derive(Debug, Clone)]
pub struct Config {
    /// 서버 포트 (기본값: 3001)
    pub port: u16,

    /// 초기 스냅샷 JSON 경로 (옵션, 없으면 빈 저장소)
    pub snapshot_path: Option<String>,

    /// 기술별 Top 노트 개수 (기본값: 3)
    pub top_note_limit: usize,

    /// 상대별 Top 기술 개수 (기본값: 3)
    pub top_technique_limit: usize,

    /// 환경 (development, staging, production)
    pub environment: Environment,

    /// 프로덕션 CORS 허용 origin 목록 (비어 있으면 cross-origin 차단)
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

impl Environment {
    fn parse(raw: &str) -> Self {
        match raw.to_lowercase().as_str() {
            "production" => Environment::Production,
            "staging" => Environment::Staging,
            _ => Environment::Development,
        }
    }
}

impl Config {
    /// 환경변수에서 설정 로드
    ///
    /// # Optional Environment Variables
    ///
    /// - `PORT`: 서버 포트 (기본값: 3001)
    /// - `SNAPSHOT_PATH`: 스냅샷 JSON 경로
    /// - `TOP_NOTE_LIMIT`: Top 노트 개수 (기본값: 3)
    /// - `TOP_TECHNIQUE_LIMIT`: Top 기술 개수 (기본값: 3)
    /// - `ENVIRONMENT`: development | staging | production
    /// - `ALLOWED_ORIGINS`: 콤마 구분 origin 목록 (production에서만 사용)
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// 테스트에서 프로세스 환경변수를 건드리지 않도록 분리
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = Environment::parse(
            &lookup("ENVIRONMENT").unwrap_or_else(|| "development".to_string()),
        );

        Ok(Config {
            port: lookup("PORT")
                .unwrap_or_else(|| "3001".to_string())
                .parse()
                .context("PORT must be a valid number")?,

            snapshot_path: lookup("SNAPSHOT_PATH").filter(|p| !p.trim().is_empty()),

            top_note_limit: match lookup("TOP_NOTE_LIMIT") {
                Some(raw) => raw.parse().context("TOP_NOTE_LIMIT must be a valid number")?,
                None => DEFAULT_NOTE_LIMIT,
            },

            top_technique_limit: match lookup("TOP_TECHNIQUE_LIMIT") {
                Some(raw) => raw
                    .parse()
                    .context("TOP_TECHNIQUE_LIMIT must be a valid number")?,
                None => DEFAULT_TOP_TECHNIQUE_LIMIT,
            },

            environment,

            allowed_origins: lookup("ALLOWED_ORIGINS")
                .map(|raw| {
                    raw.split(',')
                        .map(str::trim)
                        .filter(|origin| !origin.is_empty())
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default(),
        })
    }

    /// 프로덕션 환경인지 확인
    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }

    pub fn statistics_options(&self) -> StatisticsOptions {
        StatisticsOptions {
            note_limit: self.top_note_limit,
            top_technique_limit: self.top_technique_limit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        // 환경변수 없이 기본값으로 설정 생성
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.port, 3001);
        assert_eq!(config.environment, Environment::Development);
        assert_eq!(config.statistics_options(), StatisticsOptions::default());
        assert!(config.snapshot_path.is_none());
        assert!(config.allowed_origins.is_empty());
    }

    #[test]
    fn test_allowed_origins_split_and_trimmed() {
        let config = Config::from_lookup(lookup(&[(
            "ALLOWED_ORIGINS",
            "https://stats.example.org, https://coach.example.org,,",
        )]))
        .unwrap();
        assert_eq!(
            config.allowed_origins,
            vec!["https://stats.example.org", "https://coach.example.org"]
        );
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("PORT", "8080"),
            ("ENVIRONMENT", "Production"),
            ("SNAPSHOT_PATH", "/data/snapshot.json"),
            ("TOP_NOTE_LIMIT", "5"),
        ]))
        .unwrap();
        assert_eq!(config.port, 8080);
        assert!(config.is_production());
        assert_eq!(config.snapshot_path.as_deref(), Some("/data/snapshot.json"));
        assert_eq!(config.top_note_limit, 5);
        assert_eq!(config.top_technique_limit, DEFAULT_TOP_TECHNIQUE_LIMIT);
    }

    #[test]
    fn test_invalid_number_fails_fast() {
        assert!(Config::from_lookup(lookup(&[("PORT", "abc")])).is_err());
        assert!(Config::from_lookup(lookup(&[("TOP_NOTE_LIMIT", "-1")])).is_err());
    }
}
