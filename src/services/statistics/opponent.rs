//! Opponent Grouping & Scoreline Calculator
//!
//! 상대 선수별 전적과 단계(예선/본선)별 평균 점수.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::snapshot::TechniqueTree;
use super::technique_rate::{rank_techniques, ScoringSide, TechniqueStat};
use crate::db::{Marking, Match, MatchStage, Opponent};

/// 평균 점수 (경기가 없으면 0)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreAverage {
    pub my_score: f64,
    pub opponent_score: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StageAverages {
    pub preliminary: ScoreAverage,
    pub main: ScoreAverage,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpponentStat {
    pub opponent: Opponent,
    pub total_matches: usize,
    pub wins: usize,
    pub loses: usize,
    pub average_score: StageAverages,
    pub top_win_techniques: Vec<TechniqueStat>,
    pub top_lose_techniques: Vec<TechniqueStat>,
}

#[derive(Default)]
struct ScoreSum {
    matches: usize,
    my_score: i64,
    opponent_score: i64,
}

impl ScoreSum {
    fn add(&mut self, m: &Match) {
        self.matches += 1;
        self.my_score += i64::from(m.my_score);
        self.opponent_score += i64::from(m.opponent_score);
    }

    fn average(&self) -> ScoreAverage {
        if self.matches == 0 {
            return ScoreAverage::default();
        }
        let n = self.matches as f64;
        ScoreAverage {
            my_score: self.my_score as f64 / n,
            opponent_score: self.opponent_score as f64 / n,
        }
    }
}

/// 단계별 평균 점수
pub fn stage_averages<'a>(matches: impl IntoIterator<Item = &'a Match>) -> StageAverages {
    let mut preliminary = ScoreSum::default();
    let mut main = ScoreSum::default();
    for m in matches {
        match m.stage {
            MatchStage::Preliminary => preliminary.add(m),
            MatchStage::Main => main.add(m),
        }
    }
    StageAverages {
        preliminary: preliminary.average(),
        main: main.average(),
    }
}

/// 상대별 통계
///
/// - 상대가 없는 경기, 스냅샷에 상대 정보가 없는 경기는 제외
/// - 결과 순서는 경기 목록에서 상대가 처음 등장한 순서
/// - 무승부는 승/패 어느 쪽에도 포함되지 않음
pub fn stats_by_opponent(
    matches: &[Match],
    opponents: &HashMap<i64, Opponent>,
    markings_by_match: &HashMap<i64, Vec<&Marking>>,
    tree: &TechniqueTree,
    top_limit: usize,
) -> Vec<OpponentStat> {
    let mut order: Vec<i64> = Vec::new();
    let mut groups: HashMap<i64, Vec<&Match>> = HashMap::new();

    for m in matches {
        let Some(opponent_id) = m.opponent_id else {
            continue;
        };
        if !opponents.contains_key(&opponent_id) {
            tracing::debug!(match_id = m.id, opponent_id, "match skipped: opponent not in snapshot");
            continue;
        }
        groups
            .entry(opponent_id)
            .or_insert_with(|| {
                order.push(opponent_id);
                Vec::new()
            })
            .push(m);
    }

    order
        .into_iter()
        .filter_map(|opponent_id| {
            let opponent = opponents.get(&opponent_id)?.clone();
            let group = groups.remove(&opponent_id)?;

            let wins = group.iter().filter(|m| m.my_score > m.opponent_score).count();
            let loses = group.iter().filter(|m| m.my_score < m.opponent_score).count();

            let group_markings: Vec<&Marking> = group
                .iter()
                .filter_map(|m| markings_by_match.get(&m.id))
                .flatten()
                .copied()
                .collect();

            let mut top_win_techniques =
                rank_techniques(group_markings.iter().copied(), tree, ScoringSide::Scored);
            top_win_techniques.truncate(top_limit);
            let mut top_lose_techniques =
                rank_techniques(group_markings.iter().copied(), tree, ScoringSide::Conceded);
            top_lose_techniques.truncate(top_limit);

            Some(OpponentStat {
                opponent,
                total_matches: group.len(),
                wins,
                loses,
                average_score: stage_averages(group.iter().copied()),
                top_win_techniques,
                top_lose_techniques,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::super::snapshot::fixtures::*;
    use super::*;
    use crate::db::MarkingResult::{Lose, Win};

    fn game(id: i64, opponent_id: Option<i64>, stage: MatchStage, my: i32, theirs: i32) -> Match {
        Match {
            id,
            user_id: 1,
            opponent_id,
            tournament_name: "Open".to_string(),
            tournament_date: "2024-06-01".parse().unwrap(),
            stage,
            my_score: my,
            opponent_score: theirs,
            deleted_at: None,
        }
    }

    fn opponents() -> HashMap<i64, Opponent> {
        [(1, "Kim"), (2, "Lee")]
            .into_iter()
            .map(|(id, name)| {
                (
                    id,
                    Opponent {
                        id,
                        name: name.to_string(),
                        team: "Club".to_string(),
                    },
                )
            })
            .collect()
    }

    #[test]
    fn test_two_main_stage_matches() {
        let matches = vec![
            game(1, Some(1), MatchStage::Main, 15, 10),
            game(2, Some(1), MatchStage::Main, 8, 15),
        ];
        let tree = TechniqueTree::default();
        let stats = stats_by_opponent(&matches, &opponents(), &HashMap::new(), &tree, 3);

        assert_eq!(stats.len(), 1);
        let stat = &stats[0];
        assert_eq!(stat.total_matches, 2);
        assert_eq!(stat.wins, 1);
        assert_eq!(stat.loses, 1);
        assert_eq!(stat.average_score.main.my_score, 11.5);
        assert_eq!(stat.average_score.main.opponent_score, 12.5);
        assert_eq!(stat.average_score.preliminary, ScoreAverage::default());
    }

    #[test]
    fn test_ties_and_missing_opponents() {
        let matches = vec![
            game(1, Some(2), MatchStage::Preliminary, 5, 5),
            game(2, None, MatchStage::Main, 15, 3),
            game(3, Some(9), MatchStage::Main, 15, 3),
            game(4, Some(1), MatchStage::Preliminary, 4, 5),
        ];
        let tree = TechniqueTree::default();
        let stats = stats_by_opponent(&matches, &opponents(), &HashMap::new(), &tree, 3);

        let ids: Vec<i64> = stats.iter().map(|s| s.opponent.id).collect();
        assert_eq!(ids, vec![2, 1]);
        assert_eq!((stats[0].wins, stats[0].loses), (0, 0));
        assert_eq!(stats[0].average_score.preliminary.my_score, 5.0);
        assert_eq!(stats[0].average_score.main, ScoreAverage::default());
    }

    #[test]
    fn test_top_techniques_limited_to_group_matches() {
        let matches = vec![
            game(1, Some(1), MatchStage::Main, 15, 10),
            game(2, Some(2), MatchStage::Main, 15, 10),
        ];
        let tree = TechniqueTree::new(vec![
            technique(1, "attack", None),
            technique(2, "lunge", Some(1)),
            technique(3, "parry", None),
            technique(4, "remise", Some(1)),
        ]);
        let markings = vec![
            marking(1, 1, Win, Some(2), None),
            marking(2, 1, Win, Some(2), None),
            marking(3, 1, Win, Some(3), None),
            marking(4, 1, Win, Some(4), None),
            marking(5, 1, Win, Some(1), None),
            marking(6, 1, Lose, None, Some(3)),
            marking(7, 2, Win, Some(3), None),
        ];
        let by_match = {
            let mut index: HashMap<i64, Vec<&Marking>> = HashMap::new();
            for mk in &markings {
                index.entry(mk.match_id).or_default().push(mk);
            }
            index
        };
        let stats = stats_by_opponent(&matches, &opponents(), &by_match, &tree, 3);

        let kim = &stats[0];
        let win_ids: Vec<i64> = kim.top_win_techniques.iter().map(|t| t.id).collect();
        assert_eq!(win_ids, vec![2, 3, 4]);
        assert_eq!(kim.top_lose_techniques.len(), 1);
        assert_eq!(kim.top_lose_techniques[0].id, 3);

        let lee = &stats[1];
        assert_eq!(lee.top_win_techniques.len(), 1);
        assert!(lee.top_lose_techniques.is_empty());
    }

    #[test]
    fn test_empty_matches() {
        let tree = TechniqueTree::default();
        assert!(stats_by_opponent(&[], &opponents(), &HashMap::new(), &tree, 3).is_empty());
    }
}
