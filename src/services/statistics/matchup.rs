//! Tactic Matchup Matrix Builder
//!
//! # Interview Q&A
//!
//! Q: Main vs Main 상성은 어떻게 집계하는가?
//! A: 각 main tactic을 "자신 + 하위 기술" 묶음으로 펼친 뒤 합산
//!
//!    ```text
//!    attack = {attack, lunge, fleche}     defense = {defense, parry}
//!
//!    attack vs defense = Σ count(my ∈ attack, opp ∈ defense)
//!    ```
//!
//!    - 하위 상성(subMatchups)은 정확한 (기술, 기술) 쌍 단위
//!    - (main, main) 쌍은 상위 항목에 이미 포함 → 하위 목록에서 제외
//!    - 그래서 상위 합계 = 하위 합계 + main vs main 직접 마킹 (중복 없음)
//!
//! Q: 마킹을 쌍마다 다시 스캔하지 않는 이유는?
//! A: (내 기술, 상대 기술) 쌍으로 한 번만 색인
//!    - 스캔: O(E) 한 번
//!    - 조회: O(M² · S²) 해시 조회

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::snapshot::TechniqueTree;
use super::technique_rate::{rank_techniques, ScoringSide};
use crate::db::{Marking, MarkingResult, Technique};

/// 쌍 하나의 결과 카운트
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutcomeCounts {
    pub win: usize,
    pub lose: usize,
    pub attempt: usize,
}

impl OutcomeCounts {
    fn record(&mut self, result: MarkingResult) {
        match result {
            MarkingResult::Win => self.win += 1,
            MarkingResult::Lose => self.lose += 1,
            MarkingResult::Attempt => self.attempt += 1,
        }
    }

    fn merge(&mut self, other: OutcomeCounts) {
        self.win += other.win;
        self.lose += other.lose;
        self.attempt += other.attempt;
    }

    pub fn total(&self) -> usize {
        self.win + self.lose + self.attempt
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// 0-100, 득점+실점이 없으면 0
    pub fn win_rate(&self) -> f64 {
        let decided = self.win + self.lose;
        if decided == 0 {
            return 0.0;
        }
        self.win as f64 / decided as f64 * 100.0
    }
}

/// (내 기술 id, 상대 기술 id) → 카운트
///
/// 양쪽 기술이 모두 live인 마킹만 색인
#[derive(Debug, Clone, Default)]
pub struct PairIndex {
    counts: HashMap<(i64, i64), OutcomeCounts>,
}

impl PairIndex {
    pub fn build<'a>(markings: impl IntoIterator<Item = &'a Marking>, tree: &TechniqueTree) -> Self {
        let mut counts: HashMap<(i64, i64), OutcomeCounts> = HashMap::new();
        for marking in markings {
            let (Some(mine), Some(theirs)) = (
                tree.resolve(marking.my_technique_id),
                tree.resolve(marking.opponent_technique_id),
            ) else {
                continue;
            };
            counts
                .entry((mine.id, theirs.id))
                .or_default()
                .record(marking.result);
        }
        Self { counts }
    }

    pub fn get(&self, my_id: i64, opponent_id: i64) -> OutcomeCounts {
        self.counts
            .get(&(my_id, opponent_id))
            .copied()
            .unwrap_or_default()
    }

    pub fn sum(&self, my_ids: &[i64], opponent_ids: &[i64]) -> OutcomeCounts {
        let mut total = OutcomeCounts::default();
        for my_id in my_ids {
            for opponent_id in opponent_ids {
                total.merge(self.get(*my_id, *opponent_id));
            }
        }
        total
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TacticScoreStat {
    pub id: i64,
    pub name: String,
    pub count: usize,
    pub is_main: bool,
    pub parent_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TacticRef {
    pub id: i64,
    pub name: String,
    pub is_main: bool,
    pub parent_id: Option<i64>,
}

impl TacticRef {
    fn of(technique: &Technique) -> Self {
        Self {
            id: technique.id,
            name: technique.name.clone(),
            is_main: technique.parent_id.is_none(),
            parent_id: technique.parent_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchupDetail {
    pub my_tactic: TacticRef,
    pub opponent_tactic: TacticRef,
    pub win_count: usize,
    pub lose_count: usize,
    pub attempt_count: usize,
    /// 0-100
    pub win_rate: f64,
    /// Main을 눌렀을 때 보여줄 하위 상성
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sub_matchups: Vec<MatchupDetail>,
}

impl MatchupDetail {
    fn new(mine: &Technique, theirs: &Technique, counts: OutcomeCounts) -> Self {
        Self {
            my_tactic: TacticRef::of(mine),
            opponent_tactic: TacticRef::of(theirs),
            win_count: counts.win,
            lose_count: counts.lose,
            attempt_count: counts.attempt,
            win_rate: counts.win_rate(),
            sub_matchups: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TacticReport {
    /// 득점한 횟수가 많은 main tactic
    pub top_scoring_tactics: Vec<TacticScoreStat>,
    /// 실점을 가장 많이 당한 상대 main tactic
    pub top_conceded_tactics: Vec<TacticScoreStat>,
    pub tactic_matchups: Vec<MatchupDetail>,
}

/// main tactic을 직접 참조한 득점/실점 횟수
///
/// 하위 기술 마킹은 상위로 올려 세지 않음
pub fn top_tactics<'a>(
    markings: impl IntoIterator<Item = &'a Marking>,
    tree: &TechniqueTree,
    side: ScoringSide,
) -> Vec<TacticScoreStat> {
    rank_techniques(markings, tree, side)
        .into_iter()
        .filter(|stat| stat.is_main_technique)
        .map(|stat| TacticScoreStat {
            id: stat.id,
            name: stat.name,
            count: stat.count,
            is_main: true,
            parent_id: None,
        })
        .collect()
}

/// 모든 (main, main) 쌍의 상성 행렬
pub fn build_matchups(index: &PairIndex, tree: &TechniqueTree) -> Vec<MatchupDetail> {
    let mains = tree.main_tactics();
    let families: HashMap<i64, Vec<&Technique>> = mains
        .iter()
        .map(|main| {
            let family = tree
                .family(main.id)
                .into_iter()
                .filter_map(|id| tree.get(id))
                .collect();
            (main.id, family)
        })
        .collect();

    let mut matchups = Vec::new();
    for my_main in &mains {
        let my_family = &families[&my_main.id];
        let my_ids: Vec<i64> = my_family.iter().map(|t| t.id).collect();

        for opp_main in &mains {
            let opp_family = &families[&opp_main.id];
            let opp_ids: Vec<i64> = opp_family.iter().map(|t| t.id).collect();

            let mut sub_matchups = Vec::new();
            for mine in my_family {
                for theirs in opp_family {
                    if mine.id == my_main.id && theirs.id == opp_main.id {
                        continue;
                    }
                    let counts = index.get(mine.id, theirs.id);
                    if !counts.is_empty() {
                        sub_matchups.push(MatchupDetail::new(mine, theirs, counts));
                    }
                }
            }

            let counts = index.sum(&my_ids, &opp_ids);
            if counts.is_empty() && sub_matchups.is_empty() {
                continue;
            }

            let mut detail = MatchupDetail::new(my_main, opp_main, counts);
            detail.sub_matchups = sub_matchups;
            matchups.push(detail);
        }
    }
    matchups
}

/// 사용자 마킹 기준 tactic 리포트
pub fn tactic_matchups(user_id: i64, markings: &[Marking], tree: &TechniqueTree) -> TacticReport {
    let own: Vec<&Marking> = markings.iter().filter(|m| m.user_id == user_id).collect();
    let index = PairIndex::build(own.iter().copied(), tree);

    tracing::debug!(
        user_id,
        markings = own.len(),
        pairs = index.len(),
        "tactic pair index built"
    );

    TacticReport {
        top_scoring_tactics: top_tactics(own.iter().copied(), tree, ScoringSide::Scored),
        top_conceded_tactics: top_tactics(own.iter().copied(), tree, ScoringSide::Conceded),
        tactic_matchups: build_matchups(&index, tree),
    }
}

#[cfg(test)]
mod tests {
    use super::super::snapshot::fixtures::*;
    use super::*;
    use crate::db::MarkingResult::{Attempt, Lose, Win};

    // attack(1) = {lunge(2), fleche(3)}, defense(4) = {parry(5)}
    fn tree() -> TechniqueTree {
        TechniqueTree::new(vec![
            technique(1, "attack", None),
            technique(2, "lunge", Some(1)),
            technique(3, "fleche", Some(1)),
            technique(4, "defense", None),
            technique(5, "parry", Some(4)),
            deleted(technique(6, "feint", Some(4))),
        ])
    }

    fn find<'a>(report: &'a TacticReport, my: i64, opp: i64) -> Option<&'a MatchupDetail> {
        report
            .tactic_matchups
            .iter()
            .find(|m| m.my_tactic.id == my && m.opponent_tactic.id == opp)
    }

    #[test]
    fn test_main_pair_aggregates_family() {
        let markings = vec![
            marking(1, 1, Win, Some(1), Some(4)),
            marking(2, 1, Win, Some(2), Some(5)),
            marking(3, 1, Lose, Some(3), Some(4)),
            marking(4, 1, Attempt, Some(2), Some(4)),
            marking(5, 1, Win, Some(2), Some(6)),
        ];
        let report = tactic_matchups(1, &markings, &tree());

        let detail = find(&report, 1, 4).unwrap();
        assert_eq!(detail.win_count, 2);
        assert_eq!(detail.lose_count, 1);
        assert_eq!(detail.attempt_count, 1);
        assert!((detail.win_rate - 200.0 / 3.0).abs() < 1e-9);

        let subs: Vec<(i64, i64)> = detail
            .sub_matchups
            .iter()
            .map(|s| (s.my_tactic.id, s.opponent_tactic.id))
            .collect();
        assert_eq!(subs, vec![(2, 4), (2, 5), (3, 4)]);
        assert!(detail.sub_matchups.iter().all(|s| s.sub_matchups.is_empty()));

        assert!(find(&report, 4, 1).is_none());
        assert_eq!(report.tactic_matchups.len(), 1);
    }

    #[test]
    fn test_no_double_counting() {
        let markings = vec![
            marking(1, 1, Win, Some(1), Some(4)),
            marking(2, 1, Lose, Some(1), Some(4)),
            marking(3, 1, Win, Some(2), Some(5)),
            marking(4, 1, Lose, Some(3), Some(5)),
            marking(5, 1, Win, Some(1), Some(5)),
        ];
        let report = tactic_matchups(1, &markings, &tree());
        let detail = find(&report, 1, 4).unwrap();

        let sub_decided: usize = detail
            .sub_matchups
            .iter()
            .map(|s| s.win_count + s.lose_count)
            .sum();
        let main_vs_main = 2;
        assert_eq!(detail.win_count + detail.lose_count, sub_decided + main_vs_main);
    }

    #[test]
    fn test_same_main_pair_included() {
        let markings = vec![marking(1, 1, Lose, Some(2), Some(3))];
        let report = tactic_matchups(1, &markings, &tree());
        let detail = find(&report, 1, 1).unwrap();
        assert_eq!(detail.lose_count, 1);
        assert_eq!(detail.win_rate, 0.0);
        assert_eq!(detail.sub_matchups.len(), 1);
    }

    #[test]
    fn test_attempt_only_pair_has_zero_rate() {
        let markings = vec![marking(1, 1, Attempt, Some(1), Some(4))];
        let report = tactic_matchups(1, &markings, &tree());
        let detail = find(&report, 1, 4).unwrap();
        assert_eq!(detail.attempt_count, 1);
        assert_eq!(detail.win_rate, 0.0);
        assert!(detail.sub_matchups.is_empty());
    }

    #[test]
    fn test_top_tactics_count_direct_main_references() {
        let markings = vec![
            marking(1, 1, Win, Some(4), None),
            marking(2, 1, Win, Some(1), None),
            marking(3, 1, Win, Some(1), None),
            marking(4, 1, Win, Some(2), None),
            marking(5, 1, Lose, None, Some(4)),
            marking(6, 1, Lose, None, Some(5)),
        ];
        let report = tactic_matchups(1, &markings, &tree());

        let scoring: Vec<(i64, usize)> = report
            .top_scoring_tactics
            .iter()
            .map(|t| (t.id, t.count))
            .collect();
        assert_eq!(scoring, vec![(1, 2), (4, 1)]);
        assert!(report.top_scoring_tactics.iter().all(|t| t.is_main && t.parent_id.is_none()));

        assert_eq!(report.top_conceded_tactics.len(), 1);
        assert_eq!(report.top_conceded_tactics[0].id, 4);
        // 한쪽 기술만 있는 마킹은 상성에 포함되지 않음
        assert!(report.tactic_matchups.is_empty());
    }

    #[test]
    fn test_other_users_markings_ignored() {
        let mut foreign = marking(1, 1, Win, Some(1), Some(4));
        foreign.user_id = 2;
        let report = tactic_matchups(1, &[foreign], &tree());
        assert_eq!(report, TacticReport::default());
    }

    #[test]
    fn test_pair_index_sum() {
        let markings = vec![
            marking(1, 1, Win, Some(2), Some(5)),
            marking(2, 1, Win, Some(2), Some(5)),
            marking(3, 1, Lose, Some(3), Some(4)),
        ];
        let index = PairIndex::build(&markings, &tree());
        assert_eq!(index.len(), 2);
        assert_eq!(index.get(2, 5).win, 2);
        let total = index.sum(&[1, 2, 3], &[4, 5]);
        assert_eq!((total.win, total.lose, total.attempt), (2, 1, 0));
    }
}
