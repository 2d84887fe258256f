//! Per-Technique Rate Calculator
//!
//! # Interview Q&A
//!
//! Q: 삭제된 기술을 참조하는 마킹은 어떻게 처리하는가?
//! A: 마킹 자체를 집계에서 제외
//!    - 카운트가 0인 항목으로 남기지 않음 (결과 맵에 키가 없어야 함)
//!    - 스냅샷에 없는 id, null 참조도 동일하게 건너뜀
//!
//! Q: 패배(lossCount) 쪽 topNotes는 어디서 오는가?
//! A: 같은 기술 id로 "득점한" 마킹의 노트
//!    - 기존 서비스 동작을 그대로 유지 (패배 마킹의 노트가 아님)
//!    - 제품 쪽 확인 전까지 변경하지 않음

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use super::notes::{top_notes, TopNote};
use super::snapshot::TechniqueTree;
use crate::db::{Marking, MarkingResult, TechniqueAttempt};

/// 어느 쪽 기술을 집계할지
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoringSide {
    /// 득점 (win 마킹, 내 기술)
    Scored,
    /// 실점 (lose 마킹, 상대 기술)
    Conceded,
}

impl ScoringSide {
    pub fn result(self) -> MarkingResult {
        match self {
            ScoringSide::Scored => MarkingResult::Win,
            ScoringSide::Conceded => MarkingResult::Lose,
        }
    }

    pub fn technique_id(self, marking: &Marking) -> Option<i64> {
        match self {
            ScoringSide::Scored => marking.my_technique_id,
            ScoringSide::Conceded => marking.opponent_technique_id,
        }
    }
}

/// 기술별 득점/실점 횟수
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TechniqueStat {
    pub id: i64,
    pub name: String,
    pub count: usize,
    pub is_main_technique: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatisticSummary {
    pub win: Vec<TechniqueStat>,
    pub lose: Vec<TechniqueStat>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WinRateEntry {
    pub name: String,
    pub attempt_count: i64,
    pub win_count: usize,
    pub top_notes: Vec<TopNote>,
    pub is_main_technique: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LossCountEntry {
    pub name: String,
    pub count: usize,
    pub top_notes: Vec<TopNote>,
    pub is_main_technique: bool,
}

/// 기술별 횟수 (내림차순, 동률은 처음 등장한 순서)
pub fn rank_techniques<'a, I>(markings: I, tree: &TechniqueTree, side: ScoringSide) -> Vec<TechniqueStat>
where
    I: IntoIterator<Item = &'a Marking>,
{
    let mut ranked: Vec<TechniqueStat> = Vec::new();
    let mut index: HashMap<i64, usize> = HashMap::new();

    for marking in markings {
        if marking.result != side.result() {
            continue;
        }
        let Some(technique) = tree.resolve(side.technique_id(marking)) else {
            continue;
        };
        match index.get(&technique.id) {
            Some(&pos) => ranked[pos].count += 1,
            None => {
                index.insert(technique.id, ranked.len());
                ranked.push(TechniqueStat {
                    id: technique.id,
                    name: technique.name.clone(),
                    count: 1,
                    is_main_technique: tree.is_main(technique.id),
                });
            }
        }
    }

    ranked.sort_by(|a, b| b.count.cmp(&a.count));
    ranked
}

/// 득점 기술 / 실점 기술 요약
pub fn summarize<'a, I>(markings: I, tree: &TechniqueTree) -> StatisticSummary
where
    I: IntoIterator<Item = &'a Marking> + Clone,
{
    StatisticSummary {
        win: rank_techniques(markings.clone(), tree, ScoringSide::Scored),
        lose: rank_techniques(markings, tree, ScoringSide::Conceded),
    }
}

/// 내 기술 id → 해당 기술로 득점한 마킹의 Top 노트
pub fn win_notes_by_technique(
    markings: &[Marking],
    tree: &TechniqueTree,
    limit: usize,
) -> HashMap<i64, Vec<TopNote>> {
    let mut grouped: HashMap<i64, Vec<&str>> = HashMap::new();
    for marking in markings.iter().filter(|m| m.result == MarkingResult::Win) {
        if let Some(technique) = tree.resolve(marking.my_technique_id) {
            grouped
                .entry(technique.id)
                .or_default()
                .push(marking.note.as_str());
        }
    }

    grouped
        .into_iter()
        .map(|(id, notes)| (id, top_notes(notes, limit)))
        .collect()
}

/// 기술별 시도 횟수 / 득점 횟수
pub fn win_rate_by_technique(
    attempts: &[TechniqueAttempt],
    markings: &[Marking],
    tree: &TechniqueTree,
    note_limit: usize,
) -> BTreeMap<i64, WinRateEntry> {
    let mut entries: BTreeMap<i64, WinRateEntry> = BTreeMap::new();

    for attempt in attempts {
        match win_rate_entry(&mut entries, tree, attempt.technique_id) {
            Some(entry) => entry.attempt_count += attempt.attempt_count,
            None => {
                tracing::debug!(technique_id = attempt.technique_id, "attempt skipped: technique not live");
            }
        }
    }

    for marking in markings.iter().filter(|m| m.result == MarkingResult::Win) {
        let Some(id) = marking.my_technique_id else {
            continue;
        };
        if let Some(entry) = win_rate_entry(&mut entries, tree, id) {
            entry.win_count += 1;
        }
    }

    let mut notes = win_notes_by_technique(markings, tree, note_limit);
    for (id, entry) in entries.iter_mut() {
        entry.top_notes = notes.remove(id).unwrap_or_default();
    }

    entries
}

// 처음 참조될 때 0으로 생성, live 아니면 None
fn win_rate_entry<'e>(
    entries: &'e mut BTreeMap<i64, WinRateEntry>,
    tree: &TechniqueTree,
    id: i64,
) -> Option<&'e mut WinRateEntry> {
    let technique = tree.resolve(Some(id))?;
    Some(entries.entry(id).or_insert_with(|| WinRateEntry {
        name: technique.name.clone(),
        attempt_count: 0,
        win_count: 0,
        top_notes: Vec::new(),
        is_main_technique: tree.is_main(id),
    }))
}

/// 상대 기술별 실점 횟수
pub fn loss_count_by_technique(
    markings: &[Marking],
    tree: &TechniqueTree,
    note_limit: usize,
) -> BTreeMap<i64, LossCountEntry> {
    let mut entries: BTreeMap<i64, LossCountEntry> = BTreeMap::new();

    for marking in markings.iter().filter(|m| m.result == MarkingResult::Lose) {
        let Some(technique) = tree.resolve(marking.opponent_technique_id) else {
            continue;
        };
        entries
            .entry(technique.id)
            .or_insert_with(|| LossCountEntry {
                name: technique.name.clone(),
                count: 0,
                top_notes: Vec::new(),
                is_main_technique: tree.is_main(technique.id),
            })
            .count += 1;
    }

    // 득점 마킹 노트 사용 (모듈 설명 참고)
    let mut notes = win_notes_by_technique(markings, tree, note_limit);
    for (id, entry) in entries.iter_mut() {
        entry.top_notes = notes.remove(id).unwrap_or_default();
    }

    entries
}
