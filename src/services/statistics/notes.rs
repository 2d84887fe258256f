//! Note Ranker
//!
//! 자유 입력 노트 중 가장 자주 등장한 N개를 뽑는다.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// 기본 Top N
pub const DEFAULT_NOTE_LIMIT: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopNote {
    pub note: String,
    pub count: usize,
}

/// 빈 노트(공백만 있는 노트 포함)는 제외, 앞뒤 공백 제거 후 그룹핑
///
/// 같은 횟수는 먼저 등장한 노트가 앞에 온다.
pub fn top_notes<'a, I>(notes: I, limit: usize) -> Vec<TopNote>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut ranked: Vec<TopNote> = Vec::new();
    let mut index: HashMap<&'a str, usize> = HashMap::new();

    for note in notes {
        let note = note.trim();
        if note.is_empty() {
            continue;
        }
        match index.get(note) {
            Some(&pos) => ranked[pos].count += 1,
            None => {
                index.insert(note, ranked.len());
                ranked.push(TopNote {
                    note: note.to_string(),
                    count: 1,
                });
            }
        }
    }

    // stable sort → 동률은 등장 순서 유지
    ranked.sort_by(|a, b| b.count.cmp(&a.count));
    ranked.truncate(limit);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input() {
        assert!(top_notes(Vec::<&str>::new(), DEFAULT_NOTE_LIMIT).is_empty());
    }

    #[test]
    fn test_blank_notes_are_dropped() {
        let notes = ["", "   ", "\t\n"];
        assert!(top_notes(notes, DEFAULT_NOTE_LIMIT).is_empty());
    }

    #[test]
    fn test_groups_by_trimmed_text() {
        let notes = ["late riposte", "  late riposte ", "late riposte\n", "beat"];
        let ranked = top_notes(notes, DEFAULT_NOTE_LIMIT);
        assert_eq!(
            ranked,
            vec![
                TopNote { note: "late riposte".to_string(), count: 3 },
                TopNote { note: "beat".to_string(), count: 1 },
            ]
        );
    }

    #[test]
    fn test_ties_keep_first_encounter_and_truncate() {
        let notes = ["d", "c", "b", "a", "a", "b"];
        let ranked: Vec<String> = top_notes(notes, 3).into_iter().map(|n| n.note).collect();
        assert_eq!(ranked, vec!["b", "a", "d"]);
    }

    #[test]
    fn test_zero_limit() {
        assert!(top_notes(["x"], 0).is_empty());
    }
}
