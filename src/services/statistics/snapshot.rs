//! Statistics Snapshot
//!
//! 요청 시작 시 한 번 조회한 행들을 묶은 불변 스냅샷과
//! 기술 계층(main → sub)을 id로 색인한 arena.

use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};

use crate::db::{Marking, Match, Opponent, Technique, TechniqueAttempt};

/// 기술 계층 arena
///
/// # Design Decision
///
/// - 기술 행은 id → Technique 로 색인
/// - `parent_id → [child_id]` 색인은 생성 시 한 번만 계산
/// - 자신 또는 상위 기술이 삭제되었으면 live 아님 (cascade)
#[derive(Debug, Clone, Default)]
pub struct TechniqueTree {
    nodes: BTreeMap<i64, Technique>,
    children: HashMap<i64, Vec<i64>>,
    live: HashSet<i64>,
}

impl TechniqueTree {
    pub fn new(techniques: impl IntoIterator<Item = Technique>) -> Self {
        let nodes: BTreeMap<i64, Technique> =
            techniques.into_iter().map(|t| (t.id, t)).collect();

        // BTreeMap 순회 → 자식 목록은 id 오름차순
        let mut children: HashMap<i64, Vec<i64>> = HashMap::new();
        for t in nodes.values() {
            if let Some(parent_id) = t.parent_id {
                children.entry(parent_id).or_default().push(t.id);
            }
        }

        let live = nodes
            .keys()
            .copied()
            .filter(|id| Self::chain_is_live(&nodes, *id))
            .collect();

        Self {
            nodes,
            children,
            live,
        }
    }

    // 순환 참조는 live 아님으로 처리
    fn chain_is_live(nodes: &BTreeMap<i64, Technique>, id: i64) -> bool {
        let mut current = Some(id);
        let mut steps = 0;
        while let Some(cur) = current {
            let Some(node) = nodes.get(&cur) else {
                // 스냅샷에 없는 상위 기술은 판단 불가 → 여기서 중단
                return true;
            };
            if node.deleted_at.is_some() {
                return false;
            }
            steps += 1;
            if steps > nodes.len() {
                return false;
            }
            current = node.parent_id;
        }
        true
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// 삭제 여부와 관계없이 조회
    pub fn get(&self, id: i64) -> Option<&Technique> {
        self.nodes.get(&id)
    }

    pub fn is_live(&self, id: i64) -> bool {
        self.live.contains(&id)
    }

    /// 마킹의 기술 참조 해석
    ///
    /// null, 스냅샷에 없는 id, 삭제된 기술은 모두 `None`
    pub fn resolve(&self, id: Option<i64>) -> Option<&Technique> {
        let id = id?;
        if self.is_live(id) {
            self.nodes.get(&id)
        } else {
            None
        }
    }

    /// `isMainTechnique`의 단일 기준
    pub fn is_main(&self, id: i64) -> bool {
        self.nodes
            .get(&id)
            .map(|t| t.parent_id.is_none())
            .unwrap_or(false)
    }

    /// live main tactic (id 오름차순)
    pub fn main_tactics(&self) -> Vec<&Technique> {
        self.nodes
            .values()
            .filter(|t| t.parent_id.is_none() && self.is_live(t.id))
            .collect()
    }

    /// live 직계 자식 (id 오름차순)
    pub fn children(&self, id: i64) -> Vec<&Technique> {
        self.children
            .get(&id)
            .into_iter()
            .flatten()
            .filter(|child| self.is_live(**child))
            .filter_map(|child| self.nodes.get(child))
            .collect()
    }

    /// 모든 하위 기술 (깊이 제한 없음, BFS 순서, 삭제 포함)
    pub fn descendants(&self, id: i64) -> Vec<i64> {
        let mut out = Vec::new();
        let mut seen = HashSet::from([id]);
        let mut queue = VecDeque::from([id]);

        while let Some(cur) = queue.pop_front() {
            for child in self.children.get(&cur).into_iter().flatten() {
                if seen.insert(*child) {
                    out.push(*child);
                    queue.push_back(*child);
                }
            }
        }
        out
    }

    /// 기술 삭제 시 함께 soft-delete 되어야 하는 id 집합
    pub fn cascade_ids(&self, id: i64) -> Vec<i64> {
        let mut ids = vec![id];
        ids.extend(self.descendants(id));
        ids
    }

    /// 자신 + live 하위 기술 (matchup 집계 단위)
    pub fn family(&self, id: i64) -> Vec<i64> {
        if !self.is_live(id) {
            return Vec::new();
        }
        let mut ids = vec![id];
        ids.extend(self.descendants(id).into_iter().filter(|d| self.is_live(*d)));
        ids
    }
}

/// 통계 계산 한 번에 사용하는 불변 스냅샷
///
/// `user_id` 소유가 아닌 경기/마킹/시도/기술 행은 생성 시 제외
#[derive(Debug, Clone, Default)]
pub struct StatsSnapshot {
    pub user_id: i64,
    pub matches: Vec<Match>,
    pub opponents: HashMap<i64, Opponent>,
    pub markings: Vec<Marking>,
    pub attempts: Vec<TechniqueAttempt>,
    pub tree: TechniqueTree,
}

impl StatsSnapshot {
    pub fn new(
        user_id: i64,
        matches: Vec<Match>,
        opponents: Vec<Opponent>,
        markings: Vec<Marking>,
        attempts: Vec<TechniqueAttempt>,
        techniques: Vec<Technique>,
    ) -> Self {
        Self {
            user_id,
            matches: matches.into_iter().filter(|m| m.user_id == user_id).collect(),
            opponents: opponents.into_iter().map(|o| (o.id, o)).collect(),
            markings: markings.into_iter().filter(|m| m.user_id == user_id).collect(),
            attempts: attempts.into_iter().filter(|a| a.user_id == user_id).collect(),
            tree: TechniqueTree::new(techniques.into_iter().filter(|t| t.user_id == user_id)),
        }
    }

    /// 경기 없는 빈 스냅샷
    pub fn empty(user_id: i64) -> Self {
        Self {
            user_id,
            ..Default::default()
        }
    }

    pub fn match_ids(&self) -> Vec<i64> {
        self.matches.iter().map(|m| m.id).collect()
    }

    /// match_id → 해당 경기 마킹 (원래 순서 유지)
    pub fn markings_by_match(&self) -> HashMap<i64, Vec<&Marking>> {
        let mut index: HashMap<i64, Vec<&Marking>> = HashMap::new();
        for marking in &self.markings {
            index.entry(marking.match_id).or_default().push(marking);
        }
        index
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    fn tree() -> TechniqueTree {
        TechniqueTree::new(vec![
            technique(1, "attack", None),
            technique(2, "lunge", Some(1)),
            technique(3, "fleche", Some(1)),
            technique(4, "defense", None),
            deleted(technique(5, "parry", Some(4))),
            technique(6, "counter", Some(4)),
        ])
    }

    #[test]
    fn test_main_tactics_and_children() {
        let tree = tree();
        let mains: Vec<i64> = tree.main_tactics().iter().map(|t| t.id).collect();
        assert_eq!(mains, vec![1, 4]);

        let kids: Vec<i64> = tree.children(4).iter().map(|t| t.id).collect();
        assert_eq!(kids, vec![6]);
        assert!(tree.is_main(1));
        assert!(!tree.is_main(2));
    }

    #[test]
    fn test_resolve_skips_deleted_and_unknown() {
        let tree = tree();
        assert!(tree.resolve(Some(2)).is_some());
        assert!(tree.resolve(Some(5)).is_none());
        assert!(tree.resolve(Some(99)).is_none());
        assert!(tree.resolve(None).is_none());
    }

    #[test]
    fn test_deleted_parent_cascades_to_children() {
        let tree = TechniqueTree::new(vec![
            deleted(technique(1, "attack", None)),
            technique(2, "lunge", Some(1)),
        ]);
        assert!(!tree.is_live(1));
        assert!(!tree.is_live(2));
        assert!(tree.main_tactics().is_empty());
        assert!(tree.family(1).is_empty());
    }

    #[test]
    fn test_descendants_arbitrary_depth() {
        let tree = TechniqueTree::new(vec![
            technique(1, "root", None),
            technique(2, "a", Some(1)),
            technique(3, "b", Some(2)),
            technique(4, "c", Some(3)),
            technique(5, "d", Some(1)),
        ]);
        assert_eq!(tree.descendants(1), vec![2, 5, 3, 4]);
        assert_eq!(tree.cascade_ids(2), vec![2, 3, 4]);
        assert!(tree.descendants(4).is_empty());
    }

    #[test]
    fn test_cycle_is_not_live_and_terminates() {
        let tree = TechniqueTree::new(vec![
            technique(1, "a", Some(2)),
            technique(2, "b", Some(1)),
        ]);
        assert!(!tree.is_live(1));
        assert_eq!(tree.descendants(1), vec![2]);
    }

    #[test]
    fn test_family_excludes_deleted_descendants() {
        let tree = tree();
        assert_eq!(tree.family(4), vec![4, 6]);
        assert_eq!(tree.family(1), vec![1, 2, 3]);
    }

    #[test]
    fn test_new_keeps_only_owned_rows() {
        let mut foreign = marking(2, 10, crate::db::MarkingResult::Win, Some(1), None);
        foreign.user_id = 2;
        let mut foreign_technique = technique(9, "flick", None);
        foreign_technique.user_id = 2;

        let snapshot = StatsSnapshot::new(
            1,
            vec![],
            vec![],
            vec![marking(1, 10, crate::db::MarkingResult::Win, Some(1), None), foreign],
            vec![],
            vec![technique(1, "attack", None), foreign_technique],
        );
        let ids: Vec<i64> = snapshot.markings.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![1]);
        assert!(snapshot.tree.get(9).is_none());
        assert!(snapshot.tree.is_live(1));
    }

    #[test]
    fn test_markings_by_match_keeps_order() {
        let snapshot = StatsSnapshot {
            markings: vec![
                marking(1, 10, crate::db::MarkingResult::Win, None, None),
                marking(2, 11, crate::db::MarkingResult::Win, None, None),
                marking(3, 10, crate::db::MarkingResult::Lose, None, None),
            ],
            ..StatsSnapshot::empty(1)
        };
        let index = snapshot.markings_by_match();
        let ids: Vec<i64> = index[&10].iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }
}
