//! Location Outcome Tabulator

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::db::{Marking, MarkingResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationStat {
    pub location: i32,
    pub win_count: usize,
    pub lose_count: usize,
}

/// 피스트 위치 코드별 득점/실점 (위치 오름차순)
///
/// attempt 마킹과 위치가 없는 마킹은 무시
pub fn stats_by_location(markings: &[Marking]) -> Vec<LocationStat> {
    let mut buckets: BTreeMap<i32, (usize, usize)> = BTreeMap::new();

    for marking in markings {
        let Some(location) = marking.piste_location else {
            continue;
        };
        match marking.result {
            MarkingResult::Win => buckets.entry(location).or_default().0 += 1,
            MarkingResult::Lose => buckets.entry(location).or_default().1 += 1,
            MarkingResult::Attempt => {}
        }
    }

    buckets
        .into_iter()
        .map(|(location, (win_count, lose_count))| LocationStat {
            location,
            win_count,
            lose_count,
        })
        .collect()
}
