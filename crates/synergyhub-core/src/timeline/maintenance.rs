//! Per-company busy windows built by coalescing time-blocks.

use chrono::{DateTime, Days, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::block::TimeBlock;

/// Largest gap between two periods that still merges them.
pub const MERGE_GAP_DAYS: u64 = 1;

/// A merged, non-overlapping busy window for one company.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaintenancePeriod {
    pub company: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// Synergies whose blocks were folded into this period.
    pub synergy_ids: Vec<String>,
}

/// Merge each company's blocks into a minimal set of busy windows.
///
/// Blocks are sorted by start; a block starting no later than the calendar day
/// after the running period's end extends that period. Time of day is ignored.
pub fn extract_maintenance_periods(
    blocks: &[TimeBlock],
) -> IndexMap<String, Vec<MaintenancePeriod>> {
    let mut by_company: IndexMap<&str, Vec<&TimeBlock>> = IndexMap::new();
    for block in blocks {
        by_company.entry(block.company.as_str()).or_default().push(block);
    }

    by_company
        .into_iter()
        .map(|(company, mut blocks)| {
            blocks.sort_by_key(|b| b.start);
            (company.to_string(), merge_company_blocks(company, &blocks))
        })
        .collect()
}

fn merge_company_blocks(company: &str, sorted: &[&TimeBlock]) -> Vec<MaintenancePeriod> {
    let mut periods: Vec<MaintenancePeriod> = Vec::new();

    for block in sorted {
        if let Some(current) = periods.last_mut() {
            if within_merge_gap(current.end, block.start) {
                current.end = current.end.max(block.end);
                if !current.synergy_ids.contains(&block.synergy_id) {
                    current.synergy_ids.push(block.synergy_id.clone());
                }
                continue;
            }
        }

        periods.push(MaintenancePeriod {
            company: company.to_string(),
            start: block.start,
            end: block.end,
            synergy_ids: vec![block.synergy_id.clone()],
        });
    }

    periods
}

/// True when `next_start` falls on or before the day after `end`.
/// A gap limit past the end of the calendar always merges.
fn within_merge_gap(end: DateTime<Utc>, next_start: DateTime<Utc>) -> bool {
    match end.date_naive().checked_add_days(Days::new(MERGE_GAP_DAYS)) {
        Some(limit) => next_start.date_naive() <= limit,
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Criticality, SynergyState};
    use chrono::TimeZone;

    fn day(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    fn block(synergy: &str, company: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> TimeBlock {
        TimeBlock {
            id: format!("{synergy}-{company}"),
            synergy_id: synergy.to_string(),
            company: company.to_string(),
            material: "Catalyst".to_string(),
            start,
            end,
            volume: 1.0,
            unit: "t".to_string(),
            state: SynergyState::Pending,
            criticality: Criticality::Low,
            savings_share: None,
        }
    }

    #[test]
    fn test_one_day_gap_merges() {
        let blocks = vec![
            block("S1", "A", day(2026, 1, 1), day(2026, 1, 10)),
            block("S2", "A", day(2026, 1, 11), day(2026, 1, 20)),
        ];
        let periods = extract_maintenance_periods(&blocks);
        let a = &periods["A"];
        assert_eq!(a.len(), 1);
        assert_eq!(a[0].start, day(2026, 1, 1));
        assert_eq!(a[0].end, day(2026, 1, 20));
        assert_eq!(a[0].synergy_ids, vec!["S1", "S2"]);
    }

    #[test]
    fn test_next_calendar_day_merges_regardless_of_time() {
        let blocks = vec![
            block(
                "S1",
                "A",
                day(2026, 1, 1),
                Utc.with_ymd_and_hms(2026, 1, 10, 8, 0, 0).unwrap(),
            ),
            block(
                "S2",
                "A",
                Utc.with_ymd_and_hms(2026, 1, 11, 20, 0, 0).unwrap(),
                day(2026, 1, 20),
            ),
        ];
        let periods = extract_maintenance_periods(&blocks);
        assert_eq!(periods["A"].len(), 1);
        assert_eq!(periods["A"][0].end, day(2026, 1, 20));

        let late_evening = Utc.with_ymd_and_hms(2026, 1, 10, 23, 0, 0).unwrap();
        let small_hours = Utc.with_ymd_and_hms(2026, 1, 12, 1, 0, 0).unwrap();
        let two_days_later = vec![
            block("S1", "A", day(2026, 1, 1), late_evening),
            block("S2", "A", small_hours, day(2026, 1, 20)),
        ];
        assert_eq!(extract_maintenance_periods(&two_days_later)["A"].len(), 2);
    }

    #[test]
    fn test_gap_check_near_calendar_end_merges() {
        let end = DateTime::<Utc>::MAX_UTC;
        assert!(within_merge_gap(end, end));
        let blocks = vec![
            block("S1", "A", day(2026, 1, 1), end),
            block("S2", "A", end, end),
        ];
        assert_eq!(extract_maintenance_periods(&blocks)["A"].len(), 1);
    }

    #[test]
    fn test_three_day_gap_stays_separate() {
        let blocks = vec![
            block("S1", "A", day(2026, 1, 1), day(2026, 1, 10)),
            block("S2", "A", day(2026, 1, 13), day(2026, 1, 20)),
        ];
        let periods = extract_maintenance_periods(&blocks);
        assert_eq!(periods["A"].len(), 2);
    }

    #[test]
    fn test_contained_block_does_not_shrink_period() {
        let blocks = vec![
            block("S2", "A", day(2026, 1, 5), day(2026, 1, 8)),
            block("S1", "A", day(2026, 1, 1), day(2026, 1, 31)),
        ];
        let periods = extract_maintenance_periods(&blocks);
        assert_eq!(periods["A"].len(), 1);
        assert_eq!(periods["A"][0].end, day(2026, 1, 31));
    }

    #[test]
    fn test_companies_are_independent() {
        let blocks = vec![
            block("S1", "A", day(2026, 1, 1), day(2026, 1, 10)),
            block("S1", "B", day(2026, 1, 11), day(2026, 1, 20)),
        ];
        let periods = extract_maintenance_periods(&blocks);
        assert_eq!(periods.len(), 2);
        assert_eq!(periods["A"].len(), 1);
        assert_eq!(periods["B"].len(), 1);
        assert!(extract_maintenance_periods(&[]).is_empty());
    }
}
