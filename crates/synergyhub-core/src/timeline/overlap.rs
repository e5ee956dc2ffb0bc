//! Month-bucket overlap detection across companies.
//!
//! A block counts toward a month when that month falls between the start of
//! the block's first month and the end of its last month. Two companies whose
//! windows touch the same month are reported as overlapping even if their
//! exact date ranges never intersect inside it.

use chrono::{DateTime, Utc};
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

use super::block::TimeBlock;
use super::calendar::{end_of_month, month_key, start_of_month};

/// Fewest distinct companies that make a month an overlap.
pub const MIN_OVERLAP_COMPANIES: usize = 2;

/// Marker that several companies are active in the same month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverlapIndicator {
    pub id: String,
    pub month: DateTime<Utc>,
    pub companies: Vec<String>,
    pub synergy_ids: Vec<String>,
    pub total_volume: f64,
    pub total_savings: f64,
}

/// One indicator per month with at least [`MIN_OVERLAP_COMPANIES`] companies.
pub fn compute_overlaps(blocks: &[TimeBlock], months: &[DateTime<Utc>]) -> Vec<OverlapIndicator> {
    let mut overlaps = Vec::new();

    for &month in months {
        // company -> synergy -> first matching block
        let mut active: IndexMap<&str, IndexMap<&str, &TimeBlock>> = IndexMap::new();

        for block in blocks {
            if month >= start_of_month(block.start) && month <= end_of_month(block.end) {
                active
                    .entry(block.company.as_str())
                    .or_default()
                    .entry(block.synergy_id.as_str())
                    .or_insert(block);
            }
        }

        if active.len() < MIN_OVERLAP_COMPANIES {
            continue;
        }

        let mut synergy_ids: IndexSet<&str> = IndexSet::new();
        let mut total_volume = 0.0;
        let mut total_savings = 0.0;
        for per_synergy in active.values() {
            for (synergy_id, block) in per_synergy {
                synergy_ids.insert(synergy_id);
                total_volume += block.volume;
                total_savings += block.savings_share.unwrap_or(0.0);
            }
        }

        overlaps.push(OverlapIndicator {
            id: format!("overlap-{}", month_key(month)),
            month,
            companies: active.keys().map(|c| c.to_string()).collect(),
            synergy_ids: synergy_ids.into_iter().map(str::to_string).collect(),
            total_volume,
            total_savings,
        });
    }

    tracing::debug!(months = months.len(), overlaps = overlaps.len(), "computed overlaps");
    overlaps
}
