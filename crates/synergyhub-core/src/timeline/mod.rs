//! Timeline layout engine.
//!
//! Turns synergies into a multi-company Gantt view:
//! - one [`TimeBlock`] per (synergy × participating company)
//! - swim lanes grouped by company
//! - a 12-month axis with linear date-to-pixel mapping
//! - month-bucket overlap indicators
//! - merged per-company maintenance periods
//! - point-in-time milestones shown above the lanes
//!
//! Every function here is pure. Nothing panics on empty or inverted input.

mod block;
mod calendar;
mod events;
mod maintenance;
mod overlap;
mod range;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::model::Synergy;

pub use block::{
    company_color, group_by_company, lanes_active_at, transform_to_blocks, SwimLane, TimeBlock,
    NEUTRAL_LANE_COLOR,
};
pub use calendar::{add_months, end_of_month, month_key, start_of_month};
pub use events::{
    extract_all_timeline_events, extract_timeline_events, group_events_by_date, TimelineEvent,
    TimelineEventKind,
};
pub use maintenance::{extract_maintenance_periods, MaintenancePeriod, MERGE_GAP_DAYS};
pub use overlap::{compute_overlaps, OverlapIndicator, MIN_OVERLAP_COMPANIES};
pub use range::{
    block_width, compute_date_range, compute_date_range_at, date_position, DateRange,
    MIN_BLOCK_WIDTH_PX, TIMELINE_MONTHS,
};

/// Everything a timeline view needs, computed in one pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineLayout {
    pub range: DateRange,
    pub lanes: Vec<SwimLane>,
    pub overlaps: Vec<OverlapIndicator>,
    pub maintenance: IndexMap<String, Vec<MaintenancePeriod>>,
    pub events: Vec<TimelineEvent>,
}

impl TimelineLayout {
    /// Lay out `synergies`, anchoring an empty timeline at `today`.
    pub fn build(synergies: &[Synergy], today: DateTime<Utc>) -> Self {
        let blocks = transform_to_blocks(synergies);
        let events = extract_all_timeline_events(synergies);
        let range = compute_date_range_at(&blocks, &events, today);
        let overlaps = compute_overlaps(&blocks, &range.months);
        let maintenance = extract_maintenance_periods(&blocks);
        let lanes = group_by_company(&blocks);

        tracing::debug!(
            lanes = lanes.len(),
            overlaps = overlaps.len(),
            events = events.len(),
            "timeline layout built"
        );

        Self {
            range,
            lanes,
            overlaps,
            maintenance,
            events,
        }
    }

    pub fn block_count(&self) -> usize {
        self.lanes.iter().map(|l| l.blocks.len()).sum()
    }
}
