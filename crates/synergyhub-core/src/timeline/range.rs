//! Shared date range and pixel mapping for the timeline axis.
//!
//! The visible range is a fixed 12-month window anchored at the first day of
//! the month holding the earliest date found in the data. When there is no
//! data at all the window is anchored at the caller's "today" instead.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::block::TimeBlock;
use super::calendar::{add_months, start_of_month};
use super::events::TimelineEvent;

/// Number of months shown on the axis.
pub const TIMELINE_MONTHS: u32 = 12;

/// Narrowest width a block is ever drawn with.
pub const MIN_BLOCK_WIDTH_PX: f64 = 10.0;

/// Visible time span of the timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    /// Last millisecond of the final month.
    pub end: DateTime<Utc>,
    /// First instant of each month, in order.
    pub months: Vec<DateTime<Utc>>,
}

impl DateRange {
    /// Twelve-month range starting at the month containing `at`.
    pub fn anchored_at(at: DateTime<Utc>) -> Self {
        let start = start_of_month(at);
        let months = (0..TIMELINE_MONTHS).map(|i| add_months(start, i)).collect();
        let end = add_months(start, TIMELINE_MONTHS) - Duration::milliseconds(1);
        Self { start, end, months }
    }

    pub fn position(&self, date: DateTime<Utc>, width_px: f64) -> f64 {
        date_position(date, self.start, self.end, width_px)
    }

    pub fn block_width(&self, start: DateTime<Utc>, end: DateTime<Utc>, width_px: f64) -> f64 {
        block_width(start, end, self.start, self.end, width_px)
    }
}

/// Range anchored at the earliest block or event date, falling back to now.
pub fn compute_date_range(blocks: &[TimeBlock], events: &[TimelineEvent]) -> DateRange {
    compute_date_range_at(blocks, events, Utc::now())
}

/// Same as [`compute_date_range`] with an explicit fallback "today".
pub fn compute_date_range_at(
    blocks: &[TimeBlock],
    events: &[TimelineEvent],
    today: DateTime<Utc>,
) -> DateRange {
    let earliest = blocks
        .iter()
        .flat_map(|b| [b.start, b.end])
        .chain(events.iter().map(|e| e.date))
        .min();

    match earliest {
        Some(at) => DateRange::anchored_at(at),
        None => {
            tracing::debug!("no timeline data, anchoring range at today");
            DateRange::anchored_at(today)
        }
    }
}

/// Linear map of `date` onto `[0, width_px]`, clamped at both ends.
///
/// Returns 0 for a degenerate range (`range_end <= range_start`).
pub fn date_position(
    date: DateTime<Utc>,
    range_start: DateTime<Utc>,
    range_end: DateTime<Utc>,
    width_px: f64,
) -> f64 {
    let total = (range_end - range_start).num_milliseconds();
    if total <= 0 || date <= range_start {
        return 0.0;
    }
    if date >= range_end {
        return width_px;
    }
    let elapsed = (date - range_start).num_milliseconds();
    (elapsed as f64 / total as f64) * width_px
}

/// Pixel width of `[start, end]`, never narrower than [`MIN_BLOCK_WIDTH_PX`].
pub fn block_width(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    range_start: DateTime<Utc>,
    range_end: DateTime<Utc>,
    width_px: f64,
) -> f64 {
    let from = date_position(start, range_start, range_end, width_px);
    let to = date_position(end, range_start, range_end, width_px);
    (to - from).max(MIN_BLOCK_WIDTH_PX)
}
