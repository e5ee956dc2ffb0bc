//! Time-blocks and per-company swim lanes.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::model::{Criticality, Synergy, SynergyState};

/// Lane color for companies missing from the palette.
pub const NEUTRAL_LANE_COLOR: &str = "#6b7280";

/// One company's rendering unit for one synergy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeBlock {
    pub id: String,
    pub synergy_id: String,
    pub company: String,
    pub material: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub volume: f64,
    pub unit: String,
    pub state: SynergyState,
    pub criticality: Criticality,
    /// Synergy savings divided evenly by participant count.
    pub savings_share: Option<f64>,
}

impl TimeBlock {
    pub fn is_active_at(&self, at: DateTime<Utc>) -> bool {
        self.start <= at && at <= self.end
    }
}

/// One company's row in the timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwimLane {
    pub company: String,
    pub blocks: Vec<TimeBlock>,
    pub color: String,
}

/// Emit one block per (synergy × participating company), in input order.
pub fn transform_to_blocks(synergies: &[Synergy]) -> Vec<TimeBlock> {
    let mut blocks = Vec::new();

    for synergy in synergies {
        let share = synergy.savings_share();
        for participant in &synergy.participants {
            blocks.push(TimeBlock {
                id: format!("{}-{}", synergy.id, participant.company),
                synergy_id: synergy.id.clone(),
                company: participant.company.clone(),
                material: synergy.material.clone(),
                start: participant.delivery_window.start,
                end: participant.delivery_window.end,
                volume: participant.quantity,
                unit: synergy.unit_of_measure.clone(),
                state: synergy.state,
                criticality: participant.criticality,
                savings_share: share,
            });
        }
    }

    tracing::debug!(synergies = synergies.len(), blocks = blocks.len(), "built time-blocks");
    blocks
}

/// Partition blocks into lanes, one per company, in first-seen company order.
///
/// Blocks inside a lane are sorted by start date; equal starts keep input order.
pub fn group_by_company(blocks: &[TimeBlock]) -> Vec<SwimLane> {
    let mut by_company: IndexMap<&str, Vec<TimeBlock>> = IndexMap::new();
    for block in blocks {
        by_company
            .entry(block.company.as_str())
            .or_default()
            .push(block.clone());
    }

    by_company
        .into_iter()
        .map(|(company, mut blocks)| {
            blocks.sort_by_key(|b| b.start);
            SwimLane {
                company: company.to_string(),
                color: company_color(company).to_string(),
                blocks,
            }
        })
        .collect()
}

/// Keep only blocks active at `at`, dropping lanes left empty.
pub fn lanes_active_at(lanes: &[SwimLane], at: DateTime<Utc>) -> Vec<SwimLane> {
    lanes
        .iter()
        .filter_map(|lane| {
            let blocks: Vec<TimeBlock> = lane
                .blocks
                .iter()
                .filter(|b| b.is_active_at(at))
                .cloned()
                .collect();
            if blocks.is_empty() {
                None
            } else {
                Some(SwimLane {
                    company: lane.company.clone(),
                    blocks,
                    color: lane.color.clone(),
                })
            }
        })
        .collect()
}

/// Static company palette for the cluster members.
pub fn company_color(company: &str) -> &'static str {
    match company {
        "Ecopetrol Refinería" => "#0f766e",
        "Monómeros Colombo Venezolanos" => "#2563eb",
        "Argos - Cementos" => "#b45309",
        "Yara Colombia" => "#7c3aed",
        _ => NEUTRAL_LANE_COLOR,
    }
}
