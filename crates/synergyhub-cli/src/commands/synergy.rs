use std::path::Path;

use chrono::{DateTime, Utc};
use clap::Subcommand;
use serde::Serialize;
use synergyhub_core::format::format_compact_number;
use synergyhub_core::model::is_new_synergy;
use synergyhub_core::{Config, Synergy, SynergyFilter, SynergyState};

use super::{load_synergies, print_json, CommandResult};

#[derive(Subcommand)]
pub enum SynergyAction {
    /// List synergies
    List {
        /// Lifecycle state (pending, in_rfp, recommended, approved, counter_offer, closed, rejected)
        #[arg(long)]
        state: Option<SynergyState>,
        /// Text matched against id, material and company names
        #[arg(long)]
        query: Option<String>,
    },
    /// Show one synergy in full
    Show {
        /// Synergy ID
        id: String,
    },
}

#[derive(Serialize)]
struct SynergySummary<'a> {
    id: &'a str,
    material: &'a str,
    state: SynergyState,
    companies: Vec<String>,
    total_volume: f64,
    unit: &'a str,
    estimated_savings: Option<String>,
    detected_at: DateTime<Utc>,
    is_new: bool,
}

impl<'a> SynergySummary<'a> {
    fn new(synergy: &'a Synergy, now: DateTime<Utc>, threshold_hours: i64) -> Self {
        Self {
            id: &synergy.id,
            material: &synergy.material,
            state: synergy.state,
            companies: synergy.companies(),
            total_volume: synergy.total_volume(),
            unit: &synergy.unit_of_measure,
            estimated_savings: synergy.estimated_savings_amount.map(format_compact_number),
            detected_at: synergy.detected_at,
            is_new: is_new_synergy(synergy.detected_at, now, threshold_hours),
        }
    }
}

pub fn run(action: SynergyAction, data: Option<&Path>) -> CommandResult {
    let config = Config::load_or_default();
    let synergies = load_synergies(data, &config)?;

    match action {
        SynergyAction::List { state, query } => {
            let mut filter = SynergyFilter::new().with_states(state);
            if let Some(query) = query {
                filter = filter.with_query(query);
            }
            let now = Utc::now();
            let summaries: Vec<SynergySummary> = filter
                .apply(&synergies)
                .into_iter()
                .map(|s| SynergySummary::new(s, now, config.timeline.new_synergy_threshold_hours))
                .collect();
            print_json(&summaries)?;
        }
        SynergyAction::Show { id } => {
            let synergy = synergies
                .iter()
                .find(|s| s.id == id)
                .ok_or_else(|| format!("synergy not found: {id}"))?;
            print_json(synergy)?;
        }
    }
    Ok(())
}
