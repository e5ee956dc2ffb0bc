use std::path::Path;

use clap::Subcommand;
use synergyhub_core::ledger::MockLedger;
use synergyhub_core::scoring::rank_offers;
use synergyhub_core::{Config, CriteriaWeights, SynergyStore, SystemClock};

use super::{load_synergies, print_json, CommandResult};

#[derive(Subcommand)]
pub enum OffersAction {
    /// Rank the offers of an RFP
    Score {
        /// RFP ID
        rfp_id: String,
        /// Price weight (defaults to `scoring.price_weight`)
        #[arg(long)]
        price: Option<f64>,
        /// Lead-time weight (defaults to `scoring.lead_time_weight`)
        #[arg(long)]
        lead_time: Option<f64>,
        /// SLA weight (defaults to `scoring.sla_weight`)
        #[arg(long)]
        sla: Option<f64>,
    },
    /// Score, recommend and attach an evaluation (not persisted)
    Evaluate {
        /// RFP ID
        rfp_id: String,
        /// Replaces the generated justification
        #[arg(long)]
        justification: Option<String>,
    },
}

pub fn run(action: OffersAction, data: Option<&Path>) -> CommandResult {
    let config = Config::load_or_default();
    let synergies = load_synergies(data, &config)?;
    let defaults = config.scoring.weights();

    match action {
        OffersAction::Score {
            rfp_id,
            price,
            lead_time,
            sla,
        } => {
            let weights = CriteriaWeights::new(
                price.unwrap_or(defaults.price),
                lead_time.unwrap_or(defaults.lead_time),
                sla.unwrap_or(defaults.sla),
            );
            for warning in weights.warnings() {
                tracing::warn!("{warning}");
            }
            let rfp = synergies
                .iter()
                .filter_map(|s| s.rfp.as_ref())
                .find(|r| r.id == rfp_id)
                .ok_or_else(|| format!("RFP not found: {rfp_id}"))?;
            print_json(&rank_offers(&rfp.offers, weights))?;
        }
        OffersAction::Evaluate {
            rfp_id,
            justification,
        } => {
            let mut store = SynergyStore::new(
                synergies,
                SystemClock,
                MockLedger::from_seed(config.ledger.seed),
            );
            let evaluation = store.evaluate_rfp(
                &rfp_id,
                defaults,
                justification.as_deref(),
                &config.committee.evaluator,
            )?;
            match evaluation {
                Some(evaluation) => print_json(&evaluation)?,
                None => return Err(format!("RFP {rfp_id} has no offers to evaluate").into()),
            }
        }
    }
    Ok(())
}
