use std::path::Path;

use clap::Subcommand;
use synergyhub_core::ledger::MockLedger;
use synergyhub_core::{Config, SynergyStore, SystemClock};

use super::{load_synergies, print_json, CommandResult};

#[derive(Subcommand)]
pub enum CommitteeAction {
    /// RFPs whose evaluation awaits the committee
    Pending,
    /// Approve the recommended offer and issue its purchase order
    Approve {
        /// RFP ID
        rfp_id: String,
        #[arg(long)]
        comment: Option<String>,
    },
    /// Reject the RFP
    Reject {
        /// RFP ID
        rfp_id: String,
        #[arg(long)]
        comment: Option<String>,
    },
}

pub fn run(action: CommitteeAction, data: Option<&Path>) -> CommandResult {
    let config = Config::load_or_default();
    let synergies = load_synergies(data, &config)?;
    let mut store = SynergyStore::new(
        synergies,
        SystemClock,
        MockLedger::from_seed(config.ledger.seed),
    )
    .with_po_prefix(config.committee.po_prefix.clone());

    match action {
        CommitteeAction::Pending => print_json(&store.pending_rfps())?,
        CommitteeAction::Approve { rfp_id, comment } => {
            let po = store.approve_rfp(&rfp_id, &config.committee.actor, comment.as_deref())?;
            print_json(&po)?;
        }
        CommitteeAction::Reject { rfp_id, comment } => {
            let decision = store.reject_rfp(&rfp_id, &config.committee.actor, comment.as_deref())?;
            print_json(&decision)?;
        }
    }
    Ok(())
}
