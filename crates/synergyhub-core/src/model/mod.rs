//! Domain records shared by the engines and the store.
//!
//! All of these are plain snapshots. The timeline and scoring engines only read
//! them; the [`SynergyStore`](crate::store::SynergyStore) is the single place
//! that mutates state.

mod decision;
mod rfp;
mod synergy;

pub use decision::{CommitteeDecision, DecisionOutcome, LedgerReceipt, PoStatus, PurchaseOrder};
pub use rfp::{ApprovalStatus, Evaluation, Offer, Rfp, RfpState};
pub use synergy::{
    is_new_synergy, CompanyParticipation, Criticality, DateWindow, Synergy, SynergyState,
};
