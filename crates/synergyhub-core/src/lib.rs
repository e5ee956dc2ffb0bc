//! # SynergyHub Core Library
//!
//! Core logic for the procurement synergy dashboard of an industrial cluster.
//! Companies planning maintenance around the same window are grouped into
//! synergies, a joint RFP is issued, supplier offers are scored, and a
//! committee approves the winner and issues a purchase order. The CLI and any
//! GUI are thin layers over this crate.
//!
//! ## Architecture
//!
//! - **Timeline**: turns synergies into per-company blocks, swim lanes, a
//!   12-month date range with pixel mapping, overlap indicators and merged
//!   maintenance periods
//! - **Scoring**: normalizes offers on price, lead time, SLA and
//!   certifications, ranks them and recommends a supplier
//! - **Store**: owns the snapshot and drives the synergy lifecycle through an
//!   injected [`Clock`] and [`Ledger`]
//! - **Graph / Filter**: company-synergy-material network and dashboard filters
//!
//! ## Key Components
//!
//! - [`TimelineLayout`]: every timeline view computed in one pass
//! - [`OfferScorer`]: weighted offer scoring and recommendation
//! - [`SynergyStore`]: committee workflow and purchase-order issuance
//! - [`Config`]: TOML configuration

pub mod clock;
pub mod config;
pub mod error;
pub mod filter;
pub mod fixtures;
pub mod format;
pub mod graph;
pub mod ledger;
pub mod model;
pub mod scoring;
pub mod store;
pub mod timeline;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::Config;
pub use error::{
    ConfigError, CoreError, LedgerError, Result, StoreError, TransitionError, ValidationError,
};
pub use filter::SynergyFilter;
pub use graph::{build_graph, GraphData, GraphEdge, GraphNode, MaterialCategory};
pub use ledger::{Ledger, MockLedger};
pub use model::{
    ApprovalStatus, CommitteeDecision, CompanyParticipation, Criticality, DateWindow,
    DecisionOutcome, Evaluation, Offer, PurchaseOrder, Rfp, RfpState, Synergy, SynergyState,
};
pub use scoring::{CriteriaWeights, OfferScorer, RankedOffer, Recommendation};
pub use store::SynergyStore;
pub use timeline::{DateRange, SwimLane, TimeBlock, TimelineEvent, TimelineLayout};
