//! Offer scoring engine.
//!
//! Each offer gets four sub-scores on a 0-100 scale, normalized against the
//! other offers of the same RFP:
//!
//! | criterion      | better | weight                 |
//! |----------------|--------|------------------------|
//! | unit price     | lower  | configurable (0.60)    |
//! | lead time      | lower  | configurable (0.25)    |
//! | proposed SLA   | higher | configurable (0.15)    |
//! | certifications | more   | fixed 0.05             |
//!
//! Totals are ranked descending, and the winner is compared against the first
//! offer received to report savings.

mod criteria;
mod ranking;

pub use criteria::{
    certification_score, normalize, round1, weighted_total, Better, CriteriaWeights, SubScores,
    CERTIFICATION_WEIGHT,
};
pub use ranking::{
    default_justification, rank, recommend, OfferScore, OfferScorer, RankedOffer, Recommendation,
    TOP_OFFERS,
};

use crate::model::Offer;

/// Rank `offers` with the given weights.
pub fn rank_offers(offers: &[Offer], weights: CriteriaWeights) -> Vec<RankedOffer> {
    OfferScorer::with_weights(weights).rank_offers(offers)
}
