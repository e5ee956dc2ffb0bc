//! Scoring, ranking and recommendation over one RFP's offers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::criteria::{
    certification_score, normalize, round1, weighted_total, Better, CriteriaWeights, SubScores,
};
use crate::model::{ApprovalStatus, Evaluation, Offer, Rfp};

/// Offers kept in an evaluation's shortlist.
pub const TOP_OFFERS: usize = 3;

/// Scores for one offer, each rounded to one decimal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OfferScore {
    pub offer_id: String,
    pub scores: SubScores,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedOffer {
    /// 1-based.
    pub rank: usize,
    pub offer: Offer,
    pub score: OfferScore,
}

/// Top pick plus savings against the first offer received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub offer: Offer,
    pub score: f64,
    pub savings_pct: f64,
    pub savings_amount: f64,
    pub justification: String,
}

/// Offer scorer bound to one set of criteria weights.
#[derive(Debug, Clone, Default)]
pub struct OfferScorer {
    weights: CriteriaWeights,
}

impl OfferScorer {
    /// Scorer with the default 60/25/15 weights.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_weights(weights: CriteriaWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &CriteriaWeights {
        &self.weights
    }

    /// Score every offer relative to the others, in input order.
    pub fn score(&self, offers: &[Offer]) -> Vec<OfferScore> {
        let prices: Vec<f64> = offers.iter().map(|o| o.unit_price).collect();
        let lead_times: Vec<f64> = offers.iter().map(|o| f64::from(o.lead_time_days)).collect();
        let slas: Vec<f64> = offers.iter().map(|o| o.proposed_sla).collect();

        let price = normalize(&prices, Better::Lower);
        let lead_time = normalize(&lead_times, Better::Lower);
        let sla = normalize(&slas, Better::Higher);

        offers
            .iter()
            .enumerate()
            .map(|(i, offer)| {
                let raw = SubScores {
                    price: price[i],
                    lead_time: lead_time[i],
                    sla: sla[i],
                    certifications: certification_score(offer, offers),
                };
                let total = weighted_total(&raw, &self.weights);
                OfferScore {
                    offer_id: offer.id.clone(),
                    scores: SubScores {
                        price: round1(raw.price),
                        lead_time: round1(raw.lead_time),
                        sla: round1(raw.sla),
                        certifications: round1(raw.certifications),
                    },
                    total: round1(total),
                }
            })
            .collect()
    }

    /// Score and rank in one step.
    pub fn rank_offers(&self, offers: &[Offer]) -> Vec<RankedOffer> {
        let scores = self.score(offers);
        rank(offers, &scores)
    }

    /// Build a committee-ready evaluation for `rfp`.
    ///
    /// Returns `None` when the RFP has no offers.
    pub fn evaluate(
        &self,
        rfp: &Rfp,
        justification: Option<&str>,
        evaluated_by: Vec<String>,
        now: DateTime<Utc>,
    ) -> Option<Evaluation> {
        let ranked = self.rank_offers(&rfp.offers);
        let recommendation = recommend(&rfp.offers, &ranked, justification)?;

        tracing::debug!(
            rfp = %rfp.id,
            offers = ranked.len(),
            supplier = %recommendation.offer.supplier,
            score = recommendation.score,
            "evaluated offers"
        );

        Some(Evaluation {
            rfp_id: rfp.id.clone(),
            top_offers: ranked
                .iter()
                .take(TOP_OFFERS)
                .map(|r| r.offer.id.clone())
                .collect(),
            recommended_supplier: recommendation.offer.supplier.clone(),
            recommended_offer_id: recommendation.offer.id.clone(),
            justification: recommendation.justification,
            savings_vs_baseline_pct: recommendation.savings_pct,
            savings_vs_baseline_amount: recommendation.savings_amount,
            evaluated_by,
            evaluated_at: now,
            requires_committee_approval: true,
            approval: ApprovalStatus::Pending,
        })
    }
}

/// Order offers by descending total score. Ties keep input order.
///
/// `scores` pairs with `offers` by position, as returned by
/// [`OfferScorer::score`]. Offers past the end of `scores` rank as zero.
pub fn rank(offers: &[Offer], scores: &[OfferScore]) -> Vec<RankedOffer> {
    let mut paired: Vec<(Offer, OfferScore)> = offers
        .iter()
        .enumerate()
        .map(|(i, offer)| {
            let score = scores.get(i).cloned().unwrap_or_else(|| OfferScore {
                offer_id: offer.id.clone(),
                scores: SubScores {
                    price: 0.0,
                    lead_time: 0.0,
                    sla: 0.0,
                    certifications: 0.0,
                },
                total: 0.0,
            });
            (offer.clone(), score)
        })
        .collect();

    paired.sort_by(|a, b| b.1.total.total_cmp(&a.1.total));

    paired
        .into_iter()
        .enumerate()
        .map(|(i, (offer, score))| RankedOffer {
            rank: i + 1,
            offer,
            score,
        })
        .collect()
}

/// Pick the top-ranked offer and price it against the baseline.
///
/// The baseline is the first offer in `offers` as received, not the ranked
/// order. When that offer totals zero or less the top offer stands in as its
/// own baseline, so both savings figures are 0.
pub fn recommend(
    offers: &[Offer],
    ranked: &[RankedOffer],
    justification: Option<&str>,
) -> Option<Recommendation> {
    let top = ranked.first()?;
    let baseline = offers
        .first()
        .map(|o| o.total_amount)
        .filter(|amount| *amount > 0.0)
        .unwrap_or(top.offer.total_amount);

    let savings_amount = baseline - top.offer.total_amount;
    let savings_pct = if baseline > 0.0 {
        savings_amount / baseline * 100.0
    } else {
        0.0
    };

    let justification = match justification.map(str::trim) {
        Some(text) if !text.is_empty() => text.to_string(),
        _ => default_justification(top.score.total, &top.offer.supplier),
    };

    Some(Recommendation {
        offer: top.offer.clone(),
        score: top.score.total,
        savings_pct,
        savings_amount,
        justification,
    })
}

pub fn default_justification(score: f64, supplier: &str) -> String {
    format!(
        "Best total score: {score:.1}. {supplier} offers the best balance of price, lead time and SLA."
    )
}
