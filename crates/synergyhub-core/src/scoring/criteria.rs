//! Per-criterion normalization and the weighted total.

use serde::{Deserialize, Serialize};

use crate::model::Offer;

/// Fixed weight applied to the certification sub-score.
pub const CERTIFICATION_WEIGHT: f64 = 0.05;

/// Which end of a numeric criterion scores 100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Better {
    Lower,
    Higher,
}

/// Map `values` linearly onto `[0, 100]` relative to their own min and max.
///
/// When every value is equal each one scores 100.
pub fn normalize(values: &[f64], better: Better) -> Vec<f64> {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let spread = max - min;

    values
        .iter()
        .map(|&v| {
            if spread == 0.0 || !spread.is_finite() {
                return 100.0;
            }
            match better {
                Better::Lower => (max - v) / spread * 100.0,
                Better::Higher => (v - min) / spread * 100.0,
            }
        })
        .collect()
}

/// Certification count relative to the best-certified offer in the set.
pub fn certification_score(offer: &Offer, all_offers: &[Offer]) -> f64 {
    let max = all_offers
        .iter()
        .map(|o| o.certifications.len())
        .max()
        .unwrap_or(0)
        .max(1);
    offer.certifications.len() as f64 / max as f64 * 100.0
}

/// Caller-configurable weights for price, lead time and SLA.
///
/// These are taken as given. Nothing forces them to sum to any total.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CriteriaWeights {
    pub price: f64,
    pub lead_time: f64,
    pub sla: f64,
}

impl Default for CriteriaWeights {
    fn default() -> Self {
        Self {
            price: 0.6,
            lead_time: 0.25,
            sla: 0.15,
        }
    }
}

impl CriteriaWeights {
    pub fn new(price: f64, lead_time: f64, sla: f64) -> Self {
        Self {
            price,
            lead_time,
            sla,
        }
    }

    /// Sum of all four weights, certification included.
    pub fn total(&self) -> f64 {
        self.price + self.lead_time + self.sla + CERTIFICATION_WEIGHT
    }

    /// Human-readable warnings for odd weight sets. Never rejects.
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        for (name, value) in [
            ("price", self.price),
            ("lead_time", self.lead_time),
            ("sla", self.sla),
        ] {
            if !value.is_finite() {
                warnings.push(format!("weight '{name}' is not a finite number"));
            } else if value < 0.0 {
                warnings.push(format!("weight '{name}' is negative ({value})"));
            }
        }
        let configurable = self.price + self.lead_time + self.sla;
        if configurable.is_finite() && configurable <= 0.0 {
            warnings.push(format!(
                "price, lead_time and sla weights sum to {configurable:.3}; only certifications will count"
            ));
        }
        warnings
    }
}

/// Sub-scores of one offer, each in `[0, 100]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SubScores {
    pub price: f64,
    pub lead_time: f64,
    pub sla: f64,
    pub certifications: f64,
}

pub fn weighted_total(scores: &SubScores, weights: &CriteriaWeights) -> f64 {
    scores.price * weights.price
        + scores.lead_time * weights.lead_time
        + scores.sla * weights.sla
        + scores.certifications * CERTIFICATION_WEIGHT
}

/// Round to one decimal place.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offer(id: &str, certs: usize) -> Offer {
        Offer::new(id, "RFP-1", "SNG-1", id, 1.0, 1.0, 1, 0.9)
            .with_certifications((0..certs).map(|i| format!("ISO-{i}")))
    }

    #[test]
    fn test_normalize_lower_is_better() {
        let scores = normalize(&[4850.0, 5100.0, 5350.0], Better::Lower);
        assert_eq!(scores[0], 100.0);
        assert!((scores[1] - 50.0).abs() < 1e-9);
        assert_eq!(scores[2], 0.0);
    }

    #[test]
    fn test_normalize_higher_is_better() {
        let scores = normalize(&[0.95, 0.97], Better::Higher);
        assert_eq!(scores, vec![0.0, 100.0]);
    }

    #[test]
    fn test_normalize_tie_scores_full() {
        assert_eq!(normalize(&[7.0, 7.0, 7.0], Better::Lower), vec![100.0; 3]);
        assert_eq!(normalize(&[3.0], Better::Higher), vec![100.0]);
        assert!(normalize(&[], Better::Lower).is_empty());
    }

    #[test]
    fn test_certification_score_uses_max_with_floor() {
        let offers = vec![offer("a", 3), offer("b", 2), offer("c", 0)];
        assert_eq!(certification_score(&offers[0], &offers), 100.0);
        assert!((certification_score(&offers[1], &offers) - 66.666_666).abs() < 1e-3);
        assert_eq!(certification_score(&offers[2], &offers), 0.0);

        let none = vec![offer("x", 0), offer("y", 0)];
        assert_eq!(certification_score(&none[0], &none), 0.0);
    }

    #[test]
    fn test_weighted_total_fixed_certification_weight() {
        let scores = SubScores {
            price: 0.0,
            lead_time: 0.0,
            sla: 0.0,
            certifications: 100.0,
        };
        let weights = CriteriaWeights::new(10.0, 10.0, 10.0);
        assert_eq!(weighted_total(&scores, &weights), 5.0);
    }

    #[test]
    fn test_weight_warnings() {
        assert!(CriteriaWeights::default().warnings().is_empty());
        let odd = CriteriaWeights::new(-0.1, 0.5, 0.2);
        let warnings = odd.warnings();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("negative"));

        let zero = CriteriaWeights::new(0.0, 0.0, 0.0);
        assert_eq!(zero.warnings().len(), 1);
        assert!(CriteriaWeights::new(f64::NAN, 0.2, 0.2).warnings()[0].contains("finite"));
    }

    #[test]
    fn test_round1() {
        assert_eq!(round1(66.666), 66.7);
        assert_eq!(round1(57.49), 57.5);
        assert_eq!(round1(0.04), 0.0);
    }
}
