//! Integration tests for offer scoring against the sample RFPs.

use chrono::{TimeZone, Utc};
use synergyhub_core::fixtures::{reformer_tubes_synergy, refractory_offers};
use synergyhub_core::scoring::{rank_offers, CriteriaWeights, OfferScorer, TOP_OFFERS};

#[test]
fn test_refractory_offers_rank() {
    let ranked = rank_offers(&refractory_offers(), CriteriaWeights::default());

    let suppliers: Vec<&str> = ranked.iter().map(|r| r.offer.supplier.as_str()).collect();
    assert_eq!(
        suppliers,
        vec!["Thermal Ceramics Colombia", "RHI Magnesita", "Refratechnik"]
    );
    let totals: Vec<f64> = ranked.iter().map(|r| r.score.total).collect();
    assert_eq!(totals, vec![105.0, 57.5, 5.0]);
    assert_eq!(ranked[1].score.scores.price, 50.0);
    assert_eq!(ranked[1].score.scores.certifications, 66.7);
}

#[test]
fn test_tubes_recommendation_and_savings() {
    let synergy = reformer_tubes_synergy();
    let rfp = synergy.rfp.as_ref().unwrap();
    let scorer = OfferScorer::new();

    let ranked = scorer.rank_offers(&rfp.offers);
    let ids: Vec<&str> = ranked.iter().map(|r| r.offer.id.as_str()).collect();
    assert_eq!(ids, vec!["OFR-TUB-TEN", "OFR-TUB-VAL", "OFR-TUB-SAN"]);
    assert_eq!(ranked[0].score.total, 64.8);
    assert_eq!(ranked[1].score.total, 62.5);
    assert_eq!(ranked[2].score.total, 45.0);

    let now = Utc.with_ymd_and_hms(2025, 12, 12, 11, 0, 0).unwrap();
    let evaluation = scorer
        .evaluate(rfp, None, vec!["analyst@cluster.com".to_string()], now)
        .unwrap();
    assert_eq!(evaluation.top_offers.len(), TOP_OFFERS);
    assert_eq!(evaluation.recommended_supplier, "Tenaris");
    // Baseline is Sandvik, the first offer received.
    assert_eq!(evaluation.savings_vs_baseline_amount, 46_800.0);
    assert!((evaluation.savings_vs_baseline_pct - 6.565_656).abs() < 1e-4);
    assert_eq!(
        evaluation.justification,
        "Best total score: 64.8. Tenaris offers the best balance of price, lead time and SLA."
    );
    assert!(evaluation.awaiting_committee());
}

#[test]
fn test_price_only_weights_change_winner() {
    let synergy = reformer_tubes_synergy();
    let offers = &synergy.rfp.as_ref().unwrap().offers;

    let ranked = rank_offers(offers, CriteriaWeights::new(1.0, 0.0, 0.0));
    assert_eq!(ranked[0].offer.supplier, "Vallourec");
    assert_eq!(ranked[0].score.total, 102.5);
}

#[test]
fn test_zero_weights_only_count_certifications() {
    let weights = CriteriaWeights::new(0.0, 0.0, 0.0);
    assert_eq!(weights.warnings().len(), 1);

    let ranked = rank_offers(&refractory_offers(), weights);
    // Thermal Ceramics and Refratechnik both carry three certifications.
    assert_eq!(ranked[0].score.total, 5.0);
    assert_eq!(ranked[1].score.total, 5.0);
    assert_eq!(ranked[0].offer.supplier, "Thermal Ceramics Colombia");
    assert_eq!(ranked[1].offer.supplier, "Refratechnik");
}

#[test]
fn test_single_offer_scores_full_marks() {
    let offers = vec![refractory_offers().remove(1)];
    let ranked = rank_offers(&offers, CriteriaWeights::default());
    assert_eq!(ranked.len(), 1);
    assert_eq!(ranked[0].score.total, 105.0);
}
