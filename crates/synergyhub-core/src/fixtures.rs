//! Built-in sample snapshot and JSON snapshot I/O.
//!
//! The sample covers one synergy per interesting lifecycle stage so every
//! view has something to show without external data.

use std::path::Path;

use chrono::{DateTime, TimeZone, Utc};

use crate::error::Result;
use crate::model::{
    ApprovalStatus, CommitteeDecision, CompanyParticipation, Criticality, DateWindow,
    DecisionOutcome, Evaluation, Offer, Rfp, RfpState, Synergy, SynergyState,
};
use crate::scoring::OfferScorer;

pub const ECOPETROL: &str = "Ecopetrol Refinería";
pub const MONOMEROS: &str = "Monómeros Colombo Venezolanos";
pub const ARGOS: &str = "Argos - Cementos";
pub const YARA: &str = "Yara Colombia";

pub const REFRACTORY_SYNERGY_ID: &str = "SNG-2026-02-ALUMINA-85";
pub const REFRACTORY_RFP_ID: &str = "RFP-SNG-2026-02-ALUMINA-85";
pub const CATALYST_SYNERGY_ID: &str = "SNG-2026-01-CAT-FCC";
pub const CATALYST_RFP_ID: &str = "RFP-SNG-2026-01-CAT-FCC";
pub const TUBES_SYNERGY_ID: &str = "SNG-2026-02-TUBES-625";
pub const TUBES_RFP_ID: &str = "RFP-SNG-2026-02-TUBES-625";
pub const BRICKS_SYNERGY_ID: &str = "SNG-2026-02-MGCR-BRICK";

const SOURCING: &str = "sourcing.cluster@ecopetrol.com.co";
const DIRECTOR: &str = "director.operaciones@cluster-cartagena.com";

fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, min, 0)
        .single()
        .unwrap_or_default()
}

fn day(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    at(y, m, d, 0, 0)
}

fn window(start: DateTime<Utc>, end: DateTime<Utc>) -> DateWindow {
    DateWindow::new(start, end)
}

/// The full sample snapshot, in detection order.
pub fn sample_synergies() -> Vec<Synergy> {
    vec![
        refractory_synergy(),
        catalyst_synergy(),
        reformer_tubes_synergy(),
        magnesia_bricks_synergy(),
    ]
}

/// The three bids received for the high-alumina refractory RFP.
pub fn refractory_offers() -> Vec<Offer> {
    let offer =
        |id: &str, supplier: &str, contact: &str, price: f64, total: f64, lead: u32, sla: f64| {
            let (rfp, synergy) = (REFRACTORY_RFP_ID, REFRACTORY_SYNERGY_ID);
            Offer::new(id, rfp, synergy, supplier, price, total, lead, sla).with_contact(contact)
        };

    vec![
        offer(
            "OFR-RFP-001-TC",
            "Thermal Ceramics Colombia",
            "Carlos Mendoza",
            4850.0,
            873_000.0,
            50,
            0.97,
        )
            .with_discount(15.0)
            .with_certifications(["ISO 9001:2015", "ISO 14001:2015", "ASTM C401"])
            .with_comments("Includes HSE certification and on-site technical supervision"),
        offer("OFR-RFP-001-RHI", "RHI Magnesita", "Patricia Silva", 5100.0, 918_000.0, 55, 0.96)
            .with_discount(12.0)
            .with_certifications(["ISO 9001:2015", "ISO 45001:2018"])
            .with_comments("Imported from Brazil, sea freight included"),
        offer("OFR-RFP-001-REF", "Refratechnik", "Hans Schmidt", 5350.0, 963_000.0, 65, 0.95)
            .with_discount(10.0)
            .with_certifications(["ISO 9001:2015", "DIN 51063", "ASTM C401"])
            .with_comments("Imported from Germany, premium grade"),
    ]
}

/// Four companies, RFP completed, committee approved, PO issued.
pub fn refractory_synergy() -> Synergy {
    let decided_at = at(2025, 12, 20, 15, 30);

    let evaluation = Evaluation {
        rfp_id: REFRACTORY_RFP_ID.to_string(),
        top_offers: vec![
            "OFR-RFP-001-TC".to_string(),
            "OFR-RFP-001-RHI".to_string(),
            "OFR-RFP-001-REF".to_string(),
        ],
        recommended_supplier: "Thermal Ceramics Colombia".to_string(),
        recommended_offer_id: "OFR-RFP-001-TC".to_string(),
        justification: "Best unit price, most aggressive volume discount and local stock in Cartagena."
            .to_string(),
        savings_vs_baseline_pct: 14.5,
        savings_vs_baseline_amount: 145_800.0,
        evaluated_by: vec![
            SOURCING.to_string(),
            "compras@monomeros.com".to_string(),
            "procurement@argos.co".to_string(),
        ],
        evaluated_at: at(2025, 12, 18, 14, 30),
        requires_committee_approval: true,
        approval: ApprovalStatus::Approved {
            by: DIRECTOR.to_string(),
            at: decided_at,
        },
    };

    let mut rfp = Rfp::new(
        REFRACTORY_RFP_ID,
        REFRACTORY_SYNERGY_ID,
        at(2025, 11, 25, 10, 0),
        at(2025, 12, 15, 23, 59),
    )
    .with_invited([
        "Thermal Ceramics Colombia",
        "Refratechnik",
        "RHI Magnesita",
        "Vesuvius Colombia",
    ])
    .with_evaluation(evaluation);
    rfp.offers = refractory_offers();
    rfp.decided_at = Some(decided_at);
    rfp.state = RfpState::Completed;

    let decision = CommitteeDecision {
        synergy_id: REFRACTORY_SYNERGY_ID.to_string(),
        outcome: DecisionOutcome::Approved {
            supplier: "Thermal Ceramics Colombia".to_string(),
            offer_id: "OFR-RFP-001-TC".to_string(),
            po_number: "PO-CLUSTER-2026-001".to_string(),
            po_amount: 873_000.0,
            po_issued_at: at(2025, 12, 22, 10, 0),
            real_savings_pct: 14.5,
            real_savings_amount: 145_800.0,
        },
        reason: "Unanimous approval by the cluster purchasing committee".to_string(),
        comments: Some("Joint PO with staggered deliveries per company".to_string()),
        decided_by: DIRECTOR.to_string(),
        decided_at,
    };

    Synergy::new(
        REFRACTORY_SYNERGY_ID,
        "High-alumina refractory (85%)",
        "m3",
        window(day(2026, 1, 10), day(2026, 2, 25)),
        at(2025, 11, 23, 3, 15),
    )
    .with_participant(CompanyParticipation::new(
        ECOPETROL,
        "FCC unit",
        45.0,
        window(day(2026, 1, 10), day(2026, 2, 10)),
        Criticality::High,
    ))
    .with_participant(CompanyParticipation::new(
        MONOMEROS,
        "Primary reformer",
        65.0,
        window(day(2026, 1, 15), day(2026, 2, 15)),
        Criticality::High,
    ))
    .with_participant(CompanyParticipation::new(
        ARGOS,
        "Rotary kiln 2",
        38.0,
        window(day(2026, 1, 20), day(2026, 2, 25)),
        Criticality::Medium,
    ))
    .with_participant(CompanyParticipation::new(
        YARA,
        "Nitric acid reactor",
        32.0,
        window(day(2026, 1, 25), day(2026, 2, 20)),
        Criticality::High,
    ))
    .with_estimated_savings(145_800.0, 14.5)
    .with_state(SynergyState::Closed)
    .with_rfp(rfp)
    .with_decision(decision)
    .with_updated_at(at(2025, 12, 22, 10, 0))
}

/// Single company, RFP issued, no offers yet.
pub fn catalyst_synergy() -> Synergy {
    let rfp = Rfp::new(
        CATALYST_RFP_ID,
        CATALYST_SYNERGY_ID,
        at(2025, 11, 28, 9, 0),
        at(2025, 12, 18, 23, 59),
    )
    .with_invited(["Grace Catalysts", "BASF Catalysts", "Albemarle"]);

    Synergy::new(
        CATALYST_SYNERGY_ID,
        "FCC catalyst (USY zeolite)",
        "t",
        window(day(2025, 12, 15), day(2026, 2, 1)),
        at(2025, 11, 23, 3, 15),
    )
    .with_participant(CompanyParticipation::new(
        ECOPETROL,
        "FCC unit",
        120.0,
        window(day(2025, 12, 15), day(2026, 2, 1)),
        Criticality::High,
    ))
    .with_estimated_savings(96_000.0, 8.0)
    .with_state(SynergyState::InRfp)
    .with_rfp(rfp)
    .with_updated_at(at(2025, 11, 28, 9, 0))
}

/// Offers scored and recommended, waiting on the committee.
pub fn reformer_tubes_synergy() -> Synergy {
    let offer = |id: &str, supplier: &str, price: f64, total: f64, lead: u32, sla: f64| {
        Offer::new(id, TUBES_RFP_ID, TUBES_SYNERGY_ID, supplier, price, total, lead, sla)
    };

    let mut rfp = Rfp::new(
        TUBES_RFP_ID,
        TUBES_SYNERGY_ID,
        at(2025, 11, 20, 9, 0),
        at(2025, 12, 10, 23, 59),
    )
    .with_invited(["Tenaris", "Vallourec", "Sandvik"])
    .with_offer(
        offer("OFR-TUB-SAN", "Sandvik", 19_800.0, 712_800.0, 110, 0.98)
            .with_certifications([
                "ISO 9001:2015",
                "ISO 14001:2015",
                "ASME B31.3",
                "PED 2014/68/EU",
            ]),
    )
    .with_offer(
        offer("OFR-TUB-TEN", "Tenaris", 18_500.0, 666_000.0, 120, 0.96)
            .with_discount(8.0)
            .with_certifications(["ISO 9001:2015", "API 5L", "ASME B31.3"]),
    )
    .with_offer(
        offer("OFR-TUB-VAL", "Vallourec", 17_900.0, 644_400.0, 135, 0.95)
            .with_certifications(["ISO 9001:2015", "ASME B31.3"]),
    );

    if let Some(evaluation) =
        OfferScorer::new().evaluate(&rfp, None, vec![SOURCING.to_string()], at(2025, 12, 12, 11, 0))
    {
        rfp.evaluation = Some(evaluation);
    }

    Synergy::new(
        TUBES_SYNERGY_ID,
        "Reformer tubes Inconel 625",
        "units",
        window(day(2025, 12, 1), day(2026, 2, 12)),
        at(2025, 11, 19, 7, 40),
    )
    .with_participant(CompanyParticipation::new(
        MONOMEROS,
        "Primary reformer",
        24.0,
        window(day(2025, 12, 1), day(2026, 2, 10)),
        Criticality::High,
    ))
    .with_participant(CompanyParticipation::new(
        ECOPETROL,
        "Hydrogen plant",
        12.0,
        window(day(2026, 1, 5), day(2026, 2, 12)),
        Criticality::Medium,
    ))
    .with_estimated_savings(48_000.0, 10.0)
    .with_state(SynergyState::Recommended)
    .with_rfp(rfp)
    .with_updated_at(at(2025, 12, 12, 11, 0))
}

/// Freshly detected, nothing issued yet.
pub fn magnesia_bricks_synergy() -> Synergy {
    Synergy::new(
        BRICKS_SYNERGY_ID,
        "Basic magnesia-chrome bricks",
        "t",
        window(day(2026, 1, 15), day(2026, 2, 20)),
        at(2025, 11, 24, 12, 0),
    )
    .with_participant(CompanyParticipation::new(
        ARGOS,
        "Rotary kiln 2",
        15.0,
        window(day(2026, 1, 15), day(2026, 2, 20)),
        Criticality::Medium,
    ))
    .with_estimated_savings(17_500.0, 6.5)
}

/// Read a JSON array of synergies.
pub fn load_snapshot(path: &Path) -> Result<Vec<Synergy>> {
    let content = std::fs::read_to_string(path)?;
    let synergies: Vec<Synergy> = serde_json::from_str(&content)?;
    tracing::debug!(path = %path.display(), synergies = synergies.len(), "snapshot loaded");
    Ok(synergies)
}

pub fn save_snapshot(path: &Path, synergies: &[Synergy]) -> Result<()> {
    let content = serde_json::to_string_pretty(synergies)?;
    std::fs::write(path, content)?;
    Ok(())
}
