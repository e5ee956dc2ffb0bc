//! Point-in-time milestones drawn above the swim lanes.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{DecisionOutcome, Synergy, SynergyState};

/// What happened at a timeline milestone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TimelineEventKind {
    Detection,
    Update,
    RfpIssued { rfp_id: String },
    RfpClosing { rfp_id: String },
    RfpDecision { rfp_id: String, supplier: Option<String> },
    CommitteeDecision {
        approved: bool,
        supplier: Option<String>,
        amount: Option<f64>,
        po_number: Option<String>,
    },
    PoIssued { po_number: String, amount: f64 },
    DeliveryStart,
}

impl TimelineEventKind {
    /// Stable slug used in event ids.
    pub fn slug(&self) -> &'static str {
        match self {
            Self::Detection => "detection",
            Self::Update => "update",
            Self::RfpIssued { .. } => "rfp-issued",
            Self::RfpClosing { .. } => "rfp-closing",
            Self::RfpDecision { .. } => "rfp-decision",
            Self::CommitteeDecision { .. } => "committee",
            Self::PoIssued { .. } => "po-issued",
            Self::DeliveryStart => "delivery-start",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineEvent {
    pub id: String,
    pub synergy_id: String,
    #[serde(flatten)]
    pub kind: TimelineEventKind,
    pub date: DateTime<Utc>,
    pub label: String,
    pub description: String,
    pub material: String,
    pub state: SynergyState,
}

/// All milestones of one synergy, sorted by date.
pub fn extract_timeline_events(synergy: &Synergy) -> Vec<TimelineEvent> {
    let event = |kind: TimelineEventKind, date: DateTime<Utc>, label: &str, description: String| {
        TimelineEvent {
            id: format!("{}-{}", synergy.id, kind.slug()),
            synergy_id: synergy.id.clone(),
            kind,
            date,
            label: label.to_string(),
            description,
            material: synergy.material.clone(),
            state: synergy.state,
        }
    };

    let mut events = vec![event(
        TimelineEventKind::Detection,
        synergy.detected_at,
        "Synergy detected",
        format!(
            "{} companies share demand for {}",
            synergy.company_count(),
            synergy.material
        ),
    )];

    if let Some(updated_at) = synergy.updated_at {
        events.push(event(
            TimelineEventKind::Update,
            updated_at,
            "Last update",
            format!("Status: {}", synergy.state),
        ));
    }

    if let Some(rfp) = &synergy.rfp {
        events.push(event(
            TimelineEventKind::RfpIssued { rfp_id: rfp.id.clone() },
            rfp.issued_at,
            "RFP issued",
            format!("{} invited to {}", rfp.invited_suppliers.len(), rfp.id),
        ));
        events.push(event(
            TimelineEventKind::RfpClosing { rfp_id: rfp.id.clone() },
            rfp.closes_at,
            "RFP closing",
            format!("{} offers received", rfp.offers.len()),
        ));
        if let Some(decided_at) = rfp.decided_at {
            let supplier = rfp
                .evaluation
                .as_ref()
                .map(|e| e.recommended_supplier.clone());
            events.push(event(
                TimelineEventKind::RfpDecision {
                    rfp_id: rfp.id.clone(),
                    supplier: supplier.clone(),
                },
                decided_at,
                "RFP decided",
                match &supplier {
                    Some(s) => format!("Awarded to {s}"),
                    None => "Decision recorded".to_string(),
                },
            ));
        }
    }

    if let Some(decision) = &synergy.decision {
        match &decision.outcome {
            DecisionOutcome::Approved {
                supplier,
                po_number,
                po_amount,
                po_issued_at,
                ..
            } => {
                events.push(event(
                    TimelineEventKind::CommitteeDecision {
                        approved: true,
                        supplier: Some(supplier.clone()),
                        amount: Some(*po_amount),
                        po_number: Some(po_number.clone()),
                    },
                    decision.decided_at,
                    "Committee approved",
                    decision.reason.clone(),
                ));
                events.push(event(
                    TimelineEventKind::PoIssued {
                        po_number: po_number.clone(),
                        amount: *po_amount,
                    },
                    *po_issued_at,
                    "PO issued",
                    format!("{po_number} to {supplier}"),
                ));
            }
            DecisionOutcome::Rejected => {
                events.push(event(
                    TimelineEventKind::CommitteeDecision {
                        approved: false,
                        supplier: None,
                        amount: None,
                        po_number: None,
                    },
                    decision.decided_at,
                    "Committee rejected",
                    decision.reason.clone(),
                ));
            }
        }
    }

    events.push(event(
        TimelineEventKind::DeliveryStart,
        synergy.window.start,
        "Delivery window opens",
        format!("{:.0} {} in total", synergy.total_volume(), synergy.unit_of_measure),
    ));

    events.sort_by_key(|e| e.date);
    events
}

/// Milestones across all synergies, sorted by date.
pub fn extract_all_timeline_events(synergies: &[Synergy]) -> Vec<TimelineEvent> {
    let mut events: Vec<TimelineEvent> =
        synergies.iter().flat_map(extract_timeline_events).collect();
    events.sort_by_key(|e| e.date);
    events
}

/// Bucket events by calendar day (UTC), days ascending.
pub fn group_events_by_date(events: &[TimelineEvent]) -> BTreeMap<NaiveDate, Vec<TimelineEvent>> {
    let mut grouped: BTreeMap<NaiveDate, Vec<TimelineEvent>> = BTreeMap::new();
    for event in events {
        grouped
            .entry(event.date.date_naive())
            .or_default()
            .push(event.clone());
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CommitteeDecision, CompanyParticipation, Criticality, DateWindow, Rfp};
    use chrono::{Duration, TimeZone};

    fn day(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    fn base() -> Synergy {
        Synergy::new(
            "SNG-1",
            "Catalyst FCC",
            "t",
            DateWindow::new(day(2025, 12, 15), day(2026, 2, 1)),
            day(2025, 11, 20),
        )
        .with_participant(CompanyParticipation::new(
            "Ecopetrol Refinería",
            "FCC",
            120.0,
            DateWindow::new(day(2025, 12, 15), day(2026, 2, 1)),
            Criticality::High,
        ))
    }

    #[test]
    fn test_minimal_synergy_has_detection_and_delivery() {
        let events = extract_timeline_events(&base());
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].kind, TimelineEventKind::Detection);
        assert_eq!(events[0].id, "SNG-1-detection");
        assert_eq!(events[1].kind, TimelineEventKind::DeliveryStart);
    }

    #[test]
    fn test_rfp_events_without_decision() {
        let rfp = Rfp::new("RFP-1", "SNG-1", day(2025, 11, 28), day(2025, 12, 18));
        let synergy = base()
            .with_state(SynergyState::InRfp)
            .with_rfp(rfp)
            .with_updated_at(day(2025, 11, 28) + Duration::hours(2));
        let events = extract_timeline_events(&synergy);

        let slugs: Vec<&str> = events.iter().map(|e| e.kind.slug()).collect();
        assert_eq!(
            slugs,
            vec!["detection", "rfp-issued", "update", "delivery-start", "rfp-closing"]
        );
        assert!(events.windows(2).all(|w| w[0].date <= w[1].date));
    }

    #[test]
    fn test_approved_decision_emits_po() {
        let decision = CommitteeDecision {
            synergy_id: "SNG-1".to_string(),
            outcome: DecisionOutcome::Approved {
                supplier: "Acme".to_string(),
                offer_id: "O-1".to_string(),
                po_number: "PO-CLUSTER-2026-001".to_string(),
                po_amount: 1000.0,
                po_issued_at: day(2025, 12, 12),
                real_savings_pct: 5.0,
                real_savings_amount: 50.0,
            },
            reason: "Best offer".to_string(),
            comments: None,
            decided_by: "comite@cluster.com".to_string(),
            decided_at: day(2025, 12, 10),
        };
        let events = extract_timeline_events(&base().with_decision(decision));

        assert!(events.iter().any(|e| matches!(
            &e.kind,
            TimelineEventKind::PoIssued { po_number, .. } if po_number == "PO-CLUSTER-2026-001"
        )));
        assert!(events.iter().any(|e| matches!(
            e.kind,
            TimelineEventKind::CommitteeDecision { approved: true, .. }
        )));
    }

    #[test]
    fn test_group_by_date() {
        let other = Synergy::new(
            "SNG-2",
            "Bricks",
            "t",
            DateWindow::new(day(2026, 3, 1), day(2026, 4, 1)),
            day(2025, 11, 20) + Duration::hours(5),
        );
        let events = extract_all_timeline_events(&[base(), other]);
        let grouped = group_events_by_date(&events);

        assert_eq!(grouped[&day(2025, 11, 20).date_naive()].len(), 2);
        assert_eq!(grouped.len(), 3);
        assert!(group_events_by_date(&[]).is_empty());
    }
}
