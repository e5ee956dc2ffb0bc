//! End-to-end committee workflow over the sample snapshot.

use std::cell::Cell;
use std::rc::Rc;

use chrono::{DateTime, TimeZone, Utc};
use synergyhub_core::error::{CoreError, LedgerError, StoreError, TransitionError};
use synergyhub_core::fixtures::{
    sample_synergies, CATALYST_RFP_ID, CATALYST_SYNERGY_ID, REFRACTORY_RFP_ID,
    REFRACTORY_SYNERGY_ID, TUBES_RFP_ID, TUBES_SYNERGY_ID,
};
use synergyhub_core::ledger::{transaction_hash, Ledger, MockLedger};
use synergyhub_core::model::{
    ApprovalStatus, DecisionOutcome, LedgerReceipt, PoStatus, PurchaseOrder, RfpState,
    SynergyState,
};
use synergyhub_core::scoring::CriteriaWeights;
use synergyhub_core::timeline::{extract_timeline_events, TimelineEventKind};
use synergyhub_core::{FixedClock, SynergyStore};

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 5, 16, 0, 0).unwrap()
}

fn store_with_seed(seed: u64) -> SynergyStore<FixedClock, MockLedger> {
    SynergyStore::new(sample_synergies(), FixedClock::new(now()), MockLedger::with_seed(seed))
}

/// Ledger that can be switched offline from the outside.
struct SwitchableLedger {
    offline: Rc<Cell<bool>>,
    inner: MockLedger,
}

impl Ledger for SwitchableLedger {
    fn submit(&mut self, po: &PurchaseOrder) -> Result<LedgerReceipt, LedgerError> {
        if self.offline.get() {
            return Err(LedgerError::Unavailable("node unreachable".to_string()));
        }
        self.inner.submit(po)
    }
}

#[test]
fn test_store_seeds_existing_purchase_order() {
    let store = store_with_seed(42);

    assert_eq!(store.decisions().len(), 1);
    let po = store.purchase_order("PO-CLUSTER-2026-001").unwrap();
    assert_eq!(po.synergy_id, REFRACTORY_SYNERGY_ID);
    assert_eq!(po.status, PoStatus::Confirmed);
    assert_eq!(po.companies.len(), 4);
    assert_eq!(
        po.receipt.as_ref().unwrap().transaction_hash,
        transaction_hash("PO-CLUSTER-2026-001")
    );

    let pending: Vec<&str> = store.pending_rfps().iter().map(|r| r.id.as_str()).collect();
    assert_eq!(pending, vec![TUBES_RFP_ID]);
}

#[test]
fn test_approve_tubes_issues_second_po() {
    let mut store = store_with_seed(42);

    let po = store
        .approve_rfp(TUBES_RFP_ID, "comite@cluster.com", Some("Approved in the January session"))
        .unwrap();
    assert_eq!(po.number, "PO-CLUSTER-2026-002");
    assert_eq!(po.supplier, "Tenaris");
    assert_eq!(po.total_amount, 666_000.0);
    assert_eq!(po.status, PoStatus::Confirmed);
    assert_eq!(store.ledger().submitted(), 2);

    let synergy = store.synergy(TUBES_SYNERGY_ID).unwrap();
    assert_eq!(synergy.state, SynergyState::Closed);
    assert_eq!(synergy.updated_at, Some(now()));
    let decision = synergy.decision.as_ref().unwrap();
    assert_eq!(decision.reason, "Approved in the January session");
    match &decision.outcome {
        DecisionOutcome::Approved {
            real_savings_amount,
            po_issued_at,
            ..
        } => {
            assert_eq!(*real_savings_amount, 46_800.0);
            assert_eq!(*po_issued_at, now());
        }
        DecisionOutcome::Rejected => panic!("expected approval"),
    }

    let rfp = store.rfp(TUBES_RFP_ID).unwrap();
    assert_eq!(rfp.state, RfpState::Completed);
    assert!(matches!(
        rfp.evaluation.as_ref().unwrap().approval,
        ApprovalStatus::Approved { .. }
    ));
    assert!(store.pending_rfps().is_empty());

    // The new decision shows up on the timeline.
    let kinds: Vec<&str> = extract_timeline_events(synergy)
        .iter()
        .map(|e| e.kind.slug())
        .collect();
    assert!(kinds.contains(&"committee"));
    assert!(kinds.contains(&"po-issued"));
    assert!(kinds.contains(&"rfp-decision"));
}

#[test]
fn test_decided_rfps_cannot_be_decided_again() {
    let mut store = store_with_seed(1);

    assert!(matches!(
        store.approve_rfp(REFRACTORY_RFP_ID, "comite", None),
        Err(CoreError::Transition(TransitionError::Illegal {
            from: SynergyState::Closed,
            ..
        }))
    ));
    assert!(matches!(
        store.approve_rfp(CATALYST_RFP_ID, "comite", None),
        Err(CoreError::Transition(_))
    ));
    assert!(matches!(
        store.approve_rfp("RFP-UNKNOWN", "comite", None),
        Err(CoreError::Store(StoreError::RfpNotFound(_)))
    ));
}

#[test]
fn test_catalyst_has_nothing_to_evaluate() {
    let mut store = store_with_seed(1);
    let result = store
        .evaluate_rfp(CATALYST_RFP_ID, CriteriaWeights::default(), None, "auditor@cluster.com")
        .unwrap();
    assert!(result.is_none());
    assert_eq!(
        store.synergy(CATALYST_SYNERGY_ID).unwrap().state,
        SynergyState::InRfp
    );
}

#[test]
fn test_counter_offer_then_reject() {
    let mut store = store_with_seed(1);

    store.request_counter_offer(TUBES_SYNERGY_ID).unwrap();
    assert_eq!(
        store.synergy(TUBES_SYNERGY_ID).unwrap().state,
        SynergyState::CounterOffer
    );
    assert_eq!(store.synergies_in_state(SynergyState::CounterOffer).len(), 1);

    let decision = store
        .reject_rfp(TUBES_RFP_ID, "comite@cluster.com", Some("   "))
        .unwrap();
    assert_eq!(decision.reason, "Rejected by committee");
    assert_eq!(decision.comments.as_deref(), Some("   "));
    assert_eq!(
        store.synergy(TUBES_SYNERGY_ID).unwrap().state,
        SynergyState::Rejected
    );
    assert_eq!(store.rfp(TUBES_RFP_ID).unwrap().state, RfpState::Cancelled);
    assert_eq!(store.decisions().len(), 2);
    assert_eq!(store.purchase_orders().len(), 1);
}

#[test]
fn test_ledger_outage_then_retry() {
    let offline = Rc::new(Cell::new(false));
    let ledger = SwitchableLedger {
        offline: Rc::clone(&offline),
        inner: MockLedger::with_seed(9),
    };
    let mut store = SynergyStore::new(sample_synergies(), FixedClock::new(now()), ledger)
        .with_po_prefix("PO-TEST");

    offline.set(true);
    let po = store.approve_rfp(TUBES_RFP_ID, "comite", None).unwrap();
    assert_eq!(po.number, "PO-TEST-2026-002");
    assert_eq!(po.status, PoStatus::Failed);
    assert!(po.receipt.is_none());
    assert_eq!(
        store.synergy(TUBES_SYNERGY_ID).unwrap().state,
        SynergyState::Approved
    );

    offline.set(false);
    let retried = store.retry_purchase_order(&po.number).unwrap();
    assert_eq!(retried.status, PoStatus::Confirmed);
    assert!(retried.receipt.is_some());
    assert_eq!(
        store.synergy(TUBES_SYNERGY_ID).unwrap().state,
        SynergyState::Closed
    );

    assert!(matches!(
        store.retry_purchase_order(&po.number),
        Err(CoreError::Store(StoreError::PurchaseOrderNotFailed(_)))
    ));
}

#[test]
fn test_manual_transitions_follow_lifecycle() {
    let mut store = store_with_seed(1);
    let bricks = "SNG-2026-02-MGCR-BRICK";

    assert!(matches!(
        store.transition(bricks, SynergyState::Closed),
        Err(CoreError::Transition(TransitionError::Illegal { .. }))
    ));
    store.transition(bricks, SynergyState::InRfp).unwrap();
    assert_eq!(store.synergy(bricks).unwrap().state, SynergyState::InRfp);
    store.transition(bricks, SynergyState::Rejected).unwrap();
    assert!(store.synergy(bricks).unwrap().state.is_terminal());
}
