//! In-memory synergy store.
//!
//! The store owns the synergy snapshot plus the committee decisions and
//! purchase orders derived from it. Every mutation goes through the lifecycle
//! table on [`SynergyState`]; time comes from the injected [`Clock`] and PO
//! receipts from the injected [`Ledger`].

use chrono::Datelike;

use crate::clock::{Clock, SystemClock};
use crate::error::{Result, StoreError, TransitionError, ValidationError};
use crate::ledger::{Ledger, MockLedger};
use crate::model::{
    ApprovalStatus, CommitteeDecision, DecisionOutcome, Evaluation, PoStatus, PurchaseOrder, Rfp,
    RfpState, Synergy, SynergyState,
};
use crate::scoring::{CriteriaWeights, OfferScorer};

pub const DEFAULT_PO_PREFIX: &str = "PO-CLUSTER";
const DEFAULT_APPROVAL_REASON: &str = "Approved by committee";
const DEFAULT_REJECTION_REASON: &str = "Rejected by committee";

pub struct SynergyStore<C: Clock = SystemClock, L: Ledger = MockLedger> {
    synergies: Vec<Synergy>,
    decisions: Vec<CommitteeDecision>,
    purchase_orders: Vec<PurchaseOrder>,
    po_prefix: String,
    clock: C,
    ledger: L,
}

impl<C: Clock, L: Ledger> SynergyStore<C, L> {
    /// Build a store over `synergies`.
    ///
    /// Approved decisions already present in the snapshot get their purchase
    /// order rebuilt and submitted to `ledger`.
    pub fn new(synergies: Vec<Synergy>, clock: C, ledger: L) -> Self {
        let mut store = Self {
            synergies,
            decisions: Vec::new(),
            purchase_orders: Vec::new(),
            po_prefix: DEFAULT_PO_PREFIX.to_string(),
            clock,
            ledger,
        };
        store.seed_from_decisions();
        store
    }

    pub fn with_po_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.po_prefix = prefix.into();
        self
    }

    fn seed_from_decisions(&mut self) {
        for synergy in &self.synergies {
            let Some(decision) = &synergy.decision else {
                continue;
            };
            self.decisions.push(decision.clone());

            if let DecisionOutcome::Approved {
                supplier,
                po_number,
                po_amount,
                po_issued_at,
                ..
            } = &decision.outcome
            {
                let mut po = PurchaseOrder {
                    number: po_number.clone(),
                    synergy_id: synergy.id.clone(),
                    material: synergy.material.clone(),
                    supplier: supplier.clone(),
                    total_amount: *po_amount,
                    currency: currency_of(synergy, supplier),
                    issued_at: *po_issued_at,
                    companies: synergy.companies(),
                    receipt: None,
                    status: PoStatus::Pending,
                };
                match self.ledger.submit(&po) {
                    Ok(receipt) => po.confirm(receipt),
                    Err(e) => {
                        tracing::warn!(po = %po.number, "ledger rejected seeded purchase order: {e}");
                        po.fail();
                    }
                }
                self.purchase_orders.push(po);
            }
        }
        tracing::debug!(
            synergies = self.synergies.len(),
            decisions = self.decisions.len(),
            purchase_orders = self.purchase_orders.len(),
            "store initialised"
        );
    }

    // ── selectors ────────────────────────────────────────────────────

    pub fn synergies(&self) -> &[Synergy] {
        &self.synergies
    }

    pub fn synergy(&self, id: &str) -> Option<&Synergy> {
        self.synergies.iter().find(|s| s.id == id)
    }

    pub fn rfp(&self, rfp_id: &str) -> Option<&Rfp> {
        self.synergies
            .iter()
            .filter_map(|s| s.rfp.as_ref())
            .find(|r| r.id == rfp_id)
    }

    pub fn rfp_for_synergy(&self, synergy_id: &str) -> Option<&Rfp> {
        self.synergy(synergy_id)?.rfp.as_ref()
    }

    /// RFPs whose evaluation is waiting on the committee.
    pub fn pending_rfps(&self) -> Vec<&Rfp> {
        self.synergies
            .iter()
            .filter_map(|s| s.rfp.as_ref())
            .filter(|r| {
                r.state == RfpState::Issued
                    && r.evaluation.as_ref().is_some_and(Evaluation::awaiting_committee)
            })
            .collect()
    }

    pub fn synergies_in_state(&self, state: SynergyState) -> Vec<&Synergy> {
        self.synergies.iter().filter(|s| s.state == state).collect()
    }

    pub fn decisions(&self) -> &[CommitteeDecision] {
        &self.decisions
    }

    pub fn purchase_orders(&self) -> &[PurchaseOrder] {
        &self.purchase_orders
    }

    pub fn purchase_order(&self, number: &str) -> Option<&PurchaseOrder> {
        self.purchase_orders.iter().find(|po| po.number == number)
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    pub fn into_synergies(self) -> Vec<Synergy> {
        self.synergies
    }

    // ── mutations ────────────────────────────────────────────────────

    fn synergy_index(&self, synergy_id: &str) -> Result<usize> {
        self.synergies
            .iter()
            .position(|s| s.id == synergy_id)
            .ok_or_else(|| StoreError::SynergyNotFound(synergy_id.to_string()).into())
    }

    fn rfp_index(&self, rfp_id: &str) -> Result<usize> {
        self.synergies
            .iter()
            .position(|s| s.rfp.as_ref().is_some_and(|r| r.id == rfp_id))
            .ok_or_else(|| StoreError::RfpNotFound(rfp_id.to_string()).into())
    }

    /// Move a synergy along one lifecycle edge.
    pub fn transition(&mut self, synergy_id: &str, state: SynergyState) -> Result<()> {
        let idx = self.synergy_index(synergy_id)?;
        let now = self.clock.now();
        let synergy = &mut self.synergies[idx];
        let from = synergy.state;
        synergy.transition_to(state, now)?;
        tracing::info!(synergy = %synergy_id, %from, to = %state, "synergy transitioned");
        Ok(())
    }

    /// Attach an evaluation to its RFP and mark the synergy recommended.
    ///
    /// Every offer id the evaluation mentions must exist in the RFP.
    pub fn record_evaluation(&mut self, rfp_id: &str, evaluation: Evaluation) -> Result<()> {
        let idx = self.rfp_index(rfp_id)?;
        let now = self.clock.now();
        let synergy = &mut self.synergies[idx];
        let Some(rfp) = synergy.rfp.as_mut() else {
            return Err(StoreError::RfpNotFound(rfp_id.to_string()).into());
        };

        if rfp.state != RfpState::Issued {
            return Err(StoreError::AlreadyDecided(rfp_id.to_string()).into());
        }
        for offer_id in evaluation
            .top_offers
            .iter()
            .chain(std::iter::once(&evaluation.recommended_offer_id))
        {
            if rfp.offer(offer_id).is_none() {
                return Err(ValidationError::UnknownOffer {
                    rfp_id: rfp_id.to_string(),
                    offer_id: offer_id.clone(),
                }
                .into());
            }
        }

        tracing::info!(
            rfp = %rfp_id,
            supplier = %evaluation.recommended_supplier,
            "evaluation recorded"
        );
        rfp.evaluation = Some(evaluation);

        if synergy.state.can_transition_to(&SynergyState::Recommended) {
            let from = synergy.state;
            synergy.transition_to(SynergyState::Recommended, now)?;
            tracing::info!(
                synergy = %synergy.id,
                %from,
                to = %SynergyState::Recommended,
                "synergy transitioned"
            );
        } else {
            synergy.updated_at = Some(now);
        }
        Ok(())
    }

    /// Score the RFP's offers and record the result.
    ///
    /// Returns `Ok(None)` when the RFP has no offers yet.
    pub fn evaluate_rfp(
        &mut self,
        rfp_id: &str,
        weights: CriteriaWeights,
        justification: Option<&str>,
        evaluator: &str,
    ) -> Result<Option<Evaluation>> {
        let now = self.clock.now();
        let rfp = self
            .rfp(rfp_id)
            .ok_or_else(|| StoreError::RfpNotFound(rfp_id.to_string()))?;

        let Some(evaluation) = OfferScorer::with_weights(weights).evaluate(
            rfp,
            justification,
            vec![evaluator.to_string()],
            now,
        ) else {
            tracing::debug!(rfp = %rfp_id, "no offers to evaluate");
            return Ok(None);
        };

        self.record_evaluation(rfp_id, evaluation.clone())?;
        Ok(Some(evaluation))
    }

    /// Approve the recommended offer and issue its purchase order.
    ///
    /// A ledger failure leaves the PO `Failed` and the synergy `Approved`;
    /// see [`SynergyStore::retry_purchase_order`].
    pub fn approve_rfp(
        &mut self,
        rfp_id: &str,
        actor: &str,
        comment: Option<&str>,
    ) -> Result<PurchaseOrder> {
        let idx = self.rfp_index(rfp_id)?;
        let now = self.clock.now();
        let seq = self.purchase_orders.len() + 1;
        let po_number = format!("{}-{}-{:03}", self.po_prefix, now.year(), seq);

        let synergy = &mut self.synergies[idx];
        if !synergy.state.can_transition_to(&SynergyState::Approved) {
            return Err(TransitionError::Illegal {
                from: synergy.state,
                to: SynergyState::Approved,
            }
            .into());
        }

        let (offer, savings_pct, savings_amount) = {
            let rfp = synergy
                .rfp
                .as_ref()
                .ok_or_else(|| StoreError::RfpNotFound(rfp_id.to_string()))?;
            let evaluation = rfp
                .evaluation
                .as_ref()
                .ok_or_else(|| StoreError::MissingEvaluation(rfp_id.to_string()))?;
            if !evaluation.approval.is_pending() || rfp.state != RfpState::Issued {
                return Err(StoreError::AlreadyDecided(rfp_id.to_string()).into());
            }
            let offer = rfp.offer(&evaluation.recommended_offer_id).ok_or_else(|| {
                StoreError::OfferNotFound {
                    rfp_id: rfp_id.to_string(),
                    offer_id: evaluation.recommended_offer_id.clone(),
                }
            })?;
            (
                offer.clone(),
                evaluation.savings_vs_baseline_pct,
                evaluation.savings_vs_baseline_amount,
            )
        };

        let decision = CommitteeDecision {
            synergy_id: synergy.id.clone(),
            outcome: DecisionOutcome::Approved {
                supplier: offer.supplier.clone(),
                offer_id: offer.id.clone(),
                po_number: po_number.clone(),
                po_amount: offer.total_amount,
                po_issued_at: now,
                real_savings_pct: savings_pct,
                real_savings_amount: savings_amount,
            },
            reason: reason_or(comment, DEFAULT_APPROVAL_REASON),
            comments: comment.map(str::to_string),
            decided_by: actor.to_string(),
            decided_at: now,
        };

        if let Some(rfp) = synergy.rfp.as_mut() {
            if let Some(evaluation) = rfp.evaluation.as_mut() {
                evaluation.approval = ApprovalStatus::Approved {
                    by: actor.to_string(),
                    at: now,
                };
            }
            rfp.state = RfpState::Completed;
            rfp.decided_at = Some(now);
        }
        synergy.decision = Some(decision.clone());
        synergy.transition_to(SynergyState::Approved, now)?;
        self.decisions.push(decision);

        let mut po = PurchaseOrder {
            number: po_number,
            synergy_id: synergy.id.clone(),
            material: synergy.material.clone(),
            supplier: offer.supplier.clone(),
            total_amount: offer.total_amount,
            currency: offer.currency.clone(),
            issued_at: now,
            companies: synergy.companies(),
            receipt: None,
            status: PoStatus::Pending,
        };
        tracing::info!(
            rfp = %rfp_id,
            po = %po.number,
            supplier = %po.supplier,
            amount = po.total_amount,
            "committee approved, purchase order issued"
        );

        match self.ledger.submit(&po) {
            Ok(receipt) => {
                po.confirm(receipt);
                synergy.transition_to(SynergyState::Closed, now)?;
                tracing::info!(synergy = %synergy.id, po = %po.number, "synergy closed");
            }
            Err(e) => {
                tracing::warn!(po = %po.number, "ledger submission failed, synergy stays approved: {e}");
                po.fail();
            }
        }

        self.purchase_orders.push(po.clone());
        Ok(po)
    }

    /// Re-submit a failed purchase order; closes the synergy on success.
    pub fn retry_purchase_order(&mut self, po_number: &str) -> Result<PurchaseOrder> {
        let now = self.clock.now();
        let po_idx = self
            .purchase_orders
            .iter()
            .position(|po| po.number == po_number)
            .ok_or_else(|| StoreError::PurchaseOrderNotFound(po_number.to_string()))?;

        if self.purchase_orders[po_idx].status != PoStatus::Failed {
            return Err(StoreError::PurchaseOrderNotFailed(po_number.to_string()).into());
        }

        let receipt = self.ledger.submit(&self.purchase_orders[po_idx])?;
        let po = &mut self.purchase_orders[po_idx];
        po.confirm(receipt);
        let synergy_id = po.synergy_id.clone();
        let po = po.clone();

        let idx = self.synergy_index(&synergy_id)?;
        let synergy = &mut self.synergies[idx];
        if synergy.state == SynergyState::Approved {
            synergy.transition_to(SynergyState::Closed, now)?;
            tracing::info!(synergy = %synergy_id, po = %po_number, "synergy closed after ledger retry");
        }
        Ok(po)
    }

    /// Reject the RFP outright.
    pub fn reject_rfp(
        &mut self,
        rfp_id: &str,
        actor: &str,
        comment: Option<&str>,
    ) -> Result<CommitteeDecision> {
        let idx = self.rfp_index(rfp_id)?;
        let now = self.clock.now();
        let synergy = &mut self.synergies[idx];

        if !synergy.state.can_transition_to(&SynergyState::Rejected) {
            return Err(TransitionError::Illegal {
                from: synergy.state,
                to: SynergyState::Rejected,
            }
            .into());
        }
        let rfp = synergy
            .rfp
            .as_mut()
            .ok_or_else(|| StoreError::RfpNotFound(rfp_id.to_string()))?;
        if rfp.state != RfpState::Issued
            || rfp.evaluation.as_ref().is_some_and(|e| !e.approval.is_pending())
        {
            return Err(StoreError::AlreadyDecided(rfp_id.to_string()).into());
        }

        if let Some(evaluation) = rfp.evaluation.as_mut() {
            evaluation.approval = ApprovalStatus::Rejected {
                by: actor.to_string(),
                at: now,
            };
        }
        rfp.state = RfpState::Cancelled;
        rfp.decided_at = Some(now);

        let decision = CommitteeDecision {
            synergy_id: synergy.id.clone(),
            outcome: DecisionOutcome::Rejected,
            reason: reason_or(comment, DEFAULT_REJECTION_REASON),
            comments: comment.map(str::to_string),
            decided_by: actor.to_string(),
            decided_at: now,
        };
        synergy.decision = Some(decision.clone());
        synergy.transition_to(SynergyState::Rejected, now)?;
        self.decisions.push(decision.clone());

        tracing::info!(rfp = %rfp_id, synergy = %synergy.id, "committee rejected");
        Ok(decision)
    }

    /// Send a recommended synergy back to the suppliers for better terms.
    pub fn request_counter_offer(&mut self, synergy_id: &str) -> Result<()> {
        self.transition(synergy_id, SynergyState::CounterOffer)
    }
}

fn reason_or(comment: Option<&str>, default: &str) -> String {
    match comment.map(str::trim) {
        Some(text) if !text.is_empty() => text.to_string(),
        _ => default.to_string(),
    }
}

fn currency_of(synergy: &Synergy, supplier: &str) -> String {
    synergy
        .rfp
        .as_ref()
        .and_then(|r| r.offers.iter().find(|o| o.supplier == supplier))
        .map_or_else(|| "USD".to_string(), |o| o.currency.clone())
}
