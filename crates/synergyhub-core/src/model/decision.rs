//! Committee decisions and the purchase orders they issue.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What the committee decided.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum DecisionOutcome {
    Approved {
        supplier: String,
        offer_id: String,
        po_number: String,
        po_amount: f64,
        po_issued_at: DateTime<Utc>,
        real_savings_pct: f64,
        real_savings_amount: f64,
    },
    Rejected,
}

/// Terminal record of a committee approval or rejection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommitteeDecision {
    pub synergy_id: String,
    pub outcome: DecisionOutcome,
    pub reason: String,
    #[serde(default)]
    pub comments: Option<String>,
    pub decided_by: String,
    pub decided_at: DateTime<Utc>,
}

impl CommitteeDecision {
    pub fn is_approval(&self) -> bool {
        matches!(self.outcome, DecisionOutcome::Approved { .. })
    }

    pub fn po_number(&self) -> Option<&str> {
        match &self.outcome {
            DecisionOutcome::Approved { po_number, .. } => Some(po_number),
            DecisionOutcome::Rejected => None,
        }
    }
}

/// Ledger confirmation for a purchase order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerReceipt {
    pub transaction_hash: String,
    pub block_number: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PoStatus {
    Pending,
    Confirmed,
    Failed,
}

/// Joint purchase order issued on committee approval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseOrder {
    pub number: String,
    pub synergy_id: String,
    pub material: String,
    pub supplier: String,
    pub total_amount: f64,
    pub currency: String,
    pub issued_at: DateTime<Utc>,
    pub companies: Vec<String>,
    #[serde(default)]
    pub receipt: Option<LedgerReceipt>,
    pub status: PoStatus,
}

impl PurchaseOrder {
    pub fn confirm(&mut self, receipt: LedgerReceipt) {
        self.receipt = Some(receipt);
        self.status = PoStatus::Confirmed;
    }

    pub fn fail(&mut self) {
        self.receipt = None;
        self.status = PoStatus::Failed;
    }
}
