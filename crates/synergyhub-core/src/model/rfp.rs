//! Joint requests for proposal, supplier offers and their evaluation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// RFP lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RfpState {
    Issued,
    Completed,
    Cancelled,
}

impl Default for RfpState {
    fn default() -> Self {
        RfpState::Issued
    }
}

/// One supplier's bid against an RFP.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Offer {
    pub id: String,
    pub rfp_id: String,
    pub synergy_id: String,
    pub supplier: String,
    pub contact: String,
    pub unit_price: f64,
    pub currency: String,
    #[serde(default)]
    pub volume_discount_pct: f64,
    pub total_amount: f64,
    pub lead_time_days: u32,
    /// Proposed service level as a fraction in `[0, 1]`.
    pub proposed_sla: f64,
    #[serde(default)]
    pub certifications: Vec<String>,
    #[serde(default)]
    pub comments: Option<String>,
}

impl Offer {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: impl Into<String>,
        rfp_id: impl Into<String>,
        synergy_id: impl Into<String>,
        supplier: impl Into<String>,
        unit_price: f64,
        total_amount: f64,
        lead_time_days: u32,
        proposed_sla: f64,
    ) -> Self {
        Self {
            id: id.into(),
            rfp_id: rfp_id.into(),
            synergy_id: synergy_id.into(),
            supplier: supplier.into(),
            contact: String::new(),
            unit_price,
            currency: "USD".to_string(),
            volume_discount_pct: 0.0,
            total_amount,
            lead_time_days,
            proposed_sla,
            certifications: Vec::new(),
            comments: None,
        }
    }

    pub fn with_contact(mut self, contact: impl Into<String>) -> Self {
        self.contact = contact.into();
        self
    }

    pub fn with_discount(mut self, pct: f64) -> Self {
        self.volume_discount_pct = pct;
        self
    }

    pub fn with_certifications<I, S>(mut self, certifications: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.certifications = certifications.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_comments(mut self, comments: impl Into<String>) -> Self {
        self.comments = Some(comments.into());
        self
    }
}

/// Committee approval outcome attached to an evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ApprovalStatus {
    Pending,
    Approved { by: String, at: DateTime<Utc> },
    Rejected { by: String, at: DateTime<Utc> },
}

impl ApprovalStatus {
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }
}

impl Default for ApprovalStatus {
    fn default() -> Self {
        ApprovalStatus::Pending
    }
}

/// Scoring outcome for one RFP.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub rfp_id: String,
    /// Best offers in rank order, at most three.
    pub top_offers: Vec<String>,
    pub recommended_supplier: String,
    pub recommended_offer_id: String,
    pub justification: String,
    pub savings_vs_baseline_pct: f64,
    pub savings_vs_baseline_amount: f64,
    #[serde(default)]
    pub evaluated_by: Vec<String>,
    pub evaluated_at: DateTime<Utc>,
    pub requires_committee_approval: bool,
    #[serde(default)]
    pub approval: ApprovalStatus,
}

impl Evaluation {
    /// Whether the evaluation is waiting on the committee.
    pub fn awaiting_committee(&self) -> bool {
        self.requires_committee_approval && self.approval.is_pending()
    }
}

/// A joint request for proposal issued for one synergy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rfp {
    pub id: String,
    pub synergy_id: String,
    pub issued_at: DateTime<Utc>,
    pub closes_at: DateTime<Utc>,
    #[serde(default)]
    pub decided_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub invited_suppliers: Vec<String>,
    #[serde(default)]
    pub offers: Vec<Offer>,
    #[serde(default)]
    pub evaluation: Option<Evaluation>,
    #[serde(default)]
    pub state: RfpState,
}

impl Rfp {
    pub fn new(
        id: impl Into<String>,
        synergy_id: impl Into<String>,
        issued_at: DateTime<Utc>,
        closes_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            synergy_id: synergy_id.into(),
            issued_at,
            closes_at,
            decided_at: None,
            invited_suppliers: Vec::new(),
            offers: Vec::new(),
            evaluation: None,
            state: RfpState::Issued,
        }
    }

    pub fn with_invited<I, S>(mut self, suppliers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.invited_suppliers = suppliers.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_offer(mut self, offer: Offer) -> Self {
        self.offers.push(offer);
        self
    }

    pub fn with_evaluation(mut self, evaluation: Evaluation) -> Self {
        self.evaluation = Some(evaluation);
        self
    }

    pub fn offer(&self, offer_id: &str) -> Option<&Offer> {
        self.offers.iter().find(|o| o.id == offer_id)
    }

    /// Fraction of the bidding window that has elapsed at `now`, clamped to `[0, 1]`.
    pub fn progress(&self, now: DateTime<Utc>) -> f64 {
        let total = (self.closes_at - self.issued_at).num_milliseconds();
        if total <= 0 {
            return 1.0;
        }
        let elapsed = (now - self.issued_at).num_milliseconds();
        (elapsed as f64 / total as f64).clamp(0.0, 1.0)
    }
}
