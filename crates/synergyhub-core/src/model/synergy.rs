//! Synergy records and their lifecycle.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::decision::CommitteeDecision;
use super::rfp::Rfp;
use crate::error::{TransitionError, ValidationError};

/// Inclusive `[start, end]` time window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateWindow {
    /// Build a window without checking ordering. Inverted windows are tolerated
    /// by every engine and simply produce empty or zero-width results.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// Build a window, rejecting `end < start`.
    pub fn try_new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, ValidationError> {
        if end < start {
            return Err(ValidationError::InvalidTimeRange { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.start <= at && at <= self.end
    }

    /// Whole days two windows share, rounded up. Disjoint windows share 0 days.
    pub fn overlap_days(&self, other: &DateWindow) -> i64 {
        let start = self.start.max(other.start);
        let end = self.end.min(other.end);
        let ms = (end - start).num_milliseconds();
        if ms <= 0 {
            return 0;
        }
        let day_ms = Duration::days(1).num_milliseconds();
        (ms + day_ms - 1) / day_ms
    }
}

/// How critical a company's need is for its shutdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Criticality {
    High,
    Medium,
    Low,
}

impl Criticality {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

impl std::str::FromStr for Criticality {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "high" => Ok(Self::High),
            "medium" => Ok(Self::Medium),
            "low" => Ok(Self::Low),
            _ => Err(format!("unknown criticality: {s}")),
        }
    }
}

/// Synergy lifecycle state.
///
///   PENDING ──> IN_RFP ──> RECOMMENDED ──> APPROVED ──> CLOSED
///      |           |          |    ^           ^
///      |           |          v    |           |
///      |           |       COUNTER_OFFER ──────+
///      v           v          v
///   REJECTED <─────+──────────+
///
/// Valid transitions:
/// - PENDING → IN_RFP | REJECTED
/// - IN_RFP → RECOMMENDED | REJECTED
/// - RECOMMENDED → APPROVED | COUNTER_OFFER | REJECTED
/// - COUNTER_OFFER → RECOMMENDED | APPROVED | REJECTED
/// - APPROVED → CLOSED (only with a committee decision attached)
///
/// CLOSED and REJECTED are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SynergyState {
    Pending,
    InRfp,
    Recommended,
    Approved,
    CounterOffer,
    Closed,
    Rejected,
}

impl SynergyState {
    /// Check if a transition is valid.
    pub fn can_transition_to(&self, to: &SynergyState) -> bool {
        self.valid_transitions().contains(to)
    }

    /// Get valid next states for this state.
    pub fn valid_transitions(&self) -> &'static [SynergyState] {
        match self {
            Self::Pending => &[Self::InRfp, Self::Rejected],
            Self::InRfp => &[Self::Recommended, Self::Rejected],
            Self::Recommended => &[Self::Approved, Self::CounterOffer, Self::Rejected],
            Self::CounterOffer => &[Self::Recommended, Self::Approved, Self::Rejected],
            Self::Approved => &[Self::Closed],
            Self::Closed | Self::Rejected => &[],
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.valid_transitions().is_empty()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InRfp => "in_rfp",
            Self::Recommended => "recommended",
            Self::Approved => "approved",
            Self::CounterOffer => "counter_offer",
            Self::Closed => "closed",
            Self::Rejected => "rejected",
        }
    }

    pub fn all() -> &'static [SynergyState] {
        &[
            Self::Pending,
            Self::InRfp,
            Self::Recommended,
            Self::Approved,
            Self::CounterOffer,
            Self::Closed,
            Self::Rejected,
        ]
    }
}

impl Default for SynergyState {
    fn default() -> Self {
        SynergyState::Pending
    }
}

impl fmt::Display for SynergyState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SynergyState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|state| state.as_str() == s)
            .ok_or_else(|| format!("unknown synergy state: {s}"))
    }
}

/// One company's share of a synergy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyParticipation {
    pub company: String,
    /// Organizational unit (plant, furnace, reactor...) that needs the material.
    pub unit: String,
    pub quantity: f64,
    pub delivery_window: DateWindow,
    pub criticality: Criticality,
}

impl CompanyParticipation {
    pub fn new(
        company: impl Into<String>,
        unit: impl Into<String>,
        quantity: f64,
        delivery_window: DateWindow,
        criticality: Criticality,
    ) -> Self {
        Self {
            company: company.into(),
            unit: unit.into(),
            quantity,
            delivery_window,
            criticality,
        }
    }
}

/// An opportunity for several companies to jointly source one material.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Synergy {
    pub id: String,
    pub material: String,
    /// Unit of measure for every participant quantity (m3, t, units...).
    pub unit_of_measure: String,
    pub participants: Vec<CompanyParticipation>,
    pub window: DateWindow,
    #[serde(default)]
    pub estimated_savings_amount: Option<f64>,
    #[serde(default)]
    pub estimated_savings_pct: Option<f64>,
    #[serde(default)]
    pub state: SynergyState,
    #[serde(default)]
    pub rfp: Option<Rfp>,
    #[serde(default)]
    pub decision: Option<CommitteeDecision>,
    pub detected_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Synergy {
    pub fn new(
        id: impl Into<String>,
        material: impl Into<String>,
        unit_of_measure: impl Into<String>,
        window: DateWindow,
        detected_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            material: material.into(),
            unit_of_measure: unit_of_measure.into(),
            participants: Vec::new(),
            window,
            estimated_savings_amount: None,
            estimated_savings_pct: None,
            state: SynergyState::Pending,
            rfp: None,
            decision: None,
            detected_at,
            updated_at: None,
        }
    }

    pub fn with_participant(mut self, participant: CompanyParticipation) -> Self {
        self.participants.push(participant);
        self
    }

    pub fn with_estimated_savings(mut self, amount: f64, pct: f64) -> Self {
        self.estimated_savings_amount = Some(amount);
        self.estimated_savings_pct = Some(pct);
        self
    }

    pub fn with_state(mut self, state: SynergyState) -> Self {
        self.state = state;
        self
    }

    pub fn with_rfp(mut self, rfp: Rfp) -> Self {
        self.rfp = Some(rfp);
        self
    }

    pub fn with_decision(mut self, decision: CommitteeDecision) -> Self {
        self.decision = Some(decision);
        self
    }

    pub fn with_updated_at(mut self, at: DateTime<Utc>) -> Self {
        self.updated_at = Some(at);
        self
    }

    pub fn company_count(&self) -> usize {
        self.participants.len()
    }

    pub fn total_volume(&self) -> f64 {
        self.participants.iter().map(|p| p.quantity).sum()
    }

    pub fn companies(&self) -> Vec<String> {
        self.participants.iter().map(|p| p.company.clone()).collect()
    }

    /// Estimated savings split evenly across participants, regardless of how
    /// much each one buys.
    pub fn savings_share(&self) -> Option<f64> {
        let amount = self.estimated_savings_amount?;
        if self.participants.is_empty() {
            return None;
        }
        Some(amount / self.participants.len() as f64)
    }

    /// Transition to a new state.
    ///
    /// Returns an error if the edge is not in the lifecycle table, or if the
    /// synergy is being closed without a committee decision.
    pub fn transition_to(
        &mut self,
        new_state: SynergyState,
        now: DateTime<Utc>,
    ) -> Result<(), TransitionError> {
        if !self.state.can_transition_to(&new_state) {
            return Err(TransitionError::Illegal {
                from: self.state,
                to: new_state,
            });
        }

        if new_state == SynergyState::Closed && self.decision.is_none() {
            return Err(TransitionError::GuardFailed {
                to: new_state,
                reason: "no committee decision attached".to_string(),
            });
        }

        self.state = new_state;
        self.updated_at = Some(now);
        Ok(())
    }
}

/// Whether a synergy was detected within the last `threshold_hours`.
pub fn is_new_synergy(
    detected_at: DateTime<Utc>,
    now: DateTime<Utc>,
    threshold_hours: i64,
) -> bool {
    now - detected_at < Duration::hours(threshold_hours)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DecisionOutcome;
    use chrono::TimeZone;

    fn day(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    fn sample() -> Synergy {
        Synergy::new(
            "SNG-1",
            "Refractory brick",
            "m3",
            DateWindow::new(day(2026, 1, 10), day(2026, 2, 25)),
            day(2025, 11, 23),
        )
        .with_participant(CompanyParticipation::new(
            "Ecopetrol Refinería",
            "FCC",
            45.0,
            DateWindow::new(day(2026, 1, 10), day(2026, 2, 10)),
            Criticality::High,
        ))
        .with_participant(CompanyParticipation::new(
            "Yara Colombia",
            "Nitric acid",
            32.0,
            DateWindow::new(day(2026, 1, 25), day(2026, 2, 20)),
            Criticality::Medium,
        ))
        .with_estimated_savings(1000.0, 10.0)
    }

    #[test]
    fn test_valid_transitions() {
        assert!(SynergyState::Pending.can_transition_to(&SynergyState::InRfp));
        assert!(SynergyState::InRfp.can_transition_to(&SynergyState::Recommended));
        assert!(SynergyState::Recommended.can_transition_to(&SynergyState::CounterOffer));
        assert!(SynergyState::CounterOffer.can_transition_to(&SynergyState::Approved));
        assert!(SynergyState::Approved.can_transition_to(&SynergyState::Closed));
    }

    #[test]
    fn test_invalid_transitions() {
        assert!(!SynergyState::Pending.can_transition_to(&SynergyState::Closed));
        assert!(!SynergyState::InRfp.can_transition_to(&SynergyState::Approved));
        assert!(!SynergyState::Approved.can_transition_to(&SynergyState::Rejected));
        assert!(!SynergyState::Pending.can_transition_to(&SynergyState::Pending));
        assert!(SynergyState::Closed.is_terminal());
        assert!(SynergyState::Rejected.is_terminal());
    }

    #[test]
    fn test_close_requires_decision() {
        let now = day(2026, 3, 1);
        let mut synergy = sample().with_state(SynergyState::Approved);

        let err = synergy.transition_to(SynergyState::Closed, now).unwrap_err();
        assert!(matches!(err, TransitionError::GuardFailed { .. }));
        assert_eq!(synergy.state, SynergyState::Approved);

        synergy.decision = Some(CommitteeDecision {
            synergy_id: "SNG-1".to_string(),
            outcome: DecisionOutcome::Rejected,
            reason: "test".to_string(),
            comments: None,
            decided_by: "committee".to_string(),
            decided_at: now,
        });
        synergy.transition_to(SynergyState::Closed, now).unwrap();
        assert_eq!(synergy.state, SynergyState::Closed);
        assert_eq!(synergy.updated_at, Some(now));
    }

    #[test]
    fn test_illegal_transition_leaves_state() {
        let mut synergy = sample();
        let err = synergy
            .transition_to(SynergyState::Approved, day(2026, 1, 1))
            .unwrap_err();
        assert_eq!(
            err,
            TransitionError::Illegal {
                from: SynergyState::Pending,
                to: SynergyState::Approved
            }
        );
        assert_eq!(synergy.state, SynergyState::Pending);
        assert!(synergy.updated_at.is_none());
    }

    #[test]
    fn test_savings_share_is_even_split() {
        let synergy = sample();
        assert_eq!(synergy.savings_share(), Some(500.0));
        assert_eq!(synergy.total_volume(), 77.0);
    }

    #[test]
    fn test_state_parse_roundtrip() {
        for state in SynergyState::all() {
            assert_eq!(state.as_str().parse::<SynergyState>().unwrap(), *state);
        }
        assert!("bogus".parse::<SynergyState>().is_err());
    }

    #[test]
    fn test_overlap_days() {
        let a = DateWindow::new(day(2026, 1, 1), day(2026, 1, 10));
        let b = DateWindow::new(day(2026, 1, 5), day(2026, 1, 20));
        let c = DateWindow::new(day(2026, 2, 1), day(2026, 2, 5));
        assert_eq!(a.overlap_days(&b), 5);
        assert_eq!(a.overlap_days(&c), 0);
    }

    #[test]
    fn test_try_new_rejects_inverted_window() {
        assert!(DateWindow::try_new(day(2026, 2, 1), day(2026, 1, 1)).is_err());
        assert!(DateWindow::try_new(day(2026, 1, 1), day(2026, 1, 1)).is_ok());
    }

    #[test]
    fn test_is_new_synergy() {
        let now = day(2026, 1, 2);
        assert!(is_new_synergy(day(2026, 1, 1) + Duration::hours(1), now, 24));
        assert!(!is_new_synergy(day(2025, 12, 30), now, 24));
    }
}
