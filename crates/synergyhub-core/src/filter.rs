//! Dashboard filters over synergies and their graph.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::graph::{GraphData, GraphNode, MaterialCategory};
use crate::model::{Criticality, Synergy, SynergyState};

/// Conjunction of optional criteria. Empty lists and unset bounds match all.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SynergyFilter {
    #[serde(default)]
    pub states: Vec<SynergyState>,
    #[serde(default)]
    pub companies: Vec<String>,
    #[serde(default)]
    pub criticalities: Vec<Criticality>,
    #[serde(default)]
    pub date_from: Option<DateTime<Utc>>,
    #[serde(default)]
    pub date_to: Option<DateTime<Utc>>,
    /// Case-insensitive substring over id, material and company names.
    #[serde(default)]
    pub query: String,
}

impl SynergyFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_states(mut self, states: impl IntoIterator<Item = SynergyState>) -> Self {
        self.states = states.into_iter().collect();
        self
    }

    pub fn with_companies<I, S>(mut self, companies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.companies = companies.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_criticalities(mut self, levels: impl IntoIterator<Item = Criticality>) -> Self {
        self.criticalities = levels.into_iter().collect();
        self
    }

    pub fn with_date_range(
        mut self,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Self {
        self.date_from = from;
        self.date_to = to;
        self
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    /// Whether any criterion is set.
    pub fn is_active(&self) -> bool {
        !self.states.is_empty()
            || !self.companies.is_empty()
            || !self.criticalities.is_empty()
            || self.date_from.is_some()
            || self.date_to.is_some()
            || !self.query.trim().is_empty()
    }

    pub fn matches(&self, synergy: &Synergy) -> bool {
        if !self.states.is_empty() && !self.states.contains(&synergy.state) {
            return false;
        }
        if !self.companies.is_empty()
            && !synergy
                .participants
                .iter()
                .any(|p| self.companies.contains(&p.company))
        {
            return false;
        }
        if !self.criticalities.is_empty()
            && !synergy
                .participants
                .iter()
                .any(|p| self.criticalities.contains(&p.criticality))
        {
            return false;
        }
        // Window must intersect [date_from, date_to].
        if self.date_from.is_some_and(|from| synergy.window.end < from) {
            return false;
        }
        if self.date_to.is_some_and(|to| synergy.window.start > to) {
            return false;
        }

        let query = self.query.trim().to_lowercase();
        if !query.is_empty() {
            let hit = synergy.id.to_lowercase().contains(&query)
                || synergy.material.to_lowercase().contains(&query)
                || synergy
                    .participants
                    .iter()
                    .any(|p| p.company.to_lowercase().contains(&query));
            if !hit {
                return false;
            }
        }
        true
    }

    pub fn apply<'a>(&self, synergies: &'a [Synergy]) -> Vec<&'a Synergy> {
        synergies.iter().filter(|s| self.matches(s)).collect()
    }

    /// Prune `graph` to nodes backed by a matching synergy, and edges
    /// between surviving nodes.
    pub fn filter_graph(&self, graph: &GraphData, synergies: &[Synergy]) -> GraphData {
        let kept = self.apply(synergies);
        let synergy_ids: HashSet<&str> = kept.iter().map(|s| s.id.as_str()).collect();
        let companies: HashSet<&str> = kept
            .iter()
            .flat_map(|s| s.participants.iter().map(|p| p.company.as_str()))
            .collect();
        let categories: HashSet<MaterialCategory> = kept
            .iter()
            .map(|s| MaterialCategory::classify(&s.material))
            .collect();

        let nodes: Vec<GraphNode> = graph
            .nodes
            .iter()
            .filter(|node| match node {
                GraphNode::Synergy { id, .. } => synergy_ids.contains(id.as_str()),
                GraphNode::Company { name, .. } => companies.contains(name.as_str()),
                GraphNode::Material { category, .. } => categories.contains(category),
            })
            .cloned()
            .collect();

        let node_ids: HashSet<&str> = nodes.iter().map(GraphNode::id).collect();
        let edges = graph
            .edges
            .iter()
            .filter(|e| {
                node_ids.contains(e.source.as_str()) && node_ids.contains(e.target.as_str())
            })
            .cloned()
            .collect();

        GraphData { nodes, edges }
    }
}

/// Whether `date` lies within the optional inclusive bounds.
pub fn is_date_in_range(
    date: DateTime<Utc>,
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
) -> bool {
    start.map_or(true, |s| date >= s) && end.map_or(true, |e| date <= e)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::build_graph;
    use crate::model::{CompanyParticipation, DateWindow};
    use chrono::TimeZone;

    fn day(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    fn participant(
        company: &str,
        window: DateWindow,
        criticality: Criticality,
    ) -> CompanyParticipation {
        CompanyParticipation::new(company, "u", 1.0, window, criticality)
    }

    fn sample() -> Vec<Synergy> {
        let w1 = DateWindow::new(day(2026, 1, 10), day(2026, 2, 25));
        let w2 = DateWindow::new(day(2026, 5, 1), day(2026, 6, 30));
        vec![
            Synergy::new("SNG-REF", "Refractory alumina", "m3", w1, day(2025, 11, 1))
                .with_state(SynergyState::Closed)
                .with_participant(participant("Yara Colombia", w1, Criticality::High))
                .with_participant(participant("Argos - Cementos", w1, Criticality::Low)),
            Synergy::new("SNG-CAT", "Catalyst FCC", "t", w2, day(2025, 11, 1))
                .with_state(SynergyState::InRfp)
                .with_participant(participant("Ecopetrol Refinería", w2, Criticality::Medium)),
        ]
    }

    #[test]
    fn test_empty_filter_matches_all() {
        let synergies = sample();
        let filter = SynergyFilter::new();
        assert!(!filter.is_active());
        assert_eq!(filter.apply(&synergies).len(), 2);
    }

    #[test]
    fn test_state_company_and_criticality() {
        let synergies = sample();
        let by_state = SynergyFilter::new().with_states([SynergyState::InRfp]);
        assert_eq!(by_state.apply(&synergies)[0].id, "SNG-CAT");

        let by_company = SynergyFilter::new().with_companies(["Argos - Cementos"]);
        assert_eq!(by_company.apply(&synergies)[0].id, "SNG-REF");

        let by_level = SynergyFilter::new().with_criticalities([Criticality::Medium]);
        assert_eq!(by_level.apply(&synergies).len(), 1);
    }

    #[test]
    fn test_date_range_intersects_window() {
        let synergies = sample();
        let spring =
            SynergyFilter::new().with_date_range(Some(day(2026, 3, 1)), Some(day(2026, 5, 15)));
        let ids: Vec<&str> = spring.apply(&synergies).iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["SNG-CAT"]);
    }

    #[test]
    fn test_query_searches_id_material_company() {
        let synergies = sample();
        assert_eq!(SynergyFilter::new().with_query("fcc").apply(&synergies).len(), 1);
        assert_eq!(SynergyFilter::new().with_query(" YARA ").apply(&synergies).len(), 1);
        assert_eq!(SynergyFilter::new().with_query("sng-").apply(&synergies).len(), 2);
        assert!(SynergyFilter::new().with_query("zinc").apply(&synergies).is_empty());
    }

    #[test]
    fn test_filter_graph_prunes_nodes_and_edges() {
        let synergies = sample();
        let graph = build_graph(&synergies);
        let pruned = SynergyFilter::new()
            .with_states([SynergyState::InRfp])
            .filter_graph(&graph, &synergies);

        assert_eq!(pruned.nodes.len(), 3);
        assert!(pruned.node("material-catalyst").is_some());
        assert!(pruned.node("company-yara-colombia").is_none());
        assert_eq!(pruned.edges.len(), 2);
    }

    #[test]
    fn test_is_date_in_range() {
        let at = day(2026, 2, 1);
        assert!(is_date_in_range(at, None, None));
        assert!(is_date_in_range(at, Some(at), Some(at)));
        assert!(!is_date_in_range(at, Some(day(2026, 2, 2)), None));
        assert!(!is_date_in_range(at, None, Some(day(2026, 1, 31))));
    }
}
