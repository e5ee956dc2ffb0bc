//! Company / synergy / material network.
//!
//! Produces plain nodes and edges only. Positions are left to the renderer.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::model::{Criticality, Synergy, SynergyState};
use crate::timeline::company_color;

/// Base radius of a synergy node before adding per-company growth.
pub const SYNERGY_BASE_RADIUS: f64 = 40.0;
pub const SYNERGY_RADIUS_PER_COMPANY: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaterialCategory {
    Refractory,
    Catalyst,
    Tube,
    Platinum,
    Brick,
    Other,
}

impl MaterialCategory {
    /// Classify a free-text material name by keyword (English or Spanish).
    pub fn classify(material: &str) -> Self {
        let lower = material.to_lowercase();
        let has = |keys: &[&str]| keys.iter().any(|k| lower.contains(k));

        if has(&["refractory", "refractario"]) {
            Self::Refractory
        } else if has(&["catalyst", "catalizador"]) {
            Self::Catalyst
        } else if has(&["tube", "tubo"]) {
            Self::Tube
        } else if has(&["platinum", "platino", "pt-rh"]) {
            Self::Platinum
        } else if has(&["brick", "ladrillo"]) {
            Self::Brick
        } else {
            Self::Other
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Refractory => "refractory",
            Self::Catalyst => "catalyst",
            Self::Tube => "tube",
            Self::Platinum => "platinum",
            Self::Brick => "brick",
            Self::Other => "other",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            Self::Refractory => "#dc2626",
            Self::Catalyst => "#16a34a",
            Self::Tube => "#0891b2",
            Self::Platinum => "#a1a1aa",
            Self::Brick => "#ea580c",
            Self::Other => "#6b7280",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GraphNode {
    Company {
        id: String,
        name: String,
        synergy_count: usize,
        /// Sum of this company's even-split savings shares.
        total_savings: f64,
        total_volume: f64,
        color: String,
    },
    Synergy {
        id: String,
        material: String,
        state: SynergyState,
        company_count: usize,
        radius: f64,
    },
    Material {
        id: String,
        category: MaterialCategory,
        color: String,
    },
}

impl GraphNode {
    pub fn id(&self) -> &str {
        match self {
            Self::Company { id, .. } | Self::Synergy { id, .. } | Self::Material { id, .. } => id,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    CompanySynergy,
    SynergyMaterial,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    pub kind: EdgeKind,
    /// Quantity for company edges, 1 for material edges.
    pub value: f64,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub criticality: Option<Criticality>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphData {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

impl GraphData {
    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.id() == id)
    }
}

/// Node id for a company: `company-` plus an ASCII slug of its name.
pub fn company_node_id(company: &str) -> String {
    format!("company-{}", slugify(company))
}

pub fn material_node_id(category: MaterialCategory) -> String {
    format!("material-{}", category.as_str())
}

/// Synergy nodes first, then companies, then materials.
pub fn build_graph(synergies: &[Synergy]) -> GraphData {
    struct CompanyTotals {
        name: String,
        synergy_count: usize,
        total_savings: f64,
        total_volume: f64,
    }

    let mut nodes = Vec::new();
    let mut edges = Vec::new();
    let mut companies: IndexMap<String, CompanyTotals> = IndexMap::new();
    let mut materials: IndexMap<String, MaterialCategory> = IndexMap::new();

    for synergy in synergies {
        nodes.push(GraphNode::Synergy {
            id: synergy.id.clone(),
            material: synergy.material.clone(),
            state: synergy.state,
            company_count: synergy.company_count(),
            radius: SYNERGY_BASE_RADIUS
                + SYNERGY_RADIUS_PER_COMPANY * synergy.company_count() as f64,
        });

        let category = MaterialCategory::classify(&synergy.material);
        let material_id = material_node_id(category);
        materials.entry(material_id.clone()).or_insert(category);
        edges.push(GraphEdge {
            id: format!("{}-{material_id}", synergy.id),
            source: synergy.id.clone(),
            target: material_id,
            kind: EdgeKind::SynergyMaterial,
            value: 1.0,
            label: None,
            criticality: None,
        });

        let share = synergy.savings_share().unwrap_or(0.0);
        for participant in &synergy.participants {
            let company_id = company_node_id(&participant.company);
            let totals = companies
                .entry(company_id.clone())
                .or_insert_with(|| CompanyTotals {
                    name: participant.company.clone(),
                    synergy_count: 0,
                    total_savings: 0.0,
                    total_volume: 0.0,
                });
            totals.synergy_count += 1;
            totals.total_savings += share;
            totals.total_volume += participant.quantity;

            edges.push(GraphEdge {
                id: format!("{company_id}-{}", synergy.id),
                source: company_id,
                target: synergy.id.clone(),
                kind: EdgeKind::CompanySynergy,
                value: participant.quantity,
                label: Some(format!("{} {}", participant.quantity, synergy.unit_of_measure)),
                criticality: Some(participant.criticality),
            });
        }
    }

    nodes.extend(companies.into_iter().map(|(id, t)| GraphNode::Company {
        id,
        color: company_color(&t.name).to_string(),
        name: t.name,
        synergy_count: t.synergy_count,
        total_savings: t.total_savings,
        total_volume: t.total_volume,
    }));
    nodes.extend(materials.into_iter().map(|(id, category)| GraphNode::Material {
        id,
        category,
        color: category.color().to_string(),
    }));

    tracing::debug!(nodes = nodes.len(), edges = edges.len(), "graph built");
    GraphData { nodes, edges }
}

/// Lowercase ASCII slug; accented Latin letters fold to their base letter.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;

    for c in text.chars().flat_map(char::to_lowercase) {
        let c = match c {
            'á' | 'à' | 'ä' | 'â' | 'ã' => 'a',
            'é' | 'è' | 'ë' | 'ê' => 'e',
            'í' | 'ì' | 'ï' | 'î' => 'i',
            'ó' | 'ò' | 'ö' | 'ô' | 'õ' => 'o',
            'ú' | 'ù' | 'ü' | 'û' => 'u',
            'ñ' => 'n',
            'ç' => 'c',
            other => other,
        };
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c);
        } else {
            pending_dash = true;
        }
    }
    slug
}
