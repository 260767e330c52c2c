//! Shared search query models and helpers.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};


/// The whole user-visible query state: free text, per-facet selections and
/// the sort key. An explicit owned value threaded through every call; there
/// is no ambient shared instance, so engines never cross-contaminate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SearchQuery {
    pub query_string: String,
    pub facet_filters: BTreeMap<String, FacetSelection>,
    pub sort_field: Option<String>,
}

/// A selection always carries its kind. A two-element range is `Range`,
/// never a term set that happens to hold two numbers, so nothing downstream
/// has to infer intent from the shape of a list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FacetSelection {
    Terms { values: BTreeSet<String> },
    Range { min: f64, max: f64 },
    Paths { values: BTreeSet<String> },
}

impl FacetSelection {
    /// An empty selection constrains nothing and is dropped from the filter
    /// map by the orchestrator.
    pub fn is_empty(&self) -> bool {
        match self {
            FacetSelection::Terms { values } | FacetSelection::Paths { values } => {
                values.is_empty()
            }
            FacetSelection::Range { .. } => false,
        }
    }
}
