//! Consumed facet and dataset configuration.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};


#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FacetKind {
    #[default]
    Discrete,
    Range,
    Taxonomy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FacetConfig {
    pub title: String,
    #[serde(rename = "type")]
    pub kind: FacetKind,
    pub category: Option<String>,
    /// Segment separator for taxonomy paths.
    pub separator: String,
    /// Snap granularity for range selections.
    pub step: f64,
}

impl Default for FacetConfig {
    fn default() -> Self {
        Self {
            title: String::new(),
            kind: FacetKind::Discrete,
            category: None,
            separator: " > ".to_string(),
            step: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub facets: BTreeMap<String, FacetConfig>,
    /// field -> separator, consumed by the ingestor's multivalue split.
    pub multivalue_rows: BTreeMap<String, String>,
    /// Fields probed by the free-text query; empty means every field.
    pub search_fields: Vec<String>,
    /// The field joining the two datasets. Always kept as text.
    pub key_field: String,
    pub sort_field: Option<String>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            facets: BTreeMap::new(),
            multivalue_rows: BTreeMap::new(),
            search_fields: Vec::new(),
            key_field: "ID".to_string(),
            sort_field: None,
        }
    }
}

impl CatalogConfig {
    pub fn facet(&self, facet_id: &str) -> Option<&FacetConfig> {
        self.facets.get(facet_id)
    }
}
