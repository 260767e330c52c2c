//! Builds the conjunctive filter predicate for one search pass.

use std::collections::BTreeSet;

use anyhow::bail;
use common::catalog_config::{CatalogConfig, FacetKind};
use common::record::Record;
use common::search_query::{FacetSelection, SearchQuery};

use crate::search::taxonomy_tree::selection_matches;

enum Clause<'a> {
    Terms { field: &'a str, values: &'a BTreeSet<String> },
    Range { field: &'a str, min: f64, max: f64 },
    Paths { field: &'a str, separator: &'a str, values: &'a BTreeSet<String> },
}

pub struct CompiledFilters<'a> {
    needle: Option<String>,
    search_fields: &'a [String],
    clauses: Vec<Clause<'a>>,
}

/// Validate the query against the facet schema and compile it into a
/// predicate. Naming an unknown facet, or pairing a selection with the
/// wrong facet kind, is an explicit error rather than an empty result.
pub fn compile_filters<'a>(
    config: &'a CatalogConfig,
    query: &'a SearchQuery,
) -> anyhow::Result<CompiledFilters<'a>> {
    let trimmed = query.query_string.trim();
    let needle = if trimmed.is_empty() { None } else { Some(trimmed.to_lowercase()) };

    let mut clauses = Vec::new();
    for (facet_id, selection) in query.facet_filters.iter() {
        let Some(facet) = config.facet(facet_id) else {
            bail!("unknown facet in filter: {facet_id}");
        };
        if selection.is_empty() {
            continue;
        }
        match (facet.kind, selection) {
            (FacetKind::Discrete, FacetSelection::Terms { values }) => {
                clauses.push(Clause::Terms { field: facet_id, values });
            }
            (FacetKind::Range, FacetSelection::Range { min, max }) => {
                if !min.is_finite() || !max.is_finite() {
                    bail!("range filter on {facet_id} has non-numeric bounds");
                }
                if min > max {
                    bail!("range filter on {facet_id} has inverted bounds: [{min}, {max}]");
                }
                clauses.push(Clause::Range { field: facet_id, min: *min, max: *max });
            }
            (FacetKind::Taxonomy, FacetSelection::Paths { values }) => {
                clauses.push(Clause::Paths { field: facet_id, separator: &facet.separator, values });
            }
            (kind, _) => bail!("selection kind does not match the {kind:?} facet {facet_id}"),
        }
    }

    Ok(CompiledFilters { needle, search_fields: &config.search_fields, clauses })
}

impl CompiledFilters<'_> {
    /// One record against every filter kind: free text, then the per-facet
    /// clauses. All conjunctive, so adding a constraint can only shrink the
    /// result set.
    pub fn matches(&self, record: &Record) -> bool {
        if let Some(needle) = &self.needle {
            if !self.matches_text(record, needle) {
                return false;
            }
        }
        self.clauses.iter().all(|clause| clause_matches(clause, record))
    }

    fn matches_text(&self, record: &Record, needle: &str) -> bool {
        if self.search_fields.is_empty() {
            record
                .fields
                .values()
                .flat_map(|value| value.scalars().iter())
                .any(|scalar| scalar.render_key().to_lowercase().contains(needle))
        } else {
            self.search_fields
                .iter()
                .flat_map(|field| record.values(field).iter())
                .any(|scalar| scalar.render_key().to_lowercase().contains(needle))
        }
    }
}

fn clause_matches(clause: &Clause<'_>, record: &Record) -> bool {
    match clause {
        Clause::Terms { field, values } => record
            .values(field)
            .iter()
            .any(|scalar| values.contains(scalar.render_key().as_str())),
        Clause::Range { field, min, max } => record
            .values(field)
            .iter()
            .filter_map(|scalar| scalar.as_f64())
            .any(|n| *min <= n && n <= *max),
        Clause::Paths { field, separator, values } => record
            .values(field)
            .iter()
            .any(|scalar| selection_matches(&scalar.render_key(), values, separator)),
    }
}
