//! Owns the engine state and exposes the public query surface.

use std::collections::BTreeSet;

use anyhow::{Context, bail};
use common::catalog_config::{CatalogConfig, FacetKind};
use common::load_report::{LoadReport, SchemaReport};
use common::record::Record;
use common::search_query::{FacetSelection, SearchQuery};
use common::search_result::{FacetBucket, SearchResults};
use tracing::{debug, info};

use crate::ingest::ingest_sources;
use crate::search::{
    SelectionChange, TaxonomyTree, clamp_to_step, present_bounds, search_for_results,
};
use crate::source_fetch::{SourceUrls, fetch_sources};

/// One engine instance: the configuration, the current record generation
/// and the current query state, all explicit and owned. Everything here is
/// synchronous except `load`; each setter is one atomic state transition,
/// and a failed call leaves both query and records exactly as they were.
pub struct SearchOrchestrator {
    config: CatalogConfig,
    records: Vec<Record>,
    query: SearchQuery,
    schema: Option<SchemaReport>,
}

impl SearchOrchestrator {
    pub fn new(config: CatalogConfig) -> Self {
        Self { config, records: Vec::new(), query: SearchQuery::default(), schema: None }
    }

    /// The one asynchronous boundary: a one-shot awaited fetch of the two
    /// datasets and the facet configuration, with no built-in retry.
    pub async fn load(&mut self, urls: &SourceUrls) -> anyhow::Result<LoadReport> {
        let sources = fetch_sources(urls).await?;
        let config: CatalogConfig = serde_json::from_str(&sources.config_json)
            .context("facet configuration is not valid JSON")?;
        self.config = config;
        self.load_from_text(&sources.locations_tsv, &sources.catalog_tsv)
    }

    /// Synchronous ingest core behind `load`. The record set is swapped in
    /// one assignment, so a consumer never observes a half-applied
    /// generation; the realized schema is recomputed every time and flagged
    /// when it differs from the previous load.
    pub fn load_from_text(
        &mut self,
        locations_tsv: &str,
        catalog_tsv: &str,
    ) -> anyhow::Result<LoadReport> {
        let outcome = ingest_sources(locations_tsv, catalog_tsv, &self.config);
        let schema_changed = self.schema.as_ref() != Some(&outcome.schema);
        self.schema = Some(outcome.schema);
        self.records = outcome.records;
        let mut report = outcome.report;
        report.schema_changed = schema_changed;
        info!(
            records = report.record_count,
            collisions = report.merge_key_collisions,
            short_rows = report.short_rows,
            "dataset loaded"
        );
        Ok(report)
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    pub fn query(&self) -> &SearchQuery {
        &self.query
    }

    pub fn schema(&self) -> Option<&SchemaReport> {
        self.schema.as_ref()
    }

    pub fn set_query(&mut self, text: &str) {
        self.query.query_string = text.to_string();
    }

    pub fn set_sort(&mut self, field: Option<String>) {
        self.query.sort_field = field;
    }

    /// Toggle one facet value. Discrete facets insert or remove the key and
    /// drop the entry once empty; taxonomy facets cascade through the
    /// branch and report every path that changed. Range facets go through
    /// `set_range`.
    pub fn set_facet_value(
        &mut self,
        facet_id: &str,
        key: &str,
        selected: bool,
    ) -> anyhow::Result<Vec<SelectionChange>> {
        let Some(facet) = self.config.facet(facet_id) else {
            bail!("unknown facet: {facet_id}");
        };
        match facet.kind {
            FacetKind::Discrete => {
                let entry = self
                    .query
                    .facet_filters
                    .entry(facet_id.to_string())
                    .or_insert_with(|| FacetSelection::Terms { values: BTreeSet::new() });
                let FacetSelection::Terms { values } = &mut *entry else {
                    bail!("existing filter on {facet_id} is not a term selection");
                };
                let changed = if selected {
                    values.insert(key.to_string())
                } else {
                    values.remove(key)
                };
                let now_empty = values.is_empty();
                if now_empty {
                    self.query.facet_filters.remove(facet_id);
                }
                Ok(if changed {
                    vec![SelectionChange { path: key.to_string(), selected }]
                } else {
                    vec![]
                })
            }
            FacetKind::Taxonomy => {
                let tree = self.taxonomy(facet_id)?;
                let mut values = match self.query.facet_filters.get(facet_id) {
                    Some(FacetSelection::Paths { values }) => values.clone(),
                    Some(_) => bail!("existing filter on {facet_id} is not a path selection"),
                    None => BTreeSet::new(),
                };
                let changes = tree.cascade_select(key, selected, &mut values);
                if values.is_empty() {
                    self.query.facet_filters.remove(facet_id);
                } else {
                    self.query
                        .facet_filters
                        .insert(facet_id.to_string(), FacetSelection::Paths { values });
                }
                Ok(changes)
            }
            FacetKind::Range => bail!("facet {facet_id} takes a range, use set_range"),
        }
    }

    /// Clamp and snap a requested range against the bounds present under
    /// the current filters, then write both ends in one update. Returns the
    /// range actually applied.
    pub fn set_range(&mut self, facet_id: &str, requested: (f64, f64)) -> anyhow::Result<(f64, f64)> {
        let Some(facet) = self.config.facet(facet_id) else {
            bail!("unknown facet: {facet_id}");
        };
        if facet.kind != FacetKind::Range {
            bail!("facet {facet_id} is not a range facet");
        }
        let step = facet.step;
        let buckets = self.facet_buckets(facet_id)?;
        let Some(bounds) = present_bounds(&buckets) else {
            bail!("facet {facet_id} has no numeric values under the current filters");
        };
        let (min, max) = clamp_to_step(requested, bounds, step)?;
        self.query
            .facet_filters
            .insert(facet_id.to_string(), FacetSelection::Range { min, max });
        debug!(facet = facet_id, min, max, "range filter applied");
        Ok((min, max))
    }

    /// Results for the current query state.
    pub fn results(&self) -> anyhow::Result<SearchResults> {
        search_for_results(&self.records, &self.config, &self.query)
    }

    /// The facet's tree rebuilt from its current post-filter buckets, with
    /// rollup counts consistent with every active filter.
    pub fn taxonomy(&self, facet_id: &str) -> anyhow::Result<TaxonomyTree> {
        let Some(facet) = self.config.facet(facet_id) else {
            bail!("unknown facet: {facet_id}");
        };
        if facet.kind != FacetKind::Taxonomy {
            bail!("facet {facet_id} is not a taxonomy facet");
        }
        let separator = facet.separator.clone();
        let buckets = self.facet_buckets(facet_id)?;
        Ok(TaxonomyTree::build(&buckets, &separator))
    }

    fn facet_buckets(&self, facet_id: &str) -> anyhow::Result<Vec<FacetBucket>> {
        let mut results = self.results()?;
        Ok(results.aggregations.remove(facet_id).unwrap_or_default())
    }
}
