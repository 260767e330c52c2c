//! Runs one search pass: filter, sort, shape results and aggregations.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use common::catalog_config::CatalogConfig;
use common::record::Record;
use common::search_query::SearchQuery;
use common::search_result::{SearchResultRecordItem, SearchResults};

use crate::search::highlight::highlight_matches;
use crate::search::search_facets::collect_facet_buckets;
use crate::search::search_filters::compile_filters;

/// Filter, sort and aggregate in one synchronous pass over the record set.
/// O(records x active filters); safe to call on every debounced event.
pub fn search_for_results(
    records: &[Record],
    config: &CatalogConfig,
    query: &SearchQuery,
) -> anyhow::Result<SearchResults> {
    let filters = compile_filters(config, query)?;
    let mut kept: Vec<&Record> = records.iter().filter(|record| filters.matches(record)).collect();

    if let Some(sort_field) = query.sort_field.as_deref().or(config.sort_field.as_deref()) {
        // stable sort keeps ingestion order between equal keys, so the same
        // query always comes back in the same order
        kept.sort_by(|a, b| compare_on(a, b, sort_field));
    }

    let mut aggregations = BTreeMap::new();
    for (facet_id, facet) in config.facets.iter() {
        // buckets are computed over the already filtered set, with this
        // facet's own selection still applied
        aggregations.insert(facet_id.clone(), collect_facet_buckets(&kept, facet_id, facet));
    }

    let results = kept
        .into_iter()
        .map(|record| shape_item(record, config, query))
        .collect();
    Ok(SearchResults { query: query.clone(), results, aggregations })
}

fn compare_on(a: &Record, b: &Record, field: &str) -> Ordering {
    match (a.first(field), b.first(field)) {
        (Some(x), Some(y)) => x.cmp(y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn shape_item(record: &Record, config: &CatalogConfig, query: &SearchQuery) -> SearchResultRecordItem {
    let title = config
        .search_fields
        .first()
        .and_then(|field| record.first(field))
        .map(|scalar| scalar.render_key())
        .unwrap_or_default();
    let title_spans = highlight_matches(&title, query.query_string.trim());
    SearchResultRecordItem { title, title_spans, record: record.clone() }
}
