use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{record::Record, search_query::SearchQuery};


/// One search pass: the echoed query, the matching records in their final
/// order, and the aggregation buckets for every configured facet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResults {
    pub query: SearchQuery,
    pub results: Vec<SearchResultRecordItem>,
    pub aggregations: BTreeMap<String, Vec<FacetBucket>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResultRecordItem {
    pub title: String,
    pub title_spans: Vec<HighlightTextSpan>,
    pub record: Record,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacetBucket {
    pub key: String,
    pub doc_count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighlightTextSpan {
    pub text: String,
    pub is_highlighted: bool,
    pub index: u64,
}
