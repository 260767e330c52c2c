//! Load-time counters and the realized dataset schema.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};


/// The field superset actually observed in each source on the last load.
/// Recomputed every time; `LoadReport::schema_changed` tells a consumer
/// whether persisting it again is worthwhile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SchemaReport {
    pub primary_fields: BTreeSet<String>,
    pub secondary_fields: BTreeSet<String>,
    pub all_fields: BTreeSet<String>,
}

/// Ingestion degrades to counters instead of failing: a partially malformed
/// dataset still yields a usable, if smaller, index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct LoadReport {
    pub primary_rows: u64,
    pub secondary_rows: u64,
    /// Rows shorter than their header; missing cells became absent fields.
    pub short_rows: u64,
    /// Duplicate keys in the catalog dataset, resolved last-write-wins.
    pub merge_key_collisions: u64,
    /// Primary rows with no key or no catalog match; kept with their own fields.
    pub unmatched_primary: u64,
    pub record_count: u64,
    pub schema_changed: bool,
}
