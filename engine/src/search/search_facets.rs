//! Per-facet aggregation buckets over the filtered record set.

use std::collections::{BTreeMap, BTreeSet};

use common::catalog_config::{FacetConfig, FacetKind};
use common::record::{Record, Scalar};
use common::search_result::FacetBucket;

/// One bucket per distinct value of the facet field. A multivalue field
/// contributes each distinct element once per record, so counts stay
/// distinct-record counts. Discrete and taxonomy buckets come back ordered
/// by count descending then key; numeric range buckets stay in value order
/// so the present bounds read off the ends.
pub fn collect_facet_buckets(records: &[&Record], field: &str, facet: &FacetConfig) -> Vec<FacetBucket> {
    let mut counts: BTreeMap<Scalar, u64> = BTreeMap::new();
    for record in records {
        let mut seen: BTreeSet<&Scalar> = BTreeSet::new();
        for value in record.values(field) {
            if seen.insert(value) {
                *counts.entry(value.clone()).or_insert(0) += 1;
            }
        }
    }

    let mut buckets: Vec<FacetBucket> = counts
        .into_iter()
        .map(|(value, doc_count)| FacetBucket { key: value.render_key(), doc_count })
        .collect();
    match facet.kind {
        FacetKind::Range => {}
        FacetKind::Discrete | FacetKind::Taxonomy => {
            buckets.sort_by_key(|bucket| (u64::MAX - bucket.doc_count, bucket.key.clone()));
        }
    }
    buckets
}


#[cfg(test)]
mod test {
    use super::*;
    use common::record::FieldValue;

    fn record_with(field: &str, value: FieldValue) -> Record {
        let mut r = Record::new();
        r.set(field, value);
        r
    }

    #[test]
    fn discrete_buckets_order_by_count_then_key() {
        let records = vec![
            record_with("Categoria", FieldValue::Single(Scalar::Text("dipinto".into()))),
            record_with("Categoria", FieldValue::Single(Scalar::Text("dipinto".into()))),
            record_with("Categoria", FieldValue::Single(Scalar::Text("affresco".into()))),
            record_with("Categoria", FieldValue::Single(Scalar::Text("scultura".into()))),
        ];
        let refs: Vec<&Record> = records.iter().collect();
        let buckets = collect_facet_buckets(&refs, "Categoria", &FacetConfig::default());
        assert_eq!(
            buckets,
            vec![
                FacetBucket { key: "dipinto".into(), doc_count: 2 },
                FacetBucket { key: "affresco".into(), doc_count: 1 },
                FacetBucket { key: "scultura".into(), doc_count: 1 },
            ]
        );
    }

    #[test]
    fn repeated_multivalue_elements_count_once_per_record() {
        let records = vec![record_with(
            "Categoria",
            FieldValue::Many(vec![
                Scalar::Text("dipinto".into()),
                Scalar::Text("dipinto".into()),
                Scalar::Text("affresco".into()),
            ]),
        )];
        let refs: Vec<&Record> = records.iter().collect();
        let buckets = collect_facet_buckets(&refs, "Categoria", &FacetConfig::default());
        assert!(buckets.iter().all(|b| b.doc_count == 1));
    }

    #[test]
    fn range_buckets_stay_in_numeric_order() {
        let records = vec![
            record_with("Anno", FieldValue::Single(Scalar::Number(1950.0))),
            record_with("Anno", FieldValue::Single(Scalar::Number(1900.0))),
            record_with("Anno", FieldValue::Single(Scalar::Number(1920.0))),
            record_with("Anno", FieldValue::Single(Scalar::Number(1900.0))),
        ];
        let refs: Vec<&Record> = records.iter().collect();
        let facet = FacetConfig { kind: FacetKind::Range, ..FacetConfig::default() };
        let buckets = collect_facet_buckets(&refs, "Anno", &facet);
        let keys: Vec<&str> = buckets.iter().map(|b| b.key.as_str()).collect();
        assert_eq!(keys, vec!["1900", "1920", "1950"]);
        assert_eq!(buckets[0].doc_count, 2);
    }

    #[test]
    fn records_without_the_field_produce_no_bucket() {
        let records = vec![record_with("Titolo", FieldValue::Single(Scalar::Text("x".into())))];
        let refs: Vec<&Record> = records.iter().collect();
        let buckets = collect_facet_buckets(&refs, "Categoria", &FacetConfig::default());
        assert!(buckets.is_empty());
    }
}
