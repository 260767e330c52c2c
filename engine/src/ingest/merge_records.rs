//! Key-indexed merge of the two dataset halves.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use common::load_report::SchemaReport;
use common::record::{FieldValue, Record, Scalar};
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MergeStats {
    pub merge_key_collisions: u64,
    pub unmatched_primary: u64,
}

/// Merge catalog detail into each location record sharing its key. Secondary
/// fields apply first, so a name collision resolves to the primary value. A
/// duplicate key in the secondary set is last-write-wins, surfaced as a
/// counter. Output keeps primary ingestion order.
pub fn merge_by_key(
    primary: Vec<Record>,
    secondary: Vec<Record>,
    key_field: &str,
) -> (Vec<Record>, MergeStats) {
    let mut stats = MergeStats::default();

    let mut by_key: HashMap<String, Record> = HashMap::with_capacity(secondary.len());
    for record in secondary {
        let Some(key) = record.key_string(key_field) else {
            continue;
        };
        if by_key.insert(key.clone(), record).is_some() {
            stats.merge_key_collisions += 1;
            warn!(key = %key, "duplicate merge key in catalog dataset, keeping the last row");
        }
    }

    let merged = primary
        .into_iter()
        .map(|record| {
            let Some(key) = record.key_string(key_field) else {
                stats.unmatched_primary += 1;
                return record;
            };
            match by_key.get(&key) {
                Some(extra) => {
                    let mut out = extra.clone();
                    for (field, value) in record.fields {
                        out.fields.insert(field, value);
                    }
                    out
                }
                None => {
                    stats.unmatched_primary += 1;
                    record
                }
            }
        })
        .collect();
    (merged, stats)
}

/// Split configured multivalue fields on their separator, each piece
/// trimmed. Only single text values are split; sequences and absent fields
/// stay untouched.
pub fn split_multivalue(records: &mut [Record], rules: &BTreeMap<String, String>) {
    for record in records.iter_mut() {
        for (field, separator) in rules {
            let text = match record.get(field) {
                Some(FieldValue::Single(Scalar::Text(text))) => text.clone(),
                _ => continue,
            };
            let parts: Vec<Scalar> = text
                .split(separator.as_str())
                .map(|piece| Scalar::Text(piece.trim().to_string()))
                .collect();
            record.set(field.clone(), FieldValue::Many(parts));
        }
    }
}

/// The field superset actually observed in each source's records.
pub fn realized_schema(primary: &[Record], secondary: &[Record]) -> SchemaReport {
    fn collect(records: &[Record]) -> BTreeSet<String> {
        records
            .iter()
            .flat_map(|record| record.fields.keys().cloned())
            .collect()
    }
    let primary_fields = collect(primary);
    let secondary_fields = collect(secondary);
    let all_fields = primary_fields.union(&secondary_fields).cloned().collect();
    SchemaReport { primary_fields, secondary_fields, all_fields }
}


#[cfg(test)]
mod test {
    use super::*;

    fn record(pairs: &[(&str, Scalar)]) -> Record {
        let mut r = Record::new();
        for (field, value) in pairs {
            r.set(*field, FieldValue::Single(value.clone()));
        }
        r
    }

    #[test]
    fn primary_fields_override_secondary_on_collision() {
        let primary = vec![record(&[
            ("ID", Scalar::Text("1".into())),
            ("Titolo", Scalar::Text("dal rilievo".into())),
        ])];
        let secondary = vec![record(&[
            ("ID", Scalar::Text("1".into())),
            ("Titolo", Scalar::Text("dal catalogo".into())),
            ("Categoria", Scalar::Text("dipinto".into())),
        ])];
        let (merged, stats) = merge_by_key(primary, secondary, "ID");
        assert_eq!(merged[0].first("Titolo"), Some(&Scalar::Text("dal rilievo".into())));
        assert_eq!(merged[0].first("Categoria"), Some(&Scalar::Text("dipinto".into())));
        assert_eq!(stats.unmatched_primary, 0);
    }

    #[test]
    fn duplicate_secondary_key_is_last_write_wins() {
        let primary = vec![record(&[("ID", Scalar::Text("1".into()))])];
        let secondary = vec![
            record(&[("ID", Scalar::Text("1".into())), ("Categoria", Scalar::Text("prima".into()))]),
            record(&[("ID", Scalar::Text("1".into())), ("Categoria", Scalar::Text("seconda".into()))]),
        ];
        let (merged, stats) = merge_by_key(primary, secondary, "ID");
        assert_eq!(stats.merge_key_collisions, 1);
        assert_eq!(merged[0].first("Categoria"), Some(&Scalar::Text("seconda".into())));
    }

    #[test]
    fn unmatched_primary_keeps_its_own_fields() {
        let primary = vec![record(&[("ID", Scalar::Text("9".into())), ("Titolo", Scalar::Text("solo".into()))])];
        let (merged, stats) = merge_by_key(primary, vec![], "ID");
        assert_eq!(stats.unmatched_primary, 1);
        assert_eq!(merged[0].first("Titolo"), Some(&Scalar::Text("solo".into())));
    }

    #[test]
    fn multivalue_split_trims_and_keeps_order() {
        let mut records = vec![record(&[("Categoria", Scalar::Text("dipinto; affresco ;scultura".into()))])];
        let rules = [("Categoria".to_string(), ";".to_string())].into();
        split_multivalue(&mut records, &rules);
        assert_eq!(
            records[0].get("Categoria"),
            Some(&FieldValue::Many(vec![
                Scalar::Text("dipinto".into()),
                Scalar::Text("affresco".into()),
                Scalar::Text("scultura".into()),
            ]))
        );
    }

    #[test]
    fn multivalue_split_skips_sequences_and_absent_fields() {
        let mut records = vec![record(&[("Titolo", Scalar::Text("x".into()))])];
        let rules = [("Categoria".to_string(), ";".to_string())].into();
        split_multivalue(&mut records, &rules);
        assert_eq!(records[0].get("Categoria"), None);

        let already = FieldValue::Many(vec![Scalar::Text("a".into())]);
        records[0].set("Categoria", already.clone());
        split_multivalue(&mut records, &rules);
        assert_eq!(records[0].get("Categoria"), Some(&already));
    }
}
