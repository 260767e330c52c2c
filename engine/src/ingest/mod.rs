//! Dataset ingestion: parsing, merging and multivalue splitting.

mod parse_table;
pub use parse_table::{ParsedTable, coerce_cell, parse_table};

mod merge_records;
pub use merge_records::{MergeStats, merge_by_key, realized_schema, split_multivalue};

use common::catalog_config::CatalogConfig;
use common::load_report::{LoadReport, SchemaReport};
use common::record::Record;

#[derive(Debug, Clone)]
pub struct IngestOutcome {
    pub records: Vec<Record>,
    pub schema: SchemaReport,
    pub report: LoadReport,
}

/// Pure, synchronous ingest of one dataset generation: parse both tables,
/// merge catalog detail into the location rows, split configured multivalue
/// fields. `schema_changed` is left for the orchestrator, which knows the
/// previous generation.
pub fn ingest_sources(
    locations_tsv: &str,
    catalog_tsv: &str,
    config: &CatalogConfig,
) -> IngestOutcome {
    let primary = parse_table(locations_tsv, &config.key_field);
    let secondary = parse_table(catalog_tsv, &config.key_field);
    let schema = realized_schema(&primary.records, &secondary.records);

    let primary_rows = primary.records.len() as u64;
    let secondary_rows = secondary.records.len() as u64;
    let short_rows = primary.short_rows + secondary.short_rows;

    let (mut records, stats) = merge_by_key(primary.records, secondary.records, &config.key_field);
    split_multivalue(&mut records, &config.multivalue_rows);

    let report = LoadReport {
        primary_rows,
        secondary_rows,
        short_rows,
        merge_key_collisions: stats.merge_key_collisions,
        unmatched_primary: stats.unmatched_primary,
        record_count: records.len() as u64,
        schema_changed: false,
    };
    IngestOutcome { records, schema, report }
}


#[cfg(test)]
mod test {
    use super::*;
    use common::record::{FieldValue, Scalar};

    fn config() -> CatalogConfig {
        CatalogConfig {
            multivalue_rows: [("Categoria".to_string(), ";".to_string())].into(),
            ..CatalogConfig::default()
        }
    }

    #[test]
    fn ingest_merges_and_splits_in_one_pass() {
        let locations = "ID\tTitolo\tAnno\n1\tOpera A\t1920\n2\tOpera B\t1950\n";
        let catalog = "ID\tCategoria\n1\tdipinto; affresco\n2\tscultura\n";
        let outcome = ingest_sources(locations, catalog, &config());

        assert_eq!(outcome.report.primary_rows, 2);
        assert_eq!(outcome.report.secondary_rows, 2);
        assert_eq!(outcome.report.record_count, 2);
        assert_eq!(outcome.report.unmatched_primary, 0);

        let first = &outcome.records[0];
        assert_eq!(first.first("Anno"), Some(&Scalar::Number(1920.0)));
        assert_eq!(
            first.get("Categoria"),
            Some(&FieldValue::Many(vec![
                Scalar::Text("dipinto".into()),
                Scalar::Text("affresco".into()),
            ]))
        );
        assert!(outcome.schema.primary_fields.contains("Titolo"));
        assert!(outcome.schema.secondary_fields.contains("Categoria"));
        assert!(outcome.schema.all_fields.contains("Anno"));
    }
}
