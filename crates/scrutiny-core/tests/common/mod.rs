use scrutiny_core::comparators::SectionMetadata;
use scrutiny_core::config::{ComponentSettings, SchemaConfig, SectionConfig};
use scrutiny_core::{CompareContext, CompareResult, ComparatorRegistry, Record, Value};

/// Build a record from a JSON object literal
#[allow(dead_code)]
pub fn rec(json: serde_json::Value) -> Record {
    Record::from_json(json).unwrap()
}

/// Build a list of records from a JSON array literal
#[allow(dead_code)]
pub fn recs(json: serde_json::Value) -> Vec<Record> {
    match json {
        serde_json::Value::Array(items) => items.into_iter().map(rec).collect(),
        other => panic!("expected array, got {other}"),
    }
}

/// A schema section keyed by `name` using the given comparator
#[allow(dead_code)]
pub fn section(name: &str, comparator: &str) -> SectionConfig {
    SectionConfig {
        name: name.to_string(),
        component: ComponentSettings {
            comparator: comparator.to_string(),
            match_key: "name".to_string(),
            ..ComponentSettings::default()
        },
        ..SectionConfig::default()
    }
}

#[allow(dead_code)]
pub fn schema(sections: Vec<SectionConfig>) -> SchemaConfig {
    SchemaConfig {
        version: "0.12".to_string(),
        title: Some("test schema".to_string()),
        sections,
        ..SchemaConfig::default()
    }
}

/// Run the section's comparator through a fresh built-in registry
#[allow(dead_code)]
pub fn compare_section(
    section: &SectionConfig,
    reference: &[Record],
    tested: &[Record],
) -> CompareResult {
    let registry = ComparatorRegistry::with_builtins();
    let resolved = registry
        .resolve(&section.name, &section.component.comparator)
        .unwrap();
    let metadata: SectionMetadata = section.metadata(false);
    resolved.comparator.compare(&CompareContext {
        section: &section.name,
        key_field: &section.component.match_key,
        show_field: section.component.show_key.as_deref(),
        metadata: &metadata,
        reference,
        tested,
    })
}

#[allow(dead_code)]
pub fn threshold_ratio(section: &mut SectionConfig, ratio: f64) {
    section.component.threshold_ratio = Some(Value::float(ratio));
}
