//! Schema loader with validation
//!
//! Parses a YAML schema, merges each section over `defaults` and validates
//! data, report and component settings into a `SchemaConfig`.

use serde_yaml::Value as Yaml;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use scrutiny_core::config::{
    ComponentSettings, DataSettings, FieldDef, ReportSettings, ReportType, SectionConfig,
};
use scrutiny_core::errors::{ExError, ScrutinyError};
use scrutiny_core::{SchemaConfig, SeverityThresholds, Theme};

use crate::errors::{io_error, parse_error, schema_invalid, section_invalid, Result};
use crate::schema::doc::read_doc;
use crate::schema::yaml::{deep_merge, get, get_present, scalar_text, to_map, to_value, truthy};

pub const SUPPORTED_SCHEMA_VERSIONS: [&str; 2] = ["0.11", "0.12"];

const ALLOWED_CATEGORIES: [&str; 5] = ["binary", "continuous", "nominal", "ordinal", "set"];
const BUCKETS: [&str; 4] = ["data", "report", "component", "target"];
const DEFAULTS: &str = "defaults";

/// Loader behaviour switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadOptions {
    /// Escalate recoverable problems (unknown field category, `show_key`
    /// outside the record schema) from warnings to errors.
    pub strict: bool,
}

/// Load a schema file with default options
///
/// # Errors
///
/// See [`load_schema_file_with`].
pub fn load_schema_file(path: &Path) -> Result<SchemaConfig> {
    load_schema_file_with(path, &LoadOptions::default())
}

/// Load a schema file; `report.doc` paths resolve against its directory
///
/// # Errors
///
/// `ERR_IO` when the file cannot be read, otherwise as [`load_schema_str`].
pub fn load_schema_file_with(path: &Path, options: &LoadOptions) -> Result<SchemaConfig> {
    let content = fs::read_to_string(path).map_err(|e| io_error("load_schema", path, e))?;

    let abs_path = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map_err(|e| io_error("load_schema", path, e))?
            .join(path)
    };
    let base_dir = abs_path.parent().map(Path::to_path_buf).unwrap_or_default();

    load_schema_str(&content, &base_dir, options)
}

/// Load a schema from YAML text
///
/// # Errors
///
/// `ERR_SERIALIZATION` for malformed YAML, `ERR_UNSUPPORTED_SCHEMA_VERSION`,
/// `ERR_SCHEMA_INVALID` for structural problems and `ERR_DOC_REJECTED` for
/// unusable `report.doc` references.
pub fn load_schema_str(content: &str, base_dir: &Path, options: &LoadOptions) -> Result<SchemaConfig> {
    let raw: Yaml =
        serde_yaml::from_str(content).map_err(|e| parse_error("load_schema", e))?;

    let loader = Loader {
        base_dir,
        strict: options.strict,
    };
    loader.load(&raw)
}

struct Loader<'a> {
    base_dir: &'a Path,
    strict: bool,
}

impl Loader<'_> {
    /// Recoverable problems fail in strict mode and warn otherwise.
    fn warn_or_fail(&self, err: ExError) -> Result<()> {
        if self.strict {
            return Err(err);
        }
        tracing::warn!(
            section = err.section().unwrap_or_default(),
            "{}",
            err.message()
        );
        Ok(())
    }

    fn load(&self, raw: &Yaml) -> Result<SchemaConfig> {
        if !matches!(raw, Yaml::Mapping(_) | Yaml::Null) {
            return Err(schema_invalid("Schema root must be a mapping."));
        }

        let version = get(raw, "schema_version")
            .and_then(scalar_text)
            .map(|v| v.trim().to_string())
            .unwrap_or_default();
        if !SUPPORTED_SCHEMA_VERSIONS.contains(&version.as_str()) {
            return Err(ScrutinyError::UnsupportedSchemaVersion {
                version,
                supported: SUPPORTED_SCHEMA_VERSIONS
                    .iter()
                    .map(|v| v.to_string())
                    .collect(),
            }
            .into());
        }

        let title = get_present(raw, "title").and_then(scalar_text);
        let defaults = get_present(raw, DEFAULTS).cloned().unwrap_or(Yaml::Null);
        self.check_defaults(&defaults)?;

        let sections_raw = match get(raw, "sections") {
            Some(Yaml::Mapping(m)) if !m.is_empty() => m,
            _ => return Err(schema_invalid("No sections defined.")),
        };

        let mut sections = Vec::with_capacity(sections_raw.len());
        for (name, cfg) in sections_raw {
            let name = scalar_text(name)
                .ok_or_else(|| schema_invalid("Section names must be scalars."))?;
            sections.push(self.load_section(&name, &defaults, cfg)?);
        }

        let default_component = get_present(&defaults, "component");
        let default_thresholds = SeverityThresholds::new(
            default_component
                .and_then(|c| get(c, "threshold_ratio"))
                .map(to_value),
            default_component
                .and_then(|c| get(c, "threshold_count"))
                .map(to_value),
        );

        tracing::debug!(
            version = version.as_str(),
            section_count = sections.len(),
            "schema loaded"
        );

        Ok(SchemaConfig {
            version,
            title,
            default_thresholds,
            sections,
        })
    }

    fn check_defaults(&self, defaults: &Yaml) -> Result<()> {
        if !matches!(defaults, Yaml::Mapping(_) | Yaml::Null) {
            return Err(schema_invalid("defaults must be a mapping."));
        }

        if let Some(kind) = get_present(defaults, "data").and_then(|d| get_present(d, "type")) {
            if scalar_text(kind).as_deref() != Some("list") {
                return Err(schema_invalid("defaults.data.type must be 'list' if provided."));
            }
        }

        let report = get_present(defaults, "report");
        parse_report_types(report.and_then(|r| get(r, "types")), DEFAULTS)?;
        parse_theme(report.and_then(|r| get(r, "theme")), DEFAULTS)?;
        Ok(())
    }

    fn load_section(&self, name: &str, defaults: &Yaml, cfg: &Yaml) -> Result<SectionConfig> {
        if !cfg.is_mapping() {
            return Err(section_invalid(name, "must be a mapping."));
        }

        let mut merged = BTreeMap::new();
        for bucket in BUCKETS {
            let over = get(cfg, bucket).unwrap_or(&Yaml::Null);
            if !matches!(over, Yaml::Mapping(_) | Yaml::Null) {
                return Err(section_invalid(name, format!("{} must be a mapping.", bucket)));
            }
            let base = get(defaults, bucket).unwrap_or(&Yaml::Null);
            merged.insert(bucket, deep_merge(base, over));
        }
        let bucket = |b: &str| merged.get(b).cloned().unwrap_or(Yaml::Null);

        let data = self.data_settings(name, &bucket("data"))?;
        let report = self.report_settings(name, &bucket("report"))?;
        let component = self.component_settings(name, &bucket("component"), &data)?;
        let target = match bucket("target") {
            Yaml::Mapping(m) => to_map(&m),
            _ => BTreeMap::new(),
        };

        Ok(SectionConfig {
            name: name.to_string(),
            data,
            report,
            component,
            target,
        })
    }

    fn data_settings(&self, section: &str, data: &Yaml) -> Result<DataSettings> {
        if let Some(kind) = get(data, "type") {
            if scalar_text(kind).as_deref() != Some("list") {
                return Err(section_invalid(section, "data.type must be 'list'."));
            }
        }

        let fields = match get(data, "record_schema") {
            Some(Yaml::Mapping(m)) if !m.is_empty() => m,
            _ => {
                return Err(section_invalid(
                    section,
                    "data.record_schema must be a non-empty map.",
                ))
            }
        };

        let mut record_schema = BTreeMap::new();
        for (field, def) in fields {
            let field = scalar_text(field)
                .ok_or_else(|| section_invalid(section, "record_schema keys must be scalars."))?;
            let def = match def {
                Yaml::String(dtype) => FieldDef {
                    dtype: dtype.clone(),
                    ..FieldDef::default()
                },
                Yaml::Mapping(_) => {
                    let dtype = get_present(def, "dtype").and_then(scalar_text).ok_or_else(|| {
                        section_invalid(section, format!("field '{}' requires 'dtype'.", field))
                    })?;
                    let category = get_present(def, "category").and_then(scalar_text);
                    if let Some(cat) = &category {
                        if !ALLOWED_CATEGORIES.contains(&cat.as_str()) {
                            self.warn_or_fail(section_invalid(
                                section,
                                format!(
                                    "field '{}' has unknown category '{}'. Allowed: {:?}",
                                    field, cat, ALLOWED_CATEGORIES
                                ),
                            ))?;
                        }
                    }
                    FieldDef {
                        dtype,
                        category,
                        required: truthy(get(def, "required")),
                    }
                }
                _ => {
                    return Err(section_invalid(
                        section,
                        format!("record_schema for field '{}' must be string or map.", field),
                    ))
                }
            };
            record_schema.insert(field, def);
        }

        Ok(DataSettings { record_schema })
    }

    fn report_settings(&self, section: &str, report: &Yaml) -> Result<ReportSettings> {
        let types = parse_report_types(get(report, "types"), section)?;
        let theme = parse_theme(get(report, "theme"), section)?;
        let doc = get_present(report, "doc").and_then(scalar_text);
        let doc_text = match &doc {
            Some(path) => read_doc(self.base_dir, path, section)?,
            None => None,
        };

        Ok(ReportSettings {
            types,
            theme,
            doc,
            doc_text,
        })
    }

    fn component_settings(
        &self,
        section: &str,
        component: &Yaml,
        data: &DataSettings,
    ) -> Result<ComponentSettings> {
        let comparator = get_present(component, "comparator")
            .and_then(scalar_text)
            .map(|c| c.trim().to_lowercase())
            .unwrap_or_default();
        if comparator.is_empty() {
            return Err(section_invalid(section, "component.comparator is mandatory."));
        }

        let match_key = get_present(component, "match_key")
            .and_then(scalar_text)
            .filter(|k| !k.is_empty())
            .ok_or_else(|| section_invalid(section, "component.match_key is mandatory."))?;
        if !data.record_schema.contains_key(&match_key) {
            return Err(section_invalid(
                section,
                format!(
                    "component.match_key '{}' must exist in data.record_schema.",
                    match_key
                ),
            ));
        }

        let mut show_key = get_present(component, "show_key").and_then(scalar_text);
        if let Some(key) = show_key.as_deref() {
            if !data.record_schema.contains_key(key) {
                self.warn_or_fail(section_invalid(
                    section,
                    format!(
                        "component.show_key '{}' not in data.record_schema; falling back to match_key '{}'.",
                        key, match_key
                    ),
                ))?;
                show_key = None;
            }
        }

        Ok(ComponentSettings {
            comparator,
            match_key,
            show_key,
            include_matches: truthy(get(component, "include_matches")),
            threshold_ratio: get_present(component, "threshold_ratio").map(to_value),
            threshold_count: get_present(component, "threshold_count").map(to_value),
        })
    }
}

/// Normalizes `report.types` into `[{type, variant}]`, lower-cased.
///
/// Accepts a comma-separated string, a list of strings or `{type, variant?}`
/// maps, or a `{types: ...}` wrapper. Null reads as unset.
fn parse_report_types(value: Option<&Yaml>, section: &str) -> Result<Option<Vec<ReportType>>> {
    let value = match value {
        None | Some(Yaml::Null) => return Ok(None),
        Some(Yaml::Mapping(_)) => match value.and_then(|v| get_present(v, "types")) {
            Some(inner) => inner,
            None => return Ok(None),
        },
        Some(v) => v,
    };

    let mut out = Vec::new();
    match value {
        Yaml::String(text) => {
            for part in text.split(',').map(str::trim).filter(|p| !p.is_empty()) {
                out.push(ReportType::new(part.to_lowercase(), None));
            }
        }
        Yaml::Sequence(items) => {
            for item in items {
                match item {
                    Yaml::Null => {}
                    Yaml::String(text) => {
                        let text = text.trim();
                        if !text.is_empty() {
                            out.push(ReportType::new(text.to_lowercase(), None));
                        }
                    }
                    Yaml::Mapping(_) => {
                        let kind = get_present(item, "type")
                            .and_then(scalar_text)
                            .map(|t| t.trim().to_lowercase())
                            .unwrap_or_default();
                        if kind.is_empty() {
                            return Err(section_invalid(
                                section,
                                "report.types entry missing 'type'.",
                            ));
                        }
                        let variant = get_present(item, "variant")
                            .and_then(scalar_text)
                            .map(|v| v.trim().to_lowercase())
                            .filter(|v| !v.is_empty());
                        out.push(ReportType::new(kind, variant));
                    }
                    _ => {
                        return Err(section_invalid(
                            section,
                            "report.types items must be string or map.",
                        ))
                    }
                }
            }
        }
        _ => {
            return Err(section_invalid(
                section,
                "report.types must be string/list/null.",
            ))
        }
    }
    Ok(Some(out))
}

fn parse_theme(value: Option<&Yaml>, section: &str) -> Result<Option<Theme>> {
    match value {
        None | Some(Yaml::Null) => Ok(None),
        Some(v) => scalar_text(v)
            .and_then(|t| Theme::parse(&t))
            .map(Some)
            .ok_or_else(|| {
                section_invalid(
                    section,
                    "report.theme must be 'light' or 'dark' if provided.",
                )
            }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn yaml(text: &str) -> Yaml {
        serde_yaml::from_str(text).unwrap()
    }

    fn types(text: &str) -> Option<Vec<ReportType>> {
        parse_report_types(Some(&yaml(text)), "S").unwrap()
    }

    #[test]
    fn test_report_types_forms() {
        assert_eq!(
            types("\"Table, chart,\""),
            Some(vec![
                ReportType::new("table", None),
                ReportType::new("chart", None),
            ])
        );
        assert_eq!(
            types("[radar, ~, {type: TABLE, variant: CPLC}, {type: chart, variant: ' '}]"),
            Some(vec![
                ReportType::new("radar", None),
                ReportType::new("table", Some("cplc".to_string())),
                ReportType::new("chart", None),
            ])
        );
        assert_eq!(types("{types: table}"), Some(vec![ReportType::new("table", None)]));
        assert_eq!(types("{other: 1}"), None);
        assert_eq!(parse_report_types(None, "S").unwrap(), None);
    }

    #[test]
    fn test_report_types_rejects_bad_entries() {
        assert!(parse_report_types(Some(&yaml("[{variant: x}]")), "S").is_err());
        assert!(parse_report_types(Some(&yaml("[1]")), "S").is_err());
        assert!(parse_report_types(Some(&yaml("3")), "S").is_err());
    }

    #[test]
    fn test_theme() {
        assert_eq!(parse_theme(Some(&yaml("Dark")), "S").unwrap(), Some(Theme::Dark));
        assert_eq!(parse_theme(None, "S").unwrap(), None);
        assert!(parse_theme(Some(&yaml("sepia")), "S").is_err());
    }
}
