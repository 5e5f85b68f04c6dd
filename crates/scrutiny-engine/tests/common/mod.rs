use std::fs;
use std::path::Path;

use scrutiny_engine::commands::verify::VerifyRequest;
use tempfile::TempDir;

pub const SCHEMA: &str = r#"
schema_version: "0.12"
title: Engine test scan
defaults:
  component:
    comparator: basic
    match_key: name
    threshold_ratio: 0.5
sections:
  CPLC:
    data:
      record_schema: { name: string, value: string }
    component:
      comparator: cplc
  SUPPORTED_ALGS:
    data:
      record_schema:
        name: string
        supported: { dtype: bool, category: binary }
        info: string
    component:
      show_key: info
      threshold_ratio: null
      threshold_count: 2
  PERF:
    data:
      record_schema: { name: string, avg_ms: float, min_ms: float, max_ms: float, error: string }
    report:
      types: chart
    component:
      comparator: algperf
"#;

pub const REFERENCE: &str = r#"{
  "CPLC": [
    {"name": "ICFabricator", "value": "4790 (NXP)"},
    {"name": "ICType", "value": "5167"}
  ],
  "SUPPORTED_ALGS": [
    {"name": "ALG_AES", "supported": true, "info": "AES"},
    {"name": "ALG_RSA", "supported": true, "info": "RSA"},
    {"name": "ALG_DES", "supported": false, "info": "DES"}
  ],
  "PERF": [
    {"name": "AES encrypt", "avg_ms": 1.0, "min_ms": 0.9, "max_ms": 1.1, "error": null},
    {"name": "RSA sign", "avg_ms": 50, "min_ms": 40, "max_ms": 55, "error": null}
  ]
}"#;

pub const PROFILE: &str = r#"{
  "CPLC": [
    {"name": "ICFabricator", "value": "4790 (NXP Semiconductors)"},
    {"name": "ICType", "value": "5168"}
  ],
  "SUPPORTED_ALGS": [
    {"name": "ALG_AES", "supported": true, "info": "AES"},
    {"name": "ALG_RSA", "supported": false, "info": "RSA"},
    {"name": "ALG_ECC", "supported": true, "info": "ECC"}
  ],
  "PERF": [
    {"name": "AES encrypt", "avg_ms": 1.5, "error": null},
    {"name": "RSA sign", "avg_ms": 80, "error": null}
  ]
}"#;

/// Writes the schema and both dumps into a fresh directory
#[allow(dead_code)]
pub fn setup_inputs() -> (TempDir, VerifyRequest) {
    let dir = TempDir::new().unwrap();
    let request = write_inputs(dir.path(), SCHEMA, REFERENCE, PROFILE);
    (dir, request)
}

#[allow(dead_code)]
pub fn write_inputs(dir: &Path, schema: &str, reference: &str, profile: &str) -> VerifyRequest {
    let schema_path = dir.join("schema.yml");
    let reference_path = dir.join("reference.json");
    let profile_path = dir.join("profile.json");
    fs::write(&schema_path, schema).unwrap();
    fs::write(&reference_path, reference).unwrap();
    fs::write(&profile_path, profile).unwrap();
    VerifyRequest::new(schema_path, reference_path, profile_path)
}
