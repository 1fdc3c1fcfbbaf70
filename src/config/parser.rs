use std::collections::HashSet;
use std::path::Path;

use crate::errors::DefensisError;
use super::types::DefensisConfig;
use super::security::validate_security_patterns;
use super::schema::CONFIG_SCHEMA;
use tracing::{debug, warn};

const MAX_CONFIG_BYTES: u64 = 1_048_576;

pub async fn parse_config(path: &Path) -> Result<DefensisConfig, DefensisError> {
    if !path.exists() {
        return Err(DefensisError::Config(format!("Config file not found: {}", path.display())));
    }

    let metadata = tokio::fs::metadata(path).await?;
    if metadata.len() > MAX_CONFIG_BYTES {
        return Err(DefensisError::Config("Config file exceeds 1MB limit".into()));
    }

    let content = tokio::fs::read_to_string(path).await?;
    let config = parse_config_str(&content)?;
    debug!(path = %path.display(), "Loaded configuration");
    Ok(config)
}

pub fn parse_config_str(content: &str) -> Result<DefensisConfig, DefensisError> {
    let yaml: serde_yaml::Value = serde_yaml::from_str(content)?;
    if yaml.is_null() {
        return Ok(DefensisConfig::default());
    }

    validate_security_patterns(&yaml)?;
    validate_schema(&yaml)?;

    let config: DefensisConfig = serde_yaml::from_value(yaml)?;
    validate_semantics(&config)?;

    Ok(config)
}

/// Validate config against the JSON schema for structural correctness.
fn validate_schema(yaml: &serde_yaml::Value) -> Result<(), DefensisError> {
    let json_value: serde_json::Value = serde_json::to_value(yaml)
        .map_err(|e| DefensisError::Config(format!("Config conversion error: {}", e)))?;

    let compiled = jsonschema::JSONSchema::compile(&CONFIG_SCHEMA)
        .map_err(|e| DefensisError::Config(format!("Schema compilation error: {}", e)))?;

    let result = compiled.validate(&json_value);
    if let Err(errors) = result {
        // Advisory only; the typed decode below is authoritative.
        for e in errors {
            warn!(validation_error = %e, path = %e.instance_path, "Config schema warning");
        }
    }

    Ok(())
}

/// Checks serde cannot express: a non-empty phase list and unique finding ids.
fn validate_semantics(config: &DefensisConfig) -> Result<(), DefensisError> {
    let Some(scan) = &config.scan else {
        return Ok(());
    };

    if let Some(phases) = &scan.phases {
        if phases.is_empty() {
            return Err(DefensisError::Config("scan.phases must list at least one phase".into()));
        }
        if phases.iter().any(|p| p.name.trim().is_empty()) {
            return Err(DefensisError::Config("scan.phases entries need a name".into()));
        }
    }

    if let Some(findings) = &scan.findings {
        let mut seen = HashSet::new();
        for f in findings {
            if !seen.insert(f.id.as_str()) {
                return Err(DefensisError::Config(format!(
                    "Finding id '{}' appears more than once in scan.findings",
                    f.id
                )));
            }
        }
    }

    if scan.reveal_interval_ms == Some(0) {
        warn!("scan.reveal_interval_ms is 0; findings will all appear at once");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &str = r#"
scan:
  subject: payments-api
  reveal_interval_ms: 250
  phases:
    - name: Initializing scan...
      weight_ms: 1000
    - name: Generating report...
      weight_ms: 500
  findings:
    - id: "1"
      category: vulnerability
      severity: critical
      title: SQL Injection in user authentication
      description: Direct SQL query construction without parameterization
      location: src/auth.py
      line: 45
session:
  dir: /tmp/defensis-session
output:
  color: false
"#;

    #[test]
    fn test_parse_full_config() {
        let config = parse_config_str(FULL).unwrap();
        let plan = config.scan_plan(None).unwrap();
        assert_eq!(plan.subject(), "payments-api");
        assert_eq!(plan.phases().len(), 2);
        assert_eq!(plan.findings()[0].line, Some(45));
        assert_eq!(config.output.unwrap().color, Some(false));
    }

    #[test]
    fn test_empty_document_is_default() {
        let config = parse_config_str("").unwrap();
        assert!(config.scan.is_none());
    }

    #[test]
    fn test_empty_phase_list_rejected() {
        let err = parse_config_str("scan:\n  phases: []\n").unwrap_err();
        assert!(matches!(err, DefensisError::Config(_)));
    }

    #[test]
    fn test_duplicate_finding_ids_rejected() {
        let yaml = r#"
scan:
  findings:
    - { id: "1", category: dependency, severity: high, title: a, description: b, location: package.json }
    - { id: "1", category: dependency, severity: low, title: c, description: d, location: package.json }
"#;
        assert!(parse_config_str(yaml).is_err());
    }

    #[test]
    fn test_unknown_severity_is_yaml_error() {
        let yaml = r#"
scan:
  findings:
    - { id: "1", category: dependency, severity: severe, title: a, description: b, location: package.json }
"#;
        assert!(matches!(parse_config_str(yaml), Err(DefensisError::Yaml(_))));
    }

    #[test]
    fn test_findings_describing_xss_and_traversal_parse() {
        let yaml = r#"
scan:
  findings:
    - id: xss-1
      category: vulnerability
      severity: high
      title: Reflected XSS via <script> in search
      description: "Query string is echoed unescaped, so <script>alert(1)</script> and javascript: links execute"
      location: web/templates/search.html
      line: 12
    - id: traversal-1
      category: vulnerability
      severity: critical
      title: Path traversal in file download
      description: "The name parameter accepts ../../etc/passwd"
      location: ../shared/download.py
"#;
        let plan = parse_config_str(yaml).unwrap().scan_plan(None).unwrap();
        assert_eq!(plan.findings().len(), 2);
        assert!(plan.findings()[0].description.contains("<script>"));
        assert!(plan.findings()[1].description.contains("../../etc/passwd"));
    }

    #[test]
    fn test_session_dir_traversal_rejected() {
        let err = parse_config_str("session:\n  dir: ../../etc\n").unwrap_err();
        assert!(matches!(err, DefensisError::Config(ref msg) if msg.contains("session.dir")));
    }

    #[tokio::test]
    async fn test_missing_file_is_config_error() {
        let err = parse_config(Path::new("/nonexistent/defensis.yaml")).await.unwrap_err();
        assert!(matches!(err, DefensisError::Config(_)));
    }

    #[tokio::test]
    async fn test_parse_config_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("defensis.yaml");
        tokio::fs::write(&path, FULL).await.unwrap();
        let config = parse_config(&path).await.unwrap();
        assert_eq!(config.session_dir(), std::path::PathBuf::from("/tmp/defensis-session"));
    }
}
