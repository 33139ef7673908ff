#![deny(missing_docs)]

//! # Check Command
//!
//! Generates every declared release and reports structural issues, or
//! audits an existing document file.

use crate::error::{CliError, CliResult};
use crud_swagger_core::{validate_document, ApiConfig, DocumentIssue};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Arguments for the check command.
#[derive(clap::Args, Debug, Clone)]
pub struct CheckArgs {
    /// Path to the API configuration.
    #[clap(long, env = "CRUD_SWAGGER_CONFIG")]
    pub config: Option<PathBuf>,

    /// An already generated document (.json, .yaml/.yml) to audit.
    /// Takes precedence over `--config`.
    #[clap(long)]
    pub document: Option<PathBuf>,
}

/// Issues found per release label (or file name).
pub type CheckReport = Vec<(String, Vec<DocumentIssue>)>;

/// Audits every release of a configuration.
pub fn check_config(path: &Path) -> CliResult<CheckReport> {
    let cache = ApiConfig::from_path(path)?.into_cache()?;
    let mut report = Vec::new();
    for release in cache.registry().releases() {
        let document = cache.versioned(Some(release), "/swagger.json")?;
        report.push((release.clone(), validate_document(&document.into_value())));
    }
    Ok(report)
}

/// Audits a document file.
pub fn check_document(path: &Path) -> CliResult<CheckReport> {
    let content = fs::read_to_string(path)?;
    let is_yaml = matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    );
    let document: Value = if is_yaml {
        serde_yaml::from_str(&content)
            .map_err(|e| CliError::General(format!("YAML parse failed: {}", e)))?
    } else {
        serde_json::from_str(&content)
            .map_err(|e| CliError::General(format!("JSON parse failed: {}", e)))?
    };
    Ok(vec![(
        path.display().to_string(),
        validate_document(&document),
    )])
}

/// Executes the check command.
pub fn execute(args: &CheckArgs) -> CliResult<()> {
    let report = match (&args.document, &args.config) {
        (Some(document), _) => check_document(document)?,
        (None, Some(config)) => check_config(config)?,
        (None, None) => {
            return Err(CliError::General(
                "Either --config or --document is required".into(),
            ))
        }
    };

    let mut total = 0;
    for (label, issues) in &report {
        for issue in issues {
            warn!(target_doc = %label, "{}", issue);
        }
        total += issues.len();
        info!(target_doc = %label, issues = issues.len(), "Checked document");
    }
    if total > 0 {
        return Err(CliError::General(format!(
            "{} issue(s) found",
            total
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn test_check_config_all_releases() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("api.yaml");
        fs::write(
            &path,
            "releases: ['1.0.0', '2.0.0']\nresources:\n  - singular: vegetable\n    implicit_keys: true\n",
        )
        .unwrap();

        let report = check_config(&path).unwrap();
        let labels: Vec<_> = report.iter().map(|(l, _)| l.as_str()).collect();
        assert_eq!(labels, vec!["1.0.0", "2.0.0"]);
        assert!(report.iter().all(|(_, issues)| issues.is_empty()));
        assert!(execute(&CheckArgs {
            config: Some(path),
            document: None
        })
        .is_ok());
    }

    #[test]
    fn test_check_broken_document() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("swagger.json");
        fs::write(
            &path,
            r##"{"swagger":"2.0","info":{"title":"t","version":"1"},"paths":{"/a":{"get":{"responses":{"200":{"description":"ok","schema":{"$ref":"#/definitions/Missing"}}}}}}}"##,
        )
        .unwrap();

        let report = check_document(&path).unwrap();
        assert_eq!(report[0].1.len(), 1);
        let err = execute(&CheckArgs {
            config: None,
            document: Some(path),
        })
        .unwrap_err();
        assert_eq!(err.to_string(), "Operation failed: 1 issue(s) found");
    }
}
