#![deny(missing_docs)]

//! # Generate Command
//!
//! Renders the document of one release from a configuration file.

use crate::error::{CliError, CliResult};
use crud_swagger_core::{ensure_valid, ApiConfig};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Arguments for the generate command.
#[derive(clap::Args, Debug, Clone)]
pub struct GenerateArgs {
    /// Path to the API configuration (YAML, or JSON by extension).
    #[clap(long, env = "CRUD_SWAGGER_CONFIG")]
    pub config: PathBuf,

    /// Release to render. Defaults to the latest declared release.
    #[clap(long)]
    pub api_version: Option<String>,

    /// Path the document is published at; its parent becomes `basePath`.
    #[clap(long, default_value = "/swagger.json")]
    pub document_path: String,

    /// Output path for the document.
    /// Supports .json and .yaml/.yml extensions.
    /// If not provided, prints JSON to stdout.
    #[clap(long)]
    pub output: Option<PathBuf>,

    /// Skip the structural checks before writing.
    #[clap(long)]
    pub skip_validation: bool,
}

/// Builds the requested document as a JSON value.
pub fn build_document(
    config: &Path,
    api_version: Option<&str>,
    document_path: &str,
) -> CliResult<Value> {
    let cache = ApiConfig::from_path(config)?.into_cache()?;
    let document = cache.versioned(api_version, document_path)?;
    Ok(document.into_value())
}

/// Serializes `document` according to the output extension.
pub fn render(document: &Value, output: Option<&Path>) -> CliResult<String> {
    let ext = output
        .and_then(|p| p.extension())
        .and_then(|e| e.to_str())
        .unwrap_or("json");
    match ext {
        "yaml" | "yml" => serde_yaml::to_string(document)
            .map_err(|e| CliError::General(format!("YAML serialization failed: {}", e))),
        _ => serde_json::to_string_pretty(document)
            .map_err(|e| CliError::General(format!("JSON serialization failed: {}", e))),
    }
}

/// Executes the generate command.
pub fn execute(args: &GenerateArgs) -> CliResult<()> {
    let document = build_document(
        &args.config,
        args.api_version.as_deref(),
        &args.document_path,
    )?;
    if !args.skip_validation {
        ensure_valid(&document)?;
    }

    let rendered = render(&document, args.output.as_deref())?;
    match &args.output {
        Some(out_path) => {
            if let Some(parent) = out_path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent)?;
                }
            }
            fs::write(out_path, rendered)?;
            info!(path = %out_path.display(), "Wrote document");
        }
        None => println!("{}", rendered),
    }
    Ok(())
}
