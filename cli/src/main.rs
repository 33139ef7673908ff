#![deny(missing_docs)]

//! # CRUD Swagger CLI
//!
//! Command Line Interface for generating Swagger documents of CRUD APIs.
//!
//! Supported Commands:
//! - `generate`: Renders one release of a configured API to JSON or YAML.
//! - `check`: Audits every release (or an existing document) for broken references.
//! - `serve`: Serves `GET /swagger.json` over HTTP (feature `server`).

use clap::{Parser, Subcommand};

use crate::error::CliResult;

mod check;
mod error;
mod generate;
#[cfg(feature = "server")]
mod serve;

#[derive(Parser, Debug)]
#[clap(author, version, about = "Swagger documents for CRUD resources")]
struct Cli {
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Render the document of one release.
    Generate(generate::GenerateArgs),
    /// Validate generated or existing documents.
    Check(check::CheckArgs),
    /// Serve documents over HTTP.
    #[cfg(feature = "server")]
    Serve(serve::ServeArgs),
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .try_init();
}

fn main() -> CliResult<()> {
    init_tracing();
    let cli = Cli::parse();

    match &cli.command {
        Commands::Generate(args) => generate::execute(args)?,
        Commands::Check(args) => check::execute(args)?,
        #[cfg(feature = "server")]
        Commands::Serve(args) => serve::execute(args)?,
    }

    Ok(())
}
