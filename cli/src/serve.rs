#![deny(missing_docs)]

//! # Serve Command
//!
//! Starts the documentation server for a configuration file.

use crate::error::CliResult;
use actix_web::web;
use crud_swagger_core::ApiConfig;
use crud_swagger_web::build_server;
use std::net::TcpListener;
use std::path::PathBuf;
use tracing::info;

/// Arguments for the serve command.
#[derive(clap::Args, Debug, Clone)]
pub struct ServeArgs {
    /// Path to the API configuration.
    #[clap(long, env = "CRUD_SWAGGER_CONFIG")]
    pub config: PathBuf,

    /// Address to listen on.
    #[clap(long, env = "CRUD_SWAGGER_BIND", default_value = "127.0.0.1:8080")]
    pub bind: String,

    /// Stop right after binding (smoke tests).
    #[clap(long, hide = true)]
    pub oneshot: bool,
}

/// Executes the serve command.
pub fn execute(args: &ServeArgs) -> CliResult<()> {
    let cache = ApiConfig::from_path(&args.config)?.into_cache()?;
    // Generate eagerly so configuration errors surface before binding.
    cache.root()?;

    let listener = TcpListener::bind(&args.bind)?;
    info!(addr = %args.bind, "Serving API documentation");
    let server = build_server(listener, web::Data::new(cache))?;

    let oneshot = args.oneshot;
    actix_rt::System::new().block_on(async move {
        if oneshot {
            server.handle().stop(true).await;
        }
        server.await
    })?;
    Ok(())
}
