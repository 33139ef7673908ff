#![deny(missing_docs)]

//! # CRUD Swagger Web Binary
//!
//! Serves the documents described by the configuration file named in
//! `CRUD_SWAGGER_CONFIG`.

use actix_web::web;
use crud_swagger_core::ApiConfig;
use crud_swagger_web::{build_server, init_tracing};
use std::io;
use std::net::TcpListener;
use std::path::PathBuf;
use tracing::info;

fn resolve_bind_addr() -> String {
    std::env::var("CRUD_SWAGGER_BIND").unwrap_or_else(|_| "127.0.0.1:8080".to_string())
}

fn resolve_config_path() -> PathBuf {
    std::env::var("CRUD_SWAGGER_CONFIG")
        .unwrap_or_else(|_| "crud-swagger.yaml".to_string())
        .into()
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    init_tracing();

    let config_path = resolve_config_path();
    let cache = ApiConfig::from_path(&config_path)
        .and_then(|config| config.into_cache())
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e.to_string()))?;

    let bind_addr = resolve_bind_addr();
    let listener = TcpListener::bind(&bind_addr)?;
    info!(addr = %bind_addr, config = %config_path.display(), "Serving API documentation");
    let server = build_server(listener, web::Data::new(cache))?;

    if std::env::var("CRUD_SWAGGER_ONESHOT").is_ok() {
        server.handle().stop(true).await;
    }

    server.await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_main_oneshot() {
        let mut config = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(config, "resources:\n  - singular: vegetable").unwrap();

        std::env::set_var("CRUD_SWAGGER_CONFIG", config.path());
        std::env::set_var("CRUD_SWAGGER_BIND", "127.0.0.1:0");
        std::env::set_var("CRUD_SWAGGER_ONESHOT", "1");

        let res = main();

        std::env::remove_var("CRUD_SWAGGER_CONFIG");
        std::env::remove_var("CRUD_SWAGGER_BIND");
        std::env::remove_var("CRUD_SWAGGER_ONESHOT");

        assert!(res.is_ok());
    }

    #[actix_web::test]
    async fn test_build_server_start_stop() {
        let cache = ApiConfig::from_yaml_str("resources: []").unwrap().into_cache().unwrap();
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let server = build_server(listener, web::Data::new(cache)).unwrap();
        let handle = server.handle();
        actix_web::rt::spawn(server);
        handle.stop(true).await;
    }
}
