#![deny(missing_docs)]

//! # CRUD Swagger Web Library
//!
//! Serves generated documents over HTTP. The requested release is read from
//! the `API-Version` header and the `basePath` is derived from the path the
//! document was fetched at, so the handler can be mounted under any scope.

use actix_web::{dev::Server, get, web, App, HttpRequest, HttpResponse, HttpServer, Responder};
use crud_swagger_core::{AppError, DocumentCache};
use serde::Serialize;
use std::net::TcpListener;
use tracing::{error, warn};

/// Header selecting the API release.
pub const API_VERSION_HEADER: &str = "API-Version";

/// Error payload, shaped like the `ErrorModel` definition.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// HTTP status code.
    pub code: u16,
    /// Human readable message.
    pub message: String,
}

/// Returns the Swagger document for the requested release.
#[get("/swagger.json")]
pub async fn swagger_json(req: HttpRequest, cache: web::Data<DocumentCache>) -> impl Responder {
    let requested = req
        .headers()
        .get(API_VERSION_HEADER)
        .and_then(|v| v.to_str().ok());

    match cache.versioned(requested, req.path()) {
        Ok(document) => HttpResponse::Ok().json(document),
        Err(AppError::UnknownRelease(release)) => {
            warn!(release = %release, "Requested unknown API release");
            HttpResponse::BadRequest().json(ErrorBody {
                code: 400,
                message: format!("Unknown API version '{}'", release),
            })
        }
        Err(err) => {
            error!(error = %err, "Document generation failed");
            HttpResponse::InternalServerError().json(ErrorBody {
                code: 500,
                message: err.to_string(),
            })
        }
    }
}

/// A simple health check handler.
#[get("/health")]
pub async fn health_check() -> impl Responder {
    HttpResponse::Ok().body("OK")
}

/// Registers the documentation routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(swagger_json).service(health_check);
}

/// Builds a server sharing `cache` across workers.
pub fn build_server(
    listener: TcpListener,
    cache: web::Data<DocumentCache>,
) -> std::io::Result<Server> {
    Ok(HttpServer::new(move || {
        App::new().app_data(cache.clone()).configure(configure)
    })
    .listen(listener)?
    .run())
}

/// Installs the log subscriber; `RUST_LOG` overrides the `info` default.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .try_init();
}
