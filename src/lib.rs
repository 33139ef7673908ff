#![deny(missing_docs)]

//! # CRUD Swagger
//!
//! Swagger 2.0 documents for resources exposing a uniform CRUD surface.
//! This crate re-exports the engine; the HTTP handler lives in
//! `crud-swagger-web` and the command line in `crud-swagger-cli`.

pub use crud_swagger_core::*;
