//! HTTP surface and command-line interface for the CEP weather lookup.
//!
//! This crate focuses on:
//! - Serving `GET /weather?cep=...` and mapping lookup failures to status codes
//! - Parsing CLI arguments and environment
//! - Interactive configuration
//! - Logging setup

pub mod cli;
pub mod response;
pub mod routes;
pub mod server;
pub mod telemetry;

pub use routes::{AppState, router};
