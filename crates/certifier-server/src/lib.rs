//! # Certifier Server
//!
//! HTTP transport and process lifecycle for Certifier.
//!
//! ## Endpoints
//!
//! | Method | Path | Body | Response |
//! |---|---|---|---|
//! | POST | `/certify` | raw content | `{"certified", "certificate"?}` |
//! | POST | `/verify` | `{"signature", "digestHex"}` | `{"isValid"}` |
//! | POST | `/verify/content?signature=..` | raw content | `{"isValid"}` |
//! | GET | `/public-key` | - | `{"publicKey"}` |
//! | GET | `/health` | - | `OK` |
//!
//! ## Lifecycle
//!
//! 1. Build both collaborator clients; failure aborts startup.
//! 2. Serve until a shutdown signal.
//! 3. Stop accepting, drain in-flight requests.
//! 4. Release both clients.

pub mod config;
pub mod error;
pub mod logging;
pub mod routes;
pub mod server;

pub use config::{Cli, ConfigError, ServerConfig};
pub use error::ApiError;
pub use logging::init_tracing;
pub use routes::{router, AppState};
pub use server::{build_registry, run, serve};
