#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]

//! Environment-backed configuration for the Launchpad service.
//!
//! Layout: `model.rs` (typed settings), `validate.rs` (rule table, error
//! accumulation, liveness re-checks), `error.rs` (error type and the startup
//! diagnostic report).

pub mod error;
pub mod model;
pub mod validate;

pub use error::{ConfigError, ConfigResult};
pub use model::{AppConfig, AppEnv};
pub use validate::{EnvReport, ValidationError, inspect_env, inspect_with, load, validate_with};
