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

//! MySQL data access layer for Launchpad: pool construction, migrations,
//! the health probe, and per-entity queries.

pub mod error;
pub mod pool;
pub mod posts;
pub mod users;

pub use error::{DataError, Result as DataResult};
pub use pool::{connect, ping, run_migrations};
