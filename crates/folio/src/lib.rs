//! `folio` - Portfolio content toolkit
//!
//! This library reads, writes and checks the markdown project records behind
//! a portfolio site, answers the site's ongoing/completed queries, and
//! migrates legacy blog posts into the site's content layout.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod frontmatter;
pub mod logging;
pub mod migrate;
pub mod record;
pub mod validate;

#[cfg(test)]
mod testing;

pub use catalog::{Catalog, CatalogEntry, StatusFilter};
pub use config::Config;
pub use error::{Error, Result};
pub use logging::init_logging;
pub use migrate::{MigrationReport, Migrator};
pub use record::{ProjectRecord, ProjectStatus, RawProject};
pub use validate::{ValidationReport, Validator};
