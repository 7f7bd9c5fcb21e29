//! Validation of project records.
//!
//! Every content-shape property a record must satisfy is a named [`Rule`]
//! with a fixed [`Severity`]:
//!
//! - **Errors** make a record unusable: missing `name`, `description`,
//!   `link` or `startDate`, malformed dates, an `endDate` before the
//!   `startDate`, an invalid link, or empty tags.
//!
//! - **Warnings** are advisory: repeated tags, absolute image paths,
//!   missing image assets, and keys the site does not know about.
//!
//! # Example
//!
//! ```
//! use folio::validate::{Rule, Validator};
//!
//! let validator = Validator::default();
//! let report = validator.check_document(
//!     "---\nname: 'demo'\nlink: 'https://github.com/example/demo'\n---\n",
//!     None,
//! );
//!
//! assert!(report.has(Rule::DescriptionRequired));
//! assert!(report.has(Rule::StartDateRequired));
//! assert!(!report.passes(false));
//! ```

mod rules;
mod validator;

pub use rules::{Rule, Severity, Violation};
pub use validator::{ValidationReport, Validator};
