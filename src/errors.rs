//! Harness error handling.
//!
//! All fatal conditions surface as [`HarnessError`], a `miette`-backed
//! diagnostic with a namespaced error code per condition. Two conditions
//! are deliberately *not* errors and never appear here:
//!
//! - a missing spec file (the group is reported skipped, see
//!   [`crate::spec::load_records`]);
//! - a missing lambda fragment for the current implementation (the case is
//!   reported skipped, see [`crate::lambdas::bind`]).

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

/// Fatal conditions raised while loading or binding spec material.
#[derive(Debug, Error, Diagnostic)]
pub enum HarnessError {
    /// The spec file exists but could not be read.
    #[error("failed to read spec file {}", path.display())]
    #[diagnostic(code(conformance::spec::unreadable))]
    SpecUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A record is missing a required field, or the group file is not valid
    /// YAML. Aborts loading of that group; other groups are unaffected.
    #[error("malformed record in spec group '{group}': {detail}")]
    #[diagnostic(
        code(conformance::spec::malformed_record),
        help("every record requires name, desc, template, data, and expected")
    )]
    MalformedRecord { group: &'static str, detail: String },

    /// A record's data tree contains a value the harness cannot represent.
    #[error("unsupported data value: {detail}")]
    #[diagnostic(code(conformance::spec::invalid_data))]
    InvalidData { detail: String },

    /// The value under a "lambda" key is not a tag-to-fragment mapping.
    #[error("lambda fixture is not a tag-to-fragment mapping: found {found}")]
    #[diagnostic(code(conformance::lambda::invalid_fixture))]
    InvalidFixture { found: &'static str },
}
