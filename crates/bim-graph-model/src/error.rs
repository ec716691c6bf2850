// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for parse operations

use thiserror::Error;

/// Result type alias for parser operations
pub type Result<T> = std::result::Result<T, ParseError>;

/// Errors that can abort a parse
///
/// A missing data section is the only structural failure. Narrower problems
/// (malformed records, unknown keywords, dangling references, unparseable
/// numerics) degrade to omission and never surface here.
#[derive(Error, Debug)]
pub enum ParseError {
    /// Input contains no data section
    #[error("no data section found (expected DATA;/ENDSEC; markers)")]
    MissingDataSection,

    /// IO error while reading input
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
