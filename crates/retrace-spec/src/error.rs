// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Errors raised while loading an API description.

use thiserror::Error;

/// Error type for spec loading and validation.
#[derive(Debug, Error)]
pub enum SpecError {
    /// I/O error while reading a spec file.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// The document is not valid spec JSON.
    #[error("malformed spec: {0}")]
    Json(#[from] serde_json::Error),
    /// `spec_version` is missing or not one this crate understands.
    #[error("Unsupported spec_version: {found:?} (expected {expected})")]
    UnsupportedVersion {
        /// Version tag found in the document, if any.
        found: Option<String>,
        /// Version tag this loader accepts.
        expected: &'static str,
    },
    /// Two interfaces share a name.
    #[error("duplicate interface `{0}`")]
    DuplicateInterface(String),
    /// Two methods of one interface share a name.
    #[error("duplicate method `{interface}::{method}`")]
    DuplicateMethod {
        /// Owning interface.
        interface: String,
        /// Repeated method name.
        method: String,
    },
    /// An interface names a base that is not declared before it.
    #[error("interface `{interface}` derives from unknown interface `{base}`")]
    UnknownBase {
        /// Deriving interface.
        interface: String,
        /// Missing base name.
        base: String,
    },
    /// An interface, method, parameter or type has an empty name.
    #[error("empty {what} name in `{context}`")]
    EmptyName {
        /// Which kind of descriptor was unnamed.
        what: &'static str,
        /// Where it was found.
        context: String,
    },
}
