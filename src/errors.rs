use std::io;

use thiserror::Error;

use crate::types::{Identifier, SourceId};

/// Error type for mapping, lookup, input, and archive failures.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// A mapping, directory, or reference resource could not be read.
    #[error("source '{source_id}' is unavailable: {reason}")]
    SourceUnavailable {
        /// Which resource failed (`mapping`, `reference`, ...).
        source_id: SourceId,
        /// Underlying failure text.
        reason: String,
    },
    /// Raw input text is not a statistics document.
    #[error("input '{identifier}' is not a valid statistics document: {reason}")]
    MalformedInput {
        /// Identifier of the offending input.
        identifier: Identifier,
        /// Parser message.
        reason: String,
    },
    /// Identifier is not 36 characters long; no lookup was attempted.
    #[error("identifier '{identifier}' has length {length}, expected a 36-character UUID")]
    InvalidIdentifier {
        /// The rejected identifier.
        identifier: Identifier,
        /// Its length in characters.
        length: usize,
    },
    /// The player directory had no usable answer.
    #[error("identifier '{identifier}' could not be resolved: {reason}")]
    ResolutionFailure {
        /// The identifier that was looked up.
        identifier: Identifier,
        /// Transport or directory message.
        reason: String,
    },
    /// Zip packaging failed.
    #[error("archive failure: {0}")]
    Archive(String),
    /// Filesystem failure.
    #[error(transparent)]
    Io(#[from] io::Error),
    /// Invalid paths or arguments.
    #[error("configuration error: {0}")]
    Configuration(String),
}
