//! Foundational error types shared by the host-facing crates.

use displaydoc::Display;
use ibc_primitives::prelude::*;

/// Errors that originate from host implementations.
#[derive(Debug, Display)]
pub enum HostError {
    /// invalid data: `{description}`
    InvalidData { description: String },
    /// missing data: `{description}`
    MissingData { description: String },
    /// failed to store data: `{description}`
    FailedToStoreData { description: String },
    /// failed to retrieve data from store: `{description}`
    FailedToRetrieveFromStore { description: String },
    /// other error: `{description}`
    Other { description: String },
}

impl HostError {
    pub fn missing_data(description: impl ToString) -> Self {
        Self::MissingData {
            description: description.to_string(),
        }
    }

    pub fn failed_to_store(description: impl ToString) -> Self {
        Self::FailedToStoreData {
            description: description.to_string(),
        }
    }
}

/// Errors that arise when parsing identifiers.
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Debug, Display, PartialEq, Eq)]
pub enum IdentifierError {
    /// identifier `{id}` has invalid length; must be between [`{min}`,`{max}`]
    InvalidLength { id: String, min: u64, max: u64 },
    /// identifier `{id}` must only contain alphanumeric characters or `.`, `_`, `+`, `-`, `#`, - `[`, `]`, `<`, `>`
    InvalidCharacter { id: String },
    /// identifier prefix `{prefix}` is invalid
    InvalidPrefix { prefix: String },
    /// identifier cannot be empty
    Empty,
    /// String `{value}` cannot be converted to packet sequence, error: `{reason}`
    InvalidStringAsSequence { value: String, reason: String },
    /// sequence `{sequence}` cannot be incremented without overflowing
    SequenceOverflow { sequence: u64 },
}

/// Errors that occur while converting raw (protobuf) types into domain types.
#[derive(Debug, Display)]
pub enum DecodingError {
    /// identifier error: `{0}`
    Identifier(IdentifierError),
    /// invalid raw data: `{description}`
    InvalidRawData { description: String },
    /// missing raw data: `{description}`
    MissingRawData { description: String },
}

impl DecodingError {
    pub fn missing_raw_data(description: impl ToString) -> Self {
        Self::MissingRawData {
            description: description.to_string(),
        }
    }

    pub fn invalid_raw_data(description: impl ToString) -> Self {
        Self::InvalidRawData {
            description: description.to_string(),
        }
    }
}

impl From<IdentifierError> for DecodingError {
    fn from(e: IdentifierError) -> Self {
        Self::Identifier(e)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for IdentifierError {}

#[cfg(feature = "std")]
impl std::error::Error for DecodingError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self {
            Self::Identifier(e) => Some(e),
            _ => None,
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for HostError {}
