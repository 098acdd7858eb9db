/*!
The error type returned by every decoding operation.

Every variant records the byte offset of the item that could not be read, so
malformed input can be diagnosed from the error alone.
*/

use super::types::MajorType;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Unexpected end of buffer at offset {offset}, {needed} more bytes needed")]
    UnexpectedEndOfBuffer { offset: usize, needed: usize },

    #[error("Expected {expected} at offset {offset}, found {actual}")]
    MajorTypeMismatch {
        offset: usize,
        expected: MajorType,
        actual: MajorType,
    },

    #[error("Invalid additional info {info} for {major} at offset {offset}")]
    InvalidAdditionalInfo {
        offset: usize,
        major: MajorType,
        info: u8,
    },

    #[error("Definite length item at offset {offset} has {read} of {expected} items read")]
    NotAtEndOfDefiniteItem {
        offset: usize,
        read: usize,
        expected: usize,
    },

    #[error("Unexpected break byte at offset {offset}")]
    UnexpectedBreakByte { offset: usize },

    #[error("Expected break byte at offset {offset}")]
    ExpectedBreakByte { offset: usize },

    #[error("Indefinite length {expected} contains an invalid chunk at offset {offset}")]
    IndefiniteStringChunkTypeMismatch { offset: usize, expected: MajorType },

    #[error("Tag at offset {offset} is not followed by a value")]
    TagNotFollowedByValue { offset: usize },

    #[error("Map key at offset {offset} has no value")]
    MapKeyMissingValue { offset: usize },

    #[error("Definite length {length} at offset {offset} exceeds the {remaining} bytes remaining")]
    DefiniteLengthExceedsBuffer {
        offset: usize,
        length: u64,
        remaining: usize,
    },

    #[error("Invalid UTF-8 in text string at offset {offset}: {source}")]
    InvalidUtf8 {
        offset: usize,
        #[source]
        source: core::str::Utf8Error,
    },

    #[error("Not a simple value encoding at offset {offset}")]
    NotASimpleValueEncoding { offset: usize },

    #[error("Not a boolean encoding at offset {offset}")]
    NotABooleanEncoding { offset: usize },

    #[error("Not a null encoding at offset {offset}")]
    NotANullEncoding { offset: usize },

    #[error("Not an undefined encoding at offset {offset}")]
    NotAnUndefinedEncoding { offset: usize },

    #[error("Not a float encoding at offset {offset}")]
    NotAFloatEncoding { offset: usize },

    #[error("No open {expected} to close at offset {offset}")]
    NotInContainer {
        offset: usize,
        expected: MajorType,
    },

    #[error("Nesting at offset {offset} exceeds the maximum depth of {max_depth}")]
    DepthLimitExceeded { offset: usize, max_depth: usize },

    #[error("Additional data after the end of the item at offset {offset}")]
    TrailingData { offset: usize },
}

impl Error {
    /// The byte offset the error refers to
    pub fn offset(&self) -> usize {
        match self {
            Self::UnexpectedEndOfBuffer { offset, .. }
            | Self::MajorTypeMismatch { offset, .. }
            | Self::InvalidAdditionalInfo { offset, .. }
            | Self::NotAtEndOfDefiniteItem { offset, .. }
            | Self::UnexpectedBreakByte { offset }
            | Self::ExpectedBreakByte { offset }
            | Self::IndefiniteStringChunkTypeMismatch { offset, .. }
            | Self::TagNotFollowedByValue { offset }
            | Self::MapKeyMissingValue { offset }
            | Self::DefiniteLengthExceedsBuffer { offset, .. }
            | Self::InvalidUtf8 { offset, .. }
            | Self::NotASimpleValueEncoding { offset }
            | Self::NotABooleanEncoding { offset }
            | Self::NotANullEncoding { offset }
            | Self::NotAnUndefinedEncoding { offset }
            | Self::NotAFloatEncoding { offset }
            | Self::NotInContainer { offset, .. }
            | Self::DepthLimitExceeded { offset, .. }
            | Self::TrailingData { offset } => *offset,
        }
    }
}
