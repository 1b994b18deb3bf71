//! Error types for graphbind-core.
//!
//! Decoding and encoding failures are recoverable and returned as values. A typed accessor that
//! finds a value of the wrong kind in the store is not: that is a schema mismatch and panics
//! (see the `# Panics` sections on [`crate::Record`]).

use graphbind_store::StoreError;
use thiserror::Error;

/// Failures while reading a payload into records.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DecodeError {
    /// The payload is not well-formed.
    #[error("malformed payload: {message}")]
    Syntax { message: String },

    /// The reader found a different wire type than the field requires.
    #[error("expected {expected}, found {found}")]
    WrongType {
        expected: &'static str,
        found: &'static str,
    },

    /// A number does not fit the declared numeric kind.
    #[error("{value} is out of range for {kind}")]
    OutOfRange { kind: &'static str, value: String },

    /// A string could not be parsed as the declared kind.
    #[error("invalid {kind} `{value}`: {message}")]
    InvalidFormat {
        kind: &'static str,
        value: String,
        message: String,
    },

    /// Wraps an error with the property (or collection index) it occurred in.
    #[error("in `{name}`: {source}")]
    Field {
        name: String,
        #[source]
        source: Box<DecodeError>,
    },
}

impl DecodeError {
    /// Attach a property name or collection index to this error.
    pub fn in_field(self, name: impl Into<String>) -> Self {
        DecodeError::Field {
            name: name.into(),
            source: Box::new(self),
        }
    }

    /// Dotted path of the property the innermost error occurred in, empty at the root.
    pub fn path(&self) -> String {
        let mut segments = Vec::new();
        let mut current = self;
        while let DecodeError::Field { name, source } = current {
            segments.push(name.as_str());
            current = source;
        }
        segments.join(".")
    }

    /// The innermost error with field context stripped.
    pub fn root_cause(&self) -> &DecodeError {
        let mut current = self;
        while let DecodeError::Field { source, .. } = current {
            current = source;
        }
        current
    }
}

/// Failures while writing records out.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EncodeError {
    /// A stored value does not match its declared field kind. This indicates a defect in the
    /// code that populated the record, not bad input.
    #[error("field `{field}` is declared as {expected} but holds {found}")]
    SchemaMismatch {
        field: String,
        expected: &'static str,
        found: &'static str,
    },

    /// The wire format cannot represent NaN or infinities.
    #[error("cannot encode non-finite number {value}")]
    NonFiniteNumber { value: f64 },

    /// A value was written inside an object without a property name.
    #[error("object member written without a property name")]
    MissingKey,

    /// Start/end calls on the writer did not pair up.
    #[error("unbalanced writer frames: {message}")]
    UnbalancedFrames { message: String },
}

/// Failures from record mutation helpers.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RecordError {
    /// The additional-data handle only manages undeclared properties.
    #[error("`{name}` is a declared property of {schema}")]
    DeclaredProperty { name: String, schema: &'static str },

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Result type alias using DecodeError.
pub type DecodeResult<T> = Result<T, DecodeError>;

/// Result type alias using EncodeError.
pub type EncodeResult<T> = Result<T, EncodeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_context_builds_dotted_path() {
        let err = DecodeError::WrongType {
            expected: "string",
            found: "number",
        }
        .in_field("registrar")
        .in_field("3")
        .in_field("hostPairs");

        assert_eq!(err.path(), "hostPairs.3.registrar");
        assert_eq!(
            err.root_cause(),
            &DecodeError::WrongType {
                expected: "string",
                found: "number"
            }
        );
    }

    #[test]
    fn root_error_has_empty_path() {
        let err = DecodeError::Syntax {
            message: "eof".into(),
        };
        assert_eq!(err.path(), "");
        assert_eq!(err.to_string(), "malformed payload: eof");
    }

    #[test]
    fn store_error_converts_into_record_error() {
        let err = RecordError::from(StoreError::UnknownSubscriber {
            id: "audit".to_string(),
        });
        assert_eq!(err.to_string(), "no subscriber registered under `audit`");
    }
}
