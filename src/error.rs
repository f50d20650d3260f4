//! Error types for decoding, validating and writing map documents.

use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// The JSON kind a field was expected to hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Object,
    Array,
    Number,
    String,
    Bool,
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FieldKind::Object => "object",
            FieldKind::Array => "array",
            FieldKind::Number => "number",
            FieldKind::String => "string",
            FieldKind::Bool => "boolean",
        };
        f.write_str(s)
    }
}

/// Which namespace a duplicated name was declared in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefinitionKind {
    BasicType,
    Enum,
    ObjectStructure,
    /// A property declared twice inside one structure.
    Property,
}

impl fmt::Display for DefinitionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DefinitionKind::BasicType => "basic type",
            DefinitionKind::Enum => "enum",
            DefinitionKind::ObjectStructure => "object structure",
            DefinitionKind::Property => "property",
        };
        f.write_str(s)
    }
}

/// Everything that can go wrong while loading or saving a map document.
///
/// Decode errors abort the whole load; no partial document is ever returned.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("cannot read {}: {source}", .path.display())]
    IoRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot write {}: {source}", .path.display())]
    IoWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("document is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("missing field `{key}`")]
    MissingField { key: String },

    #[error("field `{key}` must be a {expected}")]
    WrongFieldType { key: String, expected: FieldKind },

    #[error("structure `{structure}` property `{property}` has unknown type `{type_name}`")]
    UnknownPropertyType {
        structure: String,
        property: String,
        type_name: String,
    },

    #[error("unknown object structure `{name}`")]
    UnknownObjectStructure { name: String },

    #[error("{kind} `{name}` is defined more than once")]
    DuplicateDefinition { kind: DefinitionKind, name: String },

    #[error("`{key}` = {value} is outside {type_name} range [{min}, {max}]")]
    ValueOutOfRange {
        key: String,
        type_name: String,
        value: i64,
        min: i64,
        max: i64,
    },

    #[error("`{key}` = {value:?} is not a member of enum {type_name}")]
    UnknownEnumMember {
        key: String,
        type_name: String,
        value: String,
    },
}

impl DocumentError {
    pub(crate) fn missing(key: impl Into<String>) -> Self {
        DocumentError::MissingField { key: key.into() }
    }

    pub(crate) fn wrong_type(key: impl Into<String>, expected: FieldKind) -> Self {
        DocumentError::WrongFieldType {
            key: key.into(),
            expected,
        }
    }
}

pub type Result<T, E = DocumentError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_carry_the_offending_key() {
        let err = DocumentError::wrong_type("map.cameras[0].x", FieldKind::Number);
        assert_eq!(err.to_string(), "field `map.cameras[0].x` must be a number");

        let err = DocumentError::DuplicateDefinition {
            kind: DefinitionKind::ObjectStructure,
            name: "Mudokon".into(),
        };
        assert_eq!(
            err.to_string(),
            "object structure `Mudokon` is defined more than once"
        );
    }

    #[test]
    fn malformed_wraps_serde_error() {
        let err: DocumentError = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert!(matches!(err, DocumentError::Malformed(_)));
    }
}
