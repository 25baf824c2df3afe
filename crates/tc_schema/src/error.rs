use thiserror::Error;

// -----------------------------------------------------------------------------
// SchemaError

/// A failure while turning a type declaration into a [`Schema`](crate::Schema).
///
/// All of these are construction-time errors: they describe a malformed type
/// or annotation, never a malformed input document.
#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum SchemaError {
    #[error("type `{0}` cannot be described by a schema")]
    UnsupportedType(String),

    #[error("attribute `{name}` expects {expected}, found {actual} `{value}`")]
    InvalidAttributeType {
        name: String,
        expected: &'static str,
        actual: &'static str,
        value: String,
    },

    #[error("`{0}` is not a known case convention")]
    InvalidCaseName(String),

    #[error("unknown attribute `{name}` on {target}")]
    UnknownAttribute { name: String, target: &'static str },

    #[error("field `{field}` of `{ty}` is never deserialized but has no default")]
    MissingDefault { ty: String, field: String },

    #[error("`{ty}` uses the wire name `{name}` more than once")]
    DuplicateName { ty: String, name: String },

    #[error("variants of `{ty}` share the discriminant {value}")]
    DuplicateDiscriminant { ty: String, value: String },

    #[error("field `{field}` of `{ty}` cannot be flattened: {reason}")]
    InvalidFlatten {
        ty: String,
        field: String,
        reason: &'static str,
    },

    #[error("`{ty}` combines `{first}` with `{second}`")]
    ConflictingAttributes {
        ty: String,
        first: &'static str,
        second: &'static str,
    },

    #[error("`{0}` has no zero value")]
    NoZeroValue(String),
}
