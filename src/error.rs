//! Typed failures for every stage of the pipeline (§7 ERROR HANDLING DESIGN).
//!
//! Each enum below is one of §7's four failure kinds. They never overlap:
//! a resolver failure can't also be a decode failure. `EncodeError::BufferTooSmall`
//! is split out from the rest of `EncodeError` so the growing-buffer wrapper in
//! [`crate::dispatch`] can match on it directly instead of string-matching (§4.6, §9).

use thiserror::Error;

/// Raised while lowering an ABI view into IR (§4.2).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("unknown type name `{0}`")]
    UnknownType(String),
    #[error("cyclic alias chain involving `{0}`")]
    CyclicAlias(String),
    #[error("cyclic inheritance involving `{0}`")]
    CyclicInheritance(String),
    #[error("base `{base}` of struct `{of}` is not a struct")]
    BaseNotAStruct { of: String, base: String },
    #[error("malformed type expression `{0}`")]
    MalformedTypeExpression(String),
    #[error("variant `{0}` declares zero cases")]
    EmptyVariant(String),
    #[error("unresolved case in variant `{0}`: {1}")]
    UnresolvedVariantCase(String, String),
    #[error(
        "field `{field}` of struct `{of}` carries `extension` but is followed by a non-extension field"
    )]
    ExtensionNotTrailing { of: String, field: String },
    #[error("duplicate field name `{field}` in struct `{of}`")]
    DuplicateField { of: String, field: String },
    #[error("name `{0}` is declared more than once")]
    DuplicateName(String),
}

/// Raised while packing a value (§4.3, §4.4, §4.6).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodeError {
    #[error("missing required field `{0}`")]
    MissingField(String),
    #[error("value out of range for a {width}-bit {signed} integer")]
    IntegerOutOfRange { width: u8, signed: &'static str },
    #[error("expected a {expected} value for this field, got something else")]
    WrongHostType { expected: &'static str },
    #[error("no variant case matches the given value")]
    UnknownVariant,
    #[error("output buffer too small")]
    BufferTooSmall,
}

/// Raised while unpacking a buffer (§4.3, §4.4, §4.1).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("buffer truncated: need {needed} more byte(s), {available} available")]
    Truncated { needed: usize, available: usize },
    #[error("invalid UTF-8 in string field")]
    InvalidUtf8,
    #[error("variant discriminator {0} is out of range")]
    UnknownVariantIndex(u32),
    #[error("LEB128 varint overflowed 64 bits")]
    VarintOverflow,
    #[error("LEB128 varint is longer than the widest allowed encoding")]
    VarintTooLong,
}

/// Raised at the `pack`/`unpack` dispatch boundary (§4.5).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    #[error("unknown type `{0}`")]
    UnknownType(String),
    #[error("exceeded maximum resize attempts ({0}) while growing the output buffer")]
    ExceededMaxResizeAttempts(u32),
}

/// The union of every failure this crate can report to a host.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error(transparent)]
    Schema(#[from] SchemaError),
    #[error(transparent)]
    Encode(#[from] EncodeError),
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}
