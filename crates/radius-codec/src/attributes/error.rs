use crate::attributes::AttributeType;
use crate::data::DataType;
use thiserror::Error;

/// Precondition violations raised while constructing or encoding attribute values.
///
/// These are distinct from decode misses: a malformed value on the wire never
/// produces an `AttributeError`, the attribute simply stays in raw form.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AttributeError {
    #[error("Value too long: {len} bytes (max {max})")]
    ValueTooLong { len: usize, max: usize },
    #[error("Invalid tag: {0} (must be 0-31)")]
    InvalidTag(u8),
    #[error("Untagged value must not start with an octet in the tag range, got 0x{0:02x}")]
    AmbiguousTag(u8),
    #[error("Tagged integer out of range: {0} (max 0xffffff)")]
    TaggedIntegerOutOfRange(u32),
    #[error("Invalid vendor id: {0} (high-order octet must be zero)")]
    InvalidVendorId(u32),
    #[error("Invalid prefix length: {len} (max {max})")]
    InvalidPrefixLength { len: u8, max: u8 },
    #[error("Address has bits set outside the /{0} prefix")]
    UnmaskedPrefix(u8),
    #[error("Invalid TLV length: {0}")]
    InvalidTlvLength(usize),
    #[error("Concatenated value needs at least one fragment")]
    NoFragments,
    #[error("Invalid attribute type: {0}")]
    InvalidType(String),
    #[error("Data type mismatch: expected {expected:?}, got {actual:?}")]
    TypeMismatch { expected: DataType, actual: DataType },
    #[error("Attribute {attr_type} cannot be built as a {kind} attribute")]
    KindMismatch {
        attr_type: AttributeType,
        kind: &'static str,
    },
    #[error("Password too long: {len} bytes (max {max})")]
    PasswordTooLong { len: usize, max: usize },
    #[error("No container of type {data_type:?} can be nested in {parent}")]
    UnsupportedParent {
        parent: AttributeType,
        data_type: DataType,
    },
}
