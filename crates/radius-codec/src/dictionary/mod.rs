//! Attribute and packet definitions consumed by the codec.
//!
//! The codec never parses dictionary files itself. It reads definitions
//! through the [`Dictionary`] trait; [`MemoryDictionary`] is the bundled
//! implementation, populated programmatically, from the built-in standard
//! set, or from a JSON document.

mod memory;
mod standard;

pub use memory::MemoryDictionary;

use crate::attributes::{
    Attribute, AttributeError, AttributeType, ConcatAttribute, ExtendedAttribute,
    LongExtendedAttribute, StandardAttribute, VendorSpecificAttribute,
};
use crate::codec::{AttributeCodec, CodecContext};
use crate::data::{Data, DataFilter, DataType, Tag};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Read-only registry of attribute, TLV and packet definitions.
pub trait Dictionary: Send + Sync {
    fn attribute_definition_by_type(
        &self,
        attr_type: &AttributeType,
    ) -> Option<&AttributeDefinition>;

    fn attribute_definition_by_name(&self, name: &str) -> Option<&AttributeDefinition>;

    fn tlv_definition(&self, attr_type: &AttributeType) -> Option<&TlvDefinition>;

    /// Numeric value of a named enumeration constant
    fn numeric_value(&self, attr_type: &AttributeType, name: &str) -> Option<i32>;

    fn packet_definition(&self, code: u8) -> Option<&PacketDefinition>;

    /// Name of an enumeration constant, for display
    fn value_name(&self, _attr_type: &AttributeType, _value: i32) -> Option<&str> {
        None
    }
}

/// Definition of an attribute: where it lives, how its value is encoded and
/// which attribute kind it decodes to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeDefinition {
    pub attr_type: AttributeType,
    pub name: String,
    pub data_type: DataType,
    pub codec: AttributeCodec,
    pub filter: Option<DataFilter>,
}

impl AttributeDefinition {
    /// Build the attribute kind this definition describes around `data`.
    pub fn make_attribute(&self, data: Data) -> Result<Attribute, AttributeError> {
        if data.data_type() != self.data_type {
            return Err(AttributeError::TypeMismatch {
                expected: self.data_type,
                actual: data.data_type(),
            });
        }

        let head = self.attr_type.head();
        let depth = self.attr_type.depth();
        let kind_mismatch = |kind: &'static str| AttributeError::KindMismatch {
            attr_type: self.attr_type.clone(),
            kind,
        };

        let attribute = match self.codec {
            AttributeCodec::Standard | AttributeCodec::Fragmented => {
                if depth != 1 {
                    return Err(kind_mismatch("standard"));
                }
                Attribute::Standard(StandardAttribute::new(head, data)?)
            }
            AttributeCodec::Concat => {
                let Data::Concat(concat) = data else {
                    return Err(kind_mismatch("concat"));
                };
                if depth != 1 {
                    return Err(kind_mismatch("concat"));
                }
                Attribute::Concat(ConcatAttribute::new(head, concat))
            }
            AttributeCodec::Extended => {
                if depth != 2 {
                    return Err(kind_mismatch("extended"));
                }
                let ext_type = self.last_octet()?;
                Attribute::Extended(ExtendedAttribute::new(head, ext_type, data)?)
            }
            AttributeCodec::LongExtended => {
                if depth != 2 {
                    return Err(kind_mismatch("long-extended"));
                }
                let ext_type = self.last_octet()?;
                Attribute::LongExtended(LongExtendedAttribute::new(head, ext_type, data))
            }
            AttributeCodec::VendorSpecific => {
                let parent = self
                    .attr_type
                    .ancestor(2)
                    .ok_or_else(|| kind_mismatch("vendor-specific"))?;
                let vendor_id = self.attr_type.segments()[depth - 2];
                let vendor_type = self.last_octet()?;
                Attribute::VendorSpecific(VendorSpecificAttribute::new(
                    parent,
                    vendor_id,
                    vendor_type,
                    data,
                )?)
            }
        };
        Ok(attribute)
    }

    /// Last path segment as an octet (extended or vendor type)
    pub(crate) fn last_octet(&self) -> Result<u8, AttributeError> {
        u8::try_from(self.attr_type.last())
            .map_err(|_| AttributeError::InvalidType(self.attr_type.to_string()))
    }

    /// Octets left in clear ahead of the filtered part of the value
    fn clear_prefix_len(&self, bytes: &[u8]) -> usize {
        match self.data_type {
            DataType::TaggedString | DataType::TaggedText | DataType::TaggedInteger => 1,
            DataType::OptionalTaggedString | DataType::OptionalTaggedText => {
                usize::from(bytes.first().is_some_and(|&b| b <= Tag::MAX))
            }
            _ => 0,
        }
    }

    /// Decode a wire value, removing the filter first if the definition has one.
    pub fn decode_data(
        &self,
        ctx: &CodecContext<'_>,
        dict: &dyn Dictionary,
        bytes: &[u8],
    ) -> Option<Data> {
        let Some(filter) = self.filter else {
            return self.data_type.decode(dict, &self.attr_type, bytes);
        };
        let (clear, cipher) = bytes.split_at(self.clear_prefix_len(bytes));
        let mut plain = clear.to_vec();
        plain.extend(filter.decode(ctx, cipher)?);
        self.data_type.decode(dict, &self.attr_type, &plain)
    }

    /// Encode a value, applying the definition's filter after the tag octet.
    pub fn encode_data(
        &self,
        ctx: &CodecContext<'_>,
        data: &Data,
    ) -> Result<Vec<u8>, AttributeError> {
        let bytes = self.data_type.encode(data)?;
        let Some(filter) = self.filter else {
            return Ok(bytes);
        };
        let (clear, plain) = bytes.split_at(data.tag_len());
        let mut out = clear.to_vec();
        out.extend(filter.encode(ctx, plain)?);
        Ok(out)
    }
}

/// Definition of a record nested in a TLV payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlvDefinition {
    pub attr_type: AttributeType,
    pub name: String,
    pub data_type: DataType,
}

/// How the authenticator field of a packet is produced and checked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AuthenticatorKind {
    /// Random request authenticator (Access-Request, Status-Server)
    Random,
    /// `MD5(packet with zeroed authenticator ‖ secret)` (RFC 2866 §3, RFC 5176 §2.3)
    Hashed,
    /// Response authenticator keyed by the request authenticator
    Response,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PacketDefinition {
    pub code: u8,
    pub name: String,
    pub authenticator: AuthenticatorKind,
}

#[derive(Error, Debug)]
pub enum DictionaryError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Duplicate attribute type: {0}")]
    DuplicateType(AttributeType),
    #[error("Duplicate attribute name: {0}")]
    DuplicateName(String),
    #[error("Duplicate packet code: {0}")]
    DuplicateCode(u8),
    #[error("Unknown attribute: {0}")]
    UnknownAttribute(String),
    #[error("Attribute {0} has no enclosing container definition")]
    MissingParent(AttributeType),
    #[error("Invalid definition for {attr_type}: {reason}")]
    InvalidDefinition {
        attr_type: AttributeType,
        reason: String,
    },
    #[error(transparent)]
    Attribute(#[from] AttributeError),
}
