//! Attribute data values
//!
//! [`Data`] is the closed set of value shapes a RADIUS attribute can carry.
//! Every variant knows its own wire length and serialization; decoding needs
//! the declared [`DataType`] because the wire bytes alone are ambiguous.

mod codec;
mod container;
mod filter;
mod prefix;
mod tlv;

pub use codec::DataType;
pub use container::{ConcatData, EvsData, ExtendedData, LongExtendedData, VsaData};
pub use filter::DataFilter;
pub use prefix::{Ipv4Prefix, Ipv6Prefix};
pub use tlv::{Tlv, TlvData};

use crate::attributes::AttributeError;
use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};

/// RFC 2868 tag, grouping attributes that describe the same tunnel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Tag(u8);

impl Tag {
    /// Largest valid tag (0x1F)
    pub const MAX: u8 = 0x1F;

    pub fn new(value: u8) -> Result<Self, AttributeError> {
        if value > Self::MAX {
            return Err(AttributeError::InvalidTag(value));
        }
        Ok(Tag(value))
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

/// Value preceded by a mandatory tag octet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tagged<T> {
    tag: Tag,
    value: T,
}

impl<T> Tagged<T> {
    pub fn tag(&self) -> Tag {
        self.tag
    }

    pub fn value(&self) -> &T {
        &self.value
    }
}

impl Tagged<Vec<u8>> {
    pub fn string(tag: Tag, value: Vec<u8>) -> Self {
        Tagged { tag, value }
    }
}

impl Tagged<String> {
    pub fn text(tag: Tag, value: impl Into<String>) -> Self {
        Tagged {
            tag,
            value: value.into(),
        }
    }
}

impl Tagged<u32> {
    /// Largest value a tagged integer can carry (three octets follow the tag)
    pub const MAX_INTEGER: u32 = 0x00FF_FFFF;

    pub fn integer(tag: Tag, value: u32) -> Result<Self, AttributeError> {
        if value > Self::MAX_INTEGER {
            return Err(AttributeError::TaggedIntegerOutOfRange(value));
        }
        Ok(Tagged { tag, value })
    }
}

/// Value with an optional tag octet.
///
/// On the wire a first octet in `0x00..=0x1F` is a tag; anything larger is
/// already part of the value. An untagged value therefore may not start with
/// an octet in the tag range, otherwise it would decode differently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionalTagged<T> {
    tag: Option<Tag>,
    value: T,
}

impl<T: AsRef<[u8]>> OptionalTagged<T> {
    fn checked(tag: Option<Tag>, value: T) -> Result<Self, AttributeError> {
        if tag.is_none() {
            if let Some(&first) = value.as_ref().first() {
                if first <= Tag::MAX {
                    return Err(AttributeError::AmbiguousTag(first));
                }
            }
        }
        Ok(OptionalTagged { tag, value })
    }

    pub fn tag(&self) -> Option<Tag> {
        self.tag
    }

    pub fn value(&self) -> &T {
        &self.value
    }
}

impl OptionalTagged<Vec<u8>> {
    pub fn string(tag: Option<Tag>, value: Vec<u8>) -> Result<Self, AttributeError> {
        Self::checked(tag, value)
    }
}

impl OptionalTagged<String> {
    pub fn text(tag: Option<Tag>, value: impl Into<String>) -> Result<Self, AttributeError> {
        Self::checked(tag, value.into())
    }
}

/// Attribute value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Data {
    /// 32-bit unsigned integer
    Integer(u32),
    /// 64-bit unsigned integer (RFC 6929)
    Integer64(u64),
    /// 32-bit enumerated value, named through the dictionary
    Enum(u32),
    /// Seconds since the Unix epoch
    Time(u32),
    Ipv4Addr(Ipv4Addr),
    Ipv6Addr(Ipv6Addr),
    Ipv4Prefix(Ipv4Prefix),
    Ipv6Prefix(Ipv6Prefix),
    /// Opaque octets
    String(Vec<u8>),
    /// UTF-8 text
    Text(String),
    /// IPv6 interface identifier (RFC 3162)
    Ifid([u8; 8]),
    OptionalTaggedString(OptionalTagged<Vec<u8>>),
    OptionalTaggedText(OptionalTagged<String>),
    TaggedString(Tagged<Vec<u8>>),
    TaggedText(Tagged<String>),
    TaggedInteger(Tagged<u32>),
    Extended(ExtendedData),
    LongExtended(LongExtendedData),
    Vsa(VsaData),
    Evs(EvsData),
    Concat(ConcatData),
    Tlv(TlvData),
}

impl Data {
    /// The declared type this value encodes as
    pub fn data_type(&self) -> DataType {
        match self {
            Data::Integer(_) => DataType::Integer,
            Data::Integer64(_) => DataType::Integer64,
            Data::Enum(_) => DataType::Enum,
            Data::Time(_) => DataType::Time,
            Data::Ipv4Addr(_) => DataType::Ipv4Addr,
            Data::Ipv6Addr(_) => DataType::Ipv6Addr,
            Data::Ipv4Prefix(_) => DataType::Ipv4Prefix,
            Data::Ipv6Prefix(_) => DataType::Ipv6Prefix,
            Data::String(_) => DataType::String,
            Data::Text(_) => DataType::Text,
            Data::Ifid(_) => DataType::Ifid,
            Data::OptionalTaggedString(_) => DataType::OptionalTaggedString,
            Data::OptionalTaggedText(_) => DataType::OptionalTaggedText,
            Data::TaggedString(_) => DataType::TaggedString,
            Data::TaggedText(_) => DataType::TaggedText,
            Data::TaggedInteger(_) => DataType::TaggedInteger,
            Data::Extended(_) => DataType::Extended,
            Data::LongExtended(_) => DataType::LongExtended,
            Data::Vsa(_) => DataType::Vsa,
            Data::Evs(_) => DataType::Evs,
            Data::Concat(_) => DataType::Concat,
            Data::Tlv(_) => DataType::Tlv,
        }
    }

    /// Number of octets `write_to` produces
    pub fn encoded_len(&self) -> usize {
        match self {
            Data::Integer(_) | Data::Enum(_) | Data::Time(_) | Data::Ipv4Addr(_) => 4,
            Data::Integer64(_) | Data::Ifid(_) => 8,
            Data::Ipv6Addr(_) => 16,
            Data::Ipv4Prefix(_) => Ipv4Prefix::ENCODED_LEN,
            Data::Ipv6Prefix(prefix) => prefix.encoded_len(),
            Data::String(bytes) => bytes.len(),
            Data::Text(text) => text.len(),
            Data::OptionalTaggedString(v) => self.tag_len() + v.value.len(),
            Data::OptionalTaggedText(v) => self.tag_len() + v.value.len(),
            Data::TaggedString(v) => self.tag_len() + v.value.len(),
            Data::TaggedText(v) => self.tag_len() + v.value.len(),
            Data::TaggedInteger(_) => 4,
            Data::Extended(ext) => ext.encoded_len(),
            Data::LongExtended(ext) => ext.encoded_len(),
            Data::Vsa(vsa) => vsa.encoded_len(),
            Data::Evs(evs) => evs.encoded_len(),
            Data::Concat(concat) => concat.len(),
            Data::Tlv(tlv) => tlv.encoded_len(),
        }
    }

    /// Number of tag octets leading the encoded value
    pub(crate) fn tag_len(&self) -> usize {
        match self {
            Data::OptionalTaggedString(v) => usize::from(v.tag.is_some()),
            Data::OptionalTaggedText(v) => usize::from(v.tag.is_some()),
            Data::TaggedString(_) | Data::TaggedText(_) | Data::TaggedInteger(_) => 1,
            _ => 0,
        }
    }

    /// Append the wire form of this value to `buf`
    pub fn write_to(&self, buf: &mut Vec<u8>) {
        match self {
            Data::Integer(v) | Data::Enum(v) | Data::Time(v) => {
                buf.extend_from_slice(&v.to_be_bytes())
            }
            Data::Integer64(v) => buf.extend_from_slice(&v.to_be_bytes()),
            Data::Ipv4Addr(addr) => buf.extend_from_slice(&addr.octets()),
            Data::Ipv6Addr(addr) => buf.extend_from_slice(&addr.octets()),
            Data::Ipv4Prefix(prefix) => prefix.write_to(buf),
            Data::Ipv6Prefix(prefix) => prefix.write_to(buf),
            Data::String(bytes) => buf.extend_from_slice(bytes),
            Data::Text(text) => buf.extend_from_slice(text.as_bytes()),
            Data::Ifid(ifid) => buf.extend_from_slice(ifid),
            Data::OptionalTaggedString(v) => {
                if let Some(tag) = v.tag {
                    buf.push(tag.value());
                }
                buf.extend_from_slice(&v.value);
            }
            Data::OptionalTaggedText(v) => {
                if let Some(tag) = v.tag {
                    buf.push(tag.value());
                }
                buf.extend_from_slice(v.value.as_bytes());
            }
            Data::TaggedString(v) => {
                buf.push(v.tag.value());
                buf.extend_from_slice(&v.value);
            }
            Data::TaggedText(v) => {
                buf.push(v.tag.value());
                buf.extend_from_slice(v.value.as_bytes());
            }
            Data::TaggedInteger(v) => {
                buf.push(v.tag.value());
                buf.extend_from_slice(&v.value.to_be_bytes()[1..]);
            }
            Data::Extended(ext) => ext.write_to(buf),
            Data::LongExtended(ext) => ext.write_to(buf),
            Data::Vsa(vsa) => vsa.write_to(buf),
            Data::Evs(evs) => evs.write_to(buf),
            Data::Concat(concat) => buf.extend_from_slice(&concat.value()),
            Data::Tlv(tlv) => tlv.write_to(buf),
        }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.encoded_len());
        self.write_to(&mut buf);
        buf
    }

    /// Type segments a container appends to its attribute's path to address
    /// the attribute it encloses. `None` for non-container values.
    pub fn nested_segments(&self) -> Option<Vec<u32>> {
        match self {
            Data::Extended(ext) => Some(vec![u32::from(ext.ext_type())]),
            Data::LongExtended(ext) => Some(vec![u32::from(ext.ext_type())]),
            Data::Vsa(vsa) => Some(vec![vsa.vendor_id(), u32::from(vsa.vendor_type())]),
            Data::Evs(evs) => Some(vec![evs.vendor_id(), u32::from(evs.vendor_type())]),
            _ => None,
        }
    }

    /// Still-encoded payload of a container value
    pub fn container_value(&self) -> Option<&[u8]> {
        match self {
            Data::Extended(ext) => Some(ext.value()),
            Data::LongExtended(ext) => Some(ext.value()),
            Data::Vsa(vsa) => Some(vsa.value()),
            Data::Evs(evs) => Some(evs.value()),
            _ => None,
        }
    }

    pub fn is_container(&self) -> bool {
        self.data_type().is_container()
    }

    pub fn as_u32(&self) -> Option<u32> {
        match self {
            Data::Integer(v) | Data::Enum(v) | Data::Time(v) => Some(*v),
            Data::TaggedInteger(v) => Some(v.value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Data::Text(text) => Some(text),
            Data::OptionalTaggedText(v) => Some(&v.value),
            Data::TaggedText(v) => Some(&v.value),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Data::String(bytes) => Some(bytes),
            Data::OptionalTaggedString(v) => Some(&v.value),
            Data::TaggedString(v) => Some(&v.value),
            _ => None,
        }
    }
}

fn write_hex(f: &mut fmt::Formatter<'_>, bytes: &[u8]) -> fmt::Result {
    write!(f, "0x{}", hex::encode(bytes))
}

fn write_tag(f: &mut fmt::Formatter<'_>, tag: Option<Tag>) -> fmt::Result {
    match tag {
        Some(tag) => write!(f, ":{} ", tag.value()),
        None => Ok(()),
    }
}

impl fmt::Display for Data {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Data::Integer(v) | Data::Enum(v) | Data::Time(v) => write!(f, "{}", v),
            Data::Integer64(v) => write!(f, "{}", v),
            Data::Ipv4Addr(addr) => write!(f, "{}", addr),
            Data::Ipv6Addr(addr) => write!(f, "{}", addr),
            Data::Ipv4Prefix(prefix) => write!(f, "{}", prefix),
            Data::Ipv6Prefix(prefix) => write!(f, "{}", prefix),
            Data::String(bytes) => write_hex(f, bytes),
            Data::Text(text) => write!(f, "{:?}", text),
            Data::Ifid(ifid) => write_hex(f, ifid),
            Data::OptionalTaggedString(v) => {
                write_tag(f, v.tag)?;
                write_hex(f, &v.value)
            }
            Data::OptionalTaggedText(v) => {
                write_tag(f, v.tag)?;
                write!(f, "{:?}", v.value)
            }
            Data::TaggedString(v) => {
                write_tag(f, Some(v.tag))?;
                write_hex(f, &v.value)
            }
            Data::TaggedText(v) => {
                write_tag(f, Some(v.tag))?;
                write!(f, "{:?}", v.value)
            }
            Data::TaggedInteger(v) => {
                write_tag(f, Some(v.tag))?;
                write!(f, "{}", v.value)
            }
            Data::Extended(ext) => {
                write!(f, "extended {} ", ext.ext_type())?;
                write_hex(f, ext.value())
            }
            Data::LongExtended(ext) => {
                write!(f, "long-extended {} ", ext.ext_type())?;
                write_hex(f, ext.value())
            }
            Data::Vsa(vsa) => {
                write!(f, "vendor {} type {} ", vsa.vendor_id(), vsa.vendor_type())?;
                write_hex(f, vsa.value())
            }
            Data::Evs(evs) => {
                write!(f, "evs vendor {} type {} ", evs.vendor_id(), evs.vendor_type())?;
                write_hex(f, evs.value())
            }
            Data::Concat(concat) => write_hex(f, &concat.value()),
            Data::Tlv(tlv) => write!(f, "{}", tlv),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_range() {
        assert!(Tag::new(0).is_ok());
        assert!(Tag::new(31).is_ok());
        assert_eq!(Tag::new(32), Err(AttributeError::InvalidTag(32)));
    }

    #[test]
    fn test_optional_tag_ambiguity_rejected() {
        // Untagged value starting with 0x05 would decode as tag 5
        assert!(OptionalTagged::string(None, vec![0x05, 0x41]).is_err());
        assert!(OptionalTagged::string(Some(Tag::new(5).unwrap()), vec![0x05, 0x41]).is_ok());
        assert!(OptionalTagged::text(None, "vpn.example.com").is_ok());
        assert!(OptionalTagged::text(None, "").is_ok());
    }

    #[test]
    fn test_tagged_integer_range() {
        let tag = Tag::new(1).unwrap();
        assert!(Tagged::integer(tag, 0x00FF_FFFF).is_ok());
        assert!(Tagged::integer(tag, 0x0100_0000).is_err());
    }

    #[test]
    fn test_encoded_len_matches_bytes() {
        let tag = Tag::new(3).unwrap();
        let values = vec![
            Data::Integer(7),
            Data::Integer64(1 << 40),
            Data::Ipv6Addr(Ipv6Addr::LOCALHOST),
            Data::Text("nemo".to_string()),
            Data::TaggedInteger(Tagged::integer(tag, 13).unwrap()),
            Data::OptionalTaggedText(OptionalTagged::text(Some(tag), "group").unwrap()),
            Data::OptionalTaggedText(OptionalTagged::text(None, "group").unwrap()),
            Data::Vsa(VsaData::new(9, 1, b"ip:addr".to_vec()).unwrap()),
            Data::Evs(EvsData::new(9, 1, b"ip:addr".to_vec()).unwrap()),
        ];
        for value in values {
            assert_eq!(value.to_bytes().len(), value.encoded_len(), "{:?}", value);
        }
    }

    #[test]
    fn test_tagged_integer_layout() {
        let data = Data::TaggedInteger(Tagged::integer(Tag::new(1).unwrap(), 3).unwrap());
        assert_eq!(data.to_bytes(), vec![0x01, 0x00, 0x00, 0x03]);
    }

    #[test]
    fn test_nested_segments() {
        let vsa = Data::Vsa(VsaData::new(311, 7, vec![1, 2]).unwrap());
        assert_eq!(vsa.nested_segments(), Some(vec![311, 7]));
        assert_eq!(vsa.container_value(), Some(&[1u8, 2][..]));
        assert_eq!(Data::Integer(1).nested_segments(), None);
        assert!(!Data::Text(String::new()).is_container());
    }
}
