use super::{AttributeError, AttributeType};
use crate::data::{ConcatData, Data, VsaData};
use crate::packet::PacketError;
use std::fmt;
use std::io::{Cursor, Read};

/// Attribute record exactly as seen on the wire (RFC 2865 Section 5)
///
/// ```text
///  0                   1                   2
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |     Type      |    Length     |  Value ...
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
///
/// Attributes that have no dictionary entry, or whose value did not decode,
/// stay in this form.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RawAttribute {
    attr_type: u8,
    value: Vec<u8>,
}

impl RawAttribute {
    /// Type and length octets
    pub const HEADER_LEN: usize = 2;
    pub const MAX_LENGTH: usize = 255;
    pub const MAX_VALUE_LEN: usize = 253;

    pub fn new(attr_type: u8, value: Vec<u8>) -> Result<Self, AttributeError> {
        if value.len() > Self::MAX_VALUE_LEN {
            return Err(AttributeError::ValueTooLong {
                len: value.len(),
                max: Self::MAX_VALUE_LEN,
            });
        }
        Ok(RawAttribute { attr_type, value })
    }

    pub fn attr_type(&self) -> u8 {
        self.attr_type
    }

    pub fn value(&self) -> &[u8] {
        &self.value
    }

    pub fn into_value(self) -> Vec<u8> {
        self.value
    }

    pub fn encoded_len(&self) -> usize {
        Self::HEADER_LEN + self.value.len()
    }

    pub fn write_to(&self, buf: &mut Vec<u8>) {
        buf.push(self.attr_type);
        buf.push(self.encoded_len() as u8);
        buf.extend_from_slice(&self.value);
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.encoded_len());
        self.write_to(&mut buf);
        buf
    }

    /// Decode the record starting at `offset`.
    ///
    /// The length octet must be at least 2 and the record must fit in `data`.
    pub fn decode_at(data: &[u8], offset: usize) -> Result<Self, PacketError> {
        let malformed = |reason: String| PacketError::MalformedAttribute { offset, reason };

        let remaining = data.len().saturating_sub(offset);
        if remaining < Self::HEADER_LEN {
            return Err(malformed(format!(
                "{} bytes left, need at least {}",
                remaining,
                Self::HEADER_LEN
            )));
        }

        let mut cursor = Cursor::new(data);
        cursor.set_position(offset as u64);

        let mut header = [0u8; 2];
        cursor.read_exact(&mut header)?;
        let length = usize::from(header[1]);

        if length < Self::HEADER_LEN {
            return Err(malformed(format!("length {} below minimum", length)));
        }
        if length > remaining {
            return Err(malformed(format!(
                "length {} exceeds remaining {} bytes",
                length, remaining
            )));
        }

        let mut value = vec![0u8; length - Self::HEADER_LEN];
        cursor.read_exact(&mut value)?;

        Ok(RawAttribute {
            attr_type: header[0],
            value,
        })
    }
}

/// Top-level attribute with a decoded value.
///
/// Fragmented long extended attributes are held here in reassembled form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StandardAttribute {
    attr_type: u8,
    data: Data,
}

impl StandardAttribute {
    pub fn new(attr_type: u8, data: Data) -> Result<Self, AttributeError> {
        match &data {
            Data::Concat(_) => {
                return Err(AttributeError::KindMismatch {
                    attr_type: AttributeType::new(attr_type),
                    kind: "standard",
                });
            }
            Data::LongExtended(_) => {}
            _ if data.encoded_len() > RawAttribute::MAX_VALUE_LEN => {
                return Err(AttributeError::ValueTooLong {
                    len: data.encoded_len(),
                    max: RawAttribute::MAX_VALUE_LEN,
                });
            }
            _ => {}
        }
        Ok(StandardAttribute { attr_type, data })
    }

    pub fn attr_type(&self) -> u8 {
        self.attr_type
    }

    pub fn data(&self) -> &Data {
        &self.data
    }
}

/// Attribute carried in an Extended-Attribute container (RFC 6929 §2.1)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtendedAttribute {
    attr_type: u8,
    ext_type: u8,
    data: Data,
}

impl ExtendedAttribute {
    pub const MAX_VALUE_LEN: usize = 252;

    pub fn new(attr_type: u8, ext_type: u8, data: Data) -> Result<Self, AttributeError> {
        if data.encoded_len() > Self::MAX_VALUE_LEN {
            return Err(AttributeError::ValueTooLong {
                len: data.encoded_len(),
                max: Self::MAX_VALUE_LEN,
            });
        }
        Ok(ExtendedAttribute {
            attr_type,
            ext_type,
            data,
        })
    }

    pub fn attr_type(&self) -> u8 {
        self.attr_type
    }

    pub fn ext_type(&self) -> u8 {
        self.ext_type
    }

    pub fn data(&self) -> &Data {
        &self.data
    }
}

/// Attribute carried in a Long-Extended-Attribute container (RFC 6929 §2.2).
/// The value is unbounded; it is fragmented on the wire.
///
/// `truncated` mirrors the container's T flag: the sender cut the value
/// short.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LongExtendedAttribute {
    attr_type: u8,
    ext_type: u8,
    truncated: bool,
    data: Data,
}

impl LongExtendedAttribute {
    pub fn new(attr_type: u8, ext_type: u8, data: Data) -> Self {
        LongExtendedAttribute {
            attr_type,
            ext_type,
            truncated: false,
            data,
        }
    }

    pub fn with_truncated(mut self, truncated: bool) -> Self {
        self.truncated = truncated;
        self
    }

    pub fn truncated(&self) -> bool {
        self.truncated
    }

    pub fn attr_type(&self) -> u8 {
        self.attr_type
    }

    pub fn ext_type(&self) -> u8 {
        self.ext_type
    }

    pub fn data(&self) -> &Data {
        &self.data
    }
}

/// Attribute carried in a VSA (RFC 2865 §5.26) or EVS (RFC 6929 §2.4)
/// container. `parent` is the type of the container attribute itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VendorSpecificAttribute {
    parent: AttributeType,
    vendor_id: u32,
    vendor_type: u8,
    data: Data,
}

impl VendorSpecificAttribute {
    pub const MAX_VENDOR_ID: u32 = 0x00FF_FFFF;

    /// Inside a top-level VSA the value is limited by the VSA header. Nested
    /// parents (EVS) are bounded by their enclosing container on encode.
    pub fn new(
        parent: AttributeType,
        vendor_id: u32,
        vendor_type: u8,
        data: Data,
    ) -> Result<Self, AttributeError> {
        if vendor_id > Self::MAX_VENDOR_ID {
            return Err(AttributeError::InvalidVendorId(vendor_id));
        }
        if parent.is_top_level() && data.encoded_len() > VsaData::MAX_VALUE_LEN {
            return Err(AttributeError::ValueTooLong {
                len: data.encoded_len(),
                max: VsaData::MAX_VALUE_LEN,
            });
        }
        Ok(VendorSpecificAttribute {
            parent,
            vendor_id,
            vendor_type,
            data,
        })
    }

    pub fn parent(&self) -> &AttributeType {
        &self.parent
    }

    pub fn vendor_id(&self) -> u32 {
        self.vendor_id
    }

    pub fn vendor_type(&self) -> u8 {
        self.vendor_type
    }

    pub fn data(&self) -> &Data {
        &self.data
    }
}

/// Attribute whose value spans consecutive records of the same type
/// (e.g. EAP-Message, RFC 3579 §3.1).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConcatAttribute {
    attr_type: u8,
    data: Data,
}

impl ConcatAttribute {
    pub fn new(attr_type: u8, data: ConcatData) -> Self {
        ConcatAttribute {
            attr_type,
            data: Data::Concat(data),
        }
    }

    pub fn attr_type(&self) -> u8 {
        self.attr_type
    }

    pub fn data(&self) -> &Data {
        &self.data
    }
}

/// Any attribute, raw or decoded
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Attribute {
    Raw(RawAttribute),
    Standard(StandardAttribute),
    Extended(ExtendedAttribute),
    LongExtended(LongExtendedAttribute),
    VendorSpecific(VendorSpecificAttribute),
    Concat(ConcatAttribute),
}

impl Attribute {
    /// Raw attribute from a type octet and value
    pub fn raw(attr_type: u8, value: Vec<u8>) -> Result<Self, AttributeError> {
        Ok(Attribute::Raw(RawAttribute::new(attr_type, value)?))
    }

    /// Top-level attribute with a decoded value
    pub fn standard(attr_type: u8, data: Data) -> Result<Self, AttributeError> {
        Ok(Attribute::Standard(StandardAttribute::new(attr_type, data)?))
    }

    /// Full type path of this attribute
    pub fn attr_type(&self) -> AttributeType {
        match self {
            Attribute::Raw(attr) => AttributeType::new(attr.attr_type),
            Attribute::Standard(attr) => AttributeType::new(attr.attr_type),
            Attribute::Extended(attr) => {
                AttributeType::new(attr.attr_type).with(&[u32::from(attr.ext_type)])
            }
            Attribute::LongExtended(attr) => {
                AttributeType::new(attr.attr_type).with(&[u32::from(attr.ext_type)])
            }
            Attribute::VendorSpecific(attr) => attr
                .parent
                .with(&[attr.vendor_id, u32::from(attr.vendor_type)]),
            Attribute::Concat(attr) => AttributeType::new(attr.attr_type),
        }
    }

    /// Decoded value, `None` for raw attributes
    pub fn data(&self) -> Option<&Data> {
        match self {
            Attribute::Raw(_) => None,
            Attribute::Standard(attr) => Some(&attr.data),
            Attribute::Extended(attr) => Some(&attr.data),
            Attribute::LongExtended(attr) => Some(&attr.data),
            Attribute::VendorSpecific(attr) => Some(&attr.data),
            Attribute::Concat(attr) => Some(&attr.data),
        }
    }

    pub fn is_raw(&self) -> bool {
        matches!(self, Attribute::Raw(_))
    }

    pub fn as_raw(&self) -> Option<&RawAttribute> {
        match self {
            Attribute::Raw(raw) => Some(raw),
            _ => None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Attribute::Raw(_) => "raw",
            Attribute::Standard(_) => "standard",
            Attribute::Extended(_) => "extended",
            Attribute::LongExtended(_) => "long-extended",
            Attribute::VendorSpecific(_) => "vendor-specific",
            Attribute::Concat(_) => "concat",
        }
    }
}

impl From<RawAttribute> for Attribute {
    fn from(raw: RawAttribute) -> Self {
        Attribute::Raw(raw)
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.data() {
            Some(data) => write!(f, "{} = {}", self.attr_type(), data),
            None => {
                let value = self.as_raw().map(RawAttribute::value).unwrap_or_default();
                write!(f, "{} = raw 0x{}", self.attr_type(), hex::encode(value))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::LongExtendedData;

    #[test]
    fn test_raw_encode_decode() {
        let attr = RawAttribute::new(1, b"nemo".to_vec()).unwrap();
        let encoded = attr.encode();
        assert_eq!(encoded, vec![1, 6, b'n', b'e', b'm', b'o']);
        assert_eq!(RawAttribute::decode_at(&encoded, 0).unwrap(), attr);
    }

    #[test]
    fn test_raw_decode_at_offset() {
        let bytes = [0xff, 0xff, 4, 3, 0x7f];
        let attr = RawAttribute::decode_at(&bytes, 2).unwrap();
        assert_eq!(attr.attr_type(), 4);
        assert_eq!(attr.value(), &[0x7f]);
    }

    #[test]
    fn test_raw_decode_rejects_bad_length() {
        assert!(matches!(
            RawAttribute::decode_at(&[1, 1], 0),
            Err(PacketError::MalformedAttribute { offset: 0, .. })
        ));
        assert!(matches!(
            RawAttribute::decode_at(&[0, 0, 1, 9, 0], 2),
            Err(PacketError::MalformedAttribute { offset: 2, .. })
        ));
        assert!(RawAttribute::decode_at(&[1], 0).is_err());
    }

    #[test]
    fn test_max_value_length() {
        assert!(RawAttribute::new(1, vec![0; 253]).is_ok());
        assert!(RawAttribute::new(1, vec![0; 254]).is_err());
        assert!(StandardAttribute::new(1, Data::String(vec![0; 254])).is_err());
        assert!(ExtendedAttribute::new(241, 1, Data::String(vec![0; 253])).is_err());
        // Long extended values are fragmented on encode
        let long = Data::LongExtended(LongExtendedData::new(1, vec![0; 600]));
        assert!(StandardAttribute::new(245, long).is_ok());
    }

    #[test]
    fn test_vendor_specific_limits() {
        let vsa = AttributeType::new(26);
        assert!(VendorSpecificAttribute::new(vsa.clone(), 9, 1, Data::String(vec![0; 247])).is_ok());
        assert!(VendorSpecificAttribute::new(vsa.clone(), 9, 1, Data::String(vec![0; 248])).is_err());
        assert_eq!(
            VendorSpecificAttribute::new(vsa, 0x0100_0000, 1, Data::Integer(0)),
            Err(AttributeError::InvalidVendorId(0x0100_0000))
        );
        let evs = AttributeType::new(245).with(&[26]);
        assert!(VendorSpecificAttribute::new(evs, 9, 1, Data::String(vec![0; 600])).is_ok());
    }

    #[test]
    fn test_attribute_types() {
        let ext = Attribute::Extended(ExtendedAttribute::new(241, 1, Data::Integer(3)).unwrap());
        assert_eq!(ext.attr_type().to_string(), "241.1");

        let parent = AttributeType::new(241).with(&[26]);
        let evs = Attribute::VendorSpecific(
            VendorSpecificAttribute::new(parent, 9, 1, Data::Integer(3)).unwrap(),
        );
        assert_eq!(evs.attr_type().to_string(), "241.26.9.1");

        let raw = Attribute::raw(80, vec![0; 16]).unwrap();
        assert!(raw.is_raw());
        assert_eq!(raw.data(), None);
        assert_eq!(raw.kind(), "raw");
    }

    #[test]
    fn test_standard_rejects_concat() {
        let concat = Data::Concat(ConcatData::from_bytes(b"eap"));
        assert!(StandardAttribute::new(79, concat).is_err());
    }

    #[test]
    fn test_concat_attribute_display() {
        let eap = Attribute::Concat(ConcatAttribute::new(79, ConcatData::from_bytes(b"eap")));
        assert_eq!(eap.data(), Some(&Data::Concat(ConcatData::from_bytes(b"eap"))));
        assert_eq!(eap.to_string(), "79 = 0x656170");

        let raw = Attribute::raw(26, vec![0, 0, 0x0a, 0xff]).unwrap();
        assert_eq!(raw.to_string(), "26 = raw 0x00000aff");
    }
}
