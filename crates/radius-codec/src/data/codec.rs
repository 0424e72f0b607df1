use super::{
    ConcatData, Data, EvsData, ExtendedData, Ipv4Prefix, Ipv6Prefix, LongExtendedData,
    OptionalTagged, Tag, Tagged, TlvData, VsaData,
};
use crate::attributes::{AttributeError, AttributeType};
use crate::dictionary::Dictionary;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};

/// Declared wire type of an attribute value.
///
/// The serialized names are the ones used in JSON dictionaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DataType {
    Integer,
    Integer64,
    Enum,
    Time,
    Ipv4Addr,
    Ipv6Addr,
    Ipv4Prefix,
    Ipv6Prefix,
    String,
    Text,
    Ifid,
    OptionalTaggedString,
    OptionalTaggedText,
    TaggedString,
    TaggedText,
    TaggedInteger,
    Extended,
    LongExtended,
    Vsa,
    Evs,
    Concat,
    Tlv,
}

impl DataType {
    /// Types whose value encloses another attribute
    pub fn is_container(self) -> bool {
        matches!(
            self,
            DataType::Extended | DataType::LongExtended | DataType::Vsa | DataType::Evs
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DataType::Integer => "integer",
            DataType::Integer64 => "integer64",
            DataType::Enum => "enum",
            DataType::Time => "time",
            DataType::Ipv4Addr => "ipv4-addr",
            DataType::Ipv6Addr => "ipv6-addr",
            DataType::Ipv4Prefix => "ipv4-prefix",
            DataType::Ipv6Prefix => "ipv6-prefix",
            DataType::String => "string",
            DataType::Text => "text",
            DataType::Ifid => "ifid",
            DataType::OptionalTaggedString => "optional-tagged-string",
            DataType::OptionalTaggedText => "optional-tagged-text",
            DataType::TaggedString => "tagged-string",
            DataType::TaggedText => "tagged-text",
            DataType::TaggedInteger => "tagged-integer",
            DataType::Extended => "extended",
            DataType::LongExtended => "long-extended",
            DataType::Vsa => "vsa",
            DataType::Evs => "evs",
            DataType::Concat => "concat",
            DataType::Tlv => "tlv",
        }
    }

    /// Decode `bytes` as a value of this type.
    ///
    /// Returns `None` when the bytes are not a valid encoding: wrong length,
    /// tag out of range, reserved octet set, bad prefix, invalid UTF-8 or a
    /// malformed container header. `dict` and `attr_type` are only consulted
    /// for TLV payloads, whose children are looked up below `attr_type`.
    pub fn decode(
        self,
        dict: &dyn Dictionary,
        attr_type: &AttributeType,
        bytes: &[u8],
    ) -> Option<Data> {
        let data = match self {
            DataType::Integer => Data::Integer(u32::from_be_bytes(bytes.try_into().ok()?)),
            DataType::Integer64 => Data::Integer64(u64::from_be_bytes(bytes.try_into().ok()?)),
            DataType::Enum => Data::Enum(u32::from_be_bytes(bytes.try_into().ok()?)),
            DataType::Time => Data::Time(u32::from_be_bytes(bytes.try_into().ok()?)),
            DataType::Ipv4Addr => {
                let octets: [u8; 4] = bytes.try_into().ok()?;
                Data::Ipv4Addr(Ipv4Addr::from(octets))
            }
            DataType::Ipv6Addr => {
                let octets: [u8; 16] = bytes.try_into().ok()?;
                Data::Ipv6Addr(Ipv6Addr::from(octets))
            }
            DataType::Ipv4Prefix => Data::Ipv4Prefix(Ipv4Prefix::decode(bytes)?),
            DataType::Ipv6Prefix => Data::Ipv6Prefix(Ipv6Prefix::decode(bytes)?),
            DataType::String => Data::String(bytes.to_vec()),
            DataType::Text => Data::Text(String::from_utf8(bytes.to_vec()).ok()?),
            DataType::Ifid => Data::Ifid(bytes.try_into().ok()?),
            DataType::OptionalTaggedString => {
                let (tag, value) = split_optional_tag(bytes);
                Data::OptionalTaggedString(OptionalTagged {
                    tag,
                    value: value.to_vec(),
                })
            }
            DataType::OptionalTaggedText => {
                let (tag, value) = split_optional_tag(bytes);
                Data::OptionalTaggedText(OptionalTagged {
                    tag,
                    value: String::from_utf8(value.to_vec()).ok()?,
                })
            }
            DataType::TaggedString => {
                let (tag, value) = split_tag(bytes)?;
                Data::TaggedString(Tagged::string(tag, value.to_vec()))
            }
            DataType::TaggedText => {
                let (tag, value) = split_tag(bytes)?;
                Data::TaggedText(Tagged::text(tag, String::from_utf8(value.to_vec()).ok()?))
            }
            DataType::TaggedInteger => {
                if bytes.len() != 4 {
                    return None;
                }
                let (tag, value) = split_tag(bytes)?;
                let value = u32::from_be_bytes([0, value[0], value[1], value[2]]);
                Data::TaggedInteger(Tagged { tag, value })
            }
            DataType::Extended => Data::Extended(ExtendedData::decode(bytes)?),
            DataType::LongExtended => Data::LongExtended(LongExtendedData::decode(bytes)?),
            DataType::Vsa => Data::Vsa(VsaData::decode(bytes)?),
            DataType::Evs => Data::Evs(EvsData::decode(bytes)?),
            DataType::Concat => {
                Data::Concat(ConcatData::from_fragments(vec![bytes.to_vec()]).ok()?)
            }
            DataType::Tlv => Data::Tlv(TlvData::decode(dict, attr_type, bytes)?),
        };
        Some(data)
    }

    /// Encode `data`, which must be a value of this type.
    pub fn encode(self, data: &Data) -> Result<Vec<u8>, AttributeError> {
        if data.data_type() != self {
            return Err(AttributeError::TypeMismatch {
                expected: self,
                actual: data.data_type(),
            });
        }
        Ok(data.to_bytes())
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A first octet in the tag range is a tag, anything else is value.
fn split_optional_tag(bytes: &[u8]) -> (Option<Tag>, &[u8]) {
    match bytes.split_first() {
        Some((&first, rest)) if first <= Tag::MAX => (Some(Tag(first)), rest),
        _ => (None, bytes),
    }
}

fn split_tag(bytes: &[u8]) -> Option<(Tag, &[u8])> {
    let (&first, rest) = bytes.split_first()?;
    Some((Tag::new(first).ok()?, rest))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary::MemoryDictionary;

    fn decode(data_type: DataType, bytes: &[u8]) -> Option<Data> {
        let dict = MemoryDictionary::new();
        data_type.decode(&dict, &AttributeType::new(1), bytes)
    }

    #[test]
    fn test_fixed_width_lengths() {
        assert_eq!(decode(DataType::Integer, &[0, 0, 0, 3]), Some(Data::Integer(3)));
        assert_eq!(decode(DataType::Integer, &[0, 0, 3]), None);
        assert_eq!(decode(DataType::Enum, &[0, 0, 0, 0, 3]), None);
        assert_eq!(
            decode(DataType::Integer64, &[0, 0, 0, 1, 0, 0, 0, 0]),
            Some(Data::Integer64(1 << 32))
        );
        assert_eq!(
            decode(DataType::Ipv4Addr, &[192, 168, 1, 16]),
            Some(Data::Ipv4Addr(Ipv4Addr::new(192, 168, 1, 16)))
        );
        assert_eq!(decode(DataType::Ipv6Addr, &[0; 15]), None);
        assert_eq!(decode(DataType::Ifid, &[1; 8]), Some(Data::Ifid([1; 8])));
        assert_eq!(decode(DataType::Ifid, &[1; 9]), None);
    }

    #[test]
    fn test_text_requires_utf8() {
        assert_eq!(decode(DataType::Text, b"nemo"), Some(Data::Text("nemo".to_string())));
        assert_eq!(decode(DataType::Text, &[0xff, 0xfe]), None);
        assert_eq!(decode(DataType::String, &[0xff, 0xfe]), Some(Data::String(vec![0xff, 0xfe])));
    }

    #[test]
    fn test_optional_tag_detection() {
        let tagged = decode(DataType::OptionalTaggedText, b"\x01vpn").unwrap();
        let Data::OptionalTaggedText(v) = &tagged else {
            panic!("wrong variant");
        };
        assert_eq!(v.tag(), Some(Tag(1)));
        assert_eq!(v.value(), "vpn");

        let untagged = decode(DataType::OptionalTaggedText, b"vpn").unwrap();
        let Data::OptionalTaggedText(v) = &untagged else {
            panic!("wrong variant");
        };
        assert_eq!(v.tag(), None);
        assert_eq!(untagged.to_bytes(), b"vpn");
    }

    #[test]
    fn test_mandatory_tag_range() {
        assert!(decode(DataType::TaggedString, &[0x1f, 1, 2]).is_some());
        assert!(decode(DataType::TaggedString, &[0x20, 1, 2]).is_none());
        assert!(decode(DataType::TaggedString, &[]).is_none());

        let data = decode(DataType::TaggedInteger, &[0x01, 0x00, 0x00, 0x03]).unwrap();
        assert_eq!(data.as_u32(), Some(3));
        assert!(decode(DataType::TaggedInteger, &[0x01, 0x00, 0x03]).is_none());
        assert!(decode(DataType::TaggedInteger, &[0x40, 0x00, 0x00, 0x03]).is_none());
    }

    #[test]
    fn test_encode_checks_type() {
        assert_eq!(DataType::Integer.encode(&Data::Integer(1)).unwrap(), vec![0, 0, 0, 1]);
        assert_eq!(
            DataType::Integer.encode(&Data::Enum(1)),
            Err(AttributeError::TypeMismatch {
                expected: DataType::Integer,
                actual: DataType::Enum,
            })
        );
    }

    #[test]
    fn test_container_headers() {
        assert!(decode(DataType::Vsa, &[0, 0, 0, 9, 1]).is_none());
        assert!(decode(DataType::Evs, &[0, 0, 0, 9]).is_none());
        assert!(decode(DataType::Extended, &[]).is_none());
        assert!(DataType::Vsa.is_container());
        assert!(!DataType::Tlv.is_container());
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&DataType::OptionalTaggedText).unwrap();
        assert_eq!(json, "\"optional-tagged-text\"");
        let parsed: DataType = serde_json::from_str("\"ipv6-prefix\"").unwrap();
        assert_eq!(parsed, DataType::Ipv6Prefix);
        assert_eq!(DataType::LongExtended.to_string(), "long-extended");
    }
}
