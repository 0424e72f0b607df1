//! Nested type-length-value data (RFC 6929 §2.3)
//!
//! A TLV payload is a sequence of records, each `type(1) length(1) value`,
//! where the length includes the two header octets. A record value may
//! itself be a TLV payload, so trees of any depth share one representation.

use super::Data;
use crate::attributes::{AttributeError, AttributeType};
use crate::dictionary::Dictionary;
use std::fmt;
use tracing::debug;

/// One record of a TLV payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tlv {
    tlv_type: u8,
    data: Data,
}

impl Tlv {
    pub const MAX_VALUE_LEN: usize = 253;

    pub fn new(tlv_type: u8, data: Data) -> Result<Self, AttributeError> {
        let len = data.encoded_len();
        if len > Self::MAX_VALUE_LEN {
            return Err(AttributeError::InvalidTlvLength(len + 2));
        }
        Ok(Tlv { tlv_type, data })
    }

    pub fn tlv_type(&self) -> u8 {
        self.tlv_type
    }

    pub fn data(&self) -> &Data {
        &self.data
    }

    pub fn encoded_len(&self) -> usize {
        2 + self.data.encoded_len()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TlvData {
    entries: Vec<Tlv>,
}

impl TlvData {
    pub fn new(entries: Vec<Tlv>) -> Self {
        TlvData { entries }
    }

    pub fn entries(&self) -> &[Tlv] {
        &self.entries
    }

    /// First record of the given type
    pub fn get(&self, tlv_type: u8) -> Option<&Tlv> {
        self.entries.iter().find(|tlv| tlv.tlv_type == tlv_type)
    }

    pub fn encoded_len(&self) -> usize {
        self.entries.iter().map(Tlv::encoded_len).sum()
    }

    pub(crate) fn write_to(&self, buf: &mut Vec<u8>) {
        for tlv in &self.entries {
            buf.push(tlv.tlv_type);
            buf.push(tlv.encoded_len() as u8);
            tlv.data.write_to(buf);
        }
    }

    /// Parses the records of a TLV payload belonging to `attr_type`.
    ///
    /// A record that is too short or overruns the payload invalidates the
    /// whole payload. A record without a TLV definition, or whose value fails
    /// to decode as its declared type, is kept as opaque string data.
    pub(crate) fn decode(
        dict: &dyn Dictionary,
        attr_type: &AttributeType,
        bytes: &[u8],
    ) -> Option<Self> {
        let mut entries = Vec::new();
        let mut rest = bytes;

        while !rest.is_empty() {
            if rest.len() < 2 {
                return None;
            }
            let len = usize::from(rest[1]);
            if len < 2 || len > rest.len() {
                return None;
            }
            let tlv_type = rest[0];
            let value = &rest[2..len];
            let child = attr_type.with(&[u32::from(tlv_type)]);

            let data = dict
                .tlv_definition(&child)
                .and_then(|def| def.data_type.decode(dict, &child, value))
                .unwrap_or_else(|| {
                    debug!(attr_type = %child, "TLV kept as opaque data");
                    Data::String(value.to_vec())
                });
            entries.push(Tlv { tlv_type, data });
            rest = &rest[len..];
        }

        Some(TlvData { entries })
    }
}

impl fmt::Display for TlvData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, tlv) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}: {}", tlv.tlv_type, tlv.data)?;
        }
        f.write_str("}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::DataType;
    use crate::dictionary::MemoryDictionary;

    fn dictionary() -> MemoryDictionary {
        let mut dict = MemoryDictionary::new();
        let parent: AttributeType = "241.9".parse().unwrap();
        dict.add_tlv(parent.with(&[1]), "Container", DataType::Tlv)
            .unwrap();
        dict.add_tlv(parent.with(&[1, 1]), "Leaf-Integer", DataType::Integer)
            .unwrap();
        dict.add_tlv(parent.with(&[1, 2]), "Leaf-Text", DataType::Text)
            .unwrap();
        dict
    }

    #[test]
    fn test_decode_nested_records() {
        let dict = dictionary();
        let attr_type: AttributeType = "241.9".parse().unwrap();
        let bytes = [1, 12, 1, 6, 0, 0, 0, 7, 2, 4, b'o', b'k'];

        let tlv = TlvData::decode(&dict, &attr_type, &bytes).unwrap();
        let container = tlv.get(1).unwrap();
        let Data::Tlv(inner) = container.data() else {
            panic!("expected nested TLV, got {:?}", container.data());
        };
        assert_eq!(inner.get(1).unwrap().data(), &Data::Integer(7));
        assert_eq!(inner.get(2).unwrap().data(), &Data::Text("ok".to_string()));

        let mut buf = Vec::new();
        tlv.write_to(&mut buf);
        assert_eq!(buf, bytes);
    }

    #[test]
    fn test_unknown_or_bad_child_kept_opaque() {
        let dict = dictionary();
        let attr_type: AttributeType = "241.9".parse().unwrap();
        // Child 1 of the container is declared integer but carries 3 bytes
        let bytes = [1, 7, 1, 5, 0, 0, 7, 9, 3, 0xaa];

        let tlv = TlvData::decode(&dict, &attr_type, &bytes).unwrap();
        let Data::Tlv(inner) = tlv.get(1).unwrap().data() else {
            panic!("expected nested TLV");
        };
        assert_eq!(inner.get(1).unwrap().data(), &Data::String(vec![0, 0, 7]));
        assert_eq!(tlv.get(9).unwrap().data(), &Data::String(vec![0xaa]));
    }

    #[test]
    fn test_malformed_records_rejected() {
        let dict = MemoryDictionary::new();
        let attr_type = AttributeType::new(241);
        // length below the header size
        assert!(TlvData::decode(&dict, &attr_type, &[1, 1]).is_none());
        assert!(TlvData::decode(&dict, &attr_type, &[1, 0, 0]).is_none());
        // length past the end of the payload
        assert!(TlvData::decode(&dict, &attr_type, &[1, 5, 0, 0]).is_none());
        // dangling type octet
        assert!(TlvData::decode(&dict, &attr_type, &[1, 2, 7]).is_none());
    }

    #[test]
    fn test_new_rejects_oversized_value() {
        assert!(Tlv::new(1, Data::String(vec![0; 253])).is_ok());
        assert_eq!(
            Tlv::new(1, Data::String(vec![0; 254])),
            Err(AttributeError::InvalidTlvLength(256))
        );
    }

    #[test]
    fn test_display() {
        let tlv = TlvData::new(vec![
            Tlv::new(1, Data::Integer(5)).unwrap(),
            Tlv::new(2, Data::String(vec![0xab])).unwrap(),
        ]);
        assert_eq!(tlv.to_string(), "{1: 5, 2: 0xab}");
    }
}
