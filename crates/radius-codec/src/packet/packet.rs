use super::Code;
use crate::attributes::{Attribute, AttributeError, AttributeType};
use crate::dictionary::{Dictionary, PacketDefinition};
use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PacketError {
    #[error("Invalid packet length: {0}")]
    InvalidLength(usize),
    #[error("Declared length {declared} does not match received {actual} bytes")]
    LengthMismatch { declared: usize, actual: usize },
    #[error("Packet too large: {len} bytes (max {max})")]
    PacketTooLarge { len: usize, max: usize },
    #[error("Malformed attribute at offset {offset}: {reason}")]
    MalformedAttribute { offset: usize, reason: String },
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Attribute error: {0}")]
    Attribute(#[from] AttributeError),
    #[error("No dictionary entry for attribute {0}")]
    UnknownAttribute(AttributeType),
    #[error("Message-Authenticator mismatch")]
    MessageAuthenticatorMismatch,
    #[error("Response authenticator mismatch")]
    ResponseAuthenticatorMismatch,
    #[error("Request authenticator mismatch")]
    RequestAuthenticatorMismatch,
    #[error("Message-Authenticator required but missing")]
    MissingMessageAuthenticator,
}

/// Header fields of a packet read off the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReceivedFields {
    pub identifier: u8,
    pub authenticator: [u8; 16],
}

/// RADIUS Packet structure as defined in RFC 2865 Section 3
///
/// ```text
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |     Code      |  Identifier   |            Length             |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                                                               |
/// |                         Authenticator                         |
/// |                                                               |
/// |                                                               |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |  Attributes ...
/// +-+-+-+-+-+-+-+-+-+-+-+-+-
/// ```
///
/// Identifier and authenticator are assigned by
/// [`PacketCodec`](super::PacketCodec) on encode; a decoded packet carries
/// them in `received`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    /// Packet type (1 byte)
    pub code: u8,
    /// Attributes in wire order
    pub attributes: Vec<Attribute>,
    /// Header fields, set on decoded packets
    pub received: Option<ReceivedFields>,
}

impl Packet {
    /// Minimum RADIUS packet size (20 bytes: 1 code + 1 id + 2 length + 16 authenticator)
    pub const MIN_PACKET_SIZE: usize = 20;
    /// Maximum RADIUS packet size (4096 bytes as per RFC 2865)
    pub const MAX_PACKET_SIZE: usize = 4096;

    pub fn new(code: impl Into<u8>) -> Self {
        Packet {
            code: code.into(),
            attributes: Vec::new(),
            received: None,
        }
    }

    pub fn with_attributes(code: impl Into<u8>, attributes: Vec<Attribute>) -> Self {
        Packet {
            code: code.into(),
            attributes,
            received: None,
        }
    }

    pub fn add_attribute(&mut self, attribute: Attribute) {
        self.attributes.push(attribute);
    }

    /// Well-known code, if any
    pub fn kind(&self) -> Option<Code> {
        Code::from_u8(self.code)
    }

    /// Dictionary definition of this packet's code
    pub fn definition<'d>(&self, dictionary: &'d dyn Dictionary) -> Option<&'d PacketDefinition> {
        dictionary.packet_definition(self.code)
    }

    pub fn identifier(&self) -> Option<u8> {
        self.received.map(|r| r.identifier)
    }

    pub fn authenticator(&self) -> Option<&[u8; 16]> {
        self.received.as_ref().map(|r| &r.authenticator)
    }

    /// First attribute with the given type path
    pub fn find(&self, attr_type: &AttributeType) -> Option<&Attribute> {
        self.find_all(attr_type).next()
    }

    pub fn find_all<'p>(
        &'p self,
        attr_type: &AttributeType,
    ) -> impl Iterator<Item = &'p Attribute> + use<'p> {
        let attr_type = attr_type.clone();
        self.attributes
            .iter()
            .filter(move |attr| attr.attr_type() == attr_type)
    }

    pub fn contains(&self, attr_type: &AttributeType) -> bool {
        self.find(attr_type).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Data;
    use crate::dictionary::{AuthenticatorKind, MemoryDictionary};

    #[test]
    fn test_packet_lookup() {
        let mut packet = Packet::new(Code::AccessRequest);
        packet.add_attribute(Attribute::standard(1, Data::Text("nemo".into())).unwrap());
        packet.add_attribute(Attribute::standard(33, Data::String(vec![1])).unwrap());
        packet.add_attribute(Attribute::standard(33, Data::String(vec![2])).unwrap());

        assert_eq!(packet.code, 1);
        assert_eq!(packet.kind(), Some(Code::AccessRequest));
        assert!(packet.contains(&AttributeType::new(1)));
        assert!(!packet.contains(&AttributeType::new(2)));
        assert_eq!(packet.find_all(&AttributeType::new(33)).count(), 2);
        assert_eq!(packet.identifier(), None);
    }

    #[test]
    fn test_lookup_does_not_borrow_type() {
        let mut packet = Packet::new(Code::AccessRequest);
        packet.add_attribute(Attribute::standard(33, Data::String(vec![1])).unwrap());
        packet.add_attribute(Attribute::standard(33, Data::String(vec![2])).unwrap());

        let first = packet.find(&"33".parse().unwrap());
        let states = {
            let attr_type = AttributeType::new(33);
            packet.find_all(&attr_type)
        };
        assert_eq!(first.and_then(Attribute::data), Some(&Data::String(vec![1])));
        assert_eq!(states.count(), 2);
    }

    #[test]
    fn test_packet_definition() {
        let dict = MemoryDictionary::standard();
        let packet = Packet::new(Code::AccountingRequest);
        let def = packet.definition(&dict).unwrap();
        assert_eq!(def.name, "Accounting-Request");
        assert_eq!(def.authenticator, AuthenticatorKind::Hashed);

        assert!(Packet::new(200u8).definition(&dict).is_none());
    }
}
