//! RADIUS Attribute and Packet Codec
//!
//! This crate converts RADIUS packets between their wire form and a tree of
//! typed attributes, as defined in RFC 2865, 2866, 2868, 2869, 3162, 3579,
//! 5176 and 6929.
//!
//! # Features
//!
//! - Dictionary-driven decoding into typed attribute values
//! - Vendor-Specific, Extended and Long Extended attributes (RFC 6929),
//!   nested to any depth, including TLV payloads
//! - Concatenated (EAP-Message style) and fragmented long values
//! - User-Password and Tunnel-Password obfuscation
//! - Request/Response Authenticator and Message-Authenticator handling
//!
//! Values that do not decode are kept as raw attributes; only framing and
//! authentication failures reject a packet.
//!
//! # Example
//!
//! ```rust
//! use radius_codec::{Attribute, Code, Data, MemoryDictionary, Packet, PacketCodec};
//! use std::sync::Arc;
//!
//! let codec = PacketCodec::new(Arc::new(MemoryDictionary::standard()));
//!
//! // Create an Access-Request packet
//! let mut packet = Packet::new(Code::AccessRequest);
//! packet.add_attribute(Attribute::standard(1, Data::Text("alice".into())).unwrap());
//! // User-Password is obfuscated on encode
//! packet.add_attribute(Attribute::standard(2, Data::String(b"password".to_vec())).unwrap());
//!
//! let request = codec.encode_request(&packet, b"secret", None).unwrap();
//! let decoded = codec.decode_request(&request.bytes, b"secret").unwrap();
//! assert_eq!(decoded.attributes, packet.attributes);
//! assert_eq!(decoded.identifier(), Some(request.identifier));
//! ```

pub mod attributes;
pub mod auth;
pub mod codec;
pub mod config;
pub mod data;
pub mod dictionary;
pub mod message_auth;
pub mod packet;
pub mod validation;

pub use attributes::{Attribute, AttributeError, AttributeType, KnownAttribute, RawAttribute};
pub use auth::{
    calculate_request_authenticator, calculate_response_authenticator,
    generate_request_authenticator, verify_request_authenticator, verify_response_authenticator,
};
pub use codec::{AttributeCodec, AttributeStack, CodecContext, RandomSource, SystemRandom};
pub use config::{CodecConfig, ConfigError};
pub use data::{Data, DataFilter, DataType};
pub use dictionary::{Dictionary, DictionaryError, MemoryDictionary};
pub use message_auth::{calculate_message_authenticator, verify_message_authenticator};
pub use packet::{
    Code, EncodedRequest, Packet, PacketCodec, PacketError, PacketIdGenerator, ReceivedFields,
};
pub use validation::{ValidationError, ValidationMode, validate_packet};
