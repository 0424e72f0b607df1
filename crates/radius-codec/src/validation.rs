//! RADIUS Packet Validation
//!
//! Checks a decoded packet against the required-attribute rules of RFC 2865
//! and RFC 2866. Supports both strict and lenient modes.
//!
//! ## Validation Modes
//!
//! - **Strict Mode**: required attributes, plus:
//!   - the packet code must be known to the dictionary
//!   - attributes the dictionary knows must have decoded (no raw leftovers)
//!
//! - **Lenient Mode**: only the required attributes are enforced

use crate::attributes::{Attribute, AttributeType, KnownAttribute};
use crate::dictionary::Dictionary;
use crate::packet::{Code, Packet};
use thiserror::Error;

/// Validation mode for RADIUS packets
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ValidationMode {
    /// Lenient validation - only enforces required attributes.
    /// Use this mode for compatibility with non-compliant RADIUS clients.
    Lenient,
    /// Strict validation - also rejects packets carrying undecodable values.
    #[default]
    Strict,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{attribute} attribute is required in {packet}")]
    MissingAttribute {
        packet: &'static str,
        attribute: &'static str,
    },
    #[error("Either {first} or {second} is required in {packet}")]
    MissingEither {
        packet: &'static str,
        first: &'static str,
        second: &'static str,
    },
    #[error("{first} and {second} cannot both be present in {packet}")]
    Conflicting {
        packet: &'static str,
        first: &'static str,
        second: &'static str,
    },
    #[error("Attribute {0}: value did not decode")]
    Undecoded(AttributeType),
    #[error("Unsupported packet code: {0}")]
    UnknownCode(u8),
}

/// Validate a decoded RADIUS packet
pub fn validate_packet(
    packet: &Packet,
    dictionary: &dyn Dictionary,
    mode: ValidationMode,
) -> Result<(), ValidationError> {
    match packet.kind() {
        Some(Code::AccessRequest) => validate_access_request(packet)?,
        Some(Code::AccountingRequest) => validate_accounting_request(packet)?,
        _ => {}
    }

    if mode == ValidationMode::Strict {
        if dictionary.packet_definition(packet.code).is_none() {
            return Err(ValidationError::UnknownCode(packet.code));
        }
        for attr in &packet.attributes {
            validate_decoded(attr, dictionary)?;
        }
    }

    Ok(())
}

fn has(packet: &Packet, attribute: KnownAttribute) -> bool {
    packet.contains(&AttributeType::new(attribute.as_u8()))
}

/// Validate Access-Request packet
fn validate_access_request(packet: &Packet) -> Result<(), ValidationError> {
    const PACKET: &str = "Access-Request";

    // RFC 2865 Section 4.1: User-Name is REQUIRED
    if !has(packet, KnownAttribute::UserName) {
        return Err(ValidationError::MissingAttribute {
            packet: PACKET,
            attribute: KnownAttribute::UserName.name(),
        });
    }

    // RFC 2865 Section 4.1: exactly one of User-Password or CHAP-Password
    let has_user_password = has(packet, KnownAttribute::UserPassword);
    let has_chap_password = has(packet, KnownAttribute::ChapPassword);
    match (has_user_password, has_chap_password) {
        (false, false) => {
            return Err(ValidationError::MissingEither {
                packet: PACKET,
                first: KnownAttribute::UserPassword.name(),
                second: KnownAttribute::ChapPassword.name(),
            });
        }
        (true, true) => {
            return Err(ValidationError::Conflicting {
                packet: PACKET,
                first: KnownAttribute::UserPassword.name(),
                second: KnownAttribute::ChapPassword.name(),
            });
        }
        _ => {}
    }

    // RFC 2865 Section 5.32 & 5.4: Either NAS-IP-Address or NAS-Identifier MUST be present
    if !has(packet, KnownAttribute::NasIpAddress) && !has(packet, KnownAttribute::NasIdentifier) {
        return Err(ValidationError::MissingEither {
            packet: PACKET,
            first: KnownAttribute::NasIpAddress.name(),
            second: KnownAttribute::NasIdentifier.name(),
        });
    }

    Ok(())
}

/// Validate Accounting-Request packet
fn validate_accounting_request(packet: &Packet) -> Result<(), ValidationError> {
    // RFC 2866 Section 4.1: Acct-Status-Type is REQUIRED
    if !has(packet, KnownAttribute::AcctStatusType) {
        return Err(ValidationError::MissingAttribute {
            packet: "Accounting-Request",
            attribute: KnownAttribute::AcctStatusType.name(),
        });
    }
    Ok(())
}

/// A raw attribute the dictionary has a definition for failed to decode
fn validate_decoded(attr: &Attribute, dictionary: &dyn Dictionary) -> Result<(), ValidationError> {
    if let Some(raw) = attr.as_raw() {
        let attr_type = AttributeType::new(raw.attr_type());
        if dictionary.attribute_definition_by_type(&attr_type).is_some() {
            return Err(ValidationError::Undecoded(attr_type));
        }
    }
    Ok(())
}
