//! Message-Authenticator Support (RFC 2869)
//!
//! This module implements the Message-Authenticator attribute for RADIUS.
//! Message-Authenticator provides integrity protection using HMAC-MD5.
//!
//! Per RFC 2869 Section 5.14:
//! - Computed as HMAC-MD5(shared_secret, packet)
//! - Always 16 bytes (128 bits)
//! - Required for Access-Request with EAP-Message (RFC 3579 Section 3.2)
//!
//! The Message-Authenticator is computed over the entire RADIUS packet with:
//! - Request Authenticator in the authenticator field, also for responses
//! - Zeros in the authenticator field for Accounting, Disconnect and CoA requests
//! - Message-Authenticator field set to all zeros during calculation

use crate::attributes::{KnownAttribute, RawAttribute};
use crate::packet::Packet;
use hmac::{Hmac, Mac};
use md5_digest::Md5;
use subtle::ConstantTimeEq;

type HmacMd5 = Hmac<Md5>;

/// Length of the Message-Authenticator value
pub const MESSAGE_AUTHENTICATOR_LEN: usize = 16;

/// Calculate Message-Authenticator for a RADIUS packet
///
/// # Arguments
/// * `packet_bytes` - The complete RADIUS packet bytes with Message-Authenticator set to zeros
/// * `secret` - The shared secret
///
/// # Returns
/// 16-byte HMAC-MD5 hash
pub fn calculate_message_authenticator(packet_bytes: &[u8], secret: &[u8]) -> [u8; 16] {
    let mut mac = HmacMd5::new_from_slice(secret).expect("HMAC can take key of any size");
    mac.update(packet_bytes);
    let bytes = mac.finalize().into_bytes();

    let mut output = [0u8; 16];
    output.copy_from_slice(&bytes);
    output
}

/// Verify Message-Authenticator in a RADIUS packet
///
/// # Arguments
/// * `packet_bytes` - The complete RADIUS packet bytes
/// * `secret` - The shared secret
/// * `message_auth_offset` - Byte offset where Message-Authenticator value starts (after type+length)
///
/// # Returns
/// true if Message-Authenticator is valid, false otherwise
pub fn verify_message_authenticator(
    packet_bytes: &[u8],
    secret: &[u8],
    message_auth_offset: usize,
) -> bool {
    let end = message_auth_offset + MESSAGE_AUTHENTICATOR_LEN;
    if end > packet_bytes.len() {
        return false;
    }

    let mut packet_copy = packet_bytes.to_vec();
    packet_copy[message_auth_offset..end].fill(0);
    let expected = calculate_message_authenticator(&packet_copy, secret);

    packet_bytes[message_auth_offset..end]
        .ct_eq(&expected[..])
        .into()
}

/// Zero the Message-Authenticator at `message_auth_offset`, then fill in
/// the HMAC of the whole packet.
pub fn sign_message_authenticator(
    packet_bytes: &mut [u8],
    secret: &[u8],
    message_auth_offset: usize,
) {
    let field = message_auth_offset..message_auth_offset + MESSAGE_AUTHENTICATOR_LEN;
    packet_bytes[field.clone()].fill(0);
    let mac = calculate_message_authenticator(packet_bytes, secret);
    packet_bytes[field].copy_from_slice(&mac);
}

/// Offset of the value of the first well-formed Message-Authenticator
/// attribute (type 80, 16 data bytes) in an encoded packet.
///
/// Stops at the first malformed attribute record.
pub fn find_message_authenticator(packet_bytes: &[u8]) -> Option<usize> {
    let message_auth = KnownAttribute::MessageAuthenticator.as_u8();
    let mut offset = Packet::MIN_PACKET_SIZE;

    while offset + RawAttribute::HEADER_LEN <= packet_bytes.len() {
        let attr_type = packet_bytes[offset];
        let length = usize::from(packet_bytes[offset + 1]);
        if length < RawAttribute::HEADER_LEN || offset + length > packet_bytes.len() {
            return None;
        }
        if attr_type == message_auth
            && length == RawAttribute::HEADER_LEN + MESSAGE_AUTHENTICATOR_LEN
        {
            return Some(offset + RawAttribute::HEADER_LEN);
        }
        offset += length;
    }
    None
}
