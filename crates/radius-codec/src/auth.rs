//! Request and Response Authenticators (RFC 2865 Section 3, RFC 2866
//! Section 3, RFC 5176 Section 2.3).
//!
//! All functions work on encoded packet bytes, so the authenticator covers
//! exactly what goes on the wire.

use crate::codec::RandomSource;
use subtle::ConstantTimeEq;

const AUTHENTICATOR_START: usize = 4;
const AUTHENTICATOR_END: usize = 20;

/// Generate a random Request Authenticator (16 bytes) per RFC 2865 Section 3
pub fn generate_request_authenticator(random: &dyn RandomSource) -> [u8; 16] {
    let mut authenticator = [0u8; 16];
    random.fill_bytes(&mut authenticator);
    authenticator
}

/// Calculate Response Authenticator per RFC 2865 Section 3
///
/// Response Authenticator = MD5(Code + ID + Length + Request Authenticator + Attributes + Secret)
///
/// Whatever is in the authenticator field of `packet_bytes` is ignored.
///
/// # Panics
///
/// If `packet_bytes` is shorter than a packet header.
pub fn calculate_response_authenticator(
    packet_bytes: &[u8],
    request_authenticator: &[u8; 16],
    secret: &[u8],
) -> [u8; 16] {
    let mut ctx = md5::Context::new();
    ctx.consume(&packet_bytes[..AUTHENTICATOR_START]);
    ctx.consume(request_authenticator);
    ctx.consume(&packet_bytes[AUTHENTICATOR_END..]);
    ctx.consume(secret);
    ctx.compute().0
}

/// Verify the Response Authenticator of an encoded response
pub fn verify_response_authenticator(
    packet_bytes: &[u8],
    request_authenticator: &[u8; 16],
    secret: &[u8],
) -> bool {
    if packet_bytes.len() < AUTHENTICATOR_END {
        return false;
    }
    let expected = calculate_response_authenticator(packet_bytes, request_authenticator, secret);
    packet_bytes[AUTHENTICATOR_START..AUTHENTICATOR_END]
        .ct_eq(&expected[..])
        .into()
}

/// Calculate the Request Authenticator of an Accounting-Request,
/// Disconnect-Request or CoA-Request
///
/// Request Authenticator = MD5(Code + ID + Length + 16 zero octets + Attributes + Secret)
pub fn calculate_request_authenticator(packet_bytes: &[u8], secret: &[u8]) -> [u8; 16] {
    calculate_response_authenticator(packet_bytes, &[0u8; 16], secret)
}

/// Verify the Request Authenticator of an encoded hashed request
pub fn verify_request_authenticator(packet_bytes: &[u8], secret: &[u8]) -> bool {
    verify_response_authenticator(packet_bytes, &[0u8; 16], secret)
}
