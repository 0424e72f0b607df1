//! IPv4/IPv6 prefix values (RFC 3162, RFC 6572, RFC 8044)
//!
//! ```text
//!  0                   1                   2                   3
//!  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |   Reserved    | Prefix-Length |  Prefix ...
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! ```
//!
//! Bits beyond the prefix length must be zero in both directions.

use crate::attributes::AttributeError;
use ipnetwork::{Ipv4Network, Ipv6Network};
use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ipv4Prefix {
    network: Ipv4Network,
}

impl Ipv4Prefix {
    pub const MAX_PREFIX_LEN: u8 = 32;
    pub const ENCODED_LEN: usize = 6;

    /// Rejects a prefix length over 32 or host bits set in `addr`.
    pub fn new(addr: Ipv4Addr, prefix_len: u8) -> Result<Self, AttributeError> {
        let network = Self::network(addr, prefix_len)?;
        if network.network() != addr {
            return Err(AttributeError::UnmaskedPrefix(prefix_len));
        }
        Ok(Ipv4Prefix { network })
    }

    /// Like `new`, but clears host bits instead of rejecting them.
    pub fn masked(addr: Ipv4Addr, prefix_len: u8) -> Result<Self, AttributeError> {
        let network = Self::network(addr, prefix_len)?;
        Self::new(network.network(), prefix_len)
    }

    fn network(addr: Ipv4Addr, prefix_len: u8) -> Result<Ipv4Network, AttributeError> {
        Ipv4Network::new(addr, prefix_len).map_err(|_| AttributeError::InvalidPrefixLength {
            len: prefix_len,
            max: Self::MAX_PREFIX_LEN,
        })
    }

    pub fn addr(&self) -> Ipv4Addr {
        self.network.ip()
    }

    pub fn prefix_len(&self) -> u8 {
        self.network.prefix()
    }

    pub fn as_network(&self) -> Ipv4Network {
        self.network
    }

    pub(crate) fn write_to(&self, buf: &mut Vec<u8>) {
        buf.push(0);
        buf.push(self.prefix_len());
        buf.extend_from_slice(&self.addr().octets());
    }

    pub(crate) fn decode(bytes: &[u8]) -> Option<Self> {
        if bytes.len() != Self::ENCODED_LEN || bytes[0] != 0 {
            return None;
        }
        let addr = Ipv4Addr::new(bytes[2], bytes[3], bytes[4], bytes[5]);
        Self::new(addr, bytes[1]).ok()
    }
}

impl fmt::Display for Ipv4Prefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.network)
    }
}

/// IPv6 prefix.
///
/// The address may be sent with anything from the octets the prefix needs up
/// to all 16. The received count is kept so a decoded value encodes back to
/// the same bytes; values built with `new` use the minimum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ipv6Prefix {
    network: Ipv6Network,
    addr_octets: u8,
}

impl Ipv6Prefix {
    pub const MAX_PREFIX_LEN: u8 = 128;
    pub const MAX_ENCODED_LEN: usize = 18;

    /// Rejects a prefix length over 128 or bits set past the prefix.
    pub fn new(addr: Ipv6Addr, prefix_len: u8) -> Result<Self, AttributeError> {
        let network = Self::network(addr, prefix_len)?;
        if network.network() != addr {
            return Err(AttributeError::UnmaskedPrefix(prefix_len));
        }
        Ok(Ipv6Prefix {
            network,
            addr_octets: prefix_len.div_ceil(8),
        })
    }

    /// Like `new`, but clears bits past the prefix instead of rejecting them.
    pub fn masked(addr: Ipv6Addr, prefix_len: u8) -> Result<Self, AttributeError> {
        let network = Self::network(addr, prefix_len)?;
        Self::new(network.network(), prefix_len)
    }

    fn network(addr: Ipv6Addr, prefix_len: u8) -> Result<Ipv6Network, AttributeError> {
        Ipv6Network::new(addr, prefix_len).map_err(|_| AttributeError::InvalidPrefixLength {
            len: prefix_len,
            max: Self::MAX_PREFIX_LEN,
        })
    }

    pub fn addr(&self) -> Ipv6Addr {
        self.network.ip()
    }

    pub fn prefix_len(&self) -> u8 {
        self.network.prefix()
    }

    pub fn as_network(&self) -> Ipv6Network {
        self.network
    }

    /// Address octets carried on the wire
    pub fn addr_octets(&self) -> usize {
        usize::from(self.addr_octets)
    }

    pub fn encoded_len(&self) -> usize {
        2 + self.addr_octets()
    }

    pub(crate) fn write_to(&self, buf: &mut Vec<u8>) {
        buf.push(0);
        buf.push(self.prefix_len());
        buf.extend_from_slice(&self.addr().octets()[..self.addr_octets()]);
    }

    /// Missing address octets are zero.
    pub(crate) fn decode(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < 2 || bytes.len() > Self::MAX_ENCODED_LEN || bytes[0] != 0 {
            return None;
        }
        let prefix_len = bytes[1];
        let addr_bytes = &bytes[2..];
        if usize::from(prefix_len) > addr_bytes.len() * 8 {
            return None;
        }
        let mut octets = [0u8; 16];
        octets[..addr_bytes.len()].copy_from_slice(addr_bytes);
        let prefix = Self::new(Ipv6Addr::from(octets), prefix_len).ok()?;
        Some(Ipv6Prefix {
            addr_octets: addr_bytes.len() as u8,
            ..prefix
        })
    }
}

impl fmt::Display for Ipv6Prefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.network)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ipv4_prefix_layout() {
        let prefix = Ipv4Prefix::new(Ipv4Addr::new(192, 0, 2, 0), 24).unwrap();
        let mut buf = Vec::new();
        prefix.write_to(&mut buf);
        assert_eq!(buf, vec![0, 24, 192, 0, 2, 0]);
        assert_eq!(Ipv4Prefix::decode(&buf), Some(prefix));
    }

    #[test]
    fn test_ipv4_prefix_rejects_host_bits() {
        assert_eq!(
            Ipv4Prefix::new(Ipv4Addr::new(192, 0, 2, 1), 24),
            Err(AttributeError::UnmaskedPrefix(24))
        );
        assert!(Ipv4Prefix::decode(&[0, 24, 192, 0, 2, 1]).is_none());
        // Reserved octet must be zero
        assert!(Ipv4Prefix::decode(&[1, 24, 192, 0, 2, 0]).is_none());
        assert!(Ipv4Prefix::decode(&[0, 33, 192, 0, 2, 0]).is_none());
        let masked = Ipv4Prefix::masked(Ipv4Addr::new(192, 0, 2, 1), 24).unwrap();
        assert_eq!(masked.addr(), Ipv4Addr::new(192, 0, 2, 0));
    }

    #[test]
    fn test_ipv6_prefix_minimal_encoding() {
        let prefix = Ipv6Prefix::new("2001:db8::".parse().unwrap(), 32).unwrap();
        let mut buf = Vec::new();
        prefix.write_to(&mut buf);
        assert_eq!(buf, vec![0, 32, 0x20, 0x01, 0x0d, 0xb8]);
        assert_eq!(prefix.encoded_len(), 6);
        assert_eq!(Ipv6Prefix::decode(&buf), Some(prefix));

        let odd = Ipv6Prefix::new("2001:db8::".parse().unwrap(), 33).unwrap();
        assert_eq!(odd.encoded_len(), 7);
        assert_eq!(Ipv6Prefix::new(Ipv6Addr::UNSPECIFIED, 0).unwrap().encoded_len(), 2);
    }

    #[test]
    fn test_ipv6_prefix_keeps_received_length() {
        let mut bytes = vec![0, 64];
        bytes.extend_from_slice(&"2001:db8:1:2::".parse::<Ipv6Addr>().unwrap().octets());
        let prefix = Ipv6Prefix::decode(&bytes).unwrap();
        assert_eq!(prefix.prefix_len(), 64);
        assert_eq!(prefix.addr_octets(), 16);

        let mut out = Vec::new();
        prefix.write_to(&mut out);
        assert_eq!(out, bytes);
        assert_eq!(prefix.encoded_len(), 18);

        // Same network, minimal form
        let minimal = Ipv6Prefix::new(prefix.addr(), 64).unwrap();
        assert_eq!(minimal.as_network(), prefix.as_network());
        assert_eq!(minimal.encoded_len(), 10);
    }

    #[test]
    fn test_prefix_display() {
        let v4 = Ipv4Prefix::new(Ipv4Addr::new(192, 0, 2, 0), 24).unwrap();
        assert_eq!(v4.to_string(), "192.0.2.0/24");
        let v6 = Ipv6Prefix::new("2001:db8::".parse().unwrap(), 32).unwrap();
        assert_eq!(v6.to_string(), "2001:db8::/32");
    }

    #[test]
    fn test_ipv6_prefix_rejects_bits_outside_prefix() {
        // /16 but the third octet is non-zero
        assert!(Ipv6Prefix::decode(&[0, 16, 0x20, 0x01, 0x0d]).is_none());
        // prefix longer than the carried octets
        assert!(Ipv6Prefix::decode(&[0, 64, 0x20, 0x01]).is_none());
        assert!(Ipv6Prefix::decode(&[0, 129]).is_none());
        assert!(Ipv6Prefix::decode(&[0]).is_none());
        assert!(Ipv6Prefix::decode(&[1, 0]).is_none());
    }
}
