//! Container values that enclose another attribute.
//!
//! ```text
//! Extended (RFC 6929 §2.1):      Extended-Type(1) Value(≤252)
//! Long Extended (RFC 6929 §2.2): Extended-Type(1) M|T|Reserved(1) Value
//! Vendor-Specific (RFC 2865):    Vendor-Id(4) Vendor-Type(1) Vendor-Length(1) Value
//! Extended Vendor-Specific:      Vendor-Id(4) Vendor-Type(1) Value
//! ```
//!
//! The enclosed value stays encoded here; the dictionary entry for the nested
//! type decides how to interpret it.

use crate::attributes::AttributeError;

/// Largest value a single attribute record can carry
pub(crate) const MAX_RECORD_VALUE: usize = 253;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtendedData {
    ext_type: u8,
    value: Vec<u8>,
}

impl ExtendedData {
    pub const MAX_VALUE_LEN: usize = MAX_RECORD_VALUE - 1;

    pub fn new(ext_type: u8, value: Vec<u8>) -> Result<Self, AttributeError> {
        if value.len() > Self::MAX_VALUE_LEN {
            return Err(AttributeError::ValueTooLong {
                len: value.len(),
                max: Self::MAX_VALUE_LEN,
            });
        }
        Ok(ExtendedData { ext_type, value })
    }

    pub fn ext_type(&self) -> u8 {
        self.ext_type
    }

    pub fn value(&self) -> &[u8] {
        &self.value
    }

    pub fn encoded_len(&self) -> usize {
        1 + self.value.len()
    }

    pub(crate) fn write_to(&self, buf: &mut Vec<u8>) {
        buf.push(self.ext_type);
        buf.extend_from_slice(&self.value);
    }

    pub(crate) fn decode(bytes: &[u8]) -> Option<Self> {
        let (&ext_type, value) = bytes.split_first()?;
        ExtendedData::new(ext_type, value.to_vec()).ok()
    }
}

/// Long extended value.
///
/// A single wire record carries at most [`LongExtendedData::MAX_FRAGMENT_LEN`]
/// octets of value; longer values are split over consecutive records with
/// the `more` flag set on all but the last. Once reassembled the value has no
/// length limit other than the packet size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LongExtendedData {
    ext_type: u8,
    more: bool,
    truncated: bool,
    value: Vec<u8>,
}

impl LongExtendedData {
    pub const MAX_FRAGMENT_LEN: usize = MAX_RECORD_VALUE - 2;
    pub(crate) const MORE: u8 = 0x80;
    pub(crate) const TRUNCATED: u8 = 0x40;

    /// Complete (reassembled) value
    pub fn new(ext_type: u8, value: Vec<u8>) -> Self {
        LongExtendedData {
            ext_type,
            more: false,
            truncated: false,
            value,
        }
    }

    /// Single wire fragment
    pub fn fragment(
        ext_type: u8,
        more: bool,
        truncated: bool,
        value: Vec<u8>,
    ) -> Result<Self, AttributeError> {
        if value.len() > Self::MAX_FRAGMENT_LEN {
            return Err(AttributeError::ValueTooLong {
                len: value.len(),
                max: Self::MAX_FRAGMENT_LEN,
            });
        }
        Ok(LongExtendedData {
            ext_type,
            more,
            truncated,
            value,
        })
    }

    pub fn with_truncated(mut self, truncated: bool) -> Self {
        self.truncated = truncated;
        self
    }

    pub fn ext_type(&self) -> u8 {
        self.ext_type
    }

    pub fn more(&self) -> bool {
        self.more
    }

    pub fn truncated(&self) -> bool {
        self.truncated
    }

    pub fn value(&self) -> &[u8] {
        &self.value
    }

    pub(crate) fn into_value(self) -> Vec<u8> {
        self.value
    }

    pub(crate) fn flags(&self) -> u8 {
        let mut flags = 0;
        if self.more {
            flags |= Self::MORE;
        }
        if self.truncated {
            flags |= Self::TRUNCATED;
        }
        flags
    }

    pub fn encoded_len(&self) -> usize {
        2 + self.value.len()
    }

    pub(crate) fn write_to(&self, buf: &mut Vec<u8>) {
        buf.push(self.ext_type);
        buf.push(self.flags());
        buf.extend_from_slice(&self.value);
    }

    /// Decodes one record. Reserved flag bits are ignored on receipt.
    pub(crate) fn decode(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < 2 {
            return None;
        }
        Some(LongExtendedData {
            ext_type: bytes[0],
            more: bytes[1] & Self::MORE != 0,
            truncated: bytes[1] & Self::TRUNCATED != 0,
            value: bytes[2..].to_vec(),
        })
    }
}

fn check_vendor_id(vendor_id: u32) -> Result<(), AttributeError> {
    if vendor_id > 0x00FF_FFFF {
        return Err(AttributeError::InvalidVendorId(vendor_id));
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VsaData {
    vendor_id: u32,
    vendor_type: u8,
    value: Vec<u8>,
}

impl VsaData {
    const HEADER_LEN: usize = 6;
    pub const MAX_VALUE_LEN: usize = MAX_RECORD_VALUE - Self::HEADER_LEN;

    pub fn new(vendor_id: u32, vendor_type: u8, value: Vec<u8>) -> Result<Self, AttributeError> {
        check_vendor_id(vendor_id)?;
        if value.len() > Self::MAX_VALUE_LEN {
            return Err(AttributeError::ValueTooLong {
                len: value.len(),
                max: Self::MAX_VALUE_LEN,
            });
        }
        Ok(VsaData {
            vendor_id,
            vendor_type,
            value,
        })
    }

    pub fn vendor_id(&self) -> u32 {
        self.vendor_id
    }

    pub fn vendor_type(&self) -> u8 {
        self.vendor_type
    }

    pub fn value(&self) -> &[u8] {
        &self.value
    }

    pub fn encoded_len(&self) -> usize {
        Self::HEADER_LEN + self.value.len()
    }

    pub(crate) fn write_to(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(&self.vendor_id.to_be_bytes());
        buf.push(self.vendor_type);
        // Vendor-Length covers its own header
        buf.push((2 + self.value.len()) as u8);
        buf.extend_from_slice(&self.value);
    }

    /// The Vendor-Length octet must describe exactly the rest of the record.
    pub(crate) fn decode(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < Self::HEADER_LEN {
            return None;
        }
        let vendor_id = u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
        let vendor_len = usize::from(bytes[5]);
        if vendor_len < 2 || vendor_len != bytes.len() - 4 {
            return None;
        }
        VsaData::new(vendor_id, bytes[4], bytes[Self::HEADER_LEN..].to_vec()).ok()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvsData {
    vendor_id: u32,
    vendor_type: u8,
    value: Vec<u8>,
}

impl EvsData {
    const HEADER_LEN: usize = 5;

    /// No length limit here: inside a long extended attribute an EVS value
    /// may span several fragments. The enclosing attribute enforces its own.
    pub fn new(vendor_id: u32, vendor_type: u8, value: Vec<u8>) -> Result<Self, AttributeError> {
        check_vendor_id(vendor_id)?;
        Ok(EvsData {
            vendor_id,
            vendor_type,
            value,
        })
    }

    pub fn vendor_id(&self) -> u32 {
        self.vendor_id
    }

    pub fn vendor_type(&self) -> u8 {
        self.vendor_type
    }

    pub fn value(&self) -> &[u8] {
        &self.value
    }

    pub fn encoded_len(&self) -> usize {
        Self::HEADER_LEN + self.value.len()
    }

    pub(crate) fn write_to(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(&self.vendor_id.to_be_bytes());
        buf.push(self.vendor_type);
        buf.extend_from_slice(&self.value);
    }

    pub(crate) fn decode(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < Self::HEADER_LEN {
            return None;
        }
        let vendor_id = u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
        EvsData::new(vendor_id, bytes[4], bytes[Self::HEADER_LEN..].to_vec()).ok()
    }
}

/// Value carried over one or more consecutive attributes of the same type
/// (RFC 7499 / RFC 3579 EAP-Message style).
///
/// Fragment boundaries are kept as received so a decoded value re-encodes to
/// the identical records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConcatData {
    fragments: Vec<Vec<u8>>,
}

impl ConcatData {
    pub const MAX_FRAGMENT_LEN: usize = MAX_RECORD_VALUE;

    pub fn from_fragments(fragments: Vec<Vec<u8>>) -> Result<Self, AttributeError> {
        if fragments.is_empty() {
            return Err(AttributeError::NoFragments);
        }
        if let Some(long) = fragments.iter().find(|f| f.len() > Self::MAX_FRAGMENT_LEN) {
            return Err(AttributeError::ValueTooLong {
                len: long.len(),
                max: Self::MAX_FRAGMENT_LEN,
            });
        }
        Ok(ConcatData { fragments })
    }

    /// Splits `value` into maximum-size fragments. An empty value is one
    /// empty fragment.
    pub fn from_bytes(value: &[u8]) -> Self {
        let fragments = if value.is_empty() {
            vec![Vec::new()]
        } else {
            value
                .chunks(Self::MAX_FRAGMENT_LEN)
                .map(|chunk| chunk.to_vec())
                .collect()
        };
        ConcatData { fragments }
    }

    pub fn fragments(&self) -> &[Vec<u8>] {
        &self.fragments
    }

    /// Reassembled value
    pub fn value(&self) -> Vec<u8> {
        self.fragments.concat()
    }

    pub fn len(&self) -> usize {
        self.fragments.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
