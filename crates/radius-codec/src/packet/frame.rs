use super::{Packet, PacketError};
use crate::attributes::RawAttribute;
use std::io::{Cursor, Read, Write};

/// Header and attribute records of one packet, checked for framing errors
/// but not yet authenticated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Frame {
    pub code: u8,
    pub identifier: u8,
    pub authenticator: [u8; 16],
    pub records: Vec<RawAttribute>,
}

impl Frame {
    /// Split `data` into header and attribute records.
    ///
    /// The declared length must equal `data.len()`, lie between
    /// [`Packet::MIN_PACKET_SIZE`] and `max_size`, and every record must fit.
    pub fn parse(data: &[u8], max_size: usize) -> Result<Self, PacketError> {
        if data.len() < Packet::MIN_PACKET_SIZE {
            return Err(PacketError::InvalidLength(data.len()));
        }
        if data.len() > max_size {
            return Err(PacketError::PacketTooLarge {
                len: data.len(),
                max: max_size,
            });
        }

        let mut cursor = Cursor::new(data);

        let mut header = [0u8; 4];
        cursor.read_exact(&mut header)?;
        let declared = usize::from(u16::from_be_bytes([header[2], header[3]]));

        if declared < Packet::MIN_PACKET_SIZE {
            return Err(PacketError::InvalidLength(declared));
        }
        if declared != data.len() {
            return Err(PacketError::LengthMismatch {
                declared,
                actual: data.len(),
            });
        }

        let mut authenticator = [0u8; 16];
        cursor.read_exact(&mut authenticator)?;

        let mut records = Vec::new();
        let mut offset = Packet::MIN_PACKET_SIZE;
        while offset < data.len() {
            let record = RawAttribute::decode_at(data, offset)?;
            offset += record.encoded_len();
            records.push(record);
        }

        Ok(Frame {
            code: header[0],
            identifier: header[1],
            authenticator,
            records,
        })
    }

    /// Serialize header and records, filling in the length field.
    pub fn encode(&self, max_size: usize) -> Result<Vec<u8>, PacketError> {
        let total_length = Packet::MIN_PACKET_SIZE
            + self
                .records
                .iter()
                .map(RawAttribute::encoded_len)
                .sum::<usize>();
        if total_length > max_size {
            return Err(PacketError::PacketTooLarge {
                len: total_length,
                max: max_size,
            });
        }
        // max_size never exceeds the 16-bit length field
        let length = u16::try_from(total_length).map_err(|_| PacketError::PacketTooLarge {
            len: total_length,
            max: usize::from(u16::MAX),
        })?;

        let mut buffer = Vec::with_capacity(total_length);
        buffer.write_all(&[self.code, self.identifier])?;
        buffer.write_all(&length.to_be_bytes())?;
        buffer.write_all(&self.authenticator)?;
        for record in &self.records {
            record.write_to(&mut buffer);
        }

        Ok(buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(code: u8, length: u16) -> Vec<u8> {
        let mut bytes = vec![code, 9];
        bytes.extend_from_slice(&length.to_be_bytes());
        bytes.extend_from_slice(&[0x11; 16]);
        bytes
    }

    #[test]
    fn test_frame_encode_decode() {
        let frame = Frame {
            code: 1,
            identifier: 42,
            authenticator: [7; 16],
            records: vec![
                RawAttribute::new(1, b"nemo".to_vec()).unwrap(),
                RawAttribute::new(5, vec![0, 0, 0, 3]).unwrap(),
            ],
        };
        let bytes = frame.encode(Packet::MAX_PACKET_SIZE).unwrap();
        assert_eq!(bytes.len(), 32);
        assert_eq!(&bytes[..4], &[1, 42, 0, 32]);

        assert_eq!(Frame::parse(&bytes, Packet::MAX_PACKET_SIZE).unwrap(), frame);
    }

    #[test]
    fn test_packet_min_size() {
        let result = Frame::parse(&[0u8; 10], Packet::MAX_PACKET_SIZE);
        assert!(matches!(result, Err(PacketError::InvalidLength(10))));

        let result = Frame::parse(&header(1, 19), Packet::MAX_PACKET_SIZE);
        assert!(matches!(result, Err(PacketError::InvalidLength(19))));
    }

    #[test]
    fn test_declared_length_mismatch() {
        let mut bytes = header(1, 26);
        bytes.extend_from_slice(&[1, 4, b'a', b'b']);
        assert!(matches!(
            Frame::parse(&bytes, Packet::MAX_PACKET_SIZE),
            Err(PacketError::LengthMismatch {
                declared: 26,
                actual: 24
            })
        ));
    }

    #[test]
    fn test_bad_attribute_record() {
        // Length byte below 2
        let mut bytes = header(1, 23);
        bytes.extend_from_slice(&[1, 1, 0]);
        assert!(matches!(
            Frame::parse(&bytes, Packet::MAX_PACKET_SIZE),
            Err(PacketError::MalformedAttribute { offset: 20, .. })
        ));

        // Record overruns the packet
        let mut bytes = header(1, 24);
        bytes.extend_from_slice(&[1, 6, b'a', b'b']);
        assert!(matches!(
            Frame::parse(&bytes, Packet::MAX_PACKET_SIZE),
            Err(PacketError::MalformedAttribute { offset: 20, .. })
        ));

        // Single trailing octet
        let mut bytes = header(1, 21);
        bytes.push(1);
        assert!(matches!(
            Frame::parse(&bytes, Packet::MAX_PACKET_SIZE),
            Err(PacketError::MalformedAttribute { offset: 20, .. })
        ));
    }

    #[test]
    fn test_packet_too_large() {
        let frame = Frame {
            code: 1,
            identifier: 0,
            authenticator: [0; 16],
            records: vec![RawAttribute::new(26, vec![0; 253]).unwrap(); 20],
        };
        assert!(matches!(
            frame.encode(Packet::MAX_PACKET_SIZE),
            Err(PacketError::PacketTooLarge { len: 5120, max: 4096 })
        ));
        let bytes = frame.encode(65535).unwrap();
        assert!(matches!(
            Frame::parse(&bytes, 4096),
            Err(PacketError::PacketTooLarge { len: 5120, .. })
        ));
    }
}
