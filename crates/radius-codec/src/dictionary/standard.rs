use super::{AttributeDefinition, AuthenticatorKind, MemoryDictionary, PacketDefinition};
use crate::attributes::{AttributeType, KnownAttribute};
use crate::codec::AttributeCodec;
use crate::data::DataType;

/// Value names of the RFC enumerations
const VALUES: &[(KnownAttribute, &[(&str, i32)])] = &[
    (
        KnownAttribute::ServiceType,
        &[
            ("Login-User", 1),
            ("Framed-User", 2),
            ("Callback-Login-User", 3),
            ("Callback-Framed-User", 4),
            ("Outbound-User", 5),
            ("Administrative-User", 6),
            ("NAS-Prompt-User", 7),
            ("Authenticate-Only", 8),
            ("Callback-NAS-Prompt", 9),
            ("Call-Check", 10),
            ("Callback-Administrative", 11),
        ],
    ),
    (
        KnownAttribute::FramedProtocol,
        &[
            ("PPP", 1),
            ("SLIP", 2),
            ("ARAP", 3),
            ("Gandalf-SLML", 4),
            ("Xylogics-IPX-SLIP", 5),
            ("X.75-Synchronous", 6),
        ],
    ),
    (
        KnownAttribute::FramedRouting,
        &[("None", 0), ("Broadcast", 1), ("Listen", 2), ("Broadcast-Listen", 3)],
    ),
    (
        KnownAttribute::FramedCompression,
        &[
            ("None", 0),
            ("Van-Jacobson-TCP-IP", 1),
            ("IPX-Header-Compression", 2),
            ("Stac-LZS", 3),
        ],
    ),
    (
        KnownAttribute::LoginService,
        &[
            ("Telnet", 0),
            ("Rlogin", 1),
            ("TCP-Clear", 2),
            ("PortMaster", 3),
            ("LAT", 4),
            ("X25-PAD", 5),
            ("X25-T3POS", 6),
            ("TCP-Clear-Quiet", 8),
        ],
    ),
    (
        KnownAttribute::TerminationAction,
        &[("Default", 0), ("RADIUS-Request", 1)],
    ),
    (
        KnownAttribute::AcctStatusType,
        &[
            ("Start", 1),
            ("Stop", 2),
            ("Interim-Update", 3),
            ("Accounting-On", 7),
            ("Accounting-Off", 8),
        ],
    ),
    (
        KnownAttribute::AcctAuthentic,
        &[("RADIUS", 1), ("Local", 2), ("Remote", 3)],
    ),
    (
        KnownAttribute::AcctTerminateCause,
        &[
            ("User-Request", 1),
            ("Lost-Carrier", 2),
            ("Lost-Service", 3),
            ("Idle-Timeout", 4),
            ("Session-Timeout", 5),
            ("Admin-Reset", 6),
            ("Admin-Reboot", 7),
            ("Port-Error", 8),
            ("NAS-Error", 9),
            ("NAS-Request", 10),
            ("NAS-Reboot", 11),
            ("Port-Unneeded", 12),
            ("Port-Preempted", 13),
            ("Port-Suspended", 14),
            ("Service-Unavailable", 15),
            ("Callback", 16),
            ("User-Error", 17),
            ("Host-Request", 18),
        ],
    ),
    (
        KnownAttribute::NasPortType,
        &[
            ("Async", 0),
            ("Sync", 1),
            ("ISDN", 2),
            ("ISDN-V120", 3),
            ("ISDN-V110", 4),
            ("Virtual", 5),
            ("PIAFS", 6),
            ("HDLC-Clear-Channel", 7),
            ("X.25", 8),
            ("X.75", 9),
            ("G.3-Fax", 10),
            ("SDSL", 11),
            ("ADSL-CAP", 12),
            ("ADSL-DMT", 13),
            ("IDSL", 14),
            ("Ethernet", 15),
            ("xDSL", 16),
            ("Cable", 17),
            ("Wireless-Other", 18),
            ("Wireless-802.11", 19),
        ],
    ),
    (
        KnownAttribute::TunnelType,
        &[
            ("PPTP", 1),
            ("L2F", 2),
            ("L2TP", 3),
            ("ATMP", 4),
            ("VTP", 5),
            ("AH", 6),
            ("IP-IP", 7),
            ("MIN-IP-IP", 8),
            ("ESP", 9),
            ("GRE", 10),
            ("DVS", 11),
            ("IP-in-IP", 12),
            ("VLAN", 13),
        ],
    ),
    (
        KnownAttribute::TunnelMediumType,
        &[
            ("IPv4", 1),
            ("IPv6", 2),
            ("NSAP", 3),
            ("HDLC", 4),
            ("BBN-1822", 5),
            ("IEEE-802", 6),
            ("E.163", 7),
            ("E.164", 8),
            ("F.69", 9),
            ("X.121", 10),
            ("IPX", 11),
            ("Appletalk", 12),
            ("DecNet-IV", 13),
            ("Banyan-Vines", 14),
            ("E.164-NSAP", 15),
        ],
    ),
];

/// RFC 2865, 2866, 3576/5176 packet codes
const PACKETS: &[(u8, &str, AuthenticatorKind)] = &[
    (1, "Access-Request", AuthenticatorKind::Random),
    (2, "Access-Accept", AuthenticatorKind::Response),
    (3, "Access-Reject", AuthenticatorKind::Response),
    (4, "Accounting-Request", AuthenticatorKind::Hashed),
    (5, "Accounting-Response", AuthenticatorKind::Response),
    (11, "Access-Challenge", AuthenticatorKind::Response),
    (12, "Status-Server", AuthenticatorKind::Random),
    (13, "Status-Client", AuthenticatorKind::Random),
    (40, "Disconnect-Request", AuthenticatorKind::Hashed),
    (41, "Disconnect-ACK", AuthenticatorKind::Response),
    (42, "Disconnect-NAK", AuthenticatorKind::Response),
    (43, "CoA-Request", AuthenticatorKind::Hashed),
    (44, "CoA-ACK", AuthenticatorKind::Response),
    (45, "CoA-NAK", AuthenticatorKind::Response),
];

impl MemoryDictionary {
    /// Dictionary preloaded with the standard RFC attributes, enumeration
    /// values and packet codes.
    ///
    /// Includes the Extended-Vendor-Specific containers (`241.26` to
    /// `246.26`) and the RFC 7499 fragmentation attributes, but no vendor
    /// attributes.
    pub fn standard() -> Self {
        let mut dict = MemoryDictionary::new();

        for &known in KnownAttribute::ALL {
            let data_type = known.data_type();
            let codec = match data_type {
                DataType::LongExtended => AttributeCodec::Fragmented,
                DataType::Concat => AttributeCodec::Concat,
                _ => AttributeCodec::Standard,
            };
            dict.insert_attribute(AttributeDefinition {
                attr_type: AttributeType::new(known.as_u8()),
                name: known.name().to_string(),
                data_type,
                codec,
                filter: known.filter(),
            });
        }

        for (index, head) in (241u8..=246).enumerate() {
            let codec = if head >= 245 {
                AttributeCodec::LongExtended
            } else {
                AttributeCodec::Extended
            };
            dict.insert_attribute(AttributeDefinition {
                attr_type: AttributeType::new(head).with(&[26]),
                name: format!("Extended-Vendor-Specific-{}", index + 1),
                data_type: DataType::Evs,
                codec,
                filter: None,
            });
        }

        for (ext_type, name) in [(1, "Frag-Status"), (2, "Proxy-State-Length")] {
            dict.insert_attribute(AttributeDefinition {
                attr_type: AttributeType::new(KnownAttribute::ExtendedAttribute1.as_u8())
                    .with(&[ext_type]),
                name: name.to_string(),
                data_type: DataType::Integer,
                codec: AttributeCodec::Extended,
                filter: None,
            });
        }

        for (known, values) in VALUES {
            let attr_type = AttributeType::new(known.as_u8());
            for &(name, value) in values.iter() {
                dict.insert_value(&attr_type, name, value);
            }
        }

        for &(code, name, authenticator) in PACKETS {
            dict.insert_packet(PacketDefinition {
                code,
                name: name.to_string(),
                authenticator,
            });
        }

        dict
    }
}
