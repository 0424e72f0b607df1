use crate::data::{DataFilter, DataType};

/// Well-known top-level RADIUS attribute numbers.
///
/// Covers RFC 2865, 2866, 2868, 2869, 3162, 3579, 6911 and the RFC 6929
/// extended attribute space. The standard dictionary is built from this table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum KnownAttribute {
    /// User-Name (1) - RFC 2865
    UserName = 1,
    /// User-Password (2) - RFC 2865
    UserPassword = 2,
    /// CHAP-Password (3) - RFC 2865
    ChapPassword = 3,
    /// NAS-IP-Address (4) - RFC 2865
    NasIpAddress = 4,
    /// NAS-Port (5) - RFC 2865
    NasPort = 5,
    /// Service-Type (6) - RFC 2865
    ServiceType = 6,
    /// Framed-Protocol (7) - RFC 2865
    FramedProtocol = 7,
    /// Framed-IP-Address (8) - RFC 2865
    FramedIpAddress = 8,
    /// Framed-IP-Netmask (9) - RFC 2865
    FramedIpNetmask = 9,
    /// Framed-Routing (10) - RFC 2865
    FramedRouting = 10,
    /// Filter-Id (11) - RFC 2865
    FilterId = 11,
    /// Framed-MTU (12) - RFC 2865
    FramedMtu = 12,
    /// Framed-Compression (13) - RFC 2865
    FramedCompression = 13,
    /// Login-IP-Host (14) - RFC 2865
    LoginIpHost = 14,
    /// Login-Service (15) - RFC 2865
    LoginService = 15,
    /// Login-TCP-Port (16) - RFC 2865
    LoginTcpPort = 16,
    /// Reply-Message (18) - RFC 2865
    ReplyMessage = 18,
    /// Callback-Number (19) - RFC 2865
    CallbackNumber = 19,
    /// Callback-Id (20) - RFC 2865
    CallbackId = 20,
    /// Framed-Route (22) - RFC 2865
    FramedRoute = 22,
    /// Framed-IPX-Network (23) - RFC 2865
    FramedIpxNetwork = 23,
    /// State (24) - RFC 2865
    State = 24,
    /// Class (25) - RFC 2865
    Class = 25,
    /// Vendor-Specific (26) - RFC 2865
    VendorSpecific = 26,
    /// Session-Timeout (27) - RFC 2865
    SessionTimeout = 27,
    /// Idle-Timeout (28) - RFC 2865
    IdleTimeout = 28,
    /// Termination-Action (29) - RFC 2865
    TerminationAction = 29,
    /// Called-Station-Id (30) - RFC 2865
    CalledStationId = 30,
    /// Calling-Station-Id (31) - RFC 2865
    CallingStationId = 31,
    /// NAS-Identifier (32) - RFC 2865
    NasIdentifier = 32,
    /// Proxy-State (33) - RFC 2865
    ProxyState = 33,
    /// Login-LAT-Service (34) - RFC 2865
    LoginLatService = 34,
    /// Login-LAT-Node (35) - RFC 2865
    LoginLatNode = 35,
    /// Login-LAT-Group (36) - RFC 2865
    LoginLatGroup = 36,
    /// Framed-AppleTalk-Link (37) - RFC 2865
    FramedAppleTalkLink = 37,
    /// Framed-AppleTalk-Network (38) - RFC 2865
    FramedAppleTalkNetwork = 38,
    /// Framed-AppleTalk-Zone (39) - RFC 2865
    FramedAppleTalkZone = 39,
    /// Acct-Status-Type (40) - RFC 2866
    AcctStatusType = 40,
    /// Acct-Delay-Time (41) - RFC 2866
    AcctDelayTime = 41,
    /// Acct-Input-Octets (42) - RFC 2866
    AcctInputOctets = 42,
    /// Acct-Output-Octets (43) - RFC 2866
    AcctOutputOctets = 43,
    /// Acct-Session-Id (44) - RFC 2866
    AcctSessionId = 44,
    /// Acct-Authentic (45) - RFC 2866
    AcctAuthentic = 45,
    /// Acct-Session-Time (46) - RFC 2866
    AcctSessionTime = 46,
    /// Acct-Input-Packets (47) - RFC 2866
    AcctInputPackets = 47,
    /// Acct-Output-Packets (48) - RFC 2866
    AcctOutputPackets = 48,
    /// Acct-Terminate-Cause (49) - RFC 2866
    AcctTerminateCause = 49,
    /// Acct-Multi-Session-Id (50) - RFC 2866
    AcctMultiSessionId = 50,
    /// Acct-Link-Count (51) - RFC 2866
    AcctLinkCount = 51,
    /// Acct-Input-Gigawords (52) - RFC 2869
    AcctInputGigawords = 52,
    /// Acct-Output-Gigawords (53) - RFC 2869
    AcctOutputGigawords = 53,
    /// Event-Timestamp (55) - RFC 2869
    EventTimestamp = 55,
    /// CHAP-Challenge (60) - RFC 2865
    ChapChallenge = 60,
    /// NAS-Port-Type (61) - RFC 2865
    NasPortType = 61,
    /// Port-Limit (62) - RFC 2865
    PortLimit = 62,
    /// Login-LAT-Port (63) - RFC 2865
    LoginLatPort = 63,
    /// Tunnel-Type (64) - RFC 2868
    TunnelType = 64,
    /// Tunnel-Medium-Type (65) - RFC 2868
    TunnelMediumType = 65,
    /// Tunnel-Client-Endpoint (66) - RFC 2868
    TunnelClientEndpoint = 66,
    /// Tunnel-Server-Endpoint (67) - RFC 2868
    TunnelServerEndpoint = 67,
    /// Tunnel-Password (69) - RFC 2868
    TunnelPassword = 69,
    /// Connect-Info (77) - RFC 2869
    ConnectInfo = 77,
    /// EAP-Message (79) - RFC 3579
    /// Encapsulates EAP packets, split over several attributes when long
    EapMessage = 79,
    /// Message-Authenticator (80) - RFC 2869
    MessageAuthenticator = 80,
    /// Tunnel-Private-Group-Id (81) - RFC 2868
    TunnelPrivateGroupId = 81,
    /// Tunnel-Assignment-Id (82) - RFC 2868
    TunnelAssignmentId = 82,
    /// Tunnel-Preference (83) - RFC 2868
    TunnelPreference = 83,
    /// Acct-Interim-Interval (85) - RFC 2869
    AcctInterimInterval = 85,
    /// NAS-Port-Id (87) - RFC 2869
    NasPortId = 87,
    /// Framed-Pool (88) - RFC 2869
    FramedPool = 88,
    /// Tunnel-Client-Auth-Id (90) - RFC 2868
    TunnelClientAuthId = 90,
    /// Tunnel-Server-Auth-Id (91) - RFC 2868
    TunnelServerAuthId = 91,
    /// NAS-IPv6-Address (95) - RFC 3162
    NasIpv6Address = 95,
    /// Framed-Interface-Id (96) - RFC 3162
    FramedInterfaceId = 96,
    /// Framed-IPv6-Prefix (97) - RFC 3162
    FramedIpv6Prefix = 97,
    /// Login-IPv6-Host (98) - RFC 3162
    LoginIpv6Host = 98,
    /// Framed-IPv6-Route (99) - RFC 3162
    FramedIpv6Route = 99,
    /// Framed-IPv6-Pool (100) - RFC 3162
    FramedIpv6Pool = 100,
    /// Framed-IPv6-Address (168) - RFC 6911
    FramedIpv6Address = 168,
    /// Extended-Attribute-1 (241) - RFC 6929
    ExtendedAttribute1 = 241,
    /// Extended-Attribute-2 (242) - RFC 6929
    ExtendedAttribute2 = 242,
    /// Extended-Attribute-3 (243) - RFC 6929
    ExtendedAttribute3 = 243,
    /// Extended-Attribute-4 (244) - RFC 6929
    ExtendedAttribute4 = 244,
    /// Extended-Attribute-5 (245) - RFC 6929, long extended format
    ExtendedAttribute5 = 245,
    /// Extended-Attribute-6 (246) - RFC 6929, long extended format
    ExtendedAttribute6 = 246,
}

impl KnownAttribute {
    pub const ALL: &'static [KnownAttribute] = &[
        KnownAttribute::UserName,
        KnownAttribute::UserPassword,
        KnownAttribute::ChapPassword,
        KnownAttribute::NasIpAddress,
        KnownAttribute::NasPort,
        KnownAttribute::ServiceType,
        KnownAttribute::FramedProtocol,
        KnownAttribute::FramedIpAddress,
        KnownAttribute::FramedIpNetmask,
        KnownAttribute::FramedRouting,
        KnownAttribute::FilterId,
        KnownAttribute::FramedMtu,
        KnownAttribute::FramedCompression,
        KnownAttribute::LoginIpHost,
        KnownAttribute::LoginService,
        KnownAttribute::LoginTcpPort,
        KnownAttribute::ReplyMessage,
        KnownAttribute::CallbackNumber,
        KnownAttribute::CallbackId,
        KnownAttribute::FramedRoute,
        KnownAttribute::FramedIpxNetwork,
        KnownAttribute::State,
        KnownAttribute::Class,
        KnownAttribute::VendorSpecific,
        KnownAttribute::SessionTimeout,
        KnownAttribute::IdleTimeout,
        KnownAttribute::TerminationAction,
        KnownAttribute::CalledStationId,
        KnownAttribute::CallingStationId,
        KnownAttribute::NasIdentifier,
        KnownAttribute::ProxyState,
        KnownAttribute::LoginLatService,
        KnownAttribute::LoginLatNode,
        KnownAttribute::LoginLatGroup,
        KnownAttribute::FramedAppleTalkLink,
        KnownAttribute::FramedAppleTalkNetwork,
        KnownAttribute::FramedAppleTalkZone,
        KnownAttribute::AcctStatusType,
        KnownAttribute::AcctDelayTime,
        KnownAttribute::AcctInputOctets,
        KnownAttribute::AcctOutputOctets,
        KnownAttribute::AcctSessionId,
        KnownAttribute::AcctAuthentic,
        KnownAttribute::AcctSessionTime,
        KnownAttribute::AcctInputPackets,
        KnownAttribute::AcctOutputPackets,
        KnownAttribute::AcctTerminateCause,
        KnownAttribute::AcctMultiSessionId,
        KnownAttribute::AcctLinkCount,
        KnownAttribute::AcctInputGigawords,
        KnownAttribute::AcctOutputGigawords,
        KnownAttribute::EventTimestamp,
        KnownAttribute::ChapChallenge,
        KnownAttribute::NasPortType,
        KnownAttribute::PortLimit,
        KnownAttribute::LoginLatPort,
        KnownAttribute::TunnelType,
        KnownAttribute::TunnelMediumType,
        KnownAttribute::TunnelClientEndpoint,
        KnownAttribute::TunnelServerEndpoint,
        KnownAttribute::TunnelPassword,
        KnownAttribute::ConnectInfo,
        KnownAttribute::EapMessage,
        KnownAttribute::MessageAuthenticator,
        KnownAttribute::TunnelPrivateGroupId,
        KnownAttribute::TunnelAssignmentId,
        KnownAttribute::TunnelPreference,
        KnownAttribute::AcctInterimInterval,
        KnownAttribute::NasPortId,
        KnownAttribute::FramedPool,
        KnownAttribute::TunnelClientAuthId,
        KnownAttribute::TunnelServerAuthId,
        KnownAttribute::NasIpv6Address,
        KnownAttribute::FramedInterfaceId,
        KnownAttribute::FramedIpv6Prefix,
        KnownAttribute::LoginIpv6Host,
        KnownAttribute::FramedIpv6Route,
        KnownAttribute::FramedIpv6Pool,
        KnownAttribute::FramedIpv6Address,
        KnownAttribute::ExtendedAttribute1,
        KnownAttribute::ExtendedAttribute2,
        KnownAttribute::ExtendedAttribute3,
        KnownAttribute::ExtendedAttribute4,
        KnownAttribute::ExtendedAttribute5,
        KnownAttribute::ExtendedAttribute6,
    ];

    pub fn from_u8(value: u8) -> Option<Self> {
        Self::ALL.iter().copied().find(|known| known.as_u8() == value)
    }

    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Dictionary name as used in the RFCs
    pub fn name(self) -> &'static str {
        match self {
            KnownAttribute::UserName => "User-Name",
            KnownAttribute::UserPassword => "User-Password",
            KnownAttribute::ChapPassword => "CHAP-Password",
            KnownAttribute::NasIpAddress => "NAS-IP-Address",
            KnownAttribute::NasPort => "NAS-Port",
            KnownAttribute::ServiceType => "Service-Type",
            KnownAttribute::FramedProtocol => "Framed-Protocol",
            KnownAttribute::FramedIpAddress => "Framed-IP-Address",
            KnownAttribute::FramedIpNetmask => "Framed-IP-Netmask",
            KnownAttribute::FramedRouting => "Framed-Routing",
            KnownAttribute::FilterId => "Filter-Id",
            KnownAttribute::FramedMtu => "Framed-MTU",
            KnownAttribute::FramedCompression => "Framed-Compression",
            KnownAttribute::LoginIpHost => "Login-IP-Host",
            KnownAttribute::LoginService => "Login-Service",
            KnownAttribute::LoginTcpPort => "Login-TCP-Port",
            KnownAttribute::ReplyMessage => "Reply-Message",
            KnownAttribute::CallbackNumber => "Callback-Number",
            KnownAttribute::CallbackId => "Callback-Id",
            KnownAttribute::FramedRoute => "Framed-Route",
            KnownAttribute::FramedIpxNetwork => "Framed-IPX-Network",
            KnownAttribute::State => "State",
            KnownAttribute::Class => "Class",
            KnownAttribute::VendorSpecific => "Vendor-Specific",
            KnownAttribute::SessionTimeout => "Session-Timeout",
            KnownAttribute::IdleTimeout => "Idle-Timeout",
            KnownAttribute::TerminationAction => "Termination-Action",
            KnownAttribute::CalledStationId => "Called-Station-Id",
            KnownAttribute::CallingStationId => "Calling-Station-Id",
            KnownAttribute::NasIdentifier => "NAS-Identifier",
            KnownAttribute::ProxyState => "Proxy-State",
            KnownAttribute::LoginLatService => "Login-LAT-Service",
            KnownAttribute::LoginLatNode => "Login-LAT-Node",
            KnownAttribute::LoginLatGroup => "Login-LAT-Group",
            KnownAttribute::FramedAppleTalkLink => "Framed-AppleTalk-Link",
            KnownAttribute::FramedAppleTalkNetwork => "Framed-AppleTalk-Network",
            KnownAttribute::FramedAppleTalkZone => "Framed-AppleTalk-Zone",
            KnownAttribute::AcctStatusType => "Acct-Status-Type",
            KnownAttribute::AcctDelayTime => "Acct-Delay-Time",
            KnownAttribute::AcctInputOctets => "Acct-Input-Octets",
            KnownAttribute::AcctOutputOctets => "Acct-Output-Octets",
            KnownAttribute::AcctSessionId => "Acct-Session-Id",
            KnownAttribute::AcctAuthentic => "Acct-Authentic",
            KnownAttribute::AcctSessionTime => "Acct-Session-Time",
            KnownAttribute::AcctInputPackets => "Acct-Input-Packets",
            KnownAttribute::AcctOutputPackets => "Acct-Output-Packets",
            KnownAttribute::AcctTerminateCause => "Acct-Terminate-Cause",
            KnownAttribute::AcctMultiSessionId => "Acct-Multi-Session-Id",
            KnownAttribute::AcctLinkCount => "Acct-Link-Count",
            KnownAttribute::AcctInputGigawords => "Acct-Input-Gigawords",
            KnownAttribute::AcctOutputGigawords => "Acct-Output-Gigawords",
            KnownAttribute::EventTimestamp => "Event-Timestamp",
            KnownAttribute::ChapChallenge => "CHAP-Challenge",
            KnownAttribute::NasPortType => "NAS-Port-Type",
            KnownAttribute::PortLimit => "Port-Limit",
            KnownAttribute::LoginLatPort => "Login-LAT-Port",
            KnownAttribute::TunnelType => "Tunnel-Type",
            KnownAttribute::TunnelMediumType => "Tunnel-Medium-Type",
            KnownAttribute::TunnelClientEndpoint => "Tunnel-Client-Endpoint",
            KnownAttribute::TunnelServerEndpoint => "Tunnel-Server-Endpoint",
            KnownAttribute::TunnelPassword => "Tunnel-Password",
            KnownAttribute::ConnectInfo => "Connect-Info",
            KnownAttribute::EapMessage => "EAP-Message",
            KnownAttribute::MessageAuthenticator => "Message-Authenticator",
            KnownAttribute::TunnelPrivateGroupId => "Tunnel-Private-Group-Id",
            KnownAttribute::TunnelAssignmentId => "Tunnel-Assignment-Id",
            KnownAttribute::TunnelPreference => "Tunnel-Preference",
            KnownAttribute::AcctInterimInterval => "Acct-Interim-Interval",
            KnownAttribute::NasPortId => "NAS-Port-Id",
            KnownAttribute::FramedPool => "Framed-Pool",
            KnownAttribute::TunnelClientAuthId => "Tunnel-Client-Auth-Id",
            KnownAttribute::TunnelServerAuthId => "Tunnel-Server-Auth-Id",
            KnownAttribute::NasIpv6Address => "NAS-IPv6-Address",
            KnownAttribute::FramedInterfaceId => "Framed-Interface-Id",
            KnownAttribute::FramedIpv6Prefix => "Framed-IPv6-Prefix",
            KnownAttribute::LoginIpv6Host => "Login-IPv6-Host",
            KnownAttribute::FramedIpv6Route => "Framed-IPv6-Route",
            KnownAttribute::FramedIpv6Pool => "Framed-IPv6-Pool",
            KnownAttribute::FramedIpv6Address => "Framed-IPv6-Address",
            KnownAttribute::ExtendedAttribute1 => "Extended-Attribute-1",
            KnownAttribute::ExtendedAttribute2 => "Extended-Attribute-2",
            KnownAttribute::ExtendedAttribute3 => "Extended-Attribute-3",
            KnownAttribute::ExtendedAttribute4 => "Extended-Attribute-4",
            KnownAttribute::ExtendedAttribute5 => "Extended-Attribute-5",
            KnownAttribute::ExtendedAttribute6 => "Extended-Attribute-6",
        }
    }

    /// Wire data type of the attribute value
    pub fn data_type(self) -> DataType {
        use KnownAttribute::*;
        match self {
            UserName | FilterId | ReplyMessage | CallbackNumber | CallbackId | FramedRoute
            | CalledStationId | CallingStationId | NasIdentifier | LoginLatService
            | LoginLatNode | LoginLatGroup | FramedAppleTalkZone | AcctSessionId
            | AcctMultiSessionId | LoginLatPort | ConnectInfo | NasPortId | FramedPool
            | FramedIpv6Route | FramedIpv6Pool => DataType::Text,

            UserPassword | ChapPassword | State | Class | ProxyState | ChapChallenge
            | MessageAuthenticator => DataType::String,

            NasPort | FramedMtu | LoginTcpPort | FramedIpxNetwork | SessionTimeout
            | IdleTimeout | FramedAppleTalkLink | FramedAppleTalkNetwork | AcctDelayTime
            | AcctInputOctets | AcctOutputOctets | AcctSessionTime | AcctInputPackets
            | AcctOutputPackets | AcctLinkCount | AcctInputGigawords | AcctOutputGigawords
            | PortLimit | AcctInterimInterval => DataType::Integer,

            ServiceType | FramedProtocol | FramedRouting | FramedCompression | LoginService
            | TerminationAction | AcctStatusType | AcctAuthentic | AcctTerminateCause
            | NasPortType => DataType::Enum,

            EventTimestamp => DataType::Time,

            NasIpAddress | FramedIpAddress | FramedIpNetmask | LoginIpHost => DataType::Ipv4Addr,
            NasIpv6Address | LoginIpv6Host | FramedIpv6Address => DataType::Ipv6Addr,
            FramedIpv6Prefix => DataType::Ipv6Prefix,
            FramedInterfaceId => DataType::Ifid,

            TunnelType | TunnelMediumType | TunnelPreference => DataType::TaggedInteger,
            TunnelPassword => DataType::TaggedString,
            TunnelClientEndpoint | TunnelServerEndpoint | TunnelPrivateGroupId
            | TunnelAssignmentId | TunnelClientAuthId | TunnelServerAuthId => {
                DataType::OptionalTaggedText
            }

            EapMessage => DataType::Concat,
            VendorSpecific => DataType::Vsa,
            ExtendedAttribute1 | ExtendedAttribute2 | ExtendedAttribute3 | ExtendedAttribute4 => {
                DataType::Extended
            }
            ExtendedAttribute5 | ExtendedAttribute6 => DataType::LongExtended,
        }
    }

    /// Obfuscation applied to the value on the wire, if any
    pub fn filter(self) -> Option<DataFilter> {
        match self {
            KnownAttribute::UserPassword => Some(DataFilter::UserPassword),
            KnownAttribute::TunnelPassword => Some(DataFilter::TunnelPassword),
            _ => None,
        }
    }
}

impl From<KnownAttribute> for u8 {
    fn from(known: KnownAttribute) -> u8 {
        known.as_u8()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_u8_round_trip() {
        for known in KnownAttribute::ALL {
            assert_eq!(KnownAttribute::from_u8(known.as_u8()), Some(*known));
        }
        assert_eq!(KnownAttribute::from_u8(17), None);
    }

    #[test]
    fn test_password_filters() {
        assert_eq!(
            KnownAttribute::UserPassword.filter(),
            Some(DataFilter::UserPassword)
        );
        assert_eq!(
            KnownAttribute::TunnelPassword.data_type(),
            DataType::TaggedString
        );
        assert_eq!(KnownAttribute::UserName.filter(), None);
    }
}
