use super::frame::Frame;
use super::{Packet, PacketError, PacketIdGenerator, ReceivedFields};
use crate::attributes::KnownAttribute;
use crate::auth;
use crate::codec::{AttributeStack, CodecContext, RandomSource, SystemRandom};
use crate::config::CodecConfig;
use crate::dictionary::{AuthenticatorKind, Dictionary};
use crate::message_auth;
use std::sync::Arc;
use tracing::{debug, warn};

/// An encoded request together with the header fields needed to match and
/// verify its response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedRequest {
    pub identifier: u8,
    pub authenticator: [u8; 16],
    pub bytes: Vec<u8>,
}

/// Encodes and decodes whole packets.
///
/// Holds no per-packet state: one codec can serve any number of threads.
/// Packets whose code has no dictionary definition are handled as generic
/// requests with a random authenticator, or as responses.
#[derive(Clone)]
pub struct PacketCodec {
    dictionary: Arc<dyn Dictionary>,
    ids: Arc<PacketIdGenerator>,
    random: Arc<dyn RandomSource>,
    config: CodecConfig,
}

impl PacketCodec {
    pub fn new(dictionary: Arc<dyn Dictionary>) -> Self {
        PacketCodec {
            dictionary,
            ids: Arc::new(PacketIdGenerator::new()),
            random: Arc::new(SystemRandom),
            config: CodecConfig::default(),
        }
    }

    /// Share an identifier generator with other codecs on the same socket
    pub fn with_id_generator(mut self, ids: Arc<PacketIdGenerator>) -> Self {
        self.ids = ids;
        self
    }

    pub fn with_random(mut self, random: Arc<dyn RandomSource>) -> Self {
        self.random = random;
        self
    }

    pub fn with_config(mut self, config: CodecConfig) -> Self {
        self.config = config;
        self
    }

    pub fn dictionary(&self) -> &dyn Dictionary {
        &*self.dictionary
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Encode a request.
    ///
    /// The identifier comes from the codec's generator. `authenticator` is
    /// used as the request authenticator, or a random one is generated;
    /// it is ignored for packets with a hashed authenticator
    /// (Accounting-Request, Disconnect-Request, CoA-Request).
    pub fn encode_request(
        &self,
        packet: &Packet,
        secret: &[u8],
        authenticator: Option<[u8; 16]>,
    ) -> Result<EncodedRequest, PacketError> {
        let hashed = self.authenticator_kind(packet.code) == Some(AuthenticatorKind::Hashed);
        let header_auth = if hashed {
            [0u8; 16]
        } else {
            authenticator
                .unwrap_or_else(|| auth::generate_request_authenticator(&*self.random))
        };
        let identifier = self.ids.next_id();

        let mut bytes = self.encode_frame(packet, secret, identifier, header_auth)?;
        if hashed {
            let request_auth = auth::calculate_request_authenticator(&bytes, secret);
            bytes[4..20].copy_from_slice(&request_auth);
        }

        Ok(EncodedRequest {
            identifier,
            authenticator: bytes_authenticator(&bytes),
            bytes,
        })
    }

    /// Encode a response to the request with `request_id` and
    /// `request_authenticator`.
    pub fn encode_response(
        &self,
        packet: &Packet,
        secret: &[u8],
        request_id: u8,
        request_authenticator: &[u8; 16],
    ) -> Result<Vec<u8>, PacketError> {
        let mut bytes = self.encode_frame(packet, secret, request_id, *request_authenticator)?;
        let response_auth =
            auth::calculate_response_authenticator(&bytes, request_authenticator, secret);
        bytes[4..20].copy_from_slice(&response_auth);
        Ok(bytes)
    }

    /// Decode and authenticate a request.
    pub fn decode_request(&self, bytes: &[u8], secret: &[u8]) -> Result<Packet, PacketError> {
        let frame = Frame::parse(bytes, self.config.max_packet_size)?;
        let hashed = self.authenticator_kind(frame.code) == Some(AuthenticatorKind::Hashed);

        let context_auth = if hashed {
            if !auth::verify_request_authenticator(bytes, secret) {
                warn!(
                    code = frame.code,
                    identifier = frame.identifier,
                    "request authenticator mismatch"
                );
                return Err(PacketError::RequestAuthenticatorMismatch);
            }
            [0u8; 16]
        } else {
            frame.authenticator
        };

        let has_mic = self.check_message_authenticator(bytes, secret, &context_auth, &frame)?;
        if !has_mic && self.config.require_message_authenticator {
            warn!(
                code = frame.code,
                identifier = frame.identifier,
                "request without Message-Authenticator"
            );
            return Err(PacketError::MissingMessageAuthenticator);
        }

        Ok(self.decode_frame(frame, secret, context_auth))
    }

    /// Decode and authenticate the response to a request sent with
    /// `request_authenticator`.
    pub fn decode_response(
        &self,
        bytes: &[u8],
        secret: &[u8],
        request_authenticator: &[u8; 16],
    ) -> Result<Packet, PacketError> {
        let frame = Frame::parse(bytes, self.config.max_packet_size)?;

        if !auth::verify_response_authenticator(bytes, request_authenticator, secret) {
            warn!(
                code = frame.code,
                identifier = frame.identifier,
                "response authenticator mismatch"
            );
            return Err(PacketError::ResponseAuthenticatorMismatch);
        }

        self.check_message_authenticator(bytes, secret, request_authenticator, &frame)?;
        Ok(self.decode_frame(frame, secret, *request_authenticator))
    }

    fn authenticator_kind(&self, code: u8) -> Option<AuthenticatorKind> {
        self.dictionary
            .packet_definition(code)
            .map(|def| def.authenticator)
    }

    /// Encode the attributes and frame the packet with `header_auth` in the
    /// authenticator field, signing the Message-Authenticator if present.
    fn encode_frame(
        &self,
        packet: &Packet,
        secret: &[u8],
        identifier: u8,
        header_auth: [u8; 16],
    ) -> Result<Vec<u8>, PacketError> {
        let ctx = CodecContext::new(secret, header_auth, &*self.random);
        let stack = AttributeStack::new(ctx, &*self.dictionary);
        let records = stack.encode(packet.attributes.clone())?;

        let frame = Frame {
            code: packet.code,
            identifier,
            authenticator: header_auth,
            records,
        };
        let mut bytes = frame.encode(self.config.max_packet_size)?;

        if let Some(offset) = message_auth::find_message_authenticator(&bytes) {
            message_auth::sign_message_authenticator(&mut bytes, secret, offset);
        }
        Ok(bytes)
    }

    /// Verify the Message-Authenticator, if any, with `header_auth` in place
    /// of the received authenticator. Returns whether one was present.
    fn check_message_authenticator(
        &self,
        bytes: &[u8],
        secret: &[u8],
        header_auth: &[u8; 16],
        frame: &Frame,
    ) -> Result<bool, PacketError> {
        let Some(offset) = message_auth::find_message_authenticator(bytes) else {
            let eap = KnownAttribute::EapMessage.as_u8();
            if frame.records.iter().any(|r| r.attr_type() == eap) {
                warn!(
                    code = frame.code,
                    identifier = frame.identifier,
                    "EAP-Message without Message-Authenticator"
                );
                return Err(PacketError::MissingMessageAuthenticator);
            }
            return Ok(false);
        };

        let mut copy = bytes.to_vec();
        copy[4..20].copy_from_slice(header_auth);
        if !message_auth::verify_message_authenticator(&copy, secret, offset) {
            warn!(
                code = frame.code,
                identifier = frame.identifier,
                "Message-Authenticator mismatch"
            );
            return Err(PacketError::MessageAuthenticatorMismatch);
        }
        Ok(true)
    }

    fn decode_frame(&self, frame: Frame, secret: &[u8], context_auth: [u8; 16]) -> Packet {
        let ctx = CodecContext::new(secret, context_auth, &*self.random);
        let stack = AttributeStack::new(ctx, &*self.dictionary);
        let record_count = frame.records.len();
        let attributes = stack.decode(frame.records);

        let name = self
            .dictionary
            .packet_definition(frame.code)
            .map_or("unknown", |def| def.name.as_str());
        debug!(
            code = frame.code,
            kind = name,
            identifier = frame.identifier,
            records = record_count,
            attributes = attributes.len(),
            raw = attributes.iter().filter(|a| a.is_raw()).count(),
            "decoded packet"
        );

        Packet {
            code: frame.code,
            attributes,
            received: Some(ReceivedFields {
                identifier: frame.identifier,
                authenticator: frame.authenticator,
            }),
        }
    }
}

fn bytes_authenticator(bytes: &[u8]) -> [u8; 16] {
    let mut authenticator = [0u8; 16];
    authenticator.copy_from_slice(&bytes[4..20]);
    authenticator
}
