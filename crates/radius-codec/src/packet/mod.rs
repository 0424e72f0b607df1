//! Packet framing and authentication.
//!
//! [`PacketCodec`] is the entry point for encoding and decoding whole
//! packets; it frames attribute records, runs the attribute stack, and
//! computes or checks the authenticators.

mod code;
mod codec;
mod frame;
mod id;
#[allow(clippy::module_inception)]
mod packet;

pub use code::Code;
pub use codec::{EncodedRequest, PacketCodec};
pub use id::PacketIdGenerator;
pub use packet::{Packet, PacketError, ReceivedFields};
