//! Attribute codec engine.
//!
//! [`AttributeStack`] turns the flat list of raw records of a packet into a
//! tree of typed attributes and back. Each dictionary entry names an
//! [`AttributeCodec`] that performs one step over the front of the worklist.

mod attribute;
mod context;
mod stack;

pub use attribute::AttributeCodec;
pub use context::{CodecContext, RandomSource, SystemRandom};
pub use stack::AttributeStack;
