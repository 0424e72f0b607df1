pub mod attribute;
pub mod error;
pub mod known;
pub mod types;

pub use attribute::{
    Attribute, ConcatAttribute, ExtendedAttribute, LongExtendedAttribute, RawAttribute,
    StandardAttribute, VendorSpecificAttribute,
};
pub use error::AttributeError;
pub use known::KnownAttribute;
pub use types::AttributeType;
