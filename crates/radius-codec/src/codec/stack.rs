use super::CodecContext;
use crate::attributes::{Attribute, AttributeType, RawAttribute};
use crate::dictionary::Dictionary;
use crate::packet::PacketError;
use std::collections::VecDeque;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pass {
    /// Promote raw records and reassemble fragment runs
    Promote,
    /// Decode the payloads of container attributes
    Expand,
}

/// Worklist engine that converts between raw records and typed attributes.
pub struct AttributeStack<'a> {
    ctx: CodecContext<'a>,
    dictionary: &'a dyn Dictionary,
}

impl<'a> AttributeStack<'a> {
    pub fn new(ctx: CodecContext<'a>, dictionary: &'a dyn Dictionary) -> Self {
        AttributeStack { ctx, dictionary }
    }

    pub fn context(&self) -> &CodecContext<'a> {
        &self.ctx
    }

    pub fn dictionary(&self) -> &'a dyn Dictionary {
        self.dictionary
    }

    /// Lower `attributes` to wire records, in order.
    ///
    /// Fails if an attribute, or a container it has to be wrapped in, has no
    /// dictionary entry, or if a value violates its encoding limits.
    pub fn encode(&self, attributes: Vec<Attribute>) -> Result<Vec<RawAttribute>, PacketError> {
        let mut pending: VecDeque<Attribute> = attributes.into();
        let mut output = Vec::with_capacity(pending.len());

        while let Some(attribute) = pending.pop_front() {
            let attribute = match attribute {
                Attribute::Raw(raw) => {
                    output.push(raw);
                    continue;
                }
                other => other,
            };
            let attr_type = attribute.attr_type();
            let Some(def) = self.dictionary.attribute_definition_by_type(&attr_type) else {
                return Err(PacketError::UnknownAttribute(attr_type));
            };
            def.codec.encode(self, def, attribute, &mut pending)?;
        }

        Ok(output)
    }

    /// Lift wire records to typed attributes.
    ///
    /// Never fails: records that cannot be decoded stay raw and container
    /// payloads that cannot be decoded stay in their container.
    pub fn decode(&self, records: Vec<RawAttribute>) -> Vec<Attribute> {
        let pending = records.into_iter().map(Attribute::Raw).collect();
        let promoted = self.run(pending, Pass::Promote);
        self.run(promoted.into(), Pass::Expand)
    }

    fn run(&self, mut pending: VecDeque<Attribute>, pass: Pass) -> Vec<Attribute> {
        let mut settled = Vec::with_capacity(pending.len());

        while let Some(front) = pending.front() {
            let def = self
                .lookup_type(front, pass)
                .and_then(|attr_type| self.dictionary.attribute_definition_by_type(&attr_type));

            let count = match def {
                Some(def) => def.codec.decode(self, def, &mut pending),
                None => 1,
            };
            let count = count.min(pending.len());
            settled.extend(pending.drain(..count));
        }

        settled
    }

    /// Type whose definition handles `attribute` in this pass
    fn lookup_type(&self, attribute: &Attribute, pass: Pass) -> Option<AttributeType> {
        match pass {
            Pass::Promote => attribute
                .as_raw()
                .map(|raw| AttributeType::new(raw.attr_type())),
            Pass::Expand => {
                let segments = attribute.data()?.nested_segments()?;
                let nested = attribute.attr_type().with(&segments);
                if self.dictionary.attribute_definition_by_type(&nested).is_none() {
                    debug!(attr_type = %nested, "no definition for nested attribute");
                }
                Some(nested)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::{ExtendedAttribute, VendorSpecificAttribute};
    use crate::codec::SystemRandom;
    use crate::data::{Data, DataType, VsaData};
    use crate::dictionary::MemoryDictionary;

    const SECRET: &[u8] = b"xyzzy5461";

    fn dictionary() -> MemoryDictionary {
        let mut dict = MemoryDictionary::standard();
        dict.add_attribute("26.9.1".parse().unwrap(), "Cisco-AVPair", DataType::Text, None)
            .unwrap();
        dict.add_attribute("241.26.9.1".parse().unwrap(), "Cisco-Ext", DataType::Integer, None)
            .unwrap();
        dict
    }

    fn roundtrip(dict: &MemoryDictionary, attributes: Vec<Attribute>) -> (Vec<RawAttribute>, Vec<Attribute>) {
        let random = SystemRandom;
        let stack = AttributeStack::new(CodecContext::new(SECRET, [0; 16], &random), dict);
        let raw = stack.encode(attributes).unwrap();
        let decoded = stack.decode(raw.clone());
        (raw, decoded)
    }

    #[test]
    fn test_vsa_encode_decode() {
        let dict = dictionary();
        let vsa = Attribute::VendorSpecific(
            VendorSpecificAttribute::new(
                AttributeType::new(26),
                9,
                1,
                Data::Text("shell:priv-lvl=15".into()),
            )
            .unwrap(),
        );
        let (raw, decoded) = roundtrip(&dict, vec![vsa.clone()]);
        assert_eq!(raw.len(), 1);
        assert_eq!(raw[0].attr_type(), 26);
        assert_eq!(&raw[0].value()[..6], &[0, 0, 0, 9, 1, 19]);
        assert_eq!(decoded, vec![vsa]);
    }

    #[test]
    fn test_evs_in_extended_encode_decode() {
        let dict = dictionary();
        let parent = AttributeType::new(241).with(&[26]);
        let evs = Attribute::VendorSpecific(
            VendorSpecificAttribute::new(parent, 9, 1, Data::Integer(42)).unwrap(),
        );
        let (raw, decoded) = roundtrip(&dict, vec![evs.clone()]);
        assert_eq!(raw[0].attr_type(), 241);
        assert_eq!(raw[0].value(), &[26, 0, 0, 0, 9, 1, 0, 0, 0, 42]);
        assert_eq!(decoded, vec![evs]);
    }

    #[test]
    fn test_unknown_vendor_keeps_container() {
        let dict = dictionary();
        let raw = RawAttribute::new(26, vec![0, 0, 0x01, 0x37, 7, 4, 0xaa, 0xbb]).unwrap();
        let random = SystemRandom;
        let stack = AttributeStack::new(CodecContext::new(SECRET, [0; 16], &random), &dict);

        let decoded = stack.decode(vec![raw]);
        assert_eq!(decoded.len(), 1);
        assert_eq!(
            decoded[0].data(),
            Some(&Data::Vsa(VsaData::new(311, 7, vec![0xaa, 0xbb]).unwrap()))
        );
    }

    #[test]
    fn test_encode_unknown_attribute_fails() {
        let dict = MemoryDictionary::new();
        let random = SystemRandom;
        let stack = AttributeStack::new(CodecContext::new(SECRET, [0; 16], &random), &dict);
        let attr = Attribute::standard(1, Data::Text("nemo".into())).unwrap();
        assert!(matches!(
            stack.encode(vec![attr]),
            Err(PacketError::UnknownAttribute(t)) if t == AttributeType::new(1)
        ));
    }

    #[test]
    fn test_raw_passes_through_both_ways() {
        let dict = MemoryDictionary::new();
        let records = vec![
            RawAttribute::new(1, b"nemo".to_vec()).unwrap(),
            RawAttribute::new(200, vec![1, 2, 3]).unwrap(),
        ];
        let attributes: Vec<Attribute> = records.iter().cloned().map(Attribute::Raw).collect();
        let (raw, decoded) = roundtrip(&dict, attributes.clone());
        assert_eq!(raw, records);
        assert_eq!(decoded, attributes);
    }

    #[test]
    fn test_malformed_value_stays_raw() {
        let dict = dictionary();
        // NAS-Port with three bytes
        let record = RawAttribute::new(5, vec![0, 0, 3]).unwrap();
        let random = SystemRandom;
        let stack = AttributeStack::new(CodecContext::new(SECRET, [0; 16], &random), &dict);
        assert_eq!(stack.decode(vec![record.clone()]), vec![Attribute::Raw(record)]);
    }

    #[test]
    fn test_extended_attribute_limit() {
        let dict = dictionary();
        let random = SystemRandom;
        let stack = AttributeStack::new(CodecContext::new(SECRET, [0; 16], &random), &dict);
        let attr = Attribute::Extended(ExtendedAttribute::new(241, 1, Data::Integer(7)).unwrap());
        let raw = stack.encode(vec![attr.clone()]).unwrap();
        assert_eq!(raw[0].value(), &[1, 0, 0, 0, 7]);
        assert_eq!(stack.decode(raw), vec![attr]);
    }
}
