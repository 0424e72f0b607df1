use super::AttributeStack;
use crate::attributes::{Attribute, AttributeError, RawAttribute};
use crate::data::{ConcatData, Data, DataType, EvsData, ExtendedData, LongExtendedData, VsaData};
use crate::dictionary::AttributeDefinition;
use crate::packet::PacketError;
use std::collections::VecDeque;
use tracing::debug;

/// How an attribute is carried on the wire.
///
/// Decode steps look at the front of the worklist and return how many front
/// entries are settled. Encode steps take one typed attribute and push the
/// lower-level entries that carry it back onto the front.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeCodec {
    /// One record, one value
    Standard,
    /// Top-level long extended attribute split over records with the `more` flag
    Fragmented,
    /// Value concatenated from consecutive records of the same type
    Concat,
    /// Nested in an Extended-Attribute container
    Extended,
    /// Nested in a Long-Extended-Attribute container
    LongExtended,
    /// Nested in a VSA or EVS container
    VendorSpecific,
}

impl AttributeCodec {
    /// Codecs that read their value out of an enclosing container
    pub fn is_nested(self) -> bool {
        matches!(
            self,
            AttributeCodec::Extended | AttributeCodec::LongExtended | AttributeCodec::VendorSpecific
        )
    }

    pub(crate) fn decode(
        self,
        stack: &AttributeStack<'_>,
        def: &AttributeDefinition,
        pending: &mut VecDeque<Attribute>,
    ) -> usize {
        match self {
            AttributeCodec::Standard => decode_standard(stack, def, pending),
            AttributeCodec::Fragmented => decode_fragmented(def, pending),
            AttributeCodec::Concat => decode_concat(def, pending),
            AttributeCodec::Extended
            | AttributeCodec::LongExtended
            | AttributeCodec::VendorSpecific => decode_nested(stack, def, pending),
        }
    }

    pub(crate) fn encode(
        self,
        stack: &AttributeStack<'_>,
        def: &AttributeDefinition,
        attribute: Attribute,
        pending: &mut VecDeque<Attribute>,
    ) -> Result<(), PacketError> {
        if attribute.is_raw() {
            pending.push_front(attribute);
            return Ok(());
        }
        let Some(data) = attribute.data() else {
            return Ok(());
        };
        let head = def.attr_type.head();

        match self {
            AttributeCodec::Standard => {
                let bytes = def.encode_data(stack.context(), data)?;
                pending.push_front(Attribute::Raw(RawAttribute::new(head, bytes)?));
            }
            AttributeCodec::Fragmented => {
                let Data::LongExtended(ext) = data else {
                    return Err(mismatch(DataType::LongExtended, data).into());
                };
                let chunks: Vec<&[u8]> = if ext.value().is_empty() {
                    vec![ext.value()]
                } else {
                    ext.value().chunks(LongExtendedData::MAX_FRAGMENT_LEN).collect()
                };
                let last = chunks.len() - 1;
                for (i, chunk) in chunks.into_iter().enumerate().rev() {
                    let fragment = LongExtendedData::fragment(
                        ext.ext_type(),
                        i != last,
                        i == last && ext.truncated(),
                        chunk.to_vec(),
                    )?;
                    let bytes = Data::LongExtended(fragment).to_bytes();
                    pending.push_front(Attribute::Raw(RawAttribute::new(head, bytes)?));
                }
            }
            AttributeCodec::Concat => {
                let Data::Concat(concat) = data else {
                    return Err(mismatch(DataType::Concat, data).into());
                };
                for fragment in concat.fragments().iter().rev() {
                    pending.push_front(Attribute::Raw(RawAttribute::new(head, fragment.clone())?));
                }
            }
            AttributeCodec::Extended
            | AttributeCodec::LongExtended
            | AttributeCodec::VendorSpecific => {
                let truncated = matches!(&attribute, Attribute::LongExtended(a) if a.truncated());
                let container = self.encode_nested(stack, def, data, truncated)?;
                pending.push_front(container);
            }
        }
        Ok(())
    }

    /// Wrap the encoded value in its parent container and build the parent
    /// attribute.
    fn encode_nested(
        self,
        stack: &AttributeStack<'_>,
        def: &AttributeDefinition,
        data: &Data,
        truncated: bool,
    ) -> Result<Attribute, PacketError> {
        let payload = def.encode_data(stack.context(), data)?;
        let unknown = || PacketError::UnknownAttribute(def.attr_type.clone());

        let levels = if self == AttributeCodec::VendorSpecific { 2 } else { 1 };
        let parent_type = def.attr_type.ancestor(levels).ok_or_else(unknown)?;
        let parent_def = stack
            .dictionary()
            .attribute_definition_by_type(&parent_type)
            .ok_or_else(|| PacketError::UnknownAttribute(parent_type.clone()))?;
        let last = def.last_octet()?;

        let container = match self {
            AttributeCodec::Extended => Data::Extended(ExtendedData::new(last, payload)?),
            AttributeCodec::LongExtended => Data::LongExtended(
                LongExtendedData::new(last, payload).with_truncated(truncated),
            ),
            _ => {
                let segments = def.attr_type.segments();
                let vendor_id = segments[segments.len() - 2];
                match parent_def.data_type {
                    DataType::Vsa => Data::Vsa(VsaData::new(vendor_id, last, payload)?),
                    DataType::Evs => Data::Evs(EvsData::new(vendor_id, last, payload)?),
                    other => {
                        return Err(AttributeError::UnsupportedParent {
                            parent: parent_type,
                            data_type: other,
                        }
                        .into());
                    }
                }
            }
        };
        Ok(parent_def.make_attribute(container)?)
    }
}

fn mismatch(expected: DataType, data: &Data) -> AttributeError {
    AttributeError::TypeMismatch {
        expected,
        actual: data.data_type(),
    }
}

fn promote(def: &AttributeDefinition, data: Data) -> Option<Attribute> {
    match def.make_attribute(data) {
        Ok(attribute) => Some(attribute),
        Err(e) => {
            debug!(attr_type = %def.attr_type, error = %e, "decoded value rejected");
            None
        }
    }
}

fn decode_standard(
    stack: &AttributeStack<'_>,
    def: &AttributeDefinition,
    pending: &mut VecDeque<Attribute>,
) -> usize {
    let Some(Attribute::Raw(raw)) = pending.front() else {
        return 1;
    };
    let decoded = def
        .decode_data(stack.context(), stack.dictionary(), raw.value())
        .and_then(|data| promote(def, data));

    match decoded {
        Some(attribute) => pending[0] = attribute,
        None => debug!(attr_type = %def.attr_type, name = %def.name, "attribute left raw"),
    }
    1
}

/// Raw records of `attr_type` at the front of the worklist
fn raw_run<'p>(
    pending: &'p VecDeque<Attribute>,
    attr_type: u8,
) -> impl Iterator<Item = &'p RawAttribute> + 'p {
    pending.iter().map_while(move |attribute| match attribute {
        Attribute::Raw(raw) if raw.attr_type() == attr_type => Some(raw),
        _ => None,
    })
}

fn decode_fragmented(def: &AttributeDefinition, pending: &mut VecDeque<Attribute>) -> usize {
    let Some(Attribute::Raw(first)) = pending.front() else {
        return 1;
    };
    let Some(&ext_type) = first.value().first() else {
        return 1;
    };

    let mut count = 0;
    let mut complete = false;
    for raw in raw_run(pending, first.attr_type()) {
        let value = raw.value();
        if value.len() < 2 || value[0] != ext_type {
            break;
        }
        count += 1;
        if value[1] & LongExtendedData::MORE == 0 {
            complete = true;
            break;
        }
    }

    if !complete {
        debug!(
            attr_type = %def.attr_type,
            fragments = count,
            "incomplete long extended chain left raw"
        );
        return count.max(1);
    }

    let mut value = Vec::new();
    let mut truncated = false;
    for raw in raw_run(pending, def.attr_type.head()).take(count) {
        value.extend_from_slice(&raw.value()[2..]);
        truncated |= raw.value()[1] & LongExtendedData::TRUNCATED != 0;
    }
    let data = Data::LongExtended(LongExtendedData::new(ext_type, value).with_truncated(truncated));

    match promote(def, data) {
        Some(attribute) => {
            pending.drain(..count);
            pending.push_front(attribute);
            1
        }
        None => count,
    }
}

fn decode_concat(def: &AttributeDefinition, pending: &mut VecDeque<Attribute>) -> usize {
    let Some(Attribute::Raw(first)) = pending.front() else {
        return 1;
    };
    let fragments: Vec<Vec<u8>> = raw_run(pending, first.attr_type())
        .map(|raw| raw.value().to_vec())
        .collect();
    let count = fragments.len();

    let promoted = ConcatData::from_fragments(fragments)
        .ok()
        .and_then(|concat| promote(def, Data::Concat(concat)));
    match promoted {
        Some(attribute) => {
            pending.drain(..count);
            pending.push_front(attribute);
            1
        }
        None => count,
    }
}

/// Decodes the payload of the container at the front. A successful step
/// settles nothing, so the new attribute is examined again in case it is a
/// container itself.
fn decode_nested(
    stack: &AttributeStack<'_>,
    def: &AttributeDefinition,
    pending: &mut VecDeque<Attribute>,
) -> usize {
    let Some(container) = pending.front().and_then(Attribute::data) else {
        return 1;
    };
    let Some(payload) = container.container_value() else {
        return 1;
    };
    let truncated = matches!(container, Data::LongExtended(ext) if ext.truncated());
    let decoded = def
        .decode_data(stack.context(), stack.dictionary(), payload)
        .and_then(|data| promote(def, data))
        .map(|attribute| match attribute {
            Attribute::LongExtended(attr) => {
                Attribute::LongExtended(attr.with_truncated(truncated))
            }
            other => other,
        });

    match decoded {
        Some(attribute) => {
            pending[0] = attribute;
            0
        }
        None => {
            debug!(attr_type = %def.attr_type, name = %def.name, "container payload left opaque");
            1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::AttributeType;
    use crate::codec::{CodecContext, SystemRandom};
    use crate::dictionary::{Dictionary, MemoryDictionary};

    fn raw(attr_type: u8, value: &[u8]) -> Attribute {
        Attribute::raw(attr_type, value.to_vec()).unwrap()
    }

    #[test]
    fn test_fragmented_settles_whole_incomplete_run() {
        let dict = MemoryDictionary::standard();
        let random = SystemRandom;
        let stack = AttributeStack::new(CodecContext::new(b"s", [0; 16], &random), &dict);
        let def = dict
            .attribute_definition_by_type(&AttributeType::new(245))
            .unwrap();

        let mut pending: VecDeque<Attribute> = vec![
            raw(245, &[26, 0x80, 1]),
            raw(245, &[26, 0x80, 2]),
            raw(1, b"nemo"),
        ]
        .into();
        assert_eq!(def.codec.decode(&stack, def, &mut pending), 2);
        assert!(pending.iter().all(Attribute::is_raw));
    }

    #[test]
    fn test_concat_stops_at_other_type() {
        let dict = MemoryDictionary::standard();
        let def = dict
            .attribute_definition_by_type(&AttributeType::new(79))
            .unwrap();
        let mut pending: VecDeque<Attribute> = vec![
            raw(79, &[1, 2]),
            raw(79, &[3]),
            raw(1, b"nemo"),
            raw(79, &[4]),
        ]
        .into();
        assert_eq!(decode_concat(def, &mut pending), 1);
        assert_eq!(pending.len(), 3);
        let Some(Data::Concat(concat)) = pending[0].data() else {
            panic!("expected concat");
        };
        assert_eq!(concat.value(), vec![1, 2, 3]);
        assert!(pending[2].is_raw());
    }

    #[test]
    fn test_long_extended_keeps_truncated_flag() {
        let mut dict = MemoryDictionary::standard();
        dict.add_attribute("245.1".parse().unwrap(), "Test-Long", DataType::String, None)
            .unwrap();
        let random = SystemRandom;
        let stack = AttributeStack::new(CodecContext::new(b"s", [0; 16], &random), &dict);

        let record = RawAttribute::new(245, vec![1, 0x40, 0xaa, 0xbb]).unwrap();
        let decoded = stack.decode(vec![record.clone()]);
        let Attribute::LongExtended(attr) = &decoded[0] else {
            panic!("expected long extended attribute, got {:?}", decoded[0]);
        };
        assert!(attr.truncated());
        assert_eq!(attr.data(), &Data::String(vec![0xaa, 0xbb]));

        assert_eq!(stack.encode(decoded).unwrap(), vec![record]);
    }

    #[test]
    fn test_nested_codecs() {
        assert!(AttributeCodec::VendorSpecific.is_nested());
        assert!(!AttributeCodec::Fragmented.is_nested());
    }
}
