use super::{
    AttributeDefinition, AuthenticatorKind, Dictionary, DictionaryError, PacketDefinition,
    TlvDefinition,
};
use crate::attributes::AttributeType;
use crate::codec::AttributeCodec;
use crate::data::{DataFilter, DataType};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::debug;

/// [`Dictionary`] held in hash maps.
///
/// Definitions are added one by one; the attribute codec is inferred from
/// where the attribute sits (top level, inside an extended container or
/// inside a vendor container), so a parent must be added before its children.
#[derive(Debug, Clone, Default)]
pub struct MemoryDictionary {
    attributes: HashMap<AttributeType, AttributeDefinition>,
    names: HashMap<String, AttributeType>,
    tlvs: HashMap<AttributeType, TlvDefinition>,
    values: HashMap<(AttributeType, String), i32>,
    value_names: HashMap<(AttributeType, i32), String>,
    packets: HashMap<u8, PacketDefinition>,
}

/// JSON form of a dictionary extension.
///
/// ```json
/// {
///   "attributes": [{ "type": "26.9.1", "name": "Cisco-AVPair", "data_type": "text" }],
///   "tlvs": [{ "type": "241.9.1", "name": "Softwire46-Rule", "data_type": "tlv" }],
///   "values": [{ "attribute": "Service-Type", "name": "Framed-User", "value": 2 }],
///   "packets": [{ "code": 1, "name": "Access-Request", "authenticator": "random" }]
/// }
/// ```
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct DictionaryFile {
    #[serde(default)]
    attributes: Vec<AttributeEntry>,
    #[serde(default)]
    tlvs: Vec<TlvEntry>,
    #[serde(default)]
    values: Vec<ValueEntry>,
    #[serde(default)]
    packets: Vec<PacketEntry>,
}

#[derive(Debug, Deserialize)]
struct AttributeEntry {
    #[serde(rename = "type")]
    attr_type: String,
    name: String,
    data_type: DataType,
    #[serde(default)]
    filter: Option<DataFilter>,
}

#[derive(Debug, Deserialize)]
struct TlvEntry {
    #[serde(rename = "type")]
    attr_type: String,
    name: String,
    data_type: DataType,
}

#[derive(Debug, Deserialize)]
struct ValueEntry {
    attribute: String,
    name: String,
    value: i32,
}

#[derive(Debug, Deserialize)]
struct PacketEntry {
    code: u8,
    name: String,
    authenticator: AuthenticatorKind,
}

impl MemoryDictionary {
    /// Empty dictionary
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an attribute definition.
    ///
    /// Rejects a type or name that is already defined, a nested type without
    /// an enclosing container definition, and data types that can only
    /// appear at the top level.
    pub fn add_attribute(
        &mut self,
        attr_type: AttributeType,
        name: impl Into<String>,
        data_type: DataType,
        filter: Option<DataFilter>,
    ) -> Result<&AttributeDefinition, DictionaryError> {
        let name = name.into();
        if self.attributes.contains_key(&attr_type) {
            return Err(DictionaryError::DuplicateType(attr_type));
        }
        if self.names.contains_key(&name) {
            return Err(DictionaryError::DuplicateName(name));
        }
        let codec = self.infer_codec(&attr_type, data_type)?;

        Ok(self.insert_attribute(AttributeDefinition {
            attr_type,
            name,
            data_type,
            codec,
            filter,
        }))
    }

    fn infer_codec(
        &self,
        attr_type: &AttributeType,
        data_type: DataType,
    ) -> Result<AttributeCodec, DictionaryError> {
        if attr_type.is_top_level() {
            return Ok(match data_type {
                DataType::LongExtended => AttributeCodec::Fragmented,
                DataType::Concat => AttributeCodec::Concat,
                _ => AttributeCodec::Standard,
            });
        }

        if matches!(data_type, DataType::LongExtended | DataType::Concat) {
            return Err(DictionaryError::InvalidDefinition {
                attr_type: attr_type.clone(),
                reason: format!("{} is only valid at the top level", data_type),
            });
        }

        let parent_type = |levels| {
            attr_type
                .ancestor(levels)
                .and_then(|parent| self.attributes.get(&parent))
                .map(|def| def.data_type)
        };
        match (parent_type(1), parent_type(2)) {
            (Some(DataType::Extended), _) => Ok(AttributeCodec::Extended),
            (Some(DataType::LongExtended), _) => Ok(AttributeCodec::LongExtended),
            (_, Some(DataType::Vsa | DataType::Evs)) => Ok(AttributeCodec::VendorSpecific),
            _ => Err(DictionaryError::MissingParent(attr_type.clone())),
        }
    }

    pub(super) fn insert_attribute(&mut self, def: AttributeDefinition) -> &AttributeDefinition {
        self.names.insert(def.name.clone(), def.attr_type.clone());
        self.attributes
            .entry(def.attr_type.clone())
            .insert_entry(def)
            .into_mut()
    }

    /// Add a TLV record definition
    pub fn add_tlv(
        &mut self,
        attr_type: AttributeType,
        name: impl Into<String>,
        data_type: DataType,
    ) -> Result<&TlvDefinition, DictionaryError> {
        if self.tlvs.contains_key(&attr_type) {
            return Err(DictionaryError::DuplicateType(attr_type));
        }
        if attr_type.is_top_level() || data_type.is_container() {
            return Err(DictionaryError::InvalidDefinition {
                attr_type,
                reason: format!("TLV records cannot be top level or hold {} data", data_type),
            });
        }
        let def = TlvDefinition {
            attr_type: attr_type.clone(),
            name: name.into(),
            data_type,
        };
        Ok(self.tlvs.entry(attr_type).insert_entry(def).into_mut())
    }

    /// Name a numeric value of an enumerated attribute
    pub fn add_value(
        &mut self,
        attr_type: &AttributeType,
        name: impl Into<String>,
        value: i32,
    ) -> Result<(), DictionaryError> {
        if !self.attributes.contains_key(attr_type) {
            return Err(DictionaryError::UnknownAttribute(attr_type.to_string()));
        }
        self.insert_value(attr_type, name, value);
        Ok(())
    }

    /// The first name given to a value is the one displayed
    pub(super) fn insert_value(
        &mut self,
        attr_type: &AttributeType,
        name: impl Into<String>,
        value: i32,
    ) {
        let name = name.into();
        self.value_names
            .entry((attr_type.clone(), value))
            .or_insert_with(|| name.clone());
        self.values.insert((attr_type.clone(), name), value);
    }

    pub fn add_packet(
        &mut self,
        code: u8,
        name: impl Into<String>,
        authenticator: AuthenticatorKind,
    ) -> Result<(), DictionaryError> {
        if self.packets.contains_key(&code) {
            return Err(DictionaryError::DuplicateCode(code));
        }
        self.insert_packet(PacketDefinition {
            code,
            name: name.into(),
            authenticator,
        });
        Ok(())
    }

    pub(super) fn insert_packet(&mut self, def: PacketDefinition) {
        self.packets.insert(def.code, def);
    }

    /// Extend the dictionary from a JSON document.
    ///
    /// Entries are applied in order: attributes, TLVs, values, packets.
    pub fn load_json(&mut self, json: &str) -> Result<(), DictionaryError> {
        let file: DictionaryFile = serde_json::from_str(json)?;

        for entry in file.attributes {
            let attr_type = entry.attr_type.parse()?;
            self.add_attribute(attr_type, entry.name, entry.data_type, entry.filter)?;
        }
        for entry in file.tlvs {
            let attr_type = entry.attr_type.parse()?;
            self.add_tlv(attr_type, entry.name, entry.data_type)?;
        }
        for entry in file.values {
            let attr_type = self
                .attribute_definition_by_name(&entry.attribute)
                .map(|def| def.attr_type.clone())
                .ok_or_else(|| DictionaryError::UnknownAttribute(entry.attribute.clone()))?;
            self.add_value(&attr_type, entry.name, entry.value)?;
        }
        for entry in file.packets {
            self.add_packet(entry.code, entry.name, entry.authenticator)?;
        }

        debug!(
            attributes = self.attributes.len(),
            tlvs = self.tlvs.len(),
            "dictionary loaded"
        );
        Ok(())
    }

    /// Extend the dictionary from a JSON file
    pub fn load_file(&mut self, path: impl AsRef<Path>) -> Result<(), DictionaryError> {
        let contents = fs::read_to_string(path)?;
        self.load_json(&contents)
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// All attribute definitions, in no particular order
    pub fn attributes(&self) -> impl Iterator<Item = &AttributeDefinition> {
        self.attributes.values()
    }
}

impl Dictionary for MemoryDictionary {
    fn attribute_definition_by_type(
        &self,
        attr_type: &AttributeType,
    ) -> Option<&AttributeDefinition> {
        self.attributes.get(attr_type)
    }

    fn attribute_definition_by_name(&self, name: &str) -> Option<&AttributeDefinition> {
        self.names
            .get(name)
            .and_then(|attr_type| self.attributes.get(attr_type))
    }

    fn tlv_definition(&self, attr_type: &AttributeType) -> Option<&TlvDefinition> {
        self.tlvs.get(attr_type)
    }

    fn numeric_value(&self, attr_type: &AttributeType, name: &str) -> Option<i32> {
        self.values
            .get(&(attr_type.clone(), name.to_string()))
            .copied()
    }

    fn packet_definition(&self, code: u8) -> Option<&PacketDefinition> {
        self.packets.get(&code)
    }

    fn value_name(&self, attr_type: &AttributeType, value: i32) -> Option<&str> {
        self.value_names
            .get(&(attr_type.clone(), value))
            .map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codec_inference() {
        let mut dict = MemoryDictionary::new();
        let codec = |dict: &mut MemoryDictionary, path: &str, data_type| {
            dict.add_attribute(path.parse().unwrap(), path, data_type, None)
                .unwrap()
                .codec
        };
        assert_eq!(codec(&mut dict, "1", DataType::Text), AttributeCodec::Standard);
        assert_eq!(codec(&mut dict, "79", DataType::Concat), AttributeCodec::Concat);
        assert_eq!(codec(&mut dict, "241", DataType::Extended), AttributeCodec::Standard);
        assert_eq!(codec(&mut dict, "245", DataType::LongExtended), AttributeCodec::Fragmented);
        assert_eq!(codec(&mut dict, "26", DataType::Vsa), AttributeCodec::Standard);
        assert_eq!(codec(&mut dict, "241.1", DataType::Integer), AttributeCodec::Extended);
        assert_eq!(codec(&mut dict, "241.26", DataType::Evs), AttributeCodec::Extended);
        assert_eq!(codec(&mut dict, "245.26", DataType::Evs), AttributeCodec::LongExtended);
        assert_eq!(codec(&mut dict, "26.9.1", DataType::Text), AttributeCodec::VendorSpecific);
        assert_eq!(
            codec(&mut dict, "241.26.9.1", DataType::Integer),
            AttributeCodec::VendorSpecific
        );
        assert_eq!(
            codec(&mut dict, "245.26.9.1", DataType::String),
            AttributeCodec::VendorSpecific
        );
    }

    #[test]
    fn test_duplicates_rejected() {
        let mut dict = MemoryDictionary::new();
        dict.add_attribute(AttributeType::new(1), "User-Name", DataType::Text, None)
            .unwrap();
        assert!(matches!(
            dict.add_attribute(AttributeType::new(1), "Other", DataType::Text, None),
            Err(DictionaryError::DuplicateType(_))
        ));
        assert!(matches!(
            dict.add_attribute(AttributeType::new(2), "User-Name", DataType::Text, None),
            Err(DictionaryError::DuplicateName(_))
        ));
        dict.add_packet(1, "Access-Request", AuthenticatorKind::Random)
            .unwrap();
        assert!(matches!(
            dict.add_packet(1, "Again", AuthenticatorKind::Random),
            Err(DictionaryError::DuplicateCode(1))
        ));
    }

    #[test]
    fn test_missing_parent_rejected() {
        let mut dict = MemoryDictionary::new();
        assert!(matches!(
            dict.add_attribute("26.9.1".parse().unwrap(), "Cisco-AVPair", DataType::Text, None),
            Err(DictionaryError::MissingParent(_))
        ));
        dict.add_attribute(AttributeType::new(26), "Vendor-Specific", DataType::Vsa, None)
            .unwrap();
        assert!(matches!(
            dict.add_attribute("26.9".parse().unwrap(), "Cisco", DataType::Text, None),
            Err(DictionaryError::MissingParent(_))
        ));
        assert!(matches!(
            dict.add_attribute("26.9.2".parse().unwrap(), "Frag", DataType::Concat, None),
            Err(DictionaryError::InvalidDefinition { .. })
        ));
    }

    #[test]
    fn test_values() {
        let mut dict = MemoryDictionary::new();
        let service_type = AttributeType::new(6);
        dict.add_attribute(service_type.clone(), "Service-Type", DataType::Enum, None)
            .unwrap();
        dict.add_value(&service_type, "Framed-User", 2).unwrap();
        assert_eq!(dict.numeric_value(&service_type, "Framed-User"), Some(2));
        assert_eq!(dict.value_name(&service_type, 2), Some("Framed-User"));
        assert_eq!(dict.numeric_value(&service_type, "Login-User"), None);
        assert!(dict.add_value(&AttributeType::new(99), "X", 1).is_err());
    }

    #[test]
    fn test_load_json() {
        let mut dict = MemoryDictionary::new();
        dict.load_json(
            r#"{
                "attributes": [
                    { "type": "26", "name": "Vendor-Specific", "data_type": "vsa" },
                    { "type": "26.9.1", "name": "Cisco-AVPair", "data_type": "text" },
                    { "type": "2", "name": "User-Password", "data_type": "string",
                      "filter": "user-password" },
                    { "type": "241", "name": "Extended-Attribute-1", "data_type": "extended" },
                    { "type": "241.9", "name": "Softwire46", "data_type": "tlv" }
                ],
                "tlvs": [
                    { "type": "241.9.1", "name": "Softwire46-Rule", "data_type": "tlv" }
                ],
                "values": [],
                "packets": [
                    { "code": 4, "name": "Accounting-Request", "authenticator": "hashed" }
                ]
            }"#,
        )
        .unwrap();

        let avpair = dict.attribute_definition_by_name("Cisco-AVPair").unwrap();
        assert_eq!(avpair.codec, AttributeCodec::VendorSpecific);
        let password = dict.attribute_definition_by_type(&AttributeType::new(2)).unwrap();
        assert_eq!(password.filter, Some(DataFilter::UserPassword));
        assert!(dict.tlv_definition(&"241.9.1".parse().unwrap()).is_some());
        assert_eq!(
            dict.packet_definition(4).map(|p| p.authenticator),
            Some(AuthenticatorKind::Hashed)
        );
    }

    #[test]
    fn test_load_json_errors() {
        let mut dict = MemoryDictionary::new();
        assert!(matches!(
            dict.load_json("{ \"attributes\": [{ \"type\": \"x\", \"name\": \"A\", \"data_type\": \"text\" }] }"),
            Err(DictionaryError::Attribute(_))
        ));
        assert!(matches!(
            dict.load_json("{ \"bogus\": [] }"),
            Err(DictionaryError::Parse(_))
        ));
        assert!(matches!(
            dict.load_json("{ \"values\": [{ \"attribute\": \"Nope\", \"name\": \"A\", \"value\": 1 }] }"),
            Err(DictionaryError::UnknownAttribute(_))
        ));
    }
}
