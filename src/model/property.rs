//! Concrete property values built against an [`ObjectStructure`].

use serde::Serialize;
use serde_json::{Map, Value};

use super::schema::{ObjectStructure, PropertyKind, SchemaTypeRegistry};
use crate::error::{DocumentError, Result};

/// The single populated payload of a property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PropertyValue {
    BasicType(i64),
    Enumeration(String),
}

impl PropertyValue {
    pub fn kind(&self) -> PropertyKind {
        match self {
            PropertyValue::BasicType(_) => PropertyKind::BasicType,
            PropertyValue::Enumeration(_) => PropertyKind::Enumeration,
        }
    }

    pub fn as_basic(&self) -> Option<i64> {
        match self {
            PropertyValue::BasicType(v) => Some(*v),
            PropertyValue::Enumeration(_) => None,
        }
    }

    pub fn as_enum(&self) -> Option<&str> {
        match self {
            PropertyValue::Enumeration(s) => Some(s),
            PropertyValue::BasicType(_) => None,
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            PropertyValue::BasicType(v) => Value::from(*v),
            PropertyValue::Enumeration(s) => Value::String(s.clone()),
        }
    }
}

/// A property instance; name, type and visibility are copied from the schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ObjectProperty {
    pub name: String,
    pub type_name: String,
    pub visible: bool,
    pub value: PropertyValue,
}

/// Properties in the declaration order of the governing structure.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct PropertyBag {
    properties: Vec<ObjectProperty>,
}

impl PropertyBag {
    pub fn new() -> Self {
        Self::default()
    }

    /// A bag for a freshly placed object: basic types start at their minimum,
    /// enums at their first member.
    pub fn with_defaults(structure: &ObjectStructure, types: &SchemaTypeRegistry) -> Result<Self> {
        let mut bag = Self::new();
        for decl in &structure.properties {
            let value = if let Some(basic) = types.basic_type(&decl.type_name) {
                PropertyValue::BasicType(basic.min_value)
            } else if let Some(e) = types.enumeration(&decl.type_name) {
                PropertyValue::Enumeration(e.values.first().cloned().unwrap_or_default())
            } else {
                return Err(DocumentError::UnknownPropertyType {
                    structure: structure.name.clone(),
                    property: decl.name.clone(),
                    type_name: decl.type_name.clone(),
                });
            };
            bag.push(ObjectProperty {
                name: decl.name.clone(),
                type_name: decl.type_name.clone(),
                visible: decl.visible,
                value,
            });
        }
        Ok(bag)
    }

    pub(crate) fn push(&mut self, property: ObjectProperty) {
        self.properties.push(property);
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ObjectProperty> {
        self.properties.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.properties.iter().map(|p| p.name.as_str())
    }

    pub fn get(&self, name: &str) -> Option<&ObjectProperty> {
        self.properties.iter().find(|p| p.name == name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut ObjectProperty> {
        self.properties.iter_mut().find(|p| p.name == name)
    }

    /// Replaces a basic-type value. Returns `false` when the property is
    /// absent or holds an enumeration.
    pub fn set_basic(&mut self, name: &str, value: i64) -> bool {
        match self.get_mut(name) {
            Some(p) if p.value.kind() == PropertyKind::BasicType => {
                p.value = PropertyValue::BasicType(value);
                true
            }
            _ => false,
        }
    }

    /// Replaces an enumeration value. Returns `false` when the property is
    /// absent or holds a basic type.
    pub fn set_enum(&mut self, name: &str, member: impl Into<String>) -> bool {
        match self.get_mut(name) {
            Some(p) if p.value.kind() == PropertyKind::Enumeration => {
                p.value = PropertyValue::Enumeration(member.into());
                true
            }
            _ => false,
        }
    }

    /// Re-expands the bag into a JSON object keyed by property name.
    pub fn to_json_object(&self) -> Map<String, Value> {
        self.properties
            .iter()
            .map(|p| (p.name.clone(), p.value.to_json()))
            .collect()
    }
}

impl<'a> IntoIterator for &'a PropertyBag {
    type Item = &'a ObjectProperty;
    type IntoIter = std::slice::Iter<'a, ObjectProperty>;

    fn into_iter(self) -> Self::IntoIter {
        self.properties.iter()
    }
}
