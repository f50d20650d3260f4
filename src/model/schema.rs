//! Schema declarations carried inside a map document.
//!
//! A document declares its own property types (numeric ranges and string
//! enumerations) and the object structures built from them. Names are unique
//! across basic types and enums, and unique among structures.

use std::collections::HashMap;

use serde::Serialize;

use crate::error::{DefinitionKind, DocumentError, Result};

/// Name given to the structure that governs collision items.
pub const COLLISION_STRUCTURE_NAME: &str = "Collision";

/// A named inclusive integer range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BasicType {
    pub name: String,
    pub min_value: i64,
    pub max_value: i64,
}

impl BasicType {
    pub fn contains(&self, value: i64) -> bool {
        (self.min_value..=self.max_value).contains(&value)
    }
}

/// A named list of string members, kept in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Enum {
    pub name: String,
    pub values: Vec<String>,
}

impl Enum {
    pub fn contains(&self, member: &str) -> bool {
        self.values.iter().any(|v| v == member)
    }
}

/// One property declaration of an [`ObjectStructure`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnumOrBasicTypeProperty {
    pub name: String,
    /// Name of a [`BasicType`] or [`Enum`].
    pub type_name: String,
    /// Editor hint only.
    pub visible: bool,
}

/// The ordered shape of a property bag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ObjectStructure {
    pub name: String,
    pub properties: Vec<EnumOrBasicTypeProperty>,
}

impl ObjectStructure {
    /// Builds a structure, rejecting a property name declared twice.
    pub fn new(
        name: impl Into<String>,
        properties: Vec<EnumOrBasicTypeProperty>,
    ) -> Result<Self> {
        let name = name.into();
        for (i, prop) in properties.iter().enumerate() {
            if properties[..i].iter().any(|p| p.name == prop.name) {
                return Err(DocumentError::DuplicateDefinition {
                    kind: DefinitionKind::Property,
                    name: format!("{}.{}", name, prop.name),
                });
            }
        }
        Ok(Self { name, properties })
    }

    pub fn property(&self, name: &str) -> Option<&EnumOrBasicTypeProperty> {
        self.properties.iter().find(|p| p.name == name)
    }

    /// Fails with `UnknownPropertyType` on the first property whose type is
    /// neither a basic type nor an enum.
    pub fn check_types(&self, types: &SchemaTypeRegistry) -> Result<()> {
        for prop in &self.properties {
            if types.resolve(&prop.type_name).kind().is_none() {
                return Err(DocumentError::UnknownPropertyType {
                    structure: self.name.clone(),
                    property: prop.name.clone(),
                    type_name: prop.type_name.clone(),
                });
            }
        }
        Ok(())
    }
}

/// Which payload a property of a given type carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PropertyKind {
    BasicType,
    Enumeration,
}

/// Result of looking a type name up in both namespaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FoundType {
    pub is_enum: bool,
    pub is_basic_type: bool,
}

impl FoundType {
    /// `None` when the name is unknown.
    pub fn kind(self) -> Option<PropertyKind> {
        match (self.is_basic_type, self.is_enum) {
            (true, false) => Some(PropertyKind::BasicType),
            (false, true) => Some(PropertyKind::Enumeration),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TypeSlot {
    Basic(usize),
    Enum(usize),
}

/// Basic types and enums declared by one document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SchemaTypeRegistry {
    basic_types: Vec<BasicType>,
    enums: Vec<Enum>,
    index: HashMap<String, TypeSlot>,
}

impl SchemaTypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_basic_type(&mut self, basic_type: BasicType) -> Result<()> {
        self.claim(&basic_type.name, DefinitionKind::BasicType)?;
        self.index.insert(
            basic_type.name.clone(),
            TypeSlot::Basic(self.basic_types.len()),
        );
        self.basic_types.push(basic_type);
        Ok(())
    }

    pub fn insert_enum(&mut self, enumeration: Enum) -> Result<()> {
        self.claim(&enumeration.name, DefinitionKind::Enum)?;
        self.index
            .insert(enumeration.name.clone(), TypeSlot::Enum(self.enums.len()));
        self.enums.push(enumeration);
        Ok(())
    }

    fn claim(&self, name: &str, kind: DefinitionKind) -> Result<()> {
        if self.index.contains_key(name) {
            return Err(DocumentError::DuplicateDefinition {
                kind,
                name: name.to_string(),
            });
        }
        Ok(())
    }

    pub fn resolve(&self, type_name: &str) -> FoundType {
        match self.index.get(type_name) {
            Some(TypeSlot::Basic(_)) => FoundType {
                is_enum: false,
                is_basic_type: true,
            },
            Some(TypeSlot::Enum(_)) => FoundType {
                is_enum: true,
                is_basic_type: false,
            },
            None => FoundType::default(),
        }
    }

    pub fn basic_type(&self, name: &str) -> Option<&BasicType> {
        match self.index.get(name) {
            Some(TypeSlot::Basic(i)) => self.basic_types.get(*i),
            _ => None,
        }
    }

    pub fn enumeration(&self, name: &str) -> Option<&Enum> {
        match self.index.get(name) {
            Some(TypeSlot::Enum(i)) => self.enums.get(*i),
            _ => None,
        }
    }

    pub fn basic_types(&self) -> &[BasicType] {
        &self.basic_types
    }

    pub fn enums(&self) -> &[Enum] {
        &self.enums
    }
}

/// Named object structures, in declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectStructureRegistry {
    structures: Vec<ObjectStructure>,
    index: HashMap<String, usize>,
}

impl ObjectStructureRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a structure once every property type resolves in `types`.
    pub fn insert(&mut self, structure: ObjectStructure, types: &SchemaTypeRegistry) -> Result<()> {
        if self.index.contains_key(&structure.name) {
            return Err(DocumentError::DuplicateDefinition {
                kind: DefinitionKind::ObjectStructure,
                name: structure.name,
            });
        }
        structure.check_types(types)?;
        self.index
            .insert(structure.name.clone(), self.structures.len());
        self.structures.push(structure);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Result<&ObjectStructure> {
        self.find(name)
            .ok_or_else(|| DocumentError::UnknownObjectStructure {
                name: name.to_string(),
            })
    }

    pub fn find(&self, name: &str) -> Option<&ObjectStructure> {
        self.index.get(name).and_then(|&i| self.structures.get(i))
    }

    pub fn iter(&self) -> impl Iterator<Item = &ObjectStructure> {
        self.structures.iter()
    }

    pub fn len(&self) -> usize {
        self.structures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.structures.is_empty()
    }
}
