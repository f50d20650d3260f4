//! Builds a [`PropertyBag`] from a raw JSON object.

use serde_json::{Map, Value};
use tracing::warn;

use super::{join, read_number, read_string};
use crate::error::{DocumentError, Result};
use crate::model::{
    ObjectProperty, ObjectStructure, PropertyBag, PropertyKind, PropertyValue, SchemaTypeRegistry,
};

/// Reads one value per declared property of `structure`, in declaration
/// order, regardless of the key order of `raw`.
///
/// Basic types must be numbers and enums must be strings. Ranges and enum
/// membership are not checked here; see [`crate::validate`].
/// Keys of `raw` that the structure does not declare are dropped.
pub fn read_properties(
    structure: &ObjectStructure,
    types: &SchemaTypeRegistry,
    raw: &Map<String, Value>,
    at: &str,
) -> Result<PropertyBag> {
    let mut bag = PropertyBag::new();
    for decl in &structure.properties {
        let value = match types.resolve(&decl.type_name).kind() {
            Some(PropertyKind::BasicType) => {
                PropertyValue::BasicType(read_number(raw, &decl.name, at)?)
            }
            Some(PropertyKind::Enumeration) => {
                PropertyValue::Enumeration(read_string(raw, &decl.name, at)?)
            }
            None => {
                return Err(DocumentError::UnknownPropertyType {
                    structure: structure.name.clone(),
                    property: decl.name.clone(),
                    type_name: decl.type_name.clone(),
                });
            }
        };
        bag.push(ObjectProperty {
            name: decl.name.clone(),
            type_name: decl.type_name.clone(),
            visible: decl.visible,
            value,
        });
    }

    for key in raw.keys() {
        if structure.property(key).is_none() {
            warn!("dropping undeclared property `{}`", join(at, key));
        }
    }

    Ok(bag)
}
