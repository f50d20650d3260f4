//! Readers for the `schema` section and structure property lists.

use serde_json::{Map, Value};

use super::{as_object, index, join, read_array, read_bool, read_number, read_string};
use crate::error::{DocumentError, FieldKind, Result};
use crate::model::{
    BasicType, Enum, EnumOrBasicTypeProperty, ObjectStructure, ObjectStructureRegistry,
    SchemaTypeRegistry,
};

/// Builds the type registry from `object_structure_property_basic_types`
/// and `object_structure_property_enums`.
pub fn load_types(schema: &Map<String, Value>, at: &str) -> Result<SchemaTypeRegistry> {
    let mut types = SchemaTypeRegistry::new();

    let basic_at = join(at, "object_structure_property_basic_types");
    for (i, value) in read_array(schema, "object_structure_property_basic_types", at)?
        .iter()
        .enumerate()
    {
        let item_at = index(&basic_at, i);
        let item = as_object(value, &item_at)?;
        types.insert_basic_type(BasicType {
            name: read_string(item, "name", &item_at)?,
            max_value: read_number(item, "max_value", &item_at)?,
            min_value: read_number(item, "min_value", &item_at)?,
        })?;
    }

    let enums_at = join(at, "object_structure_property_enums");
    for (i, value) in read_array(schema, "object_structure_property_enums", at)?
        .iter()
        .enumerate()
    {
        let item_at = index(&enums_at, i);
        let item = as_object(value, &item_at)?;
        let name = read_string(item, "name", &item_at)?;
        let values_at = join(&item_at, "values");
        let values = read_array(item, "values", &item_at)?
            .iter()
            .enumerate()
            .map(|(j, v)| {
                v.as_str()
                    .map(str::to_string)
                    .ok_or_else(|| DocumentError::wrong_type(index(&values_at, j), FieldKind::String))
            })
            .collect::<Result<Vec<_>>>()?;
        types.insert_enum(Enum { name, values })?;
    }

    Ok(types)
}

/// Builds the structure registry from `object_structures`. Every property
/// type must already be known to `types`.
pub fn load_structures(
    schema: &Map<String, Value>,
    types: &SchemaTypeRegistry,
    at: &str,
) -> Result<ObjectStructureRegistry> {
    let mut structures = ObjectStructureRegistry::new();
    let list_at = join(at, "object_structures");
    for (i, value) in read_array(schema, "object_structures", at)?
        .iter()
        .enumerate()
    {
        let item_at = index(&list_at, i);
        let item = as_object(value, &item_at)?;
        let name = read_string(item, "name", &item_at)?;
        let props = read_array(item, "enum_and_basic_type_properties", &item_at)?;
        let properties = read_structure_properties(
            props,
            &join(&item_at, "enum_and_basic_type_properties"),
        )?;
        structures.insert(ObjectStructure::new(name, properties)?, types)?;
    }
    Ok(structures)
}

/// Reads `{"name", "Type", "Visible"}` declarations in order.
pub fn read_structure_properties(
    list: &[Value],
    at: &str,
) -> Result<Vec<EnumOrBasicTypeProperty>> {
    list.iter()
        .enumerate()
        .map(|(i, value)| {
            let item_at = index(at, i);
            let item = as_object(value, &item_at)?;
            Ok(EnumOrBasicTypeProperty {
                name: read_string(item, "name", &item_at)?,
                type_name: read_string(item, "Type", &item_at)?,
                visible: read_bool(item, "Visible", &item_at)?,
            })
        })
        .collect()
}
