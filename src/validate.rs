//! Range and membership checks for decoded property values.
//!
//! Decoding stores basic values without comparing them to the type's
//! `min_value`/`max_value`, and enum values without checking they are
//! declared members. This pass reports both.

use crate::error::DocumentError;
use crate::model::{MapDocument, PropertyBag, PropertyValue, SchemaTypeRegistry};

/// Every violation in `bag`; `at` prefixes the reported keys.
pub fn check_bag(bag: &PropertyBag, types: &SchemaTypeRegistry, at: &str) -> Vec<DocumentError> {
    let mut errors = Vec::new();
    for prop in bag {
        let key = format!("{at}.{}", prop.name);
        match &prop.value {
            PropertyValue::BasicType(value) => {
                if let Some(t) = types.basic_type(&prop.type_name) {
                    if !t.contains(*value) {
                        errors.push(DocumentError::ValueOutOfRange {
                            key,
                            type_name: t.name.clone(),
                            value: *value,
                            min: t.min_value,
                            max: t.max_value,
                        });
                    }
                }
            }
            PropertyValue::Enumeration(member) => {
                if let Some(e) = types.enumeration(&prop.type_name) {
                    if !e.contains(member) {
                        errors.push(DocumentError::UnknownEnumMember {
                            key,
                            type_name: e.name.clone(),
                            value: member.clone(),
                        });
                    }
                }
            }
        }
    }
    errors
}

/// All violations across map objects and collisions, in document order.
pub fn validate_document(doc: &MapDocument) -> Vec<DocumentError> {
    let mut errors = Vec::new();
    for (ci, camera) in doc.cameras.iter().enumerate() {
        for (oi, object) in camera.map_objects.iter().enumerate() {
            let at = format!("map.cameras[{ci}].map_objects[{oi}].properties");
            errors.extend(check_bag(&object.properties, &doc.types, &at));
        }
    }
    for (i, collision) in doc.collisions.iter().enumerate() {
        let at = format!("map.collisions.items[{i}]");
        errors.extend(check_bag(&collision.properties, &doc.types, &at));
    }
    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{DecodeOptions, decode, decode_with};
    use serde_json::json;

    fn document(scale: i64, facing: &str) -> Vec<u8> {
        json!({
            "api_version": 1, "game": "AE",
            "map": {
                "path_bnd": "b", "path_id": 1,
                "x_grid_size": 375, "x_size": 2, "y_grid_size": 260, "y_size": 1,
                "cameras": [ { "id": 1, "name": "c", "x": 0, "y": 0, "map_objects": [
                    { "name": "m", "object_structures_type": "Mine",
                      "properties": { "scale": scale, "facing": facing } }
                ] } ],
                "collisions": {
                    "structure": [ { "name": "type", "Type": "Scale", "Visible": true } ],
                    "items": [ { "type": 1 } ]
                }
            },
            "schema": {
                "object_structure_property_basic_types": [
                    { "name": "Scale", "min_value": 0, "max_value": 1 }
                ],
                "object_structure_property_enums": [
                    { "name": "Facing", "values": ["Right", "Left"] }
                ],
                "object_structures": [ { "name": "Mine", "enum_and_basic_type_properties": [
                    { "name": "scale", "Type": "Scale", "Visible": true },
                    { "name": "facing", "Type": "Facing", "Visible": true }
                ] } ]
            }
        })
        .to_string()
        .into_bytes()
    }

    #[test]
    fn valid_values_pass() {
        let doc = decode(&document(1, "Left")).unwrap();
        assert!(validate_document(&doc).is_empty());
        assert!(decode_with(&document(0, "Right"), &DecodeOptions::strict()).is_ok());
    }

    #[test]
    fn violations_are_reported_not_fatal_by_default() {
        let doc = decode(&document(5, "Up")).unwrap();
        let errors = validate_document(&doc);
        assert_eq!(errors.len(), 2);
        match &errors[0] {
            DocumentError::ValueOutOfRange { key, value, min, max, .. } => {
                assert_eq!(key, "map.cameras[0].map_objects[0].properties.scale");
                assert_eq!((*value, *min, *max), (5, 0, 1));
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(matches!(
            &errors[1],
            DocumentError::UnknownEnumMember { value, .. } if value == "Up"
        ));
    }

    #[test]
    fn strict_decode_fails_on_first_violation() {
        assert!(matches!(
            decode_with(&document(-1, "Right"), &DecodeOptions::strict()),
            Err(DocumentError::ValueOutOfRange { value: -1, .. })
        ));
    }
}
