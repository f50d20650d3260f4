use map_model::model::{
    BasicType, Enum, EnumOrBasicTypeProperty, ObjectStructure, SchemaTypeRegistry,
};
use map_model::parser::read_properties;
use proptest::prelude::*;
use serde_json::{Map, Value};

fn registry() -> SchemaTypeRegistry {
    let mut types = SchemaTypeRegistry::new();
    types
        .insert_basic_type(BasicType {
            name: "Int".into(),
            min_value: i64::from(i32::MIN),
            max_value: i64::from(i32::MAX),
        })
        .unwrap();
    types
        .insert_enum(Enum {
            name: "Colour".into(),
            values: vec!["Red".into(), "Green".into(), "Blue".into()],
        })
        .unwrap();
    types
}

/// Property `pN` is a number for even N and an enum for odd N.
fn structure(count: usize) -> ObjectStructure {
    let properties = (0..count)
        .map(|i| EnumOrBasicTypeProperty {
            name: format!("p{i}"),
            type_name: if i % 2 == 0 { "Int" } else { "Colour" }.into(),
            visible: i % 3 != 0,
        })
        .collect();
    ObjectStructure::new("Generated", properties).unwrap()
}

proptest! {
    #[test]
    fn bag_order_ignores_input_key_order(
        values in prop::collection::vec(any::<i32>(), 1..12),
        seed in any::<u64>(),
    ) {
        let structure = structure(values.len());
        let types = registry();

        let mut entries: Vec<(String, Value)> = values
            .iter()
            .enumerate()
            .map(|(i, v)| {
                let value = if i % 2 == 0 {
                    Value::from(*v)
                } else {
                    Value::from(["Red", "Green", "Blue"][v.unsigned_abs() as usize % 3])
                };
                (format!("p{i}"), value)
            })
            .collect();
        // deterministic shuffle
        let mut state = seed;
        for i in (1..entries.len()).rev() {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            entries.swap(i, (state >> 33) as usize % (i + 1));
        }
        let raw: Map<String, Value> = entries.into_iter().collect();

        let bag = read_properties(&structure, &types, &raw, "p").unwrap();
        let expected: Vec<_> = structure.properties.iter().map(|p| p.name.as_str()).collect();
        prop_assert_eq!(bag.names().collect::<Vec<_>>(), expected);
        for (i, prop) in bag.iter().enumerate() {
            prop_assert_eq!(&prop.value.to_json(), &raw[&prop.name]);
            prop_assert_eq!(prop.visible, i % 3 != 0);
        }
    }
}
