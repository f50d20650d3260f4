//! Serializes a [`MapDocument`] back into the map file format.
//!
//! Output order is fixed: map info, cameras, collisions (items then the
//! stored structure), then the stored `schema` section. The schema stashes
//! are written as they were read, never rebuilt from the registries.

use std::path::Path;

use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{DocumentError, Result};
use crate::model::{Camera, MapDocument, MapObject};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EncodeOptions {
    /// Indent the output instead of writing it on one line.
    pub pretty: bool,
}

pub fn encode(doc: &MapDocument) -> Value {
    let info = &doc.info;
    let mut map = Map::new();
    map.insert("path_bnd".into(), info.path_bnd.clone().into());
    map.insert("path_id".into(), info.path_id.into());
    map.insert("x_grid_size".into(), info.x_grid_size.into());
    map.insert("x_size".into(), info.x_size.into());
    map.insert("y_grid_size".into(), info.y_grid_size.into());
    map.insert("y_size".into(), info.y_size.into());
    map.insert(
        "cameras".into(),
        Value::Array(doc.cameras.iter().map(camera).collect()),
    );

    let mut collisions = Map::new();
    collisions.insert(
        "items".into(),
        Value::Array(
            doc.collisions
                .iter()
                .map(|c| Value::Object(c.properties.to_json_object()))
                .collect(),
        ),
    );
    collisions.insert(
        "structure".into(),
        Value::Array(doc.raw_collision_structure.clone()),
    );
    map.insert("collisions".into(), Value::Object(collisions));

    let mut root = Map::new();
    root.insert("api_version".into(), info.api_version.into());
    root.insert("game".into(), info.game.clone().into());
    root.insert("map".into(), Value::Object(map));
    root.insert("schema".into(), Value::Object(doc.raw_schema.clone()));
    Value::Object(root)
}

/// Empty layers and empty object lists are left out.
fn camera(camera: &Camera) -> Value {
    let mut obj = Map::new();
    obj.insert("id".into(), camera.id.into());
    obj.insert("name".into(), camera.name.clone().into());
    obj.insert("x".into(), camera.x.into());
    obj.insert("y".into(), camera.y.into());
    for (kind, data) in camera.layers.present() {
        obj.insert(kind.key().into(), data.into());
    }
    if !camera.map_objects.is_empty() {
        obj.insert(
            "map_objects".into(),
            Value::Array(camera.map_objects.iter().map(map_object).collect()),
        );
    }
    Value::Object(obj)
}

fn map_object(object: &MapObject) -> Value {
    let mut obj = Map::new();
    obj.insert("name".into(), object.name.clone().into());
    obj.insert(
        "object_structures_type".into(),
        object.object_structure_type.clone().into(),
    );
    if !object.properties.is_empty() {
        obj.insert(
            "properties".into(),
            Value::Object(object.properties.to_json_object()),
        );
    }
    Value::Object(obj)
}

pub fn to_string(doc: &MapDocument, options: &EncodeOptions) -> String {
    let value = encode(doc);
    if options.pretty {
        format!("{value:#}")
    } else {
        value.to_string()
    }
}

pub fn to_bytes(doc: &MapDocument, options: &EncodeOptions) -> Vec<u8> {
    to_string(doc, options).into_bytes()
}

/// Encodes `doc` and writes it to `path`.
pub fn emit(doc: &MapDocument, path: &Path, options: &EncodeOptions) -> Result<()> {
    let bytes = to_bytes(doc, options);
    std::fs::write(path, &bytes).map_err(|source| DocumentError::IoWrite {
        path: path.to_path_buf(),
        source,
    })?;
    debug!("wrote {} ({} bytes)", path.display(), bytes.len());
    Ok(())
}
