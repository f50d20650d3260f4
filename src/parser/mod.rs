use std::path::Path;

use serde_json::{Map, Value};
use tracing::{debug, trace};

use crate::error::{DocumentError, FieldKind, Result};
use crate::model::{
    COLLISION_STRUCTURE_NAME, Camera, CameraImageLayers, CollisionObject, LayerKind, MapDocument,
    MapInfo, MapObject, ObjectStructure, ObjectStructureRegistry, SchemaTypeRegistry,
};
use crate::validate;

pub mod properties;
pub mod schema;

pub use properties::read_properties;

/// Knobs for [`decode_with`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Reject basic values outside their type's range and enum values that
    /// are not declared members. Off by default.
    pub strict_values: bool,
}

impl DecodeOptions {
    pub fn strict() -> Self {
        Self {
            strict_values: true,
        }
    }
}

/// Reads and decodes a map file.
pub fn load(path: &Path, options: &DecodeOptions) -> Result<MapDocument> {
    let bytes = std::fs::read(path).map_err(|source| DocumentError::IoRead {
        path: path.to_path_buf(),
        source,
    })?;
    debug!("read {} ({} bytes)", path.display(), bytes.len());
    decode_with(&bytes, options)
}

pub fn decode(bytes: &[u8]) -> Result<MapDocument> {
    decode_with(bytes, &DecodeOptions::default())
}

/// Decodes a whole document. The first structural or referential problem
/// aborts the decode.
///
/// Order of work: map info, the raw `schema` stash, basic types and enums,
/// object structures, cameras with their objects, then collisions.
pub fn decode_with(bytes: &[u8], options: &DecodeOptions) -> Result<MapDocument> {
    let root: Value = serde_json::from_slice(bytes)?;
    let root = root
        .as_object()
        .ok_or_else(|| DocumentError::wrong_type("(root)", FieldKind::Object))?;

    let map = read_object(root, "map", "")?;
    let info = MapInfo {
        api_version: read_number(root, "api_version", "")?,
        game: read_string(root, "game", "")?,
        path_bnd: read_string(map, "path_bnd", "map")?,
        path_id: read_number(map, "path_id", "map")?,
        x_grid_size: read_number(map, "x_grid_size", "map")?,
        x_size: read_number(map, "x_size", "map")?,
        y_grid_size: read_number(map, "y_grid_size", "map")?,
        y_size: read_number(map, "y_size", "map")?,
    };

    let raw_schema = read_object(root, "schema", "")?.clone();
    let types = schema::load_types(&raw_schema, "schema")?;
    let structures = schema::load_structures(&raw_schema, &types, "schema")?;
    debug!(
        basic_types = types.basic_types().len(),
        enums = types.enums().len(),
        structures = structures.len(),
        "schema loaded"
    );

    let cameras_at = join("map", "cameras");
    let mut cameras = Vec::new();
    for (i, value) in read_array(map, "cameras", "map")?.iter().enumerate() {
        let at = index(&cameras_at, i);
        let camera = as_object(value, &at)?;
        cameras.push(read_camera(camera, &at, &types, &structures)?);
    }

    let collisions_at = join("map", "collisions");
    let collisions_obj = read_object(map, "collisions", "map")?;
    let items = read_array(collisions_obj, "items", &collisions_at)?;
    let raw_collision_structure = read_array(collisions_obj, "structure", &collisions_at)?.clone();
    let collision_structure = ObjectStructure::new(
        COLLISION_STRUCTURE_NAME,
        schema::read_structure_properties(
            &raw_collision_structure,
            &join(&collisions_at, "structure"),
        )?,
    )?;
    collision_structure.check_types(&types)?;

    let items_at = join(&collisions_at, "items");
    let mut collisions = Vec::with_capacity(items.len());
    for (i, value) in items.iter().enumerate() {
        let at = index(&items_at, i);
        let item = as_object(value, &at)?;
        collisions.push(CollisionObject {
            properties: read_properties(&collision_structure, &types, item, &at)?,
        });
    }

    debug!(
        cameras = cameras.len(),
        map_objects = cameras.iter().map(|c| c.map_objects.len()).sum::<usize>(),
        collisions = collisions.len(),
        "map decoded"
    );

    let doc = MapDocument {
        info,
        raw_schema,
        types,
        structures,
        cameras,
        collision_structure,
        raw_collision_structure,
        collisions,
    };

    if options.strict_values {
        if let Some(err) = validate::validate_document(&doc).into_iter().next() {
            return Err(err);
        }
    }

    Ok(doc)
}

fn read_camera(
    camera: &Map<String, Value>,
    at: &str,
    types: &SchemaTypeRegistry,
    structures: &ObjectStructureRegistry,
) -> Result<Camera> {
    let mut layers = CameraImageLayers::default();
    for kind in LayerKind::ALL {
        layers.set(kind, read_string_optional(camera, kind.key(), at)?);
    }

    let mut map_objects = Vec::new();
    if let Some(objects) = read_array_optional(camera, "map_objects", at)? {
        let objects_at = join(at, "map_objects");
        let empty = Map::new();
        for (j, value) in objects.iter().enumerate() {
            let obj_at = index(&objects_at, j);
            let obj = as_object(value, &obj_at)?;
            let name = read_string(obj, "name", &obj_at)?;
            let object_structure_type = read_string(obj, "object_structures_type", &obj_at)?;
            let structure = structures.get(&object_structure_type)?;
            let raw = read_object_optional(obj, "properties", &obj_at)?.unwrap_or(&empty);
            let properties = read_properties(structure, types, raw, &join(&obj_at, "properties"))?;
            map_objects.push(MapObject {
                name,
                object_structure_type,
                properties,
            });
        }
    }

    let camera = Camera {
        id: read_number(camera, "id", at)?,
        name: read_string(camera, "name", at)?,
        x: read_number(camera, "x", at)?,
        y: read_number(camera, "y", at)?,
        layers,
        map_objects,
    };
    trace!(
        "camera {} with {} objects",
        camera.label(),
        camera.map_objects.len()
    );
    Ok(camera)
}

// ─────────────────────────────────────────────────────
// Field readers. `at` is the dotted path of `obj`, used in error keys.
// ─────────────────────────────────────────────────────

pub(crate) fn join(at: &str, key: &str) -> String {
    if at.is_empty() {
        key.to_string()
    } else {
        format!("{at}.{key}")
    }
}

pub(crate) fn index(at: &str, i: usize) -> String {
    format!("{at}[{i}]")
}

fn field<'a>(obj: &'a Map<String, Value>, key: &str, at: &str) -> Result<&'a Value> {
    match obj.get(key) {
        None | Some(Value::Null) => Err(DocumentError::missing(join(at, key))),
        Some(v) => Ok(v),
    }
}

pub(crate) fn as_object<'a>(value: &'a Value, at: &str) -> Result<&'a Map<String, Value>> {
    value
        .as_object()
        .ok_or_else(|| DocumentError::wrong_type(at, FieldKind::Object))
}

/// Integer view of a JSON number; fractional parts are truncated.
pub(crate) fn as_number(value: &Value) -> Option<i64> {
    value
        .as_i64()
        .or_else(|| value.as_f64().map(|f| f.trunc() as i64))
}

pub(crate) fn read_object<'a>(
    obj: &'a Map<String, Value>,
    key: &str,
    at: &str,
) -> Result<&'a Map<String, Value>> {
    as_object(field(obj, key, at)?, &join(at, key))
}

pub(crate) fn read_object_optional<'a>(
    obj: &'a Map<String, Value>,
    key: &str,
    at: &str,
) -> Result<Option<&'a Map<String, Value>>> {
    match obj.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(v) => as_object(v, &join(at, key)).map(Some),
    }
}

pub(crate) fn read_array<'a>(
    obj: &'a Map<String, Value>,
    key: &str,
    at: &str,
) -> Result<&'a Vec<Value>> {
    field(obj, key, at)?
        .as_array()
        .ok_or_else(|| DocumentError::wrong_type(join(at, key), FieldKind::Array))
}

pub(crate) fn read_array_optional<'a>(
    obj: &'a Map<String, Value>,
    key: &str,
    at: &str,
) -> Result<Option<&'a Vec<Value>>> {
    match obj.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(v) => v
            .as_array()
            .map(Some)
            .ok_or_else(|| DocumentError::wrong_type(join(at, key), FieldKind::Array)),
    }
}

pub(crate) fn read_number(obj: &Map<String, Value>, key: &str, at: &str) -> Result<i64> {
    as_number(field(obj, key, at)?)
        .ok_or_else(|| DocumentError::wrong_type(join(at, key), FieldKind::Number))
}

pub(crate) fn read_string(obj: &Map<String, Value>, key: &str, at: &str) -> Result<String> {
    field(obj, key, at)?
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| DocumentError::wrong_type(join(at, key), FieldKind::String))
}

/// Absent (or null) reads as the empty string.
pub(crate) fn read_string_optional(
    obj: &Map<String, Value>,
    key: &str,
    at: &str,
) -> Result<String> {
    match obj.get(key) {
        None | Some(Value::Null) => Ok(String::new()),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(DocumentError::wrong_type(join(at, key), FieldKind::String)),
    }
}

pub(crate) fn read_bool(obj: &Map<String, Value>, key: &str, at: &str) -> Result<bool> {
    field(obj, key, at)?
        .as_bool()
        .ok_or_else(|| DocumentError::wrong_type(join(at, key), FieldKind::Bool))
}
