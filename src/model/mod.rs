//! In-memory map document.
//!
//! The document exclusively owns its cameras, collisions and registries.
//! Cameras own their map objects. Callers refer to entities through
//! [`CameraIndex`] / [`MapObjectRef`] handles looked up on the document.

pub mod property;
pub mod schema;

use serde::Serialize;
use serde_json::{Map, Value};

pub use property::{ObjectProperty, PropertyBag, PropertyValue};
pub use schema::{
    BasicType, COLLISION_STRUCTURE_NAME, Enum, EnumOrBasicTypeProperty, FoundType,
    ObjectStructure, ObjectStructureRegistry, PropertyKind, SchemaTypeRegistry,
};

use crate::error::Result;

/// Map-wide metadata.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct MapInfo {
    pub api_version: i64,
    pub game: String,
    pub path_bnd: String,
    pub path_id: i64,
    pub x_grid_size: i64,
    pub x_size: i64,
    pub y_grid_size: i64,
    pub y_size: i64,
}

/// One of the five image layers a camera can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum LayerKind {
    Main,
    Foreground,
    Background,
    ForegroundWell,
    BackgroundWell,
}

impl LayerKind {
    pub const ALL: [LayerKind; 5] = [
        LayerKind::Main,
        LayerKind::Foreground,
        LayerKind::Background,
        LayerKind::ForegroundWell,
        LayerKind::BackgroundWell,
    ];

    /// Field name used in the document.
    pub fn key(self) -> &'static str {
        match self {
            LayerKind::Main => "image",
            LayerKind::Foreground => "foreground_layer",
            LayerKind::Background => "background_layer",
            LayerKind::ForegroundWell => "foreground_well_layer",
            LayerKind::BackgroundWell => "background_well_layer",
        }
    }
}

/// Base64 PNG strings; an empty string means the layer is absent.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CameraImageLayers {
    pub image: String,
    pub foreground_layer: String,
    pub background_layer: String,
    pub foreground_well_layer: String,
    pub background_well_layer: String,
}

impl CameraImageLayers {
    pub fn get(&self, kind: LayerKind) -> &str {
        match kind {
            LayerKind::Main => &self.image,
            LayerKind::Foreground => &self.foreground_layer,
            LayerKind::Background => &self.background_layer,
            LayerKind::ForegroundWell => &self.foreground_well_layer,
            LayerKind::BackgroundWell => &self.background_well_layer,
        }
    }

    pub fn set(&mut self, kind: LayerKind, data: impl Into<String>) {
        let slot = match kind {
            LayerKind::Main => &mut self.image,
            LayerKind::Foreground => &mut self.foreground_layer,
            LayerKind::Background => &mut self.background_layer,
            LayerKind::ForegroundWell => &mut self.foreground_well_layer,
            LayerKind::BackgroundWell => &mut self.background_well_layer,
        };
        *slot = data.into();
    }

    /// Non-empty layers in canonical order.
    pub fn present(&self) -> impl Iterator<Item = (LayerKind, &str)> {
        LayerKind::ALL
            .into_iter()
            .map(|k| (k, self.get(k)))
            .filter(|(_, data)| !data.is_empty())
    }
}

/// A placed instance of an object structure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapObject {
    pub name: String,
    pub object_structure_type: String,
    /// Empty when the structure declares no properties.
    pub properties: PropertyBag,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Camera {
    pub id: i64,
    pub name: String,
    pub x: i64,
    pub y: i64,
    pub layers: CameraImageLayers,
    pub map_objects: Vec<MapObject>,
}

impl Camera {
    /// `"name @ x,y"`, or just `"x,y"` for an unnamed camera.
    pub fn label(&self) -> String {
        let pos = format!("{},{}", self.x, self.y);
        if self.name.is_empty() {
            pos
        } else {
            format!("{} @ {}", self.name, pos)
        }
    }
}

/// A collision entry validated against the inline collision structure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollisionObject {
    pub properties: PropertyBag,
}

/// Position of a camera in [`MapDocument::cameras`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CameraIndex(pub usize);

/// Position of a map object inside its owning camera.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MapObjectRef {
    pub camera: CameraIndex,
    pub object: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MapDocument {
    pub info: MapInfo,
    /// The `schema` section exactly as it was read; re-emitted unchanged.
    pub raw_schema: Map<String, Value>,
    pub types: SchemaTypeRegistry,
    pub structures: ObjectStructureRegistry,
    pub cameras: Vec<Camera>,
    pub collision_structure: ObjectStructure,
    /// The `collisions.structure` array exactly as it was read.
    pub raw_collision_structure: Vec<Value>,
    pub collisions: Vec<CollisionObject>,
}

impl MapDocument {
    pub fn camera(&self, index: CameraIndex) -> Option<&Camera> {
        self.cameras.get(index.0)
    }

    pub fn camera_mut(&mut self, index: CameraIndex) -> Option<&mut Camera> {
        self.cameras.get_mut(index.0)
    }

    /// First camera placed at grid cell (`x`, `y`).
    pub fn camera_at(&self, x: i64, y: i64) -> Option<CameraIndex> {
        self.cameras
            .iter()
            .position(|c| c.x == x && c.y == y)
            .map(CameraIndex)
    }

    /// Camera covering a point in map pixel space.
    pub fn camera_at_pixel(&self, px: i64, py: i64) -> Option<CameraIndex> {
        if self.info.x_grid_size <= 0 || self.info.y_grid_size <= 0 {
            return None;
        }
        self.camera_at(
            px.div_euclid(self.info.x_grid_size),
            py.div_euclid(self.info.y_grid_size),
        )
    }

    pub fn map_object(&self, r: MapObjectRef) -> Option<&MapObject> {
        self.camera(r.camera)?.map_objects.get(r.object)
    }

    pub fn map_object_mut(&mut self, r: MapObjectRef) -> Option<&mut MapObject> {
        self.camera_mut(r.camera)?.map_objects.get_mut(r.object)
    }

    /// Every map object with its handle, in camera then object order.
    pub fn map_objects(&self) -> impl Iterator<Item = (MapObjectRef, &MapObject)> {
        self.cameras.iter().enumerate().flat_map(|(ci, cam)| {
            cam.map_objects.iter().enumerate().map(move |(oi, obj)| {
                (
                    MapObjectRef {
                        camera: CameraIndex(ci),
                        object: oi,
                    },
                    obj,
                )
            })
        })
    }

    pub fn structure_of(&self, object: &MapObject) -> Result<&ObjectStructure> {
        self.structures.get(&object.object_structure_type)
    }

    /// Places a new object whose properties take their defaults.
    pub fn add_map_object(
        &mut self,
        camera: CameraIndex,
        name: impl Into<String>,
        structure: &str,
    ) -> Option<Result<MapObjectRef>> {
        let properties = match self
            .structures
            .get(structure)
            .and_then(|s| PropertyBag::with_defaults(s, &self.types))
        {
            Ok(p) => p,
            Err(e) => return Some(Err(e)),
        };
        let cam = self.camera_mut(camera)?;
        cam.map_objects.push(MapObject {
            name: name.into(),
            object_structure_type: structure.to_string(),
            properties,
        });
        Some(Ok(MapObjectRef {
            camera,
            object: cam.map_objects.len() - 1,
        }))
    }

    /// Removes a camera and its objects. Handles to later cameras shift down
    /// by one; handles to the removed camera are invalid afterwards.
    pub fn remove_camera(&mut self, index: CameraIndex) -> Option<Camera> {
        (index.0 < self.cameras.len()).then(|| self.cameras.remove(index.0))
    }

    /// Removes one map object; later objects of the same camera shift down.
    pub fn remove_map_object(&mut self, r: MapObjectRef) -> Option<MapObject> {
        let cam = self.camera_mut(r.camera)?;
        (r.object < cam.map_objects.len()).then(|| cam.map_objects.remove(r.object))
    }

    pub fn summary(&self) -> DocumentSummary {
        DocumentSummary {
            info: self.info.clone(),
            basic_types: self.types.basic_types().len(),
            enums: self.types.enums().len(),
            object_structures: self.structures.len(),
            cameras: self
                .cameras
                .iter()
                .map(|c| CameraSummary {
                    id: c.id,
                    label: c.label(),
                    map_objects: c.map_objects.len(),
                    layers: c.layers.present().map(|(k, _)| k).collect(),
                })
                .collect(),
            collisions: self.collisions.len(),
        }
    }
}

/// Serializable overview of a document for reporting.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentSummary {
    pub info: MapInfo,
    pub basic_types: usize,
    pub enums: usize,
    pub object_structures: usize,
    pub cameras: Vec<CameraSummary>,
    pub collisions: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct CameraSummary {
    pub id: i64,
    pub label: String,
    pub map_objects: usize,
    pub layers: Vec<LayerKind>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DocumentError;

    fn camera(name: &str, x: i64, y: i64) -> Camera {
        Camera {
            id: 0,
            name: name.into(),
            x,
            y,
            layers: CameraImageLayers::default(),
            map_objects: Vec::new(),
        }
    }

    fn document() -> MapDocument {
        let mut types = SchemaTypeRegistry::new();
        types
            .insert_basic_type(BasicType {
                name: "Id".into(),
                min_value: 1,
                max_value: 99,
            })
            .unwrap();
        let mut structures = ObjectStructureRegistry::new();
        structures
            .insert(
                ObjectStructure::new(
                    "Switch",
                    vec![EnumOrBasicTypeProperty {
                        name: "id".into(),
                        type_name: "Id".into(),
                        visible: true,
                    }],
                )
                .unwrap(),
                &types,
            )
            .unwrap();
        MapDocument {
            info: MapInfo {
                x_grid_size: 375,
                y_grid_size: 260,
                ..MapInfo::default()
            },
            raw_schema: Map::new(),
            types,
            structures,
            cameras: vec![camera("start", 0, 0), camera("", 1, 0), camera("end", 1, 1)],
            collision_structure: ObjectStructure::new(COLLISION_STRUCTURE_NAME, vec![]).unwrap(),
            raw_collision_structure: Vec::new(),
            collisions: Vec::new(),
        }
    }

    #[test]
    fn labels() {
        assert_eq!(camera("R1P01C01", 3, 4).label(), "R1P01C01 @ 3,4");
        assert_eq!(camera("", 3, 4).label(), "3,4");
    }

    #[test]
    fn camera_lookup_by_cell_and_pixel() {
        let doc = document();
        assert_eq!(doc.camera_at(1, 0), Some(CameraIndex(1)));
        assert_eq!(doc.camera_at(5, 5), None);
        assert_eq!(doc.camera_at_pixel(400, 300), Some(CameraIndex(2)));
        assert_eq!(doc.camera_at_pixel(374, 259), Some(CameraIndex(0)));
    }

    #[test]
    fn layers_by_kind() {
        let mut layers = CameraImageLayers::default();
        assert_eq!(layers.present().count(), 0);
        layers.set(LayerKind::BackgroundWell, "iVBO");
        layers.set(LayerKind::Main, "AAAA");
        assert_eq!(layers.background_well_layer, "iVBO");
        let present: Vec<_> = layers.present().map(|(k, _)| k.key()).collect();
        assert_eq!(present, ["image", "background_well_layer"]);
    }

    #[test]
    fn add_and_remove_objects() {
        let mut doc = document();
        let r = doc
            .add_map_object(CameraIndex(2), "lever", "Switch")
            .unwrap()
            .unwrap();
        assert_eq!(r.object, 0);
        let obj = doc.map_object(r).unwrap();
        assert_eq!(obj.properties.get("id").unwrap().value.as_basic(), Some(1));

        assert!(doc.add_map_object(CameraIndex(9), "x", "Switch").is_none());
        assert!(matches!(
            doc.add_map_object(CameraIndex(0), "x", "Door"),
            Some(Err(DocumentError::UnknownObjectStructure { .. }))
        ));

        let removed = doc.remove_map_object(r).unwrap();
        assert_eq!(removed.name, "lever");
        assert!(doc.map_object(r).is_none());
    }

    #[test]
    fn removing_a_camera_shifts_later_handles() {
        let mut doc = document();
        let removed = doc.remove_camera(CameraIndex(0)).unwrap();
        assert_eq!(removed.name, "start");
        assert_eq!(doc.camera(CameraIndex(1)).unwrap().name, "end");
        assert!(doc.remove_camera(CameraIndex(2)).is_none());
    }
}
