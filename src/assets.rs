//! Typed model registry
//!
//! Loading is someone else's job: a loader hands over one scene tree per
//! asset, keyed by `AssetId` (or by the asset's path, which maps back to an
//! id). The game only clones out of the registry, it never mutates it.

use std::collections::HashMap;
use std::fmt;

use glam::Vec3;

use crate::scene::{Aabb, NodeIds, SceneNode, Transform};

/// Every model the game ships with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AssetId {
    Road,
    Sky,
    Bike,
    StreetLight,
    RoadBlock,
    StarryNight,
    MilkyWay,
    Tree,
    RoadFence,
}

impl AssetId {
    /// Full manifest, in load order
    pub const ALL: [AssetId; 9] = [
        AssetId::Road,
        AssetId::Sky,
        AssetId::Bike,
        AssetId::StreetLight,
        AssetId::RoadBlock,
        AssetId::StarryNight,
        AssetId::MilkyWay,
        AssetId::Tree,
        AssetId::RoadFence,
    ];

    /// Models the scene cannot be built without
    pub const REQUIRED: [AssetId; 5] = [
        AssetId::Road,
        AssetId::Sky,
        AssetId::Bike,
        AssetId::StreetLight,
        AssetId::RoadFence,
    ];

    pub fn path(&self) -> &'static str {
        match self {
            AssetId::Road => "/assets/models/road.glb",
            AssetId::Sky => "/assets/models/sky.glb",
            AssetId::Bike => "/assets/models/bike.glb",
            AssetId::StreetLight => "/assets/models/street_light.glb",
            AssetId::RoadBlock => "/assets/models/road_block.glb",
            AssetId::StarryNight => "/assets/models/starry_night.glb",
            AssetId::MilkyWay => "/assets/models/milkyway.glb",
            AssetId::Tree => "/assets/models/tree.glb",
            AssetId::RoadFence => "/assets/models/road_fence.glb",
        }
    }

    pub fn from_path(path: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|id| id.path() == path)
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Errors raised while building the scene from models
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("required model {0} is not loaded")]
    Missing(AssetId),

    #[error("model {id} is unusable: {reason}")]
    Degenerate { id: AssetId, reason: String },

    #[error("no asset is registered under path '{0}'")]
    UnknownPath(String),
}

/// Name of the front wheel assembly inside the bike model
pub const FRONT_WHEEL_NODE: &str = "Object_40";
/// Name of the rear tyre mesh inside the bike model
pub const REAR_WHEEL_NODE: &str = "Object_47";

/// Loaded models keyed by asset id
#[derive(Debug, Clone, Default)]
pub struct ModelLibrary {
    models: HashMap<AssetId, SceneNode>,
}

impl ModelLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: AssetId, model: SceneNode) {
        self.models.insert(id, model);
    }

    /// Register a model by its asset path
    pub fn insert_path(&mut self, path: &str, model: SceneNode) -> Result<AssetId, AssetError> {
        let id = AssetId::from_path(path).ok_or_else(|| AssetError::UnknownPath(path.to_string()))?;
        self.insert(id, model);
        Ok(id)
    }

    pub fn get(&self, id: AssetId) -> Option<&SceneNode> {
        self.models.get(&id)
    }

    pub fn require(&self, id: AssetId) -> Result<&SceneNode, AssetError> {
        self.get(id).ok_or(AssetError::Missing(id))
    }

    pub fn contains(&self, id: AssetId) -> bool {
        self.models.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Manifest entries with no model
    pub fn missing(&self) -> Vec<AssetId> {
        AssetId::ALL
            .into_iter()
            .filter(|id| !self.contains(*id))
            .collect()
    }

    /// Box-shaped stand-ins with plausible extents for every model the game
    /// core touches. Used by the native demo and by tests.
    pub fn placeholder(ids: &mut NodeIds) -> Self {
        let boxed = |ids: &mut NodeIds, name: &str, center: Vec3, size: Vec3| {
            SceneNode::mesh(ids, name, Aabb::from_center_size(center, size))
        };

        let mut lib = Self::new();

        // Road tile: off-center on purpose, the assembler recenters it
        lib.insert(
            AssetId::Road,
            SceneNode::group(ids, "road").with_child(boxed(
                ids,
                "road_surface",
                Vec3::new(0.5, 0.05, 0.25),
                Vec3::new(4.0, 0.1, 3.0),
            )),
        );
        lib.insert(
            AssetId::StreetLight,
            boxed(ids, "street_light", Vec3::new(0.0, 2.0, 0.0), Vec3::new(0.3, 4.0, 0.3)),
        );
        lib.insert(
            AssetId::RoadFence,
            boxed(ids, "road_fence", Vec3::new(0.0, 0.4, 0.0), Vec3::new(1.0, 0.8, 0.1)),
        );
        lib.insert(
            AssetId::RoadBlock,
            boxed(ids, "road_block", Vec3::new(0.0, 0.4, 0.0), Vec3::new(1.2, 0.8, 0.4)),
        );
        lib.insert(
            AssetId::Sky,
            boxed(ids, "sky", Vec3::ZERO, Vec3::splat(10.0)),
        );

        // Bike faces +Z in model space; the assembler turns it around
        let front_wheel = SceneNode::group(ids, FRONT_WHEEL_NODE)
            .with_transform(Transform::from_translation(Vec3::new(0.0, 0.0, 0.7)))
            .with_child(boxed(
                ids,
                "Object_41",
                Vec3::new(0.0, 0.35, 0.0),
                Vec3::new(0.15, 0.7, 0.7),
            ));
        let rear_wheel = boxed(
            ids,
            REAR_WHEEL_NODE,
            Vec3::new(0.0, 0.35, 0.0),
            Vec3::new(0.18, 0.7, 0.7),
        )
        .with_transform(Transform::from_translation(Vec3::new(0.0, 0.0, -0.7)));
        lib.insert(
            AssetId::Bike,
            SceneNode::group(ids, "bike")
                .with_child(boxed(
                    ids,
                    "frame",
                    Vec3::new(0.0, 0.6, 0.0),
                    Vec3::new(0.5, 0.8, 1.6),
                ))
                .with_child(front_wheel)
                .with_child(rear_wheel),
        );

        lib
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_round_trip_through_manifest() {
        for id in AssetId::ALL {
            assert_eq!(AssetId::from_path(id.path()), Some(id));
        }
        assert_eq!(AssetId::from_path("/assets/models/nope.glb"), None);
    }

    #[test]
    fn test_require_and_insert_path() {
        let mut ids = NodeIds::new();
        let mut lib = ModelLibrary::new();
        assert!(matches!(
            lib.require(AssetId::Road),
            Err(AssetError::Missing(AssetId::Road))
        ));

        let id = lib
            .insert_path("/assets/models/road.glb", SceneNode::group(&mut ids, "road"))
            .unwrap();
        assert_eq!(id, AssetId::Road);
        assert!(lib.require(AssetId::Road).is_ok());

        let err = lib
            .insert_path("/assets/models/car.glb", SceneNode::group(&mut ids, "car"))
            .unwrap_err();
        assert!(err.to_string().contains("car.glb"));
    }

    #[test]
    fn test_placeholder_covers_required_models() {
        let mut ids = NodeIds::new();
        let lib = ModelLibrary::placeholder(&mut ids);
        for id in AssetId::REQUIRED {
            assert!(lib.contains(id), "{id} missing");
        }
        assert!(lib.contains(AssetId::RoadBlock));
        assert_eq!(
            lib.missing(),
            vec![AssetId::StarryNight, AssetId::MilkyWay, AssetId::Tree]
        );

        let bike = lib.require(AssetId::Bike).unwrap();
        assert!(bike.find_by_name(FRONT_WHEEL_NODE).is_some());
        assert!(bike.find_by_name(REAR_WHEEL_NODE).is_some());
    }
}
