use std::path::Path;

use anyhow::{Context, Result};
use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::camera::DEFAULT_FOV_Y;
use crate::locomotion::LocomotionParams;
use crate::view::SlotId;

/// Declarative description of a scene: what goes where, which lights point at
/// what, and where each camera role starts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneConfig {
    pub name: String,
    #[serde(default = "default_sky")]
    pub sky: [f32; 3],
    pub ground: GroundConfig,
    pub lighting: LightingConfig,
    #[serde(default)]
    pub entities: Vec<Placement>,
    pub cameras: Vec<CameraConfig>,
    #[serde(default)]
    pub locomotion: LocomotionParams,
    /// Point the free camera orbits around
    #[serde(default)]
    pub orbit_target: Vec3,
}

impl SceneConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse scene configuration")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read scene file {}", path.display()))?;
        Self::from_json(&json).with_context(|| format!("Invalid scene file {}", path.display()))
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize scene configuration")
    }

    pub fn camera(&self, slot: SlotId) -> Option<&CameraConfig> {
        self.cameras.iter().find(|c| c.slot == slot)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GroundConfig {
    /// Edge length of the square ground plane
    pub size: f32,
    pub color: [f32; 3],
    /// Height of the ground surface
    #[serde(default)]
    pub level: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LightingConfig {
    pub ambient: AmbientConfig,
    pub sun: SunConfig,
    #[serde(default)]
    pub spotlights: Vec<SpotlightConfig>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AmbientConfig {
    pub color: [f32; 3],
    pub intensity: f32,
}

/// Directional light shining from `position` towards the origin
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SunConfig {
    pub color: [f32; 3],
    pub intensity: f32,
    pub position: Vec3,
    #[serde(default = "default_true")]
    pub shadows: bool,
}

/// Spotlight aimed at a named entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpotlightConfig {
    pub name: String,
    pub position: Vec3,
    /// Name of the entity the light is bound to
    pub target: String,
    pub color: [f32; 3],
    pub intensity: f32,
    /// Cone half-angle in degrees
    pub angle: f32,
    /// Distance at which the light fades out completely
    pub range: f32,
}

/// One entity placed in the world
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub name: String,
    #[serde(flatten)]
    pub kind: EntityKind,
    pub position: Vec3,
    /// Rotation about +Y in degrees
    #[serde(default)]
    pub heading: f32,
    #[serde(default = "default_scale")]
    pub scale: f32,
    /// Overrides the kind's default colour
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<[f32; 3]>,
    /// Turn rate about +Y in degrees per second. Helicopters turn only their
    /// rotor, everything else turns as a whole.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spin: Option<f32>,
}

impl Placement {
    pub fn new(name: impl Into<String>, kind: EntityKind, position: Vec3) -> Self {
        Self {
            name: name.into(),
            kind,
            position,
            heading: 0.0,
            scale: 1.0,
            color: None,
            spin: None,
        }
    }

    pub fn heading(mut self, degrees: f32) -> Self {
        self.heading = degrees;
        self
    }

    pub fn scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    pub fn color(mut self, color: [f32; 3]) -> Self {
        self.color = Some(color);
        self
    }

    pub fn spin(mut self, degrees_per_second: f32) -> Self {
        self.spin = Some(degrees_per_second);
        self
    }
}

/// What an entity is. Models are stand-in proxies built from boxes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EntityKind {
    /// Flat strip running along local Z
    Road { length: f32, width: f32 },
    /// Square pad with a procedural "H" decal
    Helipad { radius: f32 },
    Tent,
    Helicopter,
    ArmoredVehicle,
    Crate { size: f32 },
}

impl EntityKind {
    pub fn label(&self) -> &'static str {
        match self {
            EntityKind::Road { .. } => "road",
            EntityKind::Helipad { .. } => "helipad",
            EntityKind::Tent => "tent",
            EntityKind::Helicopter => "helicopter",
            EntityKind::ArmoredVehicle => "armored_vehicle",
            EntityKind::Crate { .. } => "crate",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraConfig {
    pub slot: SlotId,
    pub position: Vec3,
    pub look_at: Vec3,
    /// Vertical field of view in degrees
    #[serde(default = "default_fov")]
    pub fov: f32,
}

fn default_sky() -> [f32; 3] {
    [0.53, 0.68, 0.85]
}

fn default_scale() -> f32 {
    1.0
}

fn default_fov() -> f32 {
    DEFAULT_FOV_Y
}

fn default_true() -> bool {
    true
}
