use std::collections::HashMap;

use glam::{Quat, Vec3};
use thiserror::Error;

use super::config::{CameraConfig, EntityKind, Placement, SceneConfig, SpotlightConfig};
use super::helipad::{helipad_decal, Decal, DECAL_RESOLUTION};
use crate::camera::SpawnTransform;
use crate::locomotion::LocomotionParams;
use crate::math::{scale_rgb, AABB};
use crate::view::{CameraSlot, SlotId};

const GROUND_THICKNESS: f32 = 0.2;
const ROAD_THICKNESS: f32 = 0.02;
const PAD_THICKNESS: f32 = 0.05;

const ROAD_COLOR: [f32; 3] = [0.2, 0.2, 0.22];
const PAD_COLOR: [f32; 3] = [0.32, 0.33, 0.34];
const CANVAS_GREEN: [f32; 3] = [0.33, 0.42, 0.18];
const AIRFRAME_GREEN: [f32; 3] = [0.25, 0.3, 0.22];
const ROTOR_GREY: [f32; 3] = [0.15, 0.15, 0.15];
const HULL_TAN: [f32; 3] = [0.55, 0.5, 0.35];
const CRATE_BROWN: [f32; 3] = [0.45, 0.32, 0.18];

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SceneError {
    #[error("entity name `{0}` is used more than once")]
    DuplicateEntity(String),
    #[error("spotlight `{light}` targets unknown entity `{target}`")]
    UnknownSpotlightTarget { light: String, target: String },
    #[error("scene has no free camera")]
    MissingFreeCamera,
    #[error("camera slot `{0}` is configured more than once")]
    DuplicateCamera(SlotId),
    #[error("`{name}`: {reason}")]
    InvalidDimension { name: String, reason: String },
}

/// Solid box with a flat colour and an optional decal on its top face
#[derive(Debug, Clone, PartialEq)]
pub struct SceneBox {
    pub bounds: AABB,
    pub color: [f32; 3],
    pub decal: Option<usize>,
}

/// Entity after expansion into boxes
#[derive(Debug, Clone, PartialEq)]
pub struct EntityInstance {
    pub name: String,
    pub kind: EntityKind,
    pub bounds: AABB,
    /// Range into `Scene::boxes`
    pub boxes: std::ops::Range<usize>,
}

/// Spotlight with its target resolved to a world position
#[derive(Debug, Clone, PartialEq)]
pub struct Spotlight {
    pub name: String,
    pub target: String,
    pub position: Vec3,
    /// Unit vector from the light towards the target
    pub direction: Vec3,
    pub color: [f32; 3],
    pub cos_cutoff: f32,
    pub range: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Lighting {
    /// Ambient colour pre-multiplied by intensity
    pub ambient: [f32; 3],
    /// Unit vector pointing from the scene towards the sun
    pub sun_direction: Vec3,
    /// Sun colour pre-multiplied by intensity
    pub sun_color: [f32; 3],
    pub sun_shadows: bool,
    pub spotlights: Vec<Spotlight>,
}

/// Boxes of one entity turning about its vertical axis over time
#[derive(Debug, Clone, PartialEq)]
pub struct Spin {
    /// Index into `Scene::entities`
    pub entity: usize,
    pivot: Vec3,
    /// Heading in radians at time zero
    heading: f32,
    /// Radians per second
    rate: f32,
    /// Box index and its bounds before any rotation
    parts: Vec<(usize, AABB)>,
}

impl Spin {
    pub fn rate(&self) -> f32 {
        self.rate
    }

    pub fn box_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.parts.iter().map(|(index, _)| *index)
    }
}

/// Everything the viewport needs to draw
#[derive(Debug, Clone)]
pub struct Scene {
    pub name: String,
    pub sky: [f32; 3],
    pub boxes: Vec<SceneBox>,
    pub entities: Vec<EntityInstance>,
    pub decals: Vec<Decal>,
    pub lighting: Lighting,
    pub spins: Vec<Spin>,
}

impl Scene {
    /// Pose every spinning entity for `time` seconds since start
    pub fn animate(&mut self, time: f32) {
        for spin in &self.spins {
            let rotation = Quat::from_rotation_y(spin.heading + spin.rate * time);
            for (index, rest) in &spin.parts {
                self.boxes[*index].bounds = rest.rotated_about(spin.pivot, rotation);
            }

            let entity = &mut self.entities[spin.entity];
            if let Some(bounds) = self.boxes[entity.boxes.clone()]
                .iter()
                .map(|b| b.bounds)
                .reduce(|a, b| a.union(&b))
            {
                entity.bounds = bounds;
            }
        }
    }

    pub fn entity(&self, name: &str) -> Option<&EntityInstance> {
        self.entities.iter().find(|e| e.name == name)
    }

    pub fn spotlight(&self, name: &str) -> Option<&Spotlight> {
        self.lighting.spotlights.iter().find(|s| s.name == name)
    }
}

/// Output of `SceneBuilder::build`: the drawable scene plus camera set-up
#[derive(Debug, Clone)]
pub struct SceneSetup {
    pub scene: Scene,
    /// Free slot first, then stations in configuration order
    pub cameras: Vec<CameraSlot>,
    pub locomotion: LocomotionParams,
    pub orbit_target: Vec3,
}

/// Turns a `SceneConfig` into a `SceneSetup`
#[derive(Debug, Default)]
pub struct SceneBuilder {
    boxes: Vec<SceneBox>,
    entities: Vec<EntityInstance>,
    decals: Vec<Decal>,
    spins: Vec<Spin>,
    index: HashMap<String, usize>,
}

impl SceneBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn build(config: &SceneConfig) -> Result<SceneSetup, SceneError> {
        let mut builder = Self::new();
        builder.add_ground(config.ground.size, config.ground.level, config.ground.color)?;
        for placement in &config.entities {
            builder.add_entity(placement)?;
        }

        let spotlights = config
            .lighting
            .spotlights
            .iter()
            .map(|light| builder.resolve_spotlight(light))
            .collect::<Result<Vec<_>, _>>()?;

        let sun = &config.lighting.sun;
        let lighting = Lighting {
            ambient: scale_rgb(config.lighting.ambient.color, config.lighting.ambient.intensity),
            sun_direction: sun.position.normalize_or(Vec3::Y),
            sun_color: scale_rgb(sun.color, sun.intensity),
            sun_shadows: sun.shadows,
            spotlights,
        };

        let cameras = build_cameras(&config.cameras)?;

        log::info!(
            "scene `{}`: {} entities, {} boxes, {} spotlights, {} cameras",
            config.name,
            builder.entities.len(),
            builder.boxes.len(),
            lighting.spotlights.len(),
            cameras.len()
        );

        Ok(SceneSetup {
            scene: Scene {
                name: config.name.clone(),
                sky: config.sky,
                boxes: builder.boxes,
                entities: builder.entities,
                decals: builder.decals,
                lighting,
                spins: builder.spins,
            },
            cameras,
            locomotion: config.locomotion,
            orbit_target: config.orbit_target,
        })
    }

    fn add_ground(&mut self, size: f32, level: f32, color: [f32; 3]) -> Result<(), SceneError> {
        if size <= 0.0 {
            return Err(SceneError::InvalidDimension {
                name: "ground".to_string(),
                reason: format!("size must be positive, got {}", size),
            });
        }
        let half = size * 0.5;
        self.boxes.push(SceneBox {
            bounds: AABB::new(
                Vec3::new(-half, level - GROUND_THICKNESS, -half),
                Vec3::new(half, level, half),
            ),
            color,
            decal: None,
        });
        Ok(())
    }

    fn add_entity(&mut self, placement: &Placement) -> Result<(), SceneError> {
        if self.index.contains_key(&placement.name) {
            return Err(SceneError::DuplicateEntity(placement.name.clone()));
        }
        if placement.scale <= 0.0 {
            return Err(invalid(placement, format!("scale must be positive, got {}", placement.scale)));
        }

        let parts = proxy_parts(placement)?;
        let rotation = Quat::from_rotation_y(placement.heading.to_radians());
        let start = self.boxes.len();

        let spin_rate = placement.spin.filter(|rate| *rate != 0.0);
        let spin_all = !parts.iter().any(|p| p.spins);
        let mut spinning = Vec::new();

        let mut bounds: Option<AABB> = None;
        for part in parts {
            let rest = AABB::from_center_size(
                placement.position + part.center * placement.scale,
                part.size * placement.scale,
            );
            let world = rest.rotated_about(placement.position, rotation);
            bounds = Some(bounds.map_or(world, |b| b.union(&world)));
            if spin_rate.is_some() && (spin_all || part.spins) {
                spinning.push((self.boxes.len(), rest));
            }

            let decal = part.decal.then(|| {
                self.decals.push(helipad_decal(DECAL_RESOLUTION));
                self.decals.len() - 1
            });
            self.boxes.push(SceneBox {
                bounds: world,
                color: part.color,
                decal,
            });
        }

        if let Some(rate) = spin_rate {
            log::debug!("`{}` spins {} boxes at {} deg/s", placement.name, spinning.len(), rate);
            self.spins.push(Spin {
                entity: self.entities.len(),
                pivot: placement.position,
                heading: placement.heading.to_radians(),
                rate: rate.to_radians(),
                parts: spinning,
            });
        }

        let bounds = bounds.unwrap_or_else(|| AABB::new(placement.position, placement.position));
        self.index.insert(placement.name.clone(), self.entities.len());
        self.entities.push(EntityInstance {
            name: placement.name.clone(),
            kind: placement.kind,
            bounds,
            boxes: start..self.boxes.len(),
        });
        Ok(())
    }

    fn resolve_spotlight(&self, light: &SpotlightConfig) -> Result<Spotlight, SceneError> {
        let entity = self
            .index
            .get(&light.target)
            .map(|&i| &self.entities[i])
            .ok_or_else(|| SceneError::UnknownSpotlightTarget {
                light: light.name.clone(),
                target: light.target.clone(),
            })?;

        let direction = (entity.bounds.center() - light.position).normalize_or(Vec3::NEG_Y);
        Ok(Spotlight {
            name: light.name.clone(),
            target: light.target.clone(),
            position: light.position,
            direction,
            color: scale_rgb(light.color, light.intensity),
            cos_cutoff: light.angle.clamp(0.0, 89.0).to_radians().cos(),
            range: light.range.max(0.0),
        })
    }
}

fn build_cameras(configs: &[CameraConfig]) -> Result<Vec<CameraSlot>, SceneError> {
    let mut seen = Vec::with_capacity(configs.len());
    for config in configs {
        if seen.contains(&config.slot) {
            return Err(SceneError::DuplicateCamera(config.slot));
        }
        seen.push(config.slot);
    }

    let free = configs
        .iter()
        .find(|c| c.slot == SlotId::Free)
        .ok_or(SceneError::MissingFreeCamera)?;

    let to_slot = |c: &CameraConfig| {
        CameraSlot::new(c.slot, SpawnTransform::looking_at(c.position, c.look_at), c.fov)
    };

    Ok(std::iter::once(to_slot(free))
        .chain(configs.iter().filter(|c| c.slot != SlotId::Free).map(to_slot))
        .collect())
}

/// Box making up part of an entity, in entity-local space (origin on the
/// ground, front towards -Z)
struct ProxyPart {
    center: Vec3,
    size: Vec3,
    color: [f32; 3],
    decal: bool,
    /// Turns with the entity's spin while the rest stays put
    spins: bool,
}

impl ProxyPart {
    fn new(center: [f32; 3], size: [f32; 3], color: [f32; 3]) -> Self {
        Self {
            center: Vec3::from_array(center),
            size: Vec3::from_array(size),
            color,
            decal: false,
            spins: false,
        }
    }

    fn rotor(center: [f32; 3], size: [f32; 3]) -> Self {
        Self {
            spins: true,
            ..Self::new(center, size, ROTOR_GREY)
        }
    }
}

fn proxy_parts(placement: &Placement) -> Result<Vec<ProxyPart>, SceneError> {
    let tint = |default: [f32; 3]| placement.color.unwrap_or(default);

    let parts = match placement.kind {
        EntityKind::Road { length, width } => {
            if length <= 0.0 || width <= 0.0 {
                return Err(invalid(placement, "road length and width must be positive".to_string()));
            }
            vec![ProxyPart::new(
                [0.0, ROAD_THICKNESS * 0.5, 0.0],
                [width, ROAD_THICKNESS, length],
                tint(ROAD_COLOR),
            )]
        }
        EntityKind::Helipad { radius } => {
            if radius <= 0.0 {
                return Err(invalid(placement, "helipad radius must be positive".to_string()));
            }
            let mut pad = ProxyPart::new(
                [0.0, PAD_THICKNESS * 0.5, 0.0],
                [radius * 2.0, PAD_THICKNESS, radius * 2.0],
                tint(PAD_COLOR),
            );
            pad.decal = true;
            vec![pad]
        }
        EntityKind::Tent => {
            let canvas = tint(CANVAS_GREEN);
            vec![
                ProxyPart::new([0.0, 1.0, 0.0], [4.0, 2.0, 5.0], canvas),
                ProxyPart::new([0.0, 2.4, 0.0], [2.6, 0.8, 5.2], canvas),
            ]
        }
        EntityKind::Helicopter => {
            let body = tint(AIRFRAME_GREEN);
            vec![
                ProxyPart::new([0.0, 1.5, 0.0], [2.2, 2.0, 6.0], body),
                ProxyPart::new([0.0, 2.0, 5.5], [0.6, 0.6, 5.0], body),
                ProxyPart::new([0.0, 2.8, 8.0], [0.2, 1.6, 0.8], body),
                ProxyPart::new([0.0, 2.8, 0.0], [0.3, 0.6, 0.3], ROTOR_GREY),
                ProxyPart::rotor([0.0, 3.15, 0.0], [10.0, 0.1, 0.5]),
                ProxyPart::rotor([0.0, 3.15, 0.0], [0.5, 0.1, 10.0]),
                ProxyPart::new([-1.0, 0.1, 0.0], [0.2, 0.2, 5.0], ROTOR_GREY),
                ProxyPart::new([1.0, 0.1, 0.0], [0.2, 0.2, 5.0], ROTOR_GREY),
            ]
        }
        EntityKind::ArmoredVehicle => {
            let hull = tint(HULL_TAN);
            vec![
                ProxyPart::new([0.0, 1.1, 0.0], [3.0, 1.4, 6.0], hull),
                ProxyPart::new([0.0, 2.2, 0.3], [2.0, 0.8, 2.2], hull),
                ProxyPart::new([0.0, 2.3, -2.3], [0.25, 0.25, 3.0], ROTOR_GREY),
                ProxyPart::new([-1.6, 0.5, 0.0], [0.4, 1.0, 5.6], ROTOR_GREY),
                ProxyPart::new([1.6, 0.5, 0.0], [0.4, 1.0, 5.6], ROTOR_GREY),
            ]
        }
        EntityKind::Crate { size } => {
            if size <= 0.0 {
                return Err(invalid(placement, "crate size must be positive".to_string()));
            }
            vec![ProxyPart::new([0.0, size * 0.5, 0.0], [size, size, size], tint(CRATE_BROWN))]
        }
    };
    Ok(parts)
}

fn invalid(placement: &Placement, reason: String) -> SceneError {
    SceneError::InvalidDimension {
        name: placement.name.clone(),
        reason,
    }
}
