use glam::Vec3;

use super::config::{
    AmbientConfig, CameraConfig, EntityKind, GroundConfig, LightingConfig, Placement, SceneConfig,
    SpotlightConfig, SunConfig,
};
use crate::camera::DEFAULT_FOV_Y;
use crate::locomotion::LocomotionParams;
use crate::math::rgb_from_hex;
use crate::view::SlotId;

impl SceneConfig {
    /// Built-in military camp: crossing roads, two helipads with a parked
    /// helicopter, a row of tents, an armored vehicle and two floodlights
    pub fn military_camp() -> Self {
        let entities = vec![
            Placement::new("main_road", EntityKind::Road { length: 100.0, width: 6.0 }, Vec3::ZERO),
            Placement::new(
                "cross_road",
                EntityKind::Road { length: 60.0, width: 5.0 },
                Vec3::new(10.0, 0.0, -20.0),
            )
            .heading(90.0),
            Placement::new("pad_north", EntityKind::Helipad { radius: 6.0 }, Vec3::new(22.0, 0.0, -34.0)),
            Placement::new("pad_south", EntityKind::Helipad { radius: 6.0 }, Vec3::new(22.0, 0.0, -6.0)),
            Placement::new("helicopter", EntityKind::Helicopter, Vec3::new(22.0, PAD_TOP, -34.0))
                .spin(ROTOR_IDLE),
            Placement::new("tent_a", EntityKind::Tent, Vec3::new(-14.0, 0.0, 8.0)).heading(90.0),
            Placement::new("tent_b", EntityKind::Tent, Vec3::new(-14.0, 0.0, 16.0)).heading(90.0),
            Placement::new("tent_c", EntityKind::Tent, Vec3::new(-14.0, 0.0, 24.0)).heading(90.0),
            Placement::new("vehicle", EntityKind::ArmoredVehicle, Vec3::new(6.0, 0.0, 10.0)),
            Placement::new("crate_a", EntityKind::Crate { size: 1.2 }, Vec3::new(-9.0, 0.0, 4.0)),
            Placement::new("crate_b", EntityKind::Crate { size: 1.2 }, Vec3::new(-9.0, 0.0, 5.5))
                .heading(20.0),
            Placement::new("crate_c", EntityKind::Crate { size: 0.9 }, Vec3::new(-9.2, 1.2, 4.0)),
        ];

        let spotlights = vec![
            SpotlightConfig {
                name: "pad_floodlight".to_string(),
                position: Vec3::new(32.0, 9.0, -22.0),
                target: "helicopter".to_string(),
                color: rgb_from_hex(0xfff4d6),
                intensity: 1.6,
                angle: 25.0,
                range: 45.0,
            },
            SpotlightConfig {
                name: "tent_floodlight".to_string(),
                position: Vec3::new(-4.0, 7.0, 16.0),
                target: "tent_b".to_string(),
                color: rgb_from_hex(0xffe0a0),
                intensity: 1.2,
                angle: 35.0,
                range: 30.0,
            },
        ];

        let cameras = vec![
            CameraConfig {
                slot: SlotId::Free,
                position: Vec3::new(0.0, 28.0, 48.0),
                look_at: Vec3::ZERO,
                fov: DEFAULT_FOV_Y,
            },
            // On the turret roof, looking down the barrel
            CameraConfig {
                slot: SlotId::Gunner,
                position: Vec3::new(6.0, 3.2, 10.3),
                look_at: Vec3::new(6.0, 2.6, -30.0),
                fov: 60.0,
            },
            // Just ahead of the hull front
            CameraConfig {
                slot: SlotId::Driver,
                position: Vec3::new(6.0, 2.0, 6.6),
                look_at: Vec3::new(6.0, 1.8, -30.0),
                fov: 70.0,
            },
            // In front of the helicopter nose
            CameraConfig {
                slot: SlotId::Pilot,
                position: Vec3::new(22.0, 2.3, -37.4),
                look_at: Vec3::new(22.0, 2.0, -80.0),
                fov: 80.0,
            },
        ];

        Self {
            name: "military_camp".to_string(),
            sky: rgb_from_hex(0x87aed8),
            ground: GroundConfig {
                size: 120.0,
                color: rgb_from_hex(0x5c6b3f),
                level: 0.0,
            },
            lighting: LightingConfig {
                ambient: AmbientConfig {
                    color: rgb_from_hex(0x404040),
                    intensity: 1.5,
                },
                sun: SunConfig {
                    color: rgb_from_hex(0xffffff),
                    intensity: 0.9,
                    position: Vec3::new(-1.0, 2.0, 4.0),
                    shadows: true,
                },
                spotlights,
            },
            entities,
            cameras,
            locomotion: LocomotionParams {
                speed: 0.1,
                min_height: 1.0,
            },
            orbit_target: Vec3::ZERO,
        }
    }
}

/// Helicopter skids rest on top of the pad slab
const PAD_TOP: f32 = 0.05;
/// Degrees per second
const ROTOR_IDLE: f32 = 180.0;
