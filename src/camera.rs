use glam::{EulerRot, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Pitch stays just short of straight up/down so yaw remains well defined
pub const PITCH_LIMIT: f32 = std::f32::consts::FRAC_PI_2 - 0.01;
pub const DEFAULT_FOV_Y: f32 = 75.0;

/// Fixed placement a camera returns to on reset
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnTransform {
    pub position: Vec3,
    pub yaw: f32,
    pub pitch: f32,
}

impl SpawnTransform {
    pub fn new(position: Vec3, yaw: f32, pitch: f32) -> Self {
        Self { position, yaw, pitch }
    }

    /// Spawn at `position` facing `target`
    pub fn looking_at(position: Vec3, target: Vec3) -> Self {
        let (yaw, pitch) = yaw_pitch_towards(target - position);
        Self { position, yaw, pitch }
    }

    pub fn orientation(&self) -> Quat {
        orientation_from(self.yaw, self.pitch)
    }
}

/// Perspective camera with first-person yaw/pitch orientation.
///
/// Convention: identity orientation looks down -Z with +Y up and +X to the right.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    /// Vertical field of view in degrees
    pub fov_y: f32,
}

impl Camera {
    pub fn new(position: Vec3, yaw: f32, pitch: f32) -> Self {
        Self {
            position,
            yaw,
            pitch: pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT),
            fov_y: DEFAULT_FOV_Y,
        }
    }

    pub fn from_spawn(spawn: &SpawnTransform) -> Self {
        Self::new(spawn.position, spawn.yaw, spawn.pitch)
    }

    pub fn with_fov(mut self, fov_y: f32) -> Self {
        self.fov_y = fov_y;
        self
    }

    pub fn orientation(&self) -> Quat {
        orientation_from(self.yaw, self.pitch)
    }

    pub fn forward(&self) -> Vec3 {
        self.orientation() * Vec3::NEG_Z
    }

    pub fn right(&self) -> Vec3 {
        self.orientation() * Vec3::X
    }

    pub fn up(&self) -> Vec3 {
        self.orientation() * Vec3::Y
    }

    pub fn look_at(&mut self, target: Vec3) {
        let to_target = target - self.position;
        if to_target.length_squared() > f32::EPSILON {
            let (yaw, pitch) = yaw_pitch_towards(to_target);
            self.yaw = yaw;
            self.pitch = pitch;
        }
    }

    /// Turn by yaw/pitch deltas in radians
    pub fn rotate(&mut self, delta_yaw: f32, delta_pitch: f32) {
        self.yaw = (self.yaw + delta_yaw).rem_euclid(std::f32::consts::TAU);
        self.pitch = (self.pitch + delta_pitch).clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    pub fn set_transform(&mut self, spawn: &SpawnTransform) {
        self.position = spawn.position;
        self.yaw = spawn.yaw;
        self.pitch = spawn.pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    /// World-space ray direction through normalized device coords (-1..1)
    pub fn ray_direction(&self, ndc_x: f32, ndc_y: f32, aspect: f32) -> Vec3 {
        let half_height = (self.fov_y.to_radians() * 0.5).tan();
        let half_width = half_height * aspect;
        (self.forward() + self.right() * ndc_x * half_width + self.up() * ndc_y * half_height)
            .normalize()
    }
}

fn orientation_from(yaw: f32, pitch: f32) -> Quat {
    Quat::from_euler(EulerRot::YXZ, yaw, pitch, 0.0)
}

fn yaw_pitch_towards(direction: Vec3) -> (f32, f32) {
    let dir = direction.normalize_or_zero();
    let yaw = (-dir.x).atan2(-dir.z);
    let pitch = dir.y.clamp(-1.0, 1.0).asin().clamp(-PITCH_LIMIT, PITCH_LIMIT);
    (yaw, pitch)
}
