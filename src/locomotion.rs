use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

pub const DEFAULT_MOVE_SPEED: f32 = 0.1;
pub const DEFAULT_MIN_HEIGHT: f32 = 1.0;

/// Movement key a flag belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Forward,
    Backward,
    Left,
    Right,
}

/// Directional key flags, one per key, last write wins
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct InputState {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
}

impl InputState {
    pub fn set(&mut self, direction: Direction, pressed: bool) {
        match direction {
            Direction::Forward => self.forward = pressed,
            Direction::Backward => self.backward = pressed,
            Direction::Left => self.left = pressed,
            Direction::Right => self.right = pressed,
        }
    }

    pub fn is_set(&self, direction: Direction) -> bool {
        match direction {
            Direction::Forward => self.forward,
            Direction::Backward => self.backward,
            Direction::Left => self.left,
            Direction::Right => self.right,
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_idle(&self) -> bool {
        !(self.forward || self.backward || self.left || self.right)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocomotionParams {
    /// World units per step
    pub speed: f32,
    /// Camera height never drops below this
    pub min_height: f32,
}

impl Default for LocomotionParams {
    fn default() -> Self {
        Self {
            speed: DEFAULT_MOVE_SPEED,
            min_height: DEFAULT_MIN_HEIGHT,
        }
    }
}

/// Turns key flags into view-relative displacement of the active camera
#[derive(Debug, Clone, Copy)]
pub struct LocomotionIntegrator {
    params: LocomotionParams,
}

impl LocomotionIntegrator {
    pub fn new(params: LocomotionParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &LocomotionParams {
        &self.params
    }

    /// Camera-local unit direction for the held keys, or zero.
    /// Opposing keys cancel on their axis.
    pub fn direction(input: &InputState) -> Vec3 {
        let x = input.right as i32 - input.left as i32;
        let z = input.backward as i32 - input.forward as i32;
        Vec3::new(x as f32, 0.0, z as f32).normalize_or_zero()
    }

    /// Advance `position` by one step and apply the floor clamp.
    /// Returns the displacement before clamping.
    pub fn step(&self, input: &InputState, orientation: Quat, position: &mut Vec3) -> Vec3 {
        let local = Self::direction(input);
        let displacement = orientation * local * self.params.speed;

        *position += displacement;
        if position.y < self.params.min_height {
            position.y = self.params.min_height;
        }

        displacement
    }
}

impl Default for LocomotionIntegrator {
    fn default() -> Self {
        Self::new(LocomotionParams::default())
    }
}
