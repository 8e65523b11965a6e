use glam::Vec3;

use super::controls::OrbitControl;
use crate::camera::Camera;

pub const DEFAULT_ROTATE_SPEED: f32 = 0.005;
pub const DEFAULT_ZOOM_STEP: f32 = 0.95;
const MIN_POLAR: f32 = 0.01;
const MAX_POLAR: f32 = std::f32::consts::PI - 0.01;

/// Orbits the free camera around a target point.
///
/// Drag and zoom input accumulate between frames and are applied in `update`,
/// which also keeps the camera aimed at the target. The camera's current
/// position is read every update, so anything else that moved the camera
/// (locomotion) is respected. With a floor set, the polar angle is limited
/// so the camera never ends up below it.
#[derive(Debug, Clone)]
pub struct OrbitRig {
    enabled: bool,
    target: Vec3,
    rotate_speed: f32,
    min_distance: f32,
    max_distance: f32,
    floor: Option<f32>,
    pending_theta: f32,
    pending_phi: f32,
    pending_scale: f32,
}

impl OrbitRig {
    pub fn new(target: Vec3) -> Self {
        Self {
            enabled: true,
            target,
            rotate_speed: DEFAULT_ROTATE_SPEED,
            min_distance: 1.0,
            max_distance: 500.0,
            floor: None,
            pending_theta: 0.0,
            pending_phi: 0.0,
            pending_scale: 1.0,
        }
    }

    pub fn with_distance_limits(mut self, min: f32, max: f32) -> Self {
        self.min_distance = min.max(0.0);
        self.max_distance = max.max(self.min_distance);
        self
    }

    /// Lowest height the camera may be placed at
    pub fn with_floor(mut self, height: f32) -> Self {
        self.floor = Some(height);
        self
    }

    pub fn floor(&self) -> Option<f32> {
        self.floor
    }

    pub fn target(&self) -> Vec3 {
        self.target
    }

    pub fn set_target(&mut self, target: Vec3) {
        self.target = target;
    }

    /// Pointer drag in pixels
    pub fn drag(&mut self, dx: f32, dy: f32) {
        if !self.enabled {
            return;
        }
        self.pending_theta -= dx * self.rotate_speed;
        self.pending_phi -= dy * self.rotate_speed;
    }

    /// Wheel steps; positive moves closer
    pub fn zoom(&mut self, steps: f32) {
        if !self.enabled {
            return;
        }
        self.pending_scale *= DEFAULT_ZOOM_STEP.powf(steps);
    }

    /// Apply accumulated input to `camera`. Returns false while disabled.
    pub fn update(&mut self, camera: &mut Camera) -> bool {
        if !self.enabled {
            self.clear_pending();
            return false;
        }

        let offset = camera.position - self.target;
        let radius = offset.length();
        if radius > f32::EPSILON {
            let theta = offset.x.atan2(offset.z) + self.pending_theta;
            let polar = (offset.y / radius).clamp(-1.0, 1.0).acos();
            let radius = (radius * self.pending_scale).clamp(self.min_distance, self.max_distance);
            let phi = (polar + self.pending_phi).clamp(MIN_POLAR, self.max_polar(radius));

            let new_offset = Vec3::new(
                radius * phi.sin() * theta.sin(),
                radius * phi.cos(),
                radius * phi.sin() * theta.cos(),
            );
            camera.position = self.target + new_offset;
            if let Some(floor) = self.floor {
                // Target too close to the floor for any angle to clear it
                camera.position.y = camera.position.y.max(floor);
            }
            camera.look_at(self.target);
        }

        self.clear_pending();
        true
    }

    /// Largest polar angle that keeps a camera at `radius` above the floor
    fn max_polar(&self, radius: f32) -> f32 {
        match self.floor {
            Some(floor) => {
                let lowest = ((floor - self.target.y) / radius).clamp(-1.0, 1.0).acos();
                lowest.clamp(MIN_POLAR, MAX_POLAR)
            }
            None => MAX_POLAR,
        }
    }

    fn clear_pending(&mut self) {
        self.pending_theta = 0.0;
        self.pending_phi = 0.0;
        self.pending_scale = 1.0;
    }
}

impl OrbitControl for OrbitRig {
    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.clear_pending();
        }
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera_at(position: Vec3) -> Camera {
        Camera::new(position, 0.0, 0.0)
    }

    #[test]
    fn update_aims_at_target() {
        let mut rig = OrbitRig::new(Vec3::ZERO);
        let mut camera = camera_at(Vec3::new(0.0, 0.0, 5.0));
        assert!(rig.update(&mut camera));
        assert!((camera.forward() - Vec3::NEG_Z).length() < 1e-4);
        assert!((camera.position - Vec3::new(0.0, 0.0, 5.0)).length() < 1e-4);
    }

    #[test]
    fn drag_keeps_distance() {
        let mut rig = OrbitRig::new(Vec3::ZERO);
        let mut camera = camera_at(Vec3::new(0.0, 2.0, 5.0));
        let before = camera.position.length();
        rig.drag(120.0, -40.0);
        rig.update(&mut camera);
        assert!((camera.position.length() - before).abs() < 1e-3);
        assert!((camera.position - Vec3::new(0.0, 2.0, 5.0)).length() > 0.1);
    }

    #[test]
    fn zoom_is_clamped() {
        let mut rig = OrbitRig::new(Vec3::ZERO).with_distance_limits(2.0, 10.0);
        let mut camera = camera_at(Vec3::new(0.0, 0.0, 5.0));
        rig.zoom(200.0);
        rig.update(&mut camera);
        assert!((camera.position.length() - 2.0).abs() < 1e-3);

        rig.zoom(-200.0);
        rig.update(&mut camera);
        assert!((camera.position.length() - 10.0).abs() < 1e-3);
    }

    #[test]
    fn floor_limits_downward_drag() {
        let mut rig = OrbitRig::new(Vec3::ZERO).with_floor(1.0);
        let mut camera = camera_at(Vec3::new(0.0, 5.0, 10.0));
        let distance = camera.position.length();
        rig.drag(0.0, -1000.0);
        rig.update(&mut camera);
        assert!(camera.position.y >= 1.0 - 1e-4, "y = {}", camera.position.y);
        assert!((camera.position.length() - distance).abs() < 1e-3);

        // Without a floor the same drag goes under the target
        let mut rig = OrbitRig::new(Vec3::ZERO);
        let mut camera = camera_at(Vec3::new(0.0, 5.0, 10.0));
        rig.drag(0.0, -1000.0);
        rig.update(&mut camera);
        assert!(camera.position.y < 0.0);
    }

    #[test]
    fn floor_above_orbit_sphere_lifts_camera() {
        let mut rig = OrbitRig::new(Vec3::ZERO).with_floor(20.0);
        let mut camera = camera_at(Vec3::new(0.0, 0.0, 5.0));
        rig.update(&mut camera);
        assert_eq!(camera.position.y, 20.0);
    }

    #[test]
    fn disabled_rig_ignores_input_and_leaves_camera() {
        let mut rig = OrbitRig::new(Vec3::ZERO);
        rig.set_enabled(false);
        let mut camera = Camera::new(Vec3::new(1.0, 2.0, 3.0), 0.4, 0.1);
        let before = camera;
        rig.drag(300.0, 300.0);
        assert!(!rig.update(&mut camera));
        assert_eq!(camera, before);

        rig.set_enabled(true);
        rig.update(&mut camera);
        assert!((camera.position.length() - before.position.length()).abs() < 1e-3);
    }
}
