use glam::Vec3;

use crate::camera::{Camera, SpawnTransform, DEFAULT_FOV_Y};
use crate::core::{CaptureEvent, Command, OrbitControl, OrbitRig, PointerCapture, PointerLook};
use crate::locomotion::{InputState, LocomotionIntegrator};
use crate::scenes::{Scene, SceneSetup};
use crate::view::{CameraSlot, SlotId, ViewController, ViewError, ViewEvent};

pub type CampView = ViewController<OrbitRig, PointerLook>;

/// One running viewer: scene, cameras, and the input that drives them.
///
/// The host feeds it `Command`s, calls `frame` once per displayed frame, and
/// carries out pointer grab requests, reporting the outcome back through
/// `pointer_lock_granted`/`denied`/`released`.
pub struct Session {
    scene: Scene,
    view: CampView,
    input: InputState,
    locomotion: LocomotionIntegrator,
    /// Station that asked for the current or most recent grab
    capture_owner: Option<SlotId>,
}

impl Session {
    pub fn from_setup(setup: SceneSetup, sensitivity: f32) -> Self {
        let SceneSetup {
            scene,
            cameras,
            locomotion,
            orbit_target,
        } = setup;

        let mut cameras = cameras.into_iter();
        let free = match cameras.next() {
            Some(slot) => slot,
            None => {
                log::warn!("scene `{}` has no cameras, using a default free camera", scene.name);
                CameraSlot::new(
                    SlotId::Free,
                    SpawnTransform::looking_at(orbit_target + Vec3::new(0.0, 20.0, 40.0), orbit_target),
                    DEFAULT_FOV_Y,
                )
            }
        };

        let orbit = OrbitRig::new(orbit_target).with_floor(locomotion.min_height);
        let view = cameras.fold(ViewController::new(free, orbit), |view, slot| {
            view.with_station(slot, PointerLook::new(sensitivity))
        });

        Self {
            scene,
            view,
            input: InputState::default(),
            locomotion: LocomotionIntegrator::new(locomotion),
            capture_owner: None,
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn view(&self) -> &CampView {
        &self.view
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    pub fn locomotion(&self) -> &LocomotionIntegrator {
        &self.locomotion
    }

    pub fn active_slot(&self) -> SlotId {
        self.view.active()
    }

    pub fn active_camera(&self) -> &Camera {
        self.view.active_camera()
    }

    pub fn select(&mut self, slot: SlotId) -> Result<(), ViewError> {
        self.view.select(slot)
    }

    pub fn apply(&mut self, command: Command) -> Result<(), ViewError> {
        match command {
            Command::Move(direction, pressed) => self.input.set(direction, pressed),
            Command::Select(slot) => self.view.select(slot)?,
            Command::ResetView => self.reset_active(),
            Command::Orbit { dx, dy } => {
                let orbit = self.view.orbit_mut();
                if orbit.is_enabled() {
                    orbit.drag(dx, dy);
                }
            }
            Command::Zoom(steps) => {
                let orbit = self.view.orbit_mut();
                if orbit.is_enabled() {
                    orbit.zoom(steps);
                }
            }
            Command::Look { dx, dy } => {
                if let Some((look, camera)) = self.view.active_station_mut() {
                    look.look(camera, dx, dy);
                }
            }
            Command::Escape => self.release_capture()?,
        }
        Ok(())
    }

    /// Advance one frame: move the active camera, then let the orbit rig
    /// re-aim the free camera.
    pub fn frame(&mut self) {
        let orientation = self.view.active_camera().orientation();
        let camera = self.view.active_camera_mut();
        self.locomotion.step(&self.input, orientation, &mut camera.position);

        let (orbit, free) = self.view.orbit_and_free_camera();
        orbit.update(free);
    }

    /// Pose animated entities for `time` seconds since the viewer started
    pub fn animate(&mut self, time: f32) {
        self.scene.animate(time);
    }

    /// Put the active camera back on its spawn transform
    pub fn reset_active(&mut self) {
        let spawn = *self.view.active_slot().spawn();
        self.view.active_camera_mut().set_transform(&spawn);
        log::debug!("reset `{}` camera", self.view.active());
    }

    pub fn drain_view_events(&mut self) -> Vec<ViewEvent> {
        self.view.drain_events()
    }

    /// Next grab (`true`) or release (`false`) the host has to perform.
    /// A grab request wins over releases queued in the same frame.
    pub fn take_pointer_request(&mut self) -> Option<bool> {
        let mut grab = None;
        let mut release = false;
        for (slot, look) in self.view.captures_mut() {
            match look.take_request() {
                Some(true) => grab = Some(slot),
                Some(false) => release = true,
                None => {}
            }
        }

        if let Some(slot) = grab {
            log::debug!("pointer grab requested by `{}`", slot);
            self.capture_owner = Some(slot);
            return Some(true);
        }
        if release {
            // Owner is kept: a grant may still arrive for the withdrawn request
            log::debug!("pointer release requested");
            return Some(false);
        }
        None
    }

    pub fn pointer_lock_granted(&mut self) -> Result<(), ViewError> {
        self.report(CaptureEvent::Granted)
    }

    pub fn pointer_lock_denied(&mut self) -> Result<(), ViewError> {
        self.report(CaptureEvent::Denied)
    }

    pub fn pointer_lock_released(&mut self) -> Result<(), ViewError> {
        self.report(CaptureEvent::Released)
    }

    /// Whether a station currently holds or waits for the pointer
    pub fn is_capturing(&self) -> bool {
        self.view
            .capture(self.view.active())
            .map_or(false, |c| c.is_engaged())
    }

    fn release_capture(&mut self) -> Result<(), ViewError> {
        if self.is_capturing() {
            self.pointer_lock_released()?;
        }
        Ok(())
    }

    fn report(&mut self, event: CaptureEvent) -> Result<(), ViewError> {
        let Some(owner) = self.capture_owner else {
            log::debug!("ignoring {:?} with no outstanding capture", event);
            return Ok(());
        };
        if event != CaptureEvent::Granted {
            self.capture_owner = None;
        }
        self.view.on_capture_event(owner, event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::CaptureState;
    use crate::locomotion::Direction;
    use crate::scenes::{SceneBuilder, SceneConfig};

    fn camp() -> Session {
        let setup = SceneBuilder::build(&SceneConfig::military_camp()).unwrap();
        Session::from_setup(setup, 0.002)
    }

    #[test]
    fn starts_free_with_every_station() {
        let session = camp();
        assert_eq!(session.active_slot(), SlotId::Free);
        assert_eq!(session.view().slots().count(), 4);
        assert!(session.view().orbit().is_enabled());
    }

    #[test]
    fn station_grab_round_trip() {
        let mut session = camp();
        session.apply(Command::Select(SlotId::Gunner)).unwrap();
        assert_eq!(session.take_pointer_request(), Some(true));
        assert_eq!(session.take_pointer_request(), None);

        session.pointer_lock_granted().unwrap();
        assert_eq!(session.view().capture(SlotId::Gunner).unwrap().state(), CaptureState::Locked);
        assert!(session.is_capturing());

        let before = session.active_camera().yaw;
        session.apply(Command::Look { dx: 100.0, dy: 0.0 }).unwrap();
        assert!((session.active_camera().yaw - before).abs() > 0.1);

        session.apply(Command::Escape).unwrap();
        assert_eq!(session.active_slot(), SlotId::Free);
        assert!(!session.is_capturing());
    }

    #[test]
    fn look_without_grant_does_nothing() {
        let mut session = camp();
        session.apply(Command::Select(SlotId::Pilot)).unwrap();
        let before = *session.active_camera();
        session.apply(Command::Look { dx: 50.0, dy: 50.0 }).unwrap();
        assert_eq!(*session.active_camera(), before);
    }

    #[test]
    fn reset_restores_spawn() {
        let mut session = camp();
        session.apply(Command::Select(SlotId::Driver)).unwrap();
        session.apply(Command::Move(Direction::Forward, true)).unwrap();
        for _ in 0..10 {
            session.frame();
        }
        let spawn = session.view().active_slot().spawn().position;
        assert!(session.active_camera().position.distance(spawn) > 0.5);

        session.apply(Command::ResetView).unwrap();
        assert_eq!(session.active_camera().position, spawn);
    }

    #[test]
    fn orbit_input_ignored_in_station() {
        let mut session = camp();
        session.apply(Command::Select(SlotId::Gunner)).unwrap();
        let free_before = *session.view().slot(SlotId::Free).unwrap().camera();
        session.apply(Command::Orbit { dx: 200.0, dy: 0.0 }).unwrap();
        session.frame();
        assert_eq!(*session.view().slot(SlotId::Free).unwrap().camera(), free_before);
    }

    #[test]
    fn animate_moves_helicopter_rotor() {
        let mut session = camp();
        let heli = session.scene().entity("helicopter").unwrap().boxes.clone();
        let before = session.scene().boxes[heli.clone()].to_vec();
        session.animate(0.25);
        assert_ne!(session.scene().boxes[heli].to_vec(), before);
    }

    #[test]
    fn orbit_drag_moves_free_camera_around_target() {
        let mut session = camp();
        let before = session.active_camera().position;
        session.apply(Command::Orbit { dx: 200.0, dy: 0.0 }).unwrap();
        session.frame();
        let after = session.active_camera().position;
        assert!(before.distance(after) > 1.0);
        assert!((before.length() - after.length()).abs() < 1e-2);
        assert!(session.active_camera().forward().dot(-after.normalize()) > 0.999);
    }
}
