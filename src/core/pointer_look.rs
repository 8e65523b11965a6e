use super::controls::{CaptureEvent, PointerCapture};
use crate::camera::Camera;

pub const DEFAULT_LOOK_SENSITIVITY: f32 = 0.002;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureState {
    Unlocked,
    /// Lock requested, host has not answered yet
    Pending,
    Locked,
}

/// First-person mouse look behind pointer capture.
///
/// `lock`/`unlock` only record a request for the host (`take_request`); the
/// state moves to `Locked` once the host reports `CaptureEvent::Granted`.
#[derive(Debug, Clone)]
pub struct PointerLook {
    state: CaptureState,
    sensitivity: f32,
    request: Option<bool>,
}

impl PointerLook {
    pub fn new(sensitivity: f32) -> Self {
        Self {
            state: CaptureState::Unlocked,
            sensitivity,
            request: None,
        }
    }

    pub fn state(&self) -> CaptureState {
        self.state
    }

    pub fn set_sensitivity(&mut self, sensitivity: f32) {
        self.sensitivity = sensitivity;
    }

    /// Host-side grab (`true`) or release (`false`) still to be performed
    pub fn take_request(&mut self) -> Option<bool> {
        self.request.take()
    }

    /// Turn `camera` by a raw mouse delta. Only effective while locked.
    pub fn look(&self, camera: &mut Camera, dx: f32, dy: f32) -> bool {
        if self.state != CaptureState::Locked {
            return false;
        }
        camera.rotate(-dx * self.sensitivity, -dy * self.sensitivity);
        true
    }
}

impl Default for PointerLook {
    fn default() -> Self {
        Self::new(DEFAULT_LOOK_SENSITIVITY)
    }
}

impl PointerCapture for PointerLook {
    fn lock(&mut self) {
        if self.state == CaptureState::Unlocked {
            self.state = CaptureState::Pending;
            self.request = Some(true);
        }
    }

    fn unlock(&mut self) {
        if self.state != CaptureState::Unlocked {
            self.state = CaptureState::Unlocked;
            self.request = Some(false);
        }
    }

    fn is_locked(&self) -> bool {
        self.state == CaptureState::Locked
    }

    fn is_pending(&self) -> bool {
        self.state == CaptureState::Pending
    }

    fn notify(&mut self, event: CaptureEvent) {
        match (event, self.state) {
            (CaptureEvent::Granted, CaptureState::Pending) => self.state = CaptureState::Locked,
            (CaptureEvent::Granted, CaptureState::Locked) => {}
            // Grant for a request we already withdrew: hand it straight back
            (CaptureEvent::Granted, CaptureState::Unlocked) => self.request = Some(false),
            (CaptureEvent::Released | CaptureEvent::Denied, _) => {
                self.state = CaptureState::Unlocked;
                self.request = None;
            }
        }
    }
}
