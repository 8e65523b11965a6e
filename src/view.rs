use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::camera::{Camera, SpawnTransform};
use crate::core::{CaptureEvent, OrbitControl, PointerCapture};

/// Camera role in the camp
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotId {
    /// Free-roam orbit view
    Free,
    Gunner,
    Driver,
    Pilot,
}

impl SlotId {
    pub const ALL: [SlotId; 4] = [SlotId::Free, SlotId::Gunner, SlotId::Driver, SlotId::Pilot];

    pub fn name(self) -> &'static str {
        match self {
            SlotId::Free => "free",
            SlotId::Gunner => "gunner",
            SlotId::Driver => "driver",
            SlotId::Pilot => "pilot",
        }
    }

    pub fn is_station(self) -> bool {
        self != SlotId::Free
    }
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SlotId {
    type Err = ViewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SlotId::ALL
            .into_iter()
            .find(|slot| slot.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ViewError::UnknownSlotName(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ViewError {
    #[error("camera slot `{0}` is not configured")]
    InvalidSlot(SlotId),
    #[error("no camera slot named `{0}`")]
    UnknownSlotName(String),
}

/// A camera with its role and fixed spawn placement
#[derive(Debug, Clone)]
pub struct CameraSlot {
    id: SlotId,
    camera: Camera,
    spawn: SpawnTransform,
}

impl CameraSlot {
    pub fn new(id: SlotId, spawn: SpawnTransform, fov_y: f32) -> Self {
        Self {
            id,
            camera: Camera::from_spawn(&spawn).with_fov(fov_y),
            spawn,
        }
    }

    pub fn id(&self) -> SlotId {
        self.id
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn spawn(&self) -> &SpawnTransform {
        &self.spawn
    }
}

/// Why the active slot changed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchReason {
    Selected,
    CaptureReleased,
    CaptureDenied,
}

/// Emitted on every change of the active slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewEvent {
    pub from: SlotId,
    pub to: SlotId,
    pub reason: SwitchReason,
}

struct Station<P> {
    slot: CameraSlot,
    capture: P,
}

/// Tracks the active camera slot and arbitrates between the free orbit view
/// and the locked first-person stations.
///
/// Invariants: `active` always names a configured slot, orbit control is
/// enabled exactly when the free slot is active, and at most one station's
/// capture is engaged at a time.
pub struct ViewController<O, P> {
    free: CameraSlot,
    orbit: O,
    stations: Vec<Station<P>>,
    active: SlotId,
    events: Vec<ViewEvent>,
}

impl<O: OrbitControl, P: PointerCapture> ViewController<O, P> {
    /// Start in the free view with orbit control enabled.
    /// `free` is forced to the Free role; a later duplicate station replaces
    /// an earlier one.
    pub fn new(mut free: CameraSlot, mut orbit: O) -> Self {
        free.id = SlotId::Free;
        if !orbit.is_enabled() {
            orbit.set_enabled(true);
        }
        Self {
            free,
            orbit,
            stations: Vec::new(),
            active: SlotId::Free,
            events: Vec::new(),
        }
    }

    /// Register a first-person station with its pointer-capture control
    pub fn with_station(mut self, slot: CameraSlot, capture: P) -> Self {
        if slot.id == SlotId::Free {
            log::warn!("ignoring station registered with the free slot id");
            return self;
        }
        self.stations.retain(|s| s.slot.id != slot.id);
        self.stations.push(Station { slot, capture });
        self
    }

    pub fn active(&self) -> SlotId {
        self.active
    }

    pub fn is_configured(&self, id: SlotId) -> bool {
        id == SlotId::Free || self.stations.iter().any(|s| s.slot.id == id)
    }

    /// Configured slots, free first
    pub fn slots(&self) -> impl Iterator<Item = SlotId> + '_ {
        std::iter::once(SlotId::Free).chain(self.stations.iter().map(|s| s.slot.id))
    }

    pub fn slot(&self, id: SlotId) -> Result<&CameraSlot, ViewError> {
        if id == SlotId::Free {
            return Ok(&self.free);
        }
        self.station(id).map(|s| &s.slot)
    }

    pub fn slot_mut(&mut self, id: SlotId) -> Result<&mut CameraSlot, ViewError> {
        if id == SlotId::Free {
            return Ok(&mut self.free);
        }
        self.station_mut(id).map(|s| &mut s.slot)
    }

    pub fn active_slot(&self) -> &CameraSlot {
        match self.active {
            SlotId::Free => &self.free,
            id => match self.stations.iter().find(|s| s.slot.id == id) {
                Some(station) => &station.slot,
                None => {
                    debug_assert!(false, "active slot `{}` has no station", id);
                    &self.free
                }
            },
        }
    }

    pub fn active_camera(&self) -> &Camera {
        self.active_slot().camera()
    }

    pub fn active_camera_mut(&mut self) -> &mut Camera {
        let active = self.active;
        match self.stations.iter_mut().find(|s| s.slot.id == active) {
            Some(station) => station.slot.camera_mut(),
            None => {
                debug_assert!(active == SlotId::Free, "active slot `{}` has no station", active);
                self.free.camera_mut()
            }
        }
    }

    pub fn orbit(&self) -> &O {
        &self.orbit
    }

    pub fn orbit_mut(&mut self) -> &mut O {
        &mut self.orbit
    }

    /// Free camera together with the orbit control driving it
    pub fn orbit_and_free_camera(&mut self) -> (&mut O, &mut Camera) {
        (&mut self.orbit, self.free.camera_mut())
    }

    pub fn capture(&self, id: SlotId) -> Result<&P, ViewError> {
        self.station(id).map(|s| &s.capture)
    }

    pub fn capture_mut(&mut self, id: SlotId) -> Result<&mut P, ViewError> {
        self.station_mut(id).map(|s| &mut s.capture)
    }

    /// Active station's capture control and camera, if a station is active
    pub fn active_station_mut(&mut self) -> Option<(&P, &mut Camera)> {
        let active = self.active;
        self.stations
            .iter_mut()
            .find(|s| s.slot.id == active)
            .map(|s| (&s.capture, s.slot.camera_mut()))
    }

    /// All station captures, for draining host requests
    pub fn captures_mut(&mut self) -> impl Iterator<Item = (SlotId, &mut P)> + '_ {
        self.stations.iter_mut().map(|s| (s.slot.id, &mut s.capture))
    }

    /// Switch to `target`. Selecting the active slot changes nothing.
    pub fn select(&mut self, target: SlotId) -> Result<(), ViewError> {
        if !self.is_configured(target) {
            log::warn!("rejected view switch to unconfigured slot `{}`", target);
            return Err(ViewError::InvalidSlot(target));
        }
        if target == self.active {
            return Ok(());
        }

        let from = self.active;
        if from.is_station() {
            self.disengage(from);
        }

        if target.is_station() {
            if self.orbit.is_enabled() {
                self.orbit.set_enabled(false);
            }
            if let Ok(station) = self.station_mut(target) {
                station.capture.lock();
            }
        } else {
            self.orbit.set_enabled(true);
        }

        self.transition(from, target, SwitchReason::Selected);
        Ok(())
    }

    /// Route a host capture notification to the control of `slot`.
    ///
    /// Released or denied capture on the active station falls back to the free
    /// view; notifications for any other station are stale and only update
    /// that control (a stale grant is released again straight away).
    pub fn on_capture_event(&mut self, slot: SlotId, event: CaptureEvent) -> Result<(), ViewError> {
        let active = self.active;
        let station = self.station_mut(slot)?;
        station.capture.notify(event);

        if slot != active {
            if station.capture.is_locked() {
                station.capture.unlock();
            }
            log::debug!("stale capture notification {:?} from `{}`", event, slot);
            return Ok(());
        }

        let reason = match event {
            CaptureEvent::Granted => {
                log::debug!("pointer capture granted to `{}`", slot);
                return Ok(());
            }
            CaptureEvent::Released => SwitchReason::CaptureReleased,
            CaptureEvent::Denied => SwitchReason::CaptureDenied,
        };

        self.disengage(slot);
        self.orbit.set_enabled(true);
        self.transition(slot, SlotId::Free, reason);
        Ok(())
    }

    /// Take the queued view change notifications
    pub fn drain_events(&mut self) -> Vec<ViewEvent> {
        std::mem::take(&mut self.events)
    }

    fn disengage(&mut self, id: SlotId) {
        if let Ok(station) = self.station_mut(id) {
            if station.capture.is_engaged() {
                station.capture.unlock();
            }
        }
    }

    fn transition(&mut self, from: SlotId, to: SlotId, reason: SwitchReason) {
        self.active = to;
        log::info!("view: {} -> {} ({:?})", from, to, reason);
        self.events.push(ViewEvent { from, to, reason });
    }

    fn station(&self, id: SlotId) -> Result<&Station<P>, ViewError> {
        self.stations
            .iter()
            .find(|s| s.slot.id == id)
            .ok_or(ViewError::InvalidSlot(id))
    }

    fn station_mut(&mut self, id: SlotId) -> Result<&mut Station<P>, ViewError> {
        self.stations
            .iter_mut()
            .find(|s| s.slot.id == id)
            .ok_or(ViewError::InvalidSlot(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[derive(Default)]
    struct CountingOrbit {
        enabled: bool,
        toggles: usize,
    }

    impl OrbitControl for CountingOrbit {
        fn set_enabled(&mut self, enabled: bool) {
            self.enabled = enabled;
            self.toggles += 1;
        }

        fn is_enabled(&self) -> bool {
            self.enabled
        }
    }

    #[derive(Default)]
    struct InstantCapture {
        locked: bool,
    }

    impl PointerCapture for InstantCapture {
        fn lock(&mut self) {
            self.locked = true;
        }

        fn unlock(&mut self) {
            self.locked = false;
        }

        fn is_locked(&self) -> bool {
            self.locked
        }

        fn notify(&mut self, event: CaptureEvent) {
            self.locked = event == CaptureEvent::Granted;
        }
    }

    fn slot(id: SlotId) -> CameraSlot {
        CameraSlot::new(id, SpawnTransform::new(Vec3::new(0.0, 2.0, 0.0), 0.0, 0.0), 75.0)
    }

    fn controller() -> ViewController<CountingOrbit, InstantCapture> {
        ViewController::new(slot(SlotId::Free), CountingOrbit::default())
            .with_station(slot(SlotId::Gunner), InstantCapture::default())
    }

    #[test]
    fn new_enables_orbit() {
        let view = controller();
        assert_eq!(view.active(), SlotId::Free);
        assert!(view.orbit().is_enabled());
    }

    #[test]
    fn slot_names_parse() {
        assert_eq!("Gunner".parse::<SlotId>(), Ok(SlotId::Gunner));
        assert_eq!(" pilot ".parse::<SlotId>(), Ok(SlotId::Pilot));
        assert_eq!(
            "cook".parse::<SlotId>(),
            Err(ViewError::UnknownSlotName("cook".to_string()))
        );
    }

    #[test]
    fn unconfigured_slot_is_rejected() {
        let mut view = controller();
        assert_eq!(view.select(SlotId::Pilot), Err(ViewError::InvalidSlot(SlotId::Pilot)));
        assert_eq!(view.active(), SlotId::Free);
        assert!(view.drain_events().is_empty());
    }

    #[test]
    fn free_station_registration_is_ignored() {
        let view = controller().with_station(slot(SlotId::Free), InstantCapture::default());
        assert_eq!(view.slots().collect::<Vec<_>>(), vec![SlotId::Free, SlotId::Gunner]);
    }

    #[test]
    fn active_camera_follows_selection() {
        let mut view = controller();
        view.slot_mut(SlotId::Gunner).unwrap().camera_mut().position = Vec3::new(9.0, 9.0, 9.0);
        view.select(SlotId::Gunner).unwrap();
        assert_eq!(view.active_camera().position, Vec3::new(9.0, 9.0, 9.0));
        view.active_camera_mut().position.x = 1.0;
        assert_eq!(view.slot(SlotId::Gunner).unwrap().camera().position.x, 1.0);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "has no station")]
    fn active_without_station_is_caught() {
        let mut view = controller();
        view.active = SlotId::Pilot;
        view.active_slot();
    }
}
