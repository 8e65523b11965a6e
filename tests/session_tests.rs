use camp_view::core::{command_for_key, CaptureState, Command, OrbitControl};
use camp_view::renderer::Viewport;
use camp_view::scenes::{SceneBuilder, SceneConfig};
use camp_view::{Direction, Session, SlotId, SwitchReason};
use winit::keyboard::KeyCode;

fn camp_session() -> Session {
    let setup = SceneBuilder::build(&SceneConfig::military_camp()).unwrap();
    Session::from_setup(setup, 0.002)
}

/// Stand-in host that grants or refuses every grab
fn run_host(session: &mut Session, allow_grab: bool) -> Vec<bool> {
    let mut performed = Vec::new();
    while let Some(grab) = session.take_pointer_request() {
        performed.push(grab);
        if grab {
            if allow_grab {
                session.pointer_lock_granted().unwrap();
            } else {
                session.pointer_lock_denied().unwrap();
            }
        }
    }
    performed
}

#[cfg(test)]
mod session_tests {
    use super::*;

    #[test]
    fn test_keys_drive_view_switching() {
        let mut session = camp_session();
        let select_driver = command_for_key(KeyCode::Digit3, true).unwrap();
        session.apply(select_driver).unwrap();
        assert_eq!(run_host(&mut session, true), vec![true]);

        assert_eq!(session.active_slot(), SlotId::Driver);
        assert!(!session.view().orbit().is_enabled());
        assert_eq!(session.view().capture(SlotId::Driver).unwrap().state(), CaptureState::Locked);

        let select_free = command_for_key(KeyCode::Digit1, true).unwrap();
        session.apply(select_free).unwrap();
        assert_eq!(run_host(&mut session, true), vec![false]);
        assert_eq!(session.active_slot(), SlotId::Free);
        assert!(session.view().orbit().is_enabled());
    }

    #[test]
    fn test_denied_grab_returns_to_free() {
        let mut session = camp_session();
        session.apply(Command::Select(SlotId::Pilot)).unwrap();
        run_host(&mut session, false);

        assert_eq!(session.active_slot(), SlotId::Free);
        assert!(session.view().orbit().is_enabled());
        let events = session.drain_view_events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[1].reason, SwitchReason::CaptureDenied);
    }

    #[test]
    fn test_station_switch_moves_grab_to_new_station() {
        let mut session = camp_session();
        session.apply(Command::Select(SlotId::Gunner)).unwrap();
        run_host(&mut session, true);
        session.apply(Command::Select(SlotId::Pilot)).unwrap();
        run_host(&mut session, true);

        assert_eq!(session.active_slot(), SlotId::Pilot);
        assert_eq!(session.view().capture(SlotId::Gunner).unwrap().state(), CaptureState::Unlocked);
        assert_eq!(session.view().capture(SlotId::Pilot).unwrap().state(), CaptureState::Locked);

        // Host loses the pointer (focus change)
        session.pointer_lock_released().unwrap();
        assert_eq!(session.active_slot(), SlotId::Free);
        assert_eq!(session.view().capture(SlotId::Pilot).unwrap().state(), CaptureState::Unlocked);
    }

    #[test]
    fn test_grant_after_leaving_station_is_released() {
        let mut session = camp_session();
        session.apply(Command::Select(SlotId::Gunner)).unwrap();
        assert_eq!(session.take_pointer_request(), Some(true));

        // User bails out before the host answers
        session.apply(Command::Select(SlotId::Free)).unwrap();
        assert_eq!(session.take_pointer_request(), Some(false));

        // Late grant is handed straight back
        session.pointer_lock_granted().unwrap();
        assert_eq!(session.take_pointer_request(), Some(false));
        assert_eq!(session.active_slot(), SlotId::Free);
        assert!(session.view().orbit().is_enabled());
        assert_eq!(session.view().capture(SlotId::Gunner).unwrap().state(), CaptureState::Unlocked);
    }

    #[test]
    fn test_locomotion_moves_only_active_camera() {
        let mut session = camp_session();
        session.apply(Command::Select(SlotId::Gunner)).unwrap();
        run_host(&mut session, true);

        let driver_before = *session.view().slot(SlotId::Driver).unwrap().camera();
        let gunner_before = session.active_camera().position;

        session.apply(Command::Move(Direction::Left, true)).unwrap();
        for _ in 0..5 {
            session.frame();
        }
        session.apply(Command::Move(Direction::Left, false)).unwrap();
        session.frame();

        let moved = session.active_camera().position - gunner_before;
        assert!((moved.length() - 0.5).abs() < 1e-4);
        assert_eq!(*session.view().slot(SlotId::Driver).unwrap().camera(), driver_before);
    }

    #[test]
    fn test_free_camera_never_drops_below_floor() {
        let mut session = camp_session();
        session.apply(Command::Move(Direction::Forward, true)).unwrap();
        let floor = session.locomotion().params().min_height;
        for _ in 0..2000 {
            session.frame();
            assert!(session.active_camera().position.y >= floor - 1e-4);
        }
    }

    #[test]
    fn test_orbit_drag_stops_at_floor() {
        let mut session = camp_session();
        let floor = session.locomotion().params().min_height;
        let distance = session.active_camera().position.length();

        session.apply(Command::Orbit { dx: 0.0, dy: -1000.0 }).unwrap();
        session.frame();
        let position = session.active_camera().position;
        assert!(position.y >= floor - 1e-4, "free camera at y={} below floor {}", position.y, floor);
        assert!((position.length() - distance).abs() < 1e-2);

        // Dragging further down while walking forward keeps it there
        session.apply(Command::Move(Direction::Forward, true)).unwrap();
        for _ in 0..50 {
            session.apply(Command::Orbit { dx: 15.0, dy: -200.0 }).unwrap();
            session.frame();
            assert!(session.active_camera().position.y >= floor - 1e-4);
        }
    }

    #[test]
    fn test_unconfigured_selection_reports_error() {
        let setup = SceneBuilder::build(&{
            let mut config = SceneConfig::military_camp();
            config.cameras.retain(|c| c.slot != SlotId::Pilot);
            config
        })
        .unwrap();
        let mut session = Session::from_setup(setup, 0.002);
        assert!(session.apply(Command::Select(SlotId::Pilot)).is_err());
        assert_eq!(session.active_slot(), SlotId::Free);
        assert_eq!(session.take_pointer_request(), None);
    }

    #[test]
    fn test_viewport_renders_active_camera() {
        let mut session = camp_session();
        let mut viewport = Viewport::new(32, 24);

        let free_frame = viewport.render(session.scene(), session.active_camera()).to_vec();
        session.apply(Command::Select(SlotId::Pilot)).unwrap();
        let pilot_frame = viewport.render(session.scene(), session.active_camera()).to_vec();

        assert_eq!(free_frame.len(), 32 * 24 * 4);
        assert_ne!(free_frame, pilot_frame);
    }
}
