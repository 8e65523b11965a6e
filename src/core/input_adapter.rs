use winit::event::{DeviceEvent, ElementState, MouseButton, MouseScrollDelta, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

use crate::locomotion::Direction;
use crate::view::SlotId;

/// Pixels per line for line-based wheel deltas
const PIXELS_PER_LINE: f32 = 40.0;

/// Session-level action decoded from raw window input
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    Move(Direction, bool),
    Select(SlotId),
    ResetView,
    /// Orbit drag in window pixels
    Orbit { dx: f32, dy: f32 },
    /// Wheel steps, positive zooms in
    Zoom(f32),
    /// Raw mouse motion for first-person look
    Look { dx: f32, dy: f32 },
    Escape,
}

/// Bridges winit events to `Command`s
#[derive(Debug, Clone, Default)]
pub struct InputAdapter {
    dragging: bool,
    cursor: Option<(f32, f32)>,
}

impl InputAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Decode a window event. Key repeats are ignored so flags only change on
    /// real press/release transitions.
    pub fn window_event(&mut self, event: &WindowEvent) -> Option<Command> {
        match event {
            WindowEvent::KeyboardInput { event, .. } => {
                if event.repeat {
                    return None;
                }
                match event.physical_key {
                    PhysicalKey::Code(code) => command_for_key(code, event.state.is_pressed()),
                    PhysicalKey::Unidentified(_) => None,
                }
            }
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => {
                self.dragging = *state == ElementState::Pressed;
                None
            }
            WindowEvent::CursorMoved { position, .. } => {
                let new_pos = (position.x as f32, position.y as f32);
                let previous = self.cursor.replace(new_pos);
                match previous {
                    Some(old) if self.dragging => Some(Command::Orbit {
                        dx: new_pos.0 - old.0,
                        dy: new_pos.1 - old.1,
                    }),
                    _ => None,
                }
            }
            WindowEvent::CursorLeft { .. } => {
                self.cursor = None;
                None
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let steps = match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / PIXELS_PER_LINE,
                };
                (steps != 0.0).then_some(Command::Zoom(steps))
            }
            WindowEvent::Focused(false) => {
                self.dragging = false;
                None
            }
            _ => None,
        }
    }

    /// Decode raw device motion used for first-person look
    pub fn device_event(&mut self, event: &DeviceEvent) -> Option<Command> {
        match event {
            DeviceEvent::MouseMotion { delta: (dx, dy) } => Some(Command::Look {
                dx: *dx as f32,
                dy: *dy as f32,
            }),
            _ => None,
        }
    }
}

/// Key bindings: WASD/arrows move, 1-4 pick the camera, R resets, Escape
/// releases capture (or quits from the free view). Slot keys fire on press only.
pub fn command_for_key(code: KeyCode, pressed: bool) -> Option<Command> {
    let movement = match code {
        KeyCode::KeyW | KeyCode::ArrowUp => Some(Direction::Forward),
        KeyCode::KeyS | KeyCode::ArrowDown => Some(Direction::Backward),
        KeyCode::KeyA | KeyCode::ArrowLeft => Some(Direction::Left),
        KeyCode::KeyD | KeyCode::ArrowRight => Some(Direction::Right),
        _ => None,
    };
    if let Some(direction) = movement {
        return Some(Command::Move(direction, pressed));
    }

    if !pressed {
        return None;
    }
    match code {
        KeyCode::Digit1 | KeyCode::Numpad1 => Some(Command::Select(SlotId::Free)),
        KeyCode::Digit2 | KeyCode::Numpad2 => Some(Command::Select(SlotId::Gunner)),
        KeyCode::Digit3 | KeyCode::Numpad3 => Some(Command::Select(SlotId::Driver)),
        KeyCode::Digit4 | KeyCode::Numpad4 => Some(Command::Select(SlotId::Pilot)),
        KeyCode::KeyR => Some(Command::ResetView),
        KeyCode::Escape => Some(Command::Escape),
        _ => None,
    }
}
