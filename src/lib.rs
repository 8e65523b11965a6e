pub mod camera;
pub mod cli;
pub mod core;
pub mod frame;
pub mod locomotion;
pub mod math;
pub mod renderer;
pub mod scenes;
pub mod session;
pub mod view;

pub use camera::{Camera, SpawnTransform};
pub use locomotion::{Direction, InputState, LocomotionIntegrator, LocomotionParams};
pub use session::Session;
pub use view::{CameraSlot, SlotId, SwitchReason, ViewController, ViewError, ViewEvent};
