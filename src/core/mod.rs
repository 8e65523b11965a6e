pub mod controls;
pub mod gpu_context;
pub mod input_adapter;
pub mod orbit;
pub mod pointer_look;
pub mod surface_renderer;

pub use controls::{CaptureEvent, OrbitControl, PointerCapture};
pub use gpu_context::GpuContext;
pub use input_adapter::{command_for_key, Command, InputAdapter};
pub use orbit::OrbitRig;
pub use pointer_look::{CaptureState, PointerLook};
pub use surface_renderer::SurfaceRenderer;
