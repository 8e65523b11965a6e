mod builder;
mod camp;
mod config;
mod helipad;

pub use builder::{
    EntityInstance, Lighting, Scene, SceneBox, SceneBuilder, SceneError, SceneSetup, Spin, Spotlight,
};
pub use config::{
    AmbientConfig, CameraConfig, EntityKind, GroundConfig, LightingConfig, Placement, SceneConfig,
    SpotlightConfig, SunConfig,
};
pub use helipad::{helipad_decal, Decal, DECAL_RESOLUTION};
