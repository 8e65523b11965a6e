// cli.rs - Command-line interface configuration
use std::path::PathBuf;

use clap::Parser;

use crate::core::pointer_look::DEFAULT_LOOK_SENSITIVITY;
use crate::scenes::SceneConfig;

#[derive(Parser, Debug, Clone)]
#[command(name = "camp-view")]
#[command(about = "Military camp viewer with free orbit and first-person stations", long_about = None)]
pub struct Cli {
    /// Scene description (JSON). Defaults to the built-in military camp.
    #[arg(long, value_name = "FILE")]
    pub scene: Option<PathBuf>,

    /// Movement per frame, overrides the scene value
    #[arg(long)]
    pub speed: Option<f32>,

    /// Lowest camera height, overrides the scene value
    #[arg(long = "min-height")]
    pub min_height: Option<f32>,

    /// Radians of look per pixel of mouse motion
    #[arg(long, default_value_t = DEFAULT_LOOK_SENSITIVITY)]
    pub sensitivity: f32,

    /// Viewport resolution as a fraction of the window size
    #[arg(long = "render-scale", default_value_t = 0.5, value_parser = parse_render_scale)]
    pub render_scale: f32,

    #[arg(long, default_value_t = 800)]
    pub width: u32,

    #[arg(long, default_value_t = 600)]
    pub height: u32,

    /// Print the scene configuration as JSON and exit
    #[arg(long = "dump-scene")]
    pub dump_scene: bool,
}

impl Cli {
    /// Load the requested scene and apply command-line overrides
    pub fn scene_config(&self) -> anyhow::Result<SceneConfig> {
        let mut config = match &self.scene {
            Some(path) => SceneConfig::load(path)?,
            None => SceneConfig::military_camp(),
        };
        if let Some(speed) = self.speed {
            config.locomotion.speed = speed;
        }
        if let Some(min_height) = self.min_height {
            config.locomotion.min_height = min_height;
        }
        Ok(config)
    }

    /// Viewport size for a window of `width` x `height`
    pub fn frame_size(&self, width: u32, height: u32) -> (u32, u32) {
        let scale = |v: u32| ((v as f32 * self.render_scale).round() as u32).max(1);
        (scale(width), scale(height))
    }
}

fn parse_render_scale(s: &str) -> Result<f32, String> {
    let scale: f32 = s.parse().map_err(|e| format!("{}", e))?;
    if scale > 0.0 && scale <= 1.0 {
        Ok(scale)
    } else {
        Err(format!("render scale must be in (0, 1], got {}", scale))
    }
}
