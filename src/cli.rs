// cli.rs - Command-line interface configuration
use std::path::PathBuf;

use clap::Parser;

use crate::config::Preset;

#[derive(Parser, Debug, Clone)]
#[command(name = "progressive-tracer")]
#[command(about = "Progressive GPU path tracer with a first-person camera", long_about = None)]
pub struct Cli {
    /// Starting configuration
    #[arg(long, value_enum, default_value_t = Preset::Progressive)]
    pub preset: Preset,

    /// JSON file overriding preset values
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Render target width in pixels
    #[arg(long)]
    pub width: Option<u32>,

    /// Render target height in pixels
    #[arg(long)]
    pub height: Option<u32>,

    /// Samples per pixel per frame
    #[arg(long)]
    pub samples: Option<u32>,

    /// Vertical field of view in radians
    #[arg(long)]
    pub fov: Option<f32>,

    /// Camera translation per update
    #[arg(long = "move-speed")]
    pub move_speed: Option<f32>,

    /// Radians of rotation per unit of mouse motion
    #[arg(long)]
    pub sensitivity: Option<f32>,

    /// Directory screenshots are written to
    #[arg(long = "screenshot-dir")]
    pub screenshot_dir: Option<PathBuf>,

    /// Disable the status overlay
    #[arg(long = "no-ui", default_value = "false")]
    pub no_ui: bool,
}
