//! Renderer configuration: presets, JSON overrides, validation.

use std::f32::consts::{FRAC_PI_2, PI};
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::camera::CameraSettings;
use crate::cli::Cli;

/// Named starting points for the configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    /// Temporal blending, few samples per frame, slow precise camera
    #[default]
    Progressive,
    /// Every frame stands alone with heavy per-frame supersampling
    Oversample,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowSettings {
    pub width: u32,
    pub height: u32,
    pub title: String,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            title: "Progressive Tracer".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RenderSettings {
    /// Vertical field of view in radians
    pub fov: f32,
    /// Samples per pixel per frame
    pub samples: u32,
    /// Blend each frame into the running mean; otherwise weight is always 1
    pub accumulate: bool,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            fov: FRAC_PI_2,
            samples: 4,
            accumulate: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub window: WindowSettings,
    pub camera: CameraSettings,
    pub render: RenderSettings,
    pub screenshot_dir: PathBuf,
    pub show_ui: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self::preset(Preset::default())
    }
}

impl Config {
    pub fn preset(preset: Preset) -> Self {
        let base = Self {
            window: WindowSettings::default(),
            camera: CameraSettings::default(),
            render: RenderSettings::default(),
            screenshot_dir: PathBuf::from("."),
            show_ui: true,
        };

        match preset {
            Preset::Progressive => base,
            Preset::Oversample => Self {
                camera: CameraSettings {
                    move_speed: 1.0,
                    mouse_sensitivity: 0.025,
                    start_position: [1.0, 1.0, 1.0],
                    ..base.camera
                },
                render: RenderSettings {
                    samples: 16,
                    accumulate: false,
                    ..base.render
                },
                ..base
            },
        }
    }

    /// Overlay a JSON document onto `self`; absent fields keep their value
    pub fn merge_json(self, json: &str) -> Result<Self> {
        let overrides: Value = serde_json::from_str(json).context("Config is not valid JSON")?;
        let mut merged = serde_json::to_value(&self)?;
        merge_values(&mut merged, overrides);
        serde_json::from_value(merged).context("Config has unexpected field types")
    }

    pub fn load_file(self, path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        self.merge_json(&json)
            .with_context(|| format!("Failed to parse config {}", path.display()))
    }

    /// Preset, then config file, then individual flags
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let mut config = Self::preset(cli.preset);
        if let Some(path) = &cli.config {
            config = config.load_file(path)?;
        }

        if let Some(width) = cli.width {
            config.window.width = width;
        }
        if let Some(height) = cli.height {
            config.window.height = height;
        }
        if let Some(samples) = cli.samples {
            config.render.samples = samples;
        }
        if let Some(fov) = cli.fov {
            config.render.fov = fov;
        }
        if let Some(speed) = cli.move_speed {
            config.camera.move_speed = speed;
        }
        if let Some(sensitivity) = cli.sensitivity {
            config.camera.mouse_sensitivity = sensitivity;
        }
        if let Some(dir) = &cli.screenshot_dir {
            config.screenshot_dir = dir.clone();
        }
        if cli.no_ui {
            config.show_ui = false;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.window.width == 0 || self.window.height == 0 {
            bail!(
                "Resolution must be non-zero, got {}x{}",
                self.window.width,
                self.window.height
            );
        }
        if self.render.samples == 0 {
            bail!("Samples per pixel must be at least 1");
        }
        if !(self.render.fov > 0.0 && self.render.fov < PI) {
            bail!("Field of view must be in (0, pi) radians, got {}", self.render.fov);
        }
        let camera = &self.camera;
        if !(camera.move_speed.is_finite() && camera.move_speed >= 0.0) {
            bail!("Move speed must be finite and non-negative, got {}", camera.move_speed);
        }
        if !camera.mouse_sensitivity.is_finite() {
            bail!("Mouse sensitivity must be finite, got {}", camera.mouse_sensitivity);
        }
        let start = [camera.start_yaw, camera.start_pitch];
        if !camera.start_position.iter().chain(&start).all(|v| v.is_finite()) {
            bail!(
                "Start pose must be finite, got position {:?} yaw {} pitch {}",
                camera.start_position,
                camera.start_yaw,
                camera.start_pitch
            );
        }
        let margin = self.camera.pitch_margin;
        if !(margin > 0.0 && margin < FRAC_PI_2) {
            bail!("Pitch margin must be in (0, pi/2), got {margin}");
        }
        Ok(())
    }
}

fn merge_values(base: &mut Value, overrides: Value) {
    match (base, overrides) {
        (Value::Object(base), Value::Object(overrides)) => {
            for (key, value) in overrides {
                match base.get_mut(&key) {
                    Some(slot) => merge_values(slot, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}
