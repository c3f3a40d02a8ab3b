use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Local};
use image::RgbaImage;

use crate::traits::{CapturedImage, ScreenshotSink};

/// Writes screenshots as PNG files named after the capture time
#[derive(Debug, Clone)]
pub struct PngSink {
    dir: PathBuf,
}

impl PngSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, time: DateTime<Local>) -> PathBuf {
        self.dir.join(file_name(time))
    }
}

impl ScreenshotSink for PngSink {
    fn save(&mut self, image: &CapturedImage) -> Result<PathBuf> {
        if !image.is_consistent() {
            return Err(anyhow!(
                "Captured {}x{} image has {} bytes",
                image.width,
                image.height,
                image.pixels.len()
            ));
        }

        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create {}", self.dir.display()))?;

        let path = self.path_for(Local::now());
        let buffer = RgbaImage::from_raw(image.width, image.height, image.pixels.clone())
            .context("Pixel buffer does not match image size")?;
        buffer
            .save(&path)
            .with_context(|| format!("Failed to write {}", path.display()))?;

        Ok(path)
    }
}

/// `Screenshot_dd_MM_yyyy_HH_mm_ss.png`
pub fn file_name(time: DateTime<Local>) -> String {
    format!("Screenshot_{}.png", time.format("%d_%m_%Y_%H_%M_%S"))
}

/// Encode a linear channel value as an 8-bit sRGB byte
pub fn linear_to_srgb(value: f32) -> u8 {
    let v = value.clamp(0.0, 1.0);
    let encoded = if v <= 0.003_130_8 {
        v * 12.92
    } else {
        1.055 * v.powf(1.0 / 2.4) - 0.055
    };
    (encoded * 255.0).round() as u8
}
