use std::path::PathBuf;

/// RGBA8 image copied back from a render target
#[derive(Debug, Clone, PartialEq)]
pub struct CapturedImage {
    pub width: u32,
    pub height: u32,
    /// Row-major, top row first, 4 bytes per pixel
    pub pixels: Vec<u8>,
}

impl CapturedImage {
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Whether the pixel buffer matches the stated dimensions
    pub fn is_consistent(&self) -> bool {
        self.pixels.len() == self.width as usize * self.height as usize * 4
    }
}

/// Destination for screenshots
pub trait ScreenshotSink {
    /// Persist `image`, returning where it went
    fn save(&mut self, image: &CapturedImage) -> anyhow::Result<PathBuf>;
}
