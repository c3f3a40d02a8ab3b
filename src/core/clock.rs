use std::time::Instant;

/// Minimal loop clock - just tracks delta time
#[derive(Debug)]
pub struct Clock {
    last_tick: Instant,
}

impl Clock {
    /// Create new clock starting now
    pub fn new() -> Self {
        Self {
            last_tick: Instant::now(),
        }
    }

    /// Get delta time since last tick and advance clock
    /// Returns delta in seconds
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let delta = now.duration_since(self.last_tick).as_secs_f32();
        self.last_tick = now;
        delta
    }

    /// Reset clock to current time
    pub fn reset(&mut self) {
        self.last_tick = Instant::now();
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}

/// Frames-per-second averaged over one-second windows
#[derive(Debug, Clone, Copy, Default)]
pub struct FpsCounter {
    window: f32,
    frames: u32,
    fps: f32,
}

impl FpsCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one loop iteration; returns the new value when a window closes
    pub fn tick(&mut self, delta: f32) -> Option<f32> {
        self.window += delta;
        self.frames += 1;

        if self.window >= 1.0 {
            self.fps = self.frames as f32 / self.window;
            self.window = 0.0;
            self.frames = 0;
            Some(self.fps)
        } else {
            None
        }
    }

    /// Last completed measurement, zero until the first window closes
    pub fn fps(&self) -> f32 {
        self.fps
    }
}
