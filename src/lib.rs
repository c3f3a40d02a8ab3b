pub mod accumulation;
pub mod camera;
pub mod cli;
pub mod config;
pub mod core;
pub mod overlay;
pub mod renderer;
pub mod screenshot;
pub mod session;
pub mod traits;
pub mod types;
pub mod uniforms;

pub use accumulation::{Accumulator, FramePlan, RenderMode, Target};
pub use camera::{Camera, CameraSettings, Pose};
pub use config::{Config, Preset};
pub use session::{LoopControl, Session, SessionStatus};
