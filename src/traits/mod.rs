pub mod renderer;
pub mod screenshot;

pub use renderer::*;
pub use screenshot::*;
