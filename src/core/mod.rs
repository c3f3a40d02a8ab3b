pub mod clock;
pub mod controller;
pub mod input;
pub mod input_adapter;

pub use clock::{Clock, FpsCounter};
pub use controller::{Button, Controller};
pub use input::{InputSnapshot, MoveAxes};
pub use input_adapter::WinitController;
