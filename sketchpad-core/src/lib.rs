pub mod color;
pub mod id;
pub mod input;
pub mod render;
pub mod sketch;
pub mod state;
pub mod stroke;
pub mod util;

pub use color::Color;
pub use id::{SketchFactory, SketchID};
pub use input::{InputMapper, MappedEvent, PointerEvent, SurfaceSize};
pub use sketch::{EmptySketchError, Sketch};
pub use stroke::{IndexOutOfRange, Point, Stroke};
