//! Rasterization — shape descriptions and the canvas that draws them.

mod canvas;
mod shape;

pub use canvas::Canvas;
pub use shape::{CornerRadii, Fill, Shape};
