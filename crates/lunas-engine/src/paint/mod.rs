//! Color representation (linear premultiplied alpha) shared by the loop driver
//! and the GPU layer.

pub mod color;

pub use color::Color;
