//! Native host + runtime loop.
//!
//! Owns the `winit` EventLoop and Window, implements the loop driver's host
//! capabilities on top of them, and feeds frames and window notifications to
//! the driver.

mod runtime;

pub use runtime::{Runtime, RuntimeConfig, WindowHost, WindowSurface};
