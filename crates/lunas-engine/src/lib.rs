//! Lunas engine crate.
//!
//! A frame loop driver that dispatches update/draw/focus/blur/resize callbacks,
//! a named service registry with lazy field injection, and a native `winit` +
//! `wgpu` host to run the driver on.

pub mod di;
pub mod game;
pub mod time;

pub mod device;
pub mod logging;
pub mod paint;
pub mod window;
