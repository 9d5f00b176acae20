//! Capabilities the loop driver consumes from its host.
//!
//! The driver never talks to a windowing system or graphics API directly. A
//! host exposes drawable surfaces, a frame-scheduling primitive and an event
//! source; `crate::window` implements these on top of `winit` + `wgpu`.

use crate::paint::Color;

/// Graphics context version requested from a surface, in preference order.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ContextVersion {
    /// Higher-capability context. Tried first.
    Modern,
    /// Lower-capability fallback.
    Legacy,
}

impl ContextVersion {
    /// Versions in the order the driver tries them.
    pub const PREFERENCE: [ContextVersion; 2] = [ContextVersion::Modern, ContextVersion::Legacy];
}

/// Host notifications the driver subscribes to.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Notification {
    /// The surface gained input focus.
    Focus,
    /// The surface lost input focus.
    Blur,
    /// The window was resized.
    Resize,
}

/// Minimal rendering context.
pub trait GraphicsContext {
    fn set_clear_color(&mut self, color: Color);

    /// Clears the render target with the current clear color.
    fn clear(&mut self);

    /// Hands the finished frame to the display.
    ///
    /// Called once per frame after every draw callback has run.
    fn present(&mut self) {}
}

/// A drawable surface found by identifier.
pub trait Surface {
    type Context: GraphicsContext;

    /// Acquires a context of the given version, or `None` if unsupported.
    fn acquire_context(&self, version: ContextVersion) -> Option<Self::Context>;

    /// Gives the surface input focus.
    fn focus(&self) {}
}

/// Schedules the next frame.
///
/// The host later calls `Game::frame` with that frame's timestamp.
pub trait FrameScheduler {
    fn request_frame(&mut self);
}

/// Everything the driver needs from its host at construction time.
pub trait Host: FrameScheduler {
    type Surface: Surface;

    /// Looks up a surface by its fixed identifier.
    fn find_surface(&self, id: &str) -> Option<Self::Surface>;

    /// Asks the host to forward `notification` to the driver.
    fn subscribe(&mut self, notification: Notification);
}
