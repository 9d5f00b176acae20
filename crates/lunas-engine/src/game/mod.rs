//! Frame loop driver.
//!
//! [`Game`] is driven by its host: the host calls [`Game::frame`] for every
//! scheduled frame and forwards focus, blur and resize notifications. Each frame
//! runs update callbacks with the elapsed seconds, clears the render target,
//! runs draw callbacks and requests the next frame.

mod callbacks;
mod config;
mod driver;
mod error;
pub mod host;

pub use callbacks::{
    Blur, BlurFn, CallbackKind, Callbacks, Draw, DrawFn, Focus, FocusFn, Resize, ResizeFn, Update,
    UpdateFn,
};
pub use config::{DEFAULT_SURFACE_ID, GameConfig};
pub use driver::{Game, LoopState};
pub use error::InitError;
pub use host::{ContextVersion, FrameScheduler, GraphicsContext, Host, Notification, Surface};
