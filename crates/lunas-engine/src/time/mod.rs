//! Time subsystem.
//!
//! Turns host frame timestamps into per-frame deltas without coupling to the runtime.
//! Intended usage:
//! - one `FrameClock` per loop driver
//! - call `tick(now_ms)` once per scheduled frame to obtain `FrameTime`

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime};
