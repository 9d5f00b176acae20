//! GPU device + surface management.
//!
//! This module is responsible for:
//! - creating the wgpu Instance/Adapter/Device/Queue for a context version
//! - creating & configuring the Surface (swapchain)
//! - clearing and presenting frames on behalf of the loop driver

mod context;
mod error;
mod frame;
mod init;
mod surface;

pub use context::GpuContext;
pub use error::SurfaceErrorAction;
pub use frame::GpuFrame;
pub use init::GpuInit;
