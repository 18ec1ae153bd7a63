//! GPU device + surface management.
//!
//! This module is responsible for:
//! - creating the wgpu Instance/Adapter/Device/Queue
//! - creating & configuring the Surface (swapchain)
//! - owning shader modules and render pipelines behind handle tables
//! - acquiring frames and executing frame submissions

mod gpu;
mod resources;

pub use gpu::{Gpu, GpuFrame, GpuInit, SurfaceErrorAction};
