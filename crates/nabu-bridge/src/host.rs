//! The host operation surface consumed by the bridge.
//!
//! Everything behind this trait is an external collaborator: native window
//! and surface management, the GPU device and queue, shader compilation,
//! pipeline construction, and the render loop itself.

use crate::error::HostError;
use crate::handle::{PipelineHandle, ShaderHandle};

/// Window descriptor forwarded to the host on `create_window`.
///
/// Single-window model: the host associates "the window" with the process;
/// there is no window handle.
#[derive(Debug, Clone)]
pub struct WindowConfig {
    pub title: String,
    /// Width in logical pixels. Must be positive.
    pub width: u32,
    /// Height in logical pixels. Must be positive.
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "nabu".to_string(),
            width: 800,
            height: 600,
        }
    }
}

/// Parameters for one frame submission.
///
/// Built fresh on every `draw_frame` call; has no identity beyond the
/// single host operation it parameterizes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameSubmission {
    pub pipeline: PipelineHandle,
    /// Clear color RGBA. Not clamped by the bridge; range policy is the
    /// host's.
    pub clear: [f32; 4],
    /// Number of vertices to draw. Zero is legal and draws nothing.
    pub vertex_count: u32,
    /// Number of instances to draw. Zero is legal and draws nothing.
    pub instance_count: u32,
}

/// Host operations the bridge forwards to.
///
/// Each method is one synchronous call across the script/host boundary;
/// no method may suspend or block beyond the host work itself.
pub trait GpuHost {
    /// Requests creation of the native window/surface described by
    /// `config`. Repeated calls are host policy; hosts are expected to
    /// honor the first descriptor.
    fn create_window(&mut self, config: &WindowConfig) -> Result<(), HostError>;

    /// Compiles shader source and returns a handle to the module.
    fn create_shader_module(&mut self, source: &str) -> Result<ShaderHandle, HostError>;

    /// Builds a render pipeline from a live shader module and the names of
    /// its vertex/fragment entry points.
    fn create_render_pipeline(
        &mut self,
        shader: ShaderHandle,
        vertex_entry: &str,
        fragment_entry: &str,
    ) -> Result<PipelineHandle, HostError>;

    /// Submits one frame.
    fn draw_frame(&mut self, frame: &FrameSubmission) -> Result<(), HostError>;

    /// Writes one console line. `is_error` selects the error channel
    /// (stderr) over the standard channel (stdout).
    fn print(&mut self, message: &str, is_error: bool);
}
