//! Headless [`GpuHost`] used by unit tests.

use crate::error::{HandleClass, HostError};
use crate::handle::{PipelineHandle, ShaderHandle};
use crate::host::{FrameSubmission, GpuHost, WindowConfig};

/// Records every host operation instead of touching a GPU. Handles are
/// issued sequentially per class, so tests can predict them.
#[derive(Default)]
pub(crate) struct RecordingHost {
    pub(crate) windows: Vec<WindowConfig>,
    pub(crate) shader_sources: Vec<String>,
    pub(crate) pipelines: Vec<(ShaderHandle, String, String)>,
    pub(crate) frames: Vec<FrameSubmission>,
    pub(crate) printed: Vec<(String, bool)>,
    /// When set, the next shader compile fails (consumed on use).
    pub(crate) fail_next_shader: bool,
}

impl GpuHost for RecordingHost {
    fn create_window(&mut self, config: &WindowConfig) -> Result<(), HostError> {
        self.windows.push(config.clone());
        Ok(())
    }

    fn create_shader_module(&mut self, source: &str) -> Result<ShaderHandle, HostError> {
        if self.fail_next_shader {
            self.fail_next_shader = false;
            return Err(HostError::operation(
                "create_shader_module",
                "mock compile error",
            ));
        }

        let handle = ShaderHandle::from_raw(self.shader_sources.len() as u32);
        self.shader_sources.push(source.to_string());
        Ok(handle)
    }

    fn create_render_pipeline(
        &mut self,
        shader: ShaderHandle,
        vertex_entry: &str,
        fragment_entry: &str,
    ) -> Result<PipelineHandle, HostError> {
        if shader.raw() as usize >= self.shader_sources.len() {
            return Err(HostError::invalid_handle(HandleClass::Shader, shader.raw()));
        }

        let handle = PipelineHandle::from_raw(self.pipelines.len() as u32);
        self.pipelines
            .push((shader, vertex_entry.to_string(), fragment_entry.to_string()));
        Ok(handle)
    }

    fn draw_frame(&mut self, frame: &FrameSubmission) -> Result<(), HostError> {
        if frame.pipeline.raw() as usize >= self.pipelines.len() {
            return Err(HostError::invalid_handle(
                HandleClass::Pipeline,
                frame.pipeline.raw(),
            ));
        }

        self.frames.push(*frame);
        Ok(())
    }

    fn print(&mut self, message: &str, is_error: bool) {
        self.printed.push((message.to_string(), is_error));
    }
}
