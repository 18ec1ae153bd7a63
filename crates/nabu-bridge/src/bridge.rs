//! Script-facing bridge operations.
//!
//! A [`Bridge`] owns the host and the three callback slots. All operations
//! are synchronous: they either forward one call to the host and return, or
//! mutate a callback slot and return.

use anyhow::Result;

use crate::console;
use crate::dispatch::Callbacks;
use crate::error::HostError;
use crate::handle::{PipelineHandle, ShaderHandle};
use crate::host::{FrameSubmission, GpuHost, WindowConfig};
use crate::value::Value;

/// Handler invoked once after window/device creation completes.
pub type SetupHandler<H> = Box<dyn FnMut(&mut Bridge<H>) -> Result<()>>;

/// Handler invoked once per host frame tick, after setup has completed.
pub type DrawHandler<H> = Box<dyn FnMut(&mut Bridge<H>) -> Result<()>>;

/// Handler invoked when the host detects a window-size change. Receives the
/// new width and height in physical pixels.
pub type ResizeHandler<H> = Box<dyn FnMut(&mut Bridge<H>, u32, u32) -> Result<()>>;

/// The in-process boundary between script-level code and a [`GpuHost`].
pub struct Bridge<H> {
    pub(crate) host: H,
    pub(crate) callbacks: Callbacks<H>,
}

impl<H: GpuHost> Bridge<H> {
    /// Creates a bridge with all three callback slots empty.
    pub fn new(host: H) -> Self {
        Self {
            host,
            callbacks: Callbacks::default(),
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Consumes the bridge, returning the host.
    pub fn into_host(self) -> H {
        self.host
    }

    // ── Window ────────────────────────────────────────────────────────────

    /// Requests creation of the native window. Width and height must be
    /// positive; the title is arbitrary text.
    ///
    /// Whether repeated calls are rejected, ignored, or honored is host
    /// policy; the bridge forwards every call.
    pub fn create_window(
        &mut self,
        title: impl Into<String>,
        width: u32,
        height: u32,
    ) -> Result<(), HostError> {
        if width == 0 || height == 0 {
            return Err(HostError::operation(
                "create_window",
                format!("window size must be positive, got {width}x{height}"),
            ));
        }

        let config = WindowConfig {
            title: title.into(),
            width,
            height,
        };
        self.host.create_window(&config)
    }

    // ── Callback registration ─────────────────────────────────────────────
    //
    // Each slot holds at most one handler; registering again overwrites the
    // previous handler. There is no unregister.

    pub fn on_setup(&mut self, handler: impl FnMut(&mut Bridge<H>) -> Result<()> + 'static) {
        self.callbacks.setup = Some(Box::new(handler));
    }

    pub fn on_draw(&mut self, handler: impl FnMut(&mut Bridge<H>) -> Result<()> + 'static) {
        self.callbacks.draw = Some(Box::new(handler));
    }

    pub fn on_resize(
        &mut self,
        handler: impl FnMut(&mut Bridge<H>, u32, u32) -> Result<()> + 'static,
    ) {
        self.callbacks.resize = Some(Box::new(handler));
    }

    // ── GPU resources ─────────────────────────────────────────────────────

    /// Forwards shader source to the host compiler. A compile failure
    /// propagates as [`HostError::Operation`]; no handle is produced and
    /// nothing is retried.
    pub fn create_shader_module(&mut self, source: &str) -> Result<ShaderHandle, HostError> {
        self.host.create_shader_module(source)
    }

    /// Requests pipeline construction from a previously returned shader
    /// handle and the names of its vertex/fragment entry points. A dead
    /// handle is detected by the host, not pre-validated here.
    pub fn create_render_pipeline(
        &mut self,
        shader: ShaderHandle,
        vertex_entry: &str,
        fragment_entry: &str,
    ) -> Result<PipelineHandle, HostError> {
        self.host
            .create_render_pipeline(shader, vertex_entry, fragment_entry)
    }

    /// Submits one frame: clear to the given color, then draw
    /// `vertex_count` vertices for `instance_count` instances with the
    /// given pipeline. Intended to be called from within a draw callback.
    pub fn draw_frame(
        &mut self,
        pipeline: PipelineHandle,
        r: f32,
        g: f32,
        b: f32,
        a: f32,
        vertex_count: u32,
        instance_count: u32,
    ) -> Result<(), HostError> {
        let frame = FrameSubmission {
            pipeline,
            clear: [r, g, b, a],
            vertex_count,
            instance_count,
        };
        self.host.draw_frame(&frame)
    }

    // ── Console ───────────────────────────────────────────────────────────

    /// Writes one line to the standard channel.
    pub fn log(&mut self, values: &[Value]) {
        let line = console::format_line(false, values);
        self.host.print(&line, false);
    }

    /// Writes one line to the error channel.
    pub fn error(&mut self, values: &[Value]) {
        let line = console::format_line(true, values);
        self.host.print(&line, true);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HandleClass;
    use crate::test_host::RecordingHost;

    #[test]
    fn create_window_forwards_descriptor() {
        let mut bridge = Bridge::new(RecordingHost::default());
        bridge.create_window("T", 800, 600).unwrap();

        let host = bridge.host();
        assert_eq!(host.windows.len(), 1);
        assert_eq!(host.windows[0].title, "T");
        assert_eq!(host.windows[0].width, 800);
        assert_eq!(host.windows[0].height, 600);
    }

    #[test]
    fn create_window_rejects_zero_size() {
        let mut bridge = Bridge::new(RecordingHost::default());
        let err = bridge.create_window("T", 0, 600).unwrap_err();
        assert!(matches!(err, HostError::Operation { op: "create_window", .. }));
        assert!(bridge.host().windows.is_empty());
    }

    #[test]
    fn shader_then_pipeline_yields_distinct_handles() {
        let mut bridge = Bridge::new(RecordingHost::default());
        let shader = bridge.create_shader_module("src").unwrap();
        let pipeline = bridge.create_render_pipeline(shader, "vs", "fs").unwrap();

        // Distinct classes, both starting at id 0 within their class.
        assert_eq!(shader.raw(), 0);
        assert_eq!(pipeline.raw(), 0);
        assert_eq!(bridge.host().pipelines[0].0, shader);
    }

    #[test]
    fn pipeline_from_unknown_shader_fails_with_invalid_handle() {
        let mut bridge = Bridge::new(RecordingHost::default());
        let err = bridge
            .create_render_pipeline(ShaderHandle::from_raw(42), "vs", "fs")
            .unwrap_err();
        assert!(matches!(
            err,
            HostError::InvalidHandle { class: HandleClass::Shader, raw: 42 }
        ));
    }

    #[test]
    fn shader_compile_failure_produces_no_handle() {
        let mut bridge = Bridge::new(RecordingHost::default());
        bridge.host_mut().fail_next_shader = true;
        assert!(bridge.create_shader_module("bad").is_err());
        assert!(bridge.host().shader_sources.is_empty());
    }

    #[test]
    fn log_and_error_select_channels() {
        let mut bridge = Bridge::new(RecordingHost::default());
        bridge.log(&[Value::from("hello"), Value::Int(3)]);
        bridge.error(&[Value::from("oops")]);

        let host = bridge.host();
        assert_eq!(host.printed.len(), 2);
        assert_eq!(host.printed[0], ("[out]: \"hello\" 3".to_string(), false));
        assert_eq!(host.printed[1], ("[err]: \"oops\"".to_string(), true));
    }

    #[test]
    fn draw_frame_builds_the_submission_record() {
        let mut bridge = Bridge::new(RecordingHost::default());
        let shader = bridge.create_shader_module("src").unwrap();
        let pipeline = bridge.create_render_pipeline(shader, "vs", "fs").unwrap();
        bridge.draw_frame(pipeline, 0.0, 1.0, 0.0, 1.0, 3, 1).unwrap();

        let host = bridge.host();
        assert_eq!(host.frames.len(), 1);
        assert_eq!(host.frames[0].pipeline, pipeline);
        assert_eq!(host.frames[0].clear, [0.0, 1.0, 0.0, 1.0]);
        assert_eq!(host.frames[0].vertex_count, 3);
        assert_eq!(host.frames[0].instance_count, 1);
    }

    #[test]
    fn zero_counts_are_legal() {
        let mut bridge = Bridge::new(RecordingHost::default());
        let shader = bridge.create_shader_module("src").unwrap();
        let pipeline = bridge.create_render_pipeline(shader, "vs", "fs").unwrap();
        bridge.draw_frame(pipeline, 0.0, 0.0, 0.0, 0.0, 0, 0).unwrap();
        assert_eq!(bridge.host().frames[0].vertex_count, 0);
    }
}
