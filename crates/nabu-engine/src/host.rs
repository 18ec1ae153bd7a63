//! The engine-side implementation of the bridge's host surface.

use anyhow::{Context, Result};
use ouroboros::self_referencing;
use winit::dpi::PhysicalSize;
use winit::window::Window;

use nabu_bridge::{
    FrameSubmission, GpuHost, HostError, PipelineHandle, ShaderHandle, WindowConfig,
};

use crate::device::{Gpu, GpuInit};

// The surface borrows the window, so the two live together in one
// self-referencing entry. Same approach as keeping the window alive for
// the whole lifetime of its swapchain.
#[self_referencing]
struct WindowEntry {
    window: Window,

    #[borrows(window)]
    #[covariant]
    gpu: Gpu<'this>,
}

/// The native GPU host the bridge forwards to.
///
/// Before the event loop starts, the script's `create_window` call only
/// records the descriptor; the native window and the GPU come up when the
/// runtime enters its resumed state. Resource operations are valid from the
/// setup callback onward.
pub struct EngineHost {
    gpu_init: GpuInit,
    config: Option<WindowConfig>,
    entry: Option<WindowEntry>,
}

impl EngineHost {
    pub fn new(gpu_init: GpuInit) -> Self {
        Self {
            gpu_init,
            config: None,
            entry: None,
        }
    }

    /// The window descriptor requested by the script, or defaults if the
    /// script never asked for a window.
    pub(crate) fn window_config(&self) -> WindowConfig {
        self.config.clone().unwrap_or_default()
    }

    pub(crate) fn has_window(&self) -> bool {
        self.entry.is_some()
    }

    /// Binds the native window and brings the GPU up on it.
    pub(crate) fn attach_window(&mut self, window: Window) -> Result<()> {
        let gpu_init = self.gpu_init.clone();

        let entry = WindowEntryTryBuilder {
            window,
            gpu_builder: |w| pollster::block_on(Gpu::new(w, gpu_init)),
        }
        .try_build()
        .context("GPU initialization failed for window")?;

        self.entry = Some(entry);
        Ok(())
    }

    pub(crate) fn request_redraw(&self) {
        if let Some(entry) = &self.entry {
            entry.with_window(|w| w.request_redraw());
        }
    }

    pub(crate) fn window_size(&self) -> Option<PhysicalSize<u32>> {
        self.entry
            .as_ref()
            .map(|entry| entry.with_window(|w| w.inner_size()))
    }

    /// Reconfigures the surface for a new drawable size.
    pub(crate) fn resize(&mut self, size: PhysicalSize<u32>) {
        if let Some(entry) = &mut self.entry {
            entry.with_gpu_mut(|gpu| gpu.resize(size));
        }
    }

    fn entry_mut(&mut self, op: &'static str) -> Result<&mut WindowEntry, HostError> {
        self.entry.as_mut().ok_or_else(|| {
            HostError::operation(op, "GPU not initialized; valid from the setup callback onward")
        })
    }
}

impl GpuHost for EngineHost {
    fn create_window(&mut self, config: &WindowConfig) -> Result<(), HostError> {
        // Single-window model: the first descriptor wins.
        if self.config.is_some() || self.entry.is_some() {
            log::warn!(
                "create_window called again (\"{}\"); keeping the first window",
                config.title
            );
            return Ok(());
        }

        self.config = Some(config.clone());
        Ok(())
    }

    fn create_shader_module(&mut self, source: &str) -> Result<ShaderHandle, HostError> {
        self.entry_mut("create_shader_module")?
            .with_gpu_mut(|gpu| gpu.create_shader_module(source))
    }

    fn create_render_pipeline(
        &mut self,
        shader: ShaderHandle,
        vertex_entry: &str,
        fragment_entry: &str,
    ) -> Result<PipelineHandle, HostError> {
        self.entry_mut("create_render_pipeline")?
            .with_gpu_mut(|gpu| gpu.create_render_pipeline(shader, vertex_entry, fragment_entry))
    }

    fn draw_frame(&mut self, frame: &FrameSubmission) -> Result<(), HostError> {
        self.entry_mut("draw_frame")?
            .with_gpu_mut(|gpu| gpu.draw_frame(frame))
    }

    fn print(&mut self, message: &str, is_error: bool) {
        if is_error {
            eprintln!("{message}");
        } else {
            println!("{message}");
        }
    }
}
