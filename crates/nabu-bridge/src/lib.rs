//! Nabu bridge: the callback-driven boundary between script-level code and
//! a native GPU host.
//!
//! Script code talks to the GPU through a [`Bridge`]: it creates a window,
//! compiles shaders, builds a render pipeline, and submits one frame per
//! tick. The host's event loop talks back through the dispatcher surface,
//! invoking whichever handlers the script registered in the three lifecycle
//! slots (setup / draw / resize).
//!
//! The bridge itself owns no GPU state. Resources live behind a [`GpuHost`]
//! implementation and are referenced from the script side only through
//! opaque per-class handles.
//!
//! # Structure
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`value`] | `Value` tagged union + canonical serialization |
//! | [`console`] | two-channel console shim (`[out]` / `[err]`) |
//! | [`handle`] | `ShaderHandle`, `PipelineHandle` |
//! | [`host`] | `GpuHost` trait, `WindowConfig`, `FrameSubmission` |
//! | [`bridge`] | `Bridge`, the script-facing operations |
//! | [`dispatch`] | dispatcher surface driven by the host loop |
//! | [`error`] | `HostError` |
//!
//! # Quick start
//!
//! ```rust,ignore
//! use nabu_bridge::Bridge;
//!
//! let mut bridge = Bridge::new(host);
//! bridge.create_window("triangle", 800, 600)?;
//!
//! bridge.on_setup(|b| {
//!     let shader = b.create_shader_module(WGSL)?;
//!     let pipeline = b.create_render_pipeline(shader, "vs_main", "fs_main")?;
//!     // stash `pipeline` somewhere the draw handler can reach it
//!     Ok(())
//! });
//!
//! bridge.on_draw(move |b| {
//!     b.draw_frame(pipeline, 0.1, 0.2, 0.3, 1.0, 3, 1)?;
//!     Ok(())
//! });
//!
//! // The host loop then calls bridge.dispatch_setup() once, and
//! // bridge.dispatch_draw() every frame.
//! ```

pub mod bridge;
pub mod console;
pub mod dispatch;
pub mod error;
pub mod handle;
pub mod host;
pub mod value;

#[cfg(test)]
mod test_host;

pub use bridge::Bridge;
pub use error::{HandleClass, HostError};
pub use handle::{PipelineHandle, ShaderHandle};
pub use host::{FrameSubmission, GpuHost, WindowConfig};
pub use value::Value;
