//! Window + runtime loop.
//!
//! Owns the `winit` EventLoop and Window, and wires them to the bridge's
//! dispatcher surface.

mod runtime;

pub use runtime::Runtime;
