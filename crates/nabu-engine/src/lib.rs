//! Nabu engine crate.
//!
//! The native GPU host behind the bridge. This crate owns the platform +
//! GPU runtime pieces: the winit event loop, the wgpu device and surface,
//! and the resource tables the bridge's handles point into. Script-level
//! code never touches any of this directly: it goes through
//! `nabu_bridge::Bridge`, and the runtime here calls back through the
//! bridge's dispatcher.

pub mod device;
pub mod host;
pub mod logging;
pub mod window;
