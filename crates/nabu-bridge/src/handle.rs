//! Opaque per-class handles for host-owned GPU resources.
//!
//! The script side holds only the integer; the host owns the resource and
//! is solely responsible for releasing it. Separate newtypes per resource
//! class keep cross-class misuse out of the type system entirely: a shader
//! handle cannot be submitted where a pipeline handle is expected.

use std::fmt;

/// Handle to a host-owned shader module.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct ShaderHandle(u32);

impl ShaderHandle {
    /// Wraps a raw id issued by the host.
    pub fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// The raw id as issued by the host.
    pub fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for ShaderHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "shader#{}", self.0)
    }
}

/// Handle to a host-owned render pipeline.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct PipelineHandle(u32);

impl PipelineHandle {
    /// Wraps a raw id issued by the host.
    pub fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// The raw id as issued by the host.
    pub fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for PipelineHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pipeline#{}", self.0)
    }
}
