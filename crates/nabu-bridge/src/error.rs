use std::fmt;

use thiserror::Error;

/// Resource class a handle belongs to.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum HandleClass {
    Shader,
    Pipeline,
}

impl fmt::Display for HandleClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandleClass::Shader => f.write_str("shader module"),
            HandleClass::Pipeline => f.write_str("render pipeline"),
        }
    }
}

/// An error surfaced by a host operation across the bridge boundary.
///
/// Propagated synchronously to the script call site, never swallowed and
/// never retried by the bridge.
#[derive(Debug, Error)]
pub enum HostError {
    /// A host-side operation (window creation, shader compile, pipeline
    /// construction, frame submission) failed.
    #[error("{op} failed: {message}")]
    Operation { op: &'static str, message: String },

    /// A handle passed to an operation does not refer to a live resource.
    #[error("invalid {class} handle {raw}")]
    InvalidHandle { class: HandleClass, raw: u32 },
}

impl HostError {
    pub fn operation(op: &'static str, message: impl Into<String>) -> Self {
        HostError::Operation {
            op,
            message: message.into(),
        }
    }

    pub fn invalid_handle(class: HandleClass, raw: u32) -> Self {
        HostError::InvalidHandle { class, raw }
    }
}
