//! Logging utilities.
//!
//! Centralizes logger initialization. The rest of the workspace only ever
//! talks to the `log` facade; the backend choice lives here.

mod init;

pub use init::{LoggingConfig, init_logging};
