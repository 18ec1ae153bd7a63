//! Two-channel console shim.
//!
//! Serializes an arbitrary-arity argument list into one line of text and
//! tags it for either the standard or the error channel. The actual write
//! happens in the host's print primitive; this module only formats.

use std::fmt::Write as _;

use crate::value::Value;

/// Line prefix for the standard channel.
pub const OUT_PREFIX: &str = "[out]";

/// Line prefix for the error channel.
pub const ERR_PREFIX: &str = "[err]";

/// Formats one console line: channel prefix, then the canonical
/// serialization of each value, joined with single spaces.
///
/// Zero arguments yield a bare prefix line.
pub fn format_line(is_error: bool, values: &[Value]) -> String {
    let mut line = String::from(if is_error { ERR_PREFIX } else { OUT_PREFIX });
    line.push(':');

    for value in values {
        line.push(' ');
        // Writing into a String is infallible.
        let _ = write!(line, "{value}");
    }

    line
}
