//! Protocol error types.

use thiserror::Error;

/// Errors that can occur while decoding protocol values.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("Invalid color string: {0:?} (expected \"#rrggbb\")")]
    InvalidColor(String),
}
