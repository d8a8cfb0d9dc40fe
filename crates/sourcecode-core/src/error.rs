//! Error types for attribute parsing.
//!
//! None of these abort anything: callers log them and skip the offending
//! instruction or value.

use smol_str::SmolStr;

/// A single attribute value (or one instruction inside it) could not be used.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum AttributeError {
    /// An entry of the `highlight` attribute is neither `N` nor `A-B`.
    #[error("invalid line instruction {0:?}")]
    InvalidLineInstruction(SmolStr),

    /// Line numbers are 1-based.
    #[error("line numbers start at 1, got 0 in {0:?}")]
    ZeroLine(SmolStr),

    /// `maxheight` must be a positive integer row count.
    #[error("invalid max height {0:?}")]
    InvalidMaxHeight(SmolStr),

    /// The `type` attribute value is not a usable speed multiplier.
    #[error("invalid typing speed {0:?}")]
    InvalidSpeed(SmolStr),
}
