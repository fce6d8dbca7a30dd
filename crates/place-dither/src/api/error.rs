//! Unified error type for the place-dither public API.

use crate::buffer::BufferError;
use crate::palette::{PaletteError, ParseColorError};
use crate::progress::Cancelled;
use std::fmt;

/// Unified error type for the place-dither public API.
///
/// Wraps all error types from the crate into a single enum for
/// convenient `?` propagation in application code.
///
/// # Example
///
/// ```
/// use place_dither::{Palette, PaletteQuantizer, QuantizeError};
///
/// fn build(hex: &[&str]) -> Result<PaletteQuantizer, QuantizeError> {
///     let palette = Palette::from_hex(hex)?;
///     Ok(PaletteQuantizer::new(palette))
/// }
///
/// assert!(build(&["#000", "#fff"]).is_ok());
/// assert!(matches!(build(&["#00"]), Err(QuantizeError::Palette(_))));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum QuantizeError {
    /// Palette construction failed
    Palette(PaletteError),
    /// Color parsing error (invalid hex string)
    ParseColor(ParseColorError),
    /// Raw bytes did not form a valid pixel buffer
    Buffer(BufferError),
    /// The run was cancelled through its progress reporter
    Cancelled,
}

impl fmt::Display for QuantizeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuantizeError::Palette(err) => write!(f, "palette error: {}", err),
            QuantizeError::ParseColor(err) => write!(f, "color parse error: {}", err),
            QuantizeError::Buffer(err) => write!(f, "pixel buffer error: {}", err),
            QuantizeError::Cancelled => f.write_str("quantization cancelled"),
        }
    }
}

impl std::error::Error for QuantizeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            QuantizeError::Palette(err) => Some(err),
            QuantizeError::ParseColor(err) => Some(err),
            QuantizeError::Buffer(err) => Some(err),
            QuantizeError::Cancelled => None,
        }
    }
}

impl From<PaletteError> for QuantizeError {
    fn from(err: PaletteError) -> Self {
        QuantizeError::Palette(err)
    }
}

impl From<ParseColorError> for QuantizeError {
    fn from(err: ParseColorError) -> Self {
        QuantizeError::ParseColor(err)
    }
}

impl From<BufferError> for QuantizeError {
    fn from(err: BufferError) -> Self {
        QuantizeError::Buffer(err)
    }
}

impl From<Cancelled> for QuantizeError {
    fn from(_: Cancelled) -> Self {
        QuantizeError::Cancelled
    }
}
