//! Public API for the place-dither crate.
//!
//! This module provides the high-level API: the [`PaletteQuantizer`]
//! builder and the [`QuantizeError`] unified error type.

mod builder;
mod error;

pub use builder::{PaletteQuantizer, QuantizeReport};
pub use error::QuantizeError;
