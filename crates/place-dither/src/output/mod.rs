//! Post-quantization passes.
//!
//! - [`mask_terrain`] makes every pixel of the terrain color transparent.
//! - [`ColorCensus`] counts opaque pixels per color.

mod census;
mod terrain;

pub use census::ColorCensus;
pub use terrain::mask_terrain;
