// Generated LUT tables and reference-formula constants trip these lints.
#![allow(
    clippy::excessive_precision,
    clippy::needless_range_loop,
    clippy::module_inception
)]

//! place-dither: palette-constrained error diffusion for pixel placement grids
//!
//! This library turns an RGBA image into one that uses only the colors of a
//! placement-game palette, with optional Floyd-Steinberg dithering, a
//! "terrain" color that becomes transparent, and per-color statistics.
//!
//! # Quick Start
//!
//! The [`PaletteQuantizer`] builder is the primary entry point:
//!
//! ```
//! use place_dither::{
//!     flatten_alpha, ColorCensus, DistanceMetric, NoProgress, Palette, PaletteQuantizer,
//!     PixelBuffer, ToneAdjustment,
//! };
//!
//! let palette = Palette::from_hex(&["#000000", "#FFFFFF", "#ED1C24"]).unwrap();
//! let mut buf = PixelBuffer::filled(4, 4, [200, 60, 60, 200]);
//!
//! ToneAdjustment::new().contrast(60.0).apply(&mut buf, &mut NoProgress).unwrap();
//! flatten_alpha(&mut buf);
//!
//! let mut quantizer = PaletteQuantizer::new(palette)
//!     .intensity(1.0)
//!     .metric(DistanceMetric::Oklab);
//! quantizer.run(&mut buf, &mut NoProgress).unwrap();
//!
//! let census = ColorCensus::count(&buf, quantizer.matching_palette());
//! assert_eq!(census.total(), 16);
//! ```
//!
//! # Pipeline
//!
//! ```text
//! RGBA source
//!     |
//!     v
//! [Tone adjust]          brightness / contrast / saturation, 50 = identity
//!     |
//!     v
//! (resize, done by the caller)
//!     |
//!     v
//! [Flatten alpha]        alpha becomes exactly 0 or 255
//!     |
//!     v
//! [Quantize]             nearest palette color + Floyd-Steinberg diffusion
//!     |
//!     v
//! [Terrain mask]         terrain-colored pixels become transparent
//!     |
//!     v
//! [Census]               opaque pixel counts per palette color
//! ```
//!
//! # Color Distance
//!
//! Three metrics are available via [`DistanceMetric`]:
//!
//! | Metric | Space | Cost |
//! |--------|-------|------|
//! | `rgb` | raw 8-bit sRGB, squared Euclidean | cheapest |
//! | `ciede2000` | CIE Lab (D65), ΔE00 | most expensive |
//! | `oklab` | Oklab, squared Euclidean | in between |
//!
//! The Oklab conversion deliberately skips sRGB linearization so matches are
//! identical to the browser tool whose output users compare against. See
//! [`Oklab`] for the canonical alternative.
//!
//! # Error Diffusion
//!
//! Error is measured in 8-bit sRGB units, scaled by the dither intensity and
//! spread with weights 7/16 right, 3/16 below-left, 5/16 below and 1/16
//! below-right. Neighbours outside the image are skipped and the remaining
//! weights are not renormalised, so edge pixels lose part of their error.
//!
//! # Cancellation
//!
//! Every long pass takes a [`Progress`] reporter and polls
//! [`Progress::is_cancelled`] once per scan line, returning [`Cancelled`]
//! when asked to stop.

pub mod api;
pub mod buffer;
pub mod color;
pub mod dither;
pub mod output;
pub mod palette;
pub mod preprocess;
pub mod progress;


pub use api::{PaletteQuantizer, QuantizeError, QuantizeReport};
pub use buffer::{BufferError, PixelBuffer};
pub use color::{Lab, Oklab, Rgb};
pub use dither::{QuantizeOptions, Quantizer};
pub use output::{mask_terrain, ColorCensus};
pub use palette::{
    ciede2000, DistanceMetric, NearestColorMatcher, Palette, PaletteError, ParseColorError,
    ParseMetricError,
};
pub use preprocess::{flatten_alpha, ToneAdjustment};
pub use progress::{Cancelled, NoProgress, Phase, Progress};
