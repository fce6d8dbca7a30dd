//! Palettes, distance metrics and nearest-color matching
//!
//! A [`Palette`] is an immutable ordered color list with an identity used to
//! invalidate the [`NearestColorMatcher`] memo. [`DistanceMetric`] selects
//! how "nearest" is measured.

mod error;
mod matcher;
mod metric;
mod palette;

pub use error::{PaletteError, ParseColorError};
pub use matcher::NearestColorMatcher;
pub use metric::{ciede2000, DistanceMetric, ParseMetricError};
pub use palette::Palette;
