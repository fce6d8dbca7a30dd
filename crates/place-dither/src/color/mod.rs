//! Color types and conversion utilities
//!
//! Pixels enter and leave the pipeline as 8-bit [`Rgb`] triples. The two
//! perceptual spaces exist only to compare colors:
//!
//! - [`Lab`]: CIE L\*a\*b\* (D65), input to the CIEDE2000 metric.
//! - [`Oklab`]: Björn Ottosson's Oklab, input to the Euclidean Oklab metric.
//!
//! # Example
//!
//! ```
//! use place_dither::{Lab, Oklab, Rgb};
//!
//! let orange: Rgb = "#FF7F27".parse().unwrap();
//! let lab = Lab::from(orange);
//! let oklab = Oklab::from(orange);
//! assert!(lab.l > 50.0);
//! assert!(oklab.l > 0.5);
//! ```

mod lab;
mod lut;
mod oklab;
mod rgb;

pub use lab::Lab;
pub use oklab::Oklab;
pub use rgb::Rgb;
