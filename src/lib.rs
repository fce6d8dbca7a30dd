//! Pixelplace
//!
//! Converts images into palette-constrained pixel art for placement canvases.
//! The pixel algorithms live in the `place-dither` crate; this library adds
//! the background task runner, pipeline orchestration, configuration and
//! image I/O, and exposes its modules for integration testing.

pub mod error;
pub mod models;
pub mod rendering;
pub mod services;
