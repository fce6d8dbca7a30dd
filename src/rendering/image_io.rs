use image::imageops::{self, FilterType};
use image::RgbaImage;
use place_dither::{BufferError, PixelBuffer};
use std::io::Cursor;
use std::path::Path;

use crate::error::RenderError;

/// Decode any format the `image` crate understands into RGBA8.
pub fn decode_image(bytes: &[u8]) -> Result<PixelBuffer, RenderError> {
    let rgba = image::load_from_memory(bytes)?.to_rgba8();
    let (width, height) = rgba.dimensions();
    tracing::debug!(width, height, "Decoded image");
    Ok(PixelBuffer::from_raw(width, height, rgba.into_raw())?)
}

pub fn load_image(path: &Path) -> Result<PixelBuffer, RenderError> {
    let bytes = std::fs::read(path)?;
    decode_image(&bytes)
}

/// Output size for a source image, keeping its aspect ratio when only one
/// side is requested.
pub fn fit_size(
    source_width: u32,
    source_height: u32,
    width: Option<u32>,
    height: Option<u32>,
) -> (u32, u32) {
    let scaled = |side: u32, num: u32, den: u32| -> u32 {
        ((side as f64 * num as f64 / den as f64).round() as u32).max(1)
    };
    match (width, height) {
        (Some(w), Some(h)) => (w, h),
        (Some(w), None) => (w, scaled(source_height, w, source_width)),
        (None, Some(h)) => (scaled(source_width, h, source_height), h),
        (None, None) => (source_width, source_height),
    }
}

/// Resize to `width`×`height`.
///
/// Pixel mode uses nearest-neighbour sampling so hard pixel edges survive;
/// otherwise a bilinear (triangle) filter runs on premultiplied alpha, so
/// transparent pixels do not darken the opaque pixels they border.
pub fn resize(
    buf: &PixelBuffer,
    width: u32,
    height: u32,
    pixel_mode: bool,
) -> Result<PixelBuffer, BufferError> {
    if width == 0 || height == 0 {
        return Err(BufferError::ZeroDimension { width, height });
    }
    if buf.width() == width && buf.height() == height {
        return Ok(buf.clone());
    }
    let mut data = buf.as_raw().to_vec();
    if !pixel_mode {
        premultiply(&mut data);
    }
    let source = RgbaImage::from_raw(buf.width(), buf.height(), data).ok_or(
        BufferError::SizeMismatch {
            expected: buf.width() as usize * buf.height() as usize * 4,
            actual: buf.as_raw().len(),
        },
    )?;
    let filter = if pixel_mode {
        FilterType::Nearest
    } else {
        FilterType::Triangle
    };
    let mut resized = imageops::resize(&source, width, height, filter).into_raw();
    if !pixel_mode {
        unpremultiply(&mut resized);
    }
    PixelBuffer::from_raw(width, height, resized)
}

fn premultiply(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u32;
        if a == 255 {
            continue;
        }
        for c in &mut px[..3] {
            *c = ((*c as u32 * a + 127) / 255) as u8;
        }
    }
}

/// Pixels with alpha 0 carry no color and are left as they are.
fn unpremultiply(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u32;
        if a == 0 || a == 255 {
            continue;
        }
        for c in &mut px[..3] {
            *c = ((*c as u32 * 255 + a / 2) / a).min(255) as u8;
        }
    }
}

/// Encode as an 8-bit RGBA PNG.
///
/// The fast encoding is recompressed with oxipng; if that fails the fast
/// bytes are returned unchanged.
pub fn encode_png(buf: &PixelBuffer) -> Result<Vec<u8>, RenderError> {
    let mut out = Cursor::new(Vec::new());
    {
        let mut encoder = png::Encoder::new(&mut out, buf.width(), buf.height());
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        encoder.set_compression(png::Compression::Fast);
        encoder.set_filter(png::FilterType::NoFilter);
        let mut writer = encoder
            .write_header()
            .map_err(|e| RenderError::PngEncode(e.to_string()))?;
        writer
            .write_image_data(buf.as_raw())
            .map_err(|e| RenderError::PngEncode(e.to_string()))?;
    }
    let png_bytes = out.into_inner();

    let optimized = oxipng::optimize_from_memory(
        &png_bytes,
        &oxipng::Options {
            strip: oxipng::StripChunks::Safe,
            optimize_alpha: false,
            ..Default::default()
        },
    );
    match optimized {
        Ok(bytes) => Ok(bytes),
        Err(e) => {
            tracing::warn!(%e, "PNG optimisation failed, keeping fast encoding");
            Ok(png_bytes)
        }
    }
}

pub fn save_png(buf: &PixelBuffer, path: &Path) -> Result<usize, RenderError> {
    let bytes = encode_png(buf)?;
    std::fs::write(path, &bytes)?;
    Ok(bytes.len())
}
