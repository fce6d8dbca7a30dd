//! Test fixtures and constants.

use place_dither::{Palette, PixelBuffer, Rgb};
use rand::{rngs::StdRng, Rng, SeedableRng};

/// The default terrain color used in tests
pub const SKY: Rgb = Rgb::new(158, 189, 255);

pub fn black_and_white() -> Palette {
    Palette::new(vec![Rgb::BLACK, Rgb::WHITE])
}

/// A few saturated colors plus black and white
pub fn primaries() -> Palette {
    Palette::new(vec![
        Rgb::BLACK,
        Rgb::WHITE,
        Rgb::new(237, 28, 36),
        Rgb::new(19, 230, 123),
        Rgb::new(64, 147, 228),
    ])
}

/// Horizontal grey ramp, fully opaque
pub fn gradient(width: u32, height: u32) -> PixelBuffer {
    let mut buf = PixelBuffer::new(width, height);
    for y in 0..height {
        for x in 0..width {
            let v = (x * 255 / (width - 1).max(1)) as u8;
            buf.set_pixel(x, y, [v, v, v, 255]);
        }
    }
    buf
}

/// Seeded random RGBA noise, alpha included
pub fn noise(width: u32, height: u32, seed: u64) -> PixelBuffer {
    let mut rng = StdRng::seed_from_u64(seed);
    let data = (0..width as usize * height as usize * 4)
        .map(|_| rng.gen::<u8>())
        .collect();
    PixelBuffer::from_raw(width, height, data).unwrap()
}

/// Seeded random opaque noise
pub fn opaque_noise(width: u32, height: u32, seed: u64) -> PixelBuffer {
    let mut buf = noise(width, height, seed);
    for y in 0..height {
        for x in 0..width {
            let mut px = buf.pixel(x, y);
            px[3] = 255;
            buf.set_pixel(x, y, px);
        }
    }
    buf
}

/// True if every opaque pixel of `buf` is an entry of `palette`
pub fn all_opaque_in_palette(buf: &PixelBuffer, palette: &Palette) -> bool {
    buf.pixels()
        .filter(|px| px[3] == 255)
        .all(|px| palette.contains(Rgb::new(px[0], px[1], px[2])))
}
