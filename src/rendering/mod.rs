pub mod image_io;

pub use image_io::{decode_image, encode_png, fit_size, load_image, resize, save_png};
