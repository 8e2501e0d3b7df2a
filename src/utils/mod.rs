pub mod filename;
pub mod image;

pub use filename::{ending_image_filename, sanitize_filename};
pub use image::{ImageFormat, detect_image_format};
