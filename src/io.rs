//! Destination sizes from image files via the `image` crate.
//!
//! Available when the `image-io` feature is enabled. Only headers are read;
//! pixel data stays with the renderer.

use crate::geometry::ImageSize;
use crate::util::{DetPostError, DetPostResult};
use std::path::Path;

/// Returns the pixel size of an in-memory image.
pub fn size_of_image(img: &image::DynamicImage) -> DetPostResult<ImageSize> {
    ImageSize::new(img.width() as usize, img.height() as usize)
}

/// Reads the pixel size of an image file without decoding it fully.
pub fn image_file_size<P: AsRef<Path>>(path: P) -> DetPostResult<ImageSize> {
    let (width, height) =
        image::image_dimensions(path).map_err(|err| DetPostError::ImageIo {
            reason: err.to_string(),
        })?;
    ImageSize::new(width as usize, height as usize)
}
