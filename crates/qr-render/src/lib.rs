//! PNG rendering of `qr-core` module grids.

mod error;

pub use error::QrPngError;

use std::io::Cursor;

use image::imageops::resize;
use image::{DynamicImage, ImageBuffer, ImageFormat};
use qr_core::{encode, CodeEcc, EncodeOptions, Version};

/// Renders `data` as a PNG at `scale` pixels per module.
///
/// Tries each `(version, level)` pair in `preferences` in order and uses the
/// first that fits, matching [`qr_core::encode`]'s own preference semantics.
pub fn generate_qr_image(
    data: &str,
    preferences: &[(Version, CodeEcc)],
    options: &EncodeOptions,
    scale: u32,
) -> Result<Vec<u8>, QrPngError> {
    let qr = encode(data, preferences, options)?;

    let size = qr.size;
    let png = ImageBuffer::from_fn(size as u32, size as u32, |x, y| {
        if qr.get_module(x as i32, y as i32) {
            image::Luma([0u8])
        } else {
            image::Luma([255u8])
        }
    });
    let resized = resize(
        &png,
        size as u32 * scale,
        size as u32 * scale,
        image::imageops::FilterType::Nearest,
    );

    let mut w = Cursor::new(Vec::new());
    DynamicImage::ImageLuma8(resized).write_to(&mut w, ImageFormat::Png)?;
    Ok(w.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_a_png_with_the_requested_scale() {
        let preferences = [(Version::new(5), CodeEcc::Medium)];
        let options = EncodeOptions {
            pattern: Some(qr_core::Mask::new(2)),
            ..EncodeOptions::default()
        };
        let png = generate_qr_image("hello, world!", &preferences, &options, 8).unwrap();
        assert_eq!(&png[1..4], b"PNG");
    }

    #[test]
    fn propagates_capacity_errors() {
        let preferences = [(Version::new(1), CodeEcc::Low)];
        let huge = "9".repeat(8000);
        let err = generate_qr_image(&huge, &preferences, &EncodeOptions::default(), 8).unwrap_err();
        assert!(matches!(err, QrPngError::QrError(_)));
    }
}
