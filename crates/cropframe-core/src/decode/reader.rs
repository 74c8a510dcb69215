//! Source image decoding with EXIF orientation handling.

use std::io::Cursor;

use exif::{In, Reader, Tag};
use image::{DynamicImage, ImageError, ImageReader};
use log::debug;

use super::{DecodeError, Orientation, SourceImage};

/// Decode an encoded image (PNG, JPEG, WebP, GIF, BMP) into RGBA pixels,
/// applying EXIF orientation correction.
///
/// The returned image's dimensions are its natural size as displayed.
///
/// # Errors
///
/// Returns `DecodeError::InvalidFormat` if the format can't be identified.
/// Returns `DecodeError::CorruptedFile` if the data fails to decode.
pub fn decode_image(bytes: &[u8]) -> Result<SourceImage, DecodeError> {
    let orientation = get_orientation(bytes);
    let img = decode_dynamic(bytes)?;

    if orientation != Orientation::Normal {
        debug!("decode: applying EXIF orientation {:?}", orientation);
    }

    let oriented = apply_orientation(img, orientation);
    Ok(SourceImage::from_rgba_image(oriented.into_rgba8()))
}

fn decode_dynamic(bytes: &[u8]) -> Result<DynamicImage, DecodeError> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    if reader.format().is_none() {
        return Err(DecodeError::InvalidFormat);
    }

    reader.decode().map_err(|e| match e {
        ImageError::Unsupported(_) => DecodeError::InvalidFormat,
        other => DecodeError::CorruptedFile(other.to_string()),
    })
}

/// Read the EXIF orientation from an encoded image.
///
/// Returns `Orientation::Normal` if no EXIF data is found or orientation
/// cannot be determined.
pub fn get_orientation(bytes: &[u8]) -> Orientation {
    let mut cursor = Cursor::new(bytes);

    match Reader::new().read_from_container(&mut cursor) {
        Ok(exif) => exif
            .get_field(Tag::Orientation, In::PRIMARY)
            .and_then(|field| field.value.get_uint(0))
            .map(Orientation::from)
            .unwrap_or_default(),
        Err(_) => Orientation::Normal,
    }
}

/// Apply EXIF orientation transformation to an image.
fn apply_orientation(img: DynamicImage, orientation: Orientation) -> DynamicImage {
    match orientation {
        Orientation::Normal => img,
        Orientation::FlipHorizontal => img.fliph(),
        Orientation::Rotate180 => img.rotate180(),
        Orientation::FlipVertical => img.flipv(),
        Orientation::Transpose => img.rotate90().fliph(),
        Orientation::Rotate90CW => img.rotate90(),
        Orientation::Transverse => img.rotate270().fliph(),
        Orientation::Rotate270CW => img.rotate270(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::codecs::png::PngEncoder;
    use image::{ExtendedColorType, ImageEncoder, Rgba, RgbaImage};

    /// Encode a small RGBA gradient as PNG bytes.
    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = RgbaImage::from_fn(width, height, |x, y| {
            Rgba([(x * 40) as u8, (y * 40) as u8, 7, 200])
        });
        let mut buffer = Cursor::new(Vec::new());
        PngEncoder::new(&mut buffer)
            .write_image(img.as_raw(), width, height, ExtendedColorType::Rgba8)
            .unwrap();
        buffer.into_inner()
    }

    #[test]
    fn test_decode_png_keeps_alpha() {
        let img = decode_image(&png_bytes(4, 3)).unwrap();
        assert_eq!(img.width, 4);
        assert_eq!(img.height, 3);
        assert_eq!(img.pixels.len(), 4 * 3 * 4);
        assert_eq!(img.pixel(2, 1), [80, 40, 7, 200]);
    }

    #[test]
    fn test_decode_invalid_bytes() {
        let result = decode_image(&[0x00, 0x01, 0x02, 0x03]);
        assert!(matches!(result, Err(DecodeError::InvalidFormat)));
    }

    #[test]
    fn test_decode_truncated_png() {
        let bytes = png_bytes(8, 8);
        let result = decode_image(&bytes[..bytes.len() / 2]);
        assert!(matches!(result, Err(DecodeError::CorruptedFile(_))));
    }

    #[test]
    fn test_orientation_defaults_without_exif() {
        assert_eq!(get_orientation(&png_bytes(2, 2)), Orientation::Normal);
        assert_eq!(get_orientation(&[]), Orientation::Normal);
    }

    #[test]
    fn test_apply_orientation_swaps_dimensions() {
        let img = DynamicImage::ImageRgba8(RgbaImage::new(6, 2));
        for orientation in [
            Orientation::Transpose,
            Orientation::Rotate90CW,
            Orientation::Transverse,
            Orientation::Rotate270CW,
        ] {
            let out = apply_orientation(img.clone(), orientation);
            assert_eq!((out.width(), out.height()), (2, 6), "{:?}", orientation);
        }

        let out = apply_orientation(img, Orientation::Rotate180);
        assert_eq!((out.width(), out.height()), (6, 2));
    }

    #[test]
    fn test_apply_orientation_rotate90_moves_corner() {
        let mut src = RgbaImage::new(2, 1);
        src.put_pixel(0, 0, Rgba([255, 0, 0, 255]));
        let out =
            apply_orientation(DynamicImage::ImageRgba8(src), Orientation::Rotate90CW).into_rgba8();
        // Left pixel of a 2x1 row ends up on top after a clockwise quarter turn
        assert_eq!(out.get_pixel(0, 0), &Rgba([255, 0, 0, 255]));
        assert_eq!(out.get_pixel(0, 1), &Rgba([0, 0, 0, 0]));
    }
}
