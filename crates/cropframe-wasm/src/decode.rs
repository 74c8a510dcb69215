//! Image decoding WASM bindings.
//!
//! # Functions
//!
//! - [`decode_image`] - Decode PNG, JPEG, WebP, GIF or BMP bytes to RGBA
//! - [`image_orientation`] - Read the EXIF orientation tag (1-8)
//!
//! # Example
//!
//! ```typescript
//! import { decode_image } from '@cropframe/wasm';
//!
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! const image = decode_image(bytes);
//! console.log(`Decoded ${image.width}x${image.height}`);
//! ```

use cropframe_core::decode;
use wasm_bindgen::prelude::*;

use crate::to_js_error;
use crate::types::JsSourceImage;

/// Decode an encoded image from bytes.
///
/// EXIF orientation is applied, so `width`/`height` are the natural size the
/// viewer should use for its source dimensions.
///
/// # Errors
///
/// Returns an error if:
/// - The format is not recognized
/// - The data is corrupted or truncated
#[wasm_bindgen]
pub fn decode_image(bytes: &[u8]) -> Result<JsSourceImage, JsValue> {
    decode::decode_image(bytes)
        .map(JsSourceImage::from_source)
        .map_err(to_js_error)
}

/// Read the EXIF orientation of an encoded image.
///
/// Returns 1 (normal) when there is no EXIF data.
#[wasm_bindgen]
pub fn image_orientation(bytes: &[u8]) -> u8 {
    decode::get_orientation(bytes) as u8
}


#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use cropframe_core::encode::encode_png;
    use wasm_bindgen_test::*;

    #[wasm_bindgen_test]
    fn test_decode_image_invalid() {
        assert!(decode_image(&[0, 1, 2, 3]).is_err());
    }

    #[wasm_bindgen_test]
    fn test_decode_image_empty() {
        assert!(decode_image(&[]).is_err());
    }

    #[wasm_bindgen_test]
    fn test_decode_image_png() {
        let bytes = encode_png(&[10, 20, 30, 255].repeat(6), 3, 2).unwrap();
        let img = decode_image(&bytes).unwrap();
        assert_eq!((img.width(), img.height()), (3, 2));
    }
}
