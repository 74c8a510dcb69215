//! WASM-compatible wrapper types for image data.
//!
//! This module provides JavaScript-friendly types that wrap the core Cropframe types,
//! handling the conversion between Rust and JavaScript data representations.

use cropframe_core::decode::SourceImage;
use cropframe_core::EngineConfig;
use wasm_bindgen::prelude::*;

use crate::to_js_error;

/// A source image wrapper for JavaScript.
///
/// Holds RGBA pixels (4 bytes per pixel, row-major), the layout
/// `ImageData.data` uses, so a canvas readback can be passed straight in.
///
/// # Memory Management
///
/// The pixel data is stored in WASM memory. When you call `pixels()`, a copy is made
/// to JavaScript memory as a `Uint8Array`. Call `free()` to release a large image
/// early; otherwise wasm-bindgen's finalizer handles cleanup.
#[wasm_bindgen]
pub struct JsSourceImage {
    inner: SourceImage,
}

#[wasm_bindgen]
impl JsSourceImage {
    /// Create a source image from RGBA pixel data.
    ///
    /// # Errors
    ///
    /// Returns an error if `pixels.length != width * height * 4`.
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<JsSourceImage, JsValue> {
        SourceImage::new(width, height, pixels)
            .map(Self::from_source)
            .map_err(to_js_error)
    }

    /// Create a source image from RGB pixel data (3 bytes per pixel), filling alpha with 255.
    pub fn from_rgb(width: u32, height: u32, pixels: &[u8]) -> Result<JsSourceImage, JsValue> {
        SourceImage::from_rgb(width, height, pixels)
            .map(Self::from_source)
            .map_err(to_js_error)
    }

    /// Get the image width in pixels
    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.inner.width
    }

    /// Get the image height in pixels
    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.inner.height
    }

    /// Get the number of bytes in the pixel buffer (width * height * 4)
    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.inner.pixels.len()
    }

    /// Returns RGBA pixel data as Uint8Array (copied).
    pub fn pixels(&self) -> Vec<u8> {
        self.inner.pixels.clone()
    }

    /// Explicitly free WASM memory.
    pub fn free(self) {}
}

impl JsSourceImage {
    pub(crate) fn from_source(inner: SourceImage) -> Self {
        Self { inner }
    }

    pub(crate) fn as_source(&self) -> &SourceImage {
        &self.inner
    }
}

/// Read an optional engine config object from JavaScript.
///
/// `undefined` and `null` yield the defaults; partial objects fill in the
/// missing fields. The result is always sanitized.
pub(crate) fn config_from_js(value: JsValue) -> Result<EngineConfig, JsValue> {
    if value.is_undefined() || value.is_null() {
        return Ok(EngineConfig::default());
    }
    let config: EngineConfig = serde_wasm_bindgen::from_value(value).map_err(to_js_error)?;
    Ok(config.sanitized())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_js_source_image_creation() {
        let source = SourceImage::new(100, 50, vec![0u8; 100 * 50 * 4]).unwrap();
        let img = JsSourceImage::from_source(source);
        assert_eq!(img.width(), 100);
        assert_eq!(img.height(), 50);
        assert_eq!(img.byte_length(), 20000);
    }

    #[test]
    fn test_js_source_image_pixels() {
        let pixels = vec![255u8, 128, 64, 255, 32, 16, 8, 0];
        let img = JsSourceImage::from_source(SourceImage::new(2, 1, pixels.clone()).unwrap());
        assert_eq!(img.pixels(), pixels);
        assert_eq!(img.as_source().pixel(1, 0), [32, 16, 8, 0]);
    }

    #[test]
    fn test_from_rgb_fills_alpha() {
        let img = JsSourceImage::from_source(SourceImage::from_rgb(1, 1, &[1, 2, 3]).unwrap());
        assert_eq!(img.pixels(), vec![1, 2, 3, 255]);
    }
}
