//! Cropframe WASM - WebAssembly bindings for Cropframe
//!
//! This crate exposes the cropframe-core viewport and crop engine to
//! JavaScript/TypeScript applications.
//!
//! # Module Structure
//!
//! - `types` - WASM-compatible wrapper types for image data
//! - `decode` - Source image decoding bindings
//! - `viewport` - Pan/zoom transform controller
//! - `crop` - Rotated crop extraction and bounding-box helpers
//!
//! # Usage
//!
//! ```typescript
//! import init, { decode_image, JsTransformController, JsCropper } from '@cropframe/wasm';
//!
//! await init();
//!
//! const image = decode_image(new Uint8Array(await file.arrayBuffer()));
//! const viewer = new JsTransformController(400, 400, image.width, image.height);
//! viewer.wheel(-1);
//!
//! const cropper = new JsCropper();
//! const output = cropper.crop(image, 0, 0, 100, 100, 45);
//! const blob = new Blob([output.bytes()], { type: output.mime_type });
//! ```

use wasm_bindgen::prelude::*;

mod crop;
mod decode;
mod types;
mod viewport;

pub use crop::{canvas_size, rotated_bounding_box, JsCropper, JsOutputImage};
pub use decode::{decode_image, image_orientation};
pub use types::JsSourceImage;
pub use viewport::JsTransformController;

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    // A second init (e.g. hot reload) finds the logger already installed
    let _ = console_log::init_with_level(log::Level::Debug);
    log::debug!("cropframe-wasm {} ready", version());
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Convert any displayable error into a JS string value.
pub(crate) fn to_js_error(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}
