//! Source image decoding.
//!
//! This module provides functionality for:
//! - Decoding encoded images (PNG, JPEG, WebP, GIF, BMP) to RGBA pixels
//! - Correcting EXIF orientation so natural dimensions match what is shown
//! - Wrapping host-provided pixel buffers as a [`SourceImage`]
//!
//! # Examples
//!
//! ```ignore
//! use cropframe_core::decode::decode_image;
//!
//! let bytes = std::fs::read("photo.png").unwrap();
//! let image = decode_image(&bytes).unwrap();
//! println!("Decoded {}x{} image", image.width, image.height);
//! ```

mod reader;
mod types;

pub use reader::{decode_image, get_orientation};
pub use types::{DecodeError, Orientation, SourceImage, RGBA_CHANNELS};
