//! Cropframe Core - viewport transform and crop geometry engine
//!
//! This crate keeps a zoomed and panned image display numerically
//! consistent inside a bounded container, and extracts rotated crops from a
//! source image into encoded output.
//!
//! - [`geometry`]: degree/radian conversion and rotated bounding boxes
//! - [`viewport`]: the clamped [`ViewportTransform`] and its event-driven
//!   [`TransformController`]
//! - [`crop`]: crop regions, the [`Rasterizer`] capability and the
//!   single-flight [`CropGate`]
//! - [`decode`] / [`encode`]: source image loading and output encoding

pub mod config;
pub mod crop;
pub mod decode;
pub mod encode;
pub mod geometry;
pub mod viewport;

pub use config::{CropConfig, EngineConfig, ZoomConfig};
pub use crop::{
    crop_image, CropError, CropGate, CropInputError, CropRegion, CropRequest, InterpolationFilter,
    OutputImage, Rasterizer, SoftwareRasterizer,
};
pub use decode::{decode_image, DecodeError, SourceImage};
pub use encode::{EncodeError, OutputFormat};
pub use geometry::{rotated_bounding_box, to_radians, RotationAngle, Size};
pub use viewport::{
    clamp_transform, ContainerSize, InteractionEvent, PanState, SourceImageSize,
    TransformController, ViewportTransform,
};
