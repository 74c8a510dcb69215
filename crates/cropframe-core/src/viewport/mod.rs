//! Viewport transform: zoom and pan state for an image shown inside a
//! bounded container.
//!
//! The transform is a plain value. The functions in this module take a
//! transform plus the container and source sizes and return a corrected
//! transform; [`TransformController`] drives them from interaction events.
//!
//! # Coordinate System
//!
//! - The image is first fitted inside the container, preserving aspect ratio
//!   ("fit" display size, scale 1.0)
//! - `scale` multiplies the fit display size
//! - `translate_x/y` are in unscaled display units, so the on-screen offset is
//!   `translate * scale`
//! - Translate (0, 0) keeps the image centered
//!
//! # Clamping
//!
//! For scale `s` and fit size `(dw, dh)` inside container `(cw, ch)`:
//! ```text
//! max_x = max(0, (dw*s - cw) / 2) / s
//! max_y = max(0, (dh*s - ch) / 2) / s
//! ```
//! Translate is clamped into `[-max_x, max_x] x [-max_y, max_y]`, which keeps
//! the scaled image covering the container on every axis where it overhangs.

mod controller;

pub use controller::{InteractionEvent, PanGesture, PanState, TransformController};

use serde::{Deserialize, Serialize};

use crate::config::ZoomConfig;
use crate::geometry::Size;

/// Scale at which the image exactly fits the container.
pub const FIT_SCALE: f64 = 1.0;

/// Current zoom and pan of the displayed image.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewportTransform {
    pub scale: f64,
    pub translate_x: f64,
    pub translate_y: f64,
}

impl Default for ViewportTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl ViewportTransform {
    /// Scale 1, no translation.
    pub const IDENTITY: Self = Self {
        scale: FIT_SCALE,
        translate_x: 0.0,
        translate_y: 0.0,
    };

    pub fn new(scale: f64, translate_x: f64, translate_y: f64) -> Self {
        Self {
            scale,
            translate_x,
            translate_y,
        }
    }

    /// Check if this is the identity transform
    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }
}

/// Size of the element the image is displayed in, in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ContainerSize {
    pub width: f64,
    pub height: f64,
}

impl ContainerSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Intrinsic pixel dimensions of the image being viewed.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceImageSize {
    pub natural_width: f64,
    pub natural_height: f64,
}

impl SourceImageSize {
    pub fn new(natural_width: f64, natural_height: f64) -> Self {
        Self {
            natural_width,
            natural_height,
        }
    }
}

/// Largest allowed absolute translation per axis.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TranslateBounds {
    pub max_x: f64,
    pub max_y: f64,
}

#[inline]
fn is_positive(v: f64) -> bool {
    v.is_finite() && v > 0.0
}

/// Zero and non-finite scales divide as 1.
#[inline]
fn effective_scale(scale: f64) -> f64 {
    if is_positive(scale) {
        scale
    } else {
        FIT_SCALE
    }
}

/// Compute the aspect-preserving size of the source fitted inside the
/// container (the display size at scale 1).
///
/// Returns a zero size when either input has a zero or non-finite dimension.
pub fn fit_display_size(container: ContainerSize, source: SourceImageSize) -> Size {
    if !is_positive(container.width)
        || !is_positive(container.height)
        || !is_positive(source.natural_width)
        || !is_positive(source.natural_height)
    {
        return Size::default();
    }

    let aspect = source.natural_width / source.natural_height;

    let mut width = container.width;
    let mut height = width / aspect;
    if height > container.height {
        height = container.height;
        width = height * aspect;
    }

    Size { width, height }
}

/// Compute how far the image may be translated at `scale` before it would
/// uncover container area.
pub fn max_translate(
    scale: f64,
    container: ContainerSize,
    source: SourceImageSize,
) -> TranslateBounds {
    let display = fit_display_size(container, source);
    let scale = effective_scale(scale);

    let limit = |display_len: f64, container_len: f64| {
        let overhang = ((display_len * scale - container_len) / 2.0).max(0.0) / scale;
        if overhang.is_finite() {
            overhang
        } else {
            0.0
        }
    };

    TranslateBounds {
        max_x: limit(display.width, container.width),
        max_y: limit(display.height, container.height),
    }
}

/// Clamp only the translation of `transform` for its current scale.
///
/// Non-finite translate components are reset to 0.
pub fn clamp_translate(
    transform: ViewportTransform,
    container: ContainerSize,
    source: SourceImageSize,
) -> ViewportTransform {
    let bounds = max_translate(transform.scale, container, source);

    let clamp_axis = |value: f64, max: f64| {
        if value.is_finite() {
            value.clamp(-max, max)
        } else {
            0.0
        }
    };

    ViewportTransform {
        scale: transform.scale,
        translate_x: clamp_axis(transform.translate_x, bounds.max_x),
        translate_y: clamp_axis(transform.translate_y, bounds.max_y),
    }
}

/// Clamp both the scale (into the configured range) and the translation.
///
/// A non-finite scale falls back to the configured minimum.
pub fn clamp_transform(
    transform: ViewportTransform,
    container: ContainerSize,
    source: SourceImageSize,
    zoom: &ZoomConfig,
) -> ViewportTransform {
    let scale = if transform.scale.is_finite() {
        transform.scale.clamp(zoom.min_scale, zoom.max_scale)
    } else {
        zoom.min_scale
    };

    clamp_translate(
        ViewportTransform { scale, ..transform },
        container,
        source,
    )
}


// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn container_strategy() -> impl Strategy<Value = ContainerSize> {
        (1.0f64..4000.0, 1.0f64..4000.0).prop_map(|(w, h)| ContainerSize::new(w, h))
    }

    fn source_strategy() -> impl Strategy<Value = SourceImageSize> {
        (1.0f64..10_000.0, 1.0f64..10_000.0).prop_map(|(w, h)| SourceImageSize::new(w, h))
    }

    proptest! {
        /// Property: the fit size never exceeds the container and keeps aspect ratio.
        #[test]
        fn prop_fit_inside_container(
            container in container_strategy(),
            source in source_strategy(),
        ) {
            let fit = fit_display_size(container, source);
            prop_assert!(fit.width <= container.width * (1.0 + 1e-12));
            prop_assert!(fit.height <= container.height * (1.0 + 1e-12));

            let aspect = source.natural_width / source.natural_height;
            let fit_aspect = fit.width / fit.height;
            prop_assert!((aspect - fit_aspect).abs() <= 1e-9 * aspect.max(1.0));
        }

        /// Property: clamped translation keeps the image covering the container.
        #[test]
        fn prop_clamped_image_covers_container(
            container in container_strategy(),
            source in source_strategy(),
            scale in 1.0f64..10.0,
            tx in -1.0e5f64..1.0e5,
            ty in -1.0e5f64..1.0e5,
        ) {
            let t = clamp_translate(ViewportTransform::new(scale, tx, ty), container, source);
            let fit = fit_display_size(container, source);

            // On-screen image edges relative to container center
            let half_w = fit.width * scale / 2.0;
            let offset_x = t.translate_x * scale;
            if fit.width * scale >= container.width {
                prop_assert!(offset_x - half_w <= -container.width / 2.0 + 1e-6);
                prop_assert!(offset_x + half_w >= container.width / 2.0 - 1e-6);
            } else {
                prop_assert_eq!(t.translate_x, 0.0);
            }

            let half_h = fit.height * scale / 2.0;
            let offset_y = t.translate_y * scale;
            if fit.height * scale >= container.height {
                prop_assert!(offset_y - half_h <= -container.height / 2.0 + 1e-6);
                prop_assert!(offset_y + half_h >= container.height / 2.0 - 1e-6);
            } else {
                prop_assert_eq!(t.translate_y, 0.0);
            }
        }

        /// Property: clamping is idempotent.
        #[test]
        fn prop_clamp_idempotent(
            container in container_strategy(),
            source in source_strategy(),
            scale in -5.0f64..50.0,
            tx in -1.0e4f64..1.0e4,
            ty in -1.0e4f64..1.0e4,
        ) {
            let zoom = ZoomConfig::default();
            let start = ViewportTransform::new(scale, tx, ty);
            let once = clamp_transform(start, container, source, &zoom);
            let twice = clamp_transform(once, container, source, &zoom);
            prop_assert_eq!(once, twice);
        }
    }
}
