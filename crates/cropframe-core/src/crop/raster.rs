//! CPU rasterizer for rotated crops.
//!
//! # Algorithm
//!
//! The output surface is the crop's rotated bounding box, rounded up. The
//! crop is drawn centered on the surface and rotated about its center, the
//! same result as translating a 2D canvas to its center, rotating, and
//! drawing the sub-rectangle at `(-w/2, -h/2)`.
//!
//! Rendering uses inverse mapping: for each destination pixel center we find
//! the crop-local point that lands there. With y pointing down and a
//! positive angle rotating clockwise on screen, the inverse transform is:
//! ```text
//! local_x =  dx * cos θ + dy * sin θ + w / 2
//! local_y = -dx * sin θ + dy * cos θ + h / 2
//! ```
//! where `(dx, dy)` is the pixel center relative to the surface center.
//!
//! Color is sampled at the pixel center, clamped into the crop. Alpha is
//! scaled by the fraction of an 8x8 grid of points inside the pixel that
//! map into the crop. Pixels whose four corners all map inside the crop
//! skip the grid and keep full alpha.

use image::RgbaImage;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use super::{CropError, CropInputError, CropRegion, OutputImage, Rasterizer};
use crate::config::CropConfig;
use crate::decode::{SourceImage, RGBA_CHANNELS};
use crate::encode::{encode_rgba, OutputFormat};
use crate::geometry::{canvas_dimensions, rotated_bounding_box, RotationAngle};

/// Resampling filter for rotated crops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum InterpolationFilter {
    /// Nearest source pixel, hard edges.
    Nearest,
    /// Four-tap bilinear in premultiplied alpha, what a smoothed canvas draw does.
    #[default]
    Bilinear,
}

/// Software (CPU pixel buffer) implementation of [`Rasterizer`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SoftwareRasterizer {
    config: CropConfig,
}

impl SoftwareRasterizer {
    pub fn new(config: CropConfig) -> Self {
        Self {
            config: config.sanitized(),
        }
    }

    pub fn config(&self) -> &CropConfig {
        &self.config
    }

    /// Render the rotated crop to an RGBA surface without encoding it.
    pub fn render(
        &self,
        source: &SourceImage,
        region: CropRegion,
        rotation: RotationAngle,
    ) -> Result<RgbaImage, CropError> {
        validate_source(source)?;
        if let Err(e) = region.validate(source.width, source.height) {
            warn!("crop rejected: {e}");
            return Err(e.into());
        }

        let bounds = rotated_bounding_box(
            region.width as f64,
            region.height as f64,
            rotation.degrees(),
        );
        let (width, height) = canvas_dimensions(bounds);

        let mut surface = allocate_surface(width, height, self.config.max_canvas_pixels)?;
        draw_rotated(source, region, rotation, self.config.filter, &mut surface, width, height);

        RgbaImage::from_raw(width, height, surface).ok_or_else(|| {
            CropError::Rasterization(format!("surface buffer does not match {width}x{height}"))
        })
    }
}

impl Rasterizer for SoftwareRasterizer {
    fn rasterize(
        &self,
        source: &SourceImage,
        region: CropRegion,
        rotation: RotationAngle,
    ) -> Result<OutputImage, CropError> {
        let surface = self.render(source, region, rotation)?;
        let (width, height) = surface.dimensions();

        let format: OutputFormat = self.config.format;
        let bytes = encode_rgba(surface.as_raw(), width, height, format)?;

        debug!(
            "crop: {} rotated {:.2}° -> {}x{} {} ({} bytes)",
            region,
            rotation.degrees(),
            width,
            height,
            format.mime_type(),
            bytes.len()
        );

        Ok(OutputImage::new(bytes, format.mime_type(), width, height))
    }
}

fn validate_source(source: &SourceImage) -> Result<(), CropInputError> {
    let expected = (source.width as usize)
        .checked_mul(source.height as usize)
        .and_then(|n| n.checked_mul(RGBA_CHANNELS))
        .unwrap_or(usize::MAX);

    if source.pixels.len() != expected {
        return Err(CropInputError::InvalidSource {
            expected,
            actual: source.pixels.len(),
        });
    }
    Ok(())
}

/// Allocate a zeroed (fully transparent) RGBA surface.
fn allocate_surface(width: u32, height: u32, max_pixels: u64) -> Result<Vec<u8>, CropError> {
    let pixel_count = width as u64 * height as u64;
    if pixel_count > max_pixels {
        return Err(CropError::Rasterization(format!(
            "surface {width}x{height} exceeds the {max_pixels} pixel limit"
        )));
    }

    let len = usize::try_from(pixel_count)
        .ok()
        .and_then(|n| n.checked_mul(RGBA_CHANNELS))
        .ok_or_else(|| {
            CropError::Rasterization(format!("surface {width}x{height} is too large to address"))
        })?;

    let mut surface = Vec::new();
    surface.try_reserve_exact(len).map_err(|e| {
        CropError::Rasterization(format!("could not allocate {width}x{height} surface: {e}"))
    })?;
    surface.resize(len, 0);
    Ok(surface)
}

/// Subsample points per axis when estimating edge coverage.
const COVERAGE_GRID: u32 = 8;
const FULL_COVERAGE: u32 = COVERAGE_GRID * COVERAGE_GRID;

/// Slack for the corner test, so float noise at quarter turns stays inside.
const CORNER_EPSILON: f64 = 1e-9;

/// Inverse map from surface coordinates to crop-local coordinates.
struct InverseMap {
    sin: f64,
    cos: f64,
    half_surface_w: f64,
    half_surface_h: f64,
    crop_w: f64,
    crop_h: f64,
}

impl InverseMap {
    fn new(rotation: RotationAngle, region: CropRegion, width: u32, height: u32) -> Self {
        let (sin, cos) = rotation.radians().sin_cos();
        Self {
            sin,
            cos,
            half_surface_w: width as f64 / 2.0,
            half_surface_h: height as f64 / 2.0,
            crop_w: region.width as f64,
            crop_h: region.height as f64,
        }
    }

    fn local(&self, x: f64, y: f64) -> (f64, f64) {
        let dx = x - self.half_surface_w;
        let dy = y - self.half_surface_h;
        (
            dx * self.cos + dy * self.sin + self.crop_w / 2.0,
            -dx * self.sin + dy * self.cos + self.crop_h / 2.0,
        )
    }

    fn contains(&self, (x, y): (f64, f64)) -> bool {
        x >= 0.0 && y >= 0.0 && x < self.crop_w && y < self.crop_h
    }

    fn contains_closed(&self, (x, y): (f64, f64)) -> bool {
        let e = CORNER_EPSILON;
        x >= -e && y >= -e && x <= self.crop_w + e && y <= self.crop_h + e
    }

    /// Number of grid points in pixel `(px, py)` that land inside the crop,
    /// out of [`FULL_COVERAGE`].
    fn coverage(&self, px: u32, py: u32) -> u32 {
        let x0 = px as f64;
        let y0 = py as f64;

        // The crop is convex, so four covered corners cover the whole pixel
        let corners = [(x0, y0), (x0 + 1.0, y0), (x0, y0 + 1.0), (x0 + 1.0, y0 + 1.0)];
        if corners.iter().all(|&(x, y)| self.contains_closed(self.local(x, y))) {
            return FULL_COVERAGE;
        }

        let step = 1.0 / COVERAGE_GRID as f64;
        let mut inside = 0;
        for sy in 0..COVERAGE_GRID {
            let y = y0 + (sy as f64 + 0.5) * step;
            for sx in 0..COVERAGE_GRID {
                let x = x0 + (sx as f64 + 0.5) * step;
                if self.contains(self.local(x, y)) {
                    inside += 1;
                }
            }
        }
        inside
    }
}

fn draw_rotated(
    source: &SourceImage,
    region: CropRegion,
    rotation: RotationAngle,
    filter: InterpolationFilter,
    surface: &mut [u8],
    width: u32,
    height: u32,
) {
    let map = InverseMap::new(rotation, region, width, height);

    for dst_y in 0..height {
        for dst_x in 0..width {
            let coverage = map.coverage(dst_x, dst_y);
            if coverage == 0 {
                continue;
            }

            // Samplers clamp, so centers just outside an edge take the edge color
            let (local_x, local_y) = map.local(dst_x as f64 + 0.5, dst_y as f64 + 0.5);
            let mut pixel = match filter {
                InterpolationFilter::Nearest => sample_nearest(source, region, local_x, local_y),
                InterpolationFilter::Bilinear => sample_bilinear(source, region, local_x, local_y),
            };
            if coverage < FULL_COVERAGE {
                pixel[3] = scale_alpha(pixel[3], coverage);
            }

            let idx = (dst_y as usize * width as usize + dst_x as usize) * RGBA_CHANNELS;
            surface[idx..idx + RGBA_CHANNELS].copy_from_slice(&pixel);
        }
    }
}

fn scale_alpha(alpha: u8, coverage: u32) -> u8 {
    ((alpha as u32 * coverage + FULL_COVERAGE / 2) / FULL_COVERAGE) as u8
}

/// Sample the source pixel containing crop-local point `(x, y)`.
fn sample_nearest(source: &SourceImage, region: CropRegion, x: f64, y: f64) -> [u8; 4] {
    let px = (x.floor() as u32).min(region.width - 1);
    let py = (y.floor() as u32).min(region.height - 1);
    source.pixel(region.x + px, region.y + py)
}

/// Sample a pixel using bilinear interpolation.
///
/// Taps are clamped to the crop region so pixels outside it never bleed in.
/// Color is weighted by alpha (premultiplied) so transparent source pixels
/// don't darken their neighbors.
fn sample_bilinear(source: &SourceImage, region: CropRegion, x: f64, y: f64) -> [u8; 4] {
    let max_x = (region.width - 1) as f64;
    let max_y = (region.height - 1) as f64;

    // Pixel centers sit at +0.5
    let fx = (x - 0.5).clamp(0.0, max_x);
    let fy = (y - 0.5).clamp(0.0, max_y);

    let x0 = fx.floor() as u32;
    let y0 = fy.floor() as u32;
    let x1 = (x0 + 1).min(region.width - 1);
    let y1 = (y0 + 1).min(region.height - 1);

    let tx = fx - x0 as f64;
    let ty = fy - y0 as f64;

    let taps = [
        (x0, y0, (1.0 - tx) * (1.0 - ty)),
        (x1, y0, tx * (1.0 - ty)),
        (x0, y1, (1.0 - tx) * ty),
        (x1, y1, tx * ty),
    ];

    let mut acc = [0.0f64; 4];
    for (px, py, weight) in taps {
        if weight == 0.0 {
            continue;
        }
        let p = source.pixel(region.x + px, region.y + py);
        let a = p[3] as f64 * weight;
        acc[0] += p[0] as f64 * a;
        acc[1] += p[1] as f64 * a;
        acc[2] += p[2] as f64 * a;
        acc[3] += a;
    }

    if acc[3] <= 0.0 {
        return [0, 0, 0, 0];
    }

    let channel = |v: f64| (v / acc[3]).clamp(0.0, 255.0).round() as u8;
    [
        channel(acc[0]),
        channel(acc[1]),
        channel(acc[2]),
        acc[3].clamp(0.0, 255.0).round() as u8,
    ]
}


// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn image_and_region() -> impl Strategy<Value = (SourceImage, CropRegion)> {
        (1u32..=24, 1u32..=24)
            .prop_flat_map(|(w, h)| (Just(w), Just(h), 0..w, 0..h))
            .prop_flat_map(|(w, h, x, y)| {
                (Just(w), Just(h), Just(x), Just(y), 1..=w - x, 1..=h - y)
            })
            .prop_map(|(w, h, x, y, rw, rh)| {
                let pixels = (0..w * h)
                    .flat_map(|i| [(i * 5) as u8, (i * 11) as u8, (i * 17) as u8, 255])
                    .collect();
                (
                    SourceImage::new(w, h, pixels).unwrap(),
                    CropRegion::new(x, y, rw, rh),
                )
            })
    }

    proptest! {
        /// Property: output surface size is the rounded-up rotated bounding box.
        #[test]
        fn prop_surface_matches_bbox(
            (src, region) in image_and_region(),
            angle in 0.0f64..360.0,
        ) {
            let rotation = RotationAngle::new(angle);
            let surface = SoftwareRasterizer::default().render(&src, region, rotation).unwrap();
            let expected = canvas_dimensions(rotated_bounding_box(
                region.width as f64,
                region.height as f64,
                rotation.degrees(),
            ));
            prop_assert_eq!(surface.dimensions(), expected);
        }

        /// Property: zero rotation reproduces the region pixel-for-pixel.
        #[test]
        fn prop_zero_rotation_exact((src, region) in image_and_region()) {
            let surface = SoftwareRasterizer::default()
                .render(&src, region, RotationAngle::new(0.0))
                .unwrap();
            for y in 0..region.height {
                for x in 0..region.width {
                    let expected = src.pixel(region.x + x, region.y + y);
                    prop_assert_eq!(surface.get_pixel(x, y).0, expected);
                }
            }
        }

        /// Property: touched pixels never exceed the crop's own area by more
        /// than a band around its perimeter.
        #[test]
        fn prop_coverage_bounded(
            (src, region) in image_and_region(),
            angle in 0.0f64..360.0,
        ) {
            let surface = SoftwareRasterizer::default()
                .render(&src, region, RotationAngle::new(angle))
                .unwrap();
            let covered = surface.pixels().filter(|p| p.0[3] > 0).count() as u64;
            let area = region.width as u64 * region.height as u64;
            let perimeter = 2 * (region.width as u64 + region.height as u64);
            prop_assert!(covered <= area + 2 * perimeter + 8, "covered {} area {}", covered, area);
        }

        /// Property: summed alpha of an opaque crop tracks its area at any angle.
        #[test]
        fn prop_total_alpha_tracks_area(
            (src, region) in image_and_region(),
            angle in 0.0f64..360.0,
        ) {
            let surface = SoftwareRasterizer::default()
                .render(&src, region, RotationAngle::new(angle))
                .unwrap();
            let total: f64 = surface.pixels().map(|p| p.0[3] as f64).sum::<f64>() / 255.0;
            let area = region.width as f64 * region.height as f64;
            let perimeter = 2.0 * (region.width as f64 + region.height as f64);
            prop_assert!(
                (total - area).abs() <= perimeter / 4.0 + 1.0,
                "total {} area {}", total, area
            );
        }
    }
}
