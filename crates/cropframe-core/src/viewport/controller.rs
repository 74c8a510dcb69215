//! Event-driven transform controller.
//!
//! The controller owns one [`ViewportTransform`] and keeps it clamped after
//! every operation. Dragging is an explicit two-state machine:
//!
//! ```text
//! Idle --pointer_down (scale > 1)--> Panning
//! Panning --pointer_move--> Panning
//! Panning --pointer_up | pointer_leave--> Idle
//! ```
//!
//! Nothing here returns an error. Invalid requests are corrected to the
//! nearest valid state so the transform is always renderable.

use log::debug;
use serde::{Deserialize, Serialize};

use super::{clamp_transform, ContainerSize, SourceImageSize, ViewportTransform, FIT_SCALE};
use crate::config::ZoomConfig;
use crate::geometry::Point;

/// A discrete input event in container-local coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum InteractionEvent {
    /// Wheel scrolled; negative `delta_y` zooms in
    #[serde(rename_all = "camelCase")]
    Wheel { delta_y: f64 },
    PointerDown { x: f64, y: f64 },
    PointerMove { x: f64, y: f64 },
    PointerUp,
    PointerLeave,
}

/// Baseline captured when a drag starts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanGesture {
    /// Pointer position at pointer-down
    pub pointer_start: Point,
    /// Translation at pointer-down
    pub translate_at_start: Point,
}

/// Drag state.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum PanState {
    #[default]
    Idle,
    Panning(PanGesture),
}

/// Owns the live viewport transform for one open viewer.
#[derive(Debug, Clone)]
pub struct TransformController {
    config: ZoomConfig,
    container: ContainerSize,
    source: SourceImageSize,
    transform: ViewportTransform,
    pan: PanState,
}

impl TransformController {
    /// Create a controller with default zoom limits and the identity transform.
    pub fn new(container: ContainerSize, source: SourceImageSize) -> Self {
        Self::with_config(ZoomConfig::default(), container, source)
    }

    /// Create a controller with custom zoom limits.
    pub fn with_config(
        config: ZoomConfig,
        container: ContainerSize,
        source: SourceImageSize,
    ) -> Self {
        let config = config.sanitized();
        let transform = clamp_transform(ViewportTransform::IDENTITY, container, source, &config);
        Self {
            config,
            container,
            source,
            transform,
            pan: PanState::Idle,
        }
    }

    /// Current transform snapshot.
    pub fn transform(&self) -> ViewportTransform {
        self.transform
    }

    pub fn pan_state(&self) -> PanState {
        self.pan
    }

    pub fn is_panning(&self) -> bool {
        matches!(self.pan, PanState::Panning(_))
    }

    pub fn config(&self) -> &ZoomConfig {
        &self.config
    }

    pub fn container_size(&self) -> ContainerSize {
        self.container
    }

    pub fn source_size(&self) -> SourceImageSize {
        self.source
    }

    /// Replace the container size (e.g. after a window resize) and re-clamp.
    pub fn set_container_size(&mut self, container: ContainerSize) {
        self.container = container;
        self.reclamp();
    }

    /// Replace the source size (e.g. a new image was loaded) and re-clamp.
    pub fn set_source_size(&mut self, source: SourceImageSize) {
        self.source = source;
        self.reclamp();
    }

    /// Dispatch one interaction event and return the resulting transform.
    pub fn handle_event(&mut self, event: InteractionEvent) -> ViewportTransform {
        match event {
            InteractionEvent::Wheel { delta_y } => self.wheel_zoom(delta_y),
            InteractionEvent::PointerDown { x, y } => self.pointer_down(x, y),
            InteractionEvent::PointerMove { x, y } => self.pan_to(x, y),
            InteractionEvent::PointerUp => self.pointer_up(),
            InteractionEvent::PointerLeave => self.pointer_leave(),
        }
        self.transform
    }

    /// Set the scale, clamped to the configured range, then re-clamp the
    /// translation for the new scale. Non-finite requests are ignored.
    pub fn set_scale(&mut self, requested: f64) {
        if !requested.is_finite() {
            return;
        }
        self.transform.scale = requested;
        self.reclamp();
    }

    /// Zoom by one wheel notch. Negative deltas zoom in, positive zoom out,
    /// zero leaves the scale unchanged.
    pub fn wheel_zoom(&mut self, delta_sign: f64) {
        let factor = self.config.wheel_factor;
        if delta_sign < 0.0 {
            self.set_scale(self.transform.scale * factor);
        } else if delta_sign > 0.0 {
            self.set_scale(self.transform.scale / factor);
        }
    }

    pub fn zoom_in(&mut self) {
        self.set_scale(self.transform.scale * self.config.step_factor);
    }

    pub fn zoom_out(&mut self) {
        self.set_scale(self.transform.scale / self.config.step_factor);
    }

    /// Start a drag. Only takes effect when zoomed in past fit.
    pub fn pointer_down(&mut self, x: f64, y: f64) {
        if self.transform.scale <= FIT_SCALE || !x.is_finite() || !y.is_finite() {
            return;
        }

        self.pan = PanState::Panning(PanGesture {
            pointer_start: Point::new(x, y),
            translate_at_start: Point::new(self.transform.translate_x, self.transform.translate_y),
        });
        debug!("viewport: pan started at ({x:.1}, {y:.1})");
    }

    /// Move the drag to pointer position `(x, y)`. Ignored unless panning.
    ///
    /// The pointer delta is divided by the scale because translate is in
    /// unscaled display units.
    pub fn pan_to(&mut self, x: f64, y: f64) {
        let PanState::Panning(gesture) = self.pan else {
            return;
        };

        let scale = if self.transform.scale > 0.0 {
            self.transform.scale
        } else {
            FIT_SCALE
        };

        let dx = (x - gesture.pointer_start.x) / scale;
        let dy = (y - gesture.pointer_start.y) / scale;
        self.transform.translate_x = gesture.translate_at_start.x + dx;
        self.transform.translate_y = gesture.translate_at_start.y + dy;
        self.reclamp();
    }

    pub fn pointer_up(&mut self) {
        self.end_pan("pointer up");
    }

    pub fn pointer_leave(&mut self) {
        self.end_pan("pointer left container");
    }

    /// Return to scale 1 with no translation, ending any drag.
    pub fn reset(&mut self) {
        self.transform = ViewportTransform::IDENTITY;
        self.end_pan("reset");
    }

    fn end_pan(&mut self, reason: &str) {
        if self.is_panning() {
            debug!("viewport: pan ended ({reason})");
        }
        self.pan = PanState::Idle;
    }

    fn reclamp(&mut self) {
        self.transform = clamp_transform(self.transform, self.container, self.source, &self.config);
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================
