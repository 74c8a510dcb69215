//! WASM bindings for the pan/zoom transform controller.
//!
//! The host forwards wheel and pointer events in container-local
//! coordinates and applies the returned transform to its image element:
//!
//! ```typescript
//! const viewer = new JsTransformController(
//!   rect.width, rect.height, img.naturalWidth, img.naturalHeight,
//! );
//!
//! el.onwheel = (e) => { viewer.wheel(e.deltaY); render(); };
//! el.onpointerdown = (e) => viewer.pointer_down(e.offsetX, e.offsetY);
//! el.onpointermove = (e) => { viewer.pointer_move(e.offsetX, e.offsetY); render(); };
//! el.onpointerup = () => viewer.pointer_up();
//! el.onpointerleave = () => viewer.pointer_leave();
//!
//! function render() {
//!   img.style.transform = viewer.css_transform();
//! }
//! ```

use cropframe_core::viewport::{ContainerSize, SourceImageSize, TransformController};
use wasm_bindgen::prelude::*;

use crate::to_js_error;
use crate::types::config_from_js;

/// Live viewport transform for one open viewer.
#[wasm_bindgen]
pub struct JsTransformController {
    inner: TransformController,
}

#[wasm_bindgen]
impl JsTransformController {
    /// Create a controller at scale 1 with no translation.
    #[wasm_bindgen(constructor)]
    pub fn new(
        container_width: f64,
        container_height: f64,
        natural_width: f64,
        natural_height: f64,
    ) -> JsTransformController {
        Self {
            inner: TransformController::new(
                ContainerSize::new(container_width, container_height),
                SourceImageSize::new(natural_width, natural_height),
            ),
        }
    }

    /// Create a controller with an engine config object (only `zoom` is used).
    ///
    /// # Errors
    ///
    /// Returns an error if `config` is not a valid config object.
    pub fn with_config(
        container_width: f64,
        container_height: f64,
        natural_width: f64,
        natural_height: f64,
        config: JsValue,
    ) -> Result<JsTransformController, JsValue> {
        let config = config_from_js(config)?;
        Ok(Self {
            inner: TransformController::with_config(
                config.zoom,
                ContainerSize::new(container_width, container_height),
                SourceImageSize::new(natural_width, natural_height),
            ),
        })
    }

    #[wasm_bindgen(getter)]
    pub fn scale(&self) -> f64 {
        self.inner.transform().scale
    }

    #[wasm_bindgen(getter)]
    pub fn translate_x(&self) -> f64 {
        self.inner.transform().translate_x
    }

    #[wasm_bindgen(getter)]
    pub fn translate_y(&self) -> f64 {
        self.inner.transform().translate_y
    }

    #[wasm_bindgen(getter)]
    pub fn is_panning(&self) -> bool {
        self.inner.is_panning()
    }

    /// Current transform as `{ scale, translateX, translateY }`.
    pub fn transform(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.inner.transform()).map_err(to_js_error)
    }

    /// CSS `transform` value for the image element.
    ///
    /// Translate is in unscaled units, so it goes after `scale()`.
    pub fn css_transform(&self) -> String {
        let t = self.inner.transform();
        format!(
            "scale({}) translate({}px, {}px)",
            t.scale, t.translate_x, t.translate_y
        )
    }

    /// Dispatch an event object, e.g. `{ type: "pointerMove", x: 10, y: 4 }`,
    /// and return the resulting transform.
    pub fn handle_event(&mut self, event: JsValue) -> Result<JsValue, JsValue> {
        let event = serde_wasm_bindgen::from_value(event).map_err(to_js_error)?;
        let transform = self.inner.handle_event(event);
        serde_wasm_bindgen::to_value(&transform).map_err(to_js_error)
    }

    /// Wheel event; pass `WheelEvent.deltaY` (only the sign is used).
    pub fn wheel(&mut self, delta_y: f64) {
        self.inner.wheel_zoom(delta_y);
    }

    pub fn pointer_down(&mut self, x: f64, y: f64) {
        self.inner.pointer_down(x, y);
    }

    pub fn pointer_move(&mut self, x: f64, y: f64) {
        self.inner.pan_to(x, y);
    }

    pub fn pointer_up(&mut self) {
        self.inner.pointer_up();
    }

    pub fn pointer_leave(&mut self) {
        self.inner.pointer_leave();
    }

    pub fn zoom_in(&mut self) {
        self.inner.zoom_in();
    }

    pub fn zoom_out(&mut self) {
        self.inner.zoom_out();
    }

    pub fn set_scale(&mut self, scale: f64) {
        self.inner.set_scale(scale);
    }

    pub fn reset(&mut self) {
        self.inner.reset();
    }

    /// Update the container size after a layout change.
    pub fn set_container_size(&mut self, width: f64, height: f64) {
        self.inner.set_container_size(ContainerSize::new(width, height));
    }

    /// Switch to a new source image.
    pub fn set_source_size(&mut self, natural_width: f64, natural_height: f64) {
        self.inner
            .set_source_size(SourceImageSize::new(natural_width, natural_height));
    }
}
