//! Interactive cropper WASM bindings.
//!
//! [`JsImageCropper`] wraps the core session. Settings and rectangles cross
//! the boundary as plain objects through `serde-wasm-bindgen`; finished
//! crops come back as [`JsCropResult`].
//!
//! # Example
//!
//! ```typescript
//! import { JsImageCropper } from '@cropkit/wasm';
//!
//! const cropper = new JsImageCropper({ aspectRatioLocked: true, lockedRatio: 16 / 9 });
//! const ticket = cropper.begin_load();
//! cropper.complete_load(ticket, bytes);
//! cropper.set_display_size(img.clientWidth, img.clientHeight);
//!
//! canvas.onpointerdown = (e) => cropper.pointer_down(hitTest(e), e.offsetX, e.offsetY);
//! canvas.onpointermove = (e) => draw(cropper.pointer_move(e.offsetX, e.offsetY));
//! canvas.onpointerup = () => {
//!   const result = cropper.pointer_up();
//!   if (result) preview(new Blob([result.bytes()], { type: result.mime_type }));
//! };
//! ```

use std::str::FromStr;

use cropkit_core::cropper::{
    CropRect, CropResult, CropperSettings, DragKind, Handle, ImageCropper, LoadStatus, LoadTicket,
    ParseHandleError, Point,
};
use cropkit_core::decode::ImageDimensions;
use cropkit_core::encode::OutputFormat;
use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::types::{js_error, JsPixelBuffer};

/// Parse a drag target: `move`, `pinch` or a handle name such as `topleft`.
pub(crate) fn parse_drag_kind(name: &str) -> Result<DragKind, ParseHandleError> {
    match name {
        "move" => Ok(DragKind::Move),
        "pinch" => Ok(DragKind::Pinch),
        handle => Handle::from_str(handle).map(DragKind::Resize),
    }
}

fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(js_error)
}

fn settings_from_js(value: JsValue) -> Result<CropperSettings, JsValue> {
    if value.is_undefined() || value.is_null() {
        return Ok(CropperSettings::default());
    }
    serde_wasm_bindgen::from_value(value)
        .map_err(|e| JsValue::from_str(&format!("Invalid cropper settings: {}", e)))
}

/// A pending image load.
#[wasm_bindgen]
pub struct JsLoadTicket {
    inner: LoadTicket,
}

/// A finished crop.
#[wasm_bindgen]
pub struct JsCropResult {
    inner: CropResult,
}

#[wasm_bindgen]
impl JsCropResult {
    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.inner.width
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.inner.height
    }

    #[wasm_bindgen(getter)]
    pub fn format(&self) -> String {
        self.inner.format.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn mime_type(&self) -> Option<String> {
        OutputFormat::parse(&self.inner.format)
            .ok()
            .map(|f| f.mime_type().to_string())
    }

    /// Encoded output bytes.
    pub fn bytes(&self) -> Vec<u8> {
        self.inner.encoded.clone()
    }

    /// The output pixels before encoding.
    pub fn image(&self) -> JsPixelBuffer {
        JsPixelBuffer::from_buffer(self.inner.image.clone())
    }

    /// `{ width, height, cropperPosition, imagePosition, offsetImagePosition, format }`.
    pub fn positions(&self) -> Result<JsValue, JsValue> {
        to_js(&self.inner)
    }
}

/// Interactive cropping session for JavaScript.
#[wasm_bindgen]
pub struct JsImageCropper {
    inner: ImageCropper,
}

#[wasm_bindgen]
impl JsImageCropper {
    /// Create a cropper. `settings` may be `undefined` for the defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(settings: JsValue) -> Result<JsImageCropper, JsValue> {
        let settings = settings_from_js(settings)?;
        let inner = ImageCropper::new(settings).map_err(js_error)?;
        Ok(Self { inner })
    }

    pub fn settings(&self) -> Result<JsValue, JsValue> {
        to_js(self.inner.settings())
    }

    /// Replace the settings. Returns the reset rectangle, if any.
    pub fn set_settings(&mut self, settings: JsValue) -> Result<JsValue, JsValue> {
        let settings = settings_from_js(settings)?;
        let rect = self.inner.set_settings(settings).map_err(js_error)?;
        to_js(&rect)
    }

    pub fn set_aspect_ratio(&mut self, locked: bool, ratio: f64) -> Result<JsValue, JsValue> {
        let rect = self.inner.set_aspect_ratio(locked, ratio).map_err(js_error)?;
        to_js(&rect)
    }

    /// Start a load. Only the most recent ticket can complete.
    pub fn begin_load(&mut self) -> JsLoadTicket {
        JsLoadTicket {
            inner: self.inner.begin_load(),
        }
    }

    /// Decode `bytes` for `ticket`. Returns false when the ticket is stale.
    pub fn complete_load(&mut self, ticket: &JsLoadTicket, bytes: &[u8]) -> Result<bool, JsValue> {
        let status = self.inner.load_bytes(ticket.inner, bytes).map_err(js_error)?;
        Ok(status == LoadStatus::Applied)
    }

    /// The working image, padding included.
    pub fn image(&self) -> Option<JsPixelBuffer> {
        self.inner.image().cloned().map(JsPixelBuffer::from_buffer)
    }

    /// Size the image is displayed at. Returns the rectangle.
    pub fn set_display_size(&mut self, width: u32, height: u32) -> Result<JsValue, JsValue> {
        let rect = self
            .inner
            .set_display_size(ImageDimensions::new(width, height))
            .map_err(js_error)?;
        to_js(&rect)
    }

    /// The current rectangle `{ x1, y1, x2, y2 }`, or `undefined`.
    pub fn rect(&self) -> Result<JsValue, JsValue> {
        to_js(&self.inner.rect())
    }

    pub fn set_rect(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) -> Result<JsValue, JsValue> {
        to_js(&self.inner.set_rect(CropRect::new(x1, y1, x2, y2)))
    }

    pub fn reset(&mut self) -> Result<JsValue, JsValue> {
        to_js(&self.inner.reset())
    }

    /// Start a drag on `target` (`move`, `pinch` or a handle name).
    pub fn pointer_down(&mut self, target: &str, x: f64, y: f64) -> Result<bool, JsValue> {
        let kind = parse_drag_kind(target).map_err(js_error)?;
        Ok(self.inner.pointer_down(kind, Point::new(x, y)))
    }

    pub fn pointer_move(&mut self, x: f64, y: f64) -> Result<JsValue, JsValue> {
        to_js(&self.inner.pointer_move(Point::new(x, y)))
    }

    /// Feed the distance between the two fingers of a pinch.
    pub fn pinch_move(&mut self, distance: f64) -> Result<JsValue, JsValue> {
        to_js(&self.inner.pinch_move(distance))
    }

    /// End the drag; returns the crop when auto-crop produced one.
    pub fn pointer_up(&mut self) -> Result<Option<JsCropResult>, JsValue> {
        let result = self.inner.pointer_up().map_err(js_error)?;
        Ok(result.cloned().map(|inner| JsCropResult { inner }))
    }

    pub fn crop(&mut self) -> Result<JsCropResult, JsValue> {
        let result = self.inner.crop().map_err(js_error)?;
        Ok(JsCropResult {
            inner: result.clone(),
        })
    }

    pub fn last_result(&self) -> Option<JsCropResult> {
        self.inner
            .last_result()
            .cloned()
            .map(|inner| JsCropResult { inner })
    }
}
