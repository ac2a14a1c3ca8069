//! Rendering-service bindings
//!
//! Duck-typed bindings for the pdf.js-shaped document rendering
//! service. The service is consumed through its published global
//! (`pdfjsLib`), probed once at startup; unlike the flip widget it is
//! a required collaborator, so an absent global is fatal.

use js_sys::{Function, Object, Promise, Reflect};
use serde::Serialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;

use crate::error::{js_error_message, Result, ViewerError};

#[wasm_bindgen]
extern "C" {
    /// Opaque handle to a decoded, paginated document. Owned by the
    /// viewer for its session lifetime; released only on full reload.
    #[derive(Clone)]
    pub type DocumentHandle;

    /// Total page count, fixed for the handle's lifetime.
    #[wasm_bindgen(method, getter, js_name = numPages)]
    pub fn num_pages(this: &DocumentHandle) -> u32;

    /// Resolves to a [`PageHandle`]. Page numbers are 1-based at this
    /// boundary.
    #[wasm_bindgen(method, js_name = getPage)]
    pub fn get_page(this: &DocumentHandle, page_number: u32) -> Promise;

    pub type PageHandle;

    #[wasm_bindgen(method, js_name = getViewport)]
    pub fn get_viewport(this: &PageHandle, params: &JsValue) -> Viewport;

    /// Starts drawing the page into the surface named in `params`.
    #[wasm_bindgen(method)]
    pub fn render(this: &PageHandle, params: &JsValue) -> RenderTask;

    pub type Viewport;

    #[wasm_bindgen(method, getter)]
    pub fn width(this: &Viewport) -> f64;

    #[wasm_bindgen(method, getter)]
    pub fn height(this: &Viewport) -> f64;

    pub type RenderTask;

    #[wasm_bindgen(method, getter)]
    pub fn promise(this: &RenderTask) -> Promise;
}

#[derive(Serialize)]
struct ViewportParams {
    scale: f64,
}

/// Build the `{scale}` record for [`PageHandle::get_viewport`].
pub(crate) fn viewport_params(scale: f32) -> JsValue {
    serde_wasm_bindgen::to_value(&ViewportParams {
        scale: scale as f64,
    })
    .unwrap_or(JsValue::UNDEFINED)
}

/// Handle on the rendering service global.
pub(crate) struct RenderingService {
    root: JsValue,
    get_document: Function,
}

const SERVICE_GLOBAL: &str = "pdfjsLib";

impl RenderingService {
    /// Probe the page for the service global. Single attempt; the
    /// caller treats `ServiceUnavailable` as fatal to startup.
    pub(crate) fn probe() -> Result<Self> {
        let root = Reflect::get(&js_sys::global(), &SERVICE_GLOBAL.into())
            .ok()
            .filter(|v| !v.is_undefined() && !v.is_null())
            .ok_or(ViewerError::ServiceUnavailable)?;
        let get_document = Reflect::get(&root, &"getDocument".into())
            .ok()
            .and_then(|v| v.dyn_into::<Function>().ok())
            .ok_or(ViewerError::ServiceUnavailable)?;
        Ok(Self { root, get_document })
    }

    /// Hand the fetched bytes to the service and await the document
    /// handle. Bytes are passed directly so the service never fetches
    /// across origins itself.
    pub(crate) async fn open_document(&self, bytes: &[u8]) -> Result<DocumentHandle> {
        let params = Object::new();
        let data = js_sys::Uint8Array::from(bytes);
        Reflect::set(&params, &"data".into(), &data.into())
            .map_err(|e| ViewerError::from_js("building open parameters", &e))?;

        let task = self
            .get_document
            .call1(&self.root, &params)
            .map_err(|e| ViewerError::from_js("opening document", &e))?;
        let promise: Promise = Reflect::get(&task, &"promise".into())
            .ok()
            .and_then(|v| v.dyn_into::<Promise>().ok())
            .ok_or(ViewerError::ServiceUnavailable)?;

        let handle = JsFuture::from(promise).await.map_err(|e| {
            ViewerError::Dom(format!(
                "rendering service rejected the document: {}",
                js_error_message(&e)
            ))
        })?;
        Ok(handle.unchecked_into())
    }
}
