//! Page rasterizer
//!
//! Turns one page of the document into a JPEG image at a given scale.
//! Every call composes the caller's scale with the base multiplier so
//! the default zoom stays sharp, draws into a transient canvas, and
//! encodes the result as a data URL. Rendered pages are cached by
//! `(page, quantized scale)`; thumbnails use their own small scale and
//! render once, so they bypass the cache.

use std::collections::HashMap;

use js_sys::{Object, Reflect};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::dom;
use crate::error::{js_error_message, Result, ViewerError};
use crate::pdfjs::{self, DocumentHandle, PageHandle};

/// One rendered page image. Ephemeral: regenerated whenever scale or
/// layout changes, kept only through the cache.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedPage {
    /// 1-based page index
    pub index: u32,
    /// JPEG-encoded bitmap as a data URL
    pub image_url: String,
    pub width: u32,
    pub height: u32,
}

/// Render a single page at `scale` times the base multiplier.
pub(crate) async fn rasterize(
    document: &DocumentHandle,
    index: u32,
    scale: f32,
    base_render_scale: f32,
    jpeg_quality: f64,
) -> Result<RenderedPage> {
    let rasterize_err = |e: &JsValue| ViewerError::Rasterize {
        page: index,
        reason: js_error_message(e),
    };

    let page: PageHandle = JsFuture::from(document.get_page(index))
        .await
        .map_err(|e| rasterize_err(&e))?
        .unchecked_into();

    let viewport = page.get_viewport(&pdfjs::viewport_params(scale * base_render_scale));
    let (width, height) = surface_dimensions(viewport.width(), viewport.height());

    // Transient drawing surface, one per call.
    let canvas: HtmlCanvasElement = dom::document()?
        .create_element("canvas")
        .map_err(|e| ViewerError::from_js("creating canvas", &e))?
        .unchecked_into();
    canvas.set_width(width);
    canvas.set_height(height);
    let context: CanvasRenderingContext2d = canvas
        .get_context("2d")
        .ok()
        .flatten()
        .and_then(|c| c.dyn_into().ok())
        .ok_or_else(|| ViewerError::Dom("2d canvas context unavailable".to_string()))?;

    let params = Object::new();
    Reflect::set(&params, &"canvasContext".into(), context.as_ref())
        .map_err(|e| ViewerError::from_js("building render parameters", &e))?;
    Reflect::set(&params, &"viewport".into(), viewport.as_ref())
        .map_err(|e| ViewerError::from_js("building render parameters", &e))?;

    JsFuture::from(page.render(&params.into()).promise())
        .await
        .map_err(|e| rasterize_err(&e))?;

    let image_url = canvas
        .to_data_url_with_type_and_encoder_options("image/jpeg", &JsValue::from_f64(jpeg_quality))
        .map_err(|e| ViewerError::from_js("encoding page image", &e))?;

    Ok(RenderedPage {
        index,
        image_url,
        width,
        height,
    })
}

/// Canvas dimensions for a viewport, at least 1px per axis so extreme
/// scales never produce a degenerate zero-size surface.
pub(crate) fn surface_dimensions(width: f64, height: f64) -> (u32, u32) {
    let clamp = |v: f64| (v.ceil().max(1.0)) as u32;
    (clamp(width), clamp(height))
}

/// Cache key: page index plus the scale quantized to two decimals, so
/// float noise never splits entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct RenderKey {
    pub index: u32,
    pub scale_q: u32,
}

impl RenderKey {
    pub(crate) fn new(index: u32, scale: f32) -> Self {
        Self {
            index,
            scale_q: (scale * 100.0).round() as u32,
        }
    }
}

/// Rendered-page cache keyed by `(page, scale)`.
#[derive(Debug, Default)]
pub(crate) struct RenderCache {
    entries: HashMap<RenderKey, RenderedPage>,
}

impl RenderCache {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn get(&self, key: &RenderKey) -> Option<&RenderedPage> {
        self.entries.get(key)
    }

    pub(crate) fn insert(&mut self, key: RenderKey, page: RenderedPage) {
        self.entries.insert(key, page);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn surface_dimensions_never_degenerate() {
        assert_eq!(surface_dimensions(0.0, 0.0), (1, 1));
        assert_eq!(surface_dimensions(0.2, 800.0), (1, 800));
        assert_eq!(surface_dimensions(612.5, 792.1), (613, 793));
    }

    #[test]
    fn render_key_quantizes_scale() {
        assert_eq!(RenderKey::new(3, 1.0), RenderKey::new(3, 1.0000001));
        assert_eq!(RenderKey::new(3, 0.25).scale_q, 25);
        assert_ne!(RenderKey::new(3, 1.0), RenderKey::new(3, 1.25));
        assert_ne!(RenderKey::new(3, 1.0), RenderKey::new(4, 1.0));
    }

    #[test]
    fn cache_round_trip() {
        let mut cache = RenderCache::new();
        let key = RenderKey::new(1, 1.5);
        assert!(cache.get(&key).is_none());
        cache.insert(
            key,
            RenderedPage {
                index: 1,
                image_url: "data:image/jpeg;base64,".to_string(),
                width: 10,
                height: 14,
            },
        );
        assert_eq!(cache.get(&key).map(|p| p.index), Some(1));
    }
}
