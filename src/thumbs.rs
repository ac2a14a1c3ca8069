//! Thumbnail rail
//!
//! A low-resolution strip of every page, built once at startup and
//! left alone by zoom and layout rebuilds. Clicking a thumbnail
//! navigates; exactly one entry carries the active highlight.

use std::rc::Rc;

use gloo::events::EventListener;
use web_sys::Element;

use crate::error::{Result, ViewerError};
use crate::{dom, nav, raster, ViewerContext};

pub(crate) struct ThumbRail {
    entries: Vec<ThumbEntry>,
}

struct ThumbEntry {
    element: Element,
    _click: EventListener,
}

/// Render every page at the thumbnail scale into the rail element.
/// Returns `None` when the host page has no rail.
pub(crate) async fn build(ctx: &Rc<ViewerContext>) -> Result<Option<ThumbRail>> {
    let Some(root) = ctx.els.thumbs.clone() else {
        return Ok(None);
    };

    let (document, page_count) = {
        let session = ctx.session.borrow();
        let s = session.as_ref().ok_or_else(ViewerError::no_document)?;
        (s.document.clone(), s.state.page_count())
    };

    root.set_inner_html("");
    let dom_document = dom::document()?;
    let thumb_err = |e: &wasm_bindgen::JsValue| ViewerError::from_js("building thumbnail rail", e);

    let mut entries = Vec::with_capacity(page_count as usize);
    for index in 1..=page_count {
        let page = raster::rasterize(
            &document,
            index,
            ctx.options.thumbnail_scale,
            ctx.options.base_render_scale,
            ctx.options.jpeg_quality,
        )
        .await?;

        let element = dom_document
            .create_element("img")
            .map_err(|e| thumb_err(&e))?;
        element.set_class_name("flipbook-thumb");
        element
            .set_attribute("src", &page.image_url)
            .map_err(|e| thumb_err(&e))?;
        element
            .set_attribute("alt", &format!("Page {} thumbnail", index))
            .map_err(|e| thumb_err(&e))?;

        let weak = Rc::downgrade(ctx);
        let click = EventListener::new(&element, "click", move |_event| {
            let Some(ctx) = weak.upgrade() else {
                return;
            };
            if let Err(e) = nav::go_to(&ctx, index) {
                dom::warn(&format!("thumbnail navigation failed: {}", e));
            }
        });

        root.append_child(&element).map_err(|e| thumb_err(&e))?;
        entries.push(ThumbEntry {
            element,
            _click: click,
        });
    }

    Ok(Some(ThumbRail { entries }))
}

impl ThumbRail {
    /// Put the active class on the entry for `index` and clear it from
    /// every other entry.
    pub(crate) fn highlight(&self, index: u32) {
        for (position, entry) in self.entries.iter().enumerate() {
            let classes = entry.element.class_list();
            if position as u32 + 1 == index {
                let _ = classes.add_1("active");
            } else {
                let _ = classes.remove_1("active");
            }
        }
    }
}
