//! PDF Flip-Book Viewer
//!
//! A WASM-based viewer that renders a PDF into a page-flip book:
//! - thumbnail navigation, deep links, fullscreen
//! - single and spread page layouts with stepped zoom
//! - graceful fallback to a flat page column when the optional flip
//!   widget is not on the page
//!
//! Page decoding is delegated to the pdf.js-shaped rendering service
//! published on the host page. This crate owns the view state and
//! keeps the rendered surface consistent with it across rebuilds.

use std::cell::RefCell;
use std::rc::Rc;

use serde::Serialize;
use wasm_bindgen::prelude::*;
use web_sys::Element;

pub mod config;
pub mod error;
pub mod nav;
pub mod pdfjs;
pub mod raster;
pub mod source;
pub mod thumbs;
pub mod ui;
pub mod view;

mod dom;

// Re-export common types
pub use config::ViewerOptions;
pub use error::ViewerError;
pub use raster::RenderedPage;
pub use view::state::{LayoutMode, ViewState};

use error::Result;
use pdfjs::{DocumentHandle, RenderingService};
use raster::RenderCache;
use thumbs::ThumbRail;
use ui::UiWiring;
use view::flip::{FlipProvider, GlobalFlipProvider};
use view::surface::SurfaceSlot;

/// Initialize the WASM module
/// Call this before using any other functions
#[wasm_bindgen(start)]
pub fn init() {
    // Set up better panic messages in debug mode
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Everything that only exists once a document has been opened.
pub(crate) struct Session {
    pub(crate) document: DocumentHandle,
    pub(crate) state: ViewState,
    pub(crate) surface: SurfaceSlot,
    pub(crate) cache: RenderCache,
    pub(crate) thumbs: Option<ThumbRail>,
}

impl Session {
    fn new(document: DocumentHandle, page_count: u32) -> Self {
        Self {
            document,
            state: ViewState::new(page_count),
            surface: SurfaceSlot::new(),
            cache: RenderCache::new(),
            thumbs: None,
        }
    }
}

/// Host-page elements the viewer works against.
pub(crate) struct Elements {
    pub(crate) container: Element,
    pub(crate) indicator: Option<Element>,
    pub(crate) thumbs: Option<Element>,
    badge: Element,
}

impl Elements {
    fn resolve(options: &ViewerOptions) -> Result<Self> {
        let document = dom::document()?;
        let container = document
            .get_element_by_id(&options.container_id)
            .ok_or_else(|| {
                ViewerError::Dom(format!(
                    "container element '#{}' not found",
                    options.container_id
                ))
            })?;
        let indicator = document.get_element_by_id(&options.indicator_id);
        let thumbs = document.get_element_by_id(&options.thumbs_id);

        // Persistent degraded-mode badge, hidden until the fallback
        // surface goes live. Lives next to the container so clearing
        // the container never removes it.
        let badge = document
            .create_element("div")
            .map_err(|e| ViewerError::from_js("creating badge", &e))?;
        badge.set_class_name("flipbook-badge");
        badge.set_text_content(Some("Flip animation unavailable; using basic page view"));
        badge
            .set_attribute("hidden", "")
            .map_err(|e| ViewerError::from_js("creating badge", &e))?;
        container
            .insert_adjacent_element("afterend", &badge)
            .map_err(|_| {
                ViewerError::Dom("container element must be attached to the document".to_string())
            })?;

        Ok(Self {
            container,
            indicator,
            thumbs,
            badge,
        })
    }

    pub(crate) fn set_badge_visible(&self, visible: bool) {
        if visible {
            let _ = self.badge.remove_attribute("hidden");
        } else {
            let _ = self.badge.set_attribute("hidden", "");
        }
    }
}

/// Shared context handed to every component; there is no module-level
/// state anywhere in the crate.
pub(crate) struct ViewerContext {
    pub(crate) options: ViewerOptions,
    pub(crate) els: Elements,
    pub(crate) provider: Box<dyn FlipProvider>,
    pub(crate) session: RefCell<Option<Session>>,
    pub(crate) wiring: RefCell<Option<UiWiring>>,
}

/// Snapshot returned to JavaScript after a successful `open`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct ViewerStatus {
    page_count: u32,
    current_page: u32,
    scale: f32,
    mode: LayoutMode,
    flip_available: bool,
}

/// PDF flip-book viewer - main interface for the host page
#[wasm_bindgen]
pub struct FlipbookViewer {
    ctx: Rc<ViewerContext>,
}

#[wasm_bindgen]
impl FlipbookViewer {
    /// Create a viewer over the host-page elements named in `options`
    /// (a plain object; `undefined` means all defaults).
    #[wasm_bindgen(constructor)]
    pub fn new(options: JsValue) -> Result<FlipbookViewer, JsValue> {
        let options = ViewerOptions::from_js(options).map_err(|e| JsValue::from_str(&e.to_string()))?;
        let els = Elements::resolve(&options).map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(Self {
            ctx: Rc::new(ViewerContext {
                options,
                els,
                provider: Box::new(GlobalFlipProvider),
                session: RefCell::new(None),
                wiring: RefCell::new(None),
            }),
        })
    }

    /// Fetch the document, open it with the rendering service, build
    /// the thumbnail rail and the first surface, then wire the UI.
    /// With no `locator` the query parameter / default path is used.
    /// Returns a status snapshot, or rejects after rendering a
    /// diagnostic panel into the container.
    pub async fn open(&self, locator: Option<String>) -> Result<JsValue, JsValue> {
        match startup(&self.ctx, locator).await {
            Ok(status) => serde_wasm_bindgen::to_value(&status)
                .map_err(|e| JsValue::from_str(&e.to_string())),
            Err(e) => {
                ui::render_failure(&self.ctx, &e);
                Err(JsValue::from_str(&e.to_string()))
            }
        }
    }

    /// Navigate to a 1-based page index, clamped into the valid range.
    /// Returns the index actually landed on.
    #[wasm_bindgen(js_name = "goToPage")]
    pub fn go_to_page(&self, page: i32) -> Result<u32, JsValue> {
        nav::go_to(&self.ctx, page.max(1) as u32).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    #[wasm_bindgen(js_name = "nextPage")]
    pub fn next_page(&self) -> Result<u32, JsValue> {
        nav::next(&self.ctx).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    #[wasm_bindgen(js_name = "prevPage")]
    pub fn prev_page(&self) -> Result<u32, JsValue> {
        nav::prev(&self.ctx).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Zoom one step in and rebuild the surface.
    #[wasm_bindgen(js_name = "zoomIn")]
    pub async fn zoom_in(&self) -> Result<(), JsValue> {
        view::zoom_in(&self.ctx)
            .await
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Zoom one step out and rebuild the surface.
    #[wasm_bindgen(js_name = "zoomOut")]
    pub async fn zoom_out(&self) -> Result<(), JsValue> {
        view::zoom_out(&self.ctx)
            .await
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Switch between single and spread layout, preserving the page
    /// the user was viewing.
    #[wasm_bindgen(js_name = "toggleMode")]
    pub async fn toggle_mode(&self) -> Result<(), JsValue> {
        view::toggle_mode(&self.ctx)
            .await
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Tear down and reconstruct the surface from unchanged state.
    pub async fn rebuild(&self) -> Result<(), JsValue> {
        view::surface::rebuild(&self.ctx)
            .await
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    #[wasm_bindgen(js_name = "toggleFullscreen")]
    pub fn toggle_fullscreen(&self) {
        ui::toggle_fullscreen(&self.ctx);
    }

    #[wasm_bindgen(js_name = "currentPage")]
    pub fn current_page(&self) -> Option<u32> {
        self.ctx
            .session
            .borrow()
            .as_ref()
            .map(|s| s.state.current_index())
    }

    #[wasm_bindgen(js_name = "pageCount")]
    pub fn page_count(&self) -> Option<u32> {
        self.ctx
            .session
            .borrow()
            .as_ref()
            .map(|s| s.state.page_count())
    }

    #[wasm_bindgen(js_name = "currentScale")]
    pub fn current_scale(&self) -> Option<f32> {
        self.ctx.session.borrow().as_ref().map(|s| s.state.scale())
    }

    #[wasm_bindgen(js_name = "flipAvailable")]
    pub fn flip_available(&self) -> bool {
        self.ctx
            .session
            .borrow()
            .as_ref()
            .map(|s| s.state.flip_available())
            .unwrap_or(false)
    }
}

async fn startup(ctx: &Rc<ViewerContext>, locator: Option<String>) -> Result<ViewerStatus> {
    let service = RenderingService::probe()?;
    let locator = source::resolve_locator(locator.as_deref(), &ctx.options)?;
    dom::log(&format!("loading {}", locator));

    let bytes = source::fetch_document_bytes(&locator).await?;
    let document = service.open_document(&bytes).await?;
    let page_count = document.num_pages();
    dom::log(&format!("document open, {} pages", page_count));

    *ctx.session.borrow_mut() = Some(Session::new(document, page_count));

    let rail = thumbs::build(ctx).await?;
    if let Some(s) = ctx.session.borrow_mut().as_mut() {
        s.thumbs = rail;
    }

    view::surface::rebuild(ctx).await?;

    if let Some(page) = nav::current_fragment_page() {
        nav::go_to(ctx, page)?;
    }

    *ctx.wiring.borrow_mut() = Some(ui::wire(ctx));

    let session = ctx.session.borrow();
    let s = session.as_ref().ok_or_else(ViewerError::no_document)?;
    Ok(ViewerStatus {
        page_count: s.state.page_count(),
        current_page: s.state.current_index(),
        scale: s.state.scale(),
        mode: s.state.mode(),
        flip_available: s.state.flip_available(),
    })
}
