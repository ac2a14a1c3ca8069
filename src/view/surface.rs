//! View builder / reconciler
//!
//! Owns the single live view surface and rebuilds it from view state.
//! A rebuild always runs the same protocol: tear down whatever surface
//! is live, rasterize every page at the current scale, construct the
//! stage DOM, then either hand the populated stage to the flip widget
//! or fall back to the flat page column. Rasterization completes
//! before any DOM is built, and the stage is fully populated before
//! the widget is constructed: the widget reads the container at
//! construction time.
//!
//! Overlapping rebuilds (rapid zoom clicks) are not queued or
//! cancelled; they interleave at await points and the last one to
//! finish wins.

use std::rc::Rc;

use web_sys::Element;

use crate::error::{Result, ViewerError};
use crate::raster::{self, RenderKey, RenderedPage};
use crate::view::flip::{FlipConfig, FlipHandle};
use crate::{dom, nav, ViewerContext};

/// Lifecycle of the view surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SurfacePhase {
    /// Nothing built yet
    NoSurface,
    /// A rebuild is in flight
    Building,
    /// Flip widget live over the stage
    LiveFlip,
    /// Flat page column, scroll-based navigation
    LiveFallback,
}

/// The one live surface. Exactly one exists per session; the previous
/// surface is fully disposed before a new one is constructed.
pub(crate) struct SurfaceSlot {
    pub(crate) phase: SurfacePhase,
    pub(crate) widget: Option<Rc<FlipHandle>>,
    pub(crate) panels: Vec<Element>,
}

impl SurfaceSlot {
    pub(crate) fn new() -> Self {
        Self {
            phase: SurfacePhase::NoSurface,
            widget: None,
            panels: Vec::new(),
        }
    }
}

/// Run the full rebuild protocol against the current view state.
pub(crate) async fn rebuild(ctx: &Rc<ViewerContext>) -> Result<()> {
    let (document, page_count, scale, mode, current) = {
        let session = ctx.session.borrow();
        let s = session.as_ref().ok_or_else(ViewerError::no_document)?;
        (
            s.document.clone(),
            s.state.page_count(),
            s.state.scale(),
            s.state.mode(),
            s.state.current_index(),
        )
    };

    teardown(ctx);

    // All pages render before any DOM exists, in page order.
    let mut pages: Vec<RenderedPage> = Vec::with_capacity(page_count as usize);
    for index in 1..=page_count {
        let key = RenderKey::new(index, scale);
        let cached = {
            let session = ctx.session.borrow();
            session
                .as_ref()
                .and_then(|s| s.cache.get(&key).cloned())
        };
        let rendered = match cached {
            Some(hit) => hit,
            None => {
                let rendered = raster::rasterize(
                    &document,
                    index,
                    scale,
                    ctx.options.base_render_scale,
                    ctx.options.jpeg_quality,
                )
                .await?;
                if let Some(s) = ctx.session.borrow_mut().as_mut() {
                    s.cache.insert(key, rendered.clone());
                }
                rendered
            }
        };
        pages.push(rendered);
    }

    let (stage, panels) = build_stage(&ctx.els.container, &pages)?;

    let page_size = pages.first().map(|p| (p.width, p.height)).unwrap_or((1, 1));
    let config =
        FlipConfig::for_surface(page_size, mode, current, ctx.options.max_shadow_opacity);

    match ctx.provider.create(&stage, &config) {
        Some(widget) => {
            let widget = Rc::new(widget);
            let weak = Rc::downgrade(ctx);
            widget.on_page_change(move |zero_based| {
                if let Some(ctx) = weak.upgrade() {
                    nav::widget_page_changed(&ctx, zero_based + 1);
                }
            });
            apply(ctx, SurfacePhase::LiveFlip, Some(widget), panels);
        }
        None => {
            let _ = stage.class_list().add_1("flipbook-fallback");
            dom::warn("flip widget unavailable, using basic page view");
            apply(ctx, SurfacePhase::LiveFallback, None, panels);
        }
    }

    nav::refresh_chrome(ctx);
    Ok(())
}

/// Dispose the live surface, if any. The widget teardown hook is
/// invoked defensively: its failure is logged and swallowed so a
/// broken teardown can never block producing a new surface.
pub(crate) fn teardown(ctx: &ViewerContext) {
    let widget = {
        let mut session = ctx.session.borrow_mut();
        let Some(s) = session.as_mut() else {
            return;
        };
        s.surface.panels.clear();
        s.surface.phase = SurfacePhase::Building;
        s.surface.widget.take()
    };
    if let Some(widget) = widget {
        widget.destroy();
    }
    ctx.els.container.set_inner_html("");
}

fn apply(
    ctx: &ViewerContext,
    phase: SurfacePhase,
    widget: Option<Rc<FlipHandle>>,
    panels: Vec<Element>,
) {
    let flip_available = phase == SurfacePhase::LiveFlip;
    if let Some(s) = ctx.session.borrow_mut().as_mut() {
        s.surface.phase = phase;
        s.surface.widget = widget;
        s.surface.panels = panels;
        s.state.set_flip_available(flip_available);
    }
    ctx.els.set_badge_visible(!flip_available);
}

/// Build the stage element with one panel per rendered page, appended
/// in page order, and attach it to the container.
fn build_stage(container: &Element, pages: &[RenderedPage]) -> Result<(Element, Vec<Element>)> {
    let stage_err = |e: &wasm_bindgen::JsValue| ViewerError::from_js("building stage", e);
    let document = dom::document()?;

    let stage = document.create_element("div").map_err(|e| stage_err(&e))?;
    stage.set_class_name("flipbook-stage");

    let mut panels = Vec::with_capacity(pages.len());
    for page in pages {
        let panel = document.create_element("div").map_err(|e| stage_err(&e))?;
        panel.set_class_name("flipbook-page");
        panel
            .set_attribute("data-density", "soft")
            .map_err(|e| stage_err(&e))?;

        let image = document.create_element("img").map_err(|e| stage_err(&e))?;
        image
            .set_attribute("src", &page.image_url)
            .map_err(|e| stage_err(&e))?;
        image
            .set_attribute("alt", &format!("Page {}", page.index))
            .map_err(|e| stage_err(&e))?;

        panel.append_child(&image).map_err(|e| stage_err(&e))?;
        stage.append_child(&panel).map_err(|e| stage_err(&e))?;
        panels.push(panel);
    }

    container.append_child(&stage).map_err(|e| stage_err(&e))?;
    Ok((stage, panels))
}
