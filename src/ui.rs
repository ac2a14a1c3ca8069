//! UI event wiring
//!
//! Thin glue binding buttons, keys, and hash changes to the
//! navigation controller and viewer operations. Every listener is
//! owned by [`UiWiring`]; dropping it detaches all handlers.

use std::rc::Rc;

use gloo::events::EventListener;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::KeyboardEvent;

use crate::error::{js_error_message, ViewerError};
use crate::{dom, nav, view, ViewerContext};

/// Button ids the viewer looks for in the host page. Each is optional.
const PREV_BUTTON: &str = "flip-prev";
const NEXT_BUTTON: &str = "flip-next";
const ZOOM_IN_BUTTON: &str = "flip-zoom-in";
const ZOOM_OUT_BUTTON: &str = "flip-zoom-out";
const MODE_BUTTON: &str = "flip-mode";
const FULLSCREEN_BUTTON: &str = "flip-fullscreen";

pub(crate) struct UiWiring {
    _listeners: Vec<EventListener>,
}

pub(crate) fn wire(ctx: &Rc<ViewerContext>) -> UiWiring {
    let mut listeners = Vec::new();

    bind_click(ctx, &mut listeners, PREV_BUTTON, |ctx| {
        let _ = nav::prev(ctx);
    });
    bind_click(ctx, &mut listeners, NEXT_BUTTON, |ctx| {
        let _ = nav::next(ctx);
    });
    bind_click(ctx, &mut listeners, ZOOM_IN_BUTTON, |ctx| {
        schedule_zoom(ctx, true);
    });
    bind_click(ctx, &mut listeners, ZOOM_OUT_BUTTON, |ctx| {
        schedule_zoom(ctx, false);
    });
    bind_click(ctx, &mut listeners, MODE_BUTTON, |ctx| {
        let ctx = ctx.clone();
        spawn_local(async move {
            if let Err(e) = view::toggle_mode(&ctx).await {
                render_failure(&ctx, &e);
            }
        });
    });
    bind_click(ctx, &mut listeners, FULLSCREEN_BUTTON, |ctx| {
        toggle_fullscreen(ctx);
    });

    if let Ok(document) = dom::document() {
        let weak = Rc::downgrade(ctx);
        listeners.push(EventListener::new(&document, "keydown", move |event| {
            let Some(ctx) = weak.upgrade() else {
                return;
            };
            let Some(key_event) = event.dyn_ref::<KeyboardEvent>() else {
                return;
            };
            handle_key(&ctx, &key_event.key());
        }));
    }

    if let Ok(window) = dom::window() {
        let weak = Rc::downgrade(ctx);
        listeners.push(EventListener::new(&window, "hashchange", move |_event| {
            let Some(ctx) = weak.upgrade() else {
                return;
            };
            if let Some(page) = nav::current_fragment_page() {
                let _ = nav::go_to(&ctx, page);
            }
        }));
    }

    UiWiring {
        _listeners: listeners,
    }
}

fn bind_click(
    ctx: &Rc<ViewerContext>,
    listeners: &mut Vec<EventListener>,
    id: &str,
    action: impl Fn(&Rc<ViewerContext>) + 'static,
) {
    let Some(button) = dom::document().ok().and_then(|d| d.get_element_by_id(id)) else {
        return;
    };
    let weak = Rc::downgrade(ctx);
    listeners.push(EventListener::new(&button, "click", move |_event| {
        if let Some(ctx) = weak.upgrade() {
            action(&ctx);
        }
    }));
}

fn handle_key(ctx: &Rc<ViewerContext>, key: &str) {
    match key {
        "ArrowRight" | "PageDown" => {
            let _ = nav::next(ctx);
        }
        "ArrowLeft" | "PageUp" => {
            let _ = nav::prev(ctx);
        }
        "Home" => {
            let _ = nav::go_to(ctx, 1);
        }
        "End" => {
            let last = {
                let session = ctx.session.borrow();
                session.as_ref().map(|s| s.state.page_count())
            };
            if let Some(last) = last {
                let _ = nav::go_to(ctx, last);
            }
        }
        "+" | "=" => schedule_zoom(ctx, true),
        "-" | "_" => schedule_zoom(ctx, false),
        "f" | "F" => toggle_fullscreen(ctx),
        _ => {}
    }
}

fn schedule_zoom(ctx: &Rc<ViewerContext>, zoom_in: bool) {
    let ctx = ctx.clone();
    spawn_local(async move {
        let result = if zoom_in {
            view::zoom_in(&ctx).await
        } else {
            view::zoom_out(&ctx).await
        };
        if let Err(e) = result {
            render_failure(&ctx, &e);
        }
    });
}

pub(crate) fn toggle_fullscreen(ctx: &ViewerContext) {
    let Ok(document) = dom::document() else {
        return;
    };
    if document.fullscreen_element().is_some() {
        document.exit_fullscreen();
    } else if let Err(e) = ctx.els.container.request_fullscreen() {
        dom::warn(&format!(
            "fullscreen request rejected: {}",
            js_error_message(&e)
        ));
    }
}

/// Replace the surface with a diagnostic panel carrying remediation
/// hints. Used for fatal startup and rebuild failures alike.
pub(crate) fn render_failure(ctx: &ViewerContext, error: &ViewerError) {
    dom::warn(&format!("fatal: {}", error));
    let Ok(document) = dom::document() else {
        return;
    };
    ctx.els.container.set_inner_html("");

    let Ok(panel) = document.create_element("div") else {
        return;
    };
    panel.set_class_name("flipbook-error");

    if let Ok(message) = document.create_element("p") {
        message.set_text_content(Some(&error.to_string()));
        let _ = panel.append_child(&message);
    }
    if let Ok(list) = document.create_element("ul") {
        for hint in remediation_hints(error) {
            if let Ok(item) = document.create_element("li") {
                item.set_text_content(Some(hint));
                let _ = list.append_child(&item);
            }
        }
        let _ = panel.append_child(&list);
    }

    let _ = ctx.els.container.append_child(&panel);
}

fn remediation_hints(error: &ViewerError) -> &'static [&'static str] {
    match error {
        ViewerError::Fetch { .. } => &[
            "Check that the document URL is reachable",
            "Serve the viewer and the document from the same origin, or enable CORS on the document host",
        ],
        ViewerError::ServiceUnavailable => {
            &["Include the document rendering service script before the viewer module"]
        }
        ViewerError::Rasterize { .. } => {
            &["The document may be damaged; try re-exporting the PDF"]
        }
        ViewerError::Dom(_) => &["Check the viewer element ids in the host page"],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_error_kind_has_remediation() {
        let errors = [
            ViewerError::Fetch {
                status: 403,
                locator: "x".to_string(),
            },
            ViewerError::Rasterize {
                page: 1,
                reason: "x".to_string(),
            },
            ViewerError::ServiceUnavailable,
            ViewerError::Dom("x".to_string()),
        ];
        for error in errors {
            assert!(!remediation_hints(&error).is_empty());
        }
    }
}
