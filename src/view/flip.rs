//! Flip-widget provider
//!
//! The optional page-flip animation library is an external dependency
//! that may simply not be on the page. The view builder never looks it
//! up itself: it asks a [`FlipProvider`] injected at startup, and a
//! `None` answer degrades the surface to the flat fallback. The
//! shipped provider probes the library's known global export shapes.

use js_sys::{Array, Function, Reflect};
use serde::Serialize;
use std::cell::RefCell;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::Element;

use crate::dom;
use crate::error::js_error_message;
use crate::view::state::LayoutMode;

/// Construction-time configuration for the flip widget. The starting
/// page and layout are baked in here rather than applied through a
/// later update call: updating a freshly constructed widget before its
/// internal layout settles corrupts its page index.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct FlipConfig {
    pub width: u32,
    pub height: u32,
    pub size: &'static str,
    pub max_shadow_opacity: f64,
    pub show_cover: bool,
    pub use_portrait: bool,
    /// Zero-based at the widget boundary
    pub start_page: u32,
}

impl FlipConfig {
    pub(crate) fn for_surface(
        page_size: (u32, u32),
        mode: LayoutMode,
        current_index: u32,
        max_shadow_opacity: f64,
    ) -> Self {
        Self {
            width: page_size.0,
            height: page_size.1,
            size: "stretch",
            max_shadow_opacity,
            show_cover: false,
            use_portrait: mode == LayoutMode::Single,
            start_page: current_index.saturating_sub(1),
        }
    }
}

/// Creates a flip surface over a populated container, or reports the
/// capability as unavailable. Implementations must not throw: a
/// missing or broken widget library degrades, never aborts.
pub(crate) trait FlipProvider {
    fn create(&self, container: &Element, config: &FlipConfig) -> Option<FlipHandle>;
}

/// Global export shapes the widget library is known to publish under.
const EXPORT_SHAPES: &[&[&str]] = &[&["PageFlip"], &["St", "PageFlip"]];

/// Provider probing the widget's global export shapes.
pub(crate) struct GlobalFlipProvider;

impl FlipProvider for GlobalFlipProvider {
    fn create(&self, container: &Element, config: &FlipConfig) -> Option<FlipHandle> {
        let constructor = probe_constructor()?;
        let config = serde_wasm_bindgen::to_value(config).ok()?;
        let args = Array::of2(container.as_ref(), &config);
        match Reflect::construct(&constructor, &args) {
            Ok(instance) => Some(FlipHandle::new(instance)),
            Err(e) => {
                dom::warn(&format!(
                    "flip widget construction failed: {}",
                    js_error_message(&e)
                ));
                None
            }
        }
    }
}

fn probe_constructor() -> Option<Function> {
    let global: JsValue = js_sys::global().into();
    EXPORT_SHAPES
        .iter()
        .find_map(|path| resolve_path(&global, path))
}

fn resolve_path(root: &JsValue, path: &[&str]) -> Option<Function> {
    let mut current = root.clone();
    for key in path {
        current = Reflect::get(&current, &JsValue::from_str(key)).ok()?;
        if current.is_undefined() || current.is_null() {
            return None;
        }
    }
    current.dyn_into::<Function>().ok()
}

/// Live widget instance. Dropping the handle drops the page-change
/// observer closure, which detaches the callback even if the widget
/// itself leaked.
pub(crate) struct FlipHandle {
    instance: JsValue,
    observer: RefCell<Option<Closure<dyn FnMut(JsValue)>>>,
}

impl FlipHandle {
    fn new(instance: JsValue) -> Self {
        Self {
            instance,
            observer: RefCell::new(None),
        }
    }

    /// Jump to a page. Zero-based: the navigation controller owns the
    /// off-by-one translation.
    pub(crate) fn flip_to_page(&self, zero_based: u32) {
        self.call("flipToPage", &[JsValue::from_f64(zero_based as f64)]);
    }

    /// Subscribe to the widget's page-change event. The callback
    /// receives the new page index, zero-based.
    pub(crate) fn on_page_change(&self, mut callback: impl FnMut(u32) + 'static) {
        let closure = Closure::wrap(Box::new(move |event: JsValue| {
            let page = Reflect::get(&event, &"data".into())
                .ok()
                .and_then(|v| v.as_f64());
            if let Some(page) = page {
                callback(page as u32);
            }
        }) as Box<dyn FnMut(JsValue)>);
        self.call("on", &[JsValue::from_str("flip"), closure.as_ref().clone()]);
        *self.observer.borrow_mut() = Some(closure);
    }

    /// Invoke the widget's optional teardown hook. Failures are logged
    /// and swallowed: a broken teardown must never block a rebuild.
    pub(crate) fn destroy(&self) {
        self.call("destroy", &[]);
        self.observer.borrow_mut().take();
    }

    fn call(&self, method: &str, args: &[JsValue]) {
        let function = match Reflect::get(&self.instance, &JsValue::from_str(method)) {
            Ok(v) => match v.dyn_into::<Function>() {
                Ok(f) => f,
                Err(_) => return,
            },
            Err(_) => return,
        };
        let list = Array::new();
        for arg in args {
            list.push(arg);
        }
        if let Err(e) = Reflect::apply(&function, &self.instance, &list) {
            dom::warn(&format!(
                "flip widget '{}' failed: {}",
                method,
                js_error_message(&e)
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_bakes_in_zero_based_start_page() {
        let config = FlipConfig::for_surface((600, 800), LayoutMode::Single, 4, 0.5);
        assert_eq!(config.start_page, 3);
        assert!(config.use_portrait);
    }

    #[test]
    fn spread_mode_requests_landscape_widget() {
        let config = FlipConfig::for_surface((600, 800), LayoutMode::Spread, 1, 0.5);
        assert_eq!(config.start_page, 0);
        assert!(!config.use_portrait);
    }

    #[test]
    fn config_wire_format_is_camel_case() {
        let config = FlipConfig::for_surface((600, 800), LayoutMode::Single, 1, 0.5);
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"startPage\":0"));
        assert!(json.contains("\"maxShadowOpacity\""));
        assert!(json.contains("\"size\":\"stretch\""));
    }
}
