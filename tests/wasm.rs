//! In-browser checks of the exported viewer class.
//!
//! Run with `wasm-pack test --headless --chrome` (or firefox). The
//! rendering service and flip widget are deliberately absent here, so
//! these tests cover the construction contract and the fatal-startup
//! path.

#![cfg(target_arch = "wasm32")]

use js_sys::{Object, Reflect};
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

use pdf_flipbook::FlipbookViewer;

wasm_bindgen_test_configure!(run_in_browser);

fn install_container(id: &str) -> web_sys::Element {
    let document = web_sys::window().unwrap().document().unwrap();
    let container = document.create_element("div").unwrap();
    container.set_id(id);
    document.body().unwrap().append_child(&container).unwrap();
    container
}

fn options_for(id: &str) -> JsValue {
    let options = Object::new();
    Reflect::set(&options, &"containerId".into(), &id.into()).unwrap();
    options.into()
}

#[wasm_bindgen_test]
fn constructor_requires_the_container_element() {
    let result = FlipbookViewer::new(options_for("missing-container"));
    let message = result.err().unwrap().as_string().unwrap();
    assert!(message.contains("missing-container"), "got: {}", message);
}

#[wasm_bindgen_test]
fn constructor_rejects_invalid_options() {
    install_container("viewer-bad-options");
    let options = Object::new();
    Reflect::set(&options, &"containerId".into(), &"viewer-bad-options".into()).unwrap();
    Reflect::set(&options, &"jpegQuality".into(), &JsValue::from_f64(7.0)).unwrap();
    assert!(FlipbookViewer::new(options.into()).is_err());
}

#[wasm_bindgen_test]
fn fresh_viewer_has_no_document_state() {
    install_container("viewer-fresh");
    let viewer = FlipbookViewer::new(options_for("viewer-fresh")).unwrap();
    assert!(viewer.current_page().is_none());
    assert!(viewer.page_count().is_none());
    assert!(!viewer.flip_available());
    assert!(viewer.go_to_page(3).is_err());
}

#[wasm_bindgen_test]
async fn open_without_rendering_service_is_fatal_and_diagnosed() {
    let container = install_container("viewer-no-service");
    let viewer = FlipbookViewer::new(options_for("viewer-no-service")).unwrap();

    let result = viewer.open(None).await;
    let message = result.err().unwrap().as_string().unwrap();
    assert!(message.contains("rendering service"), "got: {}", message);

    // The diagnostic panel with remediation hints replaces the surface.
    let html = container.inner_html();
    assert!(html.contains("flipbook-error"), "got: {}", html);
}
