//! Viewer error types
//!
//! Unified error handling for the fetch, rasterize, and DOM layers.

use thiserror::Error;
use wasm_bindgen::{JsCast, JsValue};

/// Result type alias for viewer operations
pub type Result<T, E = ViewerError> = std::result::Result<T, E>;

/// Unified viewer error type
///
/// A missing flip widget is deliberately *not* represented here: the
/// view builder degrades to the fallback surface instead of failing.
#[derive(Error, Debug)]
pub enum ViewerError {
    /// Document bytes could not be fetched (bad locator, network, status)
    #[error("failed to fetch '{locator}' (status {status})")]
    Fetch { status: u16, locator: String },

    /// The rendering service rejected a page
    #[error("failed to render page {page}: {reason}")]
    Rasterize { page: u32, reason: String },

    /// The document rendering service global is absent
    #[error("document rendering service is not loaded on this page")]
    ServiceUnavailable,

    /// DOM or JS interop failure
    #[error("DOM error: {0}")]
    Dom(String),
}

impl ViewerError {
    /// Wrap a thrown JS value as a DOM error.
    pub(crate) fn from_js(context: &str, value: &JsValue) -> Self {
        ViewerError::Dom(format!("{}: {}", context, js_error_message(value)))
    }

    /// Operation requested before a document was opened.
    pub(crate) fn no_document() -> Self {
        ViewerError::Dom("no document loaded".to_string())
    }
}

/// Best-effort human-readable message for a thrown JS value.
pub(crate) fn js_error_message(value: &JsValue) -> String {
    if let Some(err) = value.dyn_ref::<js_sys::Error>() {
        return String::from(err.message());
    }
    value
        .as_string()
        .unwrap_or_else(|| "unknown error".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_error_carries_status_and_locator() {
        let err = ViewerError::Fetch {
            status: 404,
            locator: "https://example.com/book.pdf".to_string(),
        };
        let text = err.to_string();
        assert!(text.contains("404"));
        assert!(text.contains("book.pdf"));
    }

    #[test]
    fn rasterize_error_names_the_page() {
        let err = ViewerError::Rasterize {
            page: 7,
            reason: "corrupt stream".to_string(),
        };
        assert!(err.to_string().contains("page 7"));
    }
}
