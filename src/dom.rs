//! Small DOM access helpers shared across modules.

use crate::error::{Result, ViewerError};

pub(crate) fn window() -> Result<web_sys::Window> {
    web_sys::window().ok_or_else(|| ViewerError::Dom("no window object".to_string()))
}

pub(crate) fn document() -> Result<web_sys::Document> {
    window()?
        .document()
        .ok_or_else(|| ViewerError::Dom("no document object".to_string()))
}

/// Console log with the viewer tag.
pub(crate) fn log(message: &str) {
    web_sys::console::log_1(&format!("[flipbook] {}", message).into());
}

/// Console warning with the viewer tag.
pub(crate) fn warn(message: &str) {
    web_sys::console::warn_1(&format!("[flipbook] {}", message).into());
}
