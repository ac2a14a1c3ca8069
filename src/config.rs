//! Viewer configuration
//!
//! Options are passed from JavaScript as a plain object and
//! deserialized once at construction time. Every field has a default,
//! so `new FlipbookViewer()` with no argument works out of the box.

use serde::{Deserialize, Serialize};
use wasm_bindgen::JsValue;

use crate::error::{Result, ViewerError};

/// Viewer options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ViewerOptions {
    /// Id of the element the book surface is built into (required in the DOM)
    pub container_id: String,
    /// Id of the "Page x / y" indicator element, skipped when absent
    pub indicator_id: String,
    /// Id of the thumbnail rail element, skipped when absent
    pub thumbs_id: String,
    /// Document path used when no query parameter is present
    pub default_locator: String,
    /// Query parameter carrying the document locator
    pub query_param: String,
    /// Multiplier composed with the view scale on every main render
    pub base_render_scale: f32,
    /// Scale used for the thumbnail rail, independent of the view scale
    pub thumbnail_scale: f32,
    /// JPEG encoder quality for page images, in (0, 1]
    pub jpeg_quality: f64,
    /// Shadow intensity handed to the flip widget
    pub max_shadow_opacity: f64,
}

impl Default for ViewerOptions {
    fn default() -> Self {
        Self {
            container_id: "flipbook".to_string(),
            indicator_id: "flipbook-indicator".to_string(),
            thumbs_id: "flipbook-thumbs".to_string(),
            default_locator: "document.pdf".to_string(),
            query_param: "doc".to_string(),
            base_render_scale: 1.5,
            thumbnail_scale: 0.25,
            jpeg_quality: 0.85,
            max_shadow_opacity: 0.5,
        }
    }
}

impl ViewerOptions {
    /// Deserialize options from the constructor argument.
    /// `undefined`/`null` mean "all defaults".
    pub fn from_js(value: JsValue) -> Result<Self> {
        let options: ViewerOptions = if value.is_undefined() || value.is_null() {
            ViewerOptions::default()
        } else {
            serde_wasm_bindgen::from_value(value)
                .map_err(|e| ViewerError::Dom(format!("invalid viewer options: {}", e)))?
        };
        options.validate()?;
        Ok(options)
    }

    fn validate(&self) -> Result<()> {
        if self.container_id.is_empty() {
            return Err(ViewerError::Dom("containerId must not be empty".to_string()));
        }
        if self.base_render_scale <= 0.0 {
            return Err(ViewerError::Dom(
                "baseRenderScale must be positive".to_string(),
            ));
        }
        if self.thumbnail_scale <= 0.0 {
            return Err(ViewerError::Dom(
                "thumbnailScale must be positive".to_string(),
            ));
        }
        if !(self.jpeg_quality > 0.0 && self.jpeg_quality <= 1.0) {
            return Err(ViewerError::Dom(
                "jpegQuality must be in (0, 1]".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_values() {
        let options = ViewerOptions::default();
        assert_eq!(options.container_id, "flipbook");
        assert_eq!(options.base_render_scale, 1.5);
        assert_eq!(options.thumbnail_scale, 0.25);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn partial_json_fills_remaining_defaults() {
        let options: ViewerOptions =
            serde_json::from_str(r#"{"containerId":"book","queryParam":"file"}"#).unwrap();
        assert_eq!(options.container_id, "book");
        assert_eq!(options.query_param, "file");
        assert_eq!(options.default_locator, "document.pdf");
        assert_eq!(options.jpeg_quality, 0.85);
    }

    #[test]
    fn camel_case_wire_format() {
        let json = serde_json::to_string(&ViewerOptions::default()).unwrap();
        assert!(json.contains("\"containerId\""));
        assert!(json.contains("\"baseRenderScale\""));
        assert!(!json.contains("container_id"));
    }

    #[test]
    fn rejects_degenerate_scales() {
        let mut options = ViewerOptions::default();
        options.base_render_scale = 0.0;
        assert!(options.validate().is_err());

        let mut options = ViewerOptions::default();
        options.jpeg_quality = 1.5;
        assert!(options.validate().is_err());
    }
}
