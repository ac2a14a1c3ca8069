//! Document source adapter
//!
//! Resolves the requested locator to an absolute URL and fetches the
//! raw bytes itself, so the rendering service is always handed bytes
//! and never performs a cross-origin fetch of its own. The request
//! bypasses the HTTP cache so a previously cached cross-origin-blocked
//! response can never be replayed. Single attempt, no retries.

use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestCache, RequestInit, Response, Url, UrlSearchParams};

use crate::config::ViewerOptions;
use crate::dom;
use crate::error::{Result, ViewerError};

/// Pick the document locator (explicit argument, query parameter, or
/// configured default) and resolve it against the page URL.
pub(crate) fn resolve_locator(explicit: Option<&str>, options: &ViewerOptions) -> Result<String> {
    let location = dom::window()?.location();

    let requested = match explicit {
        Some(locator) => locator.to_string(),
        None => {
            let search = location
                .search()
                .map_err(|e| ViewerError::from_js("reading query string", &e))?;
            UrlSearchParams::new_with_str(&search)
                .ok()
                .and_then(|params| params.get(&options.query_param))
                .unwrap_or_else(|| options.default_locator.clone())
        }
    };

    let base = location
        .href()
        .map_err(|e| ViewerError::from_js("reading page URL", &e))?;
    let url = Url::new_with_base(&requested, &base).map_err(|_| ViewerError::Fetch {
        status: 0,
        locator: requested,
    })?;
    Ok(url.href())
}

/// Fetch the document bytes. Non-success status or network failure is
/// fatal to startup and surfaces as [`ViewerError::Fetch`].
pub(crate) async fn fetch_document_bytes(locator: &str) -> Result<Vec<u8>> {
    let fetch_err = |status: u16| ViewerError::Fetch {
        status,
        locator: locator.to_string(),
    };

    let init = RequestInit::new();
    init.set_cache(RequestCache::NoStore);
    let request = Request::new_with_str_and_init(locator, &init).map_err(|_| fetch_err(0))?;

    let response: Response = JsFuture::from(dom::window()?.fetch_with_request(&request))
        .await
        .map_err(|_| fetch_err(0))?
        .dyn_into()
        .map_err(|e: JsValue| ViewerError::from_js("reading fetch response", &e))?;

    if !response.ok() {
        return Err(fetch_err(response.status()));
    }

    let buffer = JsFuture::from(
        response
            .array_buffer()
            .map_err(|e| ViewerError::from_js("reading response body", &e))?,
    )
    .await
    .map_err(|_| fetch_err(response.status()))?;

    Ok(js_sys::Uint8Array::new(&buffer).to_vec())
}
