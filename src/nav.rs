//! Navigation controller
//!
//! Translates page-change requests (explicit index, prev/next,
//! deep-link fragment, thumbnail click) into view-state updates. With
//! a live flip widget the jump is delegated to the widget's native
//! navigation and its change observer syncs the chrome; on the
//! fallback surface the controller scrolls the panel into view and
//! performs the same updates manually, keeping both branches
//! observably equivalent.

use std::rc::Rc;

use web_sys::{ScrollBehavior, ScrollIntoViewOptions, ScrollLogicalPosition};

use crate::error::{Result, ViewerError};
use crate::view::state::{normalize_to_left, LayoutMode};
use crate::view::surface::SurfacePhase;
use crate::{dom, ViewerContext};

/// Navigate to `target`, clamped into the valid page range. Returns
/// the index actually landed on.
pub(crate) fn go_to(ctx: &Rc<ViewerContext>, target: u32) -> Result<u32> {
    let (clamped, phase, widget) = {
        let mut session = ctx.session.borrow_mut();
        let s = session.as_mut().ok_or_else(ViewerError::no_document)?;
        let clamped = s.state.set_current_index(target);
        (clamped, s.surface.phase, s.surface.widget.clone())
    };

    match (phase, widget) {
        (SurfacePhase::LiveFlip, Some(widget)) => {
            // Widget index space is zero-based; its change observer
            // refreshes indicator, rail, and fragment once it lands.
            widget.flip_to_page(clamped - 1);
        }
        _ => {
            scroll_to_panel(ctx, clamped);
            refresh_chrome(ctx);
        }
    }

    Ok(clamped)
}

pub(crate) fn next(ctx: &Rc<ViewerContext>) -> Result<u32> {
    let target = {
        let session = ctx.session.borrow();
        let s = session.as_ref().ok_or_else(ViewerError::no_document)?;
        next_target(s.state.current_index(), s.state.mode())
    };
    go_to(ctx, target)
}

pub(crate) fn prev(ctx: &Rc<ViewerContext>) -> Result<u32> {
    let target = {
        let session = ctx.session.borrow();
        let s = session.as_ref().ok_or_else(ViewerError::no_document)?;
        prev_target(s.state.current_index(), s.state.mode())
    };
    go_to(ctx, target)
}

/// Target of one forward step: the next page, or the next spread pair
/// anchored on its odd leading page.
pub(crate) fn next_target(current: u32, mode: LayoutMode) -> u32 {
    match mode {
        LayoutMode::Single => current.saturating_add(1),
        LayoutMode::Spread => normalize_to_left(current) + 2,
    }
}

/// Target of one backward step, never below page 1.
pub(crate) fn prev_target(current: u32, mode: LayoutMode) -> u32 {
    match mode {
        LayoutMode::Single => current.saturating_sub(1).max(1),
        LayoutMode::Spread => normalize_to_left(current).saturating_sub(2).max(1),
    }
}

/// Write-back path for the flip widget's page-change observer.
pub(crate) fn widget_page_changed(ctx: &Rc<ViewerContext>, index: u32) {
    {
        let mut session = ctx.session.borrow_mut();
        let Some(s) = session.as_mut() else {
            return;
        };
        s.state.set_current_index(index);
    }
    refresh_chrome(ctx);
}

/// Sync everything derived from the current index: indicator text,
/// thumbnail highlight, and the URL fragment.
pub(crate) fn refresh_chrome(ctx: &ViewerContext) {
    let snapshot = {
        let session = ctx.session.borrow();
        session
            .as_ref()
            .map(|s| (s.state.current_index(), s.state.page_count()))
    };
    let Some((current, total)) = snapshot else {
        return;
    };

    if let Some(indicator) = &ctx.els.indicator {
        indicator.set_text_content(Some(&indicator_text(current, total)));
    }

    {
        let session = ctx.session.borrow();
        if let Some(rail) = session.as_ref().and_then(|s| s.thumbs.as_ref()) {
            rail.highlight(current);
        }
    }

    if let Ok(window) = dom::window() {
        let _ = window.location().set_hash(&page_fragment(current));
    }
}

fn scroll_to_panel(ctx: &ViewerContext, index: u32) {
    let panel = {
        let session = ctx.session.borrow();
        session
            .as_ref()
            .and_then(|s| s.surface.panels.get((index - 1) as usize).cloned())
    };
    if let Some(panel) = panel {
        let options = ScrollIntoViewOptions::new();
        options.set_behavior(ScrollBehavior::Smooth);
        options.set_block(ScrollLogicalPosition::Start);
        panel.scroll_into_view_with_scroll_into_view_options(&options);
    }
}

pub(crate) fn indicator_text(current: u32, total: u32) -> String {
    format!("Page {} / {}", current, total)
}

/// Fragment form of a page deep link, without the leading `#`.
pub(crate) fn page_fragment(index: u32) -> String {
    format!("p={}", index)
}

/// Parse a `#p=<n>` fragment. Anything malformed is ignored.
pub(crate) fn parse_page_fragment(fragment: &str) -> Option<u32> {
    let fragment = fragment.strip_prefix('#').unwrap_or(fragment);
    let value = fragment.strip_prefix("p=")?;
    value.parse::<u32>().ok().filter(|&page| page >= 1)
}

/// Page requested by the current URL fragment, if any.
pub(crate) fn current_fragment_page() -> Option<u32> {
    let hash = dom::window().ok()?.location().hash().ok()?;
    parse_page_fragment(&hash)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fragment_round_trip() {
        assert_eq!(parse_page_fragment("#p=7"), Some(7));
        assert_eq!(parse_page_fragment("p=12"), Some(12));
        assert_eq!(parse_page_fragment(&format!("#{}", page_fragment(3))), Some(3));
    }

    #[test]
    fn malformed_fragments_are_ignored() {
        assert_eq!(parse_page_fragment(""), None);
        assert_eq!(parse_page_fragment("#section-2"), None);
        assert_eq!(parse_page_fragment("#p="), None);
        assert_eq!(parse_page_fragment("#p=abc"), None);
        assert_eq!(parse_page_fragment("#p=0"), None);
        assert_eq!(parse_page_fragment("#p=-4"), None);
    }

    #[test]
    fn single_mode_steps_by_one() {
        assert_eq!(next_target(4, LayoutMode::Single), 5);
        assert_eq!(prev_target(4, LayoutMode::Single), 3);
        assert_eq!(prev_target(1, LayoutMode::Single), 1);
    }

    #[test]
    fn spread_mode_steps_by_pair_onto_odd_pages() {
        // from either page of the {3,4} pair, forward lands on 5
        assert_eq!(next_target(3, LayoutMode::Spread), 5);
        assert_eq!(next_target(4, LayoutMode::Spread), 5);
        // and backward lands on 1
        assert_eq!(prev_target(3, LayoutMode::Spread), 1);
        assert_eq!(prev_target(4, LayoutMode::Spread), 1);
        assert_eq!(prev_target(1, LayoutMode::Spread), 1);
    }

    #[test]
    fn indicator_text_format() {
        assert_eq!(indicator_text(4, 10), "Page 4 / 10");
    }
}
