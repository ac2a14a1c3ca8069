//! View layer: state, surface reconciliation, and the flip-widget seam.

pub mod flip;
pub mod state;
pub mod surface;

use std::rc::Rc;

use crate::error::Result;
use crate::view::state::SCALE_STEP;
use crate::ViewerContext;

pub(crate) async fn zoom_in(ctx: &Rc<ViewerContext>) -> Result<()> {
    adjust_scale(ctx, SCALE_STEP).await
}

pub(crate) async fn zoom_out(ctx: &Rc<ViewerContext>) -> Result<()> {
    adjust_scale(ctx, -SCALE_STEP).await
}

/// Every zoom request schedules a full rebuild, even when the scale is
/// already at its clamp boundary. Overlapping rebuilds are not
/// coalesced.
async fn adjust_scale(ctx: &Rc<ViewerContext>, delta: f32) -> Result<()> {
    {
        let mut session = ctx.session.borrow_mut();
        if let Some(s) = session.as_mut() {
            let scale = s.state.scale();
            s.state.set_scale(scale + delta);
        }
    }
    surface::rebuild(ctx).await
}

/// Switch between single and spread layout. The current index is left
/// untouched, so the rebuilt surface opens on the page the user was
/// viewing.
pub(crate) async fn toggle_mode(ctx: &Rc<ViewerContext>) -> Result<()> {
    {
        let mut session = ctx.session.borrow_mut();
        if let Some(s) = session.as_mut() {
            let mode = s.state.mode().toggled();
            s.state.set_mode(mode);
        }
    }
    surface::rebuild(ctx).await
}
