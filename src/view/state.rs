//! View state
//!
//! Single source of truth for what should be on screen. All mutation
//! goes through the guarded setters here, so the view builder and the
//! navigation controller never have to defend against out-of-range
//! indices or scales. Deliberately free of any DOM type.

/// Lower bound of the zoom scale
pub const SCALE_MIN: f32 = 0.5;
/// Upper bound of the zoom scale
pub const SCALE_MAX: f32 = 3.0;
/// Zoom increment per step
pub const SCALE_STEP: f32 = 0.25;

/// Page layout mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutMode {
    /// One page at a time
    Single,
    /// Two pages side by side, left page always odd-indexed
    Spread,
}

impl LayoutMode {
    pub fn toggled(self) -> Self {
        match self {
            LayoutMode::Single => LayoutMode::Spread,
            LayoutMode::Spread => LayoutMode::Single,
        }
    }
}

/// Mutable view state for one loaded document
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewState {
    page_count: u32,
    current_index: u32,
    scale: f32,
    mode: LayoutMode,
    flip_available: bool,
}

impl ViewState {
    /// Fresh state for a document with `page_count` pages, starting on
    /// page 1 at scale 1.0 in single-page layout.
    pub fn new(page_count: u32) -> Self {
        Self {
            page_count: page_count.max(1),
            current_index: 1,
            scale: 1.0,
            mode: LayoutMode::Single,
            flip_available: false,
        }
    }

    pub fn page_count(&self) -> u32 {
        self.page_count
    }

    pub fn current_index(&self) -> u32 {
        self.current_index
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn mode(&self) -> LayoutMode {
        self.mode
    }

    pub fn flip_available(&self) -> bool {
        self.flip_available
    }

    /// Clamp `index` into `[1, page_count]`, store and return it.
    pub fn set_current_index(&mut self, index: u32) -> u32 {
        self.current_index = index.clamp(1, self.page_count);
        self.current_index
    }

    /// Quantize `scale` to the step grid, clamp into
    /// `[SCALE_MIN, SCALE_MAX]`, store and return it.
    pub fn set_scale(&mut self, scale: f32) -> f32 {
        let quantized = (scale / SCALE_STEP).round() * SCALE_STEP;
        self.scale = quantized.clamp(SCALE_MIN, SCALE_MAX);
        self.scale
    }

    pub fn set_mode(&mut self, mode: LayoutMode) {
        self.mode = mode;
    }

    pub fn set_flip_available(&mut self, available: bool) {
        self.flip_available = available;
    }

    /// Index of the page leading the current view: the current page in
    /// single layout, the odd-indexed left page of the pair in spread
    /// layout. Derived, never stored.
    pub fn leading_index(&self) -> u32 {
        match self.mode {
            LayoutMode::Single => self.current_index,
            LayoutMode::Spread => normalize_to_left(self.current_index),
        }
    }

    /// Pages visible in the current layout.
    pub fn displayed_pages(&self) -> (u32, Option<u32>) {
        let leading = self.leading_index();
        match self.mode {
            LayoutMode::Single => (leading, None),
            LayoutMode::Spread => {
                let right = leading + 1;
                (leading, (right <= self.page_count).then_some(right))
            }
        }
    }

    /// Pages advanced by one prev/next step in the current layout.
    pub fn nav_step(&self) -> u32 {
        match self.mode {
            LayoutMode::Single => 1,
            LayoutMode::Spread => 2,
        }
    }
}

/// Left page of the spread containing `index`.
pub fn normalize_to_left(index: u32) -> u32 {
    if index % 2 == 1 {
        index
    } else {
        index.saturating_sub(1).max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_clamps_to_page_range() {
        let mut state = ViewState::new(10);
        assert_eq!(state.set_current_index(0), 1);
        assert_eq!(state.set_current_index(10), 10);
        assert_eq!(state.set_current_index(99), 10);
        assert_eq!(state.current_index(), 10);
    }

    #[test]
    fn every_page_is_reachable() {
        let mut state = ViewState::new(5);
        for i in 1..=5 {
            assert_eq!(state.set_current_index(i), i);
            assert_eq!(state.current_index(), i);
        }
    }

    #[test]
    fn zoom_steps_from_default_scale() {
        let mut state = ViewState::new(3);
        let mut seen = Vec::new();
        for _ in 0..3 {
            seen.push(state.set_scale(state.scale() + SCALE_STEP));
        }
        assert_eq!(seen, vec![1.25, 1.5, 1.75]);
    }

    #[test]
    fn scale_clamps_at_both_bounds() {
        let mut state = ViewState::new(3);
        assert_eq!(state.set_scale(9.0), SCALE_MAX);
        assert_eq!(state.set_scale(0.1), SCALE_MIN);
        // off-grid input snaps to the step grid
        assert_eq!(state.set_scale(1.13), 1.25);
    }

    #[test]
    fn spread_leading_page_is_always_odd() {
        let mut state = ViewState::new(10);
        state.set_mode(LayoutMode::Spread);
        for i in 1..=10 {
            state.set_current_index(i);
            assert_eq!(state.leading_index() % 2, 1, "leading for {} must be odd", i);
        }
    }

    #[test]
    fn spread_pair_for_even_selection() {
        // PageCount=10, currentIndex=4, spread -> pages {3, 4}
        let mut state = ViewState::new(10);
        state.set_mode(LayoutMode::Spread);
        state.set_current_index(4);
        assert_eq!(state.leading_index(), 3);
        assert_eq!(state.displayed_pages(), (3, Some(4)));
    }

    #[test]
    fn spread_pair_truncates_at_document_end() {
        let mut state = ViewState::new(9);
        state.set_mode(LayoutMode::Spread);
        state.set_current_index(9);
        assert_eq!(state.displayed_pages(), (9, None));
    }

    #[test]
    fn normalize_to_left_matches_definition() {
        assert_eq!(normalize_to_left(1), 1);
        assert_eq!(normalize_to_left(2), 1);
        assert_eq!(normalize_to_left(7), 7);
        assert_eq!(normalize_to_left(8), 7);
    }

    #[test]
    fn nav_step_follows_mode() {
        let mut state = ViewState::new(10);
        assert_eq!(state.nav_step(), 1);
        state.set_mode(LayoutMode::Spread);
        assert_eq!(state.nav_step(), 2);
    }

    #[test]
    fn mode_toggle_keeps_current_index() {
        let mut state = ViewState::new(10);
        state.set_current_index(6);
        state.set_mode(state.mode().toggled());
        assert_eq!(state.current_index(), 6);
        assert_eq!(state.mode(), LayoutMode::Spread);
    }
}
