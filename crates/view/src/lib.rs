//! Pagination and viewport state.
//!
//! Owns the current page index and zoom level. Navigation past either
//! end and zoom past the clamp bounds are no-ops, never errors. Zoom is
//! stored in integer tenths so repeated stepping lands exactly on the
//! clamp edges.

use serde::{Deserialize, Serialize};

const ZOOM_MIN_TENTHS: u8 = 5;
const ZOOM_MAX_TENTHS: u8 = 20;
const ZOOM_DEFAULT_TENTHS: u8 = 10;

/// A snapshot of the viewport: 0-based page index and zoom factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewState {
    pub page_index: usize,
    zoom_tenths: u8,
}

impl ViewState {
    /// The zoom factor, in [0.5, 2.0].
    pub fn zoom(&self) -> f32 {
        self.zoom_tenths as f32 / 10.0
    }
}

/// Owns the view state for one session and exposes the navigation and
/// zoom operations. All transitions are synchronous and clamped.
#[derive(Debug, Clone)]
pub struct ViewController {
    page_count: usize,
    state: ViewState,
}

impl ViewController {
    pub fn new(page_count: usize) -> Self {
        Self {
            page_count,
            state: ViewState {
                page_index: 0,
                zoom_tenths: ZOOM_DEFAULT_TENTHS,
            },
        }
    }

    pub fn state(&self) -> ViewState {
        self.state
    }

    pub fn page_index(&self) -> usize {
        self.state.page_index
    }

    pub fn zoom(&self) -> f32 {
        self.state.zoom()
    }

    /// Re-clamp after the document is replaced (a commit may change the
    /// page count).
    pub fn set_page_count(&mut self, page_count: usize) {
        self.page_count = page_count;
        let last = page_count.saturating_sub(1);
        if self.state.page_index > last {
            self.state.page_index = last;
        }
    }

    pub fn next(&mut self) -> ViewState {
        if self.state.page_index + 1 < self.page_count {
            self.state.page_index += 1;
        }
        self.state
    }

    pub fn prev(&mut self) -> ViewState {
        if self.state.page_index > 0 {
            self.state.page_index -= 1;
        }
        self.state
    }

    pub fn zoom_in(&mut self) -> ViewState {
        if self.state.zoom_tenths < ZOOM_MAX_TENTHS {
            self.state.zoom_tenths += 1;
        }
        self.state
    }

    pub fn zoom_out(&mut self) -> ViewState {
        if self.state.zoom_tenths > ZOOM_MIN_TENTHS {
            self.state.zoom_tenths -= 1;
        }
        self.state
    }
}
