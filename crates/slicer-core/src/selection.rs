//! Two-click range selection on the packed canvas.

use crate::grid::SpriteGrid;

/// Selection progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionState {
    /// Waiting for the first click
    #[default]
    Empty,
    /// First click landed on this frame index
    FirstPicked(u32),
}

/// Range requested by a completed pair of clicks, `start <= end`.
///
/// Indices come straight from canvas positions and may lie past the last
/// frame; the range validator clamps them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeRequest {
    /// Smaller of the two picked indices
    pub start: u32,
    /// Larger of the two picked indices
    pub end: u32,
}

/// Turns successive canvas clicks into range requests.
#[derive(Debug, Clone, Default)]
pub struct SelectionController {
    state: SelectionState,
}

impl SelectionController {
    /// Creates a controller waiting for its first click.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> SelectionState {
        self.state
    }

    /// Feeds a picked frame index.
    ///
    /// Returns a request on every second pick and goes back to
    /// [`SelectionState::Empty`].
    pub fn pick(&mut self, idx: u32) -> Option<RangeRequest> {
        match std::mem::take(&mut self.state) {
            SelectionState::Empty => {
                self.state = SelectionState::FirstPicked(idx);
                None
            },
            SelectionState::FirstPicked(first) => Some(RangeRequest {
                start: first.min(idx),
                end: first.max(idx),
            }),
        }
    }

    /// Feeds a click at (x, y) on a square canvas `canvas_pixel_size` wide.
    pub fn click(
        &mut self,
        x: u32,
        y: u32,
        canvas_pixel_size: u32,
        grid: &SpriteGrid,
    ) -> Option<RangeRequest> {
        let idx = grid.canvas_pos_to_index(x, y, canvas_pixel_size);
        tracing::debug!("Canvas click ({x}, {y}) -> frame {idx}");
        self.pick(idx)
    }

    /// Drops a pending first pick.
    pub fn reset(&mut self) {
        self.state = SelectionState::Empty;
    }
}
