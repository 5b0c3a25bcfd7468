//! Pixel and grid-cell coordinate types.

use serde::{Deserialize, Serialize};

/// Size of one frame in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FrameSize {
    /// Frame width in pixels
    pub width: u32,
    /// Frame height in pixels
    pub height: u32,
}

impl FrameSize {
    /// Creates a new frame size.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Returns true if either side is zero.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl Default for FrameSize {
    fn default() -> Self {
        Self::new(32, 32)
    }
}

impl std::fmt::Display for FrameSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Cell position in a row-major grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridCell {
    /// Row (y) of the cell
    pub row: u32,
    /// Column (x) of the cell
    pub col: u32,
}

impl GridCell {
    /// Creates a new grid cell.
    #[must_use]
    pub const fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }

    /// Creates from a linear row-major index in a grid `columns` wide.
    #[must_use]
    pub const fn from_index(index: u32, columns: u32) -> Self {
        Self {
            row: index / columns,
            col: index % columns,
        }
    }

    /// Converts to a linear row-major index in a grid `columns` wide.
    #[must_use]
    pub const fn to_index(self, columns: u32) -> u32 {
        self.row * columns + self.col
    }

    /// Pixel rectangle this cell covers when every cell is `size` pixels.
    #[must_use]
    pub const fn to_rect(self, size: FrameSize) -> PixelRect {
        let left = self.col * size.width;
        let top = self.row * size.height;
        PixelRect {
            left,
            top,
            right: left + size.width,
            bottom: top + size.height,
        }
    }
}

/// Axis-aligned pixel rectangle, `right` and `bottom` exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PixelRect {
    /// Left edge (inclusive)
    pub left: u32,
    /// Top edge (inclusive)
    pub top: u32,
    /// Right edge (exclusive)
    pub right: u32,
    /// Bottom edge (exclusive)
    pub bottom: u32,
}

impl PixelRect {
    /// Creates a rectangle from its four edges.
    #[must_use]
    pub const fn new(left: u32, top: u32, right: u32, bottom: u32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Width in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.right.saturating_sub(self.left)
    }

    /// Height in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.bottom.saturating_sub(self.top)
    }

    /// Center pixel, rounded towards the top-left.
    #[must_use]
    pub const fn center(&self) -> (u32, u32) {
        (
            self.left + self.width() / 2,
            self.top + self.height() / 2,
        )
    }

    /// Checks whether the pixel (x, y) lies inside.
    #[must_use]
    pub const fn contains(&self, x: u32, y: u32) -> bool {
        x >= self.left && x < self.right && y >= self.top && y < self.bottom
    }

    /// Checks whether this rectangle lies fully inside a `width` x `height` image.
    #[must_use]
    pub const fn fits_within(&self, width: u32, height: u32) -> bool {
        self.right <= width && self.bottom <= height
    }
}

impl std::fmt::Display for PixelRect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "({}, {}, {}, {})",
            self.left, self.top, self.right, self.bottom
        )
    }
}
