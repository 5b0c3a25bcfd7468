//! Sprite grid geometry.
//!
//! Maps between three coordinate spaces:
//! - pixel rectangles in the source sheet,
//! - linear frame indices (row-major),
//! - cells of the square display canvas.
//!
//! The sheet and the canvas are both row-major but use different row widths
//! (`n_cols` vs `canvas_size`), so the same frame index usually lands in a
//! different row and column in each.

use slicer_common::{FrameSize, GeometryError, GridCell, PixelRect};

/// Grid shape derived from a sheet size and a frame size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpriteGrid {
    sheet_width: u32,
    sheet_height: u32,
    frame: FrameSize,
    n_rows: u32,
    n_cols: u32,
    frame_count: u32,
    canvas_size: u32,
}

impl SpriteGrid {
    /// Computes the grid for a `sheet_width` x `sheet_height` sheet.
    ///
    /// Trailing partial rows and columns are dropped so every frame lies
    /// fully inside the sheet.
    pub fn compute(
        sheet_width: u32,
        sheet_height: u32,
        frame: FrameSize,
    ) -> Result<Self, GeometryError> {
        if frame.is_empty() {
            return Err(GeometryError::ZeroFrameSize {
                width: frame.width,
                height: frame.height,
            });
        }

        let n_cols = sheet_width / frame.width;
        let n_rows = sheet_height / frame.height;
        let frame_count = n_rows.saturating_mul(n_cols);
        if frame_count == 0 {
            return Err(GeometryError::EmptyGrid {
                sheet_width,
                sheet_height,
                frame_width: frame.width,
                frame_height: frame.height,
            });
        }

        Ok(Self {
            sheet_width,
            sheet_height,
            frame,
            n_rows,
            n_cols,
            frame_count,
            canvas_size: canvas_size_for(frame_count),
        })
    }

    /// Sheet width in pixels.
    #[must_use]
    pub const fn sheet_width(&self) -> u32 {
        self.sheet_width
    }

    /// Sheet height in pixels.
    #[must_use]
    pub const fn sheet_height(&self) -> u32 {
        self.sheet_height
    }

    /// Size of one frame.
    #[must_use]
    pub const fn frame(&self) -> FrameSize {
        self.frame
    }

    /// Full rows of frames in the sheet.
    #[must_use]
    pub const fn n_rows(&self) -> u32 {
        self.n_rows
    }

    /// Full columns of frames in the sheet.
    #[must_use]
    pub const fn n_cols(&self) -> u32 {
        self.n_cols
    }

    /// Number of addressable frames.
    #[must_use]
    pub const fn frame_count(&self) -> u32 {
        self.frame_count
    }

    /// Side of the square canvas, in cells.
    #[must_use]
    pub const fn canvas_size(&self) -> u32 {
        self.canvas_size
    }

    /// Whether `idx` addresses a frame.
    #[must_use]
    pub const fn contains(&self, idx: u32) -> bool {
        idx < self.frame_count
    }

    /// Pixel dimensions of the packed canvas at native frame resolution.
    #[must_use]
    pub const fn canvas_pixel_dimensions(&self) -> (u32, u32) {
        (
            self.canvas_size * self.frame.width,
            self.canvas_size * self.frame.height,
        )
    }

    /// Crop rectangle of frame `idx` in the source sheet.
    #[must_use]
    pub const fn index_to_sheet_rect(&self, idx: u32) -> PixelRect {
        GridCell::from_index(idx, self.n_cols).to_rect(self.frame)
    }

    /// Rectangle of frame `idx` in the packed canvas.
    #[must_use]
    pub const fn index_to_canvas_rect(&self, idx: u32) -> PixelRect {
        GridCell::from_index(idx, self.canvas_size).to_rect(self.frame)
    }

    /// Maps a position on a square canvas `canvas_pixel_size` pixels wide to a
    /// frame index.
    ///
    /// The result is not checked against `frame_count`: clicks in the unused
    /// tail of the canvas yield indices past the last frame.
    #[must_use]
    pub fn canvas_pos_to_index(&self, x: u32, y: u32, canvas_pixel_size: u32) -> u32 {
        self.canvas_pos_to_index_in(x, y, canvas_pixel_size, canvas_pixel_size)
    }

    /// Like [`Self::canvas_pos_to_index`] for a canvas with distinct width and
    /// height, such as the native canvas of non-square frames.
    #[must_use]
    pub fn canvas_pos_to_index_in(
        &self,
        x: u32,
        y: u32,
        canvas_width: u32,
        canvas_height: u32,
    ) -> u32 {
        let cells = f64::from(self.canvas_size);
        let cell_w = f64::from(canvas_width) / cells;
        let cell_h = f64::from(canvas_height) / cells;

        let row = (f64::from(y) / cell_h).floor() as u32;
        let col = (f64::from(x) / cell_w).floor() as u32;
        row.saturating_mul(self.canvas_size).saturating_add(col)
    }
}

/// Smallest integer strictly greater than `sqrt(frame_count)`.
fn canvas_size_for(frame_count: u32) -> u32 {
    let n = u64::from(frame_count);
    let mut root = (n as f64).sqrt() as u64;
    while root * root > n {
        root -= 1;
    }
    while (root + 1) * (root + 1) <= n {
        root += 1;
    }
    (root + 1) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn grid(w: u32, h: u32, fw: u32, fh: u32) -> SpriteGrid {
        SpriteGrid::compute(w, h, FrameSize::new(fw, fh)).expect("valid grid")
    }

    #[test]
    fn test_square_sheet() {
        let g = grid(128, 128, 32, 32);
        assert_eq!(g.n_rows(), 4);
        assert_eq!(g.n_cols(), 4);
        assert_eq!(g.frame_count(), 16);
        assert_eq!(g.canvas_size(), 5);
        assert_eq!(g.canvas_pixel_dimensions(), (160, 160));
    }

    #[test]
    fn test_partial_frames_dropped() {
        let g = grid(100, 70, 32, 32);
        assert_eq!(g.n_cols(), 3);
        assert_eq!(g.n_rows(), 2);
        assert_eq!(g.frame_count(), 6);
        assert_eq!(g.canvas_size(), 3);
    }

    #[test]
    fn test_zero_frame_rejected() {
        let err = SpriteGrid::compute(128, 128, FrameSize::new(0, 32));
        assert_eq!(
            err,
            Err(GeometryError::ZeroFrameSize {
                width: 0,
                height: 32
            })
        );
    }

    #[test]
    fn test_sheet_smaller_than_frame() {
        let err = SpriteGrid::compute(16, 16, FrameSize::new(32, 32));
        assert!(matches!(err, Err(GeometryError::EmptyGrid { .. })));
    }

    #[test]
    fn test_sheet_vs_canvas_rects() {
        // 8 columns in the sheet, 5 in the canvas.
        let g = grid(256, 64, 32, 32);
        assert_eq!(g.frame_count(), 16);
        assert_eq!(g.canvas_size(), 5);

        assert_eq!(g.index_to_sheet_rect(6), PixelRect::new(192, 0, 224, 32));
        assert_eq!(g.index_to_canvas_rect(6), PixelRect::new(32, 32, 64, 64));
        assert_eq!(g.index_to_sheet_rect(9), PixelRect::new(32, 32, 64, 64));
    }

    #[test]
    fn test_click_origin() {
        let g = grid(128, 128, 32, 32);
        // 5x5 canvas, 20px cells
        assert_eq!(g.canvas_pos_to_index(0, 0, 100), 0);
        assert_eq!(g.canvas_pos_to_index(19, 19, 100), 0);
        assert_eq!(g.canvas_pos_to_index(20, 0, 100), 1);
        assert_eq!(g.canvas_pos_to_index(0, 20, 100), 5);
    }

    #[test]
    fn test_click_in_padding_not_clamped() {
        let g = grid(128, 128, 32, 32);
        let idx = g.canvas_pos_to_index(99, 99, 100);
        assert_eq!(idx, 24);
        assert!(!g.contains(idx));
    }

    #[test]
    fn test_canvas_size_perfect_squares() {
        assert_eq!(canvas_size_for(1), 2);
        assert_eq!(canvas_size_for(3), 2);
        assert_eq!(canvas_size_for(4), 3);
        assert_eq!(canvas_size_for(15), 4);
        assert_eq!(canvas_size_for(16), 5);
        assert_eq!(canvas_size_for(u32::MAX), 65536);
    }

    proptest! {
        #[test]
        fn prop_grid_fits_sheet(
            w in 1u32..4096,
            h in 1u32..4096,
            fw in 1u32..256,
            fh in 1u32..256,
        ) {
            if let Ok(g) = SpriteGrid::compute(w, h, FrameSize::new(fw, fh)) {
                prop_assert!(g.n_rows() * fh <= h);
                prop_assert!(g.n_cols() * fw <= w);
                prop_assert!(g.canvas_size() * g.canvas_size() >= g.frame_count());
                let last = g.index_to_sheet_rect(g.frame_count() - 1);
                prop_assert!(last.fits_within(w, h));
            }
        }

        #[test]
        fn prop_canvas_center_roundtrip(
            w in 1u32..256,
            h in 1u32..256,
            fw in 4u32..64,
            fh in 4u32..64,
        ) {
            if let Ok(g) = SpriteGrid::compute(w, h, FrameSize::new(fw, fh)) {
                let (cw, ch) = g.canvas_pixel_dimensions();
                for idx in 0..g.frame_count() {
                    let (x, y) = g.index_to_canvas_rect(idx).center();
                    prop_assert_eq!(g.canvas_pos_to_index_in(x, y, cw, ch), idx);
                }
            }
        }

        #[test]
        fn prop_square_canvas_roundtrip(w in 1u32..256, h in 1u32..256, size in 1u32..48) {
            if let Ok(g) = SpriteGrid::compute(w, h, FrameSize::new(size, size)) {
                let (side, _) = g.canvas_pixel_dimensions();
                for idx in 0..g.frame_count() {
                    let (x, y) = g.index_to_canvas_rect(idx).center();
                    prop_assert_eq!(g.canvas_pos_to_index(x, y, side), idx);
                }
            }
        }
    }
}
