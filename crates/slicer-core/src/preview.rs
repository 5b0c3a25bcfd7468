//! Looping animation preview.
//!
//! Provides:
//! - the preview cursor, advanced once per tick
//! - immutable snapshots that ticks render from
//! - a fixed-period clock for driving ticks

use crate::canvas::{composite_over, PREVIEW_BACKGROUND};
use crate::grid::SpriteGrid;
use crate::range::AnimationRange;
use image::imageops::{self, FilterType};
use image::{RgbImage, RgbaImage};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Preview cursor and playback rate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnimationPreview {
    cursor: u32,
    fps: u32,
}

impl Default for AnimationPreview {
    fn default() -> Self {
        Self::new(4)
    }
}

impl AnimationPreview {
    /// Creates a preview at `fps` frames per second (at least 1).
    #[must_use]
    pub fn new(fps: u32) -> Self {
        Self {
            cursor: 0,
            fps: fps.max(1),
        }
    }

    /// Playback rate.
    #[must_use]
    pub fn fps(&self) -> u32 {
        self.fps
    }

    /// Sets the playback rate (at least 1).
    pub fn set_fps(&mut self, fps: u32) {
        self.fps = fps.max(1);
    }

    /// Time between ticks, `1000 / fps` whole milliseconds.
    #[must_use]
    pub fn period(&self) -> Duration {
        Duration::from_millis(u64::from(1000 / self.fps))
    }

    /// Offset of the frame currently shown, relative to the range start.
    #[must_use]
    pub fn cursor(&self) -> u32 {
        self.cursor
    }

    /// Moves to the next frame of `range`, wrapping to its start.
    pub fn advance(&mut self, range: AnimationRange) -> u32 {
        self.cursor = (self.cursor + 1) % range.len();
        self.cursor
    }

    /// Rewinds to the range start.
    pub fn reset(&mut self) {
        self.cursor = 0;
    }
}

/// Sheet, grid and range as they were when playback started.
#[derive(Debug, Clone)]
pub struct PreviewSnapshot {
    sheet: Arc<RgbaImage>,
    grid: SpriteGrid,
    range: AnimationRange,
}

impl PreviewSnapshot {
    /// Captures a snapshot.
    #[must_use]
    pub fn new(sheet: Arc<RgbaImage>, grid: SpriteGrid, range: AnimationRange) -> Self {
        Self { sheet, grid, range }
    }

    /// Range being previewed.
    #[must_use]
    pub fn range(&self) -> AnimationRange {
        self.range
    }

    /// Grid the range refers to.
    #[must_use]
    pub fn grid(&self) -> &SpriteGrid {
        &self.grid
    }

    /// Sheet frame index shown at `cursor`.
    #[must_use]
    pub fn frame_index(&self, cursor: u32) -> u32 {
        self.range.start() + cursor % self.range.len()
    }

    /// Renders the frame at `cursor`, scaled to fit a `box_size` square.
    #[must_use]
    pub fn render(&self, cursor: u32, box_size: u32) -> RgbImage {
        render_preview_frame(&self.sheet, &self.grid, self.range, cursor, box_size)
    }
}

/// Crops frame `range.start + cursor`, flattens it over white and scales it
/// so its longer side is `box_size` pixels.
#[must_use]
pub fn render_preview_frame(
    sheet: &RgbaImage,
    grid: &SpriteGrid,
    range: AnimationRange,
    cursor: u32,
    box_size: u32,
) -> RgbImage {
    let idx = range.start() + cursor % range.len();
    let rect = grid.index_to_sheet_rect(idx);
    let frame = imageops::crop_imm(sheet, rect.left, rect.top, rect.width(), rect.height()).to_image();
    let flattened = composite_over(&frame, PREVIEW_BACKGROUND);

    let longest = rect.width().max(rect.height()).max(1);
    let ratio = f64::from(box_size) / f64::from(longest);
    let width = ((f64::from(rect.width()) * ratio) as u32).max(1);
    let height = ((f64::from(rect.height()) * ratio) as u32).max(1);
    imageops::resize(&flattened, width, height, FilterType::Nearest)
}

/// Fixed-period tick scheduler for preview playback.
#[derive(Debug)]
pub struct PreviewClock {
    /// Time between ticks
    period: Duration,
    /// Start of the current tick
    last_tick: Instant,
}

impl PreviewClock {
    /// Creates a clock ticking every `period`.
    #[must_use]
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            last_tick: Instant::now(),
        }
    }

    /// Time between ticks.
    #[must_use]
    pub fn period(&self) -> Duration {
        self.period
    }

    /// Marks the start of a tick.
    pub fn mark(&mut self) {
        self.last_tick = Instant::now();
    }

    /// Sleeps for whatever is left of the current period.
    pub fn sleep_remainder(&self) {
        let elapsed = self.last_tick.elapsed();
        if elapsed < self.period {
            std::thread::sleep(self.period - elapsed);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::range::AnimationRangeValidator;
    use image::{Rgb, Rgba};
    use slicer_common::FrameSize;

    fn snapshot() -> PreviewSnapshot {
        // 4 frames of 4x2 pixels in a row; frame i has green = i * 50.
        let sheet = RgbaImage::from_fn(16, 2, |x, _| Rgba([0, (x / 4 * 50) as u8, 0, 255]));
        let grid = SpriteGrid::compute(16, 2, FrameSize::new(4, 2)).expect("grid");
        let range = AnimationRangeValidator::validate(1, 3, grid.frame_count());
        PreviewSnapshot::new(Arc::new(sheet), grid, range)
    }

    #[test]
    fn test_period_from_fps() {
        assert_eq!(AnimationPreview::new(4).period(), Duration::from_millis(250));
        assert_eq!(AnimationPreview::new(3).period(), Duration::from_millis(333));
        assert_eq!(AnimationPreview::new(0).fps(), 1);
    }

    #[test]
    fn test_advance_wraps() {
        let range = AnimationRangeValidator::validate(5, 7, 16);
        let mut preview = AnimationPreview::new(4);
        let shown: Vec<u32> = (0..4).map(|_| preview.advance(range)).collect();
        assert_eq!(shown, vec![1, 2, 0, 1]);
    }

    #[test]
    fn test_advance_single_frame() {
        let mut preview = AnimationPreview::default();
        assert_eq!(preview.advance(AnimationRange::single(3)), 0);
        assert_eq!(preview.advance(AnimationRange::single(3)), 0);
    }

    #[test]
    fn test_snapshot_frame_index() {
        let snap = snapshot();
        assert_eq!(snap.frame_index(0), 1);
        assert_eq!(snap.frame_index(2), 3);
        // Stale cursor from a longer range still lands inside.
        assert_eq!(snap.frame_index(4), 2);
    }

    #[test]
    fn test_render_scales_longest_side() {
        let snap = snapshot();
        let frame = snap.render(1, 40);
        assert_eq!(frame.dimensions(), (40, 20));
        assert_eq!(frame.get_pixel(10, 10), &Rgb([0, 100, 0]));
    }

    #[test]
    fn test_render_over_white() {
        let sheet = RgbaImage::from_pixel(4, 4, Rgba([0, 0, 0, 0]));
        let grid = SpriteGrid::compute(4, 4, FrameSize::new(4, 4)).expect("grid");
        let frame = render_preview_frame(&sheet, &grid, AnimationRange::single(0), 0, 8);
        assert_eq!(frame.dimensions(), (8, 8));
        assert_eq!(frame.get_pixel(4, 4), &PREVIEW_BACKGROUND);
    }

    #[test]
    fn test_clock_sleeps_out_period() {
        let mut clock = PreviewClock::new(Duration::from_millis(10));
        clock.mark();
        let started = Instant::now();
        clock.sleep_remainder();
        assert!(started.elapsed() >= Duration::from_millis(9));
    }
}
