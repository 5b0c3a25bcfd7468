//! Square canvas packing for display and click selection.
//!
//! The source sheet is flattened onto an opaque fill, then every frame is
//! copied into a `canvas_size` x `canvas_size` grid of cells. Cells past the
//! last frame keep the dark background.

use crate::grid::SpriteGrid;
use crate::range::AnimationRange;
use image::imageops::{self, FilterType};
use image::{Rgb, RgbImage, RgbaImage};
use slicer_common::PixelRect;

/// Fill shown through transparent sheet pixels.
pub const TRANSPARENT_FILL: Rgb<u8> = Rgb([128, 128, 255]);
/// Background of cells holding no frame.
pub const CANVAS_BACKGROUND: Rgb<u8> = Rgb([32, 32, 32]);
/// Outline color of frames inside the active range.
pub const HIGHLIGHT_COLOR: Rgb<u8> = Rgb([255, 255, 0]);
/// Fill behind the animation preview.
pub const PREVIEW_BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);

/// Builds the packed display canvas.
#[derive(Debug, Clone, Copy, Default)]
pub struct CanvasPacker;

impl CanvasPacker {
    /// Packs `sheet` into the canvas layout of `grid`, outlining every frame
    /// inside `range`.
    ///
    /// The result is `canvas_size * frame_width` by
    /// `canvas_size * frame_height` pixels.
    #[must_use]
    pub fn pack(sheet: &RgbaImage, grid: &SpriteGrid, range: Option<AnimationRange>) -> RgbImage {
        let flattened = composite_over(sheet, TRANSPARENT_FILL);
        let (width, height) = grid.canvas_pixel_dimensions();
        let mut canvas = RgbImage::from_pixel(width, height, CANVAS_BACKGROUND);

        for idx in 0..grid.frame_count() {
            let src = grid.index_to_sheet_rect(idx);
            let dst = grid.index_to_canvas_rect(idx);

            let frame = imageops::crop_imm(&flattened, src.left, src.top, src.width(), src.height())
                .to_image();
            imageops::replace(&mut canvas, &frame, i64::from(dst.left), i64::from(dst.top));

            if range.is_some_and(|r| r.contains(idx)) {
                draw_highlight(&mut canvas, dst);
            }
        }

        tracing::debug!(
            "Packed {} frames into {}x{} canvas ({} cells per side)",
            grid.frame_count(),
            width,
            height,
            grid.canvas_size()
        );
        canvas
    }

    /// Resizes a packed canvas to the square on-screen size.
    #[must_use]
    pub fn scale_to_display(canvas: &RgbImage, display_size: u32) -> RgbImage {
        let side = display_size.max(1);
        imageops::resize(canvas, side, side, FilterType::Nearest)
    }
}

/// Blends `image` over an opaque `fill` using its alpha channel.
#[must_use]
pub fn composite_over(image: &RgbaImage, fill: Rgb<u8>) -> RgbImage {
    RgbImage::from_fn(image.width(), image.height(), |x, y| {
        let [r, g, b, a] = image.get_pixel(x, y).0;
        Rgb([
            blend_channel(r, fill[0], a),
            blend_channel(g, fill[1], a),
            blend_channel(b, fill[2], a),
        ])
    })
}

fn blend_channel(src: u8, dst: u8, alpha: u8) -> u8 {
    let a = u32::from(alpha);
    let value = u32::from(src) * a + u32::from(dst) * (255 - a);
    ((value + 127) / 255) as u8
}

/// Outlines a cell from one pixel inside its top-left corner to its last
/// pixel row and column.
fn draw_highlight(canvas: &mut RgbImage, cell: PixelRect) {
    let left = cell.left + 1;
    let top = cell.top + 1;
    let right = cell.right.saturating_sub(1);
    let bottom = cell.bottom.saturating_sub(1);
    if left > right || top > bottom || right >= canvas.width() || bottom >= canvas.height() {
        return;
    }

    for x in left..=right {
        canvas.put_pixel(x, top, HIGHLIGHT_COLOR);
        canvas.put_pixel(x, bottom, HIGHLIGHT_COLOR);
    }
    for y in top..=bottom {
        canvas.put_pixel(left, y, HIGHLIGHT_COLOR);
        canvas.put_pixel(right, y, HIGHLIGHT_COLOR);
    }
}
