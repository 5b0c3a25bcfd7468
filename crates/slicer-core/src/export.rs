//! Frame export.
//!
//! Writes each frame of a range to
//! `<output_root>/<sprite_name>/<animation_name>/<animation_name>_<n>.png`,
//! where `n` is the frame's offset from the range start.

use crate::grid::SpriteGrid;
use crate::range::{AnimationRange, AnimationRangeValidator};
use image::imageops;
use image::RgbaImage;
use serde::{Deserialize, Serialize};
use slicer_common::{SlicerError, SlicerResult};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Order in which frame offsets are written and numbered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportOrder {
    /// `1, 2, ..., len-1, 0`, matching asset sets exported by earlier versions
    /// of the tool
    #[default]
    Cyclic,
    /// `0, 1, ..., len-1`
    Sequential,
}

impl ExportOrder {
    /// Offsets from the range start, in write order.
    #[must_use]
    pub fn offsets(self, len: u32) -> Vec<u32> {
        match self {
            Self::Cyclic => (0..len).map(|i| (i + 1) % len).collect(),
            Self::Sequential => (0..len).collect(),
        }
    }
}

/// Destination for exported frames.
pub trait FrameSink {
    /// Creates `path` if it does not exist yet.
    fn ensure_dir(&mut self, path: &Path) -> SlicerResult<()>;

    /// Writes one frame to `path`.
    fn write_frame(&mut self, path: &Path, frame: &RgbaImage) -> SlicerResult<()>;
}

/// Writes PNG files to the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsSink;

impl FrameSink for FsSink {
    fn ensure_dir(&mut self, path: &Path) -> SlicerResult<()> {
        if !path.is_dir() {
            fs::create_dir(path)?;
            debug!("Created {}", path.display());
        }
        Ok(())
    }

    fn write_frame(&mut self, path: &Path, frame: &RgbaImage) -> SlicerResult<()> {
        frame.save_with_format(path, image::ImageFormat::Png)?;
        Ok(())
    }
}

/// Files produced by one export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportReport {
    /// `<output_root>/<sprite_name>/<animation_name>`
    pub directory: PathBuf,
    /// Every file written, in write order
    pub files: Vec<PathBuf>,
}

/// Crops a frame range out of a sheet and writes one file per frame.
#[derive(Debug, Clone, Default)]
pub struct Exporter<S = FsSink> {
    sink: S,
    order: ExportOrder,
}

impl Exporter<FsSink> {
    /// Creates an exporter writing to the filesystem.
    #[must_use]
    pub fn new(order: ExportOrder) -> Self {
        Self::with_sink(FsSink, order)
    }
}

impl<S: FrameSink> Exporter<S> {
    /// Creates an exporter writing through `sink`.
    pub fn with_sink(sink: S, order: ExportOrder) -> Self {
        Self { sink, order }
    }

    /// The sink frames are written to.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Directory an animation is exported into.
    #[must_use]
    pub fn animation_dir(output_root: &Path, sprite_name: &str, animation_name: &str) -> PathBuf {
        output_root.join(sprite_name).join(animation_name)
    }

    /// File name of the frame at `offset` from the range start.
    #[must_use]
    pub fn frame_file_name(animation_name: &str, offset: u32) -> String {
        format!("{animation_name}_{offset}.png")
    }

    /// Exports `range` of `sheet`.
    ///
    /// Nothing is written when `output_root` is not a directory or a name is
    /// empty. A failure while writing frames leaves the frames already
    /// written in place and reports how many there were.
    pub fn export(
        &mut self,
        sheet: &RgbaImage,
        grid: &SpriteGrid,
        range: AnimationRange,
        sprite_name: &str,
        animation_name: &str,
        output_root: &Path,
    ) -> SlicerResult<ExportReport> {
        if !output_root.is_dir() {
            return Err(SlicerError::InvalidPath(output_root.to_path_buf()));
        }
        if sprite_name.is_empty() || animation_name.is_empty() {
            return Err(SlicerError::MissingExportFields);
        }

        let range = AnimationRangeValidator::validate(
            i64::from(range.start()),
            i64::from(range.end()),
            grid.frame_count(),
        );

        let sprite_dir = output_root.join(sprite_name);
        self.sink.ensure_dir(&sprite_dir)?;
        let directory = sprite_dir.join(animation_name);
        self.sink.ensure_dir(&directory)?;

        let offsets = self.order.offsets(range.len());
        let total = offsets.len();
        let mut files = Vec::with_capacity(total);

        for offset in offsets {
            let rect = grid.index_to_sheet_rect(range.start() + offset);
            let frame = imageops::crop_imm(sheet, rect.left, rect.top, rect.width(), rect.height())
                .to_image();
            let path = directory.join(Self::frame_file_name(animation_name, offset));

            if let Err(e) = self.sink.write_frame(&path, &frame) {
                return Err(SlicerError::ExportInterrupted {
                    written: files.len(),
                    total,
                    source: Box::new(e),
                });
            }
            debug!("Wrote frame {} -> {}", range.start() + offset, path.display());
            files.push(path);
        }

        info!(
            "Exported {} frames ({}) to {}",
            files.len(),
            range,
            directory.display()
        );
        Ok(ExportReport { directory, files })
    }
}
