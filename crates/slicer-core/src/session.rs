//! Slicing session.
//!
//! Holds everything a front end needs between user actions: the loaded
//! sheet, the edit fields, the derived grid and range, the pending click
//! selection and the status line. Each user action is one method call;
//! every failure is also written to the status line and leaves the session
//! usable.

use crate::canvas::CanvasPacker;
use crate::config::SlicerConfig;
use crate::export::{ExportReport, Exporter};
use crate::grid::SpriteGrid;
use crate::preview::{AnimationPreview, PreviewSnapshot};
use crate::range::{AnimationRange, AnimationRangeValidator, EditFields};
use crate::selection::{SelectionController, SelectionState};
use crate::sheet::SpriteSheet;
use image::RgbImage;
use slicer_common::{GeometryError, SlicerError, SlicerResult};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// How a status message should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Neutral progress
    Info,
    /// An action completed
    Success,
    /// Something was adjusted or skipped
    Warning,
    /// An action failed
    Error,
}

/// Short human-readable result of the last action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    /// Presentation hint
    pub severity: Severity,
    /// Message text
    pub text: String,
}

impl StatusMessage {
    fn new(severity: Severity, text: impl Into<String>) -> Self {
        Self {
            severity,
            text: text.into(),
        }
    }
}

impl std::fmt::Display for StatusMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}

/// State carried between user actions.
#[derive(Debug)]
pub struct SessionState {
    config: SlicerConfig,
    fields: EditFields,
    sheet: Option<SpriteSheet>,
    grid: Option<SpriteGrid>,
    range: AnimationRange,
    selection: SelectionController,
    preview: AnimationPreview,
    output_dir: Option<PathBuf>,
    canvas: Option<RgbImage>,
    status: StatusMessage,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new(SlicerConfig::default())
    }
}

impl SessionState {
    /// Creates an empty session with fields seeded from `config`.
    #[must_use]
    pub fn new(config: SlicerConfig) -> Self {
        let fields = EditFields {
            frame_width: i64::from(config.frame_width),
            frame_height: i64::from(config.frame_height),
            fps: i64::from(config.fps),
            ..EditFields::default()
        };
        let preview = AnimationPreview::new(config.fps);

        Self {
            config,
            fields,
            sheet: None,
            grid: None,
            range: AnimationRange::default(),
            selection: SelectionController::new(),
            preview,
            output_dir: None,
            canvas: None,
            status: StatusMessage::new(Severity::Info, "Ready"),
        }
    }

    /// Configuration the session was created with.
    #[must_use]
    pub fn config(&self) -> &SlicerConfig {
        &self.config
    }

    /// Current edit field values.
    #[must_use]
    pub fn fields(&self) -> &EditFields {
        &self.fields
    }

    /// Mutable edit fields; changes take effect on the next [`Self::update`].
    pub fn fields_mut(&mut self) -> &mut EditFields {
        &mut self.fields
    }

    /// Loaded sheet, if any.
    #[must_use]
    pub fn sheet(&self) -> Option<&SpriteSheet> {
        self.sheet.as_ref()
    }

    /// Grid of the last successful update.
    #[must_use]
    pub fn grid(&self) -> Option<&SpriteGrid> {
        self.grid.as_ref()
    }

    /// Active animation range.
    #[must_use]
    pub fn range(&self) -> AnimationRange {
        self.range
    }

    /// Pending click selection.
    #[must_use]
    pub fn selection_state(&self) -> SelectionState {
        self.selection.state()
    }

    /// Preview cursor and rate.
    #[must_use]
    pub fn preview(&self) -> &AnimationPreview {
        &self.preview
    }

    /// Chosen output directory.
    #[must_use]
    pub fn output_dir(&self) -> Option<&Path> {
        self.output_dir.as_deref()
    }

    /// Packed canvas at native frame resolution.
    #[must_use]
    pub fn canvas(&self) -> Option<&RgbImage> {
        self.canvas.as_ref()
    }

    /// Packed canvas scaled to the configured display size.
    #[must_use]
    pub fn display_canvas(&self) -> Option<RgbImage> {
        self.canvas
            .as_ref()
            .map(|canvas| CanvasPacker::scale_to_display(canvas, self.config.display_size))
    }

    /// Result of the last action.
    #[must_use]
    pub fn status(&self) -> &StatusMessage {
        &self.status
    }

    /// Loads a sprite sheet and recomputes everything derived from it.
    ///
    /// On a bad path or undecodable file the previous sheet stays loaded.
    pub fn load_sheet<P: AsRef<Path>>(&mut self, path: P) -> SlicerResult<()> {
        match SpriteSheet::open(path) {
            Ok(sheet) => {
                info!(
                    "Loaded sprite sheet {} ({}x{})",
                    sheet.path().display(),
                    sheet.width(),
                    sheet.height()
                );
                self.sheet = Some(sheet);
                self.update()
            },
            Err(e) => Err(self.fail(e)),
        }
    }

    /// Sets the export root; an invalid path keeps the previous one.
    pub fn set_output_dir<P: Into<PathBuf>>(&mut self, path: P) -> SlicerResult<()> {
        let path = path.into();
        if !path.is_dir() {
            return Err(self.fail(SlicerError::InvalidPath(path)));
        }

        info!("Output directory set to {}", path.display());
        self.output_dir = Some(path);
        self.status = StatusMessage::new(Severity::Success, "Set output directory success");
        Ok(())
    }

    /// Re-validates the fields, recomputes the grid, range and canvas, and
    /// drops any pending click.
    pub fn update(&mut self) -> SlicerResult<()> {
        let Some((width, height)) = self.sheet.as_ref().map(|s| (s.width(), s.height())) else {
            return Err(self.fail(GeometryError::NoSheetLoaded.into()));
        };

        let validated = AnimationRangeValidator::validate_fields(&self.fields);
        self.preview.set_fps(validated.fps);
        self.selection.reset();

        let grid = match SpriteGrid::compute(width, height, validated.frame) {
            Ok(grid) => grid,
            Err(e) => {
                self.grid = None;
                self.canvas = None;
                return Err(self.fail(e.into()));
            },
        };

        let range = AnimationRangeValidator::apply_range(&mut self.fields, grid.frame_count());
        self.range = range;
        self.canvas = self
            .sheet
            .as_ref()
            .map(|sheet| CanvasPacker::pack(sheet.image(), &grid, Some(range)));
        self.grid = Some(grid);

        info!(
            "Update done: {}x{} frames of {}, range {}",
            grid.n_cols(),
            grid.n_rows(),
            grid.frame(),
            range
        );
        self.status = StatusMessage::new(Severity::Info, "Update done");
        Ok(())
    }

    /// Handles a click at (x, y) on the display canvas.
    ///
    /// The second click commits a range, runs [`Self::update`] and returns
    /// the validated range.
    pub fn click(&mut self, x: u32, y: u32) -> SlicerResult<Option<AnimationRange>> {
        let Some(grid) = self.grid else {
            return Err(self.fail(GeometryError::NoSheetLoaded.into()));
        };

        match self.selection.click(x, y, self.config.display_size, &grid) {
            None => {
                if let SelectionState::FirstPicked(idx) = self.selection.state() {
                    self.status = StatusMessage::new(Severity::Info, format!("First frame {idx}"));
                }
                Ok(None)
            },
            Some(request) => {
                self.fields.start = i64::from(request.start);
                self.fields.end = i64::from(request.end);
                self.update()?;
                info!("Selected frames {}", self.range);
                Ok(Some(self.range))
            },
        }
    }

    /// Exports the active range under the output directory.
    ///
    /// Runs [`Self::update`] first. On success the animation name field is
    /// cleared, ready for the next animation.
    pub fn export(&mut self) -> SlicerResult<ExportReport> {
        self.update()?;
        let (Some(grid), Some(sheet)) = (self.grid, self.sheet.as_ref().map(SpriteSheet::shared))
        else {
            return Err(self.fail(GeometryError::NoSheetLoaded.into()));
        };

        let Some(output_root) = self.output_dir.clone() else {
            return Err(self.fail(SlicerError::MissingOutputDir));
        };
        let result = Exporter::new(self.config.export_order).export(
            &sheet,
            &grid,
            self.range,
            &self.fields.sprite_name,
            &self.fields.animation_name,
            &output_root,
        );

        match result {
            Ok(report) => {
                self.fields.animation_name.clear();
                self.status = StatusMessage::new(
                    Severity::Success,
                    format!("Export to {}", report.directory.display()),
                );
                Ok(report)
            },
            Err(e) => Err(self.fail(e)),
        }
    }

    /// Captures the sheet, grid and range for preview playback.
    #[must_use]
    pub fn preview_snapshot(&self) -> Option<PreviewSnapshot> {
        let grid = self.grid?;
        let sheet = self.sheet.as_ref()?;
        Some(PreviewSnapshot::new(sheet.shared(), grid, self.range))
    }

    /// Advances the preview one frame and renders it at the configured
    /// preview size. Returns the sheet frame index shown with the image.
    pub fn tick_preview(&mut self) -> Option<(u32, RgbImage)> {
        let snapshot = self.preview_snapshot()?;
        let cursor = self.preview.advance(snapshot.range());
        Some((
            snapshot.frame_index(cursor),
            snapshot.render(cursor, self.config.preview_size),
        ))
    }

    fn fail(&mut self, error: SlicerError) -> SlicerError {
        warn!("{error}");
        let severity = match error {
            SlicerError::MissingOutputDir | SlicerError::MissingExportFields => Severity::Warning,
            _ => Severity::Error,
        };
        self.status = StatusMessage::new(severity, error.to_string());
        error
    }
}
