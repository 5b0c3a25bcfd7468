//! Loaded sprite sheets.

use image::RgbaImage;
use slicer_common::{SlicerError, SlicerResult};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// A decoded sprite sheet and the path it came from.
///
/// Pixels are shared so preview snapshots can hold the sheet without
/// copying it.
#[derive(Debug, Clone)]
pub struct SpriteSheet {
    path: PathBuf,
    image: Arc<RgbaImage>,
}

impl SpriteSheet {
    /// Decodes the image at `path` into RGBA.
    ///
    /// Sheets without an alpha channel are treated as fully opaque.
    pub fn open<P: AsRef<Path>>(path: P) -> SlicerResult<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(SlicerError::InvalidPath(path.to_path_buf()));
        }

        let image = image::open(path)?.to_rgba8();
        tracing::debug!(
            "Decoded {} ({}x{})",
            path.display(),
            image.width(),
            image.height()
        );
        Ok(Self::from_image(path, image))
    }

    /// Wraps an already decoded image.
    pub fn from_image<P: Into<PathBuf>>(path: P, image: RgbaImage) -> Self {
        Self {
            path: path.into(),
            image: Arc::new(image),
        }
    }

    /// Path the sheet was loaded from.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Sheet pixels.
    #[must_use]
    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Shared handle to the sheet pixels.
    #[must_use]
    pub fn shared(&self) -> Arc<RgbaImage> {
        Arc::clone(&self.image)
    }

    /// Width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.image.height()
    }
}
