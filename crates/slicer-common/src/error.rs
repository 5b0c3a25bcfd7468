//! Error types for the sprite sheet slicer.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for slicer operations.
#[derive(Debug, Error)]
pub enum SlicerError {
    /// Frame geometry cannot produce a usable grid
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(#[from] GeometryError),

    /// Sheet path or output directory missing or of the wrong kind
    #[error("Path not found or not usable: {}", .0.display())]
    InvalidPath(PathBuf),

    /// Export requested before an output directory was chosen
    #[error("Set output directory before export")]
    MissingOutputDir,

    /// Sprite name or animation name left empty at export time
    #[error("Set sprite name and animation name before export")]
    MissingExportFields,

    /// A frame write failed after some frames were already on disk
    #[error("Export interrupted after {written} of {total} frames: {source}")]
    ExportInterrupted {
        /// Frames written before the failure
        written: usize,
        /// Frames the export intended to write
        total: usize,
        /// The failure that stopped the export
        #[source]
        source: Box<SlicerError>,
    },

    /// Image decode/encode errors
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file errors
    #[error("Config error: {0}")]
    Config(String),
}

/// Reasons a grid cannot be computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GeometryError {
    /// Frame width or height is zero
    #[error("frame size must be positive, got {width}x{height}")]
    ZeroFrameSize {
        /// Requested frame width
        width: u32,
        /// Requested frame height
        height: u32,
    },

    /// No sprite sheet has been loaded yet
    #[error("no sprite sheet loaded")]
    NoSheetLoaded,

    /// The sheet is smaller than a single frame
    #[error("sheet {sheet_width}x{sheet_height} holds no {frame_width}x{frame_height} frame")]
    EmptyGrid {
        /// Sheet width in pixels
        sheet_width: u32,
        /// Sheet height in pixels
        sheet_height: u32,
        /// Frame width in pixels
        frame_width: u32,
        /// Frame height in pixels
        frame_height: u32,
    },
}

/// Result type alias for slicer operations.
pub type SlicerResult<T> = Result<T, SlicerError>;
