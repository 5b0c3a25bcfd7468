//! # Slicer Common
//!
//! Common types shared by the sprite sheet slicer crates:
//! - Pixel rectangles, frame sizes and grid cells
//! - The error taxonomy reported to the user
//! - Prelude for convenient imports

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod coords;
pub mod error;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::coords::*;
    pub use crate::error::*;
}

pub use prelude::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sheet_and_canvas_cells_differ() {
        // Same linear index, different row widths.
        let sheet = GridCell::from_index(7, 4);
        let canvas = GridCell::from_index(7, 5);

        assert_eq!(sheet, GridCell::new(1, 3));
        assert_eq!(canvas, GridCell::new(1, 2));
    }

    #[test]
    fn test_error_messages() {
        let err = SlicerError::from(GeometryError::ZeroFrameSize {
            width: 0,
            height: 32,
        });
        assert_eq!(
            err.to_string(),
            "Invalid geometry: frame size must be positive, got 0x32"
        );
        assert_eq!(
            SlicerError::MissingOutputDir.to_string(),
            "Set output directory before export"
        );
        assert_eq!(
            SlicerError::MissingExportFields.to_string(),
            "Set sprite name and animation name before export"
        );
    }

    #[test]
    fn test_interrupted_export_message() {
        let err = SlicerError::ExportInterrupted {
            written: 2,
            total: 5,
            source: Box::new(SlicerError::Config("disk full".to_string())),
        };
        assert!(err.to_string().starts_with("Export interrupted after 2 of 5 frames"));
    }
}
