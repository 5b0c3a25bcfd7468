//! # Slicer Core
//!
//! Sprite sheet slicing for the sprite slicer.
//!
//! This crate provides:
//! - Grid geometry and the square packing canvas
//! - Click-driven range selection and range validation
//! - Canvas rendering with range highlight
//! - Looping animation preview
//! - Frame export into `<root>/<sprite>/<animation>/`
//! - A session type tying the above to user actions

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod canvas;
pub mod config;
pub mod export;
pub mod grid;
pub mod preview;
pub mod range;
pub mod selection;
pub mod session;
pub mod sheet;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::canvas::*;
    pub use crate::config::*;
    pub use crate::export::*;
    pub use crate::grid::*;
    pub use crate::preview::*;
    pub use crate::range::*;
    pub use crate::selection::*;
    pub use crate::session::*;
    pub use crate::sheet::*;
}

pub use prelude::*;
