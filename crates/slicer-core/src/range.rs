//! Animation range validation.
//!
//! Every user-entered value passes through here before it reaches the grid,
//! the canvas or the exporter. Out-of-range indices are clamped, never
//! reported.

use serde::{Deserialize, Serialize};
use slicer_common::FrameSize;
use std::ops::RangeInclusive;

/// Inclusive span of frame indices forming one animation.
///
/// Only [`AnimationRangeValidator`] builds ranges from user input, so
/// `start <= end` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct AnimationRange {
    start: u32,
    end: u32,
}

impl AnimationRange {
    /// A range covering the single frame `idx`.
    #[must_use]
    pub const fn single(idx: u32) -> Self {
        Self {
            start: idx,
            end: idx,
        }
    }

    /// First frame (inclusive).
    #[must_use]
    pub const fn start(&self) -> u32 {
        self.start
    }

    /// Last frame (inclusive).
    #[must_use]
    pub const fn end(&self) -> u32 {
        self.end
    }

    /// Number of frames in the range, always at least 1.
    #[must_use]
    pub const fn len(&self) -> u32 {
        self.end - self.start + 1
    }

    /// Whether `idx` lies inside the range.
    #[must_use]
    pub const fn contains(&self, idx: u32) -> bool {
        self.start <= idx && idx <= self.end
    }

    /// Iterates over the frame indices in order.
    pub fn indices(&self) -> RangeInclusive<u32> {
        self.start..=self.end
    }
}

impl std::fmt::Display for AnimationRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..={}", self.start, self.end)
    }
}

/// Raw values of the editable fields, as typed by the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditFields {
    /// Frame width entry
    pub frame_width: i64,
    /// Frame height entry
    pub frame_height: i64,
    /// Start index entry
    pub start: i64,
    /// End index entry
    pub end: i64,
    /// Preview FPS entry
    pub fps: i64,
    /// Sprite name entry (first directory level of an export)
    pub sprite_name: String,
    /// Animation name entry (second directory level and file prefix)
    pub animation_name: String,
}

impl Default for EditFields {
    fn default() -> Self {
        Self {
            frame_width: 32,
            frame_height: 32,
            start: 0,
            end: 0,
            fps: 4,
            sprite_name: String::new(),
            animation_name: String::new(),
        }
    }
}

/// Frame size and FPS after coercion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidatedFields {
    /// Frame size; a zero side means no usable grid
    pub frame: FrameSize,
    /// Preview FPS, at least 1
    pub fps: u32,
}

/// Single source of truth for which range and field values are valid.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnimationRangeValidator;

impl AnimationRangeValidator {
    /// Clamps a requested range against `frame_count` frames.
    ///
    /// `end` is clamped first and `start` against the clamped `end`.
    /// A `frame_count` of 0 yields `0..=0`.
    #[must_use]
    pub fn validate(requested_start: i64, requested_end: i64, frame_count: u32) -> AnimationRange {
        let last = i64::from(frame_count) - 1;

        let end = requested_end.min(last);
        let start = requested_start.max(0).min(end);
        let end = end.max(start);

        let start = start.max(0);
        let end = end.max(start);
        AnimationRange {
            start: clamp_to_u32(start),
            end: clamp_to_u32(end),
        }
    }

    /// Coerces frame size entries to `>= 0` and FPS to `>= 1`.
    #[must_use]
    pub fn validate_fields(fields: &EditFields) -> ValidatedFields {
        ValidatedFields {
            frame: FrameSize::new(
                clamp_to_u32(fields.frame_width),
                clamp_to_u32(fields.frame_height),
            ),
            fps: clamp_to_u32(fields.fps).max(1),
        }
    }

    /// Validates the start/end entries and writes the clamped values back.
    pub fn apply_range(fields: &mut EditFields, frame_count: u32) -> AnimationRange {
        let range = Self::validate(fields.start, fields.end, frame_count);
        fields.start = i64::from(range.start);
        fields.end = i64::from(range.end);
        range
    }
}

fn clamp_to_u32(value: i64) -> u32 {
    u32::try_from(value.max(0)).unwrap_or(u32::MAX)
}
