//! Core types and utilities for pupil localization.
//!
//! This crate is intentionally small: pixel geometry, the compass directions
//! used for ray casting, frame validation, and logger setup. The detection
//! algorithm itself lives in `pupilometer-locate`.

mod frame;
mod geom;
mod logger;

pub use frame::{check_frame, gray_image_from_slice, FrameError};
pub use geom::{BoundingBox, Direction, Point};

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::{filter_directives, init_with_level, parse_level};

/// Grayscale frame type shared by every stage of the pipeline.
pub type Frame = image::GrayImage;
