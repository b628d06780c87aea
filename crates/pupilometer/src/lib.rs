//! High-level facade for the `pupilometer-*` workspace.
//!
//! This crate provides:
//! - re-exports of the core types and the pupil locator,
//! - a frame source reading single images or directories of frames,
//! - output sinks (annotated frames, masks, stage mosaics),
//! - a batch driver that keeps going when individual frames fail.
//!
//! ## Quickstart
//!
//! ```no_run
//! use pupilometer::{run_frames, FrameSource, RunConfig};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let source = FrameSource::open("dataset/exam01")?;
//! let report = run_frames(source, &RunConfig::default())?;
//! println!("pupil found in {} of {} frames", report.found, report.frames.len());
//! # Ok(())
//! # }
//! ```
//!
//! ## API map
//! - `pupilometer::core`: points, directions, frame validation, logging.
//! - `pupilometer::locate`: the multi-scale locator and its building blocks.
//! - `FrameSource`, `AnnotatedFrameWriter`, `MaskWriter`, `MosaicObserver`: I/O around the locator.

pub use pupilometer_core as core;
pub use pupilometer_locate as locate;

pub use pupilometer_locate::{PupilEstimate, PupilLocator, PupilParams};

mod error;
mod mosaic;
mod run;
mod sink;
mod source;

pub use error::RunError;
pub use mosaic::{render_mosaic, MosaicObserver, ScaleStages};
pub use run::{run_frames, FrameReport, RunConfig, RunReport};
pub use sink::{annotate, output_name, AnnotatedFrameWriter, MaskWriter, RadiusLabel};
pub use source::{FrameSource, SourceFrame};
