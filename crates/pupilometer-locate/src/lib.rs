//! Pupil localization for grayscale eye-video frames.
//!
//! Pipeline per frame:
//! - denoise (Gaussian blur, then a small median filter),
//! - sweep square structuring elements of increasing size: open, binarize,
//! - rank the mask's contours by area,
//! - cast rays from each contour's bounding-box center and accept the first
//!   center whose edge distances fall in the expected radius range.
//!
//! ```no_run
//! use pupilometer_locate::{PupilLocator, PupilParams};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let frame = image::open("eye.png")?.to_luma8();
//! let locator = PupilLocator::new(PupilParams::default())?;
//! let estimate = locator.locate(&frame)?;
//! println!("{:?} r={}", estimate.center, estimate.radius);
//! # Ok(())
//! # }
//! ```

pub mod contours;
pub mod filters;
mod locator;
pub mod noise;
mod observer;
mod params;
pub mod ray;
pub mod segment;
mod validate;

pub use contours::{extract_contours, rank_contours, Contour};
pub use locator::{LocateError, PupilEstimate, PupilLocator};
pub use noise::blank_contours;
pub use observer::{NoopObserver, Stage, StageObserver};
pub use params::{
    DenoiseParams, EdgeRule, ParamsError, PupilParams, RadiusPolicy, RayParams, SegmentParams,
    ValidationParams,
};
pub use ray::{radius_profile, scan_ray, RadiusProfile};
pub use segment::{ScaleLayer, ScaleSweep};
pub use validate::{validate_profile, Candidate, Verdict};

pub use pupilometer_core::{Direction, FrameError, Point};
