use image::GrayImage;
use log::{debug, trace};
use pupilometer_core::{check_frame, FrameError, Point};
use serde::{Deserialize, Serialize};

use crate::contours::{extract_contours, rank_contours};
use crate::filters::{gaussian, median};
use crate::observer::{NoopObserver, Stage, StageObserver};
use crate::params::{ParamsError, PupilParams};
use crate::ray::radius_profile;
use crate::segment::ScaleSweep;
use crate::validate::Candidate;

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Errors returned by [`PupilLocator`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum LocateError {
    #[error(transparent)]
    Frame(#[from] FrameError),
    #[error(transparent)]
    Params(#[from] ParamsError),
}

/// Per-frame result. A missing `center` means no scale produced a pupil.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PupilEstimate {
    pub center: Option<Point>,
    /// Radius in pixels, `0` when nothing was found.
    pub radius: u32,
    /// Index of the scale that produced the estimate, or the last one tried.
    pub scale_index: usize,
}

impl PupilEstimate {
    pub fn found(center: Point, radius: u32, scale_index: usize) -> Self {
        Self {
            center: Some(center),
            radius,
            scale_index,
        }
    }

    pub fn not_found(scale_index: usize) -> Self {
        Self {
            center: None,
            radius: 0,
            scale_index,
        }
    }

    #[inline]
    pub fn is_found(&self) -> bool {
        self.center.is_some()
    }
}

/// Frame-by-frame pupil locator.
///
/// Holds only the immutable parameter record, so one instance can be shared
/// across threads processing independent frames.
#[derive(Clone, Debug)]
pub struct PupilLocator {
    params: PupilParams,
}

impl Default for PupilLocator {
    fn default() -> Self {
        Self {
            params: PupilParams::default(),
        }
    }
}

impl PupilLocator {
    pub fn new(params: PupilParams) -> Result<Self, LocateError> {
        params.validate()?;
        Ok(Self { params })
    }

    #[inline]
    pub fn params(&self) -> &PupilParams {
        &self.params
    }

    /// Locate the pupil in one grayscale frame.
    pub fn locate(&self, frame: &GrayImage) -> Result<PupilEstimate, LocateError> {
        self.locate_observed(frame, &mut NoopObserver)
    }

    /// Same as [`PupilLocator::locate`], reporting intermediate stages.
    ///
    /// Scales are tried from the smallest structuring element up; within a
    /// scale, contours are tried from the largest area down. The first
    /// accepted candidate ends the search.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "debug", skip(self, frame, observer), fields(width = frame.width(), height = frame.height()))
    )]
    pub fn locate_observed(
        &self,
        frame: &GrayImage,
        observer: &mut dyn StageObserver,
    ) -> Result<PupilEstimate, LocateError> {
        check_frame(frame)?;
        let (w, h) = frame.dimensions();
        let step_limit = w.min(h);

        observer.on_stage(Stage::Gray, frame);
        let blurred = gaussian(frame, &self.params.denoise);
        observer.on_stage(Stage::Gaussian, &blurred);
        let denoised = median(&blurred, &self.params.denoise);
        observer.on_stage(Stage::Median, &denoised);

        let mut last_index = 0;
        for layer in ScaleSweep::new(&denoised, &self.params.segment) {
            last_index = layer.index;
            observer.on_stage(
                Stage::Opened {
                    scale_index: layer.index,
                    size: layer.size,
                },
                &layer.opened,
            );
            observer.on_stage(
                Stage::Mask {
                    scale_index: layer.index,
                    size: layer.size,
                },
                &layer.mask,
            );

            let contours = rank_contours(extract_contours(&layer.mask));
            debug!(
                "scale {} (size {}): {} contours",
                layer.index,
                layer.size,
                contours.len()
            );

            for (rank, contour) in contours.iter().enumerate() {
                let center = contour.center();
                if !center.is_interior(w, h) {
                    trace!("contour {rank}: center {center:?} outside interior, skipped");
                    continue;
                }
                let profile = radius_profile(&layer.mask, center, &self.params.ray, step_limit);
                let candidate = Candidate::evaluate(center, profile, &self.params.validation);
                trace!(
                    "contour {rank}: center {:?} radii {:?} accepted={}",
                    candidate.center,
                    candidate.profile.radii().collect::<Vec<_>>(),
                    candidate.accepted
                );
                observer.on_candidate(layer.index, &candidate);

                if candidate.accepted {
                    let estimate =
                        PupilEstimate::found(candidate.center, candidate.radius, layer.index);
                    debug!(
                        "pupil at {:?} r={} (scale {}, contour {rank})",
                        candidate.center, candidate.radius, layer.index
                    );
                    observer.on_estimate(&estimate);
                    return Ok(estimate);
                }
            }
        }

        debug!("no pupil found after {} scales", last_index + 1);
        let estimate = PupilEstimate::not_found(last_index);
        observer.on_estimate(&estimate);
        Ok(estimate)
    }
}
