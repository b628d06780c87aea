use image::GrayImage;

use crate::locator::PupilEstimate;
use crate::validate::Candidate;

/// Intermediate image emitted during one `locate` call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    /// The input frame.
    Gray,
    Gaussian,
    Median,
    /// Opened frame at one scale.
    Opened { scale_index: usize, size: u32 },
    /// Binary mask at one scale.
    Mask { scale_index: usize, size: u32 },
}

/// Receives intermediate results of a `locate` call, for display or dumps.
///
/// All methods default to no-ops.
pub trait StageObserver {
    fn on_stage(&mut self, _stage: Stage, _image: &GrayImage) {}

    fn on_candidate(&mut self, _scale_index: usize, _candidate: &Candidate) {}

    fn on_estimate(&mut self, _estimate: &PupilEstimate) {}
}

/// Observer that ignores everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopObserver;

impl StageObserver for NoopObserver {}
