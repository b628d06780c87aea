use pupilometer_core::Direction;
use serde::{Deserialize, Serialize};

/// How a ray decides it has crossed an intensity edge.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeRule {
    /// `|I(p) - I(origin)| > edge_threshold`.
    #[default]
    AbsDiff,
    /// Any intensity change from the origin value; the threshold is ignored.
    AnyChange,
}

/// How an accepted radius profile is reduced to one radius.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RadiusPolicy {
    /// Largest value over every direction, in range or not.
    #[default]
    MaxOfAll,
    /// Largest value over the in-range directions only.
    MaxInRange,
}

/// Smoothing applied once per frame before the scale sweep.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DenoiseParams {
    /// Gaussian kernel side in pixels (odd, `0` disables the blur).
    pub gaussian_kernel: u32,
    /// Median window side in pixels (odd, `1` or `0` disables the filter).
    pub median_window: u32,
}

impl Default for DenoiseParams {
    fn default() -> Self {
        Self {
            gaussian_kernel: 9,
            median_window: 3,
        }
    }
}

impl DenoiseParams {
    /// Sigma equivalent of `gaussian_kernel`.
    pub fn gaussian_sigma(&self) -> Option<f32> {
        if self.gaussian_kernel < 2 {
            return None;
        }
        let k = self.gaussian_kernel as f32;
        Some(0.3 * ((k - 1.0) * 0.5 - 1.0) + 0.8)
    }

    /// Median filter radius, `None` when the window is a single pixel.
    pub fn median_radius(&self) -> Option<u32> {
        let r = self.median_window / 2;
        (r > 0).then_some(r)
    }
}

/// Morphological sweep settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmentParams {
    /// Square structuring-element sides, tried in ascending order.
    pub scales: Vec<u32>,
    /// Pixels strictly above this value become foreground (255).
    pub binary_cutoff: u8,
    /// Stroke width used to blank every contour of each mask before it is
    /// searched; `0` leaves masks untouched.
    pub blank_thickness: u32,
}

impl Default for SegmentParams {
    fn default() -> Self {
        Self {
            scales: vec![5, 7, 10, 12, 15, 17],
            binary_cutoff: 25,
            blank_thickness: 0,
        }
    }
}

/// Ray casting settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RayParams {
    pub edge_threshold: u8,
    pub edge_rule: EdgeRule,
    /// Directions scanned from every candidate center.
    pub directions: Vec<Direction>,
}

impl Default for RayParams {
    fn default() -> Self {
        Self {
            edge_threshold: 200,
            edge_rule: EdgeRule::AbsDiff,
            directions: Direction::COMPASS5.to_vec(),
        }
    }
}

/// Candidate acceptance settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationParams {
    /// Inclusive lower radius bound in pixels.
    pub min_radius: u32,
    /// Exclusive upper radius bound in pixels.
    pub max_radius: u32,
    /// Minimum number of in-range directions.
    pub validation_threshold: usize,
    pub radius_policy: RadiusPolicy,
}

impl Default for ValidationParams {
    fn default() -> Self {
        Self {
            min_radius: 30,
            max_radius: 80,
            validation_threshold: 3,
            radius_policy: RadiusPolicy::MaxOfAll,
        }
    }
}

impl ValidationParams {
    #[inline]
    pub fn in_range(&self, r: u32) -> bool {
        (self.min_radius..self.max_radius).contains(&r)
    }
}

/// Full, immutable configuration of the pupil locator.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PupilParams {
    pub denoise: DenoiseParams,
    pub segment: SegmentParams,
    pub ray: RayParams,
    pub validation: ValidationParams,
}

/// Inconsistent parameter records.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ParamsError {
    #[error("scale list is empty")]
    NoScales,
    #[error("structuring element size {0} is outside 1..=255")]
    BadScale(u32),
    #[error("direction set is empty")]
    NoDirections,
    #[error("radius range [{min}, {max}) is empty")]
    EmptyRadiusRange { min: u32, max: u32 },
    #[error("minimum radius must be at least 1")]
    ZeroMinRadius,
    #[error("validation threshold {threshold} is outside 1..={directions}")]
    BadValidationThreshold { threshold: usize, directions: usize },
    #[error("median window {0} must be odd")]
    EvenMedianWindow(u32),
}

impl PupilParams {
    /// Check the record for combinations the locator cannot honor.
    pub fn validate(&self) -> Result<(), ParamsError> {
        if self.segment.scales.is_empty() {
            return Err(ParamsError::NoScales);
        }
        if let Some(&bad) = self
            .segment
            .scales
            .iter()
            .find(|&&s| s == 0 || s > u8::MAX as u32)
        {
            return Err(ParamsError::BadScale(bad));
        }
        if self.ray.directions.is_empty() {
            return Err(ParamsError::NoDirections);
        }
        let v = &self.validation;
        if v.min_radius == 0 {
            return Err(ParamsError::ZeroMinRadius);
        }
        if v.min_radius >= v.max_radius {
            return Err(ParamsError::EmptyRadiusRange {
                min: v.min_radius,
                max: v.max_radius,
            });
        }
        let directions = self.ray.directions.len();
        if v.validation_threshold == 0 || v.validation_threshold > directions {
            return Err(ParamsError::BadValidationThreshold {
                threshold: v.validation_threshold,
                directions,
            });
        }
        let median = self.denoise.median_window;
        if median > 1 && median % 2 == 0 {
            return Err(ParamsError::EvenMedianWindow(median));
        }
        Ok(())
    }
}
