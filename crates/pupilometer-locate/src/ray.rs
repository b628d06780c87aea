//! Ray casting from a candidate center toward the pupil border.
//!
//! A ray walks one pixel at a time and stops at the first pixel whose
//! intensity differs from the origin pixel by more than the edge threshold.
//! Walks that leave the frame interior without seeing an edge report `0`.

use image::GrayImage;
use pupilometer_core::{Direction, Point};
use serde::{Deserialize, Serialize};

use crate::params::{EdgeRule, RayParams};

#[inline]
fn intensity(image: &GrayImage, p: Point) -> i16 {
    image.get_pixel(p.x as u32, p.y as u32).0[0] as i16
}

#[inline]
fn is_edge(rule: EdgeRule, threshold: u8, origin: i16, value: i16) -> bool {
    match rule {
        EdgeRule::AbsDiff => (value - origin).abs() > threshold as i16,
        EdgeRule::AnyChange => value != origin,
    }
}

/// Walk from `origin` along `direction` and return the number of steps to the
/// first edge pixel, or `0` when no edge is met.
///
/// The walk only advances while the current position is inside the frame
/// interior (`1 < x < W - 1`, `1 < y < H - 1`) and at most `step_limit` steps.
pub fn scan_ray(
    image: &GrayImage,
    origin: Point,
    direction: Direction,
    params: &RayParams,
    step_limit: u32,
) -> u32 {
    let (w, h) = image.dimensions();
    if !origin.is_inside(w, h) {
        return 0;
    }
    let base = intensity(image, origin);

    let mut p = origin;
    let mut steps = 0u32;
    while p.is_interior(w, h) && steps < step_limit {
        p = p.step(direction);
        steps += 1;
        if is_edge(params.edge_rule, params.edge_threshold, base, intensity(image, p)) {
            return steps;
        }
    }
    0
}

/// Per-direction edge distances measured from one center.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RadiusProfile {
    entries: Vec<(Direction, u32)>,
}

impl RadiusProfile {
    /// Profile with a zero entry for each direction.
    pub fn zeros(directions: &[Direction]) -> Self {
        Self {
            entries: directions.iter().map(|&d| (d, 0)).collect(),
        }
    }

    pub fn from_entries(entries: Vec<(Direction, u32)>) -> Self {
        Self { entries }
    }

    #[inline]
    pub fn entries(&self) -> &[(Direction, u32)] {
        &self.entries
    }

    /// Radii in direction order.
    pub fn radii(&self) -> impl Iterator<Item = u32> + '_ {
        self.entries.iter().map(|&(_, r)| r)
    }

    pub fn get(&self, direction: Direction) -> Option<u32> {
        self.entries
            .iter()
            .find(|(d, _)| *d == direction)
            .map(|&(_, r)| r)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Scan every configured direction from `center`.
///
/// Centers outside the frame interior yield an all-zero profile without
/// scanning.
pub fn radius_profile(
    image: &GrayImage,
    center: Point,
    params: &RayParams,
    step_limit: u32,
) -> RadiusProfile {
    let (w, h) = image.dimensions();
    if !center.is_interior(w, h) {
        return RadiusProfile::zeros(&params.directions);
    }
    let entries = params
        .directions
        .iter()
        .map(|&dir| (dir, scan_ray(image, center, dir, params, step_limit)))
        .collect();
    RadiusProfile { entries }
}
