use pupilometer_core::Point;
use serde::{Deserialize, Serialize};

use crate::params::{RadiusPolicy, ValidationParams};
use crate::ray::RadiusProfile;

/// Outcome of validating one radius profile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    pub accepted: bool,
    /// Number of directions whose radius fell in `[min_radius, max_radius)`.
    pub in_range: usize,
    /// Reduced radius, `0` when rejected.
    pub radius: u32,
}

/// One scored pupil candidate.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub center: Point,
    pub profile: RadiusProfile,
    pub accepted: bool,
    pub radius: u32,
}

impl Candidate {
    pub fn evaluate(center: Point, profile: RadiusProfile, params: &ValidationParams) -> Self {
        let verdict = validate_profile(&profile, params);
        Self {
            center,
            profile,
            accepted: verdict.accepted,
            radius: verdict.radius,
        }
    }
}

/// Accept a profile when at least `validation_threshold` directions are in
/// range and reduce it to one radius according to `radius_policy`.
pub fn validate_profile(profile: &RadiusProfile, params: &ValidationParams) -> Verdict {
    let in_range = profile.radii().filter(|&r| params.in_range(r)).count();
    let accepted = in_range >= params.validation_threshold;
    if !accepted {
        return Verdict {
            accepted,
            in_range,
            radius: 0,
        };
    }

    let radius = match params.radius_policy {
        RadiusPolicy::MaxOfAll => profile.radii().max(),
        RadiusPolicy::MaxInRange => profile.radii().filter(|&r| params.in_range(r)).max(),
    }
    .unwrap_or(0);

    Verdict {
        accepted,
        in_range,
        radius,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pupilometer_core::Direction;

    fn profile(radii: [u32; 5]) -> RadiusProfile {
        RadiusProfile::from_entries(Direction::COMPASS5.iter().copied().zip(radii).collect())
    }

    #[test]
    fn exactly_threshold_in_range_accepts() {
        let v = validate_profile(&profile([30, 79, 45, 0, 12]), &ValidationParams::default());
        assert_eq!(v.in_range, 3);
        assert!(v.accepted);
        assert_eq!(v.radius, 79);
    }

    #[test]
    fn one_short_of_threshold_rejects_with_zero_radius() {
        let v = validate_profile(&profile([30, 80, 45, 0, 12]), &ValidationParams::default());
        assert_eq!(v.in_range, 2);
        assert!(!v.accepted);
        assert_eq!(v.radius, 0);
    }

    #[test]
    fn max_of_all_may_pick_an_out_of_range_radius() {
        let p = profile([40, 41, 42, 120, 0]);
        let v = validate_profile(&p, &ValidationParams::default());
        assert!(v.accepted);
        assert_eq!(v.radius, 120);

        let in_range_only = ValidationParams {
            radius_policy: RadiusPolicy::MaxInRange,
            ..ValidationParams::default()
        };
        let v = validate_profile(&p, &in_range_only);
        assert!(v.accepted);
        assert_eq!(v.radius, 42);
    }

    #[test]
    fn candidate_radius_is_a_measured_value() {
        let p = profile([33, 47, 50, 36, 35]);
        let c = Candidate::evaluate(Point::new(10, 10), p.clone(), &ValidationParams::default());
        assert!(c.accepted);
        assert!(p.radii().any(|r| r == c.radius));
    }
}
