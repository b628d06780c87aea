use image::{GrayImage, Luma};
use pupilometer_core::Point;
use pupilometer_locate::contours::{extract_contours, rank_contours};
use pupilometer_locate::{
    Candidate, FrameError, LocateError, PupilEstimate, PupilLocator, PupilParams, Stage,
    StageObserver,
};

/// Filled disk of `disk` intensity on a `bg` background.
fn draw_disk_image(w: u32, h: u32, center: [f32; 2], radius: f32, disk: u8, bg: u8) -> GrayImage {
    GrayImage::from_fn(w, h, |x, y| {
        let dx = x as f32 - center[0];
        let dy = y as f32 - center[1];
        if dx * dx + dy * dy <= radius * radius {
            Luma([disk])
        } else {
            Luma([bg])
        }
    })
}

fn scenario_params() -> PupilParams {
    let mut params = PupilParams::default();
    params.ray.edge_threshold = 100;
    params.validation.min_radius = 30;
    params.validation.max_radius = 80;
    params
}

#[derive(Default)]
struct Recorder {
    masks: Vec<usize>,
    candidates: Vec<(usize, Candidate)>,
    estimates: Vec<PupilEstimate>,
}

impl StageObserver for Recorder {
    fn on_stage(&mut self, stage: Stage, _image: &GrayImage) {
        if let Stage::Mask { scale_index, .. } = stage {
            self.masks.push(scale_index);
        }
    }

    fn on_candidate(&mut self, scale_index: usize, candidate: &Candidate) {
        self.candidates.push((scale_index, candidate.clone()));
    }

    fn on_estimate(&mut self, estimate: &PupilEstimate) {
        self.estimates.push(*estimate);
    }
}

#[test]
fn dark_disk_is_located_at_first_scale() {
    let frame = draw_disk_image(200, 200, [100.0, 100.0], 50.0, 20, 200);
    let locator = PupilLocator::new(scenario_params()).expect("params");
    let est = locator.locate(&frame).expect("locate");

    let center = est.center.expect("pupil found");
    assert!((center.x - 100).abs() <= 2, "center {center:?}");
    assert!((center.y - 100).abs() <= 2, "center {center:?}");
    assert!((45..=55).contains(&est.radius), "radius {}", est.radius);
    assert_eq!(est.scale_index, 0);
}

#[test]
fn uniform_frame_yields_no_pupil_at_any_scale() {
    let locator = PupilLocator::new(scenario_params()).expect("params");
    for level in [200u8, 128, 3] {
        let frame = GrayImage::from_pixel(200, 200, Luma([level]));
        let mut rec = Recorder::default();
        let est = locator.locate_observed(&frame, &mut rec).expect("locate");
        assert_eq!(est, PupilEstimate::not_found(5), "level {level}");
        assert_eq!(rec.masks, vec![0, 1, 2, 3, 4, 5]);
        assert!(rec.candidates.iter().all(|(_, c)| !c.accepted));
        assert_eq!(rec.estimates, vec![est]);
    }
}

#[test]
fn small_disk_is_rejected_at_every_scale() {
    let frame = draw_disk_image(200, 200, [100.0, 100.0], 10.0, 20, 200);
    let locator = PupilLocator::new(scenario_params()).expect("params");
    let mut rec = Recorder::default();
    let est = locator.locate_observed(&frame, &mut rec).expect("locate");

    assert_eq!(est.center, None);
    assert_eq!(est.radius, 0);
    assert_eq!(est.scale_index, 5);
    assert!(!rec.candidates.is_empty());
    for (_, c) in &rec.candidates {
        assert!(!c.accepted);
        assert_eq!(c.radius, 0);
    }
}

#[test]
fn empty_frame_is_an_error_without_estimate() {
    let locator = PupilLocator::new(scenario_params()).expect("params");
    let mut rec = Recorder::default();
    let err = locator
        .locate_observed(&GrayImage::new(0, 0), &mut rec)
        .unwrap_err();
    assert_eq!(err, LocateError::Frame(FrameError::Empty));
    assert!(rec.estimates.is_empty());
    assert!(rec.masks.is_empty());

    // The locator stays usable after a rejected frame.
    let frame = draw_disk_image(200, 200, [100.0, 100.0], 50.0, 20, 200);
    assert!(locator.locate(&frame).expect("locate").is_found());
}

#[test]
fn repeated_calls_are_identical() {
    let frame = draw_disk_image(180, 160, [84.0, 77.0], 42.0, 15, 190);
    let locator = PupilLocator::new(scenario_params()).expect("params");
    let a = locator.locate(&frame).expect("locate");
    let b = locator.locate(&frame.clone()).expect("locate");
    assert_eq!(a, b);
    assert_eq!(
        serde_json::to_string(&a).unwrap(),
        serde_json::to_string(&b).unwrap()
    );
}

#[test]
fn found_centers_lie_inside_frame_with_positive_radius() {
    let locator = PupilLocator::new(scenario_params()).expect("params");
    let cases = [
        (200, 200, [100.0, 100.0], 50.0),
        (240, 180, [120.0, 90.0], 45.0),
        (200, 200, [70.0, 120.0], 40.0),
        (220, 200, [150.0, 60.0], 35.0),
        (200, 200, [100.0, 100.0], 70.0),
    ];
    for (w, h, c, r) in cases {
        let frame = draw_disk_image(w, h, c, r, 25, 210);
        let est = locator.locate(&frame).expect("locate");
        if let Some(p) = est.center {
            assert!(p.x >= 0 && p.x < w as i32 && p.y >= 0 && p.y < h as i32);
            assert!(est.radius > 0);
        } else {
            assert_eq!(est.radius, 0);
        }
    }
}

#[test]
fn sweep_stops_at_first_scale_that_validates() {
    // A bright bar splits the disk. Small elements keep the bar, so every
    // candidate meets it too early; a 21 px element erases it.
    let mut frame = draw_disk_image(200, 200, [100.0, 100.0], 50.0, 20, 200);
    for y in 95..105 {
        for x in 0..200 {
            frame.put_pixel(x, y, Luma([200]));
        }
    }
    let mut params = scenario_params();
    params.segment.scales = vec![3, 5, 21, 25];
    let locator = PupilLocator::new(params).expect("params");
    let mut rec = Recorder::default();
    let est = locator.locate_observed(&frame, &mut rec).expect("locate");

    assert_eq!(est.scale_index, 2);
    assert!(est.is_found());
    assert!((40..=55).contains(&est.radius), "radius {}", est.radius);
    assert_eq!(rec.masks, vec![0, 1, 2]);
    assert!(rec
        .candidates
        .iter()
        .filter(|(s, _)| *s < 2)
        .all(|(_, c)| !c.accepted));
    assert_eq!(rec.candidates.iter().filter(|(s, _)| *s == 2).count(), 1);
}

#[test]
fn contour_centered_on_frame_border_is_skipped_for_next_ranked() {
    // Bright disk plus a wider, larger-area two-row strip along the bottom
    // edge whose bounding-box center falls on the last row.
    let mut frame = draw_disk_image(600, 200, [300.0, 100.0], 10.0, 255, 0);
    for y in 198..200 {
        for x in 5..595 {
            frame.put_pixel(x, y, Luma([255]));
        }
    }

    let ranked = rank_contours(extract_contours(&frame));
    assert_eq!(ranked.len(), 2);
    assert_eq!(ranked[0].center(), Point::new(300, 199));

    let mut params = PupilParams::default();
    params.denoise.gaussian_kernel = 0;
    params.denoise.median_window = 1;
    params.segment.scales = vec![1];
    params.validation.min_radius = 5;
    params.validation.max_radius = 20;
    let locator = PupilLocator::new(params).expect("params");

    let mut rec = Recorder::default();
    let est = locator.locate_observed(&frame, &mut rec).expect("locate");

    assert_eq!(rec.candidates.len(), 1);
    let (scale, candidate) = &rec.candidates[0];
    assert_eq!(*scale, 0);
    assert!(candidate.accepted);
    assert_eq!(est.center, Some(candidate.center));
    let center = candidate.center;
    assert_eq!((center.x, center.y), (300, 100));
    assert!((8..=12).contains(&est.radius), "radius {}", est.radius);
}
