use std::fs;
use std::path::Path;

use image::{GrayImage, Luma};
use pupilometer::{run_frames, FrameSource, RunConfig, RunError};

fn draw_disk_image(w: u32, h: u32, center: [f32; 2], radius: f32) -> GrayImage {
    GrayImage::from_fn(w, h, |x, y| {
        let dx = x as f32 - center[0];
        let dy = y as f32 - center[1];
        if dx * dx + dy * dy <= radius * radius {
            Luma([20])
        } else {
            Luma([200])
        }
    })
}

fn write_frames(dir: &Path) {
    draw_disk_image(200, 200, [100.0, 100.0], 50.0)
        .save(dir.join("f01.png"))
        .unwrap();
    GrayImage::from_pixel(200, 200, Luma([200]))
        .save(dir.join("f02.png"))
        .unwrap();
    fs::write(dir.join("f03.png"), b"truncated").unwrap();
    draw_disk_image(200, 200, [100.0, 100.0], 48.0)
        .save(dir.join("f04.png"))
        .unwrap();
}

#[test]
fn run_continues_past_bad_frames_and_saves_outputs() {
    let frames = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    write_frames(frames.path());

    let cfg = RunConfig {
        output_dir: out.path().join("identified"),
        threshold_dir: out.path().join("threshold"),
        save_output: true,
        save_threshold_output: true,
        ..RunConfig::default()
    };
    let report = run_frames(FrameSource::open(frames.path()).unwrap(), &cfg).unwrap();

    assert_eq!(report.frames.len(), 4);
    assert_eq!(report.found, 2);
    assert_eq!(report.failed, 1);

    let idx: Vec<usize> = report.frames.iter().map(|f| f.index).collect();
    assert_eq!(idx, vec![1, 2, 3, 4]);
    assert!(report.frames[0].estimate.unwrap().is_found());
    assert!(!report.frames[1].estimate.unwrap().is_found());
    assert!(report.frames[2].error.is_some());
    assert!(report.frames[3].estimate.unwrap().is_found());

    assert!(out.path().join("identified/frame_001.png").exists());
    assert!(out.path().join("identified/frame_002.png").exists());
    assert!(!out.path().join("identified/frame_003.png").exists());
    assert!(out.path().join("threshold/threshold_004.png").exists());

    // 6 tiles at half size in a 3-column grid.
    let mosaic = image::open(out.path().join("identified/frame_001.png")).unwrap();
    assert_eq!((mosaic.width(), mosaic.height()), (300, 200));
}

#[test]
fn sink_failure_does_not_abort_the_run() {
    let frames = tempfile::tempdir().unwrap();
    write_frames(frames.path());
    let blocker = tempfile::NamedTempFile::new().unwrap();

    // Output "directory" is a regular file, so every write fails.
    let cfg = RunConfig {
        output_dir: blocker.path().join("identified"),
        save_output: true,
        ..RunConfig::default()
    };
    let report = run_frames(FrameSource::open(frames.path()).unwrap(), &cfg).unwrap();
    assert_eq!(report.frames.len(), 4);
    assert_eq!(report.found, 2);
}

#[test]
fn invalid_params_abort_before_first_frame() {
    let frames = tempfile::tempdir().unwrap();
    write_frames(frames.path());
    let mut cfg = RunConfig::default();
    cfg.params.validation.min_radius = 90;
    let err = run_frames(FrameSource::open(frames.path()).unwrap(), &cfg).unwrap_err();
    assert!(matches!(err, RunError::Locate(_)));
}

#[test]
fn json_config_fills_defaults_and_reports_bad_input() {
    let dir = tempfile::tempdir().unwrap();
    let good = dir.path().join("cfg.json");
    fs::write(
        &good,
        r#"{ "save_output": true, "params": { "segment": { "scales": [3, 9] } } }"#,
    )
    .unwrap();
    let cfg = RunConfig::from_json_file(&good).unwrap();
    assert!(cfg.save_output);
    assert_eq!(cfg.params.segment.scales, vec![3, 9]);
    assert_eq!(cfg.params.segment.binary_cutoff, 25);
    assert_eq!(cfg.circle_thickness, 3);
    assert_eq!(cfg.radius_font, None);

    let bad = dir.path().join("bad.json");
    fs::write(&bad, "{ not json").unwrap();
    assert!(matches!(
        RunConfig::from_json_file(&bad),
        Err(RunError::Json { .. })
    ));
    assert!(matches!(
        RunConfig::from_json_file(&dir.path().join("absent.json")),
        Err(RunError::Io { .. })
    ));
}

#[test]
fn unreadable_label_font_aborts_before_first_frame() {
    let frames = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    write_frames(frames.path());
    let font = out.path().join("font.ttf");
    fs::write(&font, b"garbage").unwrap();

    let cfg = RunConfig {
        output_dir: out.path().join("identified"),
        save_output: true,
        radius_font: Some(font),
        ..RunConfig::default()
    };
    let err = run_frames(FrameSource::open(frames.path()).unwrap(), &cfg).unwrap_err();
    assert!(matches!(err, RunError::Font { .. }));
    assert!(!out.path().join("identified").exists());
}
