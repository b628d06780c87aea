use std::fs;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use log::{info, warn};
use pupilometer_locate::{PupilEstimate, PupilLocator, PupilParams};
use serde::{Deserialize, Serialize};

use crate::mosaic::{render_mosaic, MosaicObserver};
use crate::sink::{annotate, AnnotatedFrameWriter, MaskWriter, RadiusLabel};
use crate::source::FrameSource;
use crate::RunError;

#[cfg(feature = "tracing")]
use tracing::instrument;

const MOSAIC_COLUMNS: usize = 3;

/// Batch settings around the locator.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Directory for annotated stage mosaics.
    pub output_dir: PathBuf,
    pub output_base: String,
    /// Directory for winning-scale masks.
    pub threshold_dir: PathBuf,
    pub threshold_base: String,
    pub save_output: bool,
    pub save_threshold_output: bool,
    /// Stroke width of the drawn pupil circle.
    pub circle_thickness: u32,
    /// Font file for the `radius: <r>` label; no label when unset.
    pub radius_font: Option<PathBuf>,
    /// Label glyph height in pixels.
    pub radius_text_height: f32,
    /// Sleep between frames, never inside a frame.
    pub pause_ms: u64,
    pub params: PupilParams,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("identified"),
            output_base: "frame".to_string(),
            threshold_dir: PathBuf::from("threshold"),
            threshold_base: "threshold".to_string(),
            save_output: false,
            save_threshold_output: false,
            circle_thickness: 3,
            radius_font: None,
            radius_text_height: 16.0,
            pause_ms: 0,
            params: PupilParams::default(),
        }
    }
}

impl RunConfig {
    /// Read a JSON configuration; missing fields take their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self, RunError> {
        let raw = fs::read_to_string(path).map_err(|e| RunError::io(path, e))?;
        serde_json::from_str(&raw).map_err(|source| RunError::Json {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Outcome for one frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FrameReport {
    pub index: usize,
    pub path: String,
    pub estimate: Option<PupilEstimate>,
    pub error: Option<String>,
}

/// Outcome of a whole run.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub frames: Vec<FrameReport>,
    /// Frames with a pupil.
    pub found: usize,
    /// Frames that could not be decoded or localized.
    pub failed: usize,
}

/// Localize every frame of `source`.
///
/// Per-frame decode and localization failures are recorded in the report and
/// do not stop the run; sink failures are logged and ignored. Only invalid
/// parameters or an unreadable label font abort before the first frame.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "info", skip(source, cfg), fields(frames = source.len()))
)]
pub fn run_frames(source: FrameSource, cfg: &RunConfig) -> Result<RunReport, RunError> {
    let locator = PupilLocator::new(cfg.params.clone())?;
    let frame_writer = cfg
        .save_output
        .then(|| AnnotatedFrameWriter::new(&cfg.output_dir, &cfg.output_base));
    let mask_writer = cfg
        .save_threshold_output
        .then(|| MaskWriter::new(&cfg.threshold_dir, &cfg.threshold_base));
    let capture = frame_writer.is_some() || mask_writer.is_some();
    let label = match (&cfg.radius_font, &frame_writer) {
        (Some(path), Some(_)) => Some(RadiusLabel::load(path, cfg.radius_text_height)?),
        _ => None,
    };

    let mut report = RunReport::default();
    let total = source.len();

    for (n, frame) in source.enumerate() {
        if n > 0 && cfg.pause_ms > 0 {
            thread::sleep(Duration::from_millis(cfg.pause_ms));
        }

        let path = frame.path.display().to_string();
        let image = match frame.image {
            Ok(image) => image,
            Err(e) => {
                warn!("frame {}: {e}", frame.index);
                report.failed += 1;
                report.frames.push(FrameReport {
                    index: frame.index,
                    path,
                    estimate: None,
                    error: Some(e.to_string()),
                });
                continue;
            }
        };

        let mut observer = MosaicObserver::default();
        let result = if capture {
            locator.locate_observed(&image, &mut observer)
        } else {
            locator.locate(&image)
        };

        let estimate = match result {
            Ok(estimate) => estimate,
            Err(e) => {
                warn!("frame {}: {e}", frame.index);
                report.failed += 1;
                report.frames.push(FrameReport {
                    index: frame.index,
                    path,
                    estimate: None,
                    error: Some(e.to_string()),
                });
                continue;
            }
        };

        match estimate.center {
            Some(c) => info!(
                "frame {:03}/{total}: center=({}, {}) radius={} scale={}",
                frame.index, c.x, c.y, estimate.radius, estimate.scale_index
            ),
            None => info!("frame {:03}/{total}: no pupil", frame.index),
        }
        if estimate.is_found() {
            report.found += 1;
        }

        if let Some(writer) = &frame_writer {
            let mut tiles = observer.tiles();
            tiles.push(annotate(
                &image,
                &estimate,
                cfg.circle_thickness,
                label.as_ref(),
            ));
            let mosaic = render_mosaic(&tiles, MOSAIC_COLUMNS);
            if let Err(e) = writer.write(frame.index, &mosaic) {
                warn!("frame {}: output not saved: {e}", frame.index);
            }
        }
        if let (Some(writer), Some(mask)) = (&mask_writer, observer.last_mask()) {
            if let Err(e) = writer.write(frame.index, mask) {
                warn!("frame {}: mask not saved: {e}", frame.index);
            }
        }

        report.frames.push(FrameReport {
            index: frame.index,
            path,
            estimate: Some(estimate),
            error: None,
        });
    }

    Ok(report)
}
