use std::fs;
use std::path::{Path, PathBuf};

use ab_glyph::{FontVec, PxScale};
use image::{DynamicImage, GrayImage, Rgb, RgbImage};
use imageproc::drawing::{draw_hollow_circle_mut, draw_text_mut};
use pupilometer_locate::PupilEstimate;

use crate::RunError;

const CIRCLE_COLOR: Rgb<u8> = Rgb([0, 255, 255]);
const LABEL_ORIGIN: (i32, i32) = (10, 10);

/// `<base>_<index:03>.<ext>`
pub fn output_name(base: &str, index: usize, ext: &str) -> String {
    format!("{base}_{index:03}.{ext}")
}

/// Font used to print `radius: <r>` on annotated frames.
pub struct RadiusLabel {
    font: FontVec,
    scale: PxScale,
}

impl std::fmt::Debug for RadiusLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RadiusLabel")
            .field("scale", &self.scale.y)
            .finish_non_exhaustive()
    }
}

impl RadiusLabel {
    /// Load a TrueType/OpenType font file; `height` is the glyph height in pixels.
    pub fn load(path: &Path, height: f32) -> Result<Self, RunError> {
        let bytes = fs::read(path).map_err(|e| RunError::io(path, e))?;
        let font = FontVec::try_from_vec(bytes).map_err(|source| RunError::Font {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self {
            font,
            scale: PxScale::from(height),
        })
    }

    fn draw(&self, image: &mut RgbImage, radius: u32) {
        let text = format!("radius: {radius}");
        let (x, y) = LABEL_ORIGIN;
        draw_text_mut(image, CIRCLE_COLOR, x, y, self.scale, &self.font, &text);
    }
}

/// Draw the estimated pupil circle over the frame, and the radius text when
/// a label font is given.
///
/// Without a detection no circle is drawn; the label then reads `radius: 0`.
pub fn annotate(
    frame: &GrayImage,
    estimate: &PupilEstimate,
    thickness: u32,
    label: Option<&RadiusLabel>,
) -> RgbImage {
    let mut out = DynamicImage::ImageLuma8(frame.clone()).to_rgb8();
    if let Some(label) = label {
        label.draw(&mut out, estimate.radius);
    }
    let Some(c) = estimate.center else {
        return out;
    };
    if estimate.radius == 0 {
        return out;
    }
    let r = estimate.radius as i32;
    let half = (thickness.max(1) / 2) as i32;
    for dr in -half..=half {
        let rr = r + dr;
        if rr > 0 {
            draw_hollow_circle_mut(&mut out, (c.x, c.y), rr, CIRCLE_COLOR);
        }
    }
    out
}

fn ensure_dir(dir: &Path) -> Result<(), RunError> {
    fs::create_dir_all(dir).map_err(|e| RunError::io(dir, e))
}

/// Writes annotated (or mosaic) RGB frames as `<dir>/<base>_<index:03>.png`.
#[derive(Clone, Debug)]
pub struct AnnotatedFrameWriter {
    pub dir: PathBuf,
    pub base: String,
}

impl AnnotatedFrameWriter {
    pub fn new(dir: impl Into<PathBuf>, base: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            base: base.into(),
        }
    }

    pub fn write(&self, index: usize, image: &RgbImage) -> Result<PathBuf, RunError> {
        ensure_dir(&self.dir)?;
        let path = self.dir.join(output_name(&self.base, index, "png"));
        image.save(&path).map_err(|e| RunError::image(&path, e))?;
        Ok(path)
    }
}

/// Writes binary masks as `<dir>/<base>_<index:03>.png`.
#[derive(Clone, Debug)]
pub struct MaskWriter {
    pub dir: PathBuf,
    pub base: String,
}

impl MaskWriter {
    pub fn new(dir: impl Into<PathBuf>, base: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            base: base.into(),
        }
    }

    pub fn write(&self, index: usize, mask: &GrayImage) -> Result<PathBuf, RunError> {
        ensure_dir(&self.dir)?;
        let path = self.dir.join(output_name(&self.base, index, "png"));
        mask.save(&path).map_err(|e| RunError::image(&path, e))?;
        Ok(path)
    }
}
