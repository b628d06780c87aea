//! Stage capture and tiled debug views.

use image::imageops::{self, FilterType};
use image::{DynamicImage, GrayImage, Rgb, RgbImage};
use pupilometer_locate::{PupilEstimate, Stage, StageObserver};

/// Opened image and mask of one scale.
#[derive(Clone, Debug)]
pub struct ScaleStages {
    pub scale_index: usize,
    pub size: u32,
    pub opened: Option<GrayImage>,
    pub mask: Option<GrayImage>,
}

/// Observer that keeps copies of every stage image of one `locate` call.
///
/// `scales` holds one entry per scale visited, in sweep order; with early
/// exit the last entry is the scale that produced the estimate.
#[derive(Clone, Debug, Default)]
pub struct MosaicObserver {
    pub gray: Option<GrayImage>,
    pub gaussian: Option<GrayImage>,
    pub median: Option<GrayImage>,
    pub scales: Vec<ScaleStages>,
    pub estimate: Option<PupilEstimate>,
}

impl MosaicObserver {
    fn scale_slot(&mut self, scale_index: usize, size: u32) -> &mut ScaleStages {
        let fresh = self
            .scales
            .last()
            .is_none_or(|s| s.scale_index != scale_index);
        if fresh {
            self.scales.push(ScaleStages {
                scale_index,
                size,
                opened: None,
                mask: None,
            });
        }
        let last = self.scales.len() - 1;
        &mut self.scales[last]
    }

    /// Mask of the last scale visited.
    pub fn last_mask(&self) -> Option<&GrayImage> {
        self.scales.last().and_then(|s| s.mask.as_ref())
    }

    /// Tiles in display order: gray, gaussian, median, then the opened image
    /// and mask of the last scale visited.
    pub fn tiles(&self) -> Vec<RgbImage> {
        let last = self.scales.last();
        [
            self.gray.as_ref(),
            self.gaussian.as_ref(),
            self.median.as_ref(),
            last.and_then(|s| s.opened.as_ref()),
            last.and_then(|s| s.mask.as_ref()),
        ]
        .into_iter()
        .flatten()
        .map(to_rgb)
        .collect()
    }

    /// Opened image and mask of every scale visited, row by row.
    pub fn scale_tiles(&self) -> Vec<RgbImage> {
        self.scales
            .iter()
            .flat_map(|s| [s.opened.as_ref(), s.mask.as_ref()])
            .flatten()
            .map(to_rgb)
            .collect()
    }
}

fn to_rgb(g: &GrayImage) -> RgbImage {
    DynamicImage::ImageLuma8(g.clone()).to_rgb8()
}

impl StageObserver for MosaicObserver {
    fn on_stage(&mut self, stage: Stage, image: &GrayImage) {
        match stage {
            Stage::Gray => self.gray = Some(image.clone()),
            Stage::Gaussian => self.gaussian = Some(image.clone()),
            Stage::Median => self.median = Some(image.clone()),
            Stage::Opened { scale_index, size } => {
                self.scale_slot(scale_index, size).opened = Some(image.clone());
            }
            Stage::Mask { scale_index, size } => {
                self.scale_slot(scale_index, size).mask = Some(image.clone());
            }
        }
    }

    fn on_estimate(&mut self, estimate: &PupilEstimate) {
        self.estimate = Some(*estimate);
    }
}

/// Downscale every tile by half and lay them out row-major, `columns` wide.
///
/// Cells take the size of the largest tile; unused cells stay black.
pub fn render_mosaic(tiles: &[RgbImage], columns: usize) -> RgbImage {
    let columns = columns.max(1);
    if tiles.is_empty() {
        return RgbImage::new(1, 1);
    }
    let halves: Vec<RgbImage> = tiles
        .iter()
        .map(|t| {
            let w = (t.width() / 2).max(1);
            let h = (t.height() / 2).max(1);
            imageops::resize(t, w, h, FilterType::Triangle)
        })
        .collect();
    let cell_w = halves.iter().map(|t| t.width()).max().unwrap_or(1);
    let cell_h = halves.iter().map(|t| t.height()).max().unwrap_or(1);
    let rows = halves.len().div_ceil(columns);

    let mut out = RgbImage::from_pixel(
        cell_w * columns as u32,
        cell_h * rows as u32,
        Rgb([0, 0, 0]),
    );
    for (i, tile) in halves.iter().enumerate() {
        let x = (i % columns) as u32 * cell_w;
        let y = (i / columns) as u32 * cell_h;
        imageops::replace(&mut out, tile, x as i64, y as i64);
    }
    out
}
