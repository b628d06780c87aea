//! Multi-scale morphological segmentation.
//!
//! Each configured structuring-element size opens the denoised frame and
//! binarizes the result, optionally blanking the mask's contours with a thick
//! stroke to detach noise glued to blob borders. Masks are produced lazily in ascending size order so
//! the caller can stop at the first scale that yields a pupil.

use image::GrayImage;

use crate::contours::extract_contours;
use crate::filters::{binarize, open_gray, square_element};
use crate::noise::blank_contours;
use crate::params::SegmentParams;

/// Output of one sweep step.
#[derive(Clone, Debug)]
pub struct ScaleLayer {
    /// Position of the scale in the sorted sweep.
    pub index: usize,
    /// Structuring-element side in pixels.
    pub size: u32,
    pub opened: GrayImage,
    pub mask: GrayImage,
}

/// Lazy, finite sweep over the configured scales.
///
/// Cloning or calling [`ScaleSweep::restart`] starts again from the smallest
/// scale.
#[derive(Clone, Debug)]
pub struct ScaleSweep<'a> {
    image: &'a GrayImage,
    sizes: Vec<u32>,
    cutoff: u8,
    blank_thickness: u32,
    next: usize,
}

impl<'a> ScaleSweep<'a> {
    pub fn new(denoised: &'a GrayImage, params: &SegmentParams) -> Self {
        let mut sizes = params.scales.clone();
        sizes.sort_unstable();
        Self {
            image: denoised,
            sizes,
            cutoff: params.binary_cutoff,
            blank_thickness: params.blank_thickness,
            next: 0,
        }
    }

    /// Sizes in sweep order.
    pub fn sizes(&self) -> &[u32] {
        &self.sizes
    }

    pub fn restart(&mut self) {
        self.next = 0;
    }
}

impl Iterator for ScaleSweep<'_> {
    type Item = ScaleLayer;

    fn next(&mut self) -> Option<ScaleLayer> {
        let index = self.next;
        let &size = self.sizes.get(index)?;
        self.next += 1;

        let opened = open_gray(self.image, &square_element(size));
        let mut mask = binarize(&opened, self.cutoff);
        if self.blank_thickness > 0 {
            mask = blank_contours(&mask, &extract_contours(&mask), self.blank_thickness);
        }
        Some(ScaleLayer {
            index,
            size,
            opened,
            mask,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.sizes.len() - self.next;
        (left, Some(left))
    }
}

impl ExactSizeIterator for ScaleSweep<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    fn params(scales: Vec<u32>) -> SegmentParams {
        SegmentParams {
            scales,
            binary_cutoff: 25,
            blank_thickness: 0,
        }
    }

    #[test]
    fn sweep_visits_scales_in_ascending_order() {
        let img = GrayImage::from_pixel(32, 32, Luma([100]));
        let sweep = ScaleSweep::new(&img, &params(vec![10, 5, 7]));
        assert_eq!(sweep.len(), 3);
        let seen: Vec<(usize, u32)> = sweep.map(|l| (l.index, l.size)).collect();
        assert_eq!(seen, vec![(0, 5), (1, 7), (2, 10)]);
    }

    #[test]
    fn sweep_is_restartable() {
        let img = GrayImage::from_pixel(16, 16, Luma([100]));
        let mut sweep = ScaleSweep::new(&img, &params(vec![3, 5]));
        let fresh = sweep.clone();
        assert_eq!(sweep.by_ref().count(), 2);
        assert!(sweep.next().is_none());
        sweep.restart();
        assert_eq!(sweep.next().map(|l| l.size), Some(3));
        assert_eq!(fresh.count(), 2);
    }

    #[test]
    fn larger_scale_erases_bright_bar_that_smaller_keeps() {
        // 6-pixel bright bar on dark background.
        let img = GrayImage::from_fn(40, 40, |_, y| {
            if (17..23).contains(&y) {
                Luma([200])
            } else {
                Luma([10])
            }
        });
        let layers: Vec<ScaleLayer> = ScaleSweep::new(&img, &params(vec![5, 9])).collect();
        assert_eq!(layers[0].mask.get_pixel(20, 20).0[0], 255);
        assert_eq!(layers[1].mask.get_pixel(20, 20).0[0], 0);
        assert!(layers[1].mask.pixels().all(|p| p.0[0] == 0));
    }

    #[test]
    fn blanking_erodes_mask_borders() {
        let img = GrayImage::from_fn(40, 40, |x, y| {
            if (10..30).contains(&x) && (10..30).contains(&y) {
                Luma([200])
            } else {
                Luma([10])
            }
        });
        let plain: Vec<ScaleLayer> = ScaleSweep::new(&img, &params(vec![3])).collect();
        let blanked_params = SegmentParams {
            blank_thickness: 6,
            ..params(vec![3])
        };
        let blanked: Vec<ScaleLayer> = ScaleSweep::new(&img, &blanked_params).collect();

        assert_eq!(plain[0].mask.get_pixel(11, 20).0[0], 255);
        assert_eq!(blanked[0].mask.get_pixel(11, 20).0[0], 0);
        assert_eq!(blanked[0].mask.get_pixel(20, 20).0[0], 255);
        assert_eq!(blanked[0].opened, plain[0].opened);
    }
}
