//! Thin wrappers over the `imageproc` primitives used by the pipeline.

use image::{GrayImage, Luma};
use imageproc::contrast::{threshold, ThresholdType};
use imageproc::filter::{gaussian_blur_f32, median_filter};
use imageproc::morphology::{grayscale_dilate, grayscale_erode, Mask};

use crate::params::DenoiseParams;

/// Gaussian blur result (or the input when disabled).
pub fn gaussian(frame: &GrayImage, params: &DenoiseParams) -> GrayImage {
    match params.gaussian_sigma() {
        Some(sigma) => gaussian_blur_f32(frame, sigma),
        None => frame.clone(),
    }
}

/// Median filter result (or the input when disabled).
pub fn median(frame: &GrayImage, params: &DenoiseParams) -> GrayImage {
    match params.median_radius() {
        Some(r) => median_filter(frame, r, r),
        None => frame.clone(),
    }
}

/// Square `size x size` structuring element anchored at `(size / 2, size / 2)`.
///
/// `size` must be in `1..=255`.
pub fn square_element(size: u32) -> Mask {
    let side = size.clamp(1, u8::MAX as u32);
    let footprint = GrayImage::from_pixel(side, side, Luma([255]));
    let anchor = (side / 2) as u8;
    Mask::from_image(&footprint, anchor, anchor)
}

/// Grayscale opening: erosion followed by dilation with the same element.
pub fn open_gray(image: &GrayImage, element: &Mask) -> GrayImage {
    let eroded = grayscale_erode(image, element);
    grayscale_dilate(&eroded, element)
}

/// Pixels strictly above `cutoff` become 255, the rest 0.
pub fn binarize(image: &GrayImage, cutoff: u8) -> GrayImage {
    threshold(image, cutoff, ThresholdType::Binary)
}
