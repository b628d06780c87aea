//! Contour blanking for masks with noisy blob borders.

use image::{GrayImage, Luma};
use imageproc::drawing::draw_filled_circle_mut;

use crate::contours::Contour;

/// Paint every contour point black with a stroke `thickness` pixels wide.
///
/// A zero thickness returns the mask unchanged.
pub fn blank_contours(mask: &GrayImage, contours: &[Contour], thickness: u32) -> GrayImage {
    let mut out = mask.clone();
    if thickness == 0 {
        return out;
    }
    let radius = (thickness / 2) as i32;
    for contour in contours {
        for p in &contour.points {
            if radius == 0 {
                if p.is_inside(out.width(), out.height()) {
                    out.put_pixel(p.x as u32, p.y as u32, Luma([0]));
                }
            } else {
                draw_filled_circle_mut(&mut out, (p.x, p.y), radius, Luma([0]));
            }
        }
    }
    out
}
