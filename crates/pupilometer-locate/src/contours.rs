//! Blob boundaries of a binary mask and their area ranking.

use image::GrayImage;
use imageproc::contours::{find_contours, BorderType};
use imageproc::geometry::contour_area;
use pupilometer_core::{BoundingBox, Point};

/// One connected-component boundary.
#[derive(Clone, Debug, PartialEq)]
pub struct Contour {
    pub points: Vec<Point>,
    pub bbox: BoundingBox,
    /// Enclosed polygon area in square pixels.
    pub area: f64,
    /// `true` for the inner border of a hole in a foreground component.
    pub is_hole: bool,
}

impl Contour {
    #[inline]
    pub fn center(&self) -> Point {
        self.bbox.center()
    }
}

/// Extract every outer and hole border of the nonzero pixels of `mask`,
/// in discovery order (raster scan of the border-following pass).
pub fn extract_contours(mask: &GrayImage) -> Vec<Contour> {
    find_contours::<i32>(mask)
        .into_iter()
        .filter_map(|c| {
            let area = contour_area(&c.points).abs();
            let points: Vec<Point> = c.points.iter().map(|p| Point::new(p.x, p.y)).collect();
            let bbox = BoundingBox::from_points(points.iter().copied())?;
            Some(Contour {
                points,
                bbox,
                area,
                is_hole: matches!(c.border_type, BorderType::Hole),
            })
        })
        .collect()
}

/// Order contours by descending area. Equal areas keep discovery order.
pub fn rank_contours(mut contours: Vec<Contour>) -> Vec<Contour> {
    contours.sort_by(|a, b| b.area.total_cmp(&a.area));
    contours
}
