use serde::{Deserialize, Serialize};

/// Integer pixel coordinate.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move by one unit step along `dir`.
    #[inline]
    pub fn step(self, dir: Direction) -> Self {
        let (dx, dy) = dir.offset();
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// True when the point lies in `1 < x < width - 1`, `1 < y < height - 1`.
    ///
    /// This is the region a ray walk is allowed to advance from.
    #[inline]
    pub fn is_interior(self, width: u32, height: u32) -> bool {
        let (w, h) = (width as i64, height as i64);
        let (x, y) = (self.x as i64, self.y as i64);
        1 < x && x < w - 1 && 1 < y && y < h - 1
    }

    /// True when the point indexes a pixel of a `width x height` frame.
    #[inline]
    pub fn is_inside(self, width: u32, height: u32) -> bool {
        self.x >= 0 && self.y >= 0 && (self.x as u32) < width && (self.y as u32) < height
    }
}

/// Unit step directions used for ray casting, in image coordinates
/// (`y` grows downward, so `South` is `(0, +1)`).
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    East,
    West,
    North,
    South,
    NorthEast,
    NorthWest,
    SouthEast,
    SouthWest,
}

impl Direction {
    /// Lower half-circle fan: east, west, south and the two southern diagonals.
    pub const COMPASS5: [Direction; 5] = [
        Direction::East,
        Direction::West,
        Direction::South,
        Direction::SouthEast,
        Direction::SouthWest,
    ];

    /// Minimal fan: east, west and south.
    pub const TRIAD: [Direction; 3] = [Direction::East, Direction::West, Direction::South];

    /// Pixel offset `(dx, dy)` of one step.
    #[inline]
    pub const fn offset(self) -> (i32, i32) {
        match self {
            Direction::East => (1, 0),
            Direction::West => (-1, 0),
            Direction::North => (0, -1),
            Direction::South => (0, 1),
            Direction::NorthEast => (1, -1),
            Direction::NorthWest => (-1, -1),
            Direction::SouthEast => (1, 1),
            Direction::SouthWest => (-1, 1),
        }
    }
}

/// Axis-aligned bounding box in pixels.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl BoundingBox {
    /// Tight box around `points`, `None` for an empty slice.
    ///
    /// Width and height count pixels, so a single point yields a 1x1 box.
    pub fn from_points(points: impl IntoIterator<Item = Point>) -> Option<Self> {
        let mut it = points.into_iter();
        let first = it.next()?;
        let (mut x0, mut y0, mut x1, mut y1) = (first.x, first.y, first.x, first.y);
        for p in it {
            x0 = x0.min(p.x);
            y0 = y0.min(p.y);
            x1 = x1.max(p.x);
            y1 = y1.max(p.y);
        }
        Some(Self {
            x: x0,
            y: y0,
            width: x1 - x0 + 1,
            height: y1 - y0 + 1,
        })
    }

    /// Center rounded toward the top-left: `(x + w / 2, y + h / 2)`.
    #[inline]
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2, self.y + self.height / 2)
    }
}
