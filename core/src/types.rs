use serde::{Deserialize, Serialize};

/// Single coordinate axis used for raster width, height, and pixel positions.
pub type Coord = u16;

/// Count type used for pixel totals.
pub type PixelCount = u32;

/// Two-dimensional coordinates `(x, y)`.
pub type Coord2 = (Coord, Coord);

pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

impl ToNdIndex for Coord2 {
    type Output = [usize; 2];

    fn to_nd_index(self) -> Self::Output {
        [self.0.into(), self.1.into()]
    }
}

pub const fn area(a: Coord, b: Coord) -> PixelCount {
    let a = a as PixelCount;
    let b = b as PixelCount;
    a.saturating_mul(b)
}

/// Pointer position in surface pixels; may lie outside the raster.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl From<(f32, f32)> for Point {
    fn from((x, y): (f32, f32)) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned pixel rectangle, always inside the raster it was clipped to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub origin: Coord2,
    pub size: Coord2,
}

impl Region {
    /// Clips the inclusive float bounds `min..=max` to a raster of `bounds`.
    ///
    /// Returns `None` when nothing of the rectangle is left.
    pub(crate) fn clipped(min: Point, max: Point, bounds: Coord2) -> Option<Self> {
        let (max_x, max_y) = (i32::from(bounds.0), i32::from(bounds.1));
        // float to int casts truncate towards zero, widen by one to cover negatives
        let x0 = (min.x as i32 - 1).clamp(0, max_x);
        let y0 = (min.y as i32 - 1).clamp(0, max_y);
        let x1 = (max.x as i32 + 2).clamp(0, max_x);
        let y1 = (max.y as i32 + 2).clamp(0, max_y);

        if x0 >= x1 || y0 >= y1 {
            return None;
        }

        Some(Self {
            origin: (x0 as Coord, y0 as Coord),
            size: ((x1 - x0) as Coord, (y1 - y0) as Coord),
        })
    }

    pub fn contains(&self, (x, y): Coord2) -> bool {
        let (ox, oy) = self.origin;
        let (w, h) = self.size;
        x >= ox && y >= oy && x - ox < w && y - oy < h
    }

    pub fn iter(&self) -> impl Iterator<Item = Coord2> + use<> {
        let (ox, oy) = self.origin;
        let (w, h) = self.size;
        (oy..oy + h).flat_map(move |y| (ox..ox + w).map(move |x| (x, y)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clipped_region_stays_inside_bounds() {
        let region = Region::clipped(Point::new(-30.0, -4.0), Point::new(8.5, 300.0), (10, 20))
            .unwrap();

        assert_eq!(region.origin, (0, 0));
        assert_eq!(region.size, (10, 20));
    }

    #[test]
    fn clipped_region_outside_raster_is_none() {
        let region = Region::clipped(Point::new(40.0, 40.0), Point::new(50.0, 50.0), (10, 10));

        assert_eq!(region, None);
    }

    #[test]
    fn region_iterates_row_major() {
        let region = Region {
            origin: (1, 2),
            size: (2, 2),
        };

        let coords: alloc::vec::Vec<_> = region.iter().collect();

        assert_eq!(coords, [(1, 2), (2, 2), (1, 3), (2, 3)]);
        assert!(region.contains((2, 3)));
        assert!(!region.contains((3, 3)));
    }
}
