//! Freehand painting over a background image.
//!
//! Strokes are rasterized segment by segment as the pointer moves, onto a stroke layer that sits
//! above the background. Nothing is kept as vector data, so there is no undo and no lossless
//! resize; loading a new background starts from an empty layer.

use alloc::vec::Vec;
use ndarray::Array2;

use crate::*;
pub use brush::*;
pub use raster::*;

mod brush;
mod raster;

#[derive(Clone, Debug, PartialEq)]
struct ActiveStroke {
    brush: Brush,
    points: Vec<Point>,
}

#[derive(Clone, Debug)]
pub struct DrawingSurface<B> {
    background: Option<B>,
    fit: ContainFit,
    strokes: Array2<Option<Color>>,
    brush: Brush,
    active: Option<ActiveStroke>,
}

impl<B> Default for DrawingSurface<B> {
    fn default() -> Self {
        Self {
            background: None,
            fit: ContainFit::default(),
            strokes: Array2::from_elem((0, 0), None),
            brush: Brush::default(),
            active: None,
        }
    }
}

impl<B: Backdrop> DrawingSurface<B> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn size(&self) -> Coord2 {
        let dim = self.strokes.dim();
        (dim.0 as Coord, dim.1 as Coord)
    }

    pub fn background(&self) -> Option<&B> {
        self.background.as_ref()
    }

    /// Where the background shows inside the surface.
    pub fn fit(&self) -> ContainFit {
        self.fit
    }

    pub fn brush(&self) -> Brush {
        self.brush
    }

    pub fn is_drawing(&self) -> bool {
        self.active.is_some()
    }

    /// Replaces the background, discarding every stroke, and resizes the raster to `size`.
    pub fn load_background(&mut self, background: B, size: Coord2) {
        log::debug!(
            "load background {:?} into {:?}",
            background.natural_size(),
            size
        );
        self.fit = ContainFit::new(background.natural_size(), size);
        self.background = Some(background);
        self.strokes = Array2::from_elem(size.to_nd_index(), None);
        self.active = None;
    }

    /// Drops the background and every stroke, keeping the brush.
    pub fn unload_background(&mut self) {
        log::debug!("unload background");
        *self = Self {
            brush: self.brush,
            ..Self::default()
        };
    }

    pub fn set_color(&mut self, color: Color) {
        self.brush.color = color;
    }

    pub fn set_width(&mut self, size: BrushSize) {
        self.brush.size = size;
    }

    /// Starts a stroke with the current brush; ignored until a background is loaded.
    pub fn begin_stroke(&mut self, point: Point) -> bool {
        if self.background.is_none() {
            return false;
        }
        log::trace!("begin stroke at {:?}", point);
        self.active = Some(ActiveStroke {
            brush: self.brush,
            points: alloc::vec![point],
        });
        true
    }

    /// Paints the segment from the last stroke point to `point`.
    ///
    /// Returns the part of the raster that may have changed, `None` when nothing was painted.
    pub fn extend_stroke(&mut self, point: Point) -> Option<Region> {
        let active = self.active.as_mut()?;
        let from = *active.points.last()?;
        let brush = active.brush;
        active.points.push(point);
        self.paint_segment(from, point, brush)
    }

    /// Drops the active stroke; its pixels stay on the layer.
    pub fn end_stroke(&mut self) -> bool {
        match self.active.take() {
            Some(stroke) => {
                log::trace!("end stroke after {} points", stroke.points.len());
                true
            }
            None => false,
        }
    }

    /// Erases every stroke, leaving the background.
    pub fn clear(&mut self) {
        self.strokes.fill(None);
    }

    /// Stroke color at `pos`, `None` when unpainted or outside the surface.
    pub fn stroke_at(&self, pos: Coord2) -> Option<Color> {
        self.strokes.get(pos.to_nd_index()).copied().flatten()
    }

    /// Row-major RGBA of the stroke layer inside `region`, transparent where unpainted.
    ///
    /// The buffer always spans all of `region`; pixels outside the surface come out transparent.
    pub fn stroke_layer_rgba8(&self, region: Region) -> Vec<u8> {
        let (w, h) = region.size;
        let mut bytes = Vec::with_capacity(area(w, h) as usize * 4);
        for pos in region.iter() {
            let rgba = self.stroke_at(pos).map_or(TRANSPARENT, Color::rgba);
            bytes.extend_from_slice(&rgba);
        }
        bytes
    }

    /// Flattens background and strokes as shown on screen: the background contain-fitted over
    /// white, strokes on top.
    pub fn export_composite(&self) -> Option<Raster> {
        let background = self.background.as_ref()?;
        Some(Raster::from_fn(self.size(), |pos| {
            if let Some(color) = self.stroke_at(pos) {
                return color.rgba();
            }
            self.fit
                .texel_for(pos)
                .map_or(WHITE, |texel| over_opaque(WHITE, background.texel(texel)))
        }))
    }

    fn paint_segment(&mut self, from: Point, to: Point, brush: Brush) -> Option<Region> {
        let radius = brush.size.radius();
        let min = Point::new(from.x.min(to.x) - radius, from.y.min(to.y) - radius);
        let max = Point::new(from.x.max(to.x) + radius, from.y.max(to.y) + radius);
        let region = Region::clipped(min, max, self.size())?;

        let radius_sq = radius * radius;
        for (x, y) in region.iter() {
            let center = Point::new(f32::from(x) + 0.5, f32::from(y) + 0.5);
            if distance_sq_to_segment(center, from, to) <= radius_sq {
                self.strokes[(x, y).to_nd_index()] = Some(brush.color);
            }
        }
        Some(region)
    }
}

/// Squared distance from `p` to the segment `a..=b`; round caps fall out of the clamping.
fn distance_sq_to_segment(p: Point, a: Point, b: Point) -> f32 {
    let (dx, dy) = (b.x - a.x, b.y - a.y);
    let len_sq = dx * dx + dy * dy;
    let t = if len_sq > 0.0 {
        (((p.x - a.x) * dx + (p.y - a.y) * dy) / len_sq).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let (cx, cy) = (a.x + t * dx - p.x, a.y + t * dy - p.y);
    cx * cx + cy * cy
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::rc::Rc;

    const PAPER: Rgba8 = [0xf0, 0xf0, 0xf0, 0xff];

    fn surface(size: Coord2) -> DrawingSurface<Raster> {
        let mut surface = DrawingSurface::new();
        surface.load_background(Raster::new(size, PAPER), size);
        surface
    }

    fn painted(surface: &DrawingSurface<Raster>) -> usize {
        surface.strokes.iter().filter(|cell| cell.is_some()).count()
    }

    fn stroke(surface: &mut DrawingSurface<Raster>, points: &[(f32, f32)]) {
        surface.begin_stroke(points[0].into());
        for &point in &points[1..] {
            surface.extend_stroke(point.into());
        }
        surface.end_stroke();
    }

    #[test]
    fn strokes_need_a_background() {
        let mut surface = DrawingSurface::<Raster>::new();

        assert!(!surface.begin_stroke(Point::new(1.0, 1.0)));
        assert_eq!(surface.extend_stroke(Point::new(5.0, 5.0)), None);
        assert_eq!(surface.export_composite(), None);
    }

    #[test]
    fn extend_paints_segment_with_active_brush() {
        let mut surface = surface((40, 40));
        surface.set_color(Color::RED);
        surface.set_width(BrushSize::Medium);

        surface.begin_stroke(Point::new(5.0, 20.0));
        let dirty = surface.extend_stroke(Point::new(35.0, 20.0)).unwrap();

        assert_eq!(surface.stroke_at((20, 20)), Some(Color::RED));
        assert_eq!(surface.stroke_at((20, 24)), Some(Color::RED));
        assert_eq!(surface.stroke_at((20, 26)), None);
        // round cap reaches past the end point
        assert_eq!(surface.stroke_at((38, 20)), Some(Color::RED));
        assert!(dirty.contains((20, 20)) && dirty.contains((39, 24)));
    }

    #[test]
    fn brush_changes_only_affect_later_strokes() {
        let mut surface = surface((30, 30));
        stroke(&mut surface, &[(2.0, 2.0), (10.0, 2.0)]);

        surface.begin_stroke(Point::new(2.0, 20.0));
        surface.set_color(Color::GREEN);
        surface.extend_stroke(Point::new(10.0, 20.0));
        surface.end_stroke();

        assert_eq!(surface.stroke_at((5, 2)), Some(Color::BLUE));
        assert_eq!(surface.stroke_at((5, 20)), Some(Color::BLUE));

        stroke(&mut surface, &[(2.0, 10.0), (10.0, 10.0)]);
        assert_eq!(surface.stroke_at((5, 10)), Some(Color::GREEN));
    }

    #[test]
    fn begin_without_movement_paints_nothing() {
        let mut surface = surface((20, 20));
        surface.begin_stroke(Point::new(10.0, 10.0));
        surface.end_stroke();

        assert_eq!(painted(&surface), 0);
    }

    #[test]
    fn out_of_bounds_points_are_clipped() {
        let mut surface = surface((20, 20));
        stroke(&mut surface, &[(-50.0, 10.0), (70.0, 10.0)]);

        assert_eq!(surface.stroke_at((0, 10)), Some(Color::BLUE));
        assert_eq!(surface.stroke_at((19, 10)), Some(Color::BLUE));

        surface.begin_stroke(Point::new(100.0, 100.0));
        assert_eq!(surface.extend_stroke(Point::new(200.0, 100.0)), None);
    }

    #[test]
    fn load_background_discards_strokes_and_resizes() {
        let mut surface = surface((20, 20));
        stroke(&mut surface, &[(1.0, 1.0), (18.0, 18.0)]);
        assert!(painted(&surface) > 0);

        surface.begin_stroke(Point::new(3.0, 3.0));
        surface.load_background(Raster::new((8, 8), PAPER), (32, 24));

        assert_eq!(surface.size(), (32, 24));
        assert_eq!(painted(&surface), 0);
        assert!(!surface.is_drawing());
        assert_eq!(surface.export_composite().unwrap().size(), (32, 24));
    }

    #[test]
    fn clear_restores_the_fresh_composite() {
        let fresh = surface((24, 16)).export_composite().unwrap();
        let mut surface = surface((24, 16));
        stroke(&mut surface, &[(0.0, 0.0), (24.0, 16.0)]);
        assert_ne!(surface.export_composite().unwrap(), fresh);

        surface.clear();

        assert_eq!(surface.export_composite().unwrap(), fresh);
        assert!(surface.background().is_some());
    }

    #[test]
    fn end_stroke_is_idempotent() {
        let mut surface = surface((20, 20));
        surface.begin_stroke(Point::new(2.0, 2.0));
        surface.extend_stroke(Point::new(12.0, 2.0));

        assert!(surface.end_stroke());
        let after_first = surface.export_composite();
        assert!(!surface.end_stroke());
        assert_eq!(surface.export_composite(), after_first);
        assert_eq!(surface.extend_stroke(Point::new(12.0, 12.0)), None);
    }

    #[test]
    fn export_letterboxes_background_and_draws_strokes_on_top() {
        let mut surface = DrawingSurface::new();
        let background = Raster::from_fn((4, 2), |(x, _)| if x < 2 { PAPER } else { [0, 0, 0, 0xff] });
        surface.load_background(background, (8, 8));
        stroke(&mut surface, &[(0.0, 7.5), (8.0, 7.5)]);

        let composite = surface.export_composite().unwrap();

        assert_eq!(composite.pixel((1, 0)), WHITE);
        assert_eq!(composite.pixel((1, 3)), PAPER);
        assert_eq!(composite.pixel((6, 4)), [0, 0, 0, 0xff]);
        assert_eq!(composite.pixel((3, 7)), Color::BLUE.rgba());
    }

    #[test]
    fn stroke_layer_bytes_are_transparent_where_unpainted() {
        let mut surface = surface((10, 10));
        surface.set_color(Color::BLACK);
        stroke(&mut surface, &[(0.0, 0.5), (10.0, 0.5)]);

        let bytes = surface.stroke_layer_rgba8(Region {
            origin: (0, 0),
            size: (1, 5),
        });

        assert_eq!(&bytes[..4], &Color::BLACK.rgba());
        assert_eq!(&bytes[16..], &TRANSPARENT);
    }

    #[test]
    fn unloading_leaves_nothing_to_draw_or_export() {
        let mut surface = surface((12, 12));
        surface.set_color(Color::GREEN);
        surface.begin_stroke(Point::new(2.0, 2.0));
        surface.extend_stroke(Point::new(9.0, 9.0));

        surface.unload_background();

        assert!(surface.background().is_none());
        assert!(!surface.is_drawing());
        assert_eq!(surface.size(), (0, 0));
        assert_eq!(surface.stroke_at((5, 5)), None);
        assert_eq!(surface.export_composite(), None);
        assert!(!surface.begin_stroke(Point::new(5.0, 5.0)));
        assert_eq!(surface.brush().color, Color::GREEN);
    }

    #[test]
    fn reads_outside_the_surface_are_empty() {
        let mut surface = surface((10, 10));
        surface.set_color(Color::RED);
        stroke(&mut surface, &[(0.0, 9.5), (10.0, 9.5)]);

        assert_eq!(surface.stroke_at((10, 9)), None);
        assert_eq!(surface.stroke_at((3, 400)), None);

        let bytes = surface.stroke_layer_rgba8(Region {
            origin: (8, 9),
            size: (4, 3),
        });
        assert_eq!(bytes.len(), 4 * 3 * 4);
        assert_eq!(&bytes[..4], &Color::RED.rgba());
        assert_eq!(&bytes[8..12], &TRANSPARENT);
        assert_eq!(&bytes[16..20], &TRANSPARENT);

        let empty = DrawingSurface::<Raster>::new();
        assert_eq!(empty.stroke_at((0, 0)), None);
        assert_eq!(empty.stroke_layer_rgba8(Region { origin: (0, 0), size: (2, 1) }), [0; 8]);
    }

    #[test]
    fn backgrounds_may_be_shared() {
        let page = Rc::new(Raster::new((4, 4), PAPER));
        let mut surface = DrawingSurface::new();

        surface.load_background(Rc::clone(&page), (4, 4));

        assert_eq!(Rc::strong_count(&page), 2);
        assert_eq!(surface.export_composite().unwrap().pixel((0, 0)), PAPER);
    }
}
