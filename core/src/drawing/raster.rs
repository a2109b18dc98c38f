use alloc::{rc::Rc, vec::Vec};
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Straight (non-premultiplied) RGBA pixel.
pub type Rgba8 = [u8; 4];

pub const WHITE: Rgba8 = [0xff, 0xff, 0xff, 0xff];
pub const TRANSPARENT: Rgba8 = [0, 0, 0, 0];

/// Pixel image indexed by `(x, y)`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Raster {
    pixels: Array2<Rgba8>,
}

impl Raster {
    pub fn new(size: Coord2, fill: Rgba8) -> Self {
        Self {
            pixels: Array2::from_elem(size.to_nd_index(), fill),
        }
    }

    pub fn from_fn(size: Coord2, mut f: impl FnMut(Coord2) -> Rgba8) -> Self {
        Self {
            pixels: Array2::from_shape_fn(size.to_nd_index(), |(x, y)| {
                f((x as Coord, y as Coord))
            }),
        }
    }

    /// Builds a raster from row-major RGBA bytes, the layout of browser `ImageData`.
    pub fn from_rgba8(size: Coord2, bytes: &[u8]) -> Result<Self> {
        let expected = area(size.0, size.1) as usize * 4;
        if bytes.len() != expected {
            return Err(Error::RasterLength {
                expected,
                actual: bytes.len(),
            });
        }
        let width = usize::from(size.0);
        Ok(Self::from_fn(size, |(x, y)| {
            let at = (usize::from(y) * width + usize::from(x)) * 4;
            [bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]]
        }))
    }

    pub fn size(&self) -> Coord2 {
        let dim = self.pixels.dim();
        (dim.0 as Coord, dim.1 as Coord)
    }

    pub fn pixel(&self, pos: Coord2) -> Rgba8 {
        self.pixels[pos.to_nd_index()]
    }

    pub fn set_pixel(&mut self, pos: Coord2, rgba: Rgba8) {
        self.pixels[pos.to_nd_index()] = rgba;
    }

    /// Row-major RGBA bytes.
    pub fn to_rgba8(&self) -> Vec<u8> {
        let (width, height) = self.size();
        let mut bytes = Vec::with_capacity(area(width, height) as usize * 4);
        for y in 0..height {
            for x in 0..width {
                bytes.extend_from_slice(&self.pixel((x, y)));
            }
        }
        bytes
    }
}

/// Image a drawing surface paints over.
pub trait Backdrop {
    /// Size of the image in its own pixels.
    fn natural_size(&self) -> Coord2;

    /// Color at `pos`, which is always inside [`Backdrop::natural_size`].
    fn texel(&self, pos: Coord2) -> Rgba8;
}

impl Backdrop for Raster {
    fn natural_size(&self) -> Coord2 {
        self.size()
    }

    fn texel(&self, pos: Coord2) -> Rgba8 {
        self.pixel(pos)
    }
}

impl<T: Backdrop + ?Sized> Backdrop for &T {
    fn natural_size(&self) -> Coord2 {
        (**self).natural_size()
    }

    fn texel(&self, pos: Coord2) -> Rgba8 {
        (**self).texel(pos)
    }
}

impl<T: Backdrop + ?Sized> Backdrop for Rc<T> {
    fn natural_size(&self) -> Coord2 {
        (**self).natural_size()
    }

    fn texel(&self, pos: Coord2) -> Rgba8 {
        (**self).texel(pos)
    }
}

/// Placement of an image scaled uniformly to fit inside a box and centered in it.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainFit {
    natural: Coord2,
    origin: Coord2,
    size: Coord2,
}

impl ContainFit {
    pub fn new(natural: Coord2, bounds: Coord2) -> Self {
        let (nw, nh) = (u32::from(natural.0), u32::from(natural.1));
        let (bw, bh) = (u32::from(bounds.0), u32::from(bounds.1));
        if nw == 0 || nh == 0 || bw == 0 || bh == 0 {
            return Self {
                natural,
                ..Default::default()
            };
        }

        // compare aspect ratios without division: bw / nw <= bh / nh
        let (fw, fh) = if u64::from(bw) * u64::from(nh) <= u64::from(bh) * u64::from(nw) {
            (bw, (nh * bw / nw).max(1))
        } else {
            ((nw * bh / nh).max(1), bh)
        };

        Self {
            natural,
            origin: (((bw - fw) / 2) as Coord, ((bh - fh) / 2) as Coord),
            size: (fw as Coord, fh as Coord),
        }
    }

    /// Region of the box covered by the image.
    pub fn region(&self) -> Region {
        Region {
            origin: self.origin,
            size: self.size,
        }
    }

    /// Image pixel shown at box pixel `pos`, nearest-neighbor.
    pub fn texel_for(&self, pos: Coord2) -> Option<Coord2> {
        if !self.region().contains(pos) {
            return None;
        }
        let scale = |p: Coord, o: Coord, fitted: Coord, natural: Coord| {
            (u32::from(p - o) * u32::from(natural) / u32::from(fitted)) as Coord
        };
        Some((
            scale(pos.0, self.origin.0, self.size.0, self.natural.0),
            scale(pos.1, self.origin.1, self.size.1, self.natural.1),
        ))
    }
}

/// Source-over of a straight-alpha pixel onto an opaque one.
pub fn over_opaque(dst: Rgba8, src: Rgba8) -> Rgba8 {
    let alpha = u16::from(src[3]);
    if alpha == 0xff {
        return src;
    }
    let inv = 0xff - alpha;

    let mut out = WHITE;
    for i in 0..3 {
        let sc = mul_div255(u16::from(src[i]), alpha);
        let dc = mul_div255(u16::from(dst[i]), inv);
        out[i] = sc.saturating_add(dc);
    }
    out
}

fn mul_div255(x: u16, y: u16) -> u8 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_rgba8_reads_row_major_bytes() {
        let bytes = [
            1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, //
            13, 14, 15, 16, 17, 18, 19, 20, 21, 22, 23, 24,
        ];

        let raster = Raster::from_rgba8((3, 2), &bytes).unwrap();

        assert_eq!(raster.size(), (3, 2));
        assert_eq!(raster.pixel((1, 0)), [5, 6, 7, 8]);
        assert_eq!(raster.pixel((0, 1)), [13, 14, 15, 16]);
        assert_eq!(raster.to_rgba8(), bytes);
    }

    #[test]
    fn from_rgba8_checks_length() {
        assert_eq!(
            Raster::from_rgba8((2, 2), &[0; 12]),
            Err(Error::RasterLength {
                expected: 16,
                actual: 12
            })
        );
    }

    #[test]
    fn contain_fit_letterboxes_wide_image() {
        let fit = ContainFit::new((200, 100), (100, 100));

        assert_eq!(
            fit.region(),
            Region {
                origin: (0, 25),
                size: (100, 50)
            }
        );
        assert_eq!(fit.texel_for((0, 24)), None);
        assert_eq!(fit.texel_for((0, 25)), Some((0, 0)));
        assert_eq!(fit.texel_for((99, 74)), Some((198, 98)));
        assert_eq!(fit.texel_for((50, 75)), None);
    }

    #[test]
    fn contain_fit_pillarboxes_tall_image() {
        let fit = ContainFit::new((10, 40), (30, 40));

        assert_eq!(
            fit.region(),
            Region {
                origin: (10, 0),
                size: (10, 40)
            }
        );
        assert_eq!(fit.texel_for((15, 39)), Some((5, 39)));
    }

    #[test]
    fn contain_fit_of_empty_image_covers_nothing() {
        let fit = ContainFit::new((0, 0), (30, 40));
        assert_eq!(fit.texel_for((0, 0)), None);
    }

    #[test]
    fn over_opaque_blends_by_source_alpha() {
        assert_eq!(over_opaque(WHITE, [10, 20, 30, 0xff]), [10, 20, 30, 0xff]);
        assert_eq!(over_opaque(WHITE, TRANSPARENT), WHITE);
        assert_eq!(over_opaque([0, 0, 0, 0xff], [255, 255, 255, 128]), [128, 128, 128, 0xff]);
    }
}
