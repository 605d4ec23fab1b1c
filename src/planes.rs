// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Contains the PlaneMapper struct, which describes a relationship
//! between the square of the complex plane the samples are drawn
//! from, centred on the origin, and the integral grid of the canvas
//! with its origin at 0,0.
//!
//! Note the orientation: the real axis runs down the rows and the
//! imaginary axis runs across the columns, so the symmetry of the
//! set about the real axis becomes a left/right mirror of the canvas.
use num::Complex;

use crate::errors::{Error, Result};

/// A cell of the canvas, as (row, column).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Pixel(pub usize, pub usize);

/// Maps points in the square `[-extent, extent)^2` onto a
/// `height x width` grid.
#[derive(Clone, Debug)]
pub struct PlaneMapper {
    height: usize,
    width: usize,
    extent: f64,
    // Side of the complex square.
    span: f64,
}

impl PlaneMapper {
    /// Takes the size of the integral grid and the half-width of the
    /// complex square centred on the origin.
    pub fn new(height: usize, width: usize, extent: f64) -> Result<PlaneMapper> {
        if height == 0 || width == 0 {
            return Err(Error::EmptyCanvas { height, width });
        }
        if !(extent.is_finite() && extent > 0.0) {
            return Err(Error::BadExtent { extent });
        }
        Ok(PlaneMapper {
            height,
            width,
            extent,
            span: 2.0 * extent,
        })
    }

    /// Rows of the grid.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Columns of the grid.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Half-width of the complex square.
    pub fn extent(&self) -> f64 {
        self.extent
    }

    /// Given a complex number, find the grid cell it falls in, or
    /// `None` if it lies outside the square.  Orbits routinely leave
    /// the square in their last few steps before escaping.
    ///
    /// The map is worked in double precision; in single precision a
    /// point on a cell boundary can round into the neighbouring cell.
    pub fn point_to_pixel(&self, point: &Complex<f32>) -> Option<Pixel> {
        let top = (f64::from(point.re) + self.extent) / self.span * (self.height as f64);
        let left = (f64::from(point.im) + self.extent) / self.span * (self.width as f64);
        // NaN fails both comparisons and is rejected along with the rest.
        if !(top >= 0.0 && left >= 0.0) {
            return None;
        }
        let (row, column) = (top as usize, left as usize);
        if row >= self.height || column >= self.width {
            return None;
        }
        Some(Pixel(row, column))
    }

    /// The cell on the other side of the real axis.
    pub fn mirror(&self, pixel: Pixel) -> Pixel {
        Pixel(pixel.0, self.width - 1 - pixel.1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn planemapper_fails_on_bad_shape() {
        assert!(PlaneMapper::new(0, 4, 1.8).is_err());
        assert!(PlaneMapper::new(4, 0, 1.8).is_err());
    }

    #[test]
    fn planemapper_fails_on_bad_extent() {
        assert!(PlaneMapper::new(4, 4, 0.0).is_err());
        assert!(PlaneMapper::new(4, 4, -1.0).is_err());
        assert!(PlaneMapper::new(4, 4, std::f64::NAN).is_err());
    }

    #[test]
    fn point_to_pixel_on_small_planes() {
        let pm = PlaneMapper::new(4, 4, 2.0).unwrap();
        assert_eq!(pm.point_to_pixel(&Complex::new(0.0, 0.0)), Some(Pixel(2, 2)));
        assert_eq!(pm.point_to_pixel(&Complex::new(-2.0, -2.0)), Some(Pixel(0, 0)));
        assert_eq!(pm.point_to_pixel(&Complex::new(1.0, -1.0)), Some(Pixel(3, 1)));
        assert_eq!(pm.point_to_pixel(&Complex::new(2.0, 0.0)), None);
        assert_eq!(pm.point_to_pixel(&Complex::new(0.0, -2.5)), None);
    }

    #[test]
    fn point_to_pixel_maps_on_large_rectangles() {
        let pm = PlaneMapper::new(640, 320, 2.0).unwrap();
        assert_eq!(pm.point_to_pixel(&Complex::new(0.0, 0.0)), Some(Pixel(320, 160)));
        assert_eq!(pm.point_to_pixel(&Complex::new(1.0, 1.0)), Some(Pixel(480, 240)));
        assert_eq!(pm.point_to_pixel(&Complex::new(1.999, 1.999)), Some(Pixel(639, 319)));
    }

    #[test]
    fn cell_boundaries_follow_double_precision() {
        let pm = PlaneMapper::new(32, 32, 1.8).unwrap();
        // Each of these sits just under a row boundary in double
        // precision and rounds up onto it in single precision.
        assert_eq!(pm.point_to_pixel(&Complex::new(0.5625, 0.0)), Some(Pixel(20, 16)));
        assert_eq!(pm.point_to_pixel(&Complex::new(1.125, 0.0)), Some(Pixel(25, 16)));
        assert_eq!(pm.point_to_pixel(&Complex::new(1.6875, 0.0)), Some(Pixel(30, 16)));
        // These land on or just past one, where single precision
        // falls short of it.
        assert_eq!(pm.point_to_pixel(&Complex::new(-1.125, -1.125)), Some(Pixel(6, 6)));
        assert_eq!(pm.point_to_pixel(&Complex::new(-1.6875, 0.0)), Some(Pixel(1, 16)));
    }

    #[test]
    fn nan_is_off_canvas() {
        let pm = PlaneMapper::new(4, 4, 2.0).unwrap();
        assert_eq!(pm.point_to_pixel(&Complex::new(std::f32::NAN, 0.0)), None);
    }

    #[test]
    fn mirror_flips_columns() {
        let pm = PlaneMapper::new(4, 5, 2.0).unwrap();
        assert_eq!(pm.mirror(Pixel(1, 0)), Pixel(1, 4));
        assert_eq!(pm.mirror(Pixel(1, 2)), Pixel(1, 2));
    }
}
