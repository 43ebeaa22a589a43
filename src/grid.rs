// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Contains the Grid struct, which ties a rectangle on the integral
//! pixel plane (origin at 0,0) to a rectangle on the complex plane
//! given by its leftlower and rightupper corners, plus the iteration
//! cap for the run.  'leftlower' may seem ungrammatical, but it fits
//! the x,y schema.

use errors::ConfigError;
use num::Complex;

/// An immutable description of one rendering run: the pixel
/// dimensions of the output, the complex-plane rectangle they map
/// onto, and the escape-iteration cap.  Validated once at
/// construction; every invariant the hot path relies on holds from
/// then on.
#[derive(Copy, Clone, Debug)]
pub struct Grid {
    /// Width of the output in pixels.
    pub width: usize,
    /// Height of the output in pixels (the row count the planner
    /// partitions).
    pub height: usize,
    /// The left-lower corner of the complex rectangle.
    pub leftlower: Complex<f64>,
    /// The right-upper corner of the complex rectangle.
    pub rightupper: Complex<f64>,
    /// Iteration cap; counts equal to this mean "in the set".
    pub max_iter: u32,
    // Per-pixel strides along the real and imaginary axes.
    steps: (f64, f64),
}

impl Grid {
    /// Constructor.  Rejects empty pixel dimensions, an inverted or
    /// degenerate complex rectangle, and a zero iteration cap.
    pub fn new(
        width: usize,
        height: usize,
        leftlower: Complex<f64>,
        rightupper: Complex<f64>,
        max_iter: u32,
    ) -> Result<Grid, ConfigError> {
        if width == 0 || height == 0 {
            return Err(ConfigError::BadDimensions { width, height });
        }
        if rightupper.re <= leftlower.re || rightupper.im <= leftlower.im {
            return Err(ConfigError::BadPlane);
        }
        if max_iter == 0 {
            return Err(ConfigError::BadIterationCap);
        }

        let steps = (
            (rightupper.re - leftlower.re) / (width as f64),
            (rightupper.im - leftlower.im) / (height as f64),
        );

        Ok(Grid {
            width,
            height,
            leftlower,
            rightupper,
            max_iter,
            steps,
        })
    }

    /// The total number of pixels in the grid.  Used to size the
    /// result buffer.
    pub fn len(&self) -> usize {
        self.width * self.height
    }

    /// Whether the grid holds no pixels.  Can never be true for a
    /// constructed Grid; present for slice-like completeness.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// The affine mapping from a pixel's column and row to the point
    /// on the complex plane where its orbit starts.
    pub fn point_for(&self, col: usize, row: usize) -> Complex<f64> {
        Complex {
            re: self.leftlower.re + (col as f64) * self.steps.0,
            im: self.leftlower.im + (row as f64) * self.steps.1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_fails_on_inverted_corners() {
        let g = Grid::new(4, 4, Complex::new(1.0, 1.0), Complex::new(-1.0, -1.0), 10);
        assert_eq!(g.unwrap_err(), ConfigError::BadPlane);
    }

    #[test]
    fn grid_fails_on_empty_dimensions() {
        let ll = Complex::new(-1.0, -1.0);
        let ru = Complex::new(1.0, 1.0);
        assert!(Grid::new(0, 4, ll, ru, 10).is_err());
        assert!(Grid::new(4, 0, ll, ru, 10).is_err());
    }

    #[test]
    fn grid_fails_on_zero_iteration_cap() {
        let g = Grid::new(4, 4, Complex::new(-1.0, -1.0), Complex::new(1.0, 1.0), 0);
        assert_eq!(g.unwrap_err(), ConfigError::BadIterationCap);
    }

    #[test]
    fn grid_passes_on_good_shape() {
        let g = Grid::new(4, 4, Complex::new(-2.0, -1.5), Complex::new(1.0, 1.5), 50);
        assert!(g.is_ok());
    }

    #[test]
    fn point_for_maps_corners_and_center() {
        let g = Grid::new(4, 4, Complex::new(-2.0, -2.0), Complex::new(2.0, 2.0), 10).unwrap();
        assert_eq!(g.point_for(0, 0), Complex::new(-2.0, -2.0));
        assert_eq!(g.point_for(2, 2), Complex::new(0.0, 0.0));
        assert_eq!(g.point_for(4, 4), Complex::new(2.0, 2.0));
    }

    #[test]
    fn point_for_maps_on_positive_planes() {
        let g = Grid::new(5, 5, Complex::new(0.0, 0.0), Complex::new(5.0, 5.0), 10).unwrap();
        assert_eq!(g.point_for(0, 0), Complex::new(0.0, 0.0));
        assert_eq!(g.point_for(2, 3), Complex::new(2.0, 3.0));
    }
}
