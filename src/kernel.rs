// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The escape-time iteration kernel.  This is the dominant per-pixel
//! cost, and an input-dependent one: points near the set boundary run
//! to the cap while points far outside escape in a handful of steps.
//! That variance is why the layers above deal work dynamically.

use num::Complex;

/// Iterates `z = z^2 + c` from `z = 0` and returns the number of
/// iterations completed before `|z|^2` exceeded 4, or `max_iter` if
/// the orbit never escaped within the cap.  A return of `max_iter`
/// means `c` is treated as inside the set.
///
/// The loop works on the real and imaginary parts directly
/// (`x' = x^2 - y^2 + x0`, `y' = 2xy + y0`) and tests the squared
/// magnitude, so there is no complex multiply and no square root.
/// Touches only its own locals; callable from any thread.
pub fn escape_time(c: Complex<f64>, max_iter: u32) -> u32 {
    let mut x = 0.0_f64;
    let mut y = 0.0_f64;
    for n in 0..max_iter {
        let xx = x * x;
        let yy = y * y;
        y = 2.0 * x * y + c.im;
        x = xx - yy + c.re;
        if x * x + y * y > 4.0 {
            return n;
        }
    }
    max_iter
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_never_escapes() {
        assert_eq!(escape_time(Complex::new(0.0, 0.0), 50), 50);
        assert_eq!(escape_time(Complex::new(0.0, 0.0), 1000), 1000);
    }

    #[test]
    fn two_escapes_immediately() {
        // |c| > 2, so the orbit leaves the disc on the first step.
        assert!(escape_time(Complex::new(2.0, 0.0), 50) <= 1);
    }

    #[test]
    fn minus_one_is_in_the_set() {
        // -1 cycles between -1 and 0 forever.
        assert_eq!(escape_time(Complex::new(-1.0, 0.0), 1000), 1000);
    }

    #[test]
    fn far_exterior_point_escapes_before_the_cap() {
        let n = escape_time(Complex::new(0.5, 0.5), 1000);
        assert!(n < 1000);
    }

    #[test]
    fn cap_bounds_the_result() {
        let c = Complex::new(-0.75, 0.05);
        assert!(escape_time(c, 25) <= 25);
    }
}
