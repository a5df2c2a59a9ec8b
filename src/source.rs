// Copyright (c) 2026, Chad Hogan
// All rights reserved.
//
// This source code is licensed under the BSD-3-Clause license found in the
// LICENSE file in the root directory of this source tree.

use crate::core::{Field, GridData};

/// Seed a layered, centre-peaked pulse into `field`.
///
/// For `s` from `wavelet.len() - 1` down to `0`, every cell with
/// `rows/2 - s <= i < rows/2 + s` and `cols/2 - s <= j < cols/2 + s` is set to
/// `wavelet[s]`. Smaller squares are written last, so each cell ends up with
/// the tap of the smallest square enclosing it. The `s = 0` square is empty,
/// which leaves the centre cell holding `wavelet[1]`.
///
/// Squares are clipped to the interior `[radius, rows - radius) x
/// [radius, cols - radius)`; boundary cells are never written.
pub fn inject_wavelet(field: &mut Field, wavelet: &[f64], radius: usize) {
    let (rows, cols) = (field.rows(), field.cols());
    if rows <= 2 * radius || cols <= 2 * radius {
        return;
    }
    let (ci, cj) = (rows / 2, cols / 2);

    // Order matters: later (smaller) squares overwrite earlier ones.
    for (s, &tap) in wavelet.iter().enumerate().rev() {
        let i_lo = ci.saturating_sub(s).max(radius);
        let i_hi = (ci + s).min(rows - radius);
        let j_lo = cj.saturating_sub(s).max(radius);
        let j_hi = (cj + s).min(cols - radius);
        for i in i_lo..i_hi {
            for j in j_lo..j_hi {
                field.set(i, j, tap);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(n: usize) -> Vec<f64> {
        (0..n).map(|s| (s + 1) as f64).collect()
    }

    #[test]
    fn shrinking_squares_overwrite_outward_in() {
        let mut field = Field::zeros(32, 32).unwrap();
        let wavelet = ramp(12);
        inject_wavelet(&mut field, &wavelet, 1);

        // centre holds the s = 1 tap
        assert_eq!(field.get(16, 16), wavelet[1]);
        assert_eq!(field.get(15, 15), wavelet[1]);
        // low edge of square s holds wavelet[s]
        for k in 1..12 {
            assert_eq!(field.get(16 - k, 16), wavelet[k], "k={}", k);
            assert_eq!(field.get(16, 16 - k), wavelet[k], "k={}", k);
        }
        // high side is exclusive, so it holds the next tap out
        for k in 0..11 {
            assert_eq!(field.get(16 + k, 16), wavelet[k + 1], "k={}", k);
        }
        // outside the largest square nothing is written
        assert_eq!(field.get(16 - 12, 16), 0.0);
        assert_eq!(field.get(16 + 11, 16), 0.0);
        assert_eq!(field.get(0, 0), 0.0);
    }

    #[test]
    fn outermost_corner_holds_largest_tap() {
        let mut field = Field::zeros(40, 40).unwrap();
        let wavelet = ramp(12);
        inject_wavelet(&mut field, &wavelet, 1);
        assert_eq!(field.get(20 - 11, 20 - 11), wavelet[11]);
        assert_eq!(field.get(20 + 10, 20 + 10), wavelet[11]);
        assert_eq!(field.get(20 + 11, 20 + 11), 0.0);
    }

    #[test]
    fn small_grid_is_clipped_to_interior() {
        let mut field = Field::zeros(10, 10).unwrap();
        inject_wavelet(&mut field, &ramp(12), 1);
        for i in 0..10 {
            for j in 0..10 {
                let edge = i == 0 || j == 0 || i == 9 || j == 9;
                if edge {
                    assert_eq!(field.get(i, j), 0.0, "edge cell ({}, {})", i, j);
                } else {
                    assert_ne!(field.get(i, j), 0.0, "interior cell ({}, {})", i, j);
                }
            }
        }
    }

    #[test]
    fn wider_radius_keeps_wider_border() {
        let mut field = Field::zeros(12, 12).unwrap();
        inject_wavelet(&mut field, &ramp(12), 3);
        for i in 0..12 {
            for j in 0..12 {
                let inside = (3..9).contains(&i) && (3..9).contains(&j);
                assert_eq!(field.get(i, j) != 0.0, inside, "cell ({}, {})", i, j);
            }
        }
    }

    #[test]
    fn degenerate_grid_is_untouched() {
        let mut field = Field::zeros(2, 5).unwrap();
        inject_wavelet(&mut field, &ramp(12), 1);
        assert!(field.as_slice().iter().all(|&v| v == 0.0));
    }
}
