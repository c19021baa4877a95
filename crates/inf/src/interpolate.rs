use num::Float;

/// Position of `value` inside the `[min, max]` range, mapped to `[0, 1]`.
/// Values outside of the range are clamped, an empty range maps to 0.
#[inline]
pub fn fraction<T: Float>(value: T, min: T, max: T) -> T {
    debug_assert!(min <= max);

    if min >= max || value <= min {
        return T::zero();
    } else if value >= max {
        return T::one();
    }

    (value - min) / (max - min)
}

/// Linear interpolation between `start` and `end`, `t == 0` yields `start`
#[inline]
pub fn linear<T: Float>(start: T, end: T, t: T) -> T {
    if t.is_zero() {
        return start;
    } else if t.is_one() {
        return end;
    }

    start + t * (end - start)
}

/// Bilinear interpolation inside a unit cell.
///
/// The corner values are named after their (column, row) offset: `v00` is the lower left sample,
/// `v10` the sample to its right, `v01` the sample above it and `v11` the opposite corner.
/// Returns NaN when one of the corners is NaN.
#[inline]
pub fn bilinear<T: Float>(v00: T, v10: T, v01: T, v11: T, tx: T, ty: T) -> T {
    if v00.is_nan() || v10.is_nan() || v01.is_nan() || v11.is_nan() {
        return T::nan();
    }

    let bottom = linear(v00, v10, tx);
    let top = linear(v01, v11, tx);
    linear(bottom, top, ty)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn fraction_negative_range() {
        assert_eq!(fraction(-1.2f64, -1.2, 1.2), 0.0);
        assert_eq!(fraction(0.0f64, -1.2, 1.2), 0.5);
        assert_eq!(fraction(1.2f64, -1.2, 1.2), 1.0);
    }

    #[test]
    fn fraction_outside_range() {
        assert_eq!(fraction(-2.0f64, -1.0, 1.0), 0.0);
        assert_eq!(fraction(2.0f64, -1.0, 1.0), 1.0);
    }

    #[test]
    fn fraction_zero_range() {
        assert_eq!(fraction(0.0f64, 1.0, 1.0), 0.0);
        assert_eq!(fraction(2.0f64, 1.0, 1.0), 0.0);
    }

    #[test]
    fn linear_endpoints_are_exact() {
        assert_eq!(linear(0.1f64, 0.7, 0.0), 0.1);
        assert_eq!(linear(0.1f64, 0.7, 1.0), 0.7);
        assert_relative_eq!(linear(2.0f64, 4.0, 0.25), 2.5);
    }

    #[test]
    fn bilinear_cell_center() {
        assert_relative_eq!(bilinear(0.0f64, 1.0, 2.0, 3.0, 0.5, 0.5), 1.5);
        assert_relative_eq!(bilinear(0.0f64, 1.0, 2.0, 3.0, 1.0, 0.0), 1.0);
        assert_relative_eq!(bilinear(0.0f64, 1.0, 2.0, 3.0, 0.0, 1.0), 2.0);
    }

    #[test]
    fn bilinear_nan_corner() {
        assert!(bilinear(0.0f64, f64::NAN, 2.0, 3.0, 0.1, 0.1).is_nan());
    }
}
