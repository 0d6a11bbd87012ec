use crate::error::NeighborhoodError;

/// Computes the half-width of every scanline of a discrete XY ellipse with
/// semi-axes `rx` and `ry`, using the integer midpoint ellipse scan.
///
/// The returned vector has `ry + 1` entries. Index 0 is the middle line,
/// index `i` holds the half-width of both lines `+i` and `-i`. Entries are in
/// `[0, rx]`, non-increasing, and the middle line always spans `rx`.
///
/// # Arguments
/// * `rx` - Semi-axis along dimension 0. Must pass [`EllipseBounds::check_radii`].
/// * `ry` - Semi-axis along dimension 1. Must pass [`EllipseBounds::check_radii`].
pub fn xy_ellipse_bounds(rx: i64, ry: i64) -> Vec<i64> {
    debug_assert!(EllipseBounds::check_radii(rx, ry).is_ok());

    let mut widths = vec![0i64; ry as usize + 1];

    // Decision variables grow like rx^2 * ry^2.
    let a2 = i128::from(rx) * i128::from(rx);
    let b2 = i128::from(ry) * i128::from(ry);
    let two_a2 = 2 * a2;
    let two_b2 = 2 * b2;

    let mut x = 0i128;
    let mut y = i128::from(ry);
    let mut px = 0i128;
    let mut py = two_a2 * y;

    // Region 1: slope above -1, step on x.
    // p = b2 - a2 * ry + a2 / 4, rounded half up.
    let mut p = b2 - a2 * y + quarter_half_up(a2);
    while px < py {
        x += 1;
        px += two_b2;
        if p < 0 {
            p += b2 + px;
        } else {
            y -= 1;
            py -= two_a2;
            p += b2 + px - py;
        }
        widths[y as usize] = x as i64;
    }

    // Region 2: slope below -1, step on y.
    // p = b2 * (x + 1/2)^2 + a2 * (y - 1)^2 - a2 * b2, rounded half up.
    p = b2 * (x * x + x) + quarter_half_up(b2) + a2 * (y - 1) * (y - 1) - a2 * b2;
    while y > 0 {
        y -= 1;
        py -= two_a2;
        if p > 0 {
            p += a2 - py;
        } else {
            x += 1;
            px += two_b2;
            p += a2 - py + px;
        }
        widths[y as usize] = x as i64;
    }

    // Degenerate axes (rx or ry zero) leave the scan short or overshooting.
    widths[0] = rx;
    for i in 1..widths.len() {
        widths[i] = widths[i].clamp(0, widths[i - 1]);
    }
    widths
}

/// `value / 4` rounded half up, for non-negative `value`.
fn quarter_half_up(value: i128) -> i128 {
    (value + 2) / 4
}

/// Row half-width table cached for the span it was computed for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EllipseBounds {
    rx: i64,
    ry: i64,
    widths: Vec<i64>,
}

impl EllipseBounds {
    /// Fails with `InvalidSpan` when a semi-axis is negative or when
    /// `2 * rx^2 * ry` or `2 * ry^2 * rx` does not fit in an i64.
    pub fn check_radii(rx: i64, ry: i64) -> Result<(), NeighborhoodError> {
        if rx < 0 || ry < 0 {
            return Err(NeighborhoodError::InvalidSpan(format!(
                "ellipse semi-axes ({}, {}) must be non-negative",
                rx, ry
            )));
        }
        let fits = |a: i64, b: i64| {
            a.checked_mul(a)
                .and_then(|a2| a2.checked_mul(b))
                .and_then(|v| v.checked_mul(2))
                .is_some()
        };
        if !fits(rx, ry) || !fits(ry, rx) {
            return Err(NeighborhoodError::InvalidSpan(format!(
                "ellipse semi-axes ({}, {}) are too large",
                rx, ry
            )));
        }
        Ok(())
    }

    pub fn new(rx: i64, ry: i64) -> Self {
        Self {
            rx,
            ry,
            widths: xy_ellipse_bounds(rx, ry),
        }
    }

    /// Recomputes the table only when the semi-axes changed.
    /// Returns whether a recomputation happened.
    pub fn update(&mut self, rx: i64, ry: i64) -> bool {
        if self.rx == rx && self.ry == ry {
            return false;
        }
        log::trace!("Recomputing ellipse bounds for rx={}, ry={}", rx, ry);
        *self = Self::new(rx, ry);
        true
    }

    pub fn radii(&self) -> (i64, i64) {
        (self.rx, self.ry)
    }

    /// Half-widths indexed by row offset, see [`xy_ellipse_bounds`].
    pub fn widths(&self) -> &[i64] {
        &self.widths
    }

    /// Half-width of the line at signed offset `row` from the center.
    pub fn half_width(&self, row: i64) -> i64 {
        self.widths[row.unsigned_abs() as usize]
    }

    /// Number of pixels inside the ellipse. The middle line is counted once,
    /// every other line twice since it is mirrored.
    pub fn pixel_count(&self) -> u64 {
        let mut pixel_count = 2 * self.widths[0] as u64 + 1;
        for width in &self.widths[1..] {
            pixel_count = pixel_count.saturating_add(2 * (2 * *width as u64 + 1));
        }
        pixel_count
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{xy_ellipse_bounds, EllipseBounds};
    use crate::error::NeighborhoodError;

    #[rstest]
    #[case(3, 2, vec![3, 2, 1])]
    #[case(2, 2, vec![2, 2, 1])]
    #[case(1, 1, vec![1, 0])]
    #[case(0, 0, vec![0])]
    #[case(3, 0, vec![3])]
    #[case(0, 2, vec![0, 0, 0])]
    #[case(0, 1, vec![0, 0])]
    fn verify_bounds(#[case] rx: i64, #[case] ry: i64, #[case] expected: Vec<i64>) {
        assert_eq!(xy_ellipse_bounds(rx, ry), expected);
    }

    #[test]
    fn verify_bounds_are_monotonic() {
        for rx in 0..25 {
            for ry in 0..25 {
                let widths = xy_ellipse_bounds(rx, ry);
                assert_eq!(widths.len(), ry as usize + 1);
                assert_eq!(widths[0], rx);
                assert!(widths.windows(2).all(|w| w[0] >= w[1]));
                assert!(widths.iter().all(|w| *w >= 0 && *w <= rx));
            }
        }
    }

    #[rstest]
    #[case(2_000_000, 2_000_000)]
    #[case(1, i64::MAX)]
    #[case(i64::MAX, 0)]
    #[case(-1, 3)]
    fn should_reject_radii(#[case] rx: i64, #[case] ry: i64) {
        assert!(matches!(
            EllipseBounds::check_radii(rx, ry),
            Err(NeighborhoodError::InvalidSpan(_))
        ));
    }

    #[test]
    fn verify_large_radii() {
        // 2 * rx^2 * ry = 4e18 and 2 * ry^2 * rx = 8e18.
        let (rx, ry) = (1_000_000, 2_000_000);
        assert!(EllipseBounds::check_radii(rx, ry).is_ok());
        assert!(EllipseBounds::check_radii(0, 1 << 20).is_ok());

        let widths = xy_ellipse_bounds(rx, ry);
        assert_eq!(widths.len(), ry as usize + 1);
        assert_eq!(widths[0], rx);
        assert!(widths.windows(2).all(|w| w[0] >= w[1]));
        assert!(widths[ry as usize] > 0);
    }

    #[test]
    fn verify_pixel_count() {
        assert_eq!(EllipseBounds::new(3, 2).pixel_count(), 23);
        assert_eq!(EllipseBounds::new(0, 0).pixel_count(), 1);
        assert_eq!(EllipseBounds::new(4, 0).pixel_count(), 9);
        assert_eq!(EllipseBounds::new(0, 3).pixel_count(), 7);
    }

    #[test]
    fn verify_update_cache() {
        let mut bounds = EllipseBounds::new(3, 2);
        assert!(!bounds.update(3, 2));
        assert!(bounds.update(2, 3));
        assert_eq!(bounds.radii(), (2, 3));
        assert_eq!(bounds.widths().len(), 4);
        assert_eq!(bounds.half_width(-3), bounds.widths()[3]);
    }
}
