use ndarray::{Array2, Zip};

// half-open index range of a centered band, clamped to [0, len)
fn centered_range(len: usize, lo_offset: usize, hi_offset: usize) -> (usize, usize) {
    let c = len / 2;
    (c.saturating_sub(lo_offset), (c + hi_offset).min(len))
}

/// Generates the object to be hidden: a centered square of ones on a zero background.
///
/// Rows and columns `g/2 - size/2 .. g/2 + size/2` are set, so an odd `size` yields a square one pixel smaller.
pub fn generate_object(grid_size: usize, size: usize) -> Array2<f64> {
    let (start, end) = centered_range(grid_size, size / 2, size / 2);

    let mut object = Array2::zeros([grid_size, grid_size]);
    Zip::indexed(&mut object).par_for_each(|(y, x), e| {
        if (start..end).contains(&y) && (start..end).contains(&x) {
            *e = 1.0;
        }
    });
    object
}

pub(crate) fn div_up(num: usize, denom: usize) -> usize {
    (num + denom - 1) / denom
}

/// Generates the annular cloak region, 1.0 where `inner^2 < r^2 <= outer^2`.
///
/// Pixel coordinates are taken relative to `ceil(g/2)`, so they span `[-ceil(g/2), floor(g/2))`.
pub fn generate_cloak(grid_size: usize, outer_radius: f64, inner_radius: f64) -> Array2<f64> {
    let c = div_up(grid_size, 2) as f64;
    let outer_sqr = outer_radius * outer_radius;
    let inner_sqr = inner_radius * inner_radius;

    let mut cloak = Array2::zeros([grid_size, grid_size]);
    Zip::indexed(&mut cloak).par_for_each(|(y, x), e| {
        let y0 = y as f64 - c;
        let x0 = x as f64 - c;
        let r_sqr = x0 * x0 + y0 * y0;

        let outer = if r_sqr <= outer_sqr { 1.0 } else { 0.0 };
        let inner = if r_sqr <= inner_sqr { 1.0 } else { 0.0 };
        *e = outer - inner;
    });
    cloak
}

/// Generates the rectangular support the object is assumed to lie within.
///
/// Rows and columns `c - size - margin .. c + size + margin` with `c = g/2`, clamped to the grid.
pub fn generate_support(grid_size: usize, object_size: usize, margin: usize) -> Array2<f64> {
    let half_width = object_size + margin;
    let (start, end) = centered_range(grid_size, half_width, half_width);

    let mut support = Array2::zeros([grid_size, grid_size]);
    Zip::indexed(&mut support).par_for_each(|(y, x), e| {
        if (start..end).contains(&y) && (start..end).contains(&x) {
            *e = 1.0;
        }
    });
    support
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_is_centered_square() {
        let object = generate_object(256, 20);
        assert_eq!(object.sum(), 400.0);
        assert_eq!(object[[118, 118]], 1.0);
        assert_eq!(object[[137, 137]], 1.0);
        assert_eq!(object[[117, 128]], 0.0);
        assert_eq!(object[[128, 138]], 0.0);
    }

    #[test]
    fn odd_object_loses_a_pixel() {
        let object = generate_object(16, 5);
        // 8 - 2 .. 8 + 2
        assert_eq!(object.sum(), 16.0);
        assert_eq!(object[[6, 6]], 1.0);
        assert_eq!(object[[10, 10]], 0.0);
    }

    #[test]
    fn cloak_is_annulus() {
        let cloak = generate_cloak(256, 70.0, 40.0);
        // centre and inner edge are excluded
        assert_eq!(cloak[[128, 128]], 0.0);
        assert_eq!(cloak[[128, 168]], 0.0);
        assert_eq!(cloak[[128, 169]], 1.0);
        // outer edge is included
        assert_eq!(cloak[[128, 198]], 1.0);
        assert_eq!(cloak[[128, 199]], 0.0);
        assert_eq!(cloak[[58, 128]], 1.0);
        assert_eq!(cloak[[0, 0]], 0.0);
        assert!(cloak.iter().all(|&v| v == 0.0 || v == 1.0));
    }

    #[test]
    fn odd_grid_cloak_centre_rounds_up() {
        // columns run from x = -5 to x = 3
        let cloak = generate_cloak(9, 4.0, 1.0);
        assert_eq!(cloak[[4, 0]], 0.0);
        assert_eq!(cloak[[5, 1]], 1.0);
        assert_eq!(cloak[[5, 8]], 1.0);
        assert_eq!(cloak[[5, 5]], 0.0);
        assert_eq!(cloak[[1, 5]], 1.0);
        assert_eq!(cloak[[0, 5]], 0.0);
    }

    #[test]
    fn cloak_with_equal_radii_is_empty() {
        let cloak = generate_cloak(64, 10.0, 10.0);
        assert_eq!(cloak.sum(), 0.0);
    }

    #[test]
    fn support_is_clamped_to_grid() {
        let support = generate_support(256, 20, 10);
        assert_eq!(support.sum(), 60.0 * 60.0);
        assert_eq!(support[[98, 98]], 1.0);
        assert_eq!(support[[157, 157]], 1.0);
        assert_eq!(support[[158, 128]], 0.0);

        let support = generate_support(32, 20, 10);
        assert_eq!(support.sum(), 32.0 * 32.0);
    }
}
