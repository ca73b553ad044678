//! Bucketing of sensitivities onto a tenor grid.
//!
//! A delta at maturity `τ` is split between the two grid points
//! bracketing it. A gamma at `(τ1, τ2)` is split bilinearly over up to four
//! cells, folded into the upper triangle. In both cases the weights of one
//! allocation sum to one.

use margin_core::market_data::TenorGrid;

/// Grid fixings and weights receiving a delta at `maturity`.
///
/// # Examples
///
/// ```
/// use margin_core::market_data::{GridType, TenorGrid};
/// use margin_risk::sensitivities::allocate_delta;
///
/// let grid = TenorGrid::standard(GridType::InitialMarginSpread);
/// let cells = allocate_delta(&grid, 3.0);
/// assert_eq!(cells.len(), 2);
/// assert!((cells[0].1 - 2.0 / 3.0).abs() < 1e-12);
/// assert_eq!(allocate_delta(&grid, 40.0), vec![(30.0, 1.0)]);
/// ```
pub fn allocate_delta(grid: &TenorGrid, maturity: f64) -> Vec<(f64, f64)> {
    let fixings = grid.fixings();
    let b = grid.locate(maturity);
    if b.is_degenerate() || b.weight == 0.0 {
        return vec![(fixings[b.lower], 1.0)];
    }
    if b.weight == 1.0 {
        return vec![(fixings[b.upper], 1.0)];
    }
    vec![(fixings[b.lower], 1.0 - b.weight), (fixings[b.upper], b.weight)]
}

/// Upper-triangular cells `(row, col, weight)` receiving a gamma at
/// `(maturity1, maturity2)`.
///
/// Cells below the diagonal are mirrored above it and coinciding cells
/// are merged, so equal maturities yield one combined off-diagonal cell.
pub fn allocate_gamma(grid: &TenorGrid, maturity1: f64, maturity2: f64) -> Vec<(f64, f64, f64)> {
    let rows = allocate_delta(grid, maturity1);
    let cols = allocate_delta(grid, maturity2);

    let mut cells: Vec<(f64, f64, f64)> = Vec::with_capacity(4);
    for &(row, w_row) in &rows {
        for &(col, w_col) in &cols {
            let weight = w_row * w_col;
            if weight == 0.0 {
                continue;
            }
            let (r, c) = if col < row { (col, row) } else { (row, col) };
            match cells.iter_mut().find(|(er, ec, _)| *er == r && *ec == c) {
                Some(cell) => cell.2 += weight,
                None => cells.push((r, c, weight)),
            }
        }
    }
    cells
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use margin_core::market_data::GridType;
    use proptest::prelude::*;

    fn risk_grid() -> TenorGrid {
        TenorGrid::standard(GridType::InitialMarginRisk)
    }

    // ========================================
    // Delta
    // ========================================

    #[test]
    fn test_delta_on_grid_point() {
        let grid = risk_grid();
        let five_years = grid.fixing_of("5y").unwrap();
        assert_eq!(allocate_delta(&grid, five_years), vec![(five_years, 1.0)]);
    }

    #[test]
    fn test_delta_split() {
        let grid = TenorGrid::standard(GridType::InitialMarginSpread);
        let cells = allocate_delta(&grid, 7.5);
        assert_eq!(cells[0].0, 5.0);
        assert_eq!(cells[1].0, 10.0);
        assert_relative_eq!(cells[0].1, 0.5, epsilon = 1e-12);
        assert_relative_eq!(cells[1].1, 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_delta_clamped_below_grid() {
        let grid = risk_grid();
        assert_eq!(allocate_delta(&grid, 0.0), vec![(grid.fixings()[0], 1.0)]);
    }

    // ========================================
    // Gamma
    // ========================================

    #[test]
    fn test_gamma_equal_maturities_merge_cross_cells() {
        let grid = TenorGrid::standard(GridType::InitialMarginSpread);
        let cells = allocate_gamma(&grid, 3.5, 3.5);
        assert_eq!(cells.len(), 3);
        let cross = cells.iter().find(|c| c.0 == 2.0 && c.1 == 5.0).unwrap();
        assert_relative_eq!(cross.2, 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_gamma_is_upper_triangular() {
        let grid = TenorGrid::standard(GridType::InitialMarginSpread);
        let cells = allocate_gamma(&grid, 20.0, 3.0);
        assert_eq!(cells.len(), 4);
        assert!(cells.iter().all(|(r, c, _)| r <= c));
    }

    #[test]
    fn test_gamma_degenerate() {
        let grid = TenorGrid::standard(GridType::InitialMarginSpread);
        assert_eq!(allocate_gamma(&grid, 1.0, 50.0), vec![(2.0, 30.0, 1.0)]);
    }

    proptest! {
        #[test]
        fn prop_delta_weights_sum_to_one(maturity in 0.0f64..80.0) {
            let total: f64 = allocate_delta(&risk_grid(), maturity).iter().map(|c| c.1).sum();
            prop_assert!((total - 1.0).abs() <= 1e-12);
        }

        #[test]
        fn prop_gamma_weights_sum_to_one(m1 in 0.0f64..80.0, m2 in 0.0f64..80.0) {
            let cells = allocate_gamma(&risk_grid(), m1, m2);
            let total: f64 = cells.iter().map(|c| c.2).sum();
            prop_assert!((total - 1.0).abs() <= 1e-12);
            prop_assert!(cells.iter().all(|(r, c, _)| r <= c));
        }

        #[test]
        fn prop_delta_preserves_maturity_inside_grid(maturity in 0.01f64..60.0) {
            let grid = risk_grid();
            let cells = allocate_delta(&grid, maturity);
            let centre: f64 = cells.iter().map(|(f, w)| f * w).sum();
            prop_assert!((centre - maturity).abs() <= 1e-9);
        }
    }
}
