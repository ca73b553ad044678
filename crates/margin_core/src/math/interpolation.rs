//! Bracketing of a query point on a sorted abscissa.
//!
//! Every linear scheme in the workspace (zero curve interpolation, tenor
//! bucket allocation, model time-grid interpolation) reduces to locating
//! the two neighbours `lo ≤ x ≤ hi` of a query point and the weight
//! `w = (x - lo) / (hi - lo)` of the upper neighbour. Outside the sampled
//! range both neighbours collapse onto the boundary point, which yields
//! constant extrapolation.

/// Neighbours of a query point on a sorted abscissa.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bracket {
    /// Index of the lower neighbour.
    pub lower: usize,
    /// Index of the upper neighbour (equal to `lower` when degenerate).
    pub upper: usize,
    /// Weight of the upper neighbour in `[0, 1]`.
    pub weight: f64,
}

impl Bracket {
    /// Returns `true` if the query point maps onto a single abscissa.
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.lower == self.upper
    }

    /// Linearly combines two values with this bracket's weight.
    #[inline]
    pub fn combine(&self, lower: f64, upper: f64) -> f64 {
        lower * (1.0 - self.weight) + upper * self.weight
    }
}

/// Locates `x` on the strictly increasing abscissa `xs`.
///
/// Returns `None` for an empty abscissa. Points at or beyond either end
/// are clamped onto the boundary, and exact hits are degenerate.
///
/// # Examples
///
/// ```
/// use margin_core::math::bracket;
///
/// let xs = [1.0, 2.0, 4.0];
/// let b = bracket(&xs, 3.0).unwrap();
/// assert_eq!((b.lower, b.upper), (1, 2));
/// assert!((b.weight - 0.5).abs() < 1e-15);
///
/// let clamped = bracket(&xs, 10.0).unwrap();
/// assert_eq!((clamped.lower, clamped.upper), (2, 2));
/// ```
pub fn bracket(xs: &[f64], x: f64) -> Option<Bracket> {
    let last = xs.len().checked_sub(1)?;
    if x <= xs[0] {
        return Some(Bracket { lower: 0, upper: 0, weight: 0.0 });
    }
    if x >= xs[last] {
        return Some(Bracket { lower: last, upper: last, weight: 0.0 });
    }

    // First index with xs[i] > x; the range checks above keep it in [1, last]
    let upper = xs.partition_point(|&xi| xi <= x);
    let lower = upper - 1;
    if xs[lower] == x {
        return Some(Bracket { lower, upper: lower, weight: 0.0 });
    }
    let weight = (x - xs[lower]) / (xs[upper] - xs[lower]);
    Some(Bracket { lower, upper, weight })
}
