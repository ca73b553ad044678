//! Discount factors with their rate derivatives.

use margin_core::stochastic::RandomVariable;

/// `P(τ) = exp(-r τ)` together with its time to maturity.
///
/// # Examples
///
/// ```
/// use margin_core::stochastic::RandomVariable;
/// use margin_risk::sensitivities::DiscountFactor;
///
/// let df = DiscountFactor::new(RandomVariable::scalar(0.9), 2.0);
/// assert!((df.derivative(1).get(0) + 1.8).abs() < 1e-15);
/// assert!((df.derivative(2).get(0) - 3.6).abs() < 1e-15);
/// assert!((df.inverse_derivative(1).get(0) - 2.0 / 0.9).abs() < 1e-15);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DiscountFactor {
    value: RandomVariable,
    tau: f64,
}

impl DiscountFactor {
    /// Wraps a discount factor for time to maturity `tau`.
    pub fn new(value: RandomVariable, tau: f64) -> Self {
        Self { value, tau }
    }

    /// Discount factor.
    pub fn value(&self) -> &RandomVariable {
        &self.value
    }

    /// Time to maturity in years.
    pub fn tau(&self) -> f64 {
        self.tau
    }

    /// `(-1)^n τ^n P`, the n-th derivative with respect to the zero rate.
    pub fn derivative(&self, order: i32) -> RandomVariable {
        &self.value * (sign(order) * self.tau.powi(order))
    }

    /// `(-1)^(n+1) τ^n / P`, the rate derivative used for an inverse factor.
    pub fn inverse_derivative(&self, order: i32) -> RandomVariable {
        self.value.invert() * (sign(order + 1) * self.tau.powi(order))
    }
}

fn sign(order: i32) -> f64 {
    if order % 2 == 0 {
        1.0
    } else {
        -1.0
    }
}
