//! Daily history of observed zero curves.

use std::collections::BTreeMap;

use margin_core::market_data::Curve;
use margin_core::types::{Date, DateError};

/// Read-only `date → Curve` history of scalar zero rates.
///
/// # Examples
///
/// ```
/// use margin_core::types::Date;
/// use margin_models::zero_rate::ZeroCurveHistory;
///
/// let d = Date::from_ymd(2024, 1, 2).unwrap();
/// let history = ZeroCurveHistory::from_rates([(d, 1.0, 0.02), (d, 5.0, 0.03)]);
///
/// assert_eq!(history.first_date(), Some(d));
/// assert_eq!(history.curve(d).unwrap().len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ZeroCurveHistory {
    curves: BTreeMap<Date, Curve>,
}

impl ZeroCurveHistory {
    /// Creates an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds curves from `(date, maturity, rate)` observations.
    pub fn from_rates(rates: impl IntoIterator<Item = (Date, f64, f64)>) -> Self {
        let mut grouped: BTreeMap<Date, Vec<(f64, f64)>> = BTreeMap::new();
        for (date, maturity, rate) in rates {
            grouped.entry(date).or_default().push((maturity, rate));
        }
        let curves = grouped
            .into_iter()
            .map(|(date, points)| (date, Curve::from_scalars(&points)))
            .collect();
        Self { curves }
    }

    /// Identical flat curves on every business day in `[start, end]`.
    pub fn flat(start: Date, end: Date, maturities: &[f64], rate: f64) -> Result<Self, DateError> {
        let points: Vec<(f64, f64)> = maturities.iter().map(|&m| (m, rate)).collect();
        let curves = Date::business_days(start, end)?
            .into_iter()
            .map(|date| (date, Curve::from_scalars(&points)))
            .collect();
        Ok(Self { curves })
    }

    /// Adds or replaces the curve of `date`.
    pub fn insert(&mut self, date: Date, curve: Curve) {
        self.curves.insert(date, curve);
    }

    /// Curve recorded on `date`.
    pub fn curve(&self, date: Date) -> Option<&Curve> {
        self.curves.get(&date)
    }

    /// First recorded date.
    pub fn first_date(&self) -> Option<Date> {
        self.curves.keys().next().copied()
    }

    /// Last recorded date.
    pub fn last_date(&self) -> Option<Date> {
        self.curves.keys().next_back().copied()
    }

    /// First recorded curve.
    pub fn first_curve(&self) -> Option<&Curve> {
        self.curves.values().next()
    }

    /// Recorded dates in ascending order.
    pub fn dates(&self) -> impl Iterator<Item = Date> + '_ {
        self.curves.keys().copied()
    }

    /// Curves with `date <= end`, in ascending date order.
    pub fn up_to(&self, end: Date) -> impl Iterator<Item = (Date, &Curve)> + '_ {
        self.curves.range(..=end).map(|(d, c)| (*d, c))
    }

    /// Number of recorded dates.
    pub fn len(&self) -> usize {
        self.curves.len()
    }

    /// Returns `true` if nothing is recorded.
    pub fn is_empty(&self) -> bool {
        self.curves.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    #[test]
    fn test_flat_history_skips_weekends() {
        let start = Date::from_ymd(2024, 1, 1).unwrap();
        let end = Date::from_ymd(2024, 1, 14).unwrap();
        let history = ZeroCurveHistory::flat(start, end, &[1.0, 10.0], 0.02).unwrap();
        assert_eq!(history.len(), 10);
        assert!(history
            .dates()
            .all(|d| d.weekday() != Weekday::Sat && d.weekday() != Weekday::Sun));
        assert_eq!(history.last_date(), Some(Date::from_ymd(2024, 1, 12).unwrap()));
    }

    #[test]
    fn test_from_rates_groups_by_date() {
        let d1 = Date::from_ymd(2024, 1, 2).unwrap();
        let d2 = Date::from_ymd(2024, 1, 3).unwrap();
        let history =
            ZeroCurveHistory::from_rates([(d2, 1.0, 0.01), (d1, 2.0, 0.02), (d2, 3.0, 0.03)]);
        assert_eq!(history.len(), 2);
        assert_eq!(history.curve(d2).unwrap().maturities(), vec![1.0, 3.0]);
        assert_eq!(history.up_to(d1).count(), 1);
    }
}
