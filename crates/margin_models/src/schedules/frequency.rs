//! Coupon frequency.

use std::fmt;
use std::str::FromStr;

use super::error::ScheduleError;

/// Coupon frequency of a swap leg.
///
/// # Examples
///
/// ```
/// use margin_models::schedules::Frequency;
///
/// let freq: Frequency = "6M".parse().unwrap();
/// assert_eq!(freq, Frequency::SemiAnnual);
/// assert_eq!(freq.months(), 6);
/// assert!((freq.period_length() - 0.5).abs() < 1e-15);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Frequency {
    /// Once per year.
    Annual,
    /// Twice per year.
    SemiAnnual,
    /// Four times per year.
    Quarterly,
    /// Twelve times per year.
    Monthly,
}

impl Frequency {
    /// Months between two coupon dates.
    #[inline]
    pub fn months(&self) -> u32 {
        match self {
            Frequency::Annual => 12,
            Frequency::SemiAnnual => 6,
            Frequency::Quarterly => 3,
            Frequency::Monthly => 1,
        }
    }

    /// Nominal index period length in years.
    #[inline]
    pub fn period_length(&self) -> f64 {
        self.months() as f64 / 12.0
    }

    /// Short tenor label.
    pub fn name(&self) -> &'static str {
        match self {
            Frequency::Annual => "12M",
            Frequency::SemiAnnual => "6M",
            Frequency::Quarterly => "3M",
            Frequency::Monthly => "1M",
        }
    }
}

impl FromStr for Frequency {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self, ScheduleError> {
        match s.trim().to_lowercase().as_str() {
            "annual" | "12m" | "1y" => Ok(Frequency::Annual),
            "semiannual" | "semi-annual" | "6m" => Ok(Frequency::SemiAnnual),
            "quarterly" | "3m" => Ok(Frequency::Quarterly),
            "monthly" | "1m" => Ok(Frequency::Monthly),
            _ => Err(ScheduleError::UnknownFrequency(s.to_string())),
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_aliases() {
        assert_eq!("Quarterly".parse::<Frequency>().unwrap(), Frequency::Quarterly);
        assert_eq!("1y".parse::<Frequency>().unwrap(), Frequency::Annual);
        assert!(matches!(
            "weekly".parse::<Frequency>(),
            Err(ScheduleError::UnknownFrequency(_))
        ));
    }

    #[test]
    fn test_display_round_trips() {
        for f in [
            Frequency::Annual,
            Frequency::SemiAnnual,
            Frequency::Quarterly,
            Frequency::Monthly,
        ] {
            assert_eq!(f.to_string().parse::<Frequency>().unwrap(), f);
        }
    }
}
