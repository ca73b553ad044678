//! Methodology settings of the scenario windows.

use margin_core::types::Date;

use super::window::ScenarioWindow;

/// Observations in the rolling scenario window.
pub const ROLLING_WINDOW_DAYS: usize = 2500;

/// First date of the fixed stress interval.
pub const STRESS_START: Date = Date::from_ymd_const(2008, 1, 1);

/// Last date of the fixed stress interval.
pub const STRESS_END: Date = Date::from_ymd_const(2010, 6, 30);

/// Window settings shared by every [`Simulation`](super::Simulation).
///
/// # Examples
///
/// ```
/// use margin_risk::scenarios::{ScenarioSettings, ROLLING_WINDOW_DAYS};
///
/// let settings = ScenarioSettings::default().with_rolling_window_days(500);
/// assert_eq!(settings.rolling_window_days, 500);
/// assert_eq!(ScenarioSettings::default().rolling_window_days, ROLLING_WINDOW_DAYS);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScenarioSettings {
    /// Observations in the rolling window
    pub rolling_window_days: usize,
    /// First date of the stress interval
    pub stress_start: Date,
    /// Last date of the stress interval
    pub stress_end: Date,
    /// Cuts the stress interval at the scenario cutoff date
    pub clamp_stress_window: bool,
}

impl Default for ScenarioSettings {
    fn default() -> Self {
        Self {
            rolling_window_days: ROLLING_WINDOW_DAYS,
            stress_start: STRESS_START,
            stress_end: STRESS_END,
            clamp_stress_window: false,
        }
    }
}

impl ScenarioSettings {
    /// Sets the rolling window length.
    pub fn with_rolling_window_days(mut self, days: usize) -> Self {
        self.rolling_window_days = days;
        self
    }

    /// Sets the stress interval.
    pub fn with_stress_window(mut self, start: Date, end: Date) -> Self {
        self.stress_start = start;
        self.stress_end = end;
        self
    }

    /// Enables or disables clamping of the stress interval.
    pub fn with_clamp_stress_window(mut self, clamp: bool) -> Self {
        self.clamp_stress_window = clamp;
        self
    }

    /// Rolling window.
    pub fn rolling(&self) -> ScenarioWindow {
        ScenarioWindow::Rolling {
            days: self.rolling_window_days,
        }
    }

    /// Rolling window plus the stress interval seen from `cutoff`.
    ///
    /// With clamping enabled, stress dates after `cutoff` are dropped.
    pub fn rolling_with_stress(&self, cutoff: Date) -> ScenarioWindow {
        let stress_end = if self.clamp_stress_window {
            self.stress_end.min(cutoff)
        } else {
            self.stress_end
        };
        ScenarioWindow::RollingWithStress {
            days: self.rolling_window_days,
            stress_start: self.stress_start,
            stress_end,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_methodology_defaults() {
        let settings = ScenarioSettings::default();
        assert_eq!(settings.stress_start, Date::from_ymd(2008, 1, 1).unwrap());
        assert_eq!(settings.stress_end, Date::from_ymd(2010, 6, 30).unwrap());
        assert!(!settings.clamp_stress_window);
    }

    #[test]
    fn test_clamped_stress_window() {
        let cutoff = Date::from_ymd(2009, 3, 2).unwrap();
        let open = ScenarioSettings::default().rolling_with_stress(cutoff);
        let clamped = ScenarioSettings::default()
            .with_clamp_stress_window(true)
            .rolling_with_stress(cutoff);
        assert!(matches!(open, ScenarioWindow::RollingWithStress { stress_end, .. } if stress_end == STRESS_END));
        assert!(matches!(clamped, ScenarioWindow::RollingWithStress { stress_end, .. } if stress_end == cutoff));
    }
}
