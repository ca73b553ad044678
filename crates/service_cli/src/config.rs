//! CLI configuration loading
//!
//! Loads configuration from a TOML file, then applies environment
//! overrides (`MARGIN_LOG_LEVEL`, `MARGIN_PATHS`).

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

use adapter_loader::{HistoryLoader, TradeLoader, TradeRecord};
use margin_core::types::{Currency, Date};
use margin_models::products::Portfolio;
use margin_models::simulation::{HullWhiteParameters, HullWhiteSimulation, TimeDiscretization};
use margin_models::zero_rate::{ZeroCurveHistory, ZeroRateModel};
use margin_risk::{MarginConfig, ParallelConfig, ScenarioSettings};

use crate::{CliError, Result};

/// Environment variable overriding the log level.
pub const ENV_LOG_LEVEL: &str = "MARGIN_LOG_LEVEL";

/// Environment variable overriding the number of simulated paths.
pub const ENV_PATHS: &str = "MARGIN_PATHS";

/// Log levels accepted in the configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl FromStr for LogLevel {
    type Err = CliError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(CliError::Config(format!(
                "Invalid log level: {}. Must be one of: trace, debug, info, warn, error",
                s
            ))),
        }
    }
}

impl LogLevel {
    /// Convert log level to tracing filter string
    pub fn as_filter_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_filter_str())
    }
}

/// CLI configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CliConfig {
    /// General settings
    #[serde(default)]
    pub general: GeneralConfig,

    /// Hull-White path simulation
    #[serde(default)]
    pub model: ModelConfig,

    /// Zero-curve history source
    #[serde(default)]
    pub history: HistoryConfig,

    /// Margin engine settings
    #[serde(default)]
    pub margin: MarginSection,

    /// Portfolio selection
    #[serde(default)]
    pub portfolio: PortfolioConfig,

    /// Inline trades
    #[serde(default)]
    pub trades: Vec<TradeRecord>,
}

/// General CLI settings
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GeneralConfig {
    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Hull-White simulation settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Model reference date (YYYY-MM-DD)
    pub reference_date: String,
    /// Number of Monte Carlo paths
    pub paths: usize,
    /// Mean reversion speed
    pub mean_reversion: f64,
    /// Short rate volatility
    pub volatility: f64,
    /// Flat initial curve level
    pub initial_rate: f64,
    /// Simulated horizon in years
    pub horizon_years: f64,
    /// Time steps per year
    pub steps_per_year: usize,
    /// Random seed
    pub seed: u64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            reference_date: "2024-01-02".to_string(),
            paths: 100,
            mean_reversion: 0.05,
            volatility: 0.01,
            initial_rate: 0.02,
            horizon_years: 10.0,
            steps_per_year: 365,
            seed: 42,
        }
    }
}

/// Zero-curve history source: a CSV file or a synthetic flat history
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HistoryConfig {
    /// CSV file in the maturity-by-date layout
    pub path: Option<PathBuf>,
    /// Flat history generated in memory
    pub synthetic: Option<SyntheticHistory>,
}

/// Flat synthetic history ending the business day before the reference date
#[derive(Debug, Clone, Deserialize)]
pub struct SyntheticHistory {
    /// First observation date (YYYY-MM-DD)
    pub start: String,
    /// Flat zero rate
    pub rate: f64,
    /// Pillar maturities in years
    #[serde(default = "default_maturities")]
    pub maturities: Vec<f64>,
}

fn default_maturities() -> Vec<f64> {
    vec![1.0 / 365.0, 0.25, 0.5, 1.0, 2.0, 5.0, 10.0, 20.0, 30.0]
}

/// Margin engine settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MarginSection {
    /// Rebuild scenarios at every evaluation date
    pub moving_window: bool,
    /// Rank and aggregate per path
    pub path_wise: bool,
    /// Observations in the rolling window
    pub rolling_window_days: usize,
    /// Clamp the stress window to the scenario cutoff
    pub clamp_stress_window: bool,
    /// Minimum batch size for parallel execution
    pub parallel_threshold: usize,
}

impl Default for MarginSection {
    fn default() -> Self {
        let engine = MarginConfig::default();
        Self {
            moving_window: engine.moving_window,
            path_wise: engine.path_wise,
            rolling_window_days: engine.scenarios.rolling_window_days,
            clamp_stress_window: engine.scenarios.clamp_stress_window,
            parallel_threshold: engine.parallel.parallel_threshold,
        }
    }
}

/// Portfolio selection
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PortfolioConfig {
    /// CSV trade list, merged with the inline trades
    pub trades_file: Option<PathBuf>,
    /// Currency to evaluate when trades span several currencies
    pub currency: Option<String>,
}

impl CliConfig {
    /// Load configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(CliError::FileNotFound(path.display().to_string()));
        }
        let content = std::fs::read_to_string(path)?;
        content.parse()
    }

    /// Applies `MARGIN_LOG_LEVEL` and `MARGIN_PATHS` from the environment.
    pub fn with_env_override(self) -> Result<Self> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Applies overrides from `lookup`, keyed by environment variable name.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(level) = lookup(ENV_LOG_LEVEL) {
            self.general.log_level = level.parse()?;
        }
        if let Some(paths) = lookup(ENV_PATHS) {
            self.model.paths = paths
                .trim()
                .parse()
                .map_err(|_| CliError::Config(format!("{} must be a count, got {}", ENV_PATHS, paths)))?;
        }
        Ok(self)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        let model = &self.model;
        if model.paths == 0 {
            return Err(CliError::Config("model.paths must be positive".to_string()));
        }
        if !(model.horizon_years.is_finite() && model.horizon_years > 0.0) {
            return Err(CliError::Config(format!(
                "model.horizon_years must be positive, got {}",
                model.horizon_years
            )));
        }
        if model.steps_per_year == 0 {
            return Err(CliError::Config(
                "model.steps_per_year must be positive".to_string(),
            ));
        }
        self.reference_date()?;

        match (&self.history.path, &self.history.synthetic) {
            (Some(_), Some(_)) => Err(CliError::Config(
                "history.path and history.synthetic are exclusive".to_string(),
            )),
            (None, None) => Err(CliError::Config(
                "either history.path or history.synthetic is required".to_string(),
            )),
            _ => Ok(()),
        }
    }

    /// Model reference date.
    pub fn reference_date(&self) -> Result<Date> {
        Ok(self.model.reference_date.parse()?)
    }

    /// Margin engine configuration.
    pub fn margin_config(&self) -> MarginConfig {
        let section = &self.margin;
        MarginConfig::default()
            .with_moving_window(section.moving_window)
            .with_path_wise(section.path_wise)
            .with_scenarios(
                ScenarioSettings::default()
                    .with_rolling_window_days(section.rolling_window_days)
                    .with_clamp_stress_window(section.clamp_stress_window),
            )
            .with_parallel(ParallelConfig::new(section.parallel_threshold))
    }

    /// Observed history from the configured source.
    pub fn load_history(&self) -> Result<ZeroCurveHistory> {
        if let Some(path) = &self.history.path {
            return Ok(HistoryLoader::load(path)?);
        }
        match &self.history.synthetic {
            Some(synthetic) => {
                let start: Date = synthetic.start.parse()?;
                let end = self.reference_date()?.previous_business_day()?;
                Ok(ZeroCurveHistory::flat(
                    start,
                    end,
                    &synthetic.maturities,
                    synthetic.rate,
                )?)
            }
            None => Err(CliError::Config("no history source configured".to_string())),
        }
    }

    /// Zero-rate model on a Hull-White simulation and the loaded history.
    pub fn build_model(&self) -> Result<ZeroRateModel> {
        let model = &self.model;
        let params =
            HullWhiteParameters::new(model.mean_reversion, model.volatility, model.initial_rate)?;
        let dt = 1.0 / model.steps_per_year as f64;
        let steps = (model.horizon_years * model.steps_per_year as f64).ceil() as usize;
        let grid = TimeDiscretization::uniform(0.0, steps, dt)?;
        let simulation = HullWhiteSimulation::new(
            self.reference_date()?,
            params,
            grid,
            model.paths,
            model.seed,
        )?;
        Ok(ZeroRateModel::new(Arc::new(simulation), self.load_history()?))
    }

    /// Single-currency portfolio of the inline and file trades.
    pub fn build_portfolio(&self) -> Result<Portfolio> {
        let mut swaps = self
            .trades
            .iter()
            .enumerate()
            .map(|(i, trade)| trade.build(i + 1))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        if let Some(path) = &self.portfolio.trades_file {
            swaps.extend(TradeLoader::load(path)?);
        }
        if swaps.is_empty() {
            return Err(CliError::Config("no trades configured".to_string()));
        }

        let global = TradeLoader::group(swaps)?;
        let currencies: Vec<Currency> = global.currencies().collect();
        let currency = match (&self.portfolio.currency, currencies.as_slice()) {
            (Some(code), _) => code
                .parse::<Currency>()
                .map_err(|e| CliError::Config(e.to_string()))?,
            (None, [single]) => *single,
            (None, _) => {
                return Err(CliError::Config(format!(
                    "trades span {} currencies; set portfolio.currency",
                    currencies.len()
                )))
            }
        };
        global
            .portfolio(currency)
            .cloned()
            .ok_or_else(|| CliError::Config(format!("no trades in {}", currency)))
    }
}

impl FromStr for CliConfig {
    type Err = CliError;

    fn from_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| CliError::Parse(format!("Failed to parse config: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &str = r#"
        [general]
        log_level = "debug"

        [model]
        reference_date = "2024-01-02"
        paths = 8
        mean_reversion = 0.03
        volatility = 0.0
        initial_rate = 0.02
        horizon_years = 6.0
        steps_per_year = 12
        seed = 7

        [history.synthetic]
        start = "2023-06-01"
        rate = 0.02
        maturities = [0.0027, 1.0, 5.0, 30.0]

        [margin]
        moving_window = false
        path_wise = true
        rolling_window_days = 100

        [[trades]]
        currency = "EUR"
        curve = "EUR"
        notional = 1000000.0
        start = "2024-01-02"
        end = "2029-01-02"
        fixed_rate = 0.02
        frequency = "annual"
        payer = true
    "#;

    #[test]
    fn test_default_config() {
        let config = CliConfig::default();
        assert_eq!(config.general.log_level, LogLevel::Info);
        assert_eq!(config.model.paths, 100);
        assert_eq!(config.model.steps_per_year, 365);
        assert!(config.margin.moving_window);
        assert_eq!(config.margin.rolling_window_days, 2500);
        assert!(config.trades.is_empty());
    }

    #[test]
    fn test_toml_deserialization() {
        let config: CliConfig = FULL.parse().unwrap();
        assert_eq!(config.general.log_level, LogLevel::Debug);
        assert_eq!(config.model.paths, 8);
        assert_eq!(config.model.seed, 7);
        assert!(config.history.path.is_none());
        assert_eq!(config.history.synthetic.as_ref().unwrap().maturities.len(), 4);
        assert_eq!(config.trades.len(), 1);
        assert!(config.validate().is_ok());

        let margin = config.margin_config();
        assert!(!margin.moving_window);
        assert!(margin.path_wise);
        assert_eq!(margin.scenarios.rolling_window_days, 100);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: CliConfig = "[model]\npaths = 5\n".parse().unwrap();
        assert_eq!(config.model.paths, 5);
        assert_eq!(config.model.mean_reversion, 0.05);
        assert_eq!(config.margin.rolling_window_days, 2500);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config: CliConfig = FULL.parse().unwrap();
        config.model.paths = 0;
        assert!(config.validate().is_err());

        let mut config: CliConfig = FULL.parse().unwrap();
        config.model.horizon_years = -1.0;
        assert!(config.validate().is_err());

        let mut config: CliConfig = FULL.parse().unwrap();
        config.model.steps_per_year = 0;
        assert!(config.validate().is_err());

        let mut config: CliConfig = FULL.parse().unwrap();
        config.history.synthetic = None;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_overrides() {
        let config: CliConfig = FULL.parse().unwrap();
        let config = config
            .with_overrides(|key| match key {
                ENV_LOG_LEVEL => Some("warn".to_string()),
                ENV_PATHS => Some("3".to_string()),
                _ => None,
            })
            .unwrap();
        assert_eq!(config.general.log_level, LogLevel::Warn);
        assert_eq!(config.model.paths, 3);

        let bad = CliConfig::default().with_overrides(|key| {
            (key == ENV_PATHS).then(|| "many".to_string())
        });
        assert!(bad.is_err());
    }

    #[test]
    fn test_log_level_parsing() {
        assert_eq!(LogLevel::from_str("TRACE").unwrap(), LogLevel::Trace);
        assert_eq!(LogLevel::from_str("Error").unwrap(), LogLevel::Error);
        assert!(LogLevel::from_str("loud").is_err());
        assert_eq!(LogLevel::Warn.to_string(), "warn");
    }

    #[test]
    fn test_build_model_and_portfolio() {
        let config: CliConfig = FULL.parse().unwrap();
        let model = config.build_model().unwrap();
        assert_eq!(model.number_of_paths(), 8);
        assert_eq!(model.reference_date(), Date::from_ymd(2024, 1, 2).unwrap());
        assert_eq!(
            model.history().last_date(),
            Some(Date::from_ymd(2024, 1, 1).unwrap())
        );

        let portfolio = config.build_portfolio().unwrap();
        assert_eq!(portfolio.currency(), Currency::EUR);
        assert_eq!(portfolio.len(), 2);
    }

    #[test]
    fn test_missing_trades() {
        let mut config: CliConfig = FULL.parse().unwrap();
        config.trades.clear();
        assert!(matches!(config.build_portfolio(), Err(CliError::Config(_))));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            CliConfig::load("does-not-exist.toml"),
            Err(CliError::FileNotFound(_))
        ));
    }
}
