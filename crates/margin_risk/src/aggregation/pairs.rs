//! PAIRS initial margin: base, floor and their maximum.

use margin_core::stochastic::{RandomVariable, RandomVariableSeries};
use margin_core::types::Date;
use margin_models::products::Portfolio;
use margin_models::zero_rate::ZeroRateModel;
use tracing::{debug, info};

use super::config::{MarginConfig, MarginKind};
use super::container::{InitialMarginContainer, SimulationArtifacts};
use super::error::MarginError;
use super::losses::{aggregate_losses, taylor_pnl, FULL_REVALUATIONS};
use crate::parallel::try_parallel_map;
use crate::scenarios::{CurveScenarios, ScenarioFactory, Simulation};
use crate::sensitivities::{SensitivityEngine, SensitivityMatrix};

/// Base, floor and pairs margin of one evaluation date.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PairsMargin {
    /// Evaluation date
    pub evaluation: Date,
    /// Expected shortfall over the 6 worst losses
    pub base: RandomVariable,
    /// Value-at-risk at the 13th worst loss
    pub floor: RandomVariable,
    /// Larger of base and floor
    pub pairs: RandomVariable,
}

impl PairsMargin {
    /// Figure of `kind`.
    pub fn get(&self, kind: MarginKind) -> &RandomVariable {
        match kind {
            MarginKind::Base => &self.base,
            MarginKind::Floor => &self.floor,
            MarginKind::Pairs => &self.pairs,
        }
    }
}

/// Initial margin of a single-currency portfolio on a zero-rate model.
///
/// For every evaluation date the engine:
/// 1. buckets delta and gamma onto the risk grid,
/// 2. builds the scenario shifts of every bucketed fixing,
/// 3. ranks scenario dates by second-order Taylor PnL,
/// 4. fully revalues the portfolio on the [`FULL_REVALUATIONS`] worst dates,
/// 5. aggregates the revalued losses into expected shortfall or value-at-risk.
///
/// In path-wise mode steps 3 to 5 run independently per simulation path.
pub struct PairsInitialMargin<'a> {
    model: &'a ZeroRateModel,
    portfolio: &'a Portfolio,
    engine: SensitivityEngine,
    config: MarginConfig,
}

impl<'a> PairsInitialMargin<'a> {
    /// Creates the engine for `portfolio` on `model`.
    pub fn new(model: &'a ZeroRateModel, portfolio: &'a Portfolio, config: MarginConfig) -> Self {
        Self {
            model,
            portfolio,
            engine: SensitivityEngine::new(portfolio),
            config,
        }
    }

    /// Zero-rate model.
    pub fn model(&self) -> &ZeroRateModel {
        self.model
    }

    /// Portfolio.
    pub fn portfolio(&self) -> &Portfolio {
        self.portfolio
    }

    /// Configuration.
    pub fn config(&self) -> &MarginConfig {
        &self.config
    }

    /// Sensitivity engine with its component caches.
    pub fn engine(&self) -> &SensitivityEngine {
        &self.engine
    }

    /// Date as of which scenarios are built for `evaluation`.
    pub fn scenario_date(&self, evaluation: Date) -> Date {
        if self.config.moving_window {
            evaluation
        } else {
            self.model.reference_date()
        }
    }

    /// Sensitivities and the artifacts of every simulation in `simulations`.
    pub fn evaluate(
        &self,
        evaluation: Date,
        simulations: &[Simulation],
    ) -> Result<InitialMarginContainer, MarginError> {
        let (delta, gamma) = self.sensitivities(evaluation)?;
        let mut container = InitialMarginContainer::new(evaluation, delta, gamma);
        for &simulation in simulations {
            let artifacts =
                self.run_simulation(evaluation, container.delta(), container.gamma(), simulation)?;
            container.insert(simulation, artifacts);
        }
        Ok(container)
    }

    /// Margin of a single simulation.
    pub fn simulation_margin(
        &self,
        evaluation: Date,
        simulation: Simulation,
    ) -> Result<RandomVariable, MarginError> {
        let (delta, gamma) = self.sensitivities(evaluation)?;
        Ok(self
            .run_simulation(evaluation, &delta, &gamma, simulation)?
            .margin)
    }

    /// Base, floor and pairs margin.
    pub fn margins(&self, evaluation: Date) -> Result<PairsMargin, MarginError> {
        let (delta, gamma) = self.sensitivities(evaluation)?;
        let base = self
            .run_simulation(evaluation, &delta, &gamma, Simulation::ExpectedShortfall6)?
            .margin;
        let floor = self
            .run_simulation(evaluation, &delta, &gamma, Simulation::ValueAtRisk)?
            .margin;
        let pairs = self.combine(&base, &floor);
        info!(
            %evaluation,
            base = base.average(),
            floor = floor.average(),
            pairs = pairs.average(),
            "initial margin"
        );
        Ok(PairsMargin {
            evaluation,
            base,
            floor,
            pairs,
        })
    }

    /// Margin of `kind`.
    pub fn initial_margin(
        &self,
        evaluation: Date,
        kind: MarginKind,
    ) -> Result<RandomVariable, MarginError> {
        match kind.simulation() {
            Some(simulation) => self.simulation_margin(evaluation, simulation),
            None => Ok(self.margins(evaluation)?.pairs),
        }
    }

    /// Margin of `kind` on each of `dates`, in order.
    pub fn initial_margin_profile(
        &self,
        dates: &[Date],
        kind: MarginKind,
    ) -> Result<Vec<(Date, RandomVariable)>, MarginError> {
        dates
            .iter()
            .map(|&date| self.initial_margin(date, kind).map(|im| (date, im)))
            .collect()
    }

    /// Pairs composition: elementwise in path-wise mode, by average otherwise.
    pub fn combine(&self, base: &RandomVariable, floor: &RandomVariable) -> RandomVariable {
        if self.config.path_wise {
            base.max(floor)
        } else {
            base.max_by_average(floor)
        }
    }

    fn sensitivities(
        &self,
        evaluation: Date,
    ) -> Result<(SensitivityMatrix, SensitivityMatrix), MarginError> {
        let delta = self.engine.delta(evaluation, self.model)?;
        let gamma = self.engine.gamma(evaluation, self.model)?;
        Ok((delta, gamma))
    }

    fn run_simulation(
        &self,
        evaluation: Date,
        delta: &SensitivityMatrix,
        gamma: &SensitivityMatrix,
        simulation: Simulation,
    ) -> Result<SimulationArtifacts, MarginError> {
        let scenario_date = self.scenario_date(evaluation);
        debug!(%evaluation, %scenario_date, %simulation, "margin pass");

        let factory = ScenarioFactory::new(self.model, self.config.scenarios)
            .with_parallel_config(self.config.parallel.clone());
        let fixings = delta.fixings().into_iter().chain(gamma.fixings());
        let curve_scenarios = factory.curve_scenarios(scenario_date, fixings, simulation)?;
        let pnl = taylor_pnl(delta, gamma, &curve_scenarios)?;

        let (worst_dates, margin) = if self.config.path_wise {
            let paths: Vec<usize> = (0..self.model.number_of_paths()).collect();
            let per_path = try_parallel_map(&paths, &self.config.parallel, |&path| {
                let dates = pnl.n_lowest_dates(FULL_REVALUATIONS, Some(path));
                let losses = self.worst_losses(evaluation, &dates, &curve_scenarios, Some(path))?;
                let margin = aggregate_losses(&losses, simulation, Some(path)).get(0);
                Ok::<_, MarginError>((dates, margin))
            })?;
            let (dates, margins): (Vec<_>, Vec<_>) = per_path.into_iter().unzip();
            (dates, RandomVariable::from_paths(margins))
        } else {
            let dates = pnl.n_lowest_dates(FULL_REVALUATIONS, None);
            let losses = self.worst_losses(evaluation, &dates, &curve_scenarios, None)?;
            let margin = aggregate_losses(&losses, simulation, None);
            (vec![dates], margin)
        };

        debug!(%evaluation, %simulation, margin = margin.average(), "margin pass done");
        Ok(SimulationArtifacts {
            curve_scenarios,
            pnl,
            worst_dates,
            margin,
        })
    }

    /// Full revaluation losses on `dates`; zero once nothing is left to pay.
    fn worst_losses(
        &self,
        evaluation: Date,
        dates: &[Date],
        scenarios: &CurveScenarios,
        path: Option<usize>,
    ) -> Result<RandomVariableSeries, MarginError> {
        let live = matches!(self.portfolio.last_payment_date(), Some(last) if evaluation < last);
        if !live {
            return Ok(dates
                .iter()
                .map(|d| (*d, RandomVariable::scalar(0.0)))
                .collect());
        }

        let base = self.portfolio.value(evaluation, self.model, None, path)?;
        let mut losses = RandomVariableSeries::new();
        for date in dates {
            let shift = scenarios.curve_shifts(*date)?;
            let shifted = self
                .portfolio
                .value(evaluation, self.model, Some(&shift), path)?;
            losses.insert(*date, shifted - &base);
        }
        Ok(losses)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenarios::ScenarioSettings;
    use approx::assert_relative_eq;
    use margin_core::types::Currency;
    use margin_models::products::{CurveName, Swap};
    use margin_models::schedules::{Frequency, ScheduleBuilder};
    use margin_models::simulation::{HullWhiteParameters, HullWhiteSimulation, TimeDiscretization};
    use margin_models::zero_rate::ZeroCurveHistory;
    use std::sync::Arc;

    const MATURITIES: [f64; 4] = [1.0 / 365.0, 1.0, 5.0, 30.0];

    fn date(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd(y, m, d).unwrap()
    }

    fn model(history: ZeroCurveHistory, paths: usize) -> ZeroRateModel {
        let params = HullWhiteParameters::new(0.05, 0.0, 0.02).unwrap();
        let grid = TimeDiscretization::uniform(0.0, 120, 0.25).unwrap();
        let sim = HullWhiteSimulation::new(date(2024, 1, 2), params, grid, paths, 7).unwrap();
        ZeroRateModel::new(Arc::new(sim), history)
    }

    fn flat_history() -> ZeroCurveHistory {
        ZeroCurveHistory::flat(date(2023, 6, 1), date(2023, 12, 29), &MATURITIES, 0.02).unwrap()
    }

    fn moving_history() -> ZeroCurveHistory {
        let days = Date::business_days(date(2023, 6, 1), date(2023, 12, 29)).unwrap();
        ZeroCurveHistory::from_rates(days.into_iter().enumerate().flat_map(|(i, d)| {
            let rate = 0.02 + 0.002 * (i as f64 * 0.7).sin();
            MATURITIES.into_iter().map(move |m| (d, m, rate))
        }))
    }

    fn portfolio() -> Portfolio {
        let schedule = ScheduleBuilder::new()
            .start(date(2024, 1, 2))
            .end(date(2029, 1, 2))
            .frequency(Frequency::SemiAnnual)
            .build()
            .unwrap();
        let swap = Swap::vanilla(
            Currency::EUR,
            CurveName::new("EUR"),
            10_000_000.0,
            &schedule,
            0.02,
            true,
        )
        .unwrap();
        let mut portfolio = Portfolio::new(Currency::EUR, CurveName::new("EUR"));
        portfolio.add_swap(swap).unwrap();
        portfolio
    }

    fn config() -> MarginConfig {
        MarginConfig::default()
            .with_scenarios(ScenarioSettings::default().with_rolling_window_days(100))
    }

    // ========================================
    // Composition
    // ========================================

    #[test]
    fn test_pairs_margin_accessors() {
        let margin = PairsMargin {
            evaluation: date(2024, 1, 2),
            base: RandomVariable::scalar(3.0),
            floor: RandomVariable::scalar(2.0),
            pairs: RandomVariable::scalar(3.0),
        };
        assert_eq!(margin.get(MarginKind::Base).get(0), 3.0);
        assert_eq!(margin.get(MarginKind::Floor).get(0), 2.0);
        assert_eq!(margin.get(MarginKind::Pairs).get(0), 3.0);
    }

    #[test]
    fn test_combine_by_average_or_path() {
        let m = model(flat_history(), 2);
        let p = portfolio();
        let base = RandomVariable::from_paths(vec![1.0, 5.0]);
        let floor = RandomVariable::from_paths(vec![2.0, 3.0]);

        let averaged = PairsInitialMargin::new(&m, &p, config());
        assert_eq!(averaged.combine(&base, &floor), base);

        let path_wise = PairsInitialMargin::new(&m, &p, config().with_path_wise(true));
        assert_eq!(path_wise.combine(&base, &floor).realizations(), &[2.0, 5.0]);
    }

    #[test]
    fn test_scenario_date_follows_window_mode() {
        let m = model(flat_history(), 1);
        let p = portfolio();
        let later = date(2024, 3, 1);

        let moving = PairsInitialMargin::new(&m, &p, config());
        assert_eq!(moving.scenario_date(later), later);

        let fixed = PairsInitialMargin::new(&m, &p, config().with_moving_window(false));
        assert_eq!(fixed.scenario_date(later), date(2024, 1, 2));
    }

    // ========================================
    // End to end
    // ========================================

    #[test]
    fn test_flat_history_gives_zero_margin() {
        let m = model(flat_history(), 1);
        let p = portfolio();
        let engine = PairsInitialMargin::new(&m, &p, config());

        let margins = engine.margins(date(2024, 1, 2)).unwrap();
        assert!(margins.base.get(0).abs() < 1e-2);
        assert!(margins.floor.get(0).abs() < 1e-2);
        assert!(margins.pairs.get(0).abs() < 1e-2);
    }

    #[test]
    fn test_moving_history_gives_positive_margin() {
        let m = model(moving_history(), 1);
        let p = portfolio();
        let engine = PairsInitialMargin::new(&m, &p, config());
        let evaluation = date(2024, 1, 2);

        let margins = engine.margins(evaluation).unwrap();
        assert!(margins.base.get(0) > 0.0);
        assert!(margins.floor.get(0) > 0.0);
        assert_eq!(margins.pairs, margins.base.max_by_average(&margins.floor));

        let pairs = engine.initial_margin(evaluation, MarginKind::Pairs).unwrap();
        assert_eq!(pairs, margins.pairs);
        let base = engine.initial_margin(evaluation, MarginKind::Base).unwrap();
        assert_eq!(base, margins.base);
    }

    #[test]
    fn test_container_keeps_artifacts() {
        let m = model(moving_history(), 1);
        let p = portfolio();
        let engine = PairsInitialMargin::new(&m, &p, config());

        let container = engine
            .evaluate(date(2024, 1, 2), &[Simulation::ExpectedShortfall4])
            .unwrap();
        assert!(!container.delta().is_empty());
        assert!(!container.gamma().is_empty());
        assert_eq!(
            container.simulations().collect::<Vec<_>>(),
            vec![Simulation::ExpectedShortfall4]
        );

        let artifacts = container.simulation(Simulation::ExpectedShortfall4).unwrap();
        assert_eq!(artifacts.worst_dates.len(), 1);
        assert_eq!(artifacts.worst_dates[0].len(), FULL_REVALUATIONS);
        assert!(artifacts.pnl.len() >= FULL_REVALUATIONS);
        assert!(container.margin(Simulation::ValueAtRisk).is_none());
    }

    #[test]
    fn test_path_wise_matches_average_on_identical_paths() {
        let m = model(moving_history(), 2);
        let p = portfolio();
        let evaluation = date(2024, 1, 2);

        let averaged = PairsInitialMargin::new(&m, &p, config())
            .simulation_margin(evaluation, Simulation::ExpectedShortfall6)
            .unwrap();
        let path_wise = PairsInitialMargin::new(&m, &p, config().with_path_wise(true))
            .simulation_margin(evaluation, Simulation::ExpectedShortfall6)
            .unwrap();

        assert_eq!(path_wise.number_of_paths(), 2);
        assert_relative_eq!(path_wise.get(0), averaged.average(), max_relative = 1e-9);
        assert_relative_eq!(path_wise.get(1), averaged.average(), max_relative = 1e-9);
    }

    #[test]
    fn test_profile_is_zero_after_maturity() {
        let m = model(flat_history(), 1);
        let p = portfolio();
        let engine = PairsInitialMargin::new(&m, &p, config());
        let dates = [date(2029, 3, 1), date(2029, 6, 1)];

        let profile = engine.initial_margin_profile(&dates, MarginKind::Floor).unwrap();
        assert_eq!(profile.len(), 2);
        assert_eq!(profile[0].0, dates[0]);
        assert_eq!(profile[1].0, dates[1]);
        assert!(profile.iter().all(|(_, im)| im.get(0) == 0.0));
    }
}
