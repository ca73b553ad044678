//! Criterion benchmarks for scenario generation, sensitivities and margin.

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use margin_core::types::{Currency, Date};
use margin_models::products::{CurveName, Portfolio, Swap};
use margin_models::schedules::{Frequency, ScheduleBuilder};
use margin_models::simulation::{HullWhiteParameters, HullWhiteSimulation, TimeDiscretization};
use margin_models::zero_rate::{ZeroCurveHistory, ZeroRateModel};
use margin_risk::aggregation::{MarginConfig, MarginKind, PairsInitialMargin};
use margin_risk::scenarios::{ScenarioFactory, ScenarioSettings, Simulation};
use margin_risk::sensitivities::SensitivityEngine;

fn date(y: i32, m: u32, d: u32) -> Date {
    Date::from_ymd(y, m, d).unwrap()
}

fn reference() -> Date {
    date(2024, 1, 2)
}

/// Two years of oscillating history on a small pillar set.
fn model(paths: usize) -> ZeroRateModel {
    let params = HullWhiteParameters::new(0.05, 0.01, 0.02).unwrap();
    let grid = TimeDiscretization::uniform(0.0, 120, 0.25).unwrap();
    let sim = HullWhiteSimulation::new(reference(), params, grid, paths, 42).unwrap();
    let days = Date::business_days(date(2022, 1, 3), date(2023, 12, 29)).unwrap();
    let history = ZeroCurveHistory::from_rates(days.into_iter().enumerate().flat_map(|(i, d)| {
        let level = 0.02 + 0.003 * (i as f64 * 0.05).sin();
        [1.0 / 365.0, 1.0, 5.0, 10.0, 30.0]
            .into_iter()
            .map(move |m| (d, m, level + 0.0005 * m.ln_1p()))
    }));
    ZeroRateModel::new(Arc::new(sim), history)
}

fn portfolio(swaps: usize) -> Portfolio {
    let mut portfolio = Portfolio::new(Currency::EUR, CurveName::new("EUR"));
    for i in 0..swaps {
        let schedule = ScheduleBuilder::new()
            .start(reference())
            .end(date(2026 + i as i32, 1, 2))
            .frequency(Frequency::SemiAnnual)
            .build()
            .unwrap();
        let swap = Swap::vanilla(
            Currency::EUR,
            CurveName::new("EUR"),
            1e7,
            &schedule,
            0.02,
            i % 2 == 0,
        )
        .unwrap();
        portfolio.add_swap(swap).unwrap();
    }
    portfolio
}

fn settings() -> ScenarioSettings {
    ScenarioSettings::default().with_rolling_window_days(250)
}

/// Benchmark per-tenor scenario generation.
fn bench_curve_scenarios(c: &mut Criterion) {
    let model = model(100);
    let factory = ScenarioFactory::new(&model, settings());
    let fixings = [0.25, 1.0, 2.0, 5.0, 10.0];

    let mut group = c.benchmark_group("curve_scenarios");
    for simulation in Simulation::ALL {
        group.bench_with_input(
            BenchmarkId::from_parameter(simulation),
            &simulation,
            |b, &simulation| {
                b.iter(|| {
                    factory
                        .curve_scenarios(reference(), black_box(fixings), simulation)
                        .unwrap()
                })
            },
        );
    }
    group.finish();
}

/// Benchmark bucketed delta and gamma.
fn bench_sensitivities(c: &mut Criterion) {
    let model = model(100);
    let mut group = c.benchmark_group("sensitivities");

    for swaps in [1, 10] {
        let portfolio = portfolio(swaps);
        let engine = SensitivityEngine::new(&portfolio);
        group.bench_with_input(BenchmarkId::new("delta", swaps), &engine, |b, engine| {
            b.iter(|| engine.delta(black_box(reference()), &model).unwrap())
        });
        group.bench_with_input(BenchmarkId::new("gamma", swaps), &engine, |b, engine| {
            b.iter(|| engine.gamma(black_box(reference()), &model).unwrap())
        });
    }
    group.finish();
}

/// Benchmark the full PAIRS margin on one date.
fn bench_pairs_margin(c: &mut Criterion) {
    let model = model(100);
    let portfolio = portfolio(5);
    let config = MarginConfig::default().with_scenarios(settings());
    let engine = PairsInitialMargin::new(&model, &portfolio, config);

    let mut group = c.benchmark_group("pairs_margin");
    group.sample_size(10);
    group.bench_function("pairs", |b| {
        b.iter(|| {
            engine
                .initial_margin(black_box(reference()), MarginKind::Pairs)
                .unwrap()
        })
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_curve_scenarios,
    bench_sensitivities,
    bench_pairs_margin
);
criterion_main!(benches);
