//! Bootstrap behaviour across interpolation policies.

use approx::assert_abs_diff_eq;
use ck_core::{Compounding, Error, Real};
use ck_quotes::SimpleQuote;
use ck_termstructures::{
    BootstrapOptions, CurveInterpolation, DepositRateHelper, PiecewiseYieldCurve, RateHelper,
    RelinkableYieldTermStructureHandle, TermStructure, YieldTermStructure,
};
use ck_time::{Actual360, Date, DayCounter, Frequency, Period, TimeUnit};
use proptest::prelude::*;
use std::sync::Arc;

fn date(y: u16, m: u8, d: u8) -> Date {
    Date::from_ymd(y, m, d).unwrap()
}

fn today() -> Date {
    date(2025, 1, 2)
}

fn deposits(rates: &[(i32, TimeUnit, Real)]) -> Vec<Box<dyn RateHelper>> {
    rates
        .iter()
        .map(|&(n, unit, rate)| {
            let tenor = Period::new(n, unit);
            let (_, quote) = SimpleQuote::shared(tenor.to_string(), rate);
            let maturity = today().add_period(tenor).unwrap();
            Box::new(DepositRateHelper::new(quote, today(), maturity, Arc::new(Actual360)).unwrap())
                as Box<dyn RateHelper>
        })
        .collect()
}

fn market() -> Vec<(i32, TimeUnit, Real)> {
    vec![
        (1, TimeUnit::Weeks, 0.0190),
        (3, TimeUnit::Months, 0.0200),
        (6, TimeUnit::Months, 0.0250),
        (1, TimeUnit::Years, 0.0300),
        (18, TimeUnit::Months, 0.0320),
        (2, TimeUnit::Years, 0.0350),
    ]
}

fn build(interpolation: CurveInterpolation) -> PiecewiseYieldCurve {
    PiecewiseYieldCurve::bootstrap(
        today(),
        deposits(&market()),
        Arc::new(Actual360),
        interpolation,
        &BootstrapOptions::default(),
    )
    .unwrap()
}

#[test]
fn every_policy_reprices_its_helpers() {
    for interpolation in CurveInterpolation::ALL {
        let curve = build(interpolation);
        assert_eq!(curve.discount(today()).unwrap(), 1.0, "{interpolation}");
        for helper in curve.helpers() {
            let residual = helper.quote_error(&curve).unwrap();
            assert!(
                residual.abs() < 1e-10,
                "{interpolation}: {} off by {residual:e}",
                helper.description()
            );
        }
    }
}

#[test]
fn zero_rates_round_trip_at_pillars() {
    for interpolation in [CurveInterpolation::LinearZero, CurveInterpolation::CubicZero] {
        let curve = build(interpolation);
        for (d, z) in curve.nodes().into_iter().skip(1) {
            let sampled = curve
                .zero_rate(d, Compounding::Continuous, Frequency::NoFrequency)
                .unwrap();
            assert_abs_diff_eq!(sampled.rate(), z, epsilon = 1e-10);
        }
    }
    let curve = build(CurveInterpolation::LogCubicDiscount);
    for (d, df) in curve.nodes() {
        assert_abs_diff_eq!(curve.discount(d).unwrap(), df, epsilon = 1e-10);
    }
}

#[test]
fn discount_factors_decrease_for_positive_rates() {
    for interpolation in CurveInterpolation::ALL {
        let curve = build(interpolation);
        let mut last = 1.0;
        for month in 1..=24 {
            let df = curve
                .discount(today().add_period(Period::months(month)).unwrap())
                .unwrap();
            assert!(df < last, "{interpolation}: not decreasing at month {month}");
            last = df;
        }
    }
}

#[test]
fn flat_forward_jumps_at_pillars_log_cubic_does_not() {
    let flat = build(CurveInterpolation::FlatForward);
    let cubic = build(CurveInterpolation::LogCubicDiscount);
    let eps = 1e-8;
    for i in 2..flat.times().len() - 1 {
        let t = flat.times()[i];
        let jump = flat.instantaneous_forward(t + eps).unwrap() - flat.instantaneous_forward(t - eps).unwrap();
        let expected = flat.data()[i + 1] - flat.data()[i];
        assert_abs_diff_eq!(jump, expected, epsilon = 1e-14);
        assert!(jump.abs() > 1e-4, "no glitch at node {i}");

        let smooth = cubic.instantaneous_forward(t + eps).unwrap() - cubic.instantaneous_forward(t - eps).unwrap();
        assert!(smooth.abs() < 1e-6, "log-cubic forward jumps by {smooth:e} at node {i}");
    }
}

#[test]
fn spline_policies_iterate() {
    assert_eq!(build(CurveInterpolation::LinearZero).passes(), 1);
    assert_eq!(build(CurveInterpolation::FlatForward).passes(), 1);
    assert!(build(CurveInterpolation::CubicZero).passes() > 1);
    assert!(build(CurveInterpolation::LogCubicDiscount).passes() > 1);
}

#[test]
fn queries_past_the_last_pillar_need_extrapolation() {
    let curve = build(CurveInterpolation::LinearZero);
    let late = date(2030, 1, 2);
    assert!(matches!(curve.discount(late), Err(Error::Extrapolation(_))));
    curve.enable_extrapolation(true);
    assert!(curve.discount(late).unwrap() < curve.discount(curve.max_date()).unwrap());
    curve.enable_extrapolation(false);
    assert!(curve.discount(late).is_err());
}

#[test]
fn turn_of_year_jump_is_priced_in() {
    let jump_date = date(2025, 12, 31);
    let curve = PiecewiseYieldCurve::bootstrap_with_jumps(
        today(),
        deposits(&market()),
        Arc::new(Actual360),
        CurveInterpolation::LogCubicDiscount,
        &[(jump_date, 0.9995)],
        &BootstrapOptions::default(),
    )
    .unwrap();
    for helper in curve.helpers() {
        assert_abs_diff_eq!(helper.quote_error(&curve).unwrap(), 0.0, epsilon = 1e-10);
    }
    let before = curve.discount(jump_date).unwrap();
    let after = curve.discount(date(2026, 1, 1)).unwrap();
    let overnight = (before / after).ln() / Actual360.year_fraction(jump_date, date(2026, 1, 1));
    assert!(overnight > 0.1, "turn-of-year forward only {overnight}");
}

#[test]
fn relinking_moves_every_observer() {
    let low = build(CurveInterpolation::LinearZero);
    let high = PiecewiseYieldCurve::bootstrap(
        today(),
        deposits(&market().into_iter().map(|(n, u, r)| (n, u, r + 0.01)).collect::<Vec<_>>()),
        Arc::new(Actual360),
        CurveInterpolation::LinearZero,
        &BootstrapOptions::default(),
    )
    .unwrap();
    let maturity = date(2026, 1, 2);
    let low_df = low.discount(maturity).unwrap();
    let high_df = high.discount(maturity).unwrap();

    let relinkable = RelinkableYieldTermStructureHandle::new(Arc::new(low));
    let observer = relinkable.handle();
    assert_eq!(observer.current().discount(maturity).unwrap(), low_df);
    relinkable.link_to(Arc::new(high));
    assert_eq!(observer.current().discount(maturity).unwrap(), high_df);
    assert!(high_df < low_df);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn bootstrap_is_deterministic(
        r1 in 0.001f64..0.08,
        r2 in 0.001f64..0.08,
        r3 in 0.001f64..0.08,
        r4 in 0.001f64..0.08,
        which in 0usize..4,
    ) {
        let quotes = [
            (3, TimeUnit::Months, r1),
            (6, TimeUnit::Months, r2),
            (1, TimeUnit::Years, r3),
            (2, TimeUnit::Years, r4),
        ];
        let interpolation = CurveInterpolation::ALL[which];
        let first = PiecewiseYieldCurve::bootstrap(
            today(), deposits(&quotes), Arc::new(Actual360), interpolation, &BootstrapOptions::default(),
        ).unwrap();
        let second = PiecewiseYieldCurve::bootstrap(
            today(), deposits(&quotes), Arc::new(Actual360), interpolation, &BootstrapOptions::default(),
        ).unwrap();
        prop_assert_eq!(first.data(), second.data());
        prop_assert_eq!(first.discount(today()).unwrap(), 1.0);
    }
}
