//! `PiecewiseYieldCurve`: sequential bootstrap of a yield curve from rate
//! helpers.
//!
//! Helpers are sorted by pillar date and solved one at a time: the node at
//! each pillar is moved by Brent's method until the helper's implied quote
//! on the trial curve matches its market quote, with earlier nodes frozen.
//! The solver works on the continuously-compounded zero rate at the pillar
//! whatever the node kind, so one rate bracket serves every policy.
//!
//! Spline policies make every node depend on every other one; for them the
//! sweep is repeated over the full node set until no node moves by more
//! than the requested accuracy.
//!
//! # Example
//!
//! ```
//! use ck_quotes::SimpleQuote;
//! use ck_termstructures::{
//!     BootstrapOptions, CurveInterpolation, DepositRateHelper, PiecewiseYieldCurve, RateHelper,
//!     YieldTermStructure,
//! };
//! use ck_time::{Actual360, Date};
//! use std::sync::Arc;
//!
//! let today = Date::from_ymd(2025, 1, 2).unwrap();
//! let helpers: Vec<Box<dyn RateHelper>> = vec![
//!     Box::new(DepositRateHelper::new(
//!         SimpleQuote::shared("3M", 0.04).1,
//!         today,
//!         Date::from_ymd(2025, 4, 2).unwrap(),
//!         Arc::new(Actual360),
//!     ).unwrap()),
//!     Box::new(DepositRateHelper::new(
//!         SimpleQuote::shared("6M", 0.045).1,
//!         today,
//!         Date::from_ymd(2025, 7, 2).unwrap(),
//!         Arc::new(Actual360),
//!     ).unwrap()),
//! ];
//! let curve = PiecewiseYieldCurve::bootstrap(
//!     today,
//!     helpers,
//!     Arc::new(Actual360),
//!     CurveInterpolation::LinearZero,
//!     &BootstrapOptions::default(),
//! )
//! .unwrap();
//! assert!(curve.discount(Date::from_ymd(2025, 6, 2).unwrap()).unwrap() < 1.0);
//! ```

use crate::interpolated_curve::{checked_jumps, CurveInterpolation, InterpolatedCurve, NodeKind};
use crate::rate_helpers::RateHelper;
use crate::term_structure::TermStructure;
use crate::yield_term_structure::YieldTermStructure;
use ck_core::errors::{Error, Result};
use ck_core::{DiscountFactor, Rate, Real, Size, Time};
use ck_math::{bracket_root, brent};
use ck_quotes::QuoteObservation;
use ck_time::{Date, DayCounter};
use std::sync::Arc;
use tracing::debug;

/// Numerical settings of the bootstrap.
#[derive(Debug, Clone, PartialEq)]
pub struct BootstrapOptions {
    /// Absolute accuracy of each pillar solve and of node changes between
    /// passes. A solve stops once either the bracket on the pillar's zero
    /// rate or the quote residual is within it, so quotes of order 100
    /// (bond prices) can keep a residual of about `100 * accuracy`.
    pub accuracy: Real,
    /// Cap on objective evaluations per pillar.
    pub max_evaluations: Size,
    /// Cap on full sweeps for non-local interpolations.
    pub max_passes: Size,
    /// Lower end of the initial zero-rate bracket.
    pub min_rate: Rate,
    /// Upper end of the initial zero-rate bracket.
    pub max_rate: Rate,
    /// How many times the bracket may be widened before giving up.
    pub max_bracket_expansions: Size,
}

impl Default for BootstrapOptions {
    fn default() -> Self {
        Self {
            accuracy: 1.0e-12,
            max_evaluations: 100,
            max_passes: 50,
            min_rate: -0.10,
            max_rate: 0.30,
            max_bracket_expansions: 20,
        }
    }
}

/// A yield curve bootstrapped from market instruments.
///
/// Once built, the nodes never change. The helpers stay attached so that
/// [`is_stale`](PiecewiseYieldCurve::is_stale) can tell whether any of
/// their quotes moved since the bootstrap.
#[derive(Debug)]
pub struct PiecewiseYieldCurve {
    curve: InterpolatedCurve,
    helpers: Vec<Box<dyn RateHelper>>,
    observed: Vec<QuoteObservation>,
    passes: Size,
}

impl PiecewiseYieldCurve {
    /// Bootstrap a curve from `helpers`.
    ///
    /// # Errors
    /// * [`Error::DuplicatePillar`] if two helpers share a pillar date;
    /// * [`Error::HelperOutOfRange`] if a pillar is not after the reference
    ///   date or a helper cannot be priced on the trial curve;
    /// * [`Error::BootstrapConvergence`] if a pillar cannot be solved.
    pub fn bootstrap(
        reference_date: Date,
        helpers: Vec<Box<dyn RateHelper>>,
        day_counter: Arc<dyn DayCounter>,
        interpolation: CurveInterpolation,
        options: &BootstrapOptions,
    ) -> Result<Self> {
        Self::bootstrap_with_jumps(
            reference_date,
            helpers,
            day_counter,
            interpolation,
            &[],
            options,
        )
    }

    /// Bootstrap with discount jumps (e.g. turn-of-year effects) applied to
    /// the trial curves and to the result.
    pub fn bootstrap_with_jumps(
        reference_date: Date,
        mut helpers: Vec<Box<dyn RateHelper>>,
        day_counter: Arc<dyn DayCounter>,
        interpolation: CurveInterpolation,
        jumps: &[(Date, Real)],
        options: &BootstrapOptions,
    ) -> Result<Self> {
        ck_core::ensure!(!helpers.is_empty(), "at least one rate helper is required");
        ck_core::ensure!(
            options.min_rate < options.max_rate,
            "invalid rate bracket [{}, {}]",
            options.min_rate,
            options.max_rate
        );

        helpers.sort_by_key(|h| h.pillar_date());
        check_pillars(reference_date, &helpers)?;

        let jumps = checked_jumps(reference_date, &*day_counter, jumps)?;
        let observed = helpers
            .iter()
            .map(|h| QuoteObservation::of(h.quote()))
            .collect();
        let market = helpers
            .iter()
            .map(|h| h.quote().current().checked_value())
            .collect::<Result<Vec<_>>>()?;

        let mut dates = Vec::with_capacity(helpers.len() + 1);
        dates.push(reference_date);
        dates.extend(helpers.iter().map(|h| h.pillar_date()));
        let times: Vec<Time> = dates
            .iter()
            .map(|&d| day_counter.year_fraction(reference_date, d))
            .collect();
        for (i, pair) in times.windows(2).enumerate() {
            if pair[1] <= pair[0] {
                let first = if i == 0 {
                    "reference date".to_string()
                } else {
                    helpers[i - 1].description()
                };
                return Err(Error::DuplicatePillar {
                    date: dates[i + 1].iso(),
                    first,
                    second: helpers[i].description(),
                });
            }
        }

        let kind = interpolation.node_kind();
        let n = helpers.len();
        let mut values = vec![node_value(kind, 0.0, 0.0); n + 1];
        let mut passes = 0;

        loop {
            passes += 1;
            let previous = values.clone();
            // First sweep: only the nodes solved so far. Later sweeps: all.
            for i in 1..=n {
                let in_use = if passes == 1 { i + 1 } else { n + 1 };
                let helper = &helpers[i - 1];
                let mut trial = values[..in_use].to_vec();
                let mut objective = |r: Real| -> Result<Real> {
                    trial[i] = node_value(kind, r, times[i]);
                    if i == 1 && kind != NodeKind::Discount {
                        trial[0] = trial[1];
                    }
                    let curve = InterpolatedCurve::from_nodes(
                        dates[..in_use].to_vec(),
                        times[..in_use].to_vec(),
                        trial.clone(),
                        day_counter.clone(),
                        interpolation,
                        jumps.clone(),
                    )?;
                    curve.enable_extrapolation(true);
                    Ok(helper.implied_quote(&curve)? - market[i - 1])
                };
                let solved = bracket_root(
                    &mut objective,
                    options.min_rate,
                    options.max_rate,
                    options.max_bracket_expansions,
                )
                .and_then(|(lo, hi)| {
                    brent(
                        &mut objective,
                        lo,
                        hi,
                        options.accuracy,
                        options.max_evaluations,
                    )
                })
                .map_err(|e| pillar_error(helper.as_ref(), e))?;
                let residual = objective(solved).map_err(|e| pillar_error(helper.as_ref(), e))?;

                values[i] = node_value(kind, solved, times[i]);
                if i == 1 && kind != NodeKind::Discount {
                    values[0] = values[1];
                }
                debug!(
                    helper = %helper.description(),
                    pillar = %dates[i].iso(),
                    zero = solved,
                    value = values[i],
                    residual,
                    pass = passes,
                    "solved pillar"
                );
            }

            if interpolation.is_local() {
                break;
            }
            let max_change = values
                .iter()
                .zip(&previous)
                .map(|(a, b)| (a - b).abs())
                .fold(0.0, Real::max);
            debug!(pass = passes, max_change, %interpolation, "bootstrap pass finished");
            if passes > 1 && max_change <= options.accuracy {
                break;
            }
            if passes >= options.max_passes {
                let last = &helpers[n - 1];
                return Err(Error::BootstrapConvergence {
                    helper: last.description(),
                    pillar: last.pillar_date().iso(),
                    reason: format!(
                        "no convergence after {passes} passes, last node change {max_change:e}"
                    ),
                });
            }
        }

        let curve = InterpolatedCurve::from_nodes(
            dates,
            times,
            values,
            day_counter,
            interpolation,
            jumps,
        )?;
        Ok(Self {
            curve,
            helpers,
            observed,
            passes,
        })
    }

    /// The underlying interpolated curve.
    pub fn curve(&self) -> &InterpolatedCurve {
        &self.curve
    }

    /// The interpolation policy.
    pub fn interpolation(&self) -> CurveInterpolation {
        self.curve.interpolation()
    }

    /// Helpers sorted by pillar date.
    pub fn helpers(&self) -> &[Box<dyn RateHelper>] {
        &self.helpers
    }

    /// Node dates, starting at the reference date.
    pub fn dates(&self) -> &[Date] {
        self.curve.dates()
    }

    /// Node times.
    pub fn times(&self) -> &[Time] {
        self.curve.times()
    }

    /// Node values.
    pub fn data(&self) -> &[Real] {
        self.curve.data()
    }

    /// `(date, value)` pairs for every node.
    pub fn nodes(&self) -> Vec<(Date, Real)> {
        self.curve.nodes()
    }

    /// Number of sweeps the bootstrap needed.
    pub fn passes(&self) -> Size {
        self.passes
    }

    /// `true` if any helper quote was set, reset or relinked since the
    /// bootstrap. The nodes are not updated; bootstrap again to pick up
    /// the new quotes.
    pub fn is_stale(&self) -> bool {
        self.helpers
            .iter()
            .zip(&self.observed)
            .any(|(h, seen)| QuoteObservation::of(h.quote()) != *seen)
    }
}

/// Zero rate `r` at time `t` expressed as a node of the given kind.
fn node_value(kind: NodeKind, r: Rate, t: Time) -> Real {
    match kind {
        NodeKind::Discount => (-r * t).exp(),
        NodeKind::ZeroYield | NodeKind::ForwardRate => r,
    }
}

fn check_pillars(reference_date: Date, helpers: &[Box<dyn RateHelper>]) -> Result<()> {
    for helper in helpers {
        if helper.pillar_date() <= reference_date {
            return Err(Error::HelperOutOfRange {
                helper: helper.description(),
                reason: format!(
                    "pillar {} is not after the reference date {}",
                    helper.pillar_date().iso(),
                    reference_date.iso()
                ),
            });
        }
    }
    for pair in helpers.windows(2) {
        if pair[0].pillar_date() == pair[1].pillar_date() {
            return Err(Error::DuplicatePillar {
                date: pair[0].pillar_date().iso(),
                first: pair[0].description(),
                second: pair[1].description(),
            });
        }
    }
    Ok(())
}

fn pillar_error(helper: &dyn RateHelper, err: Error) -> Error {
    match err {
        Error::HelperOutOfRange { .. } | Error::MissingQuote(_) => err,
        Error::Extrapolation(reason) => Error::HelperOutOfRange {
            helper: helper.description(),
            reason,
        },
        other => Error::BootstrapConvergence {
            helper: helper.description(),
            pillar: helper.pillar_date().iso(),
            reason: other.to_string(),
        },
    }
}

impl TermStructure for PiecewiseYieldCurve {
    fn reference_date(&self) -> Date {
        self.curve.reference_date()
    }

    fn day_counter(&self) -> Arc<dyn DayCounter> {
        self.curve.day_counter()
    }

    fn max_date(&self) -> Date {
        self.curve.max_date()
    }

    fn max_time(&self) -> Time {
        self.curve.max_time()
    }

    fn allows_extrapolation(&self) -> bool {
        self.curve.allows_extrapolation()
    }

    fn enable_extrapolation(&self, flag: bool) {
        self.curve.enable_extrapolation(flag);
    }
}

impl YieldTermStructure for PiecewiseYieldCurve {
    fn discount_impl(&self, t: Time) -> Result<DiscountFactor> {
        self.curve.discount_impl(t)
    }

    fn zero_yield_impl(&self, t: Time) -> Result<Rate> {
        self.curve.zero_yield_impl(t)
    }

    fn forward_impl(&self, t: Time) -> Result<Rate> {
        self.curve.forward_impl(t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rate_helpers::DepositRateHelper;
    use approx::assert_abs_diff_eq;
    use ck_core::Compounding;
    use ck_quotes::{QuoteHandle, SimpleQuote};
    use ck_time::{Actual360, Frequency};

    fn date(y: u16, m: u8, d: u8) -> Date {
        Date::from_ymd(y, m, d).unwrap()
    }

    fn deposit(rate: Real, start: Date, end: Date) -> Box<dyn RateHelper> {
        let (_, quote) = SimpleQuote::shared(end.iso(), rate);
        Box::new(DepositRateHelper::new(quote, start, end, Arc::new(Actual360)).unwrap())
    }

    fn bootstrap(helpers: Vec<Box<dyn RateHelper>>, interpolation: CurveInterpolation) -> Result<PiecewiseYieldCurve> {
        PiecewiseYieldCurve::bootstrap(
            date(2025, 1, 2),
            helpers,
            Arc::new(Actual360),
            interpolation,
            &BootstrapOptions::default(),
        )
    }

    #[test]
    fn single_deposit() {
        let today = date(2025, 1, 2);
        let maturity = date(2025, 7, 2);
        let curve = bootstrap(vec![deposit(0.05, today, maturity)], CurveInterpolation::LinearZero).unwrap();
        let tau = Actual360.year_fraction(today, maturity);
        assert_abs_diff_eq!(curve.discount(maturity).unwrap(), 1.0 / (1.0 + 0.05 * tau), epsilon = 1e-12);
        assert_eq!(curve.discount(today).unwrap(), 1.0);
        assert_eq!(curve.passes(), 1);
    }

    #[test]
    fn helpers_are_sorted_and_repriced() {
        let today = date(2025, 1, 2);
        for interpolation in CurveInterpolation::ALL {
            let curve = bootstrap(
                vec![
                    deposit(0.045, today, date(2025, 7, 2)),
                    deposit(0.04, today, date(2025, 4, 2)),
                    deposit(0.05, today, date(2026, 1, 2)),
                ],
                interpolation,
            )
            .unwrap();
            assert_eq!(curve.dates()[1], date(2025, 4, 2));
            for helper in curve.helpers() {
                assert_abs_diff_eq!(helper.quote_error(&curve).unwrap(), 0.0, epsilon = 1e-10);
            }
        }
    }

    #[test]
    fn negative_rates() {
        let today = date(2025, 1, 2);
        let curve = bootstrap(
            vec![
                deposit(-0.005, today, date(2025, 4, 2)),
                deposit(-0.004, today, date(2025, 10, 2)),
            ],
            CurveInterpolation::LogCubicDiscount,
        )
        .unwrap();
        assert!(curve.discount(date(2025, 10, 2)).unwrap() > 1.0);
    }

    #[test]
    fn empty_helpers_fail() {
        assert!(bootstrap(Vec::new(), CurveInterpolation::LinearZero).is_err());
    }

    #[test]
    fn duplicate_pillars_fail() {
        let today = date(2025, 1, 2);
        let err = bootstrap(
            vec![
                deposit(0.04, today, date(2025, 4, 2)),
                deposit(0.041, date(2025, 1, 3), date(2025, 4, 2)),
            ],
            CurveInterpolation::LinearZero,
        )
        .unwrap_err();
        assert!(matches!(err, Error::DuplicatePillar { ref date, .. } if date == "2025-04-02"));
    }

    #[test]
    fn expired_helper_is_out_of_range() {
        let err = bootstrap(
            vec![deposit(0.04, date(2024, 6, 2), date(2024, 12, 2))],
            CurveInterpolation::LinearZero,
        )
        .unwrap_err();
        assert!(matches!(err, Error::HelperOutOfRange { .. }));
    }

    #[test]
    fn unreachable_quote_fails_to_converge() {
        let today = date(2025, 1, 2);
        let options = BootstrapOptions {
            max_bracket_expansions: 2,
            ..BootstrapOptions::default()
        };
        let err = PiecewiseYieldCurve::bootstrap(
            today,
            vec![deposit(500.0, today, date(2025, 4, 2))],
            Arc::new(Actual360),
            CurveInterpolation::LinearZero,
            &options,
        )
        .unwrap_err();
        assert!(matches!(err, Error::BootstrapConvergence { .. }));
    }

    #[test]
    fn quote_changes_make_the_curve_stale() {
        let today = date(2025, 1, 2);
        let (quote, handle) = SimpleQuote::shared("3M", 0.04);
        let helper = DepositRateHelper::new(handle, today, date(2025, 4, 2), Arc::new(Actual360)).unwrap();
        let curve = bootstrap(vec![Box::new(helper)], CurveInterpolation::FlatForward).unwrap();
        assert!(!curve.is_stale());
        quote.set_value(0.04);
        assert!(!curve.is_stale());
        quote.set_value(0.041);
        assert!(curve.is_stale());
    }

    #[test]
    fn missing_quote_is_reported() {
        let today = date(2025, 1, 2);
        let empty: Arc<dyn ck_quotes::Quote> = Arc::new(SimpleQuote::empty("3M"));
        let helper =
            DepositRateHelper::new(QuoteHandle::new(empty), today, date(2025, 4, 2), Arc::new(Actual360)).unwrap();
        let err = bootstrap(vec![Box::new(helper)], CurveInterpolation::LinearZero).unwrap_err();
        assert_eq!(err, Error::MissingQuote("3M".into()));
    }

    #[test]
    fn zero_rate_at_pillar_matches_node() {
        let today = date(2025, 1, 2);
        let curve = bootstrap(
            vec![
                deposit(0.03, today, date(2025, 4, 2)),
                deposit(0.032, today, date(2025, 10, 2)),
            ],
            CurveInterpolation::CubicZero,
        )
        .unwrap();
        for (d, z) in curve.nodes().into_iter().skip(1) {
            let r = curve
                .zero_rate(d, Compounding::Continuous, Frequency::NoFrequency)
                .unwrap();
            assert_abs_diff_eq!(r.rate(), z, epsilon = 1e-10);
        }
    }
}
