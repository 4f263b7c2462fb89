//! `InterpolatedCurve`: a yield curve defined by values at node dates.
//!
//! The [`CurveInterpolation`] policy decides both what the nodes hold and how
//! they are interpolated in time:
//!
//! | policy | nodes | interpolated quantity |
//! |--------|-------|-----------------------|
//! | `LogCubicDiscount` | discount factors | natural cubic on `ln P` |
//! | `LinearZero` | continuous zero yields | linear |
//! | `CubicZero` | continuous zero yields | natural cubic |
//! | `FlatForward` | instantaneous forwards | backward-flat |
//!
//! Past the last node each interpolant extends its last segment, which is
//! only reachable once extrapolation is enabled.

use crate::term_structure::{TermStructure, TermStructureData};
use crate::yield_term_structure::YieldTermStructure;
use ck_core::errors::{Error, Result};
use ck_core::{DiscountFactor, Rate, Real, Time};
use ck_math::{BackwardFlatInterpolation, CubicNaturalSpline, Interpolation1D, LinearInterpolation};
use ck_time::{Date, DayCounter};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// The quantity stored at the nodes of a curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Discount factors; the node at the reference date is 1.
    Discount,
    /// Continuously-compounded zero yields.
    ZeroYield,
    /// Instantaneous forward rates.
    ForwardRate,
}

/// Interpolation policy of a curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CurveInterpolation {
    /// Natural cubic spline on log discount factors.
    LogCubicDiscount,
    /// Linear interpolation on zero yields.
    LinearZero,
    /// Natural cubic spline on zero yields.
    CubicZero,
    /// Backward-flat instantaneous forwards (piecewise-constant forwards).
    FlatForward,
}

impl CurveInterpolation {
    /// Every policy, in declaration order.
    pub const ALL: [CurveInterpolation; 4] = [
        CurveInterpolation::LogCubicDiscount,
        CurveInterpolation::LinearZero,
        CurveInterpolation::CubicZero,
        CurveInterpolation::FlatForward,
    ];

    /// What the nodes of a curve using this policy hold.
    pub fn node_kind(self) -> NodeKind {
        match self {
            CurveInterpolation::LogCubicDiscount => NodeKind::Discount,
            CurveInterpolation::LinearZero | CurveInterpolation::CubicZero => NodeKind::ZeroYield,
            CurveInterpolation::FlatForward => NodeKind::ForwardRate,
        }
    }

    /// Whether a node only affects the curve between its neighbours.
    ///
    /// Bootstrapping a local policy converges in a single pass; spline
    /// policies need repeated passes.
    pub fn is_local(self) -> bool {
        matches!(
            self,
            CurveInterpolation::LinearZero | CurveInterpolation::FlatForward
        )
    }

    /// Canonical name.
    pub fn name(self) -> &'static str {
        match self {
            CurveInterpolation::LogCubicDiscount => "LogCubicDiscount",
            CurveInterpolation::LinearZero => "LinearZero",
            CurveInterpolation::CubicZero => "CubicZero",
            CurveInterpolation::FlatForward => "FlatForward",
        }
    }

    /// Build the interpolant over the node values.
    pub(crate) fn interpolate(self, times: &[Time], values: &[Real]) -> Result<Box<dyn Interpolation1D>> {
        Ok(match self {
            CurveInterpolation::LogCubicDiscount => {
                let logs = values
                    .iter()
                    .map(|&df| {
                        if df > 0.0 {
                            Ok(df.ln())
                        } else {
                            Err(Error::Precondition(format!(
                                "non-positive discount factor {df}"
                            )))
                        }
                    })
                    .collect::<Result<Vec<_>>>()?;
                Box::new(CubicNaturalSpline::new(times, &logs)?)
            }
            CurveInterpolation::LinearZero => Box::new(LinearInterpolation::new(times, values)?),
            CurveInterpolation::CubicZero => Box::new(CubicNaturalSpline::new(times, values)?),
            CurveInterpolation::FlatForward => {
                Box::new(BackwardFlatInterpolation::new(times, values)?)
            }
        })
    }
}

impl fmt::Display for CurveInterpolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CurveInterpolation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let key: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();
        CurveInterpolation::ALL
            .into_iter()
            .find(|i| i.name().to_ascii_lowercase() == key)
            .ok_or_else(|| {
                Error::InvalidArgument(format!(
                    "unknown interpolation '{s}', expected one of LogCubicDiscount, LinearZero, CubicZero, FlatForward"
                ))
            })
    }
}

// ── InterpolatedCurve ─────────────────────────────────────────────────────────

/// A yield curve interpolated between node dates.
#[derive(Debug)]
pub struct InterpolatedCurve {
    data: TermStructureData,
    interpolation: CurveInterpolation,
    dates: Vec<Date>,
    times: Vec<Time>,
    values: Vec<Real>,
    interp: Box<dyn Interpolation1D>,
    // (date, time, discount multiplier) applied past each jump time.
    jumps: Vec<(Date, Time, Real)>,
}

impl InterpolatedCurve {
    /// Build a curve from node dates and values.
    ///
    /// The first date is the reference date. For discount curves its value
    /// must be 1.
    pub fn new(
        dates: Vec<Date>,
        values: Vec<Real>,
        day_counter: Arc<dyn DayCounter>,
        interpolation: CurveInterpolation,
    ) -> Result<Self> {
        ck_core::ensure!(
            dates.len() >= 2,
            "at least two nodes are needed, got {}",
            dates.len()
        );
        ck_core::ensure!(
            dates.len() == values.len(),
            "{} dates but {} values",
            dates.len(),
            values.len()
        );
        for pair in dates.windows(2) {
            ck_core::ensure!(
                pair[0] < pair[1],
                "node dates must be increasing: {} then {}",
                pair[0].iso(),
                pair[1].iso()
            );
        }
        if interpolation.node_kind() == NodeKind::Discount {
            ck_core::ensure!(
                values[0] == 1.0,
                "the first discount factor must be 1, got {}",
                values[0]
            );
        }
        let reference = dates[0];
        let times = dates
            .iter()
            .map(|&d| day_counter.year_fraction(reference, d))
            .collect();
        Self::from_nodes(dates, times, values, day_counter, interpolation, Vec::new())
    }

    /// Discount curve with log-cubic interpolation.
    pub fn discount_curve(
        dates: Vec<Date>,
        discounts: Vec<DiscountFactor>,
        day_counter: Arc<dyn DayCounter>,
    ) -> Result<Self> {
        Self::new(dates, discounts, day_counter, CurveInterpolation::LogCubicDiscount)
    }

    /// Zero-yield curve with linear interpolation.
    pub fn zero_curve(
        dates: Vec<Date>,
        zeros: Vec<Rate>,
        day_counter: Arc<dyn DayCounter>,
    ) -> Result<Self> {
        Self::new(dates, zeros, day_counter, CurveInterpolation::LinearZero)
    }

    /// Forward curve with backward-flat interpolation.
    pub fn forward_curve(
        dates: Vec<Date>,
        forwards: Vec<Rate>,
        day_counter: Arc<dyn DayCounter>,
    ) -> Result<Self> {
        Self::new(dates, forwards, day_counter, CurveInterpolation::FlatForward)
    }

    /// Assemble a curve from precomputed node times. Jumps are `(date,
    /// time, factor)` triples already validated by the caller.
    pub(crate) fn from_nodes(
        dates: Vec<Date>,
        times: Vec<Time>,
        values: Vec<Real>,
        day_counter: Arc<dyn DayCounter>,
        interpolation: CurveInterpolation,
        jumps: Vec<(Date, Time, Real)>,
    ) -> Result<Self> {
        let interp = interpolation.interpolate(&times, &values)?;
        Ok(Self {
            data: TermStructureData::new(dates[0], day_counter),
            interpolation,
            dates,
            times,
            values,
            interp,
            jumps,
        })
    }

    /// Add discount jumps: past each date, discount factors are multiplied
    /// by the given factor.
    pub fn with_jumps(mut self, jumps: &[(Date, Real)]) -> Result<Self> {
        self.jumps = checked_jumps(self.data.reference_date, &*self.data.day_counter, jumps)?;
        Ok(self)
    }

    /// The interpolation policy.
    pub fn interpolation(&self) -> CurveInterpolation {
        self.interpolation
    }

    /// Node dates, starting at the reference date.
    pub fn dates(&self) -> &[Date] {
        &self.dates
    }

    /// Node times.
    pub fn times(&self) -> &[Time] {
        &self.times
    }

    /// Node values (discounts, zero yields or forwards).
    pub fn data(&self) -> &[Real] {
        &self.values
    }

    /// `(date, value)` pairs for every node.
    pub fn nodes(&self) -> Vec<(Date, Real)> {
        self.dates.iter().copied().zip(self.values.iter().copied()).collect()
    }

    fn jump_effect(&self, t: Time) -> Real {
        self.jumps
            .iter()
            .filter(|&&(_, jump_time, _)| t > jump_time)
            .map(|&(_, _, factor)| factor)
            .product()
    }
}

/// Validate jump dates and factors, returning them sorted with their times.
pub(crate) fn checked_jumps(
    reference: Date,
    day_counter: &dyn DayCounter,
    jumps: &[(Date, Real)],
) -> Result<Vec<(Date, Time, Real)>> {
    let mut checked = Vec::with_capacity(jumps.len());
    for &(date, factor) in jumps {
        ck_core::ensure!(
            date > reference,
            "jump date {} must be after the reference date {}",
            date.iso(),
            reference.iso()
        );
        ck_core::ensure!(
            factor > 0.0 && factor.is_finite(),
            "jump factor at {} must be positive, got {factor}",
            date.iso()
        );
        checked.push((date, day_counter.year_fraction(reference, date), factor));
    }
    checked.sort_by_key(|&(date, _, _)| date);
    Ok(checked)
}

impl TermStructure for InterpolatedCurve {
    fn reference_date(&self) -> Date {
        self.data.reference_date
    }

    fn day_counter(&self) -> Arc<dyn DayCounter> {
        self.data.day_counter.clone()
    }

    fn max_date(&self) -> Date {
        self.dates[self.dates.len() - 1]
    }

    fn max_time(&self) -> Time {
        self.times[self.times.len() - 1]
    }

    fn allows_extrapolation(&self) -> bool {
        self.data.allows_extrapolation()
    }

    fn enable_extrapolation(&self, flag: bool) {
        self.data.enable_extrapolation(flag);
    }
}

impl YieldTermStructure for InterpolatedCurve {
    fn discount_impl(&self, t: Time) -> Result<DiscountFactor> {
        let df = match self.interpolation.node_kind() {
            NodeKind::Discount => self.interp.value(t).exp(),
            NodeKind::ZeroYield => (-self.interp.value(t) * t).exp(),
            NodeKind::ForwardRate => (-self.interp.primitive(t)).exp(),
        };
        Ok(df * self.jump_effect(t))
    }

    fn zero_yield_impl(&self, t: Time) -> Result<Rate> {
        if t == 0.0 {
            return self.forward_impl(0.0);
        }
        if self.interpolation.node_kind() == NodeKind::ZeroYield && self.jumps.is_empty() {
            return Ok(self.interp.value(t));
        }
        Ok(-self.discount_impl(t)?.ln() / t)
    }

    fn forward_impl(&self, t: Time) -> Result<Rate> {
        Ok(match self.interpolation.node_kind() {
            NodeKind::Discount => -self.interp.derivative(t),
            NodeKind::ZeroYield => self.interp.value(t) + t * self.interp.derivative(t),
            NodeKind::ForwardRate => self.interp.value(t),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ck_core::Compounding;
    use ck_time::{Actual365Fixed, Frequency};

    fn date(y: u16, m: u8, d: u8) -> Date {
        Date::from_ymd(y, m, d).unwrap()
    }

    fn dc() -> Arc<dyn DayCounter> {
        Arc::new(Actual365Fixed)
    }

    fn node_dates() -> Vec<Date> {
        vec![date(2020, 1, 1), date(2021, 1, 1), date(2022, 1, 1), date(2025, 1, 1)]
    }

    #[test]
    fn zero_curve_reprices_its_nodes() {
        let zeros = vec![0.01, 0.01, 0.02, 0.025];
        let curve = InterpolatedCurve::zero_curve(node_dates(), zeros.clone(), dc()).unwrap();
        for (&d, &z) in node_dates().iter().zip(&zeros).skip(1) {
            let r = curve
                .zero_rate(d, Compounding::Continuous, Frequency::NoFrequency)
                .unwrap();
            assert_abs_diff_eq!(r.rate(), z, epsilon = 1e-12);
        }
        assert_eq!(curve.discount(date(2020, 1, 1)).unwrap(), 1.0);
    }

    #[test]
    fn forward_curve_is_flat_between_nodes() {
        let fwds = vec![0.02, 0.02, 0.03, 0.04];
        let curve = InterpolatedCurve::forward_curve(node_dates(), fwds, dc()).unwrap();
        let t1 = curve.times()[1];
        let t2 = curve.times()[2];
        assert_abs_diff_eq!(curve.instantaneous_forward(t1).unwrap(), 0.02, epsilon = 1e-15);
        assert_abs_diff_eq!(curve.instantaneous_forward(0.5 * (t1 + t2)).unwrap(), 0.03, epsilon = 1e-15);
        assert_abs_diff_eq!(curve.instantaneous_forward(t2).unwrap(), 0.03, epsilon = 1e-15);
        let expected = (-(0.02 * t1 + 0.03 * (t2 - t1))).exp();
        assert_abs_diff_eq!(curve.discount_t(t2).unwrap(), expected, epsilon = 1e-14);
    }

    #[test]
    fn discount_curve_forward_is_log_derivative() {
        let dfs = vec![1.0, 0.98, 0.955, 0.88];
        let curve = InterpolatedCurve::discount_curve(node_dates(), dfs.clone(), dc()).unwrap();
        for (&d, &df) in node_dates().iter().zip(&dfs) {
            assert_abs_diff_eq!(curve.discount(d).unwrap(), df, epsilon = 1e-14);
        }
        let t = 1.7;
        let h = 1e-6;
        let numeric = (curve.discount_t(t - h).unwrap().ln() - curve.discount_t(t + h).unwrap().ln()) / (2.0 * h);
        assert_abs_diff_eq!(curve.instantaneous_forward(t).unwrap(), numeric, epsilon = 1e-7);
    }

    #[test]
    fn discount_curve_must_start_at_one() {
        let err = InterpolatedCurve::discount_curve(node_dates(), vec![0.99, 0.98, 0.95, 0.9], dc());
        assert!(err.is_err());
    }

    #[test]
    fn range_is_checked_until_extrapolation_is_enabled() {
        let curve =
            InterpolatedCurve::zero_curve(node_dates(), vec![0.01, 0.01, 0.02, 0.025], dc()).unwrap();
        let late = date(2030, 1, 1);
        assert!(matches!(curve.discount(late), Err(Error::Extrapolation(_))));
        curve.enable_extrapolation(true);
        let df = curve.discount(late).unwrap();
        assert!(df > 0.0 && df < 1.0);
        assert!(matches!(curve.discount(date(2019, 6, 1)), Err(Error::Extrapolation(_))));
    }

    #[test]
    fn jumps_scale_later_discounts() {
        let plain =
            InterpolatedCurve::zero_curve(node_dates(), vec![0.01, 0.01, 0.02, 0.025], dc()).unwrap();
        let jumped = InterpolatedCurve::zero_curve(node_dates(), vec![0.01, 0.01, 0.02, 0.025], dc())
            .unwrap()
            .with_jumps(&[(date(2020, 12, 31), 0.999)])
            .unwrap();
        let before = date(2020, 12, 31);
        let after = date(2021, 1, 1);
        assert_eq!(plain.discount(before).unwrap(), jumped.discount(before).unwrap());
        assert_abs_diff_eq!(
            jumped.discount(after).unwrap(),
            0.999 * plain.discount(after).unwrap(),
            epsilon = 1e-15
        );
        assert!(InterpolatedCurve::zero_curve(node_dates(), vec![0.01; 4], dc())
            .unwrap()
            .with_jumps(&[(date(2021, 1, 1), -1.0)])
            .is_err());
    }

    #[test]
    fn interpolation_names_parse() {
        for policy in CurveInterpolation::ALL {
            assert_eq!(policy.name().parse::<CurveInterpolation>().unwrap(), policy);
        }
        assert_eq!(
            "log_cubic_discount".parse::<CurveInterpolation>().unwrap(),
            CurveInterpolation::LogCubicDiscount
        );
        assert!("Quadratic".parse::<CurveInterpolation>().is_err());
    }
}
