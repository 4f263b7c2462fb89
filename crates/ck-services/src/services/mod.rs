//! `CurveService`: one method per use case.
//!
//! Every call is request-scoped. Curves, quotes and handles are built for
//! the request's own evaluation date and dropped with the response, so calls
//! never interfere with each other and the service itself is `Sync`.

use crate::settings::ServiceSettings;
use crate::types::ServiceResponse;
use ck_core::{errors::Result, Rate, Real};
use ck_math::{round, Rounding};
use ck_quotes::{QuoteHandle, SimpleQuote};
use ck_termstructures::{
    CurveInterpolation, PiecewiseYieldCurve, RateHelper, TermStructure, YieldTermStructure,
};
use ck_time::Date;
use std::sync::Arc;
use tracing::{info, warn};

/// Par versus indexed Ibor coupon projection.
pub mod coupons;

/// Custom, treasury and spreaded curves.
pub mod curves;

/// Weekday, period and calendar arithmetic.
pub mod dates;

/// Day-count fractions and the 30/360 month-end anomaly.
pub mod day_count;

/// EONIA curve from deposits and OIS, with a turn-of-year jump.
pub mod eonia;

/// 6M Euribor curve over an EONIA discount curve.
pub mod euribor;

/// Flat-forward glitch at the pillars.
pub mod glitch;

/// Bond repriced after its curve quote moves.
pub mod quotes;

/// Swap NPV under parallel and tilted shocks.
pub mod sensitivity;

/// Entry point of the service layer.
#[derive(Debug, Clone, Default)]
pub struct CurveService {
    settings: ServiceSettings,
}

impl CurveService {
    /// Service with the given settings.
    pub fn new(settings: ServiceSettings) -> Self {
        Self { settings }
    }

    /// The settings in use.
    pub fn settings(&self) -> &ServiceSettings {
        &self.settings
    }

    /// Run one use case and wrap its outcome in the response envelope.
    fn respond<T>(&self, operation: &'static str, run: impl FnOnce() -> Result<T>) -> ServiceResponse<T> {
        info!(operation, "service call");
        match run() {
            Ok(value) => ServiceResponse::ok(value),
            Err(e) => {
                warn!(operation, error = %e, "service call failed");
                ServiceResponse::error(e.to_string())
            }
        }
    }

    /// A decimal rate in percent at display precision.
    fn percent(&self, rate: Rate) -> Real {
        round(rate * 100.0, self.settings.sampling.display_decimals, Rounding::Closest)
    }

    /// Bootstrap with the configured options and allow extrapolation on the
    /// result, as every sampled series runs to the last pillar or past it.
    fn bootstrap(
        &self,
        reference_date: Date,
        helpers: Vec<Box<dyn RateHelper>>,
        interpolation: CurveInterpolation,
        jumps: &[(Date, Real)],
    ) -> Result<Arc<PiecewiseYieldCurve>> {
        let curve = PiecewiseYieldCurve::bootstrap_with_jumps(
            reference_date,
            helpers,
            Arc::new(ck_time::Actual365Fixed),
            interpolation,
            jumps,
            &self.settings.to_bootstrap_options(),
        )?;
        curve.enable_extrapolation(true);
        Ok(Arc::new(curve))
    }

    /// Clamp a requested horizon to the configured maximum.
    fn horizon(&self, requested: Option<u32>, default: u32) -> Result<u32> {
        let years = requested.unwrap_or(default);
        let max = self.settings.sampling.max_curve_years;
        ck_core::ensure!(years > 0, "horizon must be at least one year");
        ck_core::ensure!(years <= max, "horizon of {years} years exceeds the maximum of {max}");
        Ok(years)
    }
}

/// A fresh quote holding `rate_percent / 100`.
fn rate_quote(name: impl Into<String>, rate_percent: Real) -> QuoteHandle {
    SimpleQuote::shared(name, rate_percent / 100.0).1
}

/// `n` evenly spaced points over `[start, end]`.
fn linspace(start: Real, end: Real, n: usize) -> impl Iterator<Item = Real> {
    let step = if n > 1 { (end - start) / (n - 1) as Real } else { 0.0 };
    (0..n).map(move |i| if i + 1 == n { end } else { start + step * i as Real })
}

/// Simple forward rate over `[d1, d2]` measured on `day_counter`.
fn simple_forward(
    curve: &dyn YieldTermStructure,
    d1: Date,
    d2: Date,
    day_counter: &dyn ck_time::DayCounter,
) -> Result<Rate> {
    let tau = day_counter.year_fraction(d1, d2);
    ck_core::ensure!(tau > 0.0, "empty forward period {}..{}", d1.iso(), d2.iso());
    Ok((curve.discount(d1)? / curve.discount(d2)? - 1.0) / tau)
}
