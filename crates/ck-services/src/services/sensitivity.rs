//! Swap sensitivity to a parallel or tilted zero-rate shock.
//!
//! The swap's engine observes a relinkable handle. The base NPV is taken on
//! the bootstrapped curve; the handle is then relinked to the shocked curve
//! and the very same swap and engine price again.

use super::{linspace, rate_quote, CurveService};
use crate::choices::ShockType;
use crate::types::{DateInput, SeriesPoint, ServiceResponse};
use ck_cashflows::IborIndex;
use ck_core::{errors::Result, Compounding, Rate, Real};
use ck_instruments::{
    DiscountingSwapEngine, PricingEngine, SwapConventions, SwapRateHelper, SwapType, VanillaSwap,
};
use ck_math::{round, Rounding};
use ck_quotes::SimpleQuote;
use ck_termstructures::{
    CurveInterpolation, InterpolatedSpreadedTermStructure, RateHelper,
    RelinkableYieldTermStructureHandle, YieldTermStructure, YieldTermStructureHandle,
    ZeroSpreadedTermStructure,
};
use ck_time::{
    Actual360, BusinessDayConvention, DateGeneration, EvaluationContext, Frequency, Period,
    ScheduleBuilder, Target, Thirty360, Thirty360Convention,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Swap quotes in percent by tenor in years.
const SWAP_QUOTES: [(i32, Real); 6] = [
    (3, 0.424),
    (5, 0.762),
    (10, 1.584),
    (15, 2.037),
    (20, 2.187),
    (30, 2.256),
];

const NOTIONAL: Real = 10_000.0;
const FIXED_RATE: Rate = 0.02;

/// Pivot of the tilt: the spread is zero this many years out.
const TILT_PIVOT_YEARS: i32 = 10;
const TILT_LAST_YEAR: i32 = 20;

fn default_sensitivity_date() -> DateInput {
    DateInput::new(8, 3, 2016)
}

/// Shock to apply to the swap curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensitivityRequest {
    /// Evaluation date, 8 March 2016 by default.
    #[serde(default = "default_sensitivity_date")]
    pub evaluation_date: DateInput,
    /// Parallel or tilt.
    #[serde(default)]
    pub shock_type: ShockType,
    /// Size of the shock in basis points; for a tilt, the spread change per
    /// year of maturity.
    pub shock_size_bps: Real,
}

/// Base and shocked valuation of a 10k payer swap paying 2%.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensitivityResponse {
    /// Shock applied.
    pub shock_type: ShockType,
    /// NPV on the bootstrapped curve.
    pub base_price: Real,
    /// NPV on the shocked curve.
    pub shocked_price: Real,
    /// `shocked_price - base_price`.
    pub sensitivity: Real,
    /// Fair fixed rate on the base curve, percent.
    pub base_fair_rate: Real,
    /// Fair fixed rate on the shocked curve, percent.
    pub shocked_fair_rate: Real,
    /// Continuous zero rates of the base curve, percent, by time in years.
    pub base_curve: Vec<SeriesPoint<Real>>,
    /// Continuous zero rates of the shocked curve.
    pub shocked_curve: Vec<SeriesPoint<Real>>,
}

fn swap_helpers(ctx: &EvaluationContext) -> Result<Vec<Box<dyn RateHelper>>> {
    let conventions = SwapConventions::euribor(Arc::new(IborIndex::euribor6m()));
    SWAP_QUOTES
        .iter()
        .map(|&(years, rate)| {
            let tenor = Period::years(years);
            let helper = SwapRateHelper::new(rate_quote(tenor.to_string(), rate), tenor, &conventions, ctx)?;
            Ok(Box::new(helper) as Box<dyn RateHelper>)
        })
        .collect()
}

/// A 12-year payer swap starting one month after the evaluation date.
fn payer_swap(ctx: &EvaluationContext) -> Result<VanillaSwap> {
    let start = ctx.offset(Period::months(1))?;
    let end = start.add_period(Period::years(12))?;
    let schedule = |tenor| {
        ScheduleBuilder::new(start, end, tenor, &Target)
            .with_convention(BusinessDayConvention::Following)
            .with_termination_convention(BusinessDayConvention::Following)
            .with_rule(DateGeneration::Forward)
            .build()
    };
    VanillaSwap::new(
        SwapType::Payer,
        NOTIONAL,
        &schedule(Period::years(1))?,
        FIXED_RATE,
        Arc::new(Thirty360::new(Thirty360Convention::BondBasis)),
        &schedule(Period::months(6))?,
        Arc::new(IborIndex::euribor6m()),
        0.0,
        Arc::new(Actual360),
    )
}

fn shocked_curve(
    base: &Arc<dyn YieldTermStructure>,
    shock: ShockType,
    bps: Real,
) -> Result<Arc<dyn YieldTermStructure>> {
    let handle = YieldTermStructureHandle::new(Arc::clone(base));
    let curve: Arc<dyn YieldTermStructure> = match shock {
        ShockType::Parallel => Arc::new(ZeroSpreadedTermStructure::new(
            handle,
            SimpleQuote::shared("parallel shock", bps / 10_000.0).1,
        )),
        ShockType::Tilt => {
            let reference = base.reference_date();
            let spreads = (0..=TILT_LAST_YEAR)
                .map(|n| {
                    let d = reference.add_period(Period::years(n))?;
                    let spread = Real::from(n - TILT_PIVOT_YEARS) * bps / 10_000.0;
                    Ok((d, SimpleQuote::shared(format!("tilt {n}Y"), spread).1))
                })
                .collect::<Result<Vec<_>>>()?;
            Arc::new(InterpolatedSpreadedTermStructure::new(handle, spreads)?)
        }
    };
    curve.enable_extrapolation(true);
    Ok(curve)
}

impl CurveService {
    fn zero_series(&self, curve: &dyn YieldTermStructure) -> Result<Vec<SeriesPoint<Real>>> {
        let sampling = &self.settings().sampling;
        linspace(0.0, sampling.sensitivity_years, sampling.sensitivity_points)
            .map(|t| {
                let z = curve.zero_rate_t(t, Compounding::Continuous, Frequency::Annual)?;
                Ok(SeriesPoint::new(t, self.percent(z.rate())))
            })
            .collect()
    }

    /// Price a payer swap on a swap curve, relink its engine's curve to the
    /// shocked curve and price it again.
    pub fn sensitivity(&self, request: &SensitivityRequest) -> ServiceResponse<SensitivityResponse> {
        self.respond("sensitivity", || {
            let ctx = EvaluationContext::new(request.evaluation_date.to_date()?);
            let spot = ctx.settlement_date(&Target, 2)?;
            let base: Arc<dyn YieldTermStructure> = self.bootstrap(
                spot,
                swap_helpers(&ctx)?,
                CurveInterpolation::LogCubicDiscount,
                &[],
            )?;

            let handle = RelinkableYieldTermStructureHandle::new(Arc::clone(&base));
            let engine = DiscountingSwapEngine::new(handle.handle());
            let swap = payer_swap(&ctx)?;

            let before = engine.calculate(&swap)?;
            let shocked = shocked_curve(&base, request.shock_type, request.shock_size_bps)?;
            handle.link_to(Arc::clone(&shocked));
            let after = engine.calculate(&swap)?;

            let fair = |r: &ck_instruments::PricingResults| -> Result<Real> {
                r.result("fair_rate")
                    .map(|rate| self.percent(rate))
                    .ok_or_else(|| ck_core::Error::Runtime("engine gave no fair rate".into()))
            };
            Ok(SensitivityResponse {
                shock_type: request.shock_type,
                base_price: round(before.npv, 4, Rounding::Closest),
                shocked_price: round(after.npv, 4, Rounding::Closest),
                sensitivity: round(after.npv - before.npv, 4, Rounding::Closest),
                base_fair_rate: fair(&before)?,
                shocked_fair_rate: fair(&after)?,
                base_curve: self.zero_series(&*base)?,
                shocked_curve: self.zero_series(&*shocked)?,
            })
        })
    }
}
