//! A bond priced off a flat curve that follows a live quote.
//!
//! The curve reads its rate from the quote on every query, so changing the
//! quote reprices the bond without rebuilding the curve or the engine.

use super::CurveService;
use crate::types::{DateInput, ServiceResponse};
use ck_core::{errors::Result, Compounding, Real};
use ck_instruments::{DiscountingBondEngine, FixedRateBond, PricingEngine, PricingResults};
use ck_math::{round, Rounding};
use ck_quotes::SimpleQuote;
use ck_termstructures::{FlatForward, YieldTermStructure, YieldTermStructureHandle};
use ck_time::{
    Actual365Fixed, BusinessDayConvention, Calendar, DateGeneration, EvaluationContext, Frequency,
    Period, ScheduleBuilder, UnitedStatesGovernmentBond,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

const PRICE_DECIMALS: i32 = 4;

fn default_quote_date() -> DateInput {
    DateInput::new(15, 1, 2016)
}

fn default_initial_rate() -> Real {
    2.0
}

/// Bond terms and the two rates to price it at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteLabRequest {
    /// Evaluation and issue date, 15 January 2016 by default.
    #[serde(default = "default_quote_date")]
    pub evaluation_date: DateInput,
    /// Annual coupon, percent, paid semiannually.
    pub coupon_rate_pct: Real,
    /// Years to maturity.
    pub maturity_years: u32,
    /// Flat continuous rate before the change, percent.
    #[serde(default = "default_initial_rate")]
    pub initial_rate_pct: Real,
    /// Flat continuous rate after the change, percent.
    pub new_rate_pct: Real,
}

/// Clean prices before and after the quote change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteLabResponse {
    /// Rate before the change, percent.
    pub initial_rate: Real,
    /// Clean price at the initial rate.
    pub initial_price: Real,
    /// Rate after the change, percent.
    pub new_rate: Real,
    /// Clean price at the new rate.
    pub new_price: Real,
    /// `new_price - initial_price`.
    pub price_change: Real,
}

fn bond(ctx: &EvaluationContext, coupon: Real, years: u32) -> Result<FixedRateBond> {
    let calendar = Arc::new(UnitedStatesGovernmentBond);
    let issue = ctx.evaluation_date();
    let maturity = calendar.advance(
        issue,
        Period::years(years as i32),
        BusinessDayConvention::Following,
        false,
    )?;
    let schedule = ScheduleBuilder::new(issue, maturity, Period::months(6), &*calendar)
        .with_convention(BusinessDayConvention::ModifiedFollowing)
        .with_termination_convention(BusinessDayConvention::ModifiedFollowing)
        .with_rule(DateGeneration::Forward)
        .build()?;
    FixedRateBond::new(
        2,
        100.0,
        &schedule,
        vec![coupon],
        Arc::new(Actual365Fixed),
        BusinessDayConvention::Following,
        calendar,
        Some(issue),
    )
}

fn clean_price(results: &PricingResults) -> Result<Real> {
    results
        .result("clean_price")
        .map(|p| round(p, PRICE_DECIMALS, Rounding::Closest))
        .ok_or_else(|| ck_core::Error::Runtime("engine gave no clean price".into()))
}

impl CurveService {
    /// Price a fixed-rate bond, move the curve's rate quote and price the
    /// same bond again with the same engine.
    pub fn quote_lab(&self, request: &QuoteLabRequest) -> ServiceResponse<QuoteLabResponse> {
        self.respond("quote_lab", || {
            ck_core::ensure!(request.maturity_years > 0, "maturity must be at least one year");
            let ctx = EvaluationContext::new(request.evaluation_date.to_date()?);
            let (quote, handle) = SimpleQuote::shared("flat rate", request.initial_rate_pct / 100.0);
            let curve: Arc<dyn YieldTermStructure> = Arc::new(FlatForward::with_quote(
                ctx.evaluation_date(),
                handle,
                Arc::new(Actual365Fixed),
                Compounding::Continuous,
                Frequency::Annual,
            )?);
            let engine = DiscountingBondEngine::new(YieldTermStructureHandle::new(curve), ctx);
            let bond = bond(&ctx, request.coupon_rate_pct / 100.0, request.maturity_years)?;

            let initial_price = clean_price(&engine.calculate(&bond)?)?;
            quote.set_value(request.new_rate_pct / 100.0);
            let new_price = clean_price(&engine.calculate(&bond)?)?;

            Ok(QuoteLabResponse {
                initial_rate: request.initial_rate_pct,
                initial_price,
                new_rate: request.new_rate_pct,
                new_price,
                price_change: round(new_price - initial_price, PRICE_DECIMALS, Rounding::Closest),
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(coupon: Real, initial: Real, new: Real) -> QuoteLabRequest {
        QuoteLabRequest {
            evaluation_date: default_quote_date(),
            coupon_rate_pct: coupon,
            maturity_years: 5,
            initial_rate_pct: initial,
            new_rate_pct: new,
        }
    }

    #[test]
    fn higher_rate_lowers_the_price() {
        let r = CurveService::default()
            .quote_lab(&request(2.0, 2.0, 3.0))
            .into_result()
            .unwrap();
        // A 2% semiannual coupon against 2% continuous trades a little below par.
        assert!(r.initial_price > 99.0 && r.initial_price < 100.5, "{r:?}");
        assert!(r.new_price < r.initial_price);
        assert!((r.price_change - (r.new_price - r.initial_price)).abs() < 1e-9);
        // Roughly duration times the rate move.
        assert!(r.price_change < -3.5 && r.price_change > -5.5, "{r:?}");
    }

    #[test]
    fn unchanged_quote_keeps_the_price() {
        let r = CurveService::default()
            .quote_lab(&request(4.0, 2.5, 2.5))
            .into_result()
            .unwrap();
        assert_eq!(r.initial_price, r.new_price);
        assert_eq!(r.price_change, 0.0);
        assert!(r.initial_price > 100.0);
    }

    #[test]
    fn request_defaults_from_json() {
        let request: QuoteLabRequest =
            serde_json::from_str(r#"{"coupon_rate_pct": 3.0, "maturity_years": 2, "new_rate_pct": 1.0}"#)
                .unwrap();
        assert_eq!(request.initial_rate_pct, 2.0);
        assert_eq!(request.evaluation_date, DateInput::new(15, 1, 2016));
    }

    #[test]
    fn zero_maturity_is_rejected() {
        let mut bad = request(2.0, 2.0, 3.0);
        bad.maturity_years = 0;
        let response = CurveService::default().quote_lab(&bad);
        assert!(!response.is_ok());
        assert!(response.message().unwrap().contains("maturity"));
    }
}
