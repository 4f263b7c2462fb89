//! Discounting engines.
//!
//! Engines hold yield-curve handles, never curves. Every `calculate` reads
//! the handle's current target, so relinking the underlying
//! [`RelinkableYieldTermStructureHandle`](ck_termstructures::RelinkableYieldTermStructureHandle)
//! reprices the same instrument without rebuilding anything.

use crate::bond::FixedRateBond;
use crate::instrument::{PricingEngine, PricingResults};
use crate::swap::{SwapValuation, VanillaSwap};
use ck_cashflows::cashflows;
use ck_core::errors::Result;
use ck_termstructures::YieldTermStructureHandle;
use ck_time::EvaluationContext;
use tracing::debug;

// ── Swaps ─────────────────────────────────────────────────────────────────────

/// Prices swaps by discounting both legs.
///
/// Floating amounts are projected on the forecast handle when one is set,
/// otherwise on the discount handle.
#[derive(Debug, Clone)]
pub struct DiscountingSwapEngine {
    discount: YieldTermStructureHandle,
    forecast: Option<YieldTermStructureHandle>,
}

impl DiscountingSwapEngine {
    /// Single-curve engine.
    pub fn new(discount: YieldTermStructureHandle) -> Self {
        Self {
            discount,
            forecast: None,
        }
    }

    /// Project floating amounts on `forecast`.
    pub fn with_forecast_curve(mut self, forecast: YieldTermStructureHandle) -> Self {
        self.forecast = Some(forecast);
        self
    }

    /// The discount handle.
    pub fn discount_curve(&self) -> &YieldTermStructureHandle {
        &self.discount
    }

    /// Full valuation on the curves currently linked.
    pub fn valuation(&self, swap: &VanillaSwap) -> Result<SwapValuation> {
        let discount = self.discount.current();
        match &self.forecast {
            Some(handle) => swap.valuation(&*handle.current(), &*discount),
            None => swap.valuation(&*discount, &*discount),
        }
    }
}

impl PricingEngine<VanillaSwap> for DiscountingSwapEngine {
    fn calculate(&self, swap: &VanillaSwap) -> Result<PricingResults> {
        let v = self.valuation(swap)?;
        debug!(npv = v.npv, fair_rate = v.fair_rate, "swap priced");
        Ok(PricingResults::from_npv(v.npv)
            .with_result("fixed_leg_npv", v.fixed_leg_npv)
            .with_result("floating_leg_npv", v.floating_leg_npv)
            .with_result("fixed_leg_bps", v.fixed_leg_bps)
            .with_result("floating_leg_bps", v.floating_leg_bps)
            .with_result("fair_rate", v.fair_rate)
            .with_result("fair_spread", v.fair_spread))
    }
}

// ── Bonds ─────────────────────────────────────────────────────────────────────

/// Prices fixed-rate bonds on a discount curve.
///
/// The NPV is taken at the curve's reference date; prices are taken at the
/// bond's settlement date for the engine's evaluation date.
#[derive(Debug, Clone)]
pub struct DiscountingBondEngine {
    discount: YieldTermStructureHandle,
    ctx: EvaluationContext,
}

impl DiscountingBondEngine {
    /// Create an engine for trades on the evaluation date of `ctx`.
    pub fn new(discount: YieldTermStructureHandle, ctx: EvaluationContext) -> Self {
        Self { discount, ctx }
    }

    /// The discount handle.
    pub fn discount_curve(&self) -> &YieldTermStructureHandle {
        &self.discount
    }
}

impl PricingEngine<FixedRateBond> for DiscountingBondEngine {
    fn calculate(&self, bond: &FixedRateBond) -> Result<PricingResults> {
        let curve = self.discount.current();
        let npv = cashflows::npv(bond.cashflows(), &*curve, &*curve, curve.reference_date())?;
        let settlement = bond.settlement_date(&self.ctx)?;
        let dirty = bond.dirty_price(&*curve, settlement)?;
        let accrued = bond.accrued_amount(&*curve, settlement)?;
        debug!(npv, dirty, settlement = %settlement.iso(), "bond priced");
        Ok(PricingResults::from_npv(npv)
            .with_result("dirty_price", dirty)
            .with_result("clean_price", dirty - accrued)
            .with_result("accrued_amount", accrued))
    }
}
