//! Fixed-vs-floating swaps.
//!
//! The floating leg pays either an Ibor rate (vanilla swap) or the
//! compounded overnight rate (OIS). Leg values are signed from the holder's
//! point of view: a payer swap pays fixed and receives floating.

use crate::instrument::Instrument;
use ck_cashflows::{
    cashflows, FixedRateLegBuilder, IborIndex, IborLegBuilder, Leg, OvernightIndex,
    OvernightLegBuilder,
};
use ck_core::{errors::Result, Rate, Real, Spread};
use ck_termstructures::YieldTermStructure;
use ck_time::{Date, DayCounter, Schedule};
use std::sync::Arc;

const BASIS_POINT: Real = 1.0e-4;

/// Swap direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SwapType {
    /// Pay fixed, receive floating.
    Payer,
    /// Receive fixed, pay floating.
    Receiver,
}

impl SwapType {
    /// Sign applied to the floating leg: +1 for a payer swap.
    pub fn sign(self) -> Real {
        match self {
            SwapType::Payer => 1.0,
            SwapType::Receiver => -1.0,
        }
    }
}

/// Figures produced by valuing a swap on a pair of curves.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwapValuation {
    /// Net present value to the holder.
    pub npv: Real,
    /// Signed value of the fixed leg.
    pub fixed_leg_npv: Real,
    /// Signed value of the floating leg.
    pub floating_leg_npv: Real,
    /// Signed value of one basis point on the fixed rate.
    pub fixed_leg_bps: Real,
    /// Signed value of one basis point of floating spread.
    pub floating_leg_bps: Real,
    /// Fixed rate giving a zero NPV.
    pub fair_rate: Rate,
    /// Floating spread giving a zero NPV.
    pub fair_spread: Spread,
}

/// A fixed-vs-floating interest-rate swap.
#[derive(Debug)]
pub struct VanillaSwap {
    swap_type: SwapType,
    nominal: Real,
    fixed_rate: Rate,
    spread: Spread,
    fixed_leg: Leg,
    floating_leg: Leg,
}

impl VanillaSwap {
    /// Swap against an Ibor index.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        swap_type: SwapType,
        nominal: Real,
        fixed_schedule: &Schedule,
        fixed_rate: Rate,
        fixed_day_counter: Arc<dyn DayCounter>,
        floating_schedule: &Schedule,
        index: Arc<IborIndex>,
        spread: Spread,
        floating_day_counter: Arc<dyn DayCounter>,
    ) -> Result<Self> {
        let fixed_leg = FixedRateLegBuilder::new(fixed_schedule, fixed_day_counter)
            .with_notional(nominal)
            .with_coupon_rate(fixed_rate)
            .build()?;
        let floating_leg = IborLegBuilder::new(floating_schedule, index)
            .with_notional(nominal)
            .with_day_counter(floating_day_counter)
            .with_spread(spread)
            .build()?;
        Ok(Self {
            swap_type,
            nominal,
            fixed_rate,
            spread,
            fixed_leg,
            floating_leg,
        })
    }

    /// Overnight-indexed swap; both legs share `schedule`.
    pub fn overnight(
        swap_type: SwapType,
        nominal: Real,
        schedule: &Schedule,
        fixed_rate: Rate,
        fixed_day_counter: Arc<dyn DayCounter>,
        index: Arc<OvernightIndex>,
        spread: Spread,
    ) -> Result<Self> {
        let fixed_leg = FixedRateLegBuilder::new(schedule, fixed_day_counter)
            .with_notional(nominal)
            .with_coupon_rate(fixed_rate)
            .build()?;
        let floating_leg = OvernightLegBuilder::new(schedule, index)
            .with_notional(nominal)
            .with_spread(spread)
            .build()?;
        Ok(Self {
            swap_type,
            nominal,
            fixed_rate,
            spread,
            fixed_leg,
            floating_leg,
        })
    }

    /// Payer or receiver.
    pub fn swap_type(&self) -> SwapType {
        self.swap_type
    }

    /// Notional of both legs.
    pub fn nominal(&self) -> Real {
        self.nominal
    }

    /// Fixed coupon rate.
    pub fn fixed_rate(&self) -> Rate {
        self.fixed_rate
    }

    /// Spread over the floating index.
    pub fn spread(&self) -> Spread {
        self.spread
    }

    /// Fixed leg.
    pub fn fixed_leg(&self) -> &Leg {
        &self.fixed_leg
    }

    /// Floating leg.
    pub fn floating_leg(&self) -> &Leg {
        &self.floating_leg
    }

    /// First accrual start over both legs.
    pub fn start_date(&self) -> Option<Date> {
        let fixed = cashflows::start_date(&self.fixed_leg);
        let floating = cashflows::start_date(&self.floating_leg);
        fixed.into_iter().chain(floating).min()
    }

    /// Value the swap: floating amounts projected on `forecast`, every flow
    /// discounted on `discount`, flows paid on or before the discount
    /// curve's reference date excluded.
    pub fn valuation(
        &self,
        forecast: &dyn YieldTermStructure,
        discount: &dyn YieldTermStructure,
    ) -> Result<SwapValuation> {
        let today = discount.reference_date();
        let sign = self.swap_type.sign();

        let fixed_leg_npv = -sign * cashflows::npv(&self.fixed_leg, forecast, discount, today)?;
        let floating_leg_npv = sign * cashflows::npv(&self.floating_leg, forecast, discount, today)?;
        let fixed_leg_bps = -sign * cashflows::bps(&self.fixed_leg, discount, today)?;
        let floating_leg_bps = sign * cashflows::bps(&self.floating_leg, discount, today)?;
        let npv = fixed_leg_npv + floating_leg_npv;

        ck_core::ensure!(fixed_leg_bps != 0.0, "swap has no fixed coupons left to price");
        ck_core::ensure!(floating_leg_bps != 0.0, "swap has no floating coupons left to price");
        Ok(SwapValuation {
            npv,
            fixed_leg_npv,
            floating_leg_npv,
            fixed_leg_bps,
            floating_leg_bps,
            fair_rate: self.fixed_rate - npv / (fixed_leg_bps / BASIS_POINT),
            fair_spread: self.spread - npv / (floating_leg_bps / BASIS_POINT),
        })
    }
}

impl Instrument for VanillaSwap {
    fn maturity_date(&self) -> Option<Date> {
        let fixed = cashflows::maturity_date(&self.fixed_leg);
        let floating = cashflows::maturity_date(&self.floating_leg);
        fixed.into_iter().chain(floating).max()
    }
}
