//! `CashFlow` trait, the base for all cash-flow types.
//!
//! A cash flow is an amount of money paid at a specific date. Floating
//! amounts depend on a forecast curve, so [`CashFlow::amount`] receives one;
//! fixed amounts ignore it.

use crate::coupon::Coupon;
use ck_core::{errors::Result, Real};
use ck_termstructures::YieldTermStructure;
use ck_time::Date;
use std::fmt;

/// Base trait for all cash flows.
pub trait CashFlow: fmt::Debug + Send + Sync {
    /// The date on which this cash flow is paid.
    fn date(&self) -> Date;

    /// The amount paid on [`date`](Self::date), projecting any floating
    /// component off `forecast`.
    fn amount(&self, forecast: &dyn YieldTermStructure) -> Result<Real>;

    /// Whether this cash flow has already occurred relative to `ref_date`.
    /// A flow on `ref_date` has NOT yet occurred.
    fn has_occurred(&self, ref_date: Date) -> bool {
        self.date() < ref_date
    }

    /// The coupon view of this flow, if it is one.
    fn as_coupon(&self) -> Option<&dyn Coupon> {
        None
    }
}

/// A sequence of cash flows.
pub type Leg = Vec<Box<dyn CashFlow>>;

/// A fixed amount at a fixed date.
#[derive(Debug, Clone)]
pub struct SimpleCashFlow {
    /// The payment amount.
    pub amount: Real,
    /// The payment date.
    pub date: Date,
}

impl SimpleCashFlow {
    /// Create a new simple cash flow.
    pub fn new(amount: Real, date: Date) -> Self {
        Self { amount, date }
    }
}

impl CashFlow for SimpleCashFlow {
    fn date(&self) -> Date {
        self.date
    }

    fn amount(&self, _forecast: &dyn YieldTermStructure) -> Result<Real> {
        Ok(self.amount)
    }
}

/// Repayment of notional at maturity.
#[derive(Debug, Clone)]
pub struct Redemption {
    /// The redemption amount.
    pub amount: Real,
    /// The redemption date.
    pub date: Date,
}

impl Redemption {
    /// Create a new redemption cash flow.
    pub fn new(amount: Real, date: Date) -> Self {
        Self { amount, date }
    }
}

impl CashFlow for Redemption {
    fn date(&self) -> Date {
        self.date
    }

    fn amount(&self, _forecast: &dyn YieldTermStructure) -> Result<Real> {
        Ok(self.amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ck_termstructures::FlatForward;
    use ck_time::Actual365Fixed;
    use std::sync::Arc;

    fn date(y: u16, m: u8, d: u8) -> Date {
        Date::from_ymd(y, m, d).unwrap()
    }

    fn curve() -> FlatForward {
        FlatForward::continuous(date(2025, 1, 2), 0.03, Arc::new(Actual365Fixed)).unwrap()
    }

    #[test]
    fn simple_cashflow() {
        let d = date(2025, 6, 15);
        let cf = SimpleCashFlow::new(100.0, d);
        assert_eq!(cf.amount(&curve()).unwrap(), 100.0);
        assert_eq!(cf.date(), d);
        assert!(cf.as_coupon().is_none());
    }

    #[test]
    fn has_occurred() {
        let cf = SimpleCashFlow::new(100.0, date(2025, 6, 15));
        assert!(!cf.has_occurred(date(2025, 6, 14)));
        assert!(!cf.has_occurred(date(2025, 6, 15)));
        assert!(cf.has_occurred(date(2025, 6, 16)));
    }

    #[test]
    fn redemption() {
        let r = Redemption::new(1000.0, date(2030, 1, 15));
        assert_eq!(r.amount(&curve()).unwrap(), 1000.0);
        assert_eq!(r.date(), date(2030, 1, 15));
    }
}
