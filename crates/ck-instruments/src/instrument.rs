//! `Instrument` and `PricingEngine` traits.
//!
//! Instruments hold their contractual terms only. Market data reaches them
//! through an engine, which reads its curves from handles at every
//! `calculate` call, so relinking a handle reprices the same instrument.

use ck_core::{errors::Result, Real};
use ck_time::Date;
use std::collections::HashMap;

/// Results of pricing an instrument.
///
/// Holds the NPV and any additional named figures (leg values, fair rate,
/// clean price and so on).
#[derive(Debug, Clone, Default)]
pub struct PricingResults {
    /// Net present value.
    pub npv: Real,
    /// Additional named results.
    pub additional_results: HashMap<String, Real>,
}

impl PricingResults {
    /// Create pricing results with just an NPV.
    pub fn from_npv(npv: Real) -> Self {
        Self {
            npv,
            additional_results: HashMap::new(),
        }
    }

    /// Add a named result.
    pub fn with_result(mut self, key: impl Into<String>, value: Real) -> Self {
        self.additional_results.insert(key.into(), value);
        self
    }

    /// Look up a named result.
    pub fn result(&self, key: &str) -> Option<Real> {
        self.additional_results.get(key).copied()
    }
}

/// A pricing engine for instruments of type `I`.
pub trait PricingEngine<I: ?Sized>: std::fmt::Debug + Send + Sync {
    /// Price `instrument` on the engine's current market data.
    fn calculate(&self, instrument: &I) -> Result<PricingResults>;
}

/// Base trait for priced products.
pub trait Instrument: std::fmt::Debug + Send + Sync {
    /// The last payment date.
    fn maturity_date(&self) -> Option<Date>;

    /// Whether every payment lies on or before `evaluation_date`.
    fn is_expired(&self, evaluation_date: Date) -> bool {
        self.maturity_date()
            .map_or(true, |maturity| maturity <= evaluation_date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Zero(Date);

    impl Instrument for Zero {
        fn maturity_date(&self) -> Option<Date> {
            Some(self.0)
        }
    }

    #[test]
    fn pricing_results_builder() {
        let r = PricingResults::from_npv(42.0)
            .with_result("fixed_leg_npv", -10.0)
            .with_result("fair_rate", 0.02);
        assert!((r.npv - 42.0).abs() < 1e-15);
        assert_eq!(r.result("fixed_leg_npv"), Some(-10.0));
        assert_eq!(r.result("missing"), None);
    }

    #[test]
    fn expiry_is_inclusive_of_maturity() {
        let maturity = Date::from_ymd(2030, 1, 2).unwrap();
        let zero = Zero(maturity);
        assert!(!zero.is_expired(Date::from_ymd(2030, 1, 1).unwrap()));
        assert!(zero.is_expired(maturity));
    }
}
