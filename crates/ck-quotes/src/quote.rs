//! `Quote` trait, the mutable `SimpleQuote` and quote handles.
//!
//! Quotes are shared behind `Arc` and read through [`QuoteHandle`]s. There
//! is no notification: every reader calls [`Quote::value`] when it needs the
//! number, so a value set on the quote is seen by the very next query. Each
//! `set_value` bumps a version counter that lets consumers detect that
//! something they computed earlier is out of date.

use ck_core::errors::{Error, Result};
use ck_core::{Handle, Real, RelinkableHandle};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

/// A market-observable value.
pub trait Quote: fmt::Debug + Send + Sync {
    /// Return the current value, or `None` if the quote is not set.
    fn value(&self) -> Option<Real>;

    /// Label used in error messages.
    fn name(&self) -> &str {
        ""
    }

    /// Monotonic counter bumped on every change of the value.
    fn version(&self) -> u64 {
        0
    }

    /// Return `true` if the quote currently holds a value.
    fn is_valid(&self) -> bool {
        self.value().is_some()
    }

    /// The current value, or [`Error::MissingQuote`] if unset.
    fn checked_value(&self) -> Result<Real> {
        self.value()
            .ok_or_else(|| Error::MissingQuote(self.name().to_string()))
    }
}

/// Read-only handle to a quote.
pub type QuoteHandle = Handle<dyn Quote>;

/// Handle to a quote that can be re-pointed at another quote.
pub type RelinkableQuoteHandle = RelinkableHandle<dyn Quote>;

/// What a consumer saw of a quote handle at some point: link version and
/// quote version. Two equal observations mean nothing changed in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct QuoteObservation {
    link: u64,
    quote: u64,
}

impl QuoteObservation {
    /// Observe `handle` now.
    pub fn of(handle: &QuoteHandle) -> Self {
        Self {
            link: handle.version(),
            quote: handle.current().version(),
        }
    }
}

// ── SimpleQuote ───────────────────────────────────────────────────────────────

/// A simple mutable market quote.
///
/// Setting the value goes through `&self`, so the quote can be shared by
/// the caller and every curve reading it.
pub struct SimpleQuote {
    name: String,
    value: RwLock<Option<Real>>,
    version: AtomicU64,
}

impl SimpleQuote {
    /// Create an unnamed quote with the given value.
    pub fn new(value: Real) -> Self {
        Self::named("", value)
    }

    /// Create a named quote.
    pub fn named(name: impl Into<String>, value: Real) -> Self {
        Self {
            name: name.into(),
            value: RwLock::new(Some(value)),
            version: AtomicU64::new(0),
        }
    }

    /// Create an empty (invalid) quote.
    pub fn empty(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: RwLock::new(None),
            version: AtomicU64::new(0),
        }
    }

    /// Wrap a fresh quote in a read-only handle, returning both.
    pub fn shared(name: impl Into<String>, value: Real) -> (Arc<SimpleQuote>, QuoteHandle) {
        let quote = Arc::new(Self::named(name, value));
        let handle = QuoteHandle::new(quote.clone() as Arc<dyn Quote>);
        (quote, handle)
    }

    /// Set a new value and return the change from the previous one.
    ///
    /// The version is bumped only when the value actually changes.
    pub fn set_value(&self, value: Real) -> Real {
        let mut guard = self.value.write().unwrap_or_else(PoisonError::into_inner);
        let previous = *guard;
        if previous != Some(value) {
            *guard = Some(value);
            self.version.fetch_add(1, Ordering::AcqRel);
        }
        previous.map_or(value, |p| value - p)
    }

    /// Clear the value, making the quote invalid.
    pub fn reset(&self) {
        let mut guard = self.value.write().unwrap_or_else(PoisonError::into_inner);
        if guard.take().is_some() {
            self.version.fetch_add(1, Ordering::AcqRel);
        }
    }
}

impl Quote for SimpleQuote {
    fn value(&self) -> Option<Real> {
        *self.value.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn version(&self) -> u64 {
        self.version.load(Ordering::Acquire)
    }
}

impl fmt::Debug for SimpleQuote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimpleQuote")
            .field("name", &self.name)
            .field("value", &self.value())
            .field("version", &self.version())
            .finish()
    }
}

// ── CompositeQuote ────────────────────────────────────────────────────────────

/// A quote computed from two other quotes, e.g. a rate plus a basis spread.
///
/// The value is recomputed on every read; the version is the sum of the
/// versions of the observed links and quotes, so a change in either input
/// shows up.
pub struct CompositeQuote {
    name: String,
    first: QuoteHandle,
    second: QuoteHandle,
    combine: fn(Real, Real) -> Real,
}

impl CompositeQuote {
    /// Combine `first` and `second` with `combine`.
    pub fn new(
        name: impl Into<String>,
        first: QuoteHandle,
        second: QuoteHandle,
        combine: fn(Real, Real) -> Real,
    ) -> Self {
        Self {
            name: name.into(),
            first,
            second,
            combine,
        }
    }

    /// Sum of the two quotes.
    pub fn sum(name: impl Into<String>, first: QuoteHandle, second: QuoteHandle) -> Self {
        Self::new(name, first, second, |a, b| a + b)
    }
}

impl Quote for CompositeQuote {
    fn value(&self) -> Option<Real> {
        let a = self.first.current().value()?;
        let b = self.second.current().value()?;
        Some((self.combine)(a, b))
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn version(&self) -> u64 {
        self.first.version()
            + self.first.current().version()
            + self.second.version()
            + self.second.current().version()
    }
}

impl fmt::Debug for CompositeQuote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeQuote")
            .field("name", &self.name)
            .field("value", &self.value())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn simple_quote() {
        let q = SimpleQuote::named("1W", 0.0382);
        assert!(q.is_valid());
        assert_eq!(q.value(), Some(0.0382));
        assert_eq!(q.name(), "1W");
        assert_eq!(q.version(), 0);
    }

    #[test]
    fn empty_quote_reports_missing() {
        let q = SimpleQuote::empty("3M");
        assert!(!q.is_valid());
        assert_eq!(q.checked_value(), Err(Error::MissingQuote("3M".into())));
    }

    #[test]
    fn set_value_bumps_version_once_per_change() {
        let q = SimpleQuote::new(1.0);
        assert_eq!(q.set_value(1.5), 0.5);
        assert_eq!(q.version(), 1);
        q.set_value(1.5);
        assert_eq!(q.version(), 1);
        q.reset();
        assert_eq!(q.version(), 2);
        assert_eq!(q.value(), None);
    }

    #[test]
    fn handles_pull_the_live_value() {
        let (quote, handle) = SimpleQuote::shared("spread", 0.001);
        let observer = handle.clone();
        let before = QuoteObservation::of(&observer);
        quote.set_value(0.002);
        assert_eq!(observer.current().value(), Some(0.002));
        assert_ne!(QuoteObservation::of(&observer), before);
    }

    #[test]
    fn relinking_a_quote_handle_changes_observation() {
        let owner = RelinkableQuoteHandle::new(Arc::new(SimpleQuote::new(1.0)));
        let observer = owner.handle();
        let before = QuoteObservation::of(&observer);
        owner.link_to(Arc::new(SimpleQuote::new(2.0)));
        assert_eq!(observer.current().value(), Some(2.0));
        assert_ne!(QuoteObservation::of(&observer), before);
    }

    #[test]
    fn composite_tracks_both_inputs() {
        let (rate, rate_handle) = SimpleQuote::shared("fwd", 0.01);
        let (basis, basis_handle) = SimpleQuote::shared("basis", 0.002);
        let total = CompositeQuote::sum("6M", rate_handle, basis_handle);
        assert!((total.value().unwrap() - 0.012).abs() < 1e-15);
        let v0 = total.version();
        rate.set_value(0.02);
        basis.set_value(0.001);
        assert!((total.value().unwrap() - 0.021).abs() < 1e-15);
        assert_eq!(total.version(), v0 + 2);
    }

    proptest! {
        #[test]
        fn last_write_wins(values in prop::collection::vec(-1.0f64..1.0, 1..20)) {
            let (quote, handle) = SimpleQuote::shared("q", 0.0);
            for v in &values {
                quote.set_value(*v);
            }
            prop_assert_eq!(handle.current().value(), values.last().copied());
        }
    }
}
