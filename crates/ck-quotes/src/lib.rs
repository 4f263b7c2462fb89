//! # ck-quotes
//!
//! Market quotes: named scalars whose readers always pull the live value.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

/// `Quote` trait and concrete implementations.
pub mod quote;

pub use quote::{
    CompositeQuote, Quote, QuoteHandle, QuoteObservation, RelinkableQuoteHandle, SimpleQuote,
};
