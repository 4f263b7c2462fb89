//! Compounding conventions.

use std::fmt;

/// How interest is compounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Compounding {
    /// Simple interest: `1 + r·t`
    Simple,
    /// Compounded interest: `(1 + r/f)^(f·t)`
    Compounded,
    /// Continuously compounded: `e^(r·t)`
    Continuous,
    /// Simple interest up to the first period, compounded thereafter.
    SimpleThenCompounded,
    /// Compounded up to the last full period, simple thereafter.
    CompoundedThenSimple,
}

impl fmt::Display for Compounding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Compounding::Simple => "simple",
            Compounding::Compounded => "compounded",
            Compounding::Continuous => "continuous",
            Compounding::SimpleThenCompounded => "simple-then-compounded",
            Compounding::CompoundedThenSimple => "compounded-then-simple",
        };
        f.write_str(name)
    }
}
