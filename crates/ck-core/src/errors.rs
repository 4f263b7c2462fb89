//! Error types for curvekit.
//!
//! A single `thiserror`-derived enum covers the whole workspace. Curve
//! construction failures carry the helper and pillar that caused them so the
//! service layer can report them without further context. The `ensure!` and
//! `fail!` macros keep precondition checks to one line.

use thiserror::Error;

/// The top-level error type used throughout curvekit.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// General runtime error.
    #[error("{0}")]
    Runtime(String),

    /// Precondition violated.
    #[error("precondition not satisfied: {0}")]
    Precondition(String),

    /// A date could not be built or lies outside the supported range.
    #[error("invalid date: {0}")]
    InvalidDate(String),

    /// Two rate helpers resolve to the same pillar date.
    #[error("duplicate pillar {date}: {first} and {second}")]
    DuplicatePillar {
        /// ISO pillar date shared by both helpers.
        date: String,
        /// Description of the first helper.
        first: String,
        /// Description of the second helper.
        second: String,
    },

    /// The root-finder could not solve a pillar.
    #[error("bootstrap failed for {helper} at pillar {pillar}: {reason}")]
    BootstrapConvergence {
        /// Description of the helper being solved.
        helper: String,
        /// ISO pillar date being solved.
        pillar: String,
        /// Solver diagnostics.
        reason: String,
    },

    /// A curve was queried outside its range with extrapolation disabled.
    #[error("extrapolation error: {0}")]
    Extrapolation(String),

    /// A rate helper cannot be priced on the current trial curve.
    #[error("{helper} cannot be priced on the trial curve: {reason}")]
    HelperOutOfRange {
        /// Description of the helper.
        helper: String,
        /// Underlying reason.
        reason: String,
    },

    /// A quote has no valid value.
    #[error("missing quote value: {0}")]
    MissingQuote(String),

    /// Invalid argument.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

/// Shorthand `Result` type used throughout curvekit.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Returns `Err(Error::Precondition(...))` if `$cond` is false.
///
/// # Example
/// ```
/// use ck_core::{ensure, errors::Error};
/// fn positive(x: f64) -> ck_core::errors::Result<f64> {
///     ensure!(x > 0.0, "x must be positive, got {x}");
///     Ok(x)
/// }
/// assert!(positive(1.0).is_ok());
/// assert!(positive(-1.0).is_err());
/// ```
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $($msg:tt)*) => {
        if !$cond {
            return Err($crate::errors::Error::Precondition(
                format!($($msg)*)
            ));
        }
    };
}

/// Returns `Err(Error::Runtime(...))` immediately.
///
/// # Example
/// ```
/// use ck_core::{fail, errors::Error};
/// fn always_err() -> ck_core::errors::Result<()> {
///     fail!("something went wrong");
/// }
/// assert!(always_err().is_err());
/// ```
#[macro_export]
macro_rules! fail {
    ($($msg:tt)*) => {
        return Err($crate::errors::Error::Runtime(format!($($msg)*)))
    };
}
