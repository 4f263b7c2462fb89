//! Rounding of values for display.

use ck_core::Real;

/// Rounding convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rounding {
    /// No rounding: return the value unchanged.
    None,
    /// Round up (towards positive infinity).
    Up,
    /// Round down (towards negative infinity).
    Down,
    /// Round to nearest, ties away from zero.
    Closest,
}

/// Round `value` to `precision` decimal places using the given convention.
///
/// Non-finite values pass through untouched, and `-0.0` comes back as `0.0`
/// so rounded series never print a signed zero.
pub fn round(value: Real, precision: i32, convention: Rounding) -> Real {
    if !value.is_finite() {
        return value;
    }
    let mult = 10_f64.powi(precision);
    let rounded = match convention {
        Rounding::None => return value,
        Rounding::Up => (value * mult).ceil() / mult,
        Rounding::Down => (value * mult).floor() / mult,
        Rounding::Closest => (value * mult).round() / mult,
    };
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}
