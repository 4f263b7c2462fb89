//! 1D root finding over fallible objectives.
//!
//! Objectives return `Result<Real>` so that an error raised while evaluating
//! a trial point (a curve queried out of range, say) stops the search and
//! reaches the caller unchanged.

use ck_core::{
    errors::{Error, Result},
    Real,
};

const DEFAULT_ACCURACY: Real = 1.0e-12;
const GROWTH_FACTOR: Real = 1.6;

// ── Brent ─────────────────────────────────────────────────────────────────────

/// Brent's method for finding a root of `f(x)` in `[x_min, x_max]`.
///
/// Combines bisection, secant, and inverse quadratic interpolation. The
/// search stops when the bracket on `x` is narrower than `accuracy` or when
/// `|f(x)| <= accuracy`, whichever comes first. The residual is therefore
/// only bounded by `accuracy` times the slope of `f` near the root.
/// `max_evaluations` caps the number of objective calls.
pub fn brent<F>(
    mut f: F,
    x_min: Real,
    x_max: Real,
    accuracy: Real,
    max_evaluations: usize,
) -> Result<Real>
where
    F: FnMut(Real) -> Result<Real>,
{
    let acc = if accuracy > 0.0 {
        accuracy
    } else {
        DEFAULT_ACCURACY
    };
    let mut a = x_min;
    let mut b = x_max;
    let mut fa = f(a)?;
    let mut fb = f(b)?;
    let mut evaluations = 2;

    if fa * fb > 0.0 {
        return Err(Error::Precondition(format!(
            "root not bracketed: f({a}) = {fa}, f({b}) = {fb}"
        )));
    }
    if fa == 0.0 {
        return Ok(a);
    }
    if fb == 0.0 {
        return Ok(b);
    }

    let mut c = b;
    let mut fc = fb;
    let mut d = b - a;
    let mut e = d;

    while evaluations <= max_evaluations {
        if fb * fc > 0.0 {
            c = a;
            fc = fa;
            d = b - a;
            e = d;
        }
        if fc.abs() < fb.abs() {
            a = b;
            b = c;
            c = a;
            fa = fb;
            fb = fc;
            fc = fa;
        }
        let tol = 2.0 * f64::EPSILON * b.abs() + 0.5 * acc;
        let xm = 0.5 * (c - b);
        if xm.abs() <= tol || fb.abs() <= acc {
            return Ok(b);
        }
        if e.abs() >= tol && fa.abs() > fb.abs() {
            let s = fb / fa;
            let (p, q) = if a == c {
                (2.0 * xm * s, 1.0 - s)
            } else {
                let q = fa / fc;
                let r = fb / fc;
                let p = s * (2.0 * xm * q * (q - r) - (b - a) * (r - 1.0));
                (p, (q - 1.0) * (r - 1.0) * (s - 1.0))
            };
            let (p, q) = if p > 0.0 { (p, -q) } else { (-p, q) };
            if 2.0 * p < (3.0 * xm * q - (tol * q).abs()).min((e * q).abs()) {
                e = d;
                d = p / q;
            } else {
                d = xm;
                e = d;
            }
        } else {
            d = xm;
            e = d;
        }
        a = b;
        fa = fb;
        b += if d.abs() > tol {
            d
        } else if xm > 0.0 {
            tol
        } else {
            -tol
        };
        fb = f(b)?;
        evaluations += 1;
    }
    Err(Error::Runtime(format!(
        "maximum number of function evaluations ({max_evaluations}) exceeded, last x = {b}"
    )))
}

// ── Bracketing ────────────────────────────────────────────────────────────────

/// Widen `[lo, hi]` geometrically until `f` changes sign across it.
///
/// At each step the end with the smaller `|f|` moves outwards by 1.6 times
/// the current width. Fails after `max_expansions` unsuccessful steps or on
/// the first objective error.
pub fn bracket_root<F>(
    mut f: F,
    lo: Real,
    hi: Real,
    max_expansions: usize,
) -> Result<(Real, Real)>
where
    F: FnMut(Real) -> Result<Real>,
{
    ck_core::ensure!(lo < hi, "invalid initial bracket [{lo}, {hi}]");
    let (mut lo, mut hi) = (lo, hi);
    let mut f_lo = f(lo)?;
    let mut f_hi = f(hi)?;
    for _ in 0..max_expansions {
        if f_lo * f_hi <= 0.0 {
            return Ok((lo, hi));
        }
        let width = hi - lo;
        if f_lo.abs() < f_hi.abs() {
            lo -= GROWTH_FACTOR * width;
            f_lo = f(lo)?;
        } else {
            hi += GROWTH_FACTOR * width;
            f_hi = f(hi)?;
        }
    }
    if f_lo * f_hi <= 0.0 {
        return Ok((lo, hi));
    }
    Err(Error::Runtime(format!(
        "unable to bracket a root after {max_expansions} expansions, last bracket [{lo}, {hi}]"
    )))
}
