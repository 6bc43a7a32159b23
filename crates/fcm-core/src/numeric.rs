use crate::FcmError;

/// Floating point type used throughout system
pub type Real = f64;

/// Absolute/relative tolerance pair for float comparisons.
#[derive(Clone, Copy, Debug)]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-12,
            rel: 1e-9,
        }
    }
}

pub fn nearly_equal(a: Real, b: Real, tol: Tolerances) -> bool {
    let diff = (a - b).abs();
    if diff <= tol.abs {
        return true;
    }
    diff <= tol.rel * a.abs().max(b.abs())
}

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, FcmError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(FcmError::NonFinite { what, value: v })
    }
}

/// Fold step for a running maximum that lets NaN win.
///
/// `f64::max` discards NaN operands, which would let a diverged node look
/// settled. Once a NaN is seen the result stays NaN.
pub fn max_nan_sticky(acc: Real, v: Real) -> Real {
    if acc.is_nan() || v.is_nan() {
        Real::NAN
    } else if v > acc {
        v
    } else {
        acc
    }
}
