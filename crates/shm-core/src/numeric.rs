use crate::ShmError;

/// Floating point type used throughout system
pub type Real = f64;

/// Relative tolerance with an absolute floor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

/// True when `actual` is further from `expected` than `rel * max(|expected|, abs)`.
///
/// The absolute floor keeps the comparison meaningful when `expected` is at
/// or near zero.
pub fn exceeds_tolerance(actual: Real, expected: Real, tol: Tolerances) -> bool {
    (actual - expected).abs() > tol.rel * expected.abs().max(tol.abs)
}

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, ShmError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(ShmError::NonFinite { what, value: v })
    }
}

/// `Some(v)` for finite values, `None` for NaN and infinities.
#[inline]
pub fn finite(v: Real) -> Option<Real> {
    v.is_finite().then_some(v)
}

/// Division that yields no value for a zero divisor or a non-finite result.
#[inline]
pub fn checked_div(num: Real, den: Real) -> Option<Real> {
    if den == 0.0 {
        return None;
    }
    finite(num / den)
}

/// Square root that yields no value for negative or non-finite arguments.
#[inline]
pub fn checked_sqrt(v: Real) -> Option<Real> {
    if v < 0.0 || !v.is_finite() {
        return None;
    }
    Some(v.sqrt())
}

/// Format with `digits` significant digits, trailing zeros trimmed
/// (the `%g` convention).
pub fn format_sig(v: Real, digits: usize) -> String {
    if !v.is_finite() {
        return format!("{v}");
    }
    if v == 0.0 {
        return "0".to_string();
    }
    let digits = digits.max(1);

    // Scientific formatting rounds first, so the exponent already accounts
    // for carries like 9.999996 -> 1.00000e1.
    let sci = format!("{:.*e}", digits - 1, v);
    let Some((mantissa, exp)) = sci.split_once('e') else {
        return sci;
    };
    let exp: i32 = exp.parse().unwrap_or(0);

    if exp < -4 || exp >= digits as i32 {
        let sign = if exp < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", trim_zeros(mantissa), sign, exp.abs())
    } else {
        let decimals = (digits as i32 - 1 - exp).max(0) as usize;
        trim_zeros(&format!("{:.*}", decimals, v)).to_string()
    }
}

fn trim_zeros(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ensure_finite_detects_nan() {
        let err = ensure_finite(Real::NAN, "test").unwrap_err();
        let msg = format!("{err}");
        assert!(msg.contains("Non-finite"));
    }

    #[test]
    fn tolerance_uses_floor_near_zero() {
        let tol = Tolerances {
            abs: 1e-9,
            rel: 0.01,
        };
        assert!(!exceeds_tolerance(10.05, 10.0, tol));
        assert!(exceeds_tolerance(5.0, 10.0, tol));
        assert!(exceeds_tolerance(1e-6, 0.0, tol));
        assert!(!exceeds_tolerance(1e-12, 0.0, tol));
    }

    #[test]
    fn guarded_helpers() {
        assert_eq!(checked_div(1.0, 0.0), None);
        assert_eq!(checked_div(1.0, 4.0), Some(0.25));
        assert_eq!(checked_sqrt(-1.0), None);
        assert_eq!(checked_sqrt(0.0), Some(0.0));
        assert_eq!(checked_sqrt(Real::INFINITY), None);
        assert_eq!(finite(Real::NAN), None);
    }

    #[test]
    fn format_sig_matches_g_convention() {
        assert_eq!(format_sig(10.0, 6), "10");
        assert_eq!(format_sig(19.62, 6), "19.62");
        assert_eq!(format_sig(2.5132741228718345, 6), "2.51327");
        assert_eq!(format_sig(-0.5, 6), "-0.5");
        assert_eq!(format_sig(0.00001234, 6), "1.234e-05");
        assert_eq!(format_sig(1234567.0, 6), "1.23457e+06");
        assert_eq!(format_sig(9.9999996, 6), "10");
        assert_eq!(format_sig(0.0, 6), "0");
    }
}
