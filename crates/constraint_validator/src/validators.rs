//! The validator set.
//!
//! One pure function per constraint kind. Each takes the coerced value and
//! the declared threshold and returns `Err(reason)` when the value fails.
//! Reasons are part of the public error contract and must not change.

use constraint_core::Threshold;
use regex::Regex;

/// Renders a numeric threshold the way reasons print it (`3`, not `3.0`).
fn num(threshold: f64) -> String {
    Threshold::Number(threshold).to_string()
}

/// `min`: value must be greater than or equal to the threshold.
pub fn min(value: f64, threshold: f64) -> Result<(), String> {
    if value >= threshold {
        Ok(())
    } else {
        Err(format!("Must be at least {}", num(threshold)))
    }
}

/// `max`: value must be less than or equal to the threshold.
pub fn max(value: f64, threshold: f64) -> Result<(), String> {
    if value <= threshold {
        Ok(())
    } else {
        Err(format!("Must be no greater than {}", num(threshold)))
    }
}

/// `exclusiveMin`: value must be strictly greater than the threshold.
pub fn exclusive_min(value: f64, threshold: f64) -> Result<(), String> {
    if value > threshold {
        Ok(())
    } else {
        Err(format!("Must be greater than {}", num(threshold)))
    }
}

/// `exclusiveMax`: value must be strictly less than the threshold.
///
/// Shares its reason with [`max`].
pub fn exclusive_max(value: f64, threshold: f64) -> Result<(), String> {
    if value < threshold {
        Ok(())
    } else {
        Err(format!("Must be no greater than {}", num(threshold)))
    }
}

fn as_exact_int(n: f64) -> Option<i64> {
    // beyond 2^53 not every integer is representable
    if n.fract() == 0.0 && n.abs() <= 9_007_199_254_740_992.0 {
        Some(n as i64)
    } else {
        None
    }
}

/// `multipleOf`: value divided by the threshold must leave no remainder.
///
/// Integral operands use integer remainder. Otherwise the quotient must be
/// within rounding error of an integer; the tolerance scales with the
/// quotient, never with the threshold.
pub fn multiple_of(value: f64, threshold: f64) -> Result<(), String> {
    let passes = match (as_exact_int(value), as_exact_int(threshold)) {
        (_, Some(0)) => false,
        (Some(v), Some(t)) => v % t == 0,
        _ => {
            let quotient = value / threshold;
            (quotient - quotient.round()).abs() <= f64::EPSILON * quotient.abs().max(1.0)
        }
    };

    if passes {
        Ok(())
    } else {
        Err(format!("Must be a multiple of {}", num(threshold)))
    }
}

/// `minLength`: at least `threshold` characters (Unicode scalar values).
pub fn min_length(value: &str, threshold: usize) -> Result<(), String> {
    if value.chars().count() >= threshold {
        Ok(())
    } else {
        Err(format!("Must be at least {threshold} characters in length"))
    }
}

/// `maxLength`: at most `threshold` characters (Unicode scalar values).
pub fn max_length(value: &str, threshold: usize) -> Result<(), String> {
    if value.chars().count() <= threshold {
        Ok(())
    } else {
        Err(format!("Must be no more than {threshold} characters in length"))
    }
}

/// `startsWith`
pub fn starts_with(value: &str, prefix: &str) -> Result<(), String> {
    if value.starts_with(prefix) {
        Ok(())
    } else {
        Err(format!("Must start with {prefix}"))
    }
}

/// `endsWith`
pub fn ends_with(value: &str, suffix: &str) -> Result<(), String> {
    if value.ends_with(suffix) {
        Ok(())
    } else {
        Err(format!("Must end with {suffix}"))
    }
}

/// `contains`
pub fn contains(value: &str, needle: &str) -> Result<(), String> {
    if value.contains(needle) {
        Ok(())
    } else {
        Err(format!("Must contain {needle}"))
    }
}

/// `notContains`
pub fn not_contains(value: &str, needle: &str) -> Result<(), String> {
    if value.contains(needle) {
        Err(format!("Must not contain {needle}"))
    } else {
        Ok(())
    }
}

/// `pattern`: the compiled expression must match somewhere in the value.
pub fn pattern(value: &str, regex: &Regex) -> Result<(), String> {
    if regex.is_match(value) {
        Ok(())
    } else {
        Err(format!("Must match {}", regex.as_str()))
    }
}
