//! Value coercion rules for comparisons.
//!
//! Two strings compare lexicographically. Any other pair is compared
//! numerically when both sides coerce to `f64` (numbers, numeric-looking
//! strings). Everything else is an unsupported comparison.

use crate::expression::{ComparisonOperator, ExpressionError, ExpressionResult};
use crate::record::Value;
use std::cmp::Ordering;

/// Compare two values with the given operator
pub fn compare_values(
    left: &Value,
    operator: ComparisonOperator,
    right: &Value,
) -> ExpressionResult<bool> {
    if let (Value::String(a), Value::String(b)) = (left, right) {
        return Ok(operator.matches(a.as_str().cmp(b.as_str())));
    }

    if let (Some(a), Some(b)) = (left.as_f64(), right.as_f64()) {
        // NaN orders against nothing, so only `!=` holds
        return Ok(match a.partial_cmp(&b) {
            Some(ordering) => operator.matches(ordering),
            None => operator == ComparisonOperator::Ne,
        });
    }

    Err(ExpressionError::UnsupportedComparison {
        left: left.clone(),
        operator,
        right: right.clone(),
    })
}

/// Coercion-aware equality that never errors; incomparable pairs are unequal
pub fn values_equal(left: &Value, right: &Value) -> bool {
    if left == right {
        return true;
    }

    if let (Value::String(a), Value::String(b)) = (left, right) {
        return a == b;
    }

    match (left.as_f64(), right.as_f64()) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

/// Total order used for sorting records.
///
/// Booleans sort before numbers, numbers before strings. Numbers compare
/// numerically across integer and float; NaN sorts after other numbers.
pub fn sort_order(left: &Value, right: &Value) -> Ordering {
    fn rank(value: &Value) -> u8 {
        match value {
            Value::Boolean(_) => 0,
            Value::Integer(_) | Value::Float(_) => 1,
            Value::String(_) => 2,
        }
    }

    match (left, right) {
        (Value::Boolean(a), Value::Boolean(b)) => a.cmp(b),
        (Value::Integer(a), Value::Integer(b)) => a.cmp(b),
        (Value::String(a), Value::String(b)) => a.cmp(b),
        (a, b) if rank(a) == 1 && rank(b) == 1 => {
            let (a, b) = (a.as_f64().unwrap_or(f64::NAN), b.as_f64().unwrap_or(f64::NAN));
            a.partial_cmp(&b).unwrap_or_else(|| a.is_nan().cmp(&b.is_nan()))
        }
        (a, b) => rank(a).cmp(&rank(b)),
    }
}
