//! Error types for expression evaluation.

use crate::expression::ComparisonOperator;
use crate::record::Value;
use std::fmt;

/// Errors that can occur during expression evaluation
#[derive(Debug, Clone, PartialEq)]
pub enum ExpressionError {
    /// Operands that neither compare as strings nor coerce to numbers
    UnsupportedComparison {
        left: Value,
        operator: ComparisonOperator,
        right: Value,
    },

    /// REGEXP pattern (or translated LIKE pattern) that fails to compile
    InvalidRegexp { pattern: String, message: String },
}

impl fmt::Display for ExpressionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExpressionError::UnsupportedComparison {
                left,
                operator,
                right,
            } => {
                write!(
                    f,
                    "unsupported comparison: {} {} {} ({} vs {})",
                    left.to_literal(),
                    operator,
                    right.to_literal(),
                    left.data_type(),
                    right.data_type()
                )
            }

            ExpressionError::InvalidRegexp { pattern, message } => {
                write!(f, "invalid regexp '{}': {}", pattern, message)
            }
        }
    }
}

impl std::error::Error for ExpressionError {}

/// Result type for expression operations
pub type ExpressionResult<T> = Result<T, ExpressionError>;
