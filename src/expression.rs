//! Filter expressions over records.
//!
//! This module provides:
//! - The expression AST (comparisons, AND/OR/NOT, IN, BETWEEN, LIKE, REGEXP)
//! - Value coercion rules used by comparisons and membership tests
//! - LIKE-to-regex translation and lazily compiled patterns
//! - Evaluation of an expression against a record

pub mod coercion;
pub mod error;
pub mod eval;
pub mod expr;
pub mod operator;
pub mod pattern;

pub use coercion::{compare_values, sort_order, values_equal};
pub use error::{ExpressionError, ExpressionResult};
pub use eval::{evaluate_expression, expression_to_predicate, ExpressionEvaluator, Predicate};
pub use expr::Expression;
pub use operator::{BinaryOperator, ComparisonOperator, UnaryOperator};
pub use pattern::{like_to_regex, Pattern};
