//! Expression evaluation implementation.

use crate::expression::coercion::{compare_values, values_equal};
use crate::expression::{ComparisonOperator, Expression, ExpressionResult};
use crate::record::{Record, Value};

/// Evaluator for expressions against a single record
pub struct ExpressionEvaluator<'a> {
    record: &'a Record,
}

impl<'a> ExpressionEvaluator<'a> {
    pub fn new(record: &'a Record) -> Self {
        Self { record }
    }

    /// Evaluate an expression to a boolean.
    ///
    /// A predicate on a field the record lacks is false. Errors abort the
    /// evaluation and are returned to the caller unchanged.
    pub fn evaluate(&self, expr: &Expression) -> ExpressionResult<bool> {
        match expr {
            Expression::Comparison { field, op, value } => match self.field(field) {
                Some(actual) => compare_values(actual, *op, value),
                None => Ok(false),
            },

            // Both sides are evaluated so an error on the right is never
            // masked by the left side's result.
            Expression::Binary { op, left, right } => {
                let left = self.evaluate(left)?;
                let right = self.evaluate(right)?;
                Ok(op.apply(left, right))
            }

            Expression::Unary { op, operand } => {
                let operand = self.evaluate(operand)?;
                Ok(op.apply(operand))
            }

            Expression::In {
                field,
                values,
                negate,
            } => match self.field(field) {
                Some(actual) => {
                    let found = values.iter().any(|v| values_equal(actual, v));
                    Ok(found != *negate)
                }
                None => Ok(false),
            },

            Expression::Between {
                field,
                lower,
                upper,
            } => match self.field(field) {
                Some(actual) => {
                    let above = compare_values(actual, ComparisonOperator::Ge, lower)?;
                    let below = compare_values(actual, ComparisonOperator::Le, upper)?;
                    Ok(above && below)
                }
                None => Ok(false),
            },

            Expression::Like { field, pattern } | Expression::Regexp { field, pattern } => {
                match self.field(field) {
                    Some(Value::String(s)) => pattern.is_match(s),
                    _ => Ok(false),
                }
            }
        }
    }

    fn field(&self, name: &str) -> Option<&'a Value> {
        self.record.get(name)
    }
}

impl Expression {
    /// Evaluate this expression against a record
    pub fn evaluate(&self, record: &Record) -> ExpressionResult<bool> {
        ExpressionEvaluator::new(record).evaluate(self)
    }
}

/// Helper function to evaluate an expression against a record
pub fn evaluate_expression(expr: &Expression, record: &Record) -> ExpressionResult<bool> {
    ExpressionEvaluator::new(record).evaluate(expr)
}

/// Type alias for predicate functions
pub type Predicate = Box<dyn Fn(&Record) -> ExpressionResult<bool> + Send + Sync + 'static>;

/// Wrap an expression into a predicate closure
pub fn expression_to_predicate(expr: Expression) -> Predicate {
    Box::new(move |record| evaluate_expression(&expr, record))
}
