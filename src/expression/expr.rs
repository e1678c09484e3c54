//! Expression AST definitions.

use crate::expression::operator::{BinaryOperator, ComparisonOperator, UnaryOperator};
use crate::expression::pattern::Pattern;
use crate::record::Value;
use std::fmt;

/// Filter expression tree node
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// `field op value`
    Comparison {
        field: String,
        op: ComparisonOperator,
        value: Value,
    },

    /// `left AND right`, `left OR right`
    Binary {
        op: BinaryOperator,
        left: Box<Expression>,
        right: Box<Expression>,
    },

    /// `NOT operand`
    Unary {
        op: UnaryOperator,
        operand: Box<Expression>,
    },

    /// `field IN (...)`, or `field NOT IN (...)` when negated
    In {
        field: String,
        values: Vec<Value>,
        negate: bool,
    },

    /// `field BETWEEN lower AND upper`, inclusive on both ends
    Between {
        field: String,
        lower: Value,
        upper: Value,
    },

    /// `field LIKE 'pattern'`
    Like { field: String, pattern: Pattern },

    /// `field REGEXP 'pattern'`
    Regexp { field: String, pattern: Pattern },
}

impl Expression {
    /// Create a comparison expression
    pub fn comparison(
        field: impl Into<String>,
        op: ComparisonOperator,
        value: impl Into<Value>,
    ) -> Self {
        Expression::Comparison {
            field: field.into(),
            op,
            value: value.into(),
        }
    }

    /// Create an equality expression
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::comparison(field, ComparisonOperator::Eq, value)
    }

    /// Create a not-equal expression
    pub fn ne(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::comparison(field, ComparisonOperator::Ne, value)
    }

    /// Create a greater-than expression
    pub fn gt(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::comparison(field, ComparisonOperator::Gt, value)
    }

    /// Create a greater-than-or-equal expression
    pub fn ge(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::comparison(field, ComparisonOperator::Ge, value)
    }

    /// Create a less-than expression
    pub fn lt(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::comparison(field, ComparisonOperator::Lt, value)
    }

    /// Create a less-than-or-equal expression
    pub fn le(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::comparison(field, ComparisonOperator::Le, value)
    }

    /// Create a binary logical expression
    pub fn binary(op: BinaryOperator, left: Expression, right: Expression) -> Self {
        Expression::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Create an AND expression
    pub fn and(left: Expression, right: Expression) -> Self {
        Self::binary(BinaryOperator::And, left, right)
    }

    /// Create an OR expression
    pub fn or(left: Expression, right: Expression) -> Self {
        Self::binary(BinaryOperator::Or, left, right)
    }

    /// Create a NOT expression
    pub fn not_expr(operand: Expression) -> Self {
        Expression::Unary {
            op: UnaryOperator::Not,
            operand: Box::new(operand),
        }
    }

    /// Create an IN expression
    pub fn in_list(field: impl Into<String>, values: Vec<Value>) -> Self {
        Expression::In {
            field: field.into(),
            values,
            negate: false,
        }
    }

    /// Create a NOT IN expression
    pub fn not_in_list(field: impl Into<String>, values: Vec<Value>) -> Self {
        Expression::In {
            field: field.into(),
            values,
            negate: true,
        }
    }

    /// Create a BETWEEN expression
    pub fn between(
        field: impl Into<String>,
        lower: impl Into<Value>,
        upper: impl Into<Value>,
    ) -> Self {
        Expression::Between {
            field: field.into(),
            lower: lower.into(),
            upper: upper.into(),
        }
    }

    /// Create a LIKE expression
    pub fn like(field: impl Into<String>, pattern: impl Into<String>) -> Self {
        Expression::Like {
            field: field.into(),
            pattern: Pattern::like(pattern),
        }
    }

    /// Create a REGEXP expression
    pub fn regexp(field: impl Into<String>, pattern: impl Into<String>) -> Self {
        Expression::Regexp {
            field: field.into(),
            pattern: Pattern::regexp(pattern),
        }
    }

    /// Field names referenced by this expression, in order of appearance
    pub fn fields(&self) -> Vec<&str> {
        let mut fields = Vec::new();
        self.collect_fields(&mut fields);
        fields
    }

    fn collect_fields<'a>(&'a self, fields: &mut Vec<&'a str>) {
        match self {
            Expression::Binary { left, right, .. } => {
                left.collect_fields(fields);
                right.collect_fields(fields);
            }
            Expression::Unary { operand, .. } => operand.collect_fields(fields),
            Expression::Comparison { field, .. }
            | Expression::In { field, .. }
            | Expression::Between { field, .. }
            | Expression::Like { field, .. }
            | Expression::Regexp { field, .. } => {
                if !fields.contains(&field.as_str()) {
                    fields.push(field);
                }
            }
        }
    }

    /// Number of nodes in the tree
    pub fn node_count(&self) -> usize {
        match self {
            Expression::Binary { left, right, .. } => 1 + left.node_count() + right.node_count(),
            Expression::Unary { operand, .. } => 1 + operand.node_count(),
            _ => 1,
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Comparison { field, op, value } => {
                write!(f, "{} {} {}", field, op, value.to_literal())
            }
            Expression::Binary { op, left, right } => write!(f, "({} {} {})", left, op, right),
            Expression::Unary { op, operand } => match operand.as_ref() {
                Expression::Binary { .. } => write!(f, "{} {}", op, operand),
                _ => write!(f, "{} ({})", op, operand),
            },
            Expression::In {
                field,
                values,
                negate,
            } => {
                let list = values
                    .iter()
                    .map(Value::to_literal)
                    .collect::<Vec<_>>()
                    .join(", ");
                let keyword = if *negate { "NOT IN" } else { "IN" };
                write!(f, "{} {} ({})", field, keyword, list)
            }
            Expression::Between {
                field,
                lower,
                upper,
            } => write!(
                f,
                "{} BETWEEN {} AND {}",
                field,
                lower.to_literal(),
                upper.to_literal()
            ),
            Expression::Like { field, pattern } => {
                write!(f, "{} LIKE '{}'", field, pattern.source())
            }
            Expression::Regexp { field, pattern } => {
                write!(f, "{} REGEXP '{}'", field, pattern.source())
            }
        }
    }
}
